pub mod exams;

pub mod grading_scales;

pub mod grading_sessions;

pub use exams::configure_exam_routes;
pub use grading_scales::configure_grading_scale_routes;
pub use grading_sessions::configure_grading_session_routes;
