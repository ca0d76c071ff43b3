//! 预导入模块，方便使用

pub use super::exam_enrollments::{
    ActiveModel as ExamEnrollmentActiveModel, Entity as ExamEnrollments,
    Model as ExamEnrollmentModel,
};
pub use super::exam_results::{
    ActiveModel as ExamResultActiveModel, Entity as ExamResults, Model as ExamResultModel,
};
pub use super::exams::{ActiveModel as ExamActiveModel, Entity as Exams, Model as ExamModel};
pub use super::students::{
    ActiveModel as StudentActiveModel, Entity as Students, Model as StudentModel,
};
