//! 报名资格解析

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use ts_rs::TS;

use crate::models::enrollments::entities::ExamEnrollment;

/// 未报名学生的状态值
pub const NOT_ENROLLED_STATUS: &str = "NOT_ENROLLED";

/// 学生对某场考试的资格信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct Eligibility {
    pub is_enrolled: bool,
    pub hall_ticket_issued: bool,
    pub status: String,
}

impl Eligibility {
    pub fn not_enrolled() -> Self {
        Self {
            is_enrolled: false,
            hall_ticket_issued: false,
            status: NOT_ENROLLED_STATUS.to_string(),
        }
    }
}

impl From<&ExamEnrollment> for Eligibility {
    fn from(enrollment: &ExamEnrollment) -> Self {
        Self {
            is_enrolled: true,
            hall_ticket_issued: enrollment.hall_ticket_issued,
            status: enrollment.status.clone(),
        }
    }
}

pub struct EligibilityResolver {
    by_student: HashMap<i64, Eligibility>,
}

impl EligibilityResolver {
    pub fn new<'a, I>(enrollments: I) -> Self
    where
        I: IntoIterator<Item = &'a ExamEnrollment>,
    {
        let by_student = enrollments
            .into_iter()
            .map(|enrollment| (enrollment.student_id, Eligibility::from(enrollment)))
            .collect();
        Self { by_student }
    }

    pub fn eligibility(&self, student_id: i64) -> Eligibility {
        self.by_student
            .get(&student_id)
            .cloned()
            .unwrap_or_else(Eligibility::not_enrolled)
    }

    pub fn is_enrolled(&self, student_id: i64) -> bool {
        self.by_student.contains_key(&student_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enrollment(student_id: i64, hall_ticket_issued: bool) -> ExamEnrollment {
        ExamEnrollment {
            id: student_id * 10,
            exam_id: 1,
            student_id,
            status: "ENROLLED".to_string(),
            hall_ticket_issued,
            enrolled_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_enrolled_student() {
        let enrollments = vec![enrollment(1, true), enrollment(2, false)];
        let resolver = EligibilityResolver::new(&enrollments);

        let first = resolver.eligibility(1);
        assert!(first.is_enrolled);
        assert!(first.hall_ticket_issued);
        assert_eq!(first.status, "ENROLLED");

        assert!(!resolver.eligibility(2).hall_ticket_issued);
        assert!(resolver.is_enrolled(2));
    }

    #[test]
    fn test_missing_enrollment_is_not_enrolled() {
        let enrollments: Vec<ExamEnrollment> = Vec::new();
        let resolver = EligibilityResolver::new(&enrollments);
        let eligibility = resolver.eligibility(42);
        assert_eq!(eligibility, Eligibility::not_enrolled());
        assert_eq!(eligibility.status, NOT_ENROLLED_STATUS);
        assert!(!resolver.is_enrolled(42));
    }
}
