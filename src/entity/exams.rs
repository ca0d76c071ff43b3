//! 考试实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "exams")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub section_id: i64,
    pub title: String,
    pub subject_name: String,
    pub session_title: String,
    pub max_marks: f64,
    pub passing_marks: Option<f64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::exam_enrollments::Entity")]
    ExamEnrollments,
    #[sea_orm(has_many = "super::exam_results::Entity")]
    ExamResults,
}

impl Related<super::exam_enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExamEnrollments.def()
    }
}

impl Related<super::exam_results::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExamResults.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_exam(self) -> crate::models::exams::entities::Exam {
        use crate::models::exams::entities::Exam;
        use chrono::{DateTime, Utc};

        Exam {
            id: self.id,
            section_id: self.section_id,
            title: self.title,
            subject_name: self.subject_name,
            session_title: self.session_title,
            max_marks: self.max_marks,
            passing_marks: self.passing_marks,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
