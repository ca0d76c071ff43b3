use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建学生表
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Students::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Students::SectionId).big_integer().not_null())
                    .col(ColumnDef::new(Students::FirstName).string().not_null())
                    .col(ColumnDef::new(Students::LastName).string().not_null())
                    .col(ColumnDef::new(Students::RollNumber).string().not_null())
                    .col(ColumnDef::new(Students::Email).string().null())
                    .col(ColumnDef::new(Students::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Students::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建考试表
        manager
            .create_table(
                Table::create()
                    .table(Exams::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Exams::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Exams::SectionId).big_integer().not_null())
                    .col(ColumnDef::new(Exams::Title).string().not_null())
                    .col(ColumnDef::new(Exams::SubjectName).string().not_null())
                    .col(ColumnDef::new(Exams::SessionTitle).string().not_null())
                    .col(ColumnDef::new(Exams::MaxMarks).double().not_null())
                    .col(ColumnDef::new(Exams::PassingMarks).double().null())
                    .col(ColumnDef::new(Exams::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Exams::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建考试报名表
        manager
            .create_table(
                Table::create()
                    .table(ExamEnrollments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExamEnrollments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ExamEnrollments::ExamId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExamEnrollments::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ExamEnrollments::Status).string().not_null())
                    .col(
                        ColumnDef::new(ExamEnrollments::HallTicketIssued)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ExamEnrollments::EnrolledAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ExamEnrollments::Table, ExamEnrollments::ExamId)
                            .to(Exams::Table, Exams::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ExamEnrollments::Table, ExamEnrollments::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建考试成绩表
        manager
            .create_table(
                Table::create()
                    .table(ExamResults::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExamResults::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ExamResults::ExamId).big_integer().not_null())
                    .col(
                        ColumnDef::new(ExamResults::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ExamResults::ObtainedMarks).double().null())
                    .col(ColumnDef::new(ExamResults::Percentage).double().null())
                    .col(ColumnDef::new(ExamResults::GradeLabel).string().null())
                    .col(ColumnDef::new(ExamResults::Remarks).text().null())
                    .col(ColumnDef::new(ExamResults::IsPassed).boolean().null())
                    .col(
                        ColumnDef::new(ExamResults::IsAbsent)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ExamResults::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExamResults::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ExamResults::Table, ExamResults::ExamId)
                            .to(Exams::Table, Exams::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ExamResults::Table, ExamResults::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_students_section_id")
                    .table(Students::Table)
                    .col(Students::SectionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_exams_section_id")
                    .table(Exams::Table)
                    .col(Exams::SectionId)
                    .to_owned(),
            )
            .await?;

        // 每个学生在一场考试中只能有一条报名记录
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_exam_enrollments_exam_student")
                    .table(ExamEnrollments::Table)
                    .col(ExamEnrollments::ExamId)
                    .col(ExamEnrollments::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 成绩按 (exam_id, student_id) upsert
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_exam_results_exam_student")
                    .table(ExamResults::Table)
                    .col(ExamResults::ExamId)
                    .col(ExamResults::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(ExamResults::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExamEnrollments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Exams::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Students {
    #[sea_orm(iden = "students")]
    Table,
    Id,
    SectionId,
    FirstName,
    LastName,
    RollNumber,
    Email,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Exams {
    #[sea_orm(iden = "exams")]
    Table,
    Id,
    SectionId,
    Title,
    SubjectName,
    SessionTitle,
    MaxMarks,
    PassingMarks,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ExamEnrollments {
    #[sea_orm(iden = "exam_enrollments")]
    Table,
    Id,
    ExamId,
    StudentId,
    Status,
    HallTicketIssued,
    EnrolledAt,
}

#[derive(DeriveIden)]
enum ExamResults {
    #[sea_orm(iden = "exam_results")]
    Table,
    Id,
    ExamId,
    StudentId,
    ObtainedMarks,
    Percentage,
    GradeLabel,
    Remarks,
    IsPassed,
    IsAbsent,
    CreatedAt,
    UpdatedAt,
}
