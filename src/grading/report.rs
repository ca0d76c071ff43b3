//! 考试成绩报告
//!
//! 基于已保存的数据（花名册、报名记录、成绩）生成整场考试的汇总。
//! 未报名学生的成绩不计入任何统计。

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use ts_rs::TS;

use super::compute::{ABSENT_GRADE_LABEL, ExamParams, round2};
use super::scale::GradingScale;
use crate::models::enrollments::entities::ExamEnrollment;
use crate::models::results::entities::ExamResult;
use crate::models::students::entities::Student;

/// 等级分布中的一项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct GradeCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct ExamReport {
    pub exam_id: i64,
    pub scale_id: String,
    pub total_students: usize,
    pub enrolled: usize,
    pub not_enrolled: usize,
    /// 已报名、有分数且未缺考
    pub appeared: usize,
    pub passed: usize,
    pub failed: usize,
    pub absent: usize,
    pub tickets_issued: usize,
    pub average_marks: f64,
    pub average_percentage: f64,
    pub top_score: f64,
    pub top_score_percentage: f64,
    pub passing_marks: f64,
    pub enrollment_rate: f64,
    pub attendance_rate: f64,
    pub success_rate: f64,
    pub grade_distribution: Vec<GradeCount>,
}

fn rate(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        round2(numerator as f64 / denominator as f64 * 100.0)
    }
}

impl ExamReport {
    pub fn build(
        exam_id: i64,
        params: &ExamParams,
        scale: &GradingScale,
        roster: &[Student],
        enrollments: &[ExamEnrollment],
        results: &[ExamResult],
    ) -> Self {
        let roster_ids: HashSet<i64> = roster.iter().map(|s| s.id).collect();
        let enrolled_ids: HashSet<i64> = enrollments
            .iter()
            .filter(|e| e.exam_id == exam_id && roster_ids.contains(&e.student_id))
            .map(|e| e.student_id)
            .collect();
        let tickets_issued = enrollments
            .iter()
            .filter(|e| enrolled_ids.contains(&e.student_id) && e.hall_ticket_issued)
            .map(|e| e.student_id)
            .collect::<HashSet<_>>()
            .len();

        let enrolled_results: Vec<&ExamResult> = results
            .iter()
            .filter(|r| r.exam_id == exam_id && enrolled_ids.contains(&r.student_id))
            .collect();

        let absent = enrolled_results.iter().filter(|r| r.is_absent).count();
        let appeared_marks: Vec<(f64, bool)> = enrolled_results
            .iter()
            .filter(|r| !r.is_absent)
            .filter_map(|r| r.obtained_marks.map(|m| (m, r.is_passed == Some(true))))
            .collect();

        let appeared = appeared_marks.len();
        let passed = appeared_marks.iter().filter(|(_, p)| *p).count();

        let (average_marks, average_percentage) = if appeared > 0 {
            let mean = appeared_marks.iter().map(|(m, _)| m).sum::<f64>() / appeared as f64;
            (round2(mean), round2(mean / params.max_marks * 100.0))
        } else {
            (0.0, 0.0)
        };

        let top_score = appeared_marks
            .iter()
            .map(|(m, _)| *m)
            .fold(0.0_f64, f64::max);

        let mut grade_distribution: Vec<GradeCount> = scale
            .bands
            .iter()
            .map(|band| GradeCount {
                label: band.label.clone(),
                count: 0,
            })
            .collect();
        for (marks, _) in &appeared_marks {
            let percentage = params.percentage_of(*marks);
            let Some(band) = scale.lookup(percentage) else {
                continue;
            };
            if let Some(entry) = grade_distribution
                .iter_mut()
                .find(|entry| entry.label == band.label)
            {
                entry.count += 1;
            }
        }
        grade_distribution.push(GradeCount {
            label: ABSENT_GRADE_LABEL.to_string(),
            count: absent,
        });

        let total_students = roster_ids.len();
        let enrolled = enrolled_ids.len();

        Self {
            exam_id,
            scale_id: scale.id.clone(),
            total_students,
            enrolled,
            not_enrolled: total_students - enrolled,
            appeared,
            passed,
            failed: appeared - passed,
            absent,
            tickets_issued,
            average_marks,
            average_percentage,
            top_score,
            top_score_percentage: params.percentage_of(top_score),
            passing_marks: params.passing_marks,
            enrollment_rate: rate(enrolled, total_students),
            attendance_rate: rate(appeared, enrolled),
            success_rate: rate(passed, enrolled),
            grade_distribution,
        }
    }

    pub fn grade_count(&self, label: &str) -> usize {
        self.grade_distribution
            .iter()
            .find(|entry| entry.label == label)
            .map(|entry| entry.count)
            .unwrap_or(0)
    }
}
