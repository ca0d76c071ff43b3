//! 评分等级表目录
//!
//! 每张等级表是一组有序的「百分比区间 → 等级」映射。查找时取第一个满足
//! `min <= percentage <= max` 的区间；区间不重叠、完整覆盖 `[0, 100]` 是调用方的约定，
//! 运行时不做强制校验，只在启动时通过 [`GradingScale::partition_issues`] 给出诊断。

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;
use ts_rs::TS;

use crate::errors::{GradebookError, Result};

/// 相邻区间之间允许的最大间隔（百分比保留两位小数）
const PARTITION_STEP: f64 = 0.01;
const PARTITION_EPSILON: f64 = 1e-9;

static SCALE_REGISTRY: OnceLock<ScaleRegistry> = OnceLock::new();

/// 等级区间
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct GradeBand {
    pub label: String,
    pub min_percentage: f64,
    pub max_percentage: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl GradeBand {
    pub fn new(label: &str, min_percentage: f64, max_percentage: f64, description: &str) -> Self {
        Self {
            label: label.to_string(),
            min_percentage,
            max_percentage,
            description: if description.is_empty() {
                None
            } else {
                Some(description.to_string())
            },
        }
    }

    pub fn contains(&self, percentage: f64) -> bool {
        self.min_percentage <= percentage && percentage <= self.max_percentage
    }
}

/// 评分等级表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct GradingScale {
    pub id: String,
    pub name: String,
    pub bands: Vec<GradeBand>,
}

/// 等级表覆盖问题（仅用于诊断）
#[derive(Debug, Clone, PartialEq)]
pub enum PartitionIssue {
    /// 最低区间没有从 0 开始
    UncoveredStart { first_min: f64 },
    /// 最高区间没有覆盖到 100
    UncoveredEnd { last_max: f64 },
    /// 两个区间之间存在空隙
    Gap { after: String, before: String },
    /// 两个区间互相重叠
    Overlap { first: String, second: String },
    /// 区间上下界颠倒
    Inverted { label: String },
}

impl std::fmt::Display for PartitionIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartitionIssue::UncoveredStart { first_min } => {
                write!(f, "percentages below {first_min} are not covered")
            }
            PartitionIssue::UncoveredEnd { last_max } => {
                write!(f, "percentages above {last_max} are not covered")
            }
            PartitionIssue::Gap { after, before } => {
                write!(f, "gap between bands '{after}' and '{before}'")
            }
            PartitionIssue::Overlap { first, second } => {
                write!(f, "bands '{first}' and '{second}' overlap")
            }
            PartitionIssue::Inverted { label } => {
                write!(f, "band '{label}' has min_percentage above max_percentage")
            }
        }
    }
}

impl GradingScale {
    /// 按百分比查找等级区间，落在所有区间之外时返回 `None`（视为未评级）
    pub fn lookup(&self, percentage: f64) -> Option<&GradeBand> {
        self.bands.iter().find(|band| band.contains(percentage))
    }

    /// 查找等级标签
    pub fn label_for(&self, percentage: f64) -> Option<String> {
        self.lookup(percentage).map(|band| band.label.clone())
    }

    /// 检查区间是否无缝覆盖 `[0, 100]`
    pub fn partition_issues(&self) -> Vec<PartitionIssue> {
        let mut issues = Vec::new();

        for band in &self.bands {
            if band.min_percentage > band.max_percentage {
                issues.push(PartitionIssue::Inverted {
                    label: band.label.clone(),
                });
            }
        }

        let mut sorted: Vec<&GradeBand> = self.bands.iter().collect();
        sorted.sort_by(|a, b| a.min_percentage.total_cmp(&b.min_percentage));

        let Some(first) = sorted.first() else {
            return issues;
        };

        if first.min_percentage > PARTITION_EPSILON {
            issues.push(PartitionIssue::UncoveredStart {
                first_min: first.min_percentage,
            });
        }

        let highest = sorted
            .iter()
            .map(|band| band.max_percentage)
            .fold(f64::NEG_INFINITY, f64::max);
        if highest < 100.0 - PARTITION_EPSILON {
            issues.push(PartitionIssue::UncoveredEnd { last_max: highest });
        }

        for pair in sorted.windows(2) {
            let (lower, upper) = (pair[0], pair[1]);
            if upper.min_percentage <= lower.max_percentage {
                issues.push(PartitionIssue::Overlap {
                    first: lower.label.clone(),
                    second: upper.label.clone(),
                });
            } else if upper.min_percentage - lower.max_percentage
                > PARTITION_STEP + PARTITION_EPSILON
            {
                issues.push(PartitionIssue::Gap {
                    after: lower.label.clone(),
                    before: upper.label.clone(),
                });
            }
        }

        issues
    }
}

/// 等级表目录
#[derive(Debug, Clone)]
pub struct ScaleRegistry {
    scales: Vec<GradingScale>,
    default_id: String,
}

impl ScaleRegistry {
    /// 内置等级表目录
    pub fn builtin() -> Self {
        let scales = builtin_scales();
        let default_id = scales[0].id.clone();
        Self { scales, default_id }
    }

    /// 在内置目录之后追加自定义等级表
    pub fn with_custom(custom: Vec<GradingScale>) -> Result<Self> {
        let mut registry = Self::builtin();
        let mut seen: HashSet<String> = registry.scales.iter().map(|s| s.id.clone()).collect();

        for scale in custom {
            if scale.id.trim().is_empty() {
                return Err(GradebookError::grading_scale("Grading scale id must not be empty"));
            }
            if scale.bands.is_empty() {
                return Err(GradebookError::grading_scale(format!(
                    "Grading scale '{}' has no bands",
                    scale.id
                )));
            }
            if !seen.insert(scale.id.clone()) {
                return Err(GradebookError::grading_scale(format!(
                    "Duplicate grading scale id '{}'",
                    scale.id
                )));
            }
            registry.scales.push(scale);
        }

        Ok(registry)
    }

    /// 指定默认等级表
    pub fn with_default(mut self, default_id: &str) -> Result<Self> {
        if self.get(default_id).is_none() {
            return Err(GradebookError::grading_scale(format!(
                "Default grading scale '{default_id}' is not in the catalog"
            )));
        }
        self.default_id = default_id.to_string();
        Ok(self)
    }

    /// 初始化全局目录 (在应用启动时调用)
    pub fn init(registry: ScaleRegistry) -> Result<()> {
        SCALE_REGISTRY
            .set(registry)
            .map_err(|_| GradebookError::grading_scale("Scale registry already initialized"))
    }

    /// 获取全局目录，未初始化时使用内置目录
    pub fn global() -> &'static ScaleRegistry {
        SCALE_REGISTRY.get_or_init(Self::builtin)
    }

    pub fn list_scales(&self) -> &[GradingScale] {
        &self.scales
    }

    pub fn get(&self, id: &str) -> Option<&GradingScale> {
        self.scales.iter().find(|scale| scale.id == id)
    }

    pub fn default_scale(&self) -> &GradingScale {
        self.get(&self.default_id).unwrap_or(&self.scales[0])
    }

    /// 按 ID 解析，缺省时使用默认等级表
    pub fn resolve(&self, id: Option<&str>) -> Result<&GradingScale> {
        match id {
            Some(id) => self
                .get(id)
                .ok_or_else(|| GradebookError::not_found(format!("Grading scale '{id}' not found"))),
            None => Ok(self.default_scale()),
        }
    }
}

fn builtin_scales() -> Vec<GradingScale> {
    vec![
        GradingScale {
            id: "standard".to_string(),
            name: "Standard (A-F)".to_string(),
            bands: vec![
                GradeBand::new("A", 80.0, 100.0, "Excellent"),
                GradeBand::new("B", 65.0, 79.99, "Very good"),
                GradeBand::new("C", 50.0, 64.99, "Good"),
                GradeBand::new("D", 35.0, 49.99, "Satisfactory"),
                GradeBand::new("F", 0.0, 34.99, "Fail"),
            ],
        },
        GradingScale {
            id: "cbse_9_point".to_string(),
            name: "CBSE 9-point".to_string(),
            bands: vec![
                GradeBand::new("A1", 91.0, 100.0, "Outstanding"),
                GradeBand::new("A2", 81.0, 90.99, "Excellent"),
                GradeBand::new("B1", 71.0, 80.99, "Very good"),
                GradeBand::new("B2", 61.0, 70.99, "Good"),
                GradeBand::new("C1", 51.0, 60.99, "Above average"),
                GradeBand::new("C2", 41.0, 50.99, "Average"),
                GradeBand::new("D", 33.0, 40.99, "Pass"),
                GradeBand::new("E", 0.0, 32.99, "Needs improvement"),
            ],
        },
        GradingScale {
            id: "division".to_string(),
            name: "Division".to_string(),
            bands: vec![
                GradeBand::new("Distinction", 75.0, 100.0, ""),
                GradeBand::new("First", 60.0, 74.99, "First division"),
                GradeBand::new("Second", 45.0, 59.99, "Second division"),
                GradeBand::new("Third", 33.0, 44.99, "Third division"),
                GradeBand::new("Fail", 0.0, 32.99, ""),
            ],
        },
        GradingScale {
            id: "pass_fail".to_string(),
            name: "Pass / Fail".to_string(),
            bands: vec![
                GradeBand::new("P", 33.0, 100.0, "Pass"),
                GradeBand::new("F", 0.0, 32.99, "Fail"),
            ],
        },
        GradingScale {
            id: "letter".to_string(),
            name: "Letter (A+ to F)".to_string(),
            bands: vec![
                GradeBand::new("A+", 97.0, 100.0, ""),
                GradeBand::new("A", 93.0, 96.99, ""),
                GradeBand::new("A-", 90.0, 92.99, ""),
                GradeBand::new("B+", 87.0, 89.99, ""),
                GradeBand::new("B", 83.0, 86.99, ""),
                GradeBand::new("B-", 80.0, 82.99, ""),
                GradeBand::new("C+", 77.0, 79.99, ""),
                GradeBand::new("C", 73.0, 76.99, ""),
                GradeBand::new("C-", 70.0, 72.99, ""),
                GradeBand::new("D", 60.0, 69.99, ""),
                GradeBand::new("F", 0.0, 59.99, ""),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_scales_partition_cleanly() {
        let registry = ScaleRegistry::builtin();
        assert!(registry.get("letter").is_some());
        for scale in registry.list_scales() {
            assert!(
                scale.partition_issues().is_empty(),
                "scale {} has issues: {:?}",
                scale.id,
                scale.partition_issues()
            );
        }
    }

    #[test]
    fn test_standard_boundaries() {
        let registry = ScaleRegistry::builtin();
        let scale = registry.get("standard").unwrap();
        assert_eq!(scale.label_for(100.0).as_deref(), Some("A"));
        assert_eq!(scale.label_for(80.0).as_deref(), Some("A"));
        assert_eq!(scale.label_for(79.99).as_deref(), Some("B"));
        assert_eq!(scale.label_for(65.0).as_deref(), Some("B"));
        assert_eq!(scale.label_for(50.0).as_deref(), Some("C"));
        assert_eq!(scale.label_for(35.0).as_deref(), Some("D"));
        assert_eq!(scale.label_for(34.99).as_deref(), Some("F"));
        assert_eq!(scale.label_for(0.0).as_deref(), Some("F"));
    }

    #[test]
    fn test_letter_boundaries() {
        let registry = ScaleRegistry::builtin();
        let scale = registry.get("letter").unwrap();
        assert_eq!(scale.label_for(100.0).as_deref(), Some("A+"));
        assert_eq!(scale.label_for(97.0).as_deref(), Some("A+"));
        assert_eq!(scale.label_for(96.99).as_deref(), Some("A"));
        assert_eq!(scale.label_for(93.0).as_deref(), Some("A"));
        assert_eq!(scale.label_for(92.99).as_deref(), Some("A-"));
        assert_eq!(scale.label_for(85.5).as_deref(), Some("B"));
        assert_eq!(scale.label_for(70.0).as_deref(), Some("C-"));
        assert_eq!(scale.label_for(69.99).as_deref(), Some("D"));
        assert_eq!(scale.label_for(60.0).as_deref(), Some("D"));
        assert_eq!(scale.label_for(59.99).as_deref(), Some("F"));
        assert_eq!(scale.label_for(0.0).as_deref(), Some("F"));
    }

    #[test]
    fn test_lookup_miss_is_none() {
        let registry = ScaleRegistry::builtin();
        let scale = registry.get("standard").unwrap();
        assert!(scale.lookup(100.5).is_none());
        assert!(scale.lookup(-1.0).is_none());
    }

    #[test]
    fn test_lookup_takes_first_matching_band() {
        let scale = GradingScale {
            id: "overlapping".to_string(),
            name: "Overlapping".to_string(),
            bands: vec![
                GradeBand::new("X", 0.0, 60.0, ""),
                GradeBand::new("Y", 50.0, 100.0, ""),
            ],
        };
        assert_eq!(scale.label_for(55.0).as_deref(), Some("X"));
        assert_eq!(
            scale.partition_issues(),
            vec![PartitionIssue::Overlap {
                first: "X".to_string(),
                second: "Y".to_string()
            }]
        );
    }

    #[test]
    fn test_partition_issues_report_gaps_and_ends() {
        let scale = GradingScale {
            id: "gappy".to_string(),
            name: "Gappy".to_string(),
            bands: vec![
                GradeBand::new("HIGH", 60.0, 90.0, ""),
                GradeBand::new("LOW", 10.0, 40.0, ""),
            ],
        };
        let issues = scale.partition_issues();
        assert!(issues.contains(&PartitionIssue::UncoveredStart { first_min: 10.0 }));
        assert!(issues.contains(&PartitionIssue::UncoveredEnd { last_max: 90.0 }));
        assert!(issues.contains(&PartitionIssue::Gap {
            after: "LOW".to_string(),
            before: "HIGH".to_string()
        }));
    }

    #[test]
    fn test_custom_scales_are_appended() {
        let custom = GradingScale {
            id: "honours".to_string(),
            name: "Honours".to_string(),
            bands: vec![
                GradeBand::new("H1", 70.0, 100.0, ""),
                GradeBand::new("H2", 0.0, 69.99, ""),
            ],
        };
        let registry = ScaleRegistry::with_custom(vec![custom]).unwrap();
        let ids: Vec<&str> = registry.list_scales().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["standard", "cbse_9_point", "division", "pass_fail", "letter", "honours"]
        );
    }

    #[test]
    fn test_custom_scale_rejects_duplicates_and_empty() {
        let duplicate = GradingScale {
            id: "standard".to_string(),
            name: "Another standard".to_string(),
            bands: vec![GradeBand::new("A", 0.0, 100.0, "")],
        };
        let err = ScaleRegistry::with_custom(vec![duplicate]).unwrap_err();
        assert_eq!(err.code(), "E013");

        let empty = GradingScale {
            id: "empty".to_string(),
            name: "Empty".to_string(),
            bands: vec![],
        };
        assert!(ScaleRegistry::with_custom(vec![empty]).is_err());
    }

    #[test]
    fn test_resolve_default_and_unknown() {
        let registry = ScaleRegistry::builtin().with_default("division").unwrap();
        assert_eq!(registry.resolve(None).unwrap().id, "division");
        assert_eq!(registry.resolve(Some("pass_fail")).unwrap().id, "pass_fail");
        assert_eq!(registry.resolve(Some("nope")).unwrap_err().code(), "E008");
        assert!(ScaleRegistry::builtin().with_default("nope").is_err());
    }
}
