use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{GradebookError, Result};
use crate::models::results::requests::MarksInput;

static MARKS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)$").expect("Invalid marks regex"));

static SCALE_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,64}$").expect("Invalid scale id regex"));

/// 解析分数输入
///
/// 文本会去除首尾空白后按十进制数解析；空白文本视为清除分数（返回 `None`）。
/// 范围检查由评分引擎负责。
pub fn parse_marks_input(input: Option<MarksInput>) -> Result<Option<f64>> {
    match input {
        None => Ok(None),
        Some(MarksInput::Number(marks)) => Ok(Some(marks)),
        Some(MarksInput::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            if !MARKS_RE.is_match(text) {
                return Err(GradebookError::input_validation(format!(
                    "Marks must be a number, got '{text}'"
                )));
            }
            text.parse::<f64>().map(Some).map_err(|_| {
                GradebookError::input_validation(format!("Marks must be a number, got '{text}'"))
            })
        }
    }
}

/// 校验评语长度（按字符计，去除首尾空白后）
pub fn validate_remarks(remarks: Option<&str>, max_length: usize) -> Result<()> {
    let Some(remarks) = remarks else {
        return Ok(());
    };
    let length = remarks.trim().chars().count();
    if length > max_length {
        return Err(GradebookError::input_validation(format!(
            "Remarks must be at most {max_length} characters, got {length}"
        )));
    }
    Ok(())
}

pub fn validate_scale_id(scale_id: &str) -> Result<()> {
    if !SCALE_ID_RE.is_match(scale_id) {
        return Err(GradebookError::input_validation(format!(
            "Invalid grading scale id '{scale_id}'"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Option<MarksInput> {
        Some(MarksInput::Text(s.to_string()))
    }

    #[test]
    fn test_parse_numbers_and_text() {
        assert_eq!(parse_marks_input(Some(MarksInput::Number(42.5))).unwrap(), Some(42.5));
        assert_eq!(parse_marks_input(text("35")).unwrap(), Some(35.0));
        assert_eq!(parse_marks_input(text(" 34.5 ")).unwrap(), Some(34.5));
        assert_eq!(parse_marks_input(text(".5")).unwrap(), Some(0.5));
        assert_eq!(parse_marks_input(text("-1")).unwrap(), Some(-1.0));
    }

    #[test]
    fn test_blank_text_clears() {
        assert_eq!(parse_marks_input(None).unwrap(), None);
        assert_eq!(parse_marks_input(text("")).unwrap(), None);
        assert_eq!(parse_marks_input(text("   ")).unwrap(), None);
    }

    #[test]
    fn test_non_numeric_text_is_rejected() {
        for bad in ["abc", "12a", "NaN", "inf", "1e3", "3,5", "--1"] {
            let err = parse_marks_input(text(bad)).unwrap_err();
            assert_eq!(err.code(), "E007", "input {bad}");
        }
    }

    #[test]
    fn test_marks_input_deserializes_untagged() {
        let number: MarksInput = serde_json::from_str("12").unwrap();
        assert_eq!(number, MarksInput::Number(12.0));
        let text: MarksInput = serde_json::from_str("\"12\"").unwrap();
        assert_eq!(text, MarksInput::Text("12".to_string()));
    }

    #[test]
    fn test_remarks_length() {
        assert!(validate_remarks(None, 5).is_ok());
        assert!(validate_remarks(Some("  good  "), 5).is_ok());
        assert!(validate_remarks(Some("excellent"), 5).is_err());
        // 按字符而不是字节计数
        assert!(validate_remarks(Some("很好很好很"), 5).is_ok());
    }

    #[test]
    fn test_scale_id() {
        assert!(validate_scale_id("cbse_9_point").is_ok());
        assert!(validate_scale_id("").is_err());
        assert!(validate_scale_id("bad id").is_err());
    }
}
