//! # 문자열 유틸리티
//!
//! 환경 변수 값 파싱에 사용되는 공통 문자열 함수들입니다.

/// 쉼표로 구분된 목록 파싱
///
/// 각 항목의 앞뒤 공백을 제거하고 빈 항목은 버립니다.
///
/// # 예제
/// ```rust,ignore
/// use crate::utils::string_utils::parse_list;
///
/// assert_eq!(parse_list(" /health, ,/metrics "), vec!["/health", "/metrics"]);
/// ```
pub fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// 선택적 문자열 정리
///
/// None 값이거나 빈 문자열/공백만 있는 경우 None을 반환하고,
/// 유효한 문자열인 경우 앞뒤 공백을 제거한 문자열을 Some으로 반환합니다.
///
/// # 예제
/// ```rust,ignore
/// use crate::utils::string_utils::clean_optional_string;
///
/// assert_eq!(clean_optional_string(Some("  api  ".to_string())), Some("api".to_string()));
/// assert_eq!(clean_optional_string(Some("   ".to_string())), None);
/// assert_eq!(clean_optional_string(None), None);
/// ```
pub fn clean_optional_string(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        assert_eq!(parse_list("a,b,c"), vec!["a", "b", "c"]);
        assert_eq!(parse_list(" /health , /metrics "), vec!["/health", "/metrics"]);
        assert_eq!(parse_list("alice:$2b$04$abc,, bob:x"), vec!["alice:$2b$04$abc", "bob:x"]);
        assert!(parse_list("").is_empty());
        assert!(parse_list(" , ,").is_empty());
    }

    #[test]
    fn test_clean_optional_string() {
        assert_eq!(clean_optional_string(Some("Hello".to_string())), Some("Hello".to_string()));
        assert_eq!(clean_optional_string(Some("  World  ".to_string())), Some("World".to_string()));
        assert_eq!(clean_optional_string(Some("".to_string())), None);
        assert_eq!(clean_optional_string(Some("\t\n".to_string())), None);
        assert_eq!(clean_optional_string(None), None);
    }
}
