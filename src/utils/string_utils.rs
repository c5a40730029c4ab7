//! # 문자열 유틸리티
//!
//! 요청 입력을 저장/조회에 쓰기 전에 정리하는 함수들입니다.

use serde::Deserialize;

/// 앞뒤 공백을 제거하고, 비어 있으면 `None`으로 만듭니다.
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

/// serde 필드 역직렬화용 [`clean_optional_string`]
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(clean_optional_string(opt))
}

/// 이메일은 대소문자 구분 없이 하나의 계정에 대응합니다.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// MongoDB `$regex` 검색어에 들어갈 사용자 입력의 메타 문자를 이스케이프합니다.
///
/// ```rust,ignore
/// assert_eq!(escape_regex("a.b*"), "a\\.b\\*");
/// ```
pub fn escape_regex(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(
            c,
            '\\' | '.' | '+' | '*' | '?' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$' | '#' | '-'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_optional_string() {
        assert_eq!(clean_optional_string(Some("  World  ".to_string())), Some("World".to_string()));
        assert_eq!(clean_optional_string(Some("   ".to_string())), None);
        assert_eq!(clean_optional_string(None), None);
    }

    #[test]
    fn test_deserialize_optional_string() {
        #[derive(Deserialize)]
        struct TestStruct {
            #[serde(default, deserialize_with = "deserialize_optional_string")]
            note: Option<String>,
        }

        let result: TestStruct = serde_json::from_str(r#"{"note": "  진료 메모  "}"#).unwrap();
        assert_eq!(result.note, Some("진료 메모".to_string()));

        let result: TestStruct = serde_json::from_str(r#"{"note": "\t\n"}"#).unwrap();
        assert_eq!(result.note, None);

        let result: TestStruct = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(result.note, None);
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Jane.Doe@Example.COM "), "jane.doe@example.com");
    }

    #[test]
    fn test_escape_regex() {
        assert_eq!(escape_regex("kim"), "kim");
        assert_eq!(escape_regex("a.b*"), "a\\.b\\*");
        assert_eq!(escape_regex("(.*)"), "\\(\\.\\*\\)");
        assert_eq!(escape_regex("o'neil-smith"), "o'neil\\-smith");
    }
}
