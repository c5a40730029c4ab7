//! JWT 토큰 발급기
//!
//! HMAC-SHA256 대칭 서명으로 시간 제한이 있는 베어러 토큰을 발급하고,
//! 요청마다 제시된 `Authorization` 헤더를 검증해 [`Claims`]를 돌려줍니다.
//!
//! 서명 비밀키는 시작 시 [`JwtConfig`]에서 한 번 받아 키 객체로 만들어 두며
//! 이후 변경되지 않으므로 요청 간 잠금 없이 공유됩니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! let authority = TokenAuthority::new(&config.jwt);
//! let token = authority.issue_token("acc-1", 3600)?;
//!
//! let header = format!("Bearer {}", token);
//! let claims = authority.verify_and_extract(Some(&header))?;
//! assert_eq!(claims.account_id, "acc-1");
//! ```

use std::collections::HashSet;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::debug;
use serde_json::Value;
use crate::config::JwtConfig;
use crate::domain::models::token::token::Claims;
use crate::services::auth::AuthError;

/// 베어러 토큰 발급/검증기
///
/// `main`에서 생성해 `ServiceLocator::set`으로 등록하며,
/// `AuthService`와 인증 미들웨어가 공유합니다.
pub struct TokenAuthority {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    has_secret: bool,
    default_ttl_seconds: i64,
}

impl TokenAuthority {
    /// 대소문자를 구분하는 인증 스킴 접두사
    pub const SCHEME: &'static str = "Bearer";

    pub fn new(config: &JwtConfig) -> Self {
        let secret = config.secret.as_bytes();

        // 만료는 주입된 시각으로 직접 판정하고, 필수 필드는 타입 디코딩에서 확인한다
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims = HashSet::new();
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            has_secret: !secret.is_empty(),
            default_ttl_seconds: config.expiration_seconds,
        }
    }

    /// 설정된 액세스 토큰 유효 시간 (초)
    pub fn default_ttl_seconds(&self) -> i64 {
        self.default_ttl_seconds
    }

    /// 현재 시각 기준으로 토큰을 발급합니다.
    pub fn issue_token(&self, subject_id: &str, ttl_seconds: i64) -> Result<String, AuthError> {
        self.issue_token_at(subject_id, ttl_seconds, Utc::now().timestamp())
    }

    /// `iat = now`, `exp = now + ttl_seconds`, `aut = true`로 서명된 토큰을 만듭니다.
    ///
    /// # Errors
    ///
    /// * `AuthError::Signing` - 비밀키가 비어 있거나 인코딩에 실패한 경우
    pub fn issue_token_at(
        &self,
        subject_id: &str,
        ttl_seconds: i64,
        now: i64,
    ) -> Result<String, AuthError> {
        if !self.has_secret {
            return Err(AuthError::Signing("signing secret is empty".to_string()));
        }

        let claims = Claims::new(subject_id, now, ttl_seconds);

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))?;

        debug!("🎫 토큰 발급: {} (exp {})", claims.account_id, claims.exp);
        Ok(token)
    }

    /// 현재 시각 기준으로 헤더 값을 검증합니다.
    pub fn verify_and_extract(&self, header: Option<&str>) -> Result<Claims, AuthError> {
        self.verify_and_extract_at(header, Utc::now().timestamp())
    }

    /// `Authorization` 헤더 값을 검증하고 클레임을 돌려줍니다.
    ///
    /// 1. 헤더가 없거나 비어 있으면 `MissingHeader`
    /// 2. `Bearer ` 접두사가 없으면 `MalformedHeader`
    /// 3. 서명 불일치 또는 손상된 토큰이면 `InvalidSignature`
    /// 4. `now >= exp`이면 `Expired`
    /// 5. 클레임 구조가 맞지 않으면 `MalformedClaims`
    /// 6. `aid`가 비어 있으면 `MissingSubject`
    pub fn verify_and_extract_at(
        &self,
        header: Option<&str>,
        now: i64,
    ) -> Result<Claims, AuthError> {
        let token = Self::extract_bearer_token(header)?;

        if !self.has_secret {
            return Err(AuthError::InvalidSignature(
                "verification secret is empty".to_string(),
            ));
        }

        let payload = decode::<Value>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AuthError::InvalidSignature(e.to_string()))?
            .claims;

        let exp = payload
            .get("exp")
            .and_then(Value::as_i64)
            .ok_or_else(|| AuthError::MalformedClaims("exp is missing or not an integer".to_string()))?;

        if Claims::is_expired(exp, now) {
            return Err(AuthError::Expired);
        }

        let claims: Claims = serde_json::from_value(payload)
            .map_err(|e| AuthError::MalformedClaims(e.to_string()))?;

        if claims.account_id.trim().is_empty() {
            return Err(AuthError::MissingSubject);
        }

        Ok(claims)
    }

    /// `Bearer <token>` 형식에서 토큰 부분만 잘라냅니다.
    ///
    /// 앞뒤 공백은 무시하지만 스킴과 토큰 사이는 정확히 공백 하나여야 합니다.
    pub fn extract_bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
        let value = header
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(AuthError::MissingHeader)?;

        let token = value
            .strip_prefix(Self::SCHEME)
            .and_then(|rest| rest.strip_prefix(' '))
            .ok_or(AuthError::MalformedHeader)?;

        if token.is_empty() || token.contains(char::is_whitespace) {
            return Err(AuthError::MalformedHeader);
        }

        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const T0: i64 = 1_700_000_000;

    fn authority(secret: &str) -> TokenAuthority {
        TokenAuthority::new(&JwtConfig {
            secret: secret.to_string(),
            expiration_seconds: 3600,
        })
    }

    fn bearer(token: &str) -> String {
        format!("Bearer {}", token)
    }

    fn sign_raw(secret: &str, payload: &Value) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            payload,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_token_valid_within_ttl_window() {
        let authority = authority("s1");
        let token = authority.issue_token_at("acc-1", 60, T0).unwrap();
        let header = bearer(&token);

        for now in [T0, T0 + 1, T0 + 59] {
            let claims = authority.verify_and_extract_at(Some(&header), now).unwrap();
            assert_eq!(claims.account_id, "acc-1");
            assert_eq!(claims.iat, T0);
            assert_eq!(claims.exp, T0 + 60);
            assert!(claims.authorized);
        }
    }

    #[test]
    fn test_token_expires_at_ttl_boundary() {
        let authority = authority("s1");
        let token = authority.issue_token_at("acc-1", 60, T0).unwrap();
        let header = bearer(&token);

        for now in [T0 + 60, T0 + 61, T0 + 86_400] {
            let result = authority.verify_and_extract_at(Some(&header), now);
            assert!(matches!(result, Err(AuthError::Expired)), "now = {}", now);
        }
    }

    #[test]
    fn test_wrong_secret_is_invalid_signature() {
        let token = authority("s1").issue_token_at("acc-1", 60, T0).unwrap();

        let result = authority("s2").verify_and_extract_at(Some(&bearer(&token)), T0);
        assert!(matches!(result, Err(AuthError::InvalidSignature(_))));
    }

    #[test]
    fn test_garbage_token_is_invalid_signature() {
        let result = authority("s1").verify_and_extract_at(Some("Bearer not.a.jwt"), T0);
        assert!(matches!(result, Err(AuthError::InvalidSignature(_))));
    }

    #[test]
    fn test_missing_or_empty_header() {
        let authority = authority("s1");

        assert!(matches!(
            authority.verify_and_extract_at(None, T0),
            Err(AuthError::MissingHeader)
        ));
        assert!(matches!(
            authority.verify_and_extract_at(Some(""), T0),
            Err(AuthError::MissingHeader)
        ));
        assert!(matches!(
            authority.verify_and_extract_at(Some("   "), T0),
            Err(AuthError::MissingHeader)
        ));
    }

    #[test]
    fn test_header_without_bearer_prefix_is_malformed() {
        let token = authority("s1").issue_token_at("acc-1", 60, T0).unwrap();

        for header in [
            token.clone(),
            format!("bearer {}", token),
            format!("Token {}", token),
            format!("Bearer  {}", token),
            format!("Bearer{}", token),
            "Bearer".to_string(),
        ] {
            assert!(
                matches!(
                    TokenAuthority::extract_bearer_token(Some(&header)),
                    Err(AuthError::MalformedHeader)
                ),
                "header = {:?}",
                header
            );
        }
    }

    #[test]
    fn test_surrounding_whitespace_is_tolerated() {
        let authority = authority("s1");
        let token = authority.issue_token_at("acc-1", 60, T0).unwrap();
        let header = format!("  Bearer {}\t", token);

        assert!(authority.verify_and_extract_at(Some(&header), T0).is_ok());
    }

    #[test]
    fn test_empty_secret_fails_to_sign() {
        let result = authority("").issue_token_at("acc-1", 60, T0);
        assert!(matches!(result, Err(AuthError::Signing(_))));
    }

    #[test]
    fn test_missing_claim_field_is_malformed() {
        let token = sign_raw("s1", &json!({ "aid": "acc-1", "iat": T0, "exp": T0 + 60 }));

        let result = authority("s1").verify_and_extract_at(Some(&bearer(&token)), T0);
        assert!(matches!(result, Err(AuthError::MalformedClaims(_))));
    }

    #[test]
    fn test_missing_expiry_is_malformed() {
        let token = sign_raw("s1", &json!({ "aid": "acc-1", "iat": T0, "aut": true }));

        let result = authority("s1").verify_and_extract_at(Some(&bearer(&token)), T0);
        assert!(matches!(result, Err(AuthError::MalformedClaims(_))));
    }

    #[test]
    fn test_empty_subject_is_rejected() {
        let authority = authority("s1");
        let token = authority.issue_token_at("", 60, T0).unwrap();

        let result = authority.verify_and_extract_at(Some(&bearer(&token)), T0);
        assert!(matches!(result, Err(AuthError::MissingSubject)));
    }

    #[test]
    fn test_default_ttl_comes_from_config() {
        assert_eq!(authority("s1").default_ttl_seconds(), 3600);
    }
}
