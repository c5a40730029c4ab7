//! 토큰 발급·검증·권한 확인 실패 분류

use std::fmt;
use thiserror::Error;

/// 요청 인증 상태 머신의 단계
///
/// `NoHeader → HeaderExtracted → TokenExtracted → SignatureValid → Authenticated`
/// 순서로만 진행하며, 어느 전이에서든 실패하면 그 요청은 종료됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStage {
    NoHeader,
    HeaderExtracted,
    TokenExtracted,
    SignatureValid,
    Authenticated,
}

impl fmt::Display for AuthStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AuthStage::NoHeader => "no-header",
            AuthStage::HeaderExtracted => "header-extracted",
            AuthStage::TokenExtracted => "token-extracted",
            AuthStage::SignatureValid => "signature-valid",
            AuthStage::Authenticated => "authenticated",
        };
        f.write_str(name)
    }
}

/// 토큰 발급기와 권한 확인 실패
///
/// 인증 실패(`MissingHeader` ~ `MissingSubject`)는 호출자에게 모두
/// "unauthorized"로만 노출되고 원인은 로그에만 남습니다.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authorization header is missing")]
    MissingHeader,

    #[error("authorization header is not a bearer credential")]
    MalformedHeader,

    #[error("token signature is invalid: {0}")]
    InvalidSignature(String),

    #[error("token has expired")]
    Expired,

    #[error("token claims are malformed: {0}")]
    MalformedClaims(String),

    #[error("token subject is empty")]
    MissingSubject,

    #[error("account not found: {0}")]
    NotFound(String),

    #[error("administrator role required")]
    Forbidden,

    #[error("token signing failed: {0}")]
    Signing(String),

    #[error("account lookup failed: {0}")]
    Lookup(String),
}

impl AuthError {
    /// 실패가 발생한 시점에 머물러 있던 단계
    ///
    /// 토큰 발급 실패(`Signing`)는 요청 검증 흐름 밖이므로 `None`입니다.
    pub fn stage(&self) -> Option<AuthStage> {
        let stage = match self {
            AuthError::Signing(_) => return None,
            AuthError::MissingHeader => AuthStage::NoHeader,
            AuthError::MalformedHeader => AuthStage::HeaderExtracted,
            AuthError::InvalidSignature(_) => AuthStage::TokenExtracted,
            AuthError::Expired | AuthError::MalformedClaims(_) | AuthError::MissingSubject => {
                AuthStage::SignatureValid
            }
            AuthError::NotFound(_) | AuthError::Forbidden | AuthError::Lookup(_) => {
                AuthStage::Authenticated
            }
        };
        Some(stage)
    }

    /// 토큰 자체가 거부된 경우 (계정 조회 이전 단계)
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            AuthError::MissingHeader
                | AuthError::MalformedHeader
                | AuthError::InvalidSignature(_)
                | AuthError::Expired
                | AuthError::MalformedClaims(_)
                | AuthError::MissingSubject
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_follows_state_machine_order() {
        assert_eq!(AuthError::MissingHeader.stage(), Some(AuthStage::NoHeader));
        assert_eq!(AuthError::MalformedHeader.stage(), Some(AuthStage::HeaderExtracted));
        assert_eq!(
            AuthError::InvalidSignature("mac".into()).stage(),
            Some(AuthStage::TokenExtracted)
        );
        assert_eq!(AuthError::Expired.stage(), Some(AuthStage::SignatureValid));
        assert_eq!(AuthError::MissingSubject.stage(), Some(AuthStage::SignatureValid));
        assert_eq!(AuthError::Forbidden.stage(), Some(AuthStage::Authenticated));
    }

    #[test]
    fn test_signing_failure_has_no_request_stage() {
        assert_eq!(AuthError::Signing("empty secret".into()).stage(), None);
    }

    #[test]
    fn test_authorization_failures_are_not_authentication_failures() {
        assert!(AuthError::Expired.is_authentication_failure());
        assert!(!AuthError::Forbidden.is_authentication_failure());
        assert!(!AuthError::NotFound("acc-1".into()).is_authentication_failure());
        assert!(!AuthError::Signing("empty".into()).is_authentication_failure());
    }
}
