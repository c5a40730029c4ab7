//! 베어러 토큰 클레임과 발급 응답 구조체
//!
//! 페이로드 필드 이름은 짧은 키(`aid`, `iat`, `exp`, `aut`)로 고정되어 있으며
//! 다른 클라이언트와 공유되는 와이어 형식입니다.

use serde::{Deserialize, Serialize};

/// 액세스 토큰 페이로드
///
/// - `aid`: 토큰 주체 (계정 ID)
/// - `iat`: 발급 시각 (Unix 초)
/// - `exp`: 만료 시각 (Unix 초, 이 시각부터 무효)
/// - `aut`: 인증 플래그 (발급 시 항상 `true`)
///
/// 네 필드 모두 필수입니다. 하나라도 없거나 타입이 맞지 않으면
/// 디코딩 단계에서 거부됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "aid")]
    pub account_id: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(rename = "aut")]
    pub authorized: bool,
}

impl Claims {
    pub fn new(account_id: impl Into<String>, issued_at: i64, ttl_seconds: i64) -> Self {
        Self {
            account_id: account_id.into(),
            iat: issued_at,
            exp: issued_at.saturating_add(ttl_seconds),
            authorized: true,
        }
    }

    /// 토큰은 `[iat, exp)` 구간에서만 유효합니다.
    ///
    /// 클레임 전체를 역직렬화하기 전에 `exp`만으로 판단할 수 있도록 값을 받습니다.
    pub fn is_expired(exp: i64, now: i64) -> bool {
        now >= exp
    }
}

/// 로그인/회원가입 성공 시 클라이언트에 전달되는 토큰
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
    /// 만료까지 남은 시간 (초)
    pub expires_in: i64,
}

impl AccessToken {
    pub fn bearer(access_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in,
        }
    }
}
