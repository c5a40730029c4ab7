use std::future::{ready, Ready};
use actix_web::{dev::Payload, Error, FromRequest, HttpMessage, HttpRequest};
use serde::{Deserialize, Serialize};
use crate::core::errors::{AppError, UNAUTHORIZED_MESSAGE};
use crate::domain::models::token::Claims;

/// 검증된 토큰에서 추출한 인증 주체
///
/// 인증 미들웨어가 요청 확장(extensions)에 넣고, 핸들러는 인자로 받아 사용합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedAccount {
    pub account_id: String,
    pub issued_at: i64,
    pub expires_at: i64,
}

impl From<Claims> for AuthenticatedAccount {
    fn from(claims: Claims) -> Self {
        Self {
            account_id: claims.account_id,
            issued_at: claims.iat,
            expires_at: claims.exp,
        }
    }
}

/// ActixWeb FromRequest trait 구현
///
/// 미들웨어를 거치지 않은 경로에서 사용하면 401을 돌려줍니다.
impl FromRequest for AuthenticatedAccount {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedAccount>() {
            Some(account) => ready(Ok(account.clone())),
            None => ready(Err(
                AppError::AuthenticationError(UNAUTHORIZED_MESSAGE.to_string()).into(),
            )),
        }
    }
}
