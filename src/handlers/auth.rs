//! Authentication HTTP Handlers
//!
//! - `POST /auth/login` - 이메일/비밀번호 로그인
//! - `POST /auth/register` - 환자 회원가입 (가입 즉시 토큰 발급)
//! - `GET /auth/check` - 토큰과 계정 유효성 확인 (로그인 게이트)

use actix_web::{get, post, web, HttpResponse};
use crate::core::AppError;
use crate::domain::dto::accounts::{CreateAccountRequest, LoginRequest};
use crate::domain::dto::ApiResponse;
use crate::domain::models::auth::AuthenticatedAccount;
use crate::handlers::validate_request;
use crate::services::auth::AuthService;

#[post("/login")]
pub async fn login(payload: web::Json<LoginRequest>) -> Result<HttpResponse, AppError> {
    validate_request(&payload.0)?;

    let response = AuthService::instance().login(payload.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

#[post("/register")]
pub async fn register(payload: web::Json<CreateAccountRequest>) -> Result<HttpResponse, AppError> {
    validate_request(&payload.0)?;

    log::info!("회원가입 요청 - 사용자명: {}", payload.username);

    let response = AuthService::instance().register(payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        response,
        "회원가입이 완료되었습니다",
    )))
}

/// `/check` 스코프(로그인 게이트) 안에 등록됩니다.
#[get("")]
pub async fn check(account: AuthenticatedAccount) -> Result<HttpResponse, AppError> {
    let response = AuthService::instance().check(&account).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}
