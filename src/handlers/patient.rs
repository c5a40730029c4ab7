//! Patient HTTP Handlers
//!
//! 로그인 게이트 뒤에서 본인 계정 기준으로만 동작합니다.

use actix_web::{delete, get, post, web, HttpResponse};
use crate::core::AppError;
use crate::domain::dto::ApiResponse;
use crate::domain::models::auth::AuthenticatedAccount;
use crate::services::patients::PatientService;

#[get("/me")]
pub async fn get_profile(account: AuthenticatedAccount) -> Result<HttpResponse, AppError> {
    let response = PatientService::instance().profile(&account).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

#[post("/appointments/{appointment_id}/booking")]
pub async fn book_appointment(
    account: AuthenticatedAccount,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let response = PatientService::instance()
        .book_appointment(&account, &path)
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(response)))
}

#[delete("/appointments/{appointment_id}/booking")]
pub async fn cancel_booking(
    account: AuthenticatedAccount,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let response = PatientService::instance()
        .cancel_booking(&account, &path)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}
