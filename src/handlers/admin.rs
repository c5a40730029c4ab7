//! Administrator HTTP Handlers
//!
//! `/api/v1/admin` 스코프 전체가 관리자 게이트 뒤에 있습니다.

use actix_web::{delete, get, patch, post, web, HttpResponse};
use serde_json::json;
use crate::core::AppError;
use crate::domain::dto::accounts::CreateAccountRequest;
use crate::domain::dto::appointments::{CreateAppointmentRequest, UpdateAppointmentRequest};
use crate::domain::dto::doctors::{CreateDoctorRequest, SearchDoctorsRequest};
use crate::domain::dto::ApiResponse;
use crate::domain::models::auth::AuthenticatedAccount;
use crate::handlers::validate_request;
use crate::services::admin::AdminService;

#[get("/accounts/{account_id}")]
pub async fn get_account(path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let response = AdminService::instance().get_account(&path).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

#[post("/accounts")]
pub async fn create_administrator(
    admin: AuthenticatedAccount,
    payload: web::Json<CreateAccountRequest>,
) -> Result<HttpResponse, AppError> {
    validate_request(&payload.0)?;

    log::info!("관리자 계정 생성 요청 - 요청자: {}", admin.account_id);

    let response = AdminService::instance()
        .create_administrator(payload.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(response)))
}

#[get("/doctors/{doctor_id}")]
pub async fn get_doctor(path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let response = AdminService::instance().get_doctor(&path).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

#[post("/doctors/search")]
pub async fn search_doctors(
    payload: web::Json<SearchDoctorsRequest>,
) -> Result<HttpResponse, AppError> {
    validate_request(&payload.0)?;

    let doctors = AdminService::instance()
        .search_doctors(payload.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(doctors)))
}

#[post("/doctors")]
pub async fn create_doctor(
    payload: web::Json<CreateDoctorRequest>,
) -> Result<HttpResponse, AppError> {
    validate_request(&payload.0)?;

    let response = AdminService::instance()
        .create_doctor(payload.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(response)))
}

#[delete("/doctors/{doctor_id}")]
pub async fn delete_doctor(
    admin: AuthenticatedAccount,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let doctor_id = path.into_inner();
    let removed = AdminService::instance().delete_doctor(&doctor_id).await?;

    log::info!("의사 삭제 - 요청자: {}, 의사: {}", admin.account_id, doctor_id);

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        json!({ "doctor_id": doctor_id, "deleted_appointments": removed }),
        "의사가 삭제되었습니다",
    )))
}

#[post("/appointments")]
pub async fn create_appointment(
    payload: web::Json<CreateAppointmentRequest>,
) -> Result<HttpResponse, AppError> {
    validate_request(&payload.0)?;

    let response = AdminService::instance()
        .create_appointment(payload.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(response)))
}

#[get("/appointments/{appointment_id}")]
pub async fn get_appointment(path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let response = AdminService::instance().get_appointment(&path).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

#[patch("/appointments/{appointment_id}")]
pub async fn update_appointment(
    path: web::Path<String>,
    payload: web::Json<UpdateAppointmentRequest>,
) -> Result<HttpResponse, AppError> {
    validate_request(&payload.0)?;

    let response = AdminService::instance()
        .update_appointment(&path, payload.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

#[delete("/appointments/{appointment_id}")]
pub async fn delete_appointment(path: web::Path<String>) -> Result<HttpResponse, AppError> {
    AdminService::instance().delete_appointment(&path).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("예약이 삭제되었습니다")))
}
