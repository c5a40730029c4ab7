//! # 환자 서비스 구현
//!
//! 로그인한 계정의 프로필 조회와 진료 예약/취소를 담당합니다.
//! 예약과 취소는 스냅샷 트랜잭션에서 현재 예약 상태를 읽고 판단한 뒤
//! 조건부 갱신으로 반영됩니다.

use std::sync::Arc;
use log::info;
use singleton_macro::service;
use crate::core::AppError;
use crate::db::Database;
use crate::domain::dto::accounts::AccountResponse;
use crate::domain::dto::appointments::BookingResponse;
use crate::domain::entities::Appointment;
use crate::domain::models::auth::AuthenticatedAccount;
use crate::repositories::appointments::AppointmentRepository;
use crate::services::accounts::AccountService;

#[service(name = "patient")]
pub struct PatientService {
    account_service: Arc<AccountService>,
    appointment_repo: Arc<AppointmentRepository>,
    db: Arc<Database>,
}

impl PatientService {
    pub async fn profile(&self, principal: &AuthenticatedAccount) -> Result<AccountResponse, AppError> {
        let account = self.account_service.get_account(&principal.account_id).await?;
        Ok(AccountResponse::from(account))
    }

    /// 예약 슬롯에 본인을 추가합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::NotFound` - 예약 슬롯 없음
    /// * `AppError::ConflictError` - 이미 예약했거나 정원 초과
    pub async fn book_appointment(
        &self,
        principal: &AuthenticatedAccount,
        appointment_id: &str,
    ) -> Result<BookingResponse, AppError> {
        let repo = Arc::clone(&self.appointment_repo);
        let account_id = principal.account_id.clone();
        let appointment_id = appointment_id.to_string();

        let booked = self
            .db
            .transaction(move |session| {
                Box::pin(async move {
                    let session = session.client_session();

                    let mut appointment = repo
                        .find_in_session(&appointment_id, session)
                        .await?
                        .ok_or_else(|| AppError::NotFound("예약을 찾을 수 없습니다".to_string()))?;

                    ensure_bookable(&appointment, &account_id)?;

                    if !repo.add_patient(&appointment_id, &account_id, session).await? {
                        return Err(AppError::ConflictError(
                            "예약 상태가 변경되었습니다. 다시 시도해주세요".to_string(),
                        ));
                    }

                    appointment.patient_account_ids.push(account_id.clone());
                    Ok(BookingResponse::for_patient(&appointment, &account_id))
                })
            })
            .await?;

        info!("✅ 진료 예약: {} → {}", principal.account_id, booked.appointment_id);
        Ok(booked)
    }

    /// 본인의 예약을 취소합니다. 예약 내역이 없으면 `NotFound`입니다.
    pub async fn cancel_booking(
        &self,
        principal: &AuthenticatedAccount,
        appointment_id: &str,
    ) -> Result<BookingResponse, AppError> {
        let repo = Arc::clone(&self.appointment_repo);
        let account_id = principal.account_id.clone();
        let appointment_id = appointment_id.to_string();

        let cancelled = self
            .db
            .transaction(move |session| {
                Box::pin(async move {
                    let session = session.client_session();

                    let mut appointment = repo
                        .find_in_session(&appointment_id, session)
                        .await?
                        .ok_or_else(|| AppError::NotFound("예약을 찾을 수 없습니다".to_string()))?;

                    if !appointment.has_patient(&account_id)
                        || !repo.remove_patient(&appointment_id, &account_id, session).await?
                    {
                        return Err(AppError::NotFound("예약 내역이 없습니다".to_string()));
                    }

                    appointment.patient_account_ids.retain(|id| id != &account_id);
                    Ok(BookingResponse::for_patient(&appointment, &account_id))
                })
            })
            .await?;

        info!("↩️ 예약 취소: {} → {}", principal.account_id, cancelled.appointment_id);
        Ok(cancelled)
    }
}

fn ensure_bookable(appointment: &Appointment, account_id: &str) -> Result<(), AppError> {
    if appointment.has_patient(account_id) {
        return Err(AppError::ConflictError("이미 예약된 진료입니다".to_string()));
    }
    if appointment.is_full() {
        return Err(AppError::ConflictError("예약 정원이 가득 찼습니다".to_string()));
    }
    Ok(())
}
