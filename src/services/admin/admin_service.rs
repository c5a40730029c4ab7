//! # 관리자 서비스 구현
//!
//! 관리자 게이트를 통과한 요청만 이 서비스에 도달합니다.
//!
//! | 작업 | 트랜잭션 |
//! |---|---|
//! | 관리자 계정 생성 | 중복 확인 + 삽입 |
//! | 의사 등록 | 동명 확인 + 삽입 |
//! | 의사 삭제 | 의사 삭제 + 소속 예약 연쇄 삭제 |
//! | 예약 슬롯 생성 | 의사 존재 확인 + 삽입 |
//! | 예약 슬롯 수정 | 현재 예약 인원 확인 + 갱신 |

use std::sync::Arc;
use log::info;
use mongodb::bson::{doc, Document};
use singleton_macro::service;
use crate::core::AppError;
use crate::db::Database;
use crate::domain::dto::accounts::{AccountResponse, CreateAccountRequest};
use crate::domain::dto::appointments::{
    AppointmentResponse, CreateAppointmentRequest, UpdateAppointmentRequest,
};
use crate::domain::dto::doctors::{CreateDoctorRequest, DoctorResponse, SearchDoctorsRequest};
use crate::domain::entities::{AccountRole, Appointment, Doctor};
use crate::repositories::appointments::AppointmentRepository;
use crate::repositories::doctors::DoctorRepository;
use crate::services::accounts::AccountService;

#[service(name = "admin")]
pub struct AdminService {
    account_service: Arc<AccountService>,
    doctor_repo: Arc<DoctorRepository>,
    appointment_repo: Arc<AppointmentRepository>,
    db: Arc<Database>,
}

impl AdminService {
    pub async fn get_account(&self, account_id: &str) -> Result<AccountResponse, AppError> {
        let account = self.account_service.get_account(account_id).await?;
        Ok(AccountResponse::from(account))
    }

    pub async fn create_administrator(
        &self,
        request: CreateAccountRequest,
    ) -> Result<AccountResponse, AppError> {
        let account = self
            .account_service
            .create_account(request, AccountRole::Administrator)
            .await?;

        Ok(AccountResponse::from(account))
    }

    pub async fn get_doctor(&self, doctor_id: &str) -> Result<DoctorResponse, AppError> {
        self.doctor_repo
            .find_by_id(doctor_id)
            .await?
            .map(DoctorResponse::from)
            .ok_or_else(|| AppError::NotFound("의사를 찾을 수 없습니다".to_string()))
    }

    pub async fn search_doctors(
        &self,
        request: SearchDoctorsRequest,
    ) -> Result<Vec<DoctorResponse>, AppError> {
        let doctors = self.doctor_repo.search_by_name(&request.keyword).await?;
        Ok(doctors.into_iter().map(DoctorResponse::from).collect())
    }

    /// 같은 성/이름의 의사가 이미 있으면 `ConflictError`
    pub async fn create_doctor(&self, request: CreateDoctorRequest) -> Result<DoctorResponse, AppError> {
        let doctor = Doctor::new(
            request.first_name.trim().to_string(),
            request.last_name.trim().to_string(),
        );

        let repo = Arc::clone(&self.doctor_repo);
        let created = self
            .db
            .transaction(move |session| {
                Box::pin(async move {
                    let session = session.client_session();

                    if repo
                        .exists_by_name(&doctor.first_name, &doctor.last_name, session)
                        .await?
                    {
                        return Err(AppError::ConflictError(format!(
                            "이미 등록된 의사입니다: {}",
                            doctor.full_name()
                        )));
                    }

                    repo.insert(&doctor, session).await?;
                    Ok(doctor)
                })
            })
            .await?;

        info!("🩺 의사 등록: {} ({})", created.full_name(), created.doctor_id);
        Ok(DoctorResponse::from(created))
    }

    /// 의사와 그 의사의 예약 슬롯을 함께 삭제하고, 삭제된 슬롯 수를 돌려줍니다.
    pub async fn delete_doctor(&self, doctor_id: &str) -> Result<u64, AppError> {
        let doctor_repo = Arc::clone(&self.doctor_repo);
        let appointment_repo = Arc::clone(&self.appointment_repo);
        let doctor_id = doctor_id.to_string();

        let removed = self
            .db
            .transaction(move |session| {
                Box::pin(async move {
                    let session = session.client_session();

                    doctor_repo.delete(&doctor_id, session).await?;
                    let removed = appointment_repo.delete_by_doctor(&doctor_id, session).await?;

                    info!("🗑️ 의사 삭제: {} (예약 {}건 연쇄 삭제)", doctor_id, removed);
                    Ok::<_, AppError>(removed)
                })
            })
            .await?;

        Ok(removed)
    }

    /// 존재하는 의사에 대해서만 예약 슬롯을 만듭니다.
    pub async fn create_appointment(
        &self,
        request: CreateAppointmentRequest,
    ) -> Result<AppointmentResponse, AppError> {
        let appointment = Appointment::new(
            request.doctor_id.trim().to_string(),
            request.description.trim().to_string(),
            request.max_appointment,
        );

        let doctor_repo = Arc::clone(&self.doctor_repo);
        let appointment_repo = Arc::clone(&self.appointment_repo);
        let created = self
            .db
            .transaction(move |session| {
                Box::pin(async move {
                    let session = session.client_session();

                    if !doctor_repo.exists(&appointment.doctor_id, session).await? {
                        return Err(AppError::NotFound(format!(
                            "의사를 찾을 수 없습니다: {}",
                            appointment.doctor_id
                        )));
                    }

                    appointment_repo.insert(&appointment, session).await?;
                    Ok(appointment)
                })
            })
            .await?;

        info!("📅 예약 슬롯 생성: {} (의사 {})", created.appointment_id, created.doctor_id);
        Ok(AppointmentResponse::from(created))
    }

    pub async fn get_appointment(&self, appointment_id: &str) -> Result<AppointmentResponse, AppError> {
        self.appointment_repo
            .find_by_id(appointment_id)
            .await?
            .map(AppointmentResponse::from)
            .ok_or_else(|| AppError::NotFound("예약을 찾을 수 없습니다".to_string()))
    }

    /// 정원을 현재 예약 인원보다 작게 줄이면 `ConflictError`
    pub async fn update_appointment(
        &self,
        appointment_id: &str,
        request: UpdateAppointmentRequest,
    ) -> Result<AppointmentResponse, AppError> {
        let repo = Arc::clone(&self.appointment_repo);
        let appointment_id = appointment_id.to_string();

        let updated = self
            .db
            .transaction(move |session| {
                Box::pin(async move {
                    let session = session.client_session();

                    let current = repo
                        .find_in_session(&appointment_id, session)
                        .await?
                        .ok_or_else(|| AppError::NotFound("예약을 찾을 수 없습니다".to_string()))?;

                    ensure_capacity_fits(&current, &request)?;

                    repo.update(&appointment_id, appointment_changes(&request), session)
                        .await?
                        .ok_or_else(|| AppError::NotFound("예약을 찾을 수 없습니다".to_string()))
                })
            })
            .await?;

        Ok(AppointmentResponse::from(updated))
    }

    pub async fn delete_appointment(&self, appointment_id: &str) -> Result<(), AppError> {
        if !self.appointment_repo.delete(appointment_id).await? {
            return Err(AppError::NotFound("예약을 찾을 수 없습니다".to_string()));
        }

        info!("🗑️ 예약 슬롯 삭제: {}", appointment_id);
        Ok(())
    }
}

/// 요청에 값이 있는 필드만 `$set` 대상 문서로 만듭니다.
fn appointment_changes(request: &UpdateAppointmentRequest) -> Document {
    let mut changes = doc! {};
    if let Some(description) = &request.description {
        changes.insert("description", description.trim());
    }
    if let Some(max_appointment) = request.max_appointment {
        changes.insert("max_appointment", max_appointment);
    }
    changes
}

fn ensure_capacity_fits(
    current: &Appointment,
    request: &UpdateAppointmentRequest,
) -> Result<(), AppError> {
    match request.max_appointment {
        Some(max) if (max.max(0) as usize) < current.patient_account_ids.len() => {
            Err(AppError::ConflictError(format!(
                "이미 {}명이 예약되어 있어 정원을 {}명으로 줄일 수 없습니다",
                current.patient_account_ids.len(),
                max
            )))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booked_appointment(patients: usize, max: i32) -> Appointment {
        let mut appointment = Appointment::new("doc-1".to_string(), "checkup".to_string(), max);
        appointment.patient_account_ids = (0..patients).map(|i| format!("acc-{}", i)).collect();
        appointment
    }

    #[test]
    fn test_changes_contain_only_present_fields() {
        let request = UpdateAppointmentRequest {
            description: None,
            max_appointment: Some(7),
        };

        let changes = appointment_changes(&request);
        assert_eq!(changes.get_i32("max_appointment").unwrap(), 7);
        assert!(!changes.contains_key("description"));
    }

    #[test]
    fn test_description_is_trimmed() {
        let request = UpdateAppointmentRequest {
            description: Some("  follow-up  ".to_string()),
            max_appointment: None,
        };

        let changes = appointment_changes(&request);
        assert_eq!(changes.get_str("description").unwrap(), "follow-up");
    }

    #[test]
    fn test_capacity_cannot_drop_below_bookings() {
        let current = booked_appointment(3, 5);

        let shrink = UpdateAppointmentRequest {
            description: None,
            max_appointment: Some(2),
        };
        assert!(matches!(
            ensure_capacity_fits(&current, &shrink),
            Err(AppError::ConflictError(_))
        ));

        let exact = UpdateAppointmentRequest {
            description: None,
            max_appointment: Some(3),
        };
        assert!(ensure_capacity_fits(&current, &exact).is_ok());
    }
}
