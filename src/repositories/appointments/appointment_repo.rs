//! # 예약 리포지토리 구현
//!
//! 예약 슬롯과 슬롯별 환자 목록을 관리합니다.
//! 환자 추가/제거는 조건부 갱신으로 수행되어, 같은 환자의 중복 예약과
//! 정원 초과가 저장소 수준에서도 막힙니다.

use std::sync::Arc;
use mongodb::{
    bson::{doc, DateTime, Document},
    options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument},
    ClientSession, IndexModel,
};
use singleton_macro::repository;
use crate::core::AppError;
use crate::db::Database;
use crate::domain::entities::Appointment;

/// 예약 슬롯 리포지토리
///
/// ## 인덱스
///
/// - `appointment_id` (unique)
/// - `doctor_id` (의사 삭제 시 연쇄 삭제 조회용)
#[repository(name = "appointment", collection = "appointments")]
pub struct AppointmentRepository {
    db: Arc<Database>,
}

impl AppointmentRepository {
    pub async fn find_by_id(&self, appointment_id: &str) -> Result<Option<Appointment>, AppError> {
        self.collection::<Appointment>()
            .find_one(doc! { "appointment_id": appointment_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// 트랜잭션 스냅샷에서 예약을 조회합니다.
    pub async fn find_in_session(
        &self,
        appointment_id: &str,
        session: &mut ClientSession,
    ) -> Result<Option<Appointment>, AppError> {
        self.collection::<Appointment>()
            .find_one(doc! { "appointment_id": appointment_id })
            .session(session)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn insert(
        &self,
        appointment: &Appointment,
        session: &mut ClientSession,
    ) -> Result<(), AppError> {
        self.collection::<Appointment>()
            .insert_one(appointment)
            .session(session)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    /// `changes`의 필드를 `$set`으로 반영하고 갱신된 문서를 돌려줍니다.
    pub async fn update(
        &self,
        appointment_id: &str,
        mut changes: Document,
        session: &mut ClientSession,
    ) -> Result<Option<Appointment>, AppError> {
        changes.insert("updated_at", DateTime::now());

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        self.collection::<Appointment>()
            .find_one_and_update(
                doc! { "appointment_id": appointment_id },
                doc! { "$set": changes },
            )
            .with_options(options)
            .session(session)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn delete(&self, appointment_id: &str) -> Result<bool, AppError> {
        let result = self
            .collection::<Appointment>()
            .delete_one(doc! { "appointment_id": appointment_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(result.deleted_count > 0)
    }

    /// 의사에 속한 예약 슬롯을 모두 삭제하고 삭제 건수를 돌려줍니다.
    pub async fn delete_by_doctor(
        &self,
        doctor_id: &str,
        session: &mut ClientSession,
    ) -> Result<u64, AppError> {
        let result = self
            .collection::<Appointment>()
            .delete_many(doc! { "doctor_id": doctor_id })
            .session(session)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(result.deleted_count)
    }

    /// 아직 예약하지 않았고 정원이 남아 있을 때만 환자를 추가합니다.
    ///
    /// 조건이 맞지 않아 갱신되지 않으면 `false`를 돌려줍니다.
    pub async fn add_patient(
        &self,
        appointment_id: &str,
        account_id: &str,
        session: &mut ClientSession,
    ) -> Result<bool, AppError> {
        let result = self
            .collection::<Appointment>()
            .update_one(
                doc! {
                    "appointment_id": appointment_id,
                    "patient_account_ids": { "$ne": account_id },
                    "$expr": {
                        "$lt": [
                            { "$size": { "$ifNull": ["$patient_account_ids", []] } },
                            "$max_appointment",
                        ]
                    },
                },
                doc! {
                    "$push": { "patient_account_ids": account_id },
                    "$set": { "updated_at": DateTime::now() },
                },
            )
            .session(session)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(result.modified_count > 0)
    }

    pub async fn remove_patient(
        &self,
        appointment_id: &str,
        account_id: &str,
        session: &mut ClientSession,
    ) -> Result<bool, AppError> {
        let result = self
            .collection::<Appointment>()
            .update_one(
                doc! { "appointment_id": appointment_id, "patient_account_ids": account_id },
                doc! {
                    "$pull": { "patient_account_ids": account_id },
                    "$set": { "updated_at": DateTime::now() },
                },
            )
            .session(session)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(result.modified_count > 0)
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let id_index = IndexModel::builder()
            .keys(doc! { "appointment_id": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("appointment_id_unique".to_string())
                .build())
            .build();

        let doctor_index = IndexModel::builder()
            .keys(doc! { "doctor_id": 1 })
            .options(IndexOptions::builder()
                .name("doctor_id".to_string())
                .build())
            .build();

        self.collection::<Appointment>()
            .create_indexes([id_index, doctor_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
