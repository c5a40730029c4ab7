//! # 의사 리포지토리 구현

use std::sync::Arc;
use futures_util::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, ClientSession, IndexModel};
use singleton_macro::repository;
use crate::core::AppError;
use crate::db::Database;
use crate::domain::entities::Doctor;
use crate::repositories::map_write_error;
use crate::utils::string_utils::escape_regex;

/// 의사 디렉터리 리포지토리
///
/// ## 인덱스
///
/// - `doctor_id` (unique)
/// - `last_name` + `first_name` (unique, 동명 의사 중복 등록 방지)
#[repository(name = "doctor", collection = "doctors")]
pub struct DoctorRepository {
    db: Arc<Database>,
}

impl DoctorRepository {
    pub async fn find_by_id(&self, doctor_id: &str) -> Result<Option<Doctor>, AppError> {
        self.collection::<Doctor>()
            .find_one(doc! { "doctor_id": doctor_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// 성 또는 이름에 키워드가 포함된 의사를 찾습니다 (대소문자 무시).
    ///
    /// 키워드의 정규식 메타 문자는 이스케이프되어 문자 그대로 비교됩니다.
    pub async fn search_by_name(&self, keyword: &str) -> Result<Vec<Doctor>, AppError> {
        let pattern = escape_regex(keyword.trim());
        let filter = doc! {
            "$or": [
                { "first_name": { "$regex": pattern.as_str(), "$options": "i" } },
                { "last_name": { "$regex": pattern.as_str(), "$options": "i" } },
            ]
        };

        self.collection::<Doctor>()
            .find(filter)
            .sort(doc! { "last_name": 1, "first_name": 1 })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// 트랜잭션 안에서 의사 존재 여부를 확인합니다.
    pub async fn exists(
        &self,
        doctor_id: &str,
        session: &mut ClientSession,
    ) -> Result<bool, AppError> {
        let count = self
            .collection::<Doctor>()
            .count_documents(doc! { "doctor_id": doctor_id })
            .session(session)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(count > 0)
    }

    pub async fn exists_by_name(
        &self,
        first_name: &str,
        last_name: &str,
        session: &mut ClientSession,
    ) -> Result<bool, AppError> {
        let count = self
            .collection::<Doctor>()
            .count_documents(doc! { "first_name": first_name, "last_name": last_name })
            .session(session)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(count > 0)
    }

    pub async fn insert(&self, doctor: &Doctor, session: &mut ClientSession) -> Result<(), AppError> {
        self.collection::<Doctor>()
            .insert_one(doctor)
            .session(session)
            .await
            .map_err(|e| map_write_error(e, "이미 등록된 의사입니다"))?;

        Ok(())
    }

    /// 삭제할 문서가 없으면 `NotFound`를 돌려줍니다.
    pub async fn delete(&self, doctor_id: &str, session: &mut ClientSession) -> Result<(), AppError> {
        let result = self
            .collection::<Doctor>()
            .delete_one(doc! { "doctor_id": doctor_id })
            .session(session)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!("의사를 찾을 수 없습니다: {}", doctor_id)));
        }

        Ok(())
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let id_index = IndexModel::builder()
            .keys(doc! { "doctor_id": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("doctor_id_unique".to_string())
                .build())
            .build();

        let name_index = IndexModel::builder()
            .keys(doc! { "last_name": 1, "first_name": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("name_unique".to_string())
                .build())
            .build();

        self.collection::<Doctor>()
            .create_indexes([id_index, name_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
