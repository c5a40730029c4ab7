use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};
use crate::domain::entities::new_entity_id;

/// 의사 디렉터리 항목
///
/// 같은 성/이름 조합은 한 번만 등록됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub doctor_id: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime,
}

impl Doctor {
    pub fn new(first_name: String, last_name: String) -> Self {
        Self {
            doctor_id: new_entity_id(),
            first_name,
            last_name,
            created_at: DateTime::now(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
