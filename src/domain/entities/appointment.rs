//! Appointment Entity
//!
//! 의사 한 명에 대한 진료 예약 슬롯입니다. 환자 계정 ID 목록과
//! 최대 수용 인원(`max_appointment`)을 함께 보관합니다.

use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};
use crate::domain::entities::new_entity_id;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub appointment_id: String,
    pub doctor_id: String,
    #[serde(default)]
    pub patient_account_ids: Vec<String>,
    pub description: String,
    pub max_appointment: i32,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Appointment {
    pub fn new(doctor_id: String, description: String, max_appointment: i32) -> Self {
        let now = DateTime::now();

        Self {
            appointment_id: new_entity_id(),
            doctor_id,
            patient_account_ids: Vec::new(),
            description,
            max_appointment,
            created_at: now,
            updated_at: now,
        }
    }

    /// 예약 인원이 최대 수용 인원에 도달했는지 확인합니다.
    pub fn is_full(&self) -> bool {
        self.patient_account_ids.len() >= self.max_appointment.max(0) as usize
    }

    pub fn has_patient(&self, account_id: &str) -> bool {
        self.patient_account_ids.iter().any(|id| id == account_id)
    }

    pub fn remaining_slots(&self) -> usize {
        (self.max_appointment.max(0) as usize).saturating_sub(self.patient_account_ids.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_tracking() {
        let mut appointment = Appointment::new("doc-1".to_string(), "checkup".to_string(), 2);
        assert!(!appointment.is_full());
        assert_eq!(appointment.remaining_slots(), 2);

        appointment.patient_account_ids.push("acc-1".to_string());
        appointment.patient_account_ids.push("acc-2".to_string());

        assert!(appointment.is_full());
        assert!(appointment.has_patient("acc-2"));
        assert!(!appointment.has_patient("acc-3"));
        assert_eq!(appointment.remaining_slots(), 0);
    }

    #[test]
    fn test_missing_patient_list_defaults_to_empty() {
        let document = mongodb::bson::doc! {
            "appointment_id": "apt-1",
            "doctor_id": "doc-1",
            "description": "checkup",
            "max_appointment": 3,
            "created_at": DateTime::now(),
            "updated_at": DateTime::now(),
        };

        let appointment: Appointment = mongodb::bson::from_document(document).unwrap();
        assert!(appointment.patient_account_ids.is_empty());
    }
}
