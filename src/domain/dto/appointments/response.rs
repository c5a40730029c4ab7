use serde::{Deserialize, Serialize};
use crate::domain::dto::format_timestamp;
use crate::domain::entities::Appointment;

/// 관리자용 예약 응답 (예약 환자 목록 포함)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentResponse {
    pub appointment_id: String,
    pub doctor_id: String,
    pub patient_account_ids: Vec<String>,
    pub description: String,
    pub max_appointment: i32,
    pub remaining_slots: usize,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Appointment> for AppointmentResponse {
    fn from(appointment: Appointment) -> Self {
        Self {
            remaining_slots: appointment.remaining_slots(),
            created_at: format_timestamp(&appointment.created_at),
            updated_at: format_timestamp(&appointment.updated_at),
            appointment_id: appointment.appointment_id,
            doctor_id: appointment.doctor_id,
            patient_account_ids: appointment.patient_account_ids,
            description: appointment.description,
            max_appointment: appointment.max_appointment,
        }
    }
}

/// 환자용 예약 결과
///
/// 다른 환자의 계정 ID는 노출하지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingResponse {
    pub appointment_id: String,
    pub doctor_id: String,
    pub description: String,
    pub booked: bool,
    pub remaining_slots: usize,
}

impl BookingResponse {
    pub fn for_patient(appointment: &Appointment, account_id: &str) -> Self {
        Self {
            appointment_id: appointment.appointment_id.clone(),
            doctor_id: appointment.doctor_id.clone(),
            description: appointment.description.clone(),
            booked: appointment.has_patient(account_id),
            remaining_slots: appointment.remaining_slots(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_response_hides_other_patients() {
        let mut appointment = Appointment::new("doc-1".to_string(), "checkup".to_string(), 3);
        appointment.patient_account_ids = vec!["acc-1".to_string(), "acc-2".to_string()];

        let response = BookingResponse::for_patient(&appointment, "acc-1");
        let json = serde_json::to_string(&response).unwrap();

        assert!(response.booked);
        assert_eq!(response.remaining_slots, 1);
        assert!(!json.contains("acc-2"));
    }
}
