use serde::{Deserialize, Serialize};
use crate::domain::dto::format_timestamp;
use crate::domain::entities::Doctor;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorResponse {
    pub doctor_id: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: String,
}

impl From<Doctor> for DoctorResponse {
    fn from(doctor: Doctor) -> Self {
        Self {
            created_at: format_timestamp(&doctor.created_at),
            doctor_id: doctor.doctor_id,
            first_name: doctor.first_name,
            last_name: doctor.last_name,
        }
    }
}
