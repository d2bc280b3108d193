//! Modelo de Booking
//!
//! Reserva creada por el backend. Id, hora de fin y duración los asigna el servidor.
//! Las fechas se guardan tal como llegan: solo se muestran, nunca se calculan.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub vehicle_id: String,
    pub from_pincode: String,
    pub to_pincode: String,
    pub start_time: String,
    pub customer_id: String,
    pub estimated_ride_duration_hours: f64,
    #[serde(default)]
    pub booking_end_time: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}
