use serde::{Deserialize, Serialize};

// Request para crear una reserva (POST /bookings)
// Ruta y hora salen de la última búsqueda enviada, sin volver a validar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub vehicle_id: String,
    pub from_pincode: String,
    pub to_pincode: String,
    pub start_time: String,
    pub customer_id: String,
}
