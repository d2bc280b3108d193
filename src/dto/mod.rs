//! DTOs de la API de flota
//!
//! Requests que se envían al backend y el envoltorio común de sus respuestas.

pub mod api_response;
pub mod booking_dto;
pub mod vehicle_dto;

pub use api_response::ApiResponse;
pub use booking_dto::CreateBookingRequest;
pub use vehicle_dto::{AddVehicleRequest, SearchVehiclesRequest};
