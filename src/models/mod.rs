//! Modelos de datos
//!
//! Entidades tal como las devuelve el backend de flota. Este cliente no las
//! persiste: solo las muestra y las reenvía.

pub mod booking;
pub mod vehicle;

pub use booking::Booking;
pub use vehicle::{AvailableVehicle, Vehicle};
