//! ViewModels de los formularios
//!
//! Estado + lógica de UI de cada página con formulario. No hacen I/O: preparan
//! la request al empezar una operación y aplican el resultado al terminarla.

pub mod add_vehicle_viewmodel;
pub mod notification;
pub mod search_book_viewmodel;

use serde::Serialize;
use thiserror::Error;

pub use add_vehicle_viewmodel::{AddVehicleField, AddVehicleInput, AddVehicleViewModel};
pub use notification::{Notification, NotificationKind};
pub use search_book_viewmodel::{BookingBlocked, SearchBookViewModel, SearchField, SearchInput, SearchState};

/// Estado de envío de un formulario
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmitState {
    #[default]
    Idle,
    Submitting,
    Failed { message: String },
}

/// Motivo por el que un envío no llega a la red
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitBlocked {
    #[error("a submission is already in flight")]
    InFlight,

    #[error("the form has invalid fields")]
    Invalid,
}
