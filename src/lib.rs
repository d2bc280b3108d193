//! FleetLink Web
//!
//! Front-end renderizado en servidor para la gestión de flota: alta de
//! vehículos, búsqueda de disponibilidad y reserva. Todos los datos viven en
//! el backend de flota; esta aplicación solo mantiene el estado de UI.

pub mod clients;
pub mod config;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod utils;
pub mod viewmodels;
pub mod views;
