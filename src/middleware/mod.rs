//! Middleware del sistema
//!
//! Este módulo contiene el middleware de sesión: cada navegador recibe una
//! cookie con un id que apunta a sus ViewModels en el almacén de sesiones.

pub mod session;

pub use session::*;
