//! ViewModel del formulario "Add Vehicle"
//!
//! Estado del formulario (valores crudos, campos tocados, errores), ciclo de
//! envío `idle -> submitting -> (idle | failed)` y notificaciones. El envío se
//! divide en `begin_submit` / `finish_submit` para que quien lo use no tenga que
//! retener ningún lock mientras espera al backend.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::clients::{api_error_message, ApiError};
use crate::dto::AddVehicleRequest;
use crate::models::Vehicle;
use crate::utils::validation::{field_messages, message_of, parse_whole_number, validate_required};
use crate::viewmodels::notification::Notification;
use crate::viewmodels::{SubmitBlocked, SubmitState};

pub const VEHICLE_ADDED_MESSAGE: &str = "Vehicle added successfully!";

/// Campos del formulario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddVehicleField {
    Name,
    CapacityKg,
    Tyres,
}

impl AddVehicleField {
    pub const ALL: [AddVehicleField; 3] = [Self::Name, Self::CapacityKg, Self::Tyres];

    /// Nombre del input HTML
    pub fn form_name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::CapacityKg => "capacityKg",
            Self::Tyres => "tyres",
        }
    }

    /// Campo a partir del nombre del input HTML
    pub fn from_form_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.form_name() == name)
    }

    /// Nombre del campo en `AddVehicleRequest` (claves de `validator`)
    fn rule_name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::CapacityKg => "capacity_kg",
            Self::Tyres => "tyres",
        }
    }
}

/// Valores tal como llegan del formulario
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddVehicleInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub capacity_kg: String,
    #[serde(default)]
    pub tyres: String,
}

impl AddVehicleInput {
    fn get(&self, field: AddVehicleField) -> &str {
        match field {
            AddVehicleField::Name => &self.name,
            AddVehicleField::CapacityKg => &self.capacity_kg,
            AddVehicleField::Tyres => &self.tyres,
        }
    }

    fn set(&mut self, field: AddVehicleField, value: String) {
        match field {
            AddVehicleField::Name => self.name = value,
            AddVehicleField::CapacityKg => self.capacity_kg = value,
            AddVehicleField::Tyres => self.tyres = value,
        }
    }
}

/// Envío en curso: la request validada y el montaje al que pertenece
#[derive(Debug, Clone)]
pub struct AddVehicleTicket {
    pub generation: u64,
    pub request: AddVehicleRequest,
}

/// Datos que necesita la plantilla `add_vehicle.html`
#[derive(Debug, Serialize)]
pub struct AddVehicleView {
    pub input: AddVehicleInput,
    pub errors: HashMap<&'static str, String>,
    pub submitting: bool,
    pub state: SubmitState,
}

#[derive(Debug, Default)]
pub struct AddVehicleViewModel {
    input: AddVehicleInput,
    touched: HashSet<AddVehicleField>,
    errors: HashMap<AddVehicleField, String>,
    state: SubmitState,
    notifications: Vec<Notification>,
    generation: u64,
}

impl AddVehicleViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Volver a montar el formulario (navegación): descarta todo el estado
    pub fn remount(&mut self) {
        *self = Self {
            generation: self.generation + 1,
            ..Self::default()
        };
    }

    pub fn input(&self) -> &AddVehicleInput {
        &self.input
    }

    pub fn state(&self) -> &SubmitState {
        &self.state
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, SubmitState::Submitting)
    }

    pub fn field_error(&self, field: AddVehicleField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Cambiar un campo; si ya fue tocado se vuelve a validar
    pub fn set_field(&mut self, field: AddVehicleField, value: impl Into<String>) {
        self.input.set(field, value.into());
        if self.touched.contains(&field) {
            self.revalidate(field);
        }
    }

    /// Reemplazar todos los valores (POST del formulario)
    pub fn set_input(&mut self, input: AddVehicleInput) {
        for field in AddVehicleField::ALL {
            self.set_field(field, input.get(field).to_string());
        }
    }

    /// Primer blur de un campo: a partir de aquí se valida
    pub fn blur(&mut self, field: AddVehicleField) {
        self.touched.insert(field);
        self.revalidate(field);
    }

    /// Empezar un envío: valida todo y pasa a `Submitting`
    pub fn begin_submit(&mut self) -> Result<AddVehicleTicket, SubmitBlocked> {
        if self.is_submitting() {
            log::warn!("⚠️ Envío de vehículo ignorado: ya hay uno en curso");
            return Err(SubmitBlocked::InFlight);
        }

        self.touched.extend(AddVehicleField::ALL);
        let request = match check(&self.input) {
            Ok(request) => {
                self.errors.clear();
                request
            }
            Err(errors) => {
                self.errors = errors;
                return Err(SubmitBlocked::Invalid);
            }
        };

        self.state = SubmitState::Submitting;
        Ok(AddVehicleTicket {
            generation: self.generation,
            request,
        })
    }

    /// Terminar un envío. Devuelve `false` si el formulario se volvió a montar
    /// mientras tanto y la respuesta se descarta.
    pub fn finish_submit(
        &mut self,
        ticket: &AddVehicleTicket,
        result: Result<Vehicle, ApiError>,
    ) -> bool {
        if ticket.generation != self.generation {
            log::debug!("Respuesta de alta descartada: formulario remontado");
            return false;
        }

        match result {
            Ok(vehicle) => {
                log::info!("✅ Vehículo creado: {} ({})", vehicle.name, vehicle.id);
                self.input = AddVehicleInput::default();
                self.touched.clear();
                self.errors.clear();
                self.state = SubmitState::Idle;
                self.notifications.push(Notification::success(VEHICLE_ADDED_MESSAGE));
            }
            Err(error) => {
                log::error!("Error adding vehicle: {}", error);
                let message = api_error_message(&error);
                self.notifications.push(Notification::error(message.clone()));
                self.state = SubmitState::Failed { message };
            }
        }
        true
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub fn to_view(&self) -> AddVehicleView {
        AddVehicleView {
            input: self.input.clone(),
            errors: self
                .errors
                .iter()
                .map(|(field, message)| (field.form_name(), message.clone()))
                .collect(),
            submitting: self.is_submitting(),
            state: self.state.clone(),
        }
    }

    fn revalidate(&mut self, field: AddVehicleField) {
        match check(&self.input).err().and_then(|mut errors| errors.remove(&field)) {
            Some(message) => {
                self.errors.insert(field, message);
            }
            None => {
                self.errors.remove(&field);
            }
        }
    }
}

/// Validar los valores crudos y construir la request
///
/// Los errores de conversión (vacío, no entero) tienen prioridad sobre las
/// reglas de rango de `AddVehicleRequest`.
fn check(input: &AddVehicleInput) -> Result<AddVehicleRequest, HashMap<AddVehicleField, String>> {
    let mut errors = HashMap::new();

    if let Err(error) = validate_required(&input.name, "Vehicle name") {
        errors.insert(AddVehicleField::Name, message_of(&error));
    }
    let capacity_kg = parse_whole_number(&input.capacity_kg, "Capacity").unwrap_or_else(|error| {
        errors.insert(AddVehicleField::CapacityKg, message_of(&error));
        1
    });
    let tyres = parse_whole_number(&input.tyres, "Tyres").unwrap_or_else(|error| {
        errors.insert(AddVehicleField::Tyres, message_of(&error));
        4
    });

    let request = AddVehicleRequest {
        name: input.name.clone(),
        capacity_kg,
        tyres,
    };

    if let Err(validation) = request.validate() {
        let messages = field_messages(&validation);
        for field in AddVehicleField::ALL {
            if let Some(message) = messages.get(field.rule_name()) {
                errors.entry(field).or_insert_with(|| message.clone());
            }
        }
    }

    if errors.is_empty() {
        Ok(request)
    } else {
        Err(errors)
    }
}
