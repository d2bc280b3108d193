//! ViewModel de "Search & Book"
//!
//! Búsqueda de vehículos disponibles y reserva fila a fila. Cada fila tiene su
//! propio flag de reserva en curso, así que varias reservas pueden estar en
//! vuelo a la vez; la búsqueda solo admite una.

use std::collections::{HashMap, HashSet};

use chrono::{FixedOffset, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

use crate::clients::{api_error_message, ApiError};
use crate::dto::{CreateBookingRequest, SearchVehiclesRequest};
use crate::models::{AvailableVehicle, Booking};
use crate::utils::validation::{
    field_messages, format_datetime_local, message_of, parse_datetime_local, parse_whole_number,
    to_wire_datetime, truncate_to_minute, validate_not_before,
};
use crate::viewmodels::notification::Notification;
use crate::viewmodels::{SubmitBlocked, SubmitState};

pub const NO_VEHICLES_MESSAGE: &str = "No vehicles available for the specified criteria";
pub const VEHICLE_BOOKED_MESSAGE: &str = "Vehicle booked successfully!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    CapacityRequired,
    FromPincode,
    ToPincode,
    StartTime,
}

impl SearchField {
    pub const ALL: [SearchField; 4] = [
        Self::CapacityRequired,
        Self::FromPincode,
        Self::ToPincode,
        Self::StartTime,
    ];

    pub fn form_name(self) -> &'static str {
        match self {
            Self::CapacityRequired => "capacityRequired",
            Self::FromPincode => "fromPincode",
            Self::ToPincode => "toPincode",
            Self::StartTime => "startTime",
        }
    }

    pub fn from_form_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.form_name() == name)
    }

    fn rule_name(self) -> &'static str {
        match self {
            Self::CapacityRequired => "capacity_required",
            Self::FromPincode => "from_pincode",
            Self::ToPincode => "to_pincode",
            Self::StartTime => "start_time",
        }
    }
}

/// Valores crudos del formulario de búsqueda
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchInput {
    #[serde(default)]
    pub capacity_required: String,
    #[serde(default)]
    pub from_pincode: String,
    #[serde(default)]
    pub to_pincode: String,
    #[serde(default)]
    pub start_time: String,
}

impl SearchInput {
    fn get(&self, field: SearchField) -> &str {
        match field {
            SearchField::CapacityRequired => &self.capacity_required,
            SearchField::FromPincode => &self.from_pincode,
            SearchField::ToPincode => &self.to_pincode,
            SearchField::StartTime => &self.start_time,
        }
    }

    fn set(&mut self, field: SearchField, value: String) {
        match field {
            SearchField::CapacityRequired => self.capacity_required = value,
            SearchField::FromPincode => self.from_pincode = value,
            SearchField::ToPincode => self.to_pincode = value,
            SearchField::StartTime => self.start_time = value,
        }
    }
}

/// Los tres estados que la página distingue
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchState<'a> {
    NotSearched,
    NoResults,
    Results(&'a [AvailableVehicle]),
}

/// Motivo por el que una reserva no llega a la red
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingBlocked {
    #[error("no search has been completed yet")]
    NoSearch,

    #[error("vehicle is not in the current results")]
    UnknownVehicle,

    #[error("a booking for this vehicle is already in flight")]
    InFlight,
}

#[derive(Debug, Clone)]
pub struct SearchTicket {
    pub generation: u64,
    pub request: SearchVehiclesRequest,
}

#[derive(Debug, Clone)]
pub struct BookingTicket {
    pub generation: u64,
    pub request: CreateBookingRequest,
}

/// Fila de resultados para la plantilla
#[derive(Debug, Serialize)]
pub struct ResultRowView {
    pub id: String,
    pub name: String,
    pub capacity_kg: i64,
    pub tyres: i64,
    pub estimated_ride_duration_hours: f64,
    pub booking: bool,
}

/// Datos que necesita la plantilla `search_book.html`
#[derive(Debug, Serialize)]
pub struct SearchBookView {
    pub input: SearchInput,
    pub min_start_time: String,
    pub errors: HashMap<&'static str, String>,
    pub searching: bool,
    pub search_state: &'static str,
    pub result_count: usize,
    pub results: Vec<ResultRowView>,
    pub from_pincode: Option<String>,
    pub to_pincode: Option<String>,
}

#[derive(Debug)]
pub struct SearchBookViewModel {
    input: SearchInput,
    min_start_time: NaiveDateTime,
    utc_offset: FixedOffset,
    touched: HashSet<SearchField>,
    errors: HashMap<SearchField, String>,
    state: SubmitState,
    search_performed: bool,
    results: Vec<AvailableVehicle>,
    last_search: Option<SearchVehiclesRequest>,
    booking_in_flight: HashSet<String>,
    notifications: Vec<Notification>,
    generation: u64,
}

impl SearchBookViewModel {
    /// Montar el formulario: la hora de inicio por defecto y la mínima son "ahora"
    pub fn mount(now: NaiveDateTime, utc_offset: FixedOffset) -> Self {
        let now = truncate_to_minute(now);
        Self {
            input: SearchInput {
                start_time: format_datetime_local(now),
                ..SearchInput::default()
            },
            min_start_time: now,
            utc_offset,
            touched: HashSet::new(),
            errors: HashMap::new(),
            state: SubmitState::Idle,
            search_performed: false,
            results: Vec::new(),
            last_search: None,
            booking_in_flight: HashSet::new(),
            notifications: Vec::new(),
            generation: 0,
        }
    }

    /// Volver a montar (navegación): se descarta el estado anterior
    pub fn remount(&mut self, now: NaiveDateTime, utc_offset: FixedOffset) {
        let generation = self.generation + 1;
        *self = Self {
            generation,
            ..Self::mount(now, utc_offset)
        };
    }

    /// Actualizar el offset con el que se convierte la hora de inicio
    pub fn set_utc_offset(&mut self, utc_offset: FixedOffset) {
        if self.utc_offset != utc_offset {
            log::debug!("🕒 Offset horario actualizado: {} -> {}", self.utc_offset, utc_offset);
            self.utc_offset = utc_offset;
            for field in self.touched.clone() {
                self.revalidate(field);
            }
        }
    }

    pub fn input(&self) -> &SearchInput {
        &self.input
    }

    pub fn is_searching(&self) -> bool {
        matches!(self.state, SubmitState::Submitting)
    }

    pub fn is_booking(&self, vehicle_id: &str) -> bool {
        self.booking_in_flight.contains(vehicle_id)
    }

    pub fn search_state(&self) -> SearchState<'_> {
        if !self.search_performed {
            SearchState::NotSearched
        } else if self.results.is_empty() {
            SearchState::NoResults
        } else {
            SearchState::Results(&self.results)
        }
    }

    pub fn field_error(&self, field: SearchField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn set_field(&mut self, field: SearchField, value: impl Into<String>) {
        self.input.set(field, value.into());
        if self.touched.contains(&field) {
            self.revalidate(field);
        }
    }

    pub fn set_input(&mut self, input: SearchInput) {
        for field in SearchField::ALL {
            self.set_field(field, input.get(field).to_string());
        }
    }

    pub fn blur(&mut self, field: SearchField) {
        self.touched.insert(field);
        self.revalidate(field);
    }

    /// Empezar una búsqueda
    pub fn begin_search(&mut self) -> Result<SearchTicket, SubmitBlocked> {
        if self.is_searching() {
            log::warn!("⚠️ Búsqueda ignorada: ya hay una en curso");
            return Err(SubmitBlocked::InFlight);
        }

        self.touched.extend(SearchField::ALL);
        let request = match self.check() {
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
        self.search_performed = true;
        log::info!(
            "🔍 Buscando vehículos: {} kg, {} -> {}, {}",
            request.capacity_required,
            request.from_pincode,
            request.to_pincode,
            request.start_time
        );

        Ok(SearchTicket {
            generation: self.generation,
            request,
        })
    }

    /// Terminar una búsqueda: el resultado reemplaza la lista completa
    pub fn finish_search(
        &mut self,
        ticket: &SearchTicket,
        result: Result<Vec<AvailableVehicle>, ApiError>,
    ) -> bool {
        if ticket.generation != self.generation {
            log::debug!("Resultado de búsqueda descartado: formulario remontado");
            return false;
        }

        match result {
            Ok(vehicles) => {
                log::info!("📋 {} vehículos disponibles", vehicles.len());
                if vehicles.is_empty() {
                    self.notifications.push(Notification::info(NO_VEHICLES_MESSAGE));
                }
                self.results = vehicles;
                self.last_search = Some(ticket.request.clone());
                self.state = SubmitState::Idle;
            }
            Err(error) => {
                log::error!("Error searching vehicles: {}", error);
                let message = api_error_message(&error);
                self.notifications.push(Notification::error(message.clone()));
                self.state = SubmitState::Failed { message };
            }
        }
        true
    }

    /// Empezar la reserva de una fila con los valores de la última búsqueda
    pub fn begin_booking(
        &mut self,
        vehicle_id: &str,
        customer_id: String,
    ) -> Result<BookingTicket, BookingBlocked> {
        let search = self.last_search.as_ref().ok_or(BookingBlocked::NoSearch)?;

        if !self.results.iter().any(|vehicle| vehicle.id() == vehicle_id) {
            return Err(BookingBlocked::UnknownVehicle);
        }
        if self.booking_in_flight.contains(vehicle_id) {
            return Err(BookingBlocked::InFlight);
        }

        let request = CreateBookingRequest {
            vehicle_id: vehicle_id.to_string(),
            from_pincode: search.from_pincode.clone(),
            to_pincode: search.to_pincode.clone(),
            start_time: search.start_time.clone(),
            customer_id,
        };

        self.booking_in_flight.insert(vehicle_id.to_string());
        Ok(BookingTicket {
            generation: self.generation,
            request,
        })
    }

    /// Terminar una reserva: si salió bien, la fila desaparece sin volver a buscar
    pub fn finish_booking(
        &mut self,
        ticket: &BookingTicket,
        result: Result<Booking, ApiError>,
    ) -> bool {
        if ticket.generation != self.generation {
            log::debug!("Resultado de reserva descartado: formulario remontado");
            return false;
        }

        let vehicle_id = ticket.request.vehicle_id.as_str();
        self.booking_in_flight.remove(vehicle_id);

        match result {
            Ok(booking) => {
                log::info!("✅ Reserva {} creada para vehículo {}", booking.id, vehicle_id);
                self.results.retain(|vehicle| vehicle.id() != vehicle_id);
                self.notifications.push(Notification::success(VEHICLE_BOOKED_MESSAGE));
            }
            Err(error) => {
                log::error!("Error booking vehicle {}: {}", vehicle_id, error);
                self.notifications.push(Notification::error(api_error_message(&error)));
            }
        }
        true
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub fn to_view(&self) -> SearchBookView {
        let search_state = match self.search_state() {
            SearchState::NotSearched => "not_searched",
            SearchState::NoResults => "no_results",
            SearchState::Results(_) => "results",
        };

        SearchBookView {
            input: self.input.clone(),
            min_start_time: format_datetime_local(self.min_start_time),
            errors: self
                .errors
                .iter()
                .map(|(field, message)| (field.form_name(), message.clone()))
                .collect(),
            searching: self.is_searching(),
            search_state,
            result_count: self.results.len(),
            results: self
                .results
                .iter()
                .map(|vehicle| ResultRowView {
                    id: vehicle.id().to_string(),
                    name: vehicle.vehicle.name.clone(),
                    capacity_kg: vehicle.vehicle.capacity_kg,
                    tyres: vehicle.vehicle.tyres,
                    estimated_ride_duration_hours: vehicle.estimated_ride_duration_hours,
                    booking: self.is_booking(vehicle.id()),
                })
                .collect(),
            from_pincode: self.last_search.as_ref().map(|s| s.from_pincode.clone()),
            to_pincode: self.last_search.as_ref().map(|s| s.to_pincode.clone()),
        }
    }

    fn revalidate(&mut self, field: SearchField) {
        match self.check().err().and_then(|mut errors| errors.remove(&field)) {
            Some(message) => {
                self.errors.insert(field, message);
            }
            None => {
                self.errors.remove(&field);
            }
        }
    }

    fn check(&self) -> Result<SearchVehiclesRequest, HashMap<SearchField, String>> {
        let mut errors = HashMap::new();

        let capacity_required = parse_whole_number(&self.input.capacity_required, "Capacity")
            .unwrap_or_else(|error| {
                errors.insert(SearchField::CapacityRequired, message_of(&error));
                1
            });

        let start_time = parse_datetime_local(&self.input.start_time)
            .and_then(|value| validate_not_before(value, self.min_start_time))
            .and_then(|value| to_wire_datetime(value, &self.utc_offset))
            .unwrap_or_else(|error| {
                errors.insert(SearchField::StartTime, message_of(&error));
                String::new()
            });

        let request = SearchVehiclesRequest {
            capacity_required,
            from_pincode: self.input.from_pincode.clone(),
            to_pincode: self.input.to_pincode.clone(),
            start_time,
        };

        if let Err(validation) = request.validate() {
            let messages = field_messages(&validation);
            for field in SearchField::ALL {
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Vehicle;
    use chrono::NaiveDate;
    use serde_json::json;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(9, 30, 27)
            .unwrap()
    }

    fn ist() -> FixedOffset {
        FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap()
    }

    fn vehicle(id: &str) -> AvailableVehicle {
        AvailableVehicle {
            vehicle: Vehicle {
                id: id.to_string(),
                name: format!("Truck-{}", id),
                capacity_kg: 1000,
                tyres: 6,
                created_at: "2025-03-01T04:00:00.000Z".to_string(),
                updated_at: "2025-03-01T04:00:00.000Z".to_string(),
            },
            estimated_ride_duration_hours: 2.0,
        }
    }

    fn booking(vehicle_id: &str) -> Booking {
        Booking {
            id: format!("b-{}", vehicle_id),
            vehicle_id: vehicle_id.to_string(),
            from_pincode: "110001".to_string(),
            to_pincode: "400001".to_string(),
            start_time: "2025-03-01T04:00:00.000Z".to_string(),
            customer_id: "c-1".to_string(),
            estimated_ride_duration_hours: 2.0,
            booking_end_time: "2025-03-01T04:00:00.000Z".to_string(),
            created_at: "2025-03-01T04:00:00.000Z".to_string(),
            updated_at: "2025-03-01T04:00:00.000Z".to_string(),
        }
    }

    fn filled() -> SearchBookViewModel {
        let mut vm = SearchBookViewModel::mount(now(), ist());
        vm.set_field(SearchField::CapacityRequired, "500");
        vm.set_field(SearchField::FromPincode, "110001");
        vm.set_field(SearchField::ToPincode, "400001");
        vm
    }

    fn searched(ids: &[&str]) -> SearchBookViewModel {
        let mut vm = filled();
        let ticket = vm.begin_search().unwrap();
        vm.finish_search(&ticket, Ok(ids.iter().map(|id| vehicle(id)).collect()));
        vm.take_notifications();
        vm
    }

    #[test]
    fn test_mount_defaults_start_time_to_now() {
        let vm = SearchBookViewModel::mount(now(), ist());
        assert_eq!(vm.input().start_time, "2025-03-01T09:30");
        assert_eq!(vm.to_view().min_start_time, "2025-03-01T09:30");
        assert_eq!(vm.search_state(), SearchState::NotSearched);
    }

    #[test]
    fn test_invalid_pincodes_block_search() {
        for pincode in ["", "12345", "1234567", "12a456", "12 456"] {
            let mut vm = filled();
            vm.set_field(SearchField::ToPincode, pincode);
            assert_eq!(vm.begin_search().unwrap_err(), SubmitBlocked::Invalid, "{pincode}");
            assert_eq!(vm.field_error(SearchField::ToPincode), Some("Pincode must be 6 digits"));
            assert_eq!(vm.field_error(SearchField::FromPincode), None);
            assert_eq!(vm.search_state(), SearchState::NotSearched);
        }
    }

    #[test]
    fn test_blur_validates_only_that_field() {
        let mut vm = SearchBookViewModel::mount(now(), ist());
        vm.set_field(SearchField::FromPincode, "1100");
        vm.set_field(SearchField::ToPincode, "4000");
        assert_eq!(vm.field_error(SearchField::FromPincode), None);

        vm.blur(SearchField::FromPincode);
        assert_eq!(vm.field_error(SearchField::FromPincode), Some("Pincode must be 6 digits"));
        assert_eq!(vm.field_error(SearchField::ToPincode), None);
        assert_eq!(vm.field_error(SearchField::CapacityRequired), None);

        vm.set_field(SearchField::FromPincode, "110001");
        assert_eq!(vm.field_error(SearchField::FromPincode), None);
        assert_eq!(SearchField::from_form_name("fromPincode"), Some(SearchField::FromPincode));
    }

    #[test]
    fn test_offset_change_applies_to_next_search() {
        let mut vm = filled();
        vm.set_utc_offset(FixedOffset::east_opt(3600).unwrap());
        let ticket = vm.begin_search().unwrap();
        assert_eq!(ticket.request.start_time, "2025-03-01T08:30:00.000Z");
    }

    #[test]
    fn test_start_time_rules() {
        let mut vm = filled();
        vm.set_field(SearchField::StartTime, "");
        vm.begin_search().unwrap_err();
        assert_eq!(vm.field_error(SearchField::StartTime), Some("Start time is required"));

        vm.set_field(SearchField::StartTime, "2025-03-01T09:29");
        assert_eq!(
            vm.field_error(SearchField::StartTime),
            Some("Start time cannot be in the past")
        );

        vm.set_field(SearchField::StartTime, "2025-03-02T08:00");
        assert_eq!(vm.field_error(SearchField::StartTime), None);
    }

    #[test]
    fn test_search_converts_start_time_to_wire_format() {
        let mut vm = filled();
        let ticket = vm.begin_search().unwrap();
        assert_eq!(ticket.request.start_time, "2025-03-01T04:00:00.000Z");
        assert_eq!(ticket.request.capacity_required, 500);
        assert!(vm.is_searching());
        assert_eq!(vm.begin_search().unwrap_err(), SubmitBlocked::InFlight);
    }

    #[test]
    fn test_zero_results_is_distinct_from_not_searched() {
        let mut vm = filled();
        let ticket = vm.begin_search().unwrap();
        vm.finish_search(&ticket, Ok(vec![]));

        assert_eq!(vm.search_state(), SearchState::NoResults);
        assert!(!vm.is_searching());
        assert_eq!(vm.take_notifications(), vec![Notification::info(NO_VEHICLES_MESSAGE)]);
        assert_eq!(vm.to_view().search_state, "no_results");
    }

    #[test]
    fn test_results_keep_server_order() {
        let vm = searched(&["c", "a", "b"]);
        match vm.search_state() {
            SearchState::Results(results) => {
                let ids: Vec<_> = results.iter().map(|v| v.id()).collect();
                assert_eq!(ids, vec!["c", "a", "b"]);
            }
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn test_search_error_keeps_previous_results() {
        let mut vm = searched(&["x"]);
        let ticket = vm.begin_search().unwrap();
        vm.finish_search(&ticket, Err(ApiError::Network("down".to_string())));

        assert_eq!(vm.to_view().result_count, 1);
        assert_eq!(
            vm.take_notifications(),
            vec![Notification::error("Network error. Check your connection.")]
        );
    }

    #[test]
    fn test_booking_removes_vehicle() {
        let mut vm = searched(&["x", "y"]);
        let ticket = vm.begin_booking("x", "customer-1".to_string()).unwrap();
        assert_eq!(ticket.request.from_pincode, "110001");
        assert_eq!(ticket.request.start_time, "2025-03-01T04:00:00.000Z");

        vm.finish_booking(&ticket, Ok(booking("x")));

        match vm.search_state() {
            SearchState::Results(results) => {
                assert_eq!(results.len(), 1);
                assert_eq!(results[0].id(), "y");
            }
            other => panic!("unexpected state {:?}", other),
        }
        assert_eq!(
            vm.begin_booking("x", "customer-2".to_string()).unwrap_err(),
            BookingBlocked::UnknownVehicle
        );
        assert_eq!(
            vm.take_notifications(),
            vec![Notification::success(VEHICLE_BOOKED_MESSAGE)]
        );
    }

    #[test]
    fn test_rows_book_independently() {
        let mut vm = searched(&["x", "y"]);
        let first = vm.begin_booking("x", "c-1".to_string()).unwrap();
        let second = vm.begin_booking("y", "c-2".to_string()).unwrap();

        assert!(vm.is_booking("x"));
        assert!(vm.is_booking("y"));
        assert_eq!(
            vm.begin_booking("x", "c-3".to_string()).unwrap_err(),
            BookingBlocked::InFlight
        );

        vm.finish_booking(&second, Ok(booking("y")));
        assert!(vm.is_booking("x"));
        assert!(!vm.is_booking("y"));

        let error = ApiError::Response {
            status: 409,
            body: Some(json!({ "message": "Vehicle already booked" })),
        };
        vm.finish_booking(&first, Err(error));
        assert!(!vm.is_booking("x"));
        assert_eq!(vm.to_view().result_count, 1);
    }

    #[test]
    fn test_booking_uses_last_submitted_search() {
        let mut vm = searched(&["x"]);
        // Editar el formulario después de buscar no cambia la ruta de la reserva
        vm.set_field(SearchField::FromPincode, "999");
        let ticket = vm.begin_booking("x", "c-1".to_string()).unwrap();
        assert_eq!(ticket.request.from_pincode, "110001");
    }

    #[test]
    fn test_booking_without_search() {
        let mut vm = filled();
        assert_eq!(
            vm.begin_booking("x", "c-1".to_string()).unwrap_err(),
            BookingBlocked::NoSearch
        );
    }

    #[test]
    fn test_remount_drops_late_booking() {
        let mut vm = searched(&["x"]);
        let ticket = vm.begin_booking("x", "c-1".to_string()).unwrap();

        vm.remount(now(), ist());

        assert!(!vm.finish_booking(&ticket, Ok(booking("x"))));
        assert_eq!(vm.search_state(), SearchState::NotSearched);
        assert!(vm.take_notifications().is_empty());
    }
}
