use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::validation::PINCODE_REGEX;

// Request para registrar un vehículo (POST /vehicles)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddVehicleRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,

    #[validate(range(min = 1, max = 50000, message = "Capacity must be between 1 and 50000 kg"))]
    pub capacity_kg: i64,

    #[validate(range(min = 4, max = 32, message = "Tyres must be between 4 and 32"))]
    pub tyres: i64,
}

// Parámetros de búsqueda (GET /vehicles/available)
// start_time ya va en formato de cable (RFC 3339 UTC)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SearchVehiclesRequest {
    #[validate(range(min = 1, message = "Capacity must be at least 1 kg"))]
    pub capacity_required: i64,

    #[validate(regex(path = "PINCODE_REGEX", message = "Pincode must be 6 digits"))]
    pub from_pincode: String,

    #[validate(regex(path = "PINCODE_REGEX", message = "Pincode must be 6 digits"))]
    pub to_pincode: String,

    #[validate(length(min = 1, message = "Start time is required"))]
    pub start_time: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validation::field_messages;

    fn vehicle(name: &str, capacity_kg: i64, tyres: i64) -> AddVehicleRequest {
        AddVehicleRequest {
            name: name.to_string(),
            capacity_kg,
            tyres,
        }
    }

    #[test]
    fn test_add_vehicle_bounds() {
        assert!(vehicle("Truck-001", 1, 4).validate().is_ok());
        assert!(vehicle("Truck-001", 50000, 32).validate().is_ok());
        assert!(vehicle(&"x".repeat(100), 1000, 6).validate().is_ok());

        for (capacity, tyres) in [(0, 6), (50001, 6), (-1, 6), (1000, 3), (1000, 33)] {
            assert!(vehicle("Truck-001", capacity, tyres).validate().is_err());
        }
        assert!(vehicle("", 1000, 6).validate().is_err());
        assert!(vehicle(&"x".repeat(101), 1000, 6).validate().is_err());
    }

    #[test]
    fn test_add_vehicle_serializes_camel_case() {
        let json = serde_json::to_value(vehicle("Van", 500, 4)).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "Van", "capacityKg": 500, "tyres": 4 }));
    }

    #[test]
    fn test_search_pincode_messages() {
        let request = SearchVehiclesRequest {
            capacity_required: 0,
            from_pincode: "12345".to_string(),
            to_pincode: "400001".to_string(),
            start_time: "2025-03-01T04:30:00.000Z".to_string(),
        };
        let errors = request.validate().unwrap_err();
        let messages = field_messages(&errors);

        assert_eq!(messages.get("from_pincode").unwrap(), "Pincode must be 6 digits");
        assert_eq!(messages.get("capacity_required").unwrap(), "Capacity must be at least 1 kg");
        assert!(!messages.contains_key("to_pincode"));
    }
}
