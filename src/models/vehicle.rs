//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle tal como lo devuelve el backend de flota
//! y su variante con la duración estimada calculada para una búsqueda.

use serde::{Deserialize, Serialize};

/// Vehicle principal - mapea exactamente al documento devuelto por `/vehicles`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub capacity_kg: i64,
    pub tyres: i64,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Vehículo disponible - resultado de `/vehicles/available`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableVehicle {
    #[serde(flatten)]
    pub vehicle: Vehicle,
    pub estimated_ride_duration_hours: f64,
}

impl AvailableVehicle {
    pub fn id(&self) -> &str {
        &self.vehicle.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_mongo_id() {
        let vehicle: Vehicle = serde_json::from_value(json!({
            "_id": "64f1c0",
            "name": "Truck-001",
            "capacityKg": 1000,
            "tyres": 6,
            "createdAt": "2025-01-10T08:00:00.000Z",
            "updatedAt": "2025-01-10T08:00:00.000Z"
        }))
        .unwrap();

        assert_eq!(vehicle.id, "64f1c0");
        assert_eq!(vehicle.capacity_kg, 1000);
    }

    #[test]
    fn test_available_vehicle_flattens_fields() {
        let available: AvailableVehicle = serde_json::from_value(json!({
            "id": "v-1",
            "name": "Van-002",
            "capacityKg": 500,
            "tyres": 4,
            "createdAt": "2025-01-10T08:00:00Z",
            "updatedAt": "2025-01-11T08:00:00Z",
            "estimatedRideDurationHours": 3.0
        }))
        .unwrap();

        assert_eq!(available.id(), "v-1");
        assert_eq!(available.vehicle.name, "Van-002");
        assert_eq!(available.estimated_ride_duration_hours, 3.0);
    }

    #[test]
    fn test_missing_timestamps_still_decode() {
        let vehicle: Vehicle = serde_json::from_value(json!({
            "_id": "64f1c0",
            "name": "Truck-001",
            "capacityKg": 1000,
            "tyres": 6
        }))
        .unwrap();

        assert_eq!(vehicle.created_at, "");
    }
}
