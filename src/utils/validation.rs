//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validar la entrada cruda de los
//! formularios y convertir la hora local del formulario al formato del backend.

use std::borrow::Cow;
use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, NaiveDateTime, SecondsFormat, TimeZone, Timelike, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use validator::{ValidationError, ValidationErrors};

/// Formato de un `<input type="datetime-local">`
pub const DATETIME_LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M";

lazy_static! {
    /// Pincode: exactamente 6 dígitos
    pub static ref PINCODE_REGEX: Regex = Regex::new(r"^[0-9]{6}$").unwrap();
}

fn error_with_message(code: &'static str, message: String) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Owned(message));
    error
}

/// Validar que un campo obligatorio no esté vacío
pub fn validate_required<'a>(value: &'a str, label: &str) -> Result<&'a str, ValidationError> {
    if value.is_empty() {
        let mut error = error_with_message("required", format!("{} is required", label));
        error.add_param("field".into(), &label.to_string());
        return Err(error);
    }
    Ok(value)
}

/// Validar y convertir un campo numérico entero
///
/// Un valor con decimales se rechaza; un entero fuera del rango de `i64`
/// se satura para que la regla de rango posterior lo rechace con su mensaje.
pub fn parse_whole_number(value: &str, label: &str) -> Result<i64, ValidationError> {
    let trimmed = validate_required(value.trim(), label)?;

    if let Ok(number) = trimmed.parse::<i64>() {
        return Ok(number);
    }

    match trimmed.parse::<f64>() {
        Ok(number) if number.is_finite() && number.fract() == 0.0 => Ok(number as i64),
        Ok(number) if number.is_finite() => {
            let mut error = error_with_message("integer", format!("{} must be a whole number", label));
            error.add_param("value".into(), &number);
            Err(error)
        }
        _ => {
            let mut error = error_with_message("number", format!("{} must be a number", label));
            error.add_param("value".into(), &trimmed.to_string());
            Err(error)
        }
    }
}

/// Validar y convertir el valor de un input datetime-local (`YYYY-MM-DDTHH:MM`)
///
/// Los navegadores pueden añadir segundos; se aceptan ambos formatos.
pub fn parse_datetime_local(value: &str) -> Result<NaiveDateTime, ValidationError> {
    let trimmed = validate_required(value.trim(), "Start time")?;

    NaiveDateTime::parse_from_str(trimmed, DATETIME_LOCAL_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|_| {
            let mut error = error_with_message(
                "datetime",
                "Start time must be a valid date and time".to_string(),
            );
            error.add_param("value".into(), &trimmed.to_string());
            error.add_param("format".into(), &"YYYY-MM-DDTHH:MM".to_string());
            error
        })
}

/// Validar que la hora de inicio no sea anterior al mínimo del formulario
pub fn validate_not_before(
    value: NaiveDateTime,
    minimum: NaiveDateTime,
) -> Result<NaiveDateTime, ValidationError> {
    if value < minimum {
        let mut error = error_with_message("past", "Start time cannot be in the past".to_string());
        error.add_param("min".into(), &format_datetime_local(minimum));
        return Err(error);
    }
    Ok(value)
}

/// Formatear una fecha como valor de input datetime-local
pub fn format_datetime_local(value: NaiveDateTime) -> String {
    value.format(DATETIME_LOCAL_FORMAT).to_string()
}

/// Recortar segundos y nanosegundos (resolución del input datetime-local)
pub fn truncate_to_minute(value: NaiveDateTime) -> NaiveDateTime {
    value
        .with_second(0)
        .and_then(|v| v.with_nanosecond(0))
        .unwrap_or(value)
}

/// Convertir la hora local del formulario al formato que espera el backend:
/// RFC 3339 en UTC con milisegundos (`2025-03-01T04:30:00.000Z`).
pub fn to_wire_datetime(
    value: NaiveDateTime,
    offset: &FixedOffset,
) -> Result<String, ValidationError> {
    let local = offset.from_local_datetime(&value).single().ok_or_else(|| {
        error_with_message("datetime", "Start time must be a valid date and time".to_string())
    })?;
    let utc: DateTime<Utc> = local.with_timezone(&Utc);
    Ok(utc.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Aplanar los errores de `validator` a un mensaje por campo (el primero)
pub fn field_messages(errors: &ValidationErrors) -> HashMap<&'static str, String> {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, field_errors)| {
            field_errors
                .first()
                .map(|error| (field, message_of(error)))
        })
        .collect()
}

/// Mensaje legible de un `ValidationError`
pub fn message_of(error: &ValidationError) -> String {
    error
        .message
        .as_ref()
        .map(|message| message.to_string())
        .unwrap_or_else(|| format!("Invalid value ({})", error.code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_pincode_regex() {
        assert!(PINCODE_REGEX.is_match("110001"));
        assert!(!PINCODE_REGEX.is_match("11000"));
        assert!(!PINCODE_REGEX.is_match("1100011"));
        assert!(!PINCODE_REGEX.is_match("11000a"));
        assert!(!PINCODE_REGEX.is_match(" 110001"));
        assert!(!PINCODE_REGEX.is_match("١١٠٠٠١"));
    }

    #[test]
    fn test_parse_whole_number() {
        assert_eq!(parse_whole_number("42", "Capacity").unwrap(), 42);
        assert_eq!(parse_whole_number(" 7 ", "Capacity").unwrap(), 7);
        assert_eq!(parse_whole_number("-3", "Capacity").unwrap(), -3);
        assert_eq!(parse_whole_number("1000.0", "Capacity").unwrap(), 1000);

        let err = parse_whole_number("", "Capacity").unwrap_err();
        assert_eq!(message_of(&err), "Capacity is required");

        let err = parse_whole_number("12.5", "Capacity").unwrap_err();
        assert_eq!(message_of(&err), "Capacity must be a whole number");

        let err = parse_whole_number("abc", "Tyres").unwrap_err();
        assert_eq!(message_of(&err), "Tyres must be a number");
    }

    #[test]
    fn test_parse_whole_number_saturates_huge_values() {
        assert_eq!(
            parse_whole_number("1e30", "Capacity").unwrap(),
            i64::MAX
        );
    }

    #[test]
    fn test_parse_datetime_local() {
        assert_eq!(parse_datetime_local("2025-03-01T10:00").unwrap(), at(10, 0));
        assert_eq!(parse_datetime_local("2025-03-01T10:00:00").unwrap(), at(10, 0));
        assert!(parse_datetime_local("").is_err());
        assert!(parse_datetime_local("01/03/2025 10:00").is_err());
    }

    #[test]
    fn test_validate_not_before() {
        assert!(validate_not_before(at(10, 0), at(10, 0)).is_ok());
        assert!(validate_not_before(at(11, 0), at(10, 0)).is_ok());
        let err = validate_not_before(at(9, 59), at(10, 0)).unwrap_err();
        assert_eq!(message_of(&err), "Start time cannot be in the past");
    }

    #[test]
    fn test_to_wire_datetime_uses_offset() {
        let ist = FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap();
        assert_eq!(
            to_wire_datetime(at(10, 0), &ist).unwrap(),
            "2025-03-01T04:30:00.000Z"
        );

        let utc = FixedOffset::east_opt(0).unwrap();
        assert_eq!(
            to_wire_datetime(at(10, 0), &utc).unwrap(),
            "2025-03-01T10:00:00.000Z"
        );
    }

    #[test]
    fn test_truncate_to_minute() {
        let value = at(10, 15).with_second(42).unwrap().with_nanosecond(5).unwrap();
        assert_eq!(truncate_to_minute(value), at(10, 15));
        assert_eq!(format_datetime_local(truncate_to_minute(value)), "2025-03-01T10:15");
    }
}
