//! Utilidades de validación
//!
//! Este módulo contiene validadores personalizados para los DTOs
//! (matrículas, códigos fiscales, partita IVA...) y helpers de normalización.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    static ref PLATE_RE: Regex = Regex::new(r"^[A-Z0-9]{5,8}$").unwrap();
    static ref FISCAL_CODE_RE: Regex = Regex::new(
        r"^[A-Z]{6}[0-9LMNPQRSTUV]{2}[ABCDEHLMPRST][0-9LMNPQRSTUV]{2}[A-Z][0-9LMNPQRSTUV]{3}[A-Z]$"
    )
    .unwrap();
    static ref VAT_NUMBER_RE: Regex = Regex::new(r"^[0-9]{11}$").unwrap();
    static ref POSTAL_CODE_RE: Regex = Regex::new(r"^[0-9]{5}$").unwrap();
    static ref PROVINCE_RE: Regex = Regex::new(r"^[A-Za-z]{2}$").unwrap();
    static ref NOTE_KEY_RE: Regex = Regex::new(r"^[A-Za-z0-9_.:\-]{1,120}$").unwrap();
}

fn invalid(code: &'static str, value: &str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.add_param("value".into(), &value.to_string());
    error
}

/// Normalizar matrícula: mayúsculas, sin espacios ni guiones
pub fn normalize_plate(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_' | '.'))
        .flat_map(|c| c.to_uppercase())
        .collect()
}

/// Validar formato de matrícula de vehículo
pub fn validate_plate(value: &str) -> Result<(), ValidationError> {
    let plate = normalize_plate(value);
    let has_letter = plate.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = plate.chars().any(|c| c.is_ascii_digit());
    if !PLATE_RE.is_match(&plate) || !has_letter || !has_digit {
        return Err(invalid("plate", value));
    }
    Ok(())
}

/// Validar codice fiscale de persona física (16 caracteres)
pub fn validate_fiscal_code(value: &str) -> Result<(), ValidationError> {
    if !FISCAL_CODE_RE.is_match(&value.trim().to_uppercase()) {
        return Err(invalid("fiscal_code", value));
    }
    Ok(())
}

/// Validar partita IVA (11 dígitos)
pub fn validate_vat_number(value: &str) -> Result<(), ValidationError> {
    if !VAT_NUMBER_RE.is_match(value.trim()) {
        return Err(invalid("vat_number", value));
    }
    Ok(())
}

/// Validar CAP (5 dígitos)
pub fn validate_postal_code(value: &str) -> Result<(), ValidationError> {
    if !POSTAL_CODE_RE.is_match(value.trim()) {
        return Err(invalid("postal_code", value));
    }
    Ok(())
}

/// Validar sigla de provincia (2 letras)
pub fn validate_province(value: &str) -> Result<(), ValidationError> {
    if !PROVINCE_RE.is_match(value.trim()) {
        return Err(invalid("province", value));
    }
    Ok(())
}

/// Validar formato de teléfono (básico)
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let allowed = value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')' | '/'));
    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
    if !allowed || !(6..=15).contains(&digits) {
        return Err(invalid("phone", value));
    }
    Ok(())
}

/// Validar clave de nota autoguardada
pub fn validate_note_key(value: &str) -> Result<(), ValidationError> {
    if !NOTE_KEY_RE.is_match(value) {
        return Err(invalid("note_key", value));
    }
    Ok(())
}

/// Validar que un string no esté vacío
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid("not_blank", value));
    }
    Ok(())
}

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T: PartialOrd + num_traits::Zero + serde::Serialize>(
    value: &T,
) -> Result<(), ValidationError> {
    if *value < T::zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), value);
        return Err(error);
    }
    Ok(())
}

/// Limpiar strings opcionales: recortar y convertir vacíos en None
pub fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_normalize_plate() {
        assert_eq!(normalize_plate("ab 123-cd"), "AB123CD");
        assert_eq!(normalize_plate(" fg.456.hi "), "FG456HI");
    }

    #[test]
    fn test_validate_plate() {
        assert!(validate_plate("AB123CD").is_ok());
        assert!(validate_plate("ab 123 cd").is_ok());
        assert!(validate_plate("A1").is_err());
        assert!(validate_plate("ABCDEFG").is_err());
        assert!(validate_plate("123456").is_err());
        assert!(validate_plate("AB123CD99").is_err());
    }

    #[test]
    fn test_validate_fiscal_code() {
        assert!(validate_fiscal_code("RSSMRA85T10A562S").is_ok());
        assert!(validate_fiscal_code("rssmra85t10a562s").is_ok());
        assert!(validate_fiscal_code("RSSMRA85T10A562").is_err());
        assert!(validate_fiscal_code("1234567890123456").is_err());
    }

    #[test]
    fn test_validate_vat_number() {
        assert!(validate_vat_number("01234567890").is_ok());
        assert!(validate_vat_number("0123456789").is_err());
        assert!(validate_vat_number("IT01234567890").is_err());
    }

    #[test]
    fn test_validate_postal_code_and_province() {
        assert!(validate_postal_code("20121").is_ok());
        assert!(validate_postal_code("2012").is_err());
        assert!(validate_province("MI").is_ok());
        assert!(validate_province("mi").is_ok());
        assert!(validate_province("MIL").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("+39 02 1234567").is_ok());
        assert!(validate_phone("333-1234567").is_ok());
        assert!(validate_phone("123").is_err());
        assert!(validate_phone("call me maybe").is_err());
    }

    #[test]
    fn test_validate_note_key() {
        assert!(validate_note_key("activity:draft").is_ok());
        assert!(validate_note_key("calendar.weekly-2025_01").is_ok());
        assert!(validate_note_key("").is_err());
        assert!(validate_note_key("with space").is_err());
        assert!(validate_note_key(&"k".repeat(121)).is_err());
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative(&Decimal::new(1250, 2)).is_ok());
        assert!(validate_non_negative(&Decimal::ZERO).is_ok());
        assert!(validate_non_negative(&Decimal::new(-1, 0)).is_err());
        assert!(validate_non_negative(&-3i64).is_err());
    }

    #[test]
    fn test_clean_optional() {
        assert_eq!(clean_optional(Some("  ".into())), None);
        assert_eq!(clean_optional(Some(" Milano ".into())), Some("Milano".into()));
        assert_eq!(clean_optional(None), None);
    }
}
