use crate::utils::error::{SdkError, Result};
use regex::Regex;
use std::sync::OnceLock;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| SdkError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SdkError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(SdkError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Parses a TCP port, rejecting empty strings and 0.
pub fn validate_port(field_name: &str, value: &str) -> Result<u16> {
    let port: u16 = value
        .trim()
        .parse()
        .map_err(|_| SdkError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Port must be a number between 1 and 65535".to_string(),
        })?;
    validate_range(field_name, port, 1, u16::MAX)?;
    Ok(port)
}

/// Database names and charsets end up inside connection strings, so keep them
/// to plain identifier characters.
pub fn validate_identifier(field_name: &str, value: &str) -> Result<()> {
    static IDENT: OnceLock<Regex> = OnceLock::new();
    let re = IDENT.get_or_init(|| Regex::new(r"^[A-Za-z0-9_$-]+$").expect("valid identifier pattern"));

    if !re.is_match(value) {
        return Err(SdkError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Only letters, digits, '_', '-' and '$' are allowed".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required_field() {
        let present = Some("orders".to_string());
        let absent: Option<String> = None;
        assert_eq!(validate_required_field("db", &present).unwrap(), "orders");
        assert!(matches!(
            validate_required_field("MONGODB_DBNAME", &absent),
            Err(SdkError::MissingConfigError { field }) if field == "MONGODB_DBNAME"
        ));
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("host", "localhost").is_ok());
        assert!(validate_non_empty_string("host", "").is_err());
        assert!(validate_non_empty_string("host", "   ").is_err());
    }

    #[test]
    fn test_validate_port() {
        assert_eq!(validate_port("port", "3306").unwrap(), 3306);
        assert_eq!(validate_port("port", " 27017 ").unwrap(), 27017);
        assert!(validate_port("port", "").is_err());
        assert!(validate_port("port", "0").is_err());
        assert!(validate_port("port", "70000").is_err());
        assert!(validate_port("port", "http").is_err());
    }

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier("charset", "utf8mb4").is_ok());
        assert!(validate_identifier("db_name", "orders-2024").is_ok());
        assert!(validate_identifier("db_name", "orders?x=1").is_err());
        assert!(validate_identifier("db_name", "").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("timeout", 10u64, 1, 3600).is_ok());
        assert!(validate_range("timeout", 0u64, 1, 3600).is_err());
    }
}
