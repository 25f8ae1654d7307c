use crate::utils::error::{BrowserError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(BrowserError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(BrowserError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(BrowserError::InvalidConfigValueError {
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
        return Err(BrowserError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Parses a TCP port, rejecting 0.
pub fn validate_port(field_name: &str, value: &str) -> Result<u16> {
    let port = value
        .trim()
        .parse::<u16>()
        .map_err(|e| BrowserError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Invalid port: {}", e),
        })?;
    validate_range(field_name, port, 1, u16::MAX)?;
    Ok(port)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("sqlite.path", "example.db").is_ok());
        assert!(validate_path("sqlite.path", "").is_err());
        assert!(validate_path("sqlite.path", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("row_limit", 100, 10, 1000).is_ok());
        assert!(validate_range("row_limit", 9, 10, 1000).is_err());
        assert!(validate_range("row_limit", 1001, 10, 1000).is_err());
    }

    #[test]
    fn test_validate_port() {
        assert_eq!(validate_port("connection.port", "5432").unwrap(), 5432);
        assert_eq!(validate_port("connection.port", " 3306 ").unwrap(), 3306);
        assert!(validate_port("connection.port", "0").is_err());
        assert!(validate_port("connection.port", "70000").is_err());
        assert!(validate_port("connection.port", "abc").is_err());
    }
}
