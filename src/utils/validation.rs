use crate::utils::error::{Rg5329Error, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(Rg5329Error::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(Rg5329Error::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(Rg5329Error::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Rg5329Error::InvalidConfigValueError {
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
        return Err(Rg5329Error::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("rpc.endpoint", "https://erp.example.com").is_ok());
        assert!(validate_url("rpc.endpoint", "http://localhost:8069").is_ok());
        assert!(validate_url("rpc.endpoint", "").is_err());
        assert!(validate_url("rpc.endpoint", "not a url").is_err());
        assert!(validate_url("rpc.endpoint", "ftp://erp.example.com").is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("rpc.model", "sale.order").is_ok());
        assert!(validate_non_empty_string("rpc.model", "   ").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("trigger.debounce_ms", 1500u64, 0, 60_000).is_ok());
        assert!(validate_range("trigger.debounce_ms", 60_001u64, 0, 60_000).is_err());
    }
}
