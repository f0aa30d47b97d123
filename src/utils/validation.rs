use crate::utils::error::{CodecError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(CodecError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(CodecError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// 縮排只允許 ASCII 空白字元（空格、tab、換行）
pub fn validate_whitespace(field_name: &str, value: &str) -> Result<()> {
    if let Some(c) = value.chars().find(|c| !matches!(c, ' ' | '\t' | '\n' | '\r')) {
        return Err(CodecError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.escape_default().to_string(),
            reason: format!("Unexpected non-whitespace character {:?}", c),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| CodecError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CodecError::InvalidConfigValueError {
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
        return Err(CodecError::InvalidConfigValueError {
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
    fn test_validate_path() {
        assert!(validate_path("fixtures.path", "./bank.json").is_ok());
        assert!(validate_path("fixtures.path", "").is_err());
        assert!(validate_path("fixtures.path", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_whitespace() {
        assert!(validate_whitespace("mapper.indent", "  ").is_ok());
        assert!(validate_whitespace("mapper.indent", "\t").is_ok());
        assert!(validate_whitespace("mapper.indent", "").is_ok());
        assert!(validate_whitespace("mapper.indent", "--").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("mapper.indent", 4, 0, 16).is_ok());
        assert!(validate_range("mapper.indent", 17, 0, 16).is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some("bank.json".to_string());
        let missing: Option<String> = None;
        assert_eq!(validate_required_field("fixtures.path", &present).unwrap(), "bank.json");
        assert!(matches!(
            validate_required_field("fixtures.path", &missing),
            Err(CodecError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("entity", "customer").is_ok());
        assert!(validate_non_empty_string("entity", "   ").is_err());
    }
}
