//! Utilidades de validación

use validator::ValidationError;

/// Validar que un string no esté vacío (ni solo espacios)
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_strings() {
        assert!(validate_not_empty("   ").is_err());
        assert!(validate_not_empty("hola").is_ok());
    }
}
