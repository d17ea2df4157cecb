use anyhow::{anyhow, Result};

/// Validates a typed phone number.
///
/// Accepts any input that consists only of digits after `+`, spaces and
/// hyphens are stripped. Shared contacts carry a structured phone number and
/// skip this check entirely.
pub fn validate_phone(input: &str) -> Result<()> {
    let digits: String = input
        .chars()
        .filter(|c| !matches!(c, '+' | ' ' | '-'))
        .collect();

    if digits.is_empty() {
        return Err(anyhow!("Phone number cannot be empty"));
    }

    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(anyhow!("Phone number may only contain digits, '+', spaces and hyphens"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_phone_valid() {
        assert!(validate_phone("89001234567").is_ok());
        assert!(validate_phone("+7 900-123-45-67").is_ok());
        assert!(validate_phone("+1 555 0100").is_ok());
        assert!(validate_phone("8-900-123-45-67").is_ok());
    }

    #[test]
    fn test_validate_phone_invalid() {
        assert!(validate_phone("").is_err());
        assert!(validate_phone("call me").is_err());
        assert!(validate_phone("+-- -").is_err());
        assert!(validate_phone("8900x1234").is_err());
        assert!(validate_phone("(890) 0123456").is_err());
    }
}
