//! Input validation functions
//!
//! Validators return `Err` with a human-readable message; the backend turns
//! that into a 400 response.

/// bcrypt only looks at the first 72 bytes of a password
pub const MAX_PASSWORD_BYTES: usize = 72;

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Normalize an email for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate password strength
///
/// Rejects passwords longer than [`MAX_PASSWORD_BYTES`] so that two
/// passwords sharing a long prefix never hash to the same value.
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        ));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(format!(
            "Password must be at most {} bytes",
            MAX_PASSWORD_BYTES
        ));
    }
    Ok(())
}

/// Validate a person's display name
pub fn validate_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Name cannot be empty".to_string());
    }
    if trimmed.chars().count() > 100 {
        return Err("Name too long".to_string());
    }
    Ok(())
}

// ============================================================================
// Company Validation
// ============================================================================

/// Validate company name
pub fn validate_company_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Company name cannot be empty".to_string());
    }
    if trimmed.chars().count() > 200 {
        return Err("Company name too long".to_string());
    }
    Ok(())
}

/// Validate a business registration number
///
/// Accepts 3-32 characters of ASCII letters, digits, `-` and `/`.
pub fn validate_registration_number(number: &str) -> Result<(), String> {
    let trimmed = number.trim();
    if trimmed.len() < 3 || trimmed.len() > 32 {
        return Err("Registration number must be 3-32 characters".to_string());
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '/')
    {
        return Err(
            "Registration number may only contain letters, digits, '-' and '/'".to_string(),
        );
    }
    Ok(())
}

/// Validate a postal address
pub fn validate_address(address: &str) -> Result<(), String> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err("Address cannot be empty".to_string());
    }
    if trimmed.chars().count() > 255 {
        return Err("Address too long".to_string());
    }
    Ok(())
}

/// Validate declared employee count
pub fn validate_employee_count(count: i32) -> Result<(), String> {
    if count < 0 {
        return Err("Employee count cannot be negative".to_string());
    }
    if count > 1_000_000 {
        return Err("Employee count unreasonably high".to_string());
    }
    Ok(())
}
