use garde::Validate;

use crate::error::{AppError, Result};

/// Message returned when email or password is absent.
pub const MISSING_FIELDS: &str = "Please enter all fields";

/// Shape rules for a new account.
#[derive(Validate)]
struct Registration<'a> {
    #[garde(email)]
    email: &'a str,
    #[garde(length(min = 6, max = 128))]
    password: &'a str,
}

/// Trims and lower-cases an email address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Checks both credentials are present and returns them with the email normalized.
///
/// # Returns
///
/// `Validation(MISSING_FIELDS)` if either value is absent or blank.
pub fn require_credentials(
    email: Option<String>,
    password: Option<String>,
) -> Result<(String, String)> {
    let email = email.map(|e| normalize_email(&e)).filter(|e| !e.is_empty());
    let password = password.filter(|p| !p.is_empty());

    match (email, password) {
        (Some(email), Some(password)) => Ok((email, password)),
        _ => Err(AppError::Validation(MISSING_FIELDS.to_string())),
    }
}

/// Validates the email shape and password length of a registration.
pub fn validate_registration(email: &str, password: &str) -> Result<()> {
    let registration = Registration { email, password };

    if let Err(report) = registration.validate() {
        let message = report
            .iter()
            .map(|(path, _)| match path.to_string().as_str() {
                "email" => "Please fill a valid email address",
                "password" => "Password must be between 6 and 128 characters",
                _ => "Invalid user data",
            })
            .next()
            .unwrap_or("Invalid user data");
        return Err(AppError::Validation(message.to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_blank_fields_are_rejected() {
        assert!(require_credentials(None, Some("secret1".into())).is_err());
        assert!(require_credentials(Some("a@x.com".into()), None).is_err());
        assert!(require_credentials(Some("   ".into()), Some("secret1".into())).is_err());
        assert!(require_credentials(Some("a@x.com".into()), Some(String::new())).is_err());
    }

    #[test]
    fn email_is_normalized() {
        let (email, password) =
            require_credentials(Some("  A@X.com ".into()), Some("secret1".into())).unwrap();
        assert_eq!(email, "a@x.com");
        assert_eq!(password, "secret1");
    }

    #[test]
    fn registration_shape() {
        assert!(validate_registration("a@x.com", "secret1").is_ok());
        assert!(validate_registration("not-an-email", "secret1").is_err());
        assert!(validate_registration("a@x.com", "12345").is_err());
    }
}
