use super::{
    auth::AuthContext,
    error::{ClientError, Result},
    routes::Route,
};

const FILL_ALL_FIELDS: &str = "Please fill in all fields.";

/// Login page form.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<()> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(ClientError::Invalid(FILL_ALL_FIELDS.to_string()));
        }
        Ok(())
    }

    /// Signs in and returns where to navigate next.
    pub async fn submit(&self, auth: &AuthContext) -> Result<Route> {
        self.validate()?;
        auth.login(self.email.trim(), &self.password).await?;
        Ok(Route::MySessions)
    }
}

/// Registration page form.
#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<()> {
        if self.password != self.confirm_password {
            return Err(ClientError::Invalid("Passwords do not match.".to_string()));
        }
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(ClientError::Invalid(FILL_ALL_FIELDS.to_string()));
        }
        Ok(())
    }

    /// Registers, signs in and returns where to navigate next.
    pub async fn submit(&self, auth: &AuthContext) -> Result<Route> {
        self.validate()?;
        auth.register(self.email.trim(), &self.password).await?;
        Ok(Route::MySessions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_checks_confirmation_first() {
        let form = RegisterForm {
            email: String::new(),
            password: "secret1".into(),
            confirm_password: "secret2".into(),
        };
        assert_eq!(form.validate().unwrap_err().to_string(), "Passwords do not match.");

        let form = RegisterForm {
            email: " ".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
        };
        assert_eq!(form.validate().unwrap_err().to_string(), FILL_ALL_FIELDS);
    }

    #[test]
    fn login_requires_both_fields() {
        assert!(LoginForm::default().validate().is_err());
        let form = LoginForm {
            email: "a@x.com".into(),
            password: "secret1".into(),
        };
        assert!(form.validate().is_ok());
    }
}
