use serde::Deserialize;

use crate::auth::is_valid_email;
use crate::errors::FieldError;

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.username.trim().is_empty() {
            errors.push(FieldError::new("username", "username is required"));
        }
        if !is_valid_email(&self.email) {
            errors.push(FieldError::new("email", "invalid email"));
        }
        if self.password.len() < MIN_PASSWORD_LEN {
            errors.push(FieldError::new("password", "password too short"));
        }
        errors
    }
}

/// Update body. Absent fields keep their current value; a supplied password
/// is treated as new plaintext and re-hashed.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl UpdateUserRequest {
    /// Validates the fields that were actually supplied.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if let Some(username) = &self.username {
            if username.trim().is_empty() {
                errors.push(FieldError::new("username", "username is required"));
            }
        }
        if let Some(email) = &self.email {
            if !is_valid_email(email) {
                errors.push(FieldError::new("email", "invalid email"));
            }
        }
        if let Some(password) = &self.password {
            if password.len() < MIN_PASSWORD_LEN {
                errors.push(FieldError::new("password", "password too short"));
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_create() -> CreateUserRequest {
        CreateUserRequest {
            username: "jdoe".into(),
            email: "jdoe@example.com".into(),
            password: "hunter22!".into(),
        }
    }

    #[test]
    fn valid_create_has_no_errors() {
        assert!(valid_create().validate().is_empty());
    }

    #[test]
    fn create_rejects_blank_username_bad_email_short_password() {
        let req = CreateUserRequest {
            username: " ".into(),
            email: "not-an-email".into(),
            password: "short".into(),
        };
        let fields: Vec<_> = req.validate().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["username", "email", "password"]);
    }

    #[test]
    fn update_with_no_fields_is_valid() {
        let req: UpdateUserRequest = serde_json::from_str("{}").unwrap();
        assert!(req.username.is_none());
        assert!(req.validate().is_empty());
    }

    #[test]
    fn update_validates_only_supplied_fields() {
        let req: UpdateUserRequest =
            serde_json::from_str(r#"{"email": "broken"}"#).unwrap();
        let errors = req.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "email");
    }
}
