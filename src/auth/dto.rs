use serde::Serialize;
use serde_json::Value;

use crate::validation::{FieldErrors, MISSING};

/// Login body read field by field; a field that is missing or not a string is `None`.
#[derive(Debug, Default)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

impl LoginRequest {
    pub fn from_json(body: &Value) -> Self {
        let field = |name: &str| body.get(name).and_then(Value::as_str).map(str::to_string);
        Self {
            username: field("username"),
            password: field("password"),
            email: field("email"),
        }
    }
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
}

/// A validated username/password pair.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub const MIN_PASSWORD_LEN: usize = 8;

    pub fn validate(username: Option<&str>, password: Option<&str>) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        if username.is_none() {
            errors.add("username", MISSING);
        }
        match password {
            None => errors.add("password", MISSING),
            Some(p) if p.chars().count() < Self::MIN_PASSWORD_LEN => errors.add(
                "password",
                format!("Shorter than minimum length {}.", Self::MIN_PASSWORD_LEN),
            ),
            Some(_) => {}
        }
        errors.into_result(())?;
        Ok(Self {
            username: username.unwrap_or_default().to_string(),
            password: password.unwrap_or_default().to_string(),
        })
    }
}
