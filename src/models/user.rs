use serde::{Deserialize, Serialize};

use crate::errors::ValidationErrors;
use crate::validation;

pub const EMAIL_MIN_LENGTH: usize = 5;
pub const PASSWORD_MIN_LENGTH: usize = 5;
pub const NAME_MIN_LENGTH: usize = 2;

#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: String,
}

/// Validated user-creation payload. The password is still plaintext here;
/// it is hashed right before the INSERT and never stored or echoed as-is.
#[derive(Debug)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Signup entry point: first and last name are required.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Registration entry point: credentials only, no name fields. Kept as a
/// separate shape from [`SignupRequest`] because the two call sites enforce
/// different rule sets.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

fn validate_credentials(
    errors: &mut ValidationErrors,
    email: Option<String>,
    username: Option<String>,
    password: Option<String>,
) -> (Option<String>, Option<String>, Option<String>) {
    let email = validation::required(errors, "email", email);
    if let Some(v) = email.as_deref() {
        validation::min_length(errors, "email", v, EMAIL_MIN_LENGTH);
        validation::email_format(errors, "email", v);
    }

    let username = validation::required(errors, "username", username);
    if let Some(v) = username.as_deref() {
        validation::non_blank(errors, "username", v);
    }

    let password = validation::required(errors, "password", password);
    if let Some(v) = password.as_deref() {
        validation::min_length(errors, "password", v, PASSWORD_MIN_LENGTH);
    }

    (email, username, password)
}

impl SignupRequest {
    pub fn validate(self) -> Result<NewUser, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let (email, username, password) =
            validate_credentials(&mut errors, self.email, self.username, self.password);

        let first_name = validation::required(&mut errors, "first_name", self.first_name);
        if let Some(v) = first_name.as_deref() {
            validation::min_length(&mut errors, "first_name", v, NAME_MIN_LENGTH);
        }
        let last_name = validation::required(&mut errors, "last_name", self.last_name);
        if let Some(v) = last_name.as_deref() {
            validation::min_length(&mut errors, "last_name", v, NAME_MIN_LENGTH);
        }

        match (email, username, password, first_name, last_name) {
            (Some(email), Some(username), Some(password), Some(first_name), Some(last_name))
                if errors.is_empty() =>
            {
                Ok(NewUser {
                    email,
                    username,
                    password,
                    first_name: Some(first_name),
                    last_name: Some(last_name),
                })
            }
            _ => Err(errors),
        }
    }
}

impl RegisterRequest {
    pub fn validate(self) -> Result<NewUser, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let (email, username, password) =
            validate_credentials(&mut errors, self.email, self.username, self.password);

        match (email, username, password) {
            (Some(email), Some(username), Some(password)) if errors.is_empty() => Ok(NewUser {
                email,
                username,
                password,
                first_name: None,
                last_name: None,
            }),
            _ => Err(errors),
        }
    }
}

/// Outbound user shape: email and username, nothing else.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub email: String,
    pub username: String,
}

impl UserResponse {
    pub fn from_user(user: &User) -> Self {
        Self {
            email: user.email.clone(),
            username: user.username.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PartnerStateRequest {
    pub user_id: String,
    pub state: bool,
}

#[derive(Debug, Serialize)]
pub struct PartnerStateResponse {
    pub state: bool,
}
