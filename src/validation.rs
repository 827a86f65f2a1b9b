use crate::errors::ValidationErrors;

pub const EMAIL_MAX_LENGTH: usize = 254;

/// Unwraps a required field, recording an error when it is absent.
pub fn required(errors: &mut ValidationErrors, field: &str, value: Option<String>) -> Option<String> {
    match value {
        Some(v) => Some(v),
        None => {
            errors.add(field, "this field is required");
            None
        }
    }
}

pub fn non_blank(errors: &mut ValidationErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, "may not be blank");
    }
}

pub fn min_length(errors: &mut ValidationErrors, field: &str, value: &str, min: usize) {
    if value.chars().count() < min {
        errors.add(field, format!("must be at least {} characters", min));
    }
}

/// Structural email check: one @ with a non-empty local part and domain,
/// within the RFC 5321 length limit.
pub fn email_format(errors: &mut ValidationErrors, field: &str, value: &str) {
    if value.len() > EMAIL_MAX_LENGTH {
        errors.add(field, format!("must be at most {} characters", EMAIL_MAX_LENGTH));
        return;
    }
    let valid = match value.find('@') {
        Some(at) => at > 0 && at < value.len() - 1 && !value.contains(char::is_whitespace),
        None => false,
    };
    if !valid {
        errors.add(field, "is not a valid email address");
    }
}
