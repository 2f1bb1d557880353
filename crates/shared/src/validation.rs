//! Field-level form validation.
//!
//! Errors are keyed by form field and meant to be shown inline; they never
//! reach store state.

use std::collections::BTreeMap;

use crate::protocol::{LoginRequest, RegisterForm};

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_NAME_LEN: usize = 2;

/// Field name to message.
pub type FieldErrors = BTreeMap<&'static str, String>;

/// Loose `local@domain.tld` check, matching what the forms accept.
pub fn validate_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let local_ok = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c));
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    let host_ok = !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    let tld_ok = tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic());
    local_ok && host_ok && tld_ok
}

fn check_email(errors: &mut FieldErrors, email: &str) {
    if email.trim().is_empty() {
        errors.insert("email", "Email is required".to_string());
    } else if !validate_email(email) {
        errors.insert("email", "Invalid email".to_string());
    }
}

fn check_password(errors: &mut FieldErrors, password: &str) {
    if password.is_empty() {
        errors.insert("password", "Password is required".to_string());
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.insert(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        );
    }
}

fn check_name(errors: &mut FieldErrors, field: &'static str, label: &str, value: &str) {
    if value.trim().is_empty() {
        errors.insert(field, format!("{label} is required"));
    } else if value.trim().chars().count() < MIN_NAME_LEN {
        errors.insert(
            field,
            format!("{label} must be at least {MIN_NAME_LEN} characters"),
        );
    }
}

pub fn validate_login(form: &LoginRequest) -> FieldErrors {
    let mut errors = FieldErrors::new();
    check_email(&mut errors, &form.email);
    check_password(&mut errors, &form.password);
    errors
}

pub fn validate_register(form: &RegisterForm) -> FieldErrors {
    let mut errors = FieldErrors::new();
    check_name(&mut errors, "firstName", "First name", &form.first_name);
    check_name(&mut errors, "lastName", "Last name", &form.last_name);
    check_email(&mut errors, &form.email);
    check_password(&mut errors, &form.password);
    if form.confirm_password.is_empty() {
        errors.insert("confirmPassword", "Please confirm your password".into());
    } else if form.confirm_password != form.password {
        errors.insert("confirmPassword", "Passwords do not match".to_string());
    }
    errors
}
