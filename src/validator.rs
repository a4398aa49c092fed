//! New-user form validation.
//!
//! [`validate`] returns every problem with a form at once, as display-ready
//! messages in field order. An empty list means the form can be submitted.
//! Each field reports at most one message: the first rule it fails.

use chrono::{NaiveDate, Utc};
use rollbook_models::{Email, Gender, PhoneNumber, Role, UserForm};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Validate `form` for a new user with `role`, using today's UTC date.
pub fn validate(role: Role, form: &UserForm) -> Vec<String> {
    validate_at(role, form, Utc::now().date_naive())
}

/// Validate `form` as of `today`.
pub fn validate_at(role: Role, form: &UserForm, today: NaiveDate) -> Vec<String> {
    let mut errors = Vec::new();

    require(&mut errors, &form.first_name, "First name is required");
    require(&mut errors, &form.last_name, "Last name is required");

    match present(&form.email) {
        None => errors.push("Email is required".to_string()),
        Some(email) if Email::new(email).is_err() => {
            errors.push("Please enter a valid email address".to_string())
        }
        Some(_) => {}
    }

    match present(&form.phone) {
        None => errors.push("Phone number is required".to_string()),
        Some(phone) if PhoneNumber::new(phone).is_err() => {
            errors.push(format!("Phone number must be {} digits", PhoneNumber::DIGITS))
        }
        Some(_) => {}
    }

    match present(&form.date_of_birth) {
        None => errors.push("Date of birth is required".to_string()),
        Some(dob) => match NaiveDate::parse_from_str(dob, DATE_FORMAT) {
            Err(_) => {
                errors.push("Date of birth must be a valid date (YYYY-MM-DD)".to_string())
            }
            Ok(date) if date > today => {
                errors.push("Date of birth cannot be in the future".to_string())
            }
            Ok(_) => {}
        },
    }

    match present(&form.gender) {
        None => errors.push("Gender is required".to_string()),
        Some(gender) if gender.parse::<Gender>().is_err() => {
            errors.push("Gender must be male, female or other".to_string())
        }
        Some(_) => {}
    }

    require(&mut errors, &form.address, "Address is required");

    if role == Role::Student {
        require(&mut errors, &form.class_name, "Class is required");
        require(&mut errors, &form.father_name, "Father's name is required");
        require(&mut errors, &form.mother_name, "Mother's name is required");
    }

    errors
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn require(errors: &mut Vec<String>, field: &Option<String>, message: &str) {
    if present(field).is_none() {
        errors.push(message.to_string());
    }
}
