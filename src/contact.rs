//! Contact form handling
//!
//! Submissions are validated and logged. Nothing is delivered anywhere.

use percent_encoding::percent_decode_str;
use serde::Serialize;

use crate::helpers::validate_email;

/// A contact form submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub message: String,
    pub services: Vec<String>,
}

/// A validation failure on one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl ContactForm {
    /// Parse an `application/x-www-form-urlencoded` body
    ///
    /// `services` may repeat; unknown keys are ignored.
    pub fn parse(body: &str) -> Self {
        let mut form = ContactForm::default();

        for pair in body.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let value = decode_component(value);
            match decode_component(key).as_str() {
                "name" => form.name = value.trim().to_string(),
                "email" => form.email = value.trim().to_string(),
                "company" => {
                    let company = value.trim();
                    form.company = (!company.is_empty()).then(|| company.to_string());
                }
                "message" => form.message = value.trim().to_string(),
                "services" | "services[]" => {
                    let service = value.trim();
                    if !service.is_empty() && !form.services.iter().any(|s| s == service) {
                        form.services.push(service.to_string());
                    }
                }
                _ => {}
            }
        }

        form
    }

    /// Check required fields, the email shape and the offered services
    pub fn validate(&self, offered_services: &[String]) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.name.is_empty() {
            errors.push(FieldError::new("name", "Please enter your name"));
        }
        if self.email.is_empty() {
            errors.push(FieldError::new("email", "Please enter your email"));
        } else if !validate_email(&self.email) {
            errors.push(FieldError::new("email", "Please enter a valid email address"));
        }
        if self.message.is_empty() {
            errors.push(FieldError::new("message", "Please tell us about your project"));
        }
        for service in &self.services {
            if !offered_services.contains(service) {
                errors.push(FieldError::new(
                    "services",
                    format!("Unknown service: {}", service),
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Accept a validated submission
pub fn submit(form: &ContactForm) {
    tracing::info!(
        name = %form.name,
        email = %form.email,
        company = form.company.as_deref().unwrap_or("-"),
        services = ?form.services,
        "Received contact request ({} characters)",
        form.message.chars().count()
    );
}

fn decode_component(s: &str) -> String {
    let s = s.replace('+', " ");
    percent_decode_str(&s).decode_utf8_lossy().into_owned()
}
