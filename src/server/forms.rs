//! Contact and newsletter form endpoints
//!
//! Both accept a JSON body or a urlencoded HTML form and answer with a
//! `{success, message}` JSON object. Submissions are only logged.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::sync::LazyLock;

/// Shortest accepted contact message, in characters
const MIN_MESSAGE_LEN: usize = 10;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Form payload decoded from JSON or `application/x-www-form-urlencoded`
pub struct Submission<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for Submission<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = request
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/json"));

        if is_json {
            match Json::<T>::from_request(request, state).await {
                Ok(Json(value)) => Ok(Self(value)),
                Err(e) => Err(reply(StatusCode::BAD_REQUEST, false, &e.body_text())),
            }
        } else {
            match Form::<T>::from_request(request, state).await {
                Ok(Form(value)) => Ok(Self(value)),
                Err(e) => Err(reply(StatusCode::BAD_REQUEST, false, &e.body_text())),
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SubscribeForm {
    pub email: Option<String>,
}

/// Validation failure with per-field messages
#[derive(Debug, PartialEq)]
pub struct Invalid {
    pub message: &'static str,
    pub errors: Vec<(&'static str, &'static str)>,
}

impl Invalid {
    fn into_response(self) -> Response {
        let errors: Map<String, Value> = self
            .errors
            .into_iter()
            .map(|(field, text)| (field.to_string(), Value::from(text)))
            .collect();
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "message": self.message, "errors": errors })),
        )
            .into_response()
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

impl ContactForm {
    pub fn validate(&self) -> Result<(), Invalid> {
        let required = [
            ("name", &self.name, "Name is required"),
            ("email", &self.email, "Email is required"),
            ("subject", &self.subject, "Subject is required"),
            ("message", &self.message, "Message is required"),
        ];
        let missing: Vec<_> = required
            .iter()
            .filter(|(_, value, _)| present(value).is_none())
            .map(|(field, _, text)| (*field, *text))
            .collect();
        if !missing.is_empty() {
            return Err(Invalid {
                message: "Missing required fields",
                errors: missing,
            });
        }

        if !present(&self.email).is_some_and(is_valid_email) {
            return Err(Invalid {
                message: "Invalid email format",
                errors: vec![("email", "Please enter a valid email address")],
            });
        }

        let length = present(&self.message).map_or(0, |m| m.chars().count());
        if length < MIN_MESSAGE_LEN {
            return Err(Invalid {
                message: "Message too short",
                errors: vec![("message", "Message must be at least 10 characters long")],
            });
        }

        Ok(())
    }
}

pub async fn contact(Submission(form): Submission<ContactForm>) -> Response {
    if let Err(invalid) = form.validate() {
        tracing::debug!("Rejected contact form: {}", invalid.message);
        return invalid.into_response();
    }

    tracing::info!(
        name = present(&form.name).unwrap_or_default(),
        email = present(&form.email).unwrap_or_default(),
        company = present(&form.company).unwrap_or_default(),
        subject = present(&form.subject).unwrap_or_default(),
        message_chars = present(&form.message).map_or(0, |m| m.chars().count()),
        "Contact form submission"
    );
    reply(StatusCode::OK, true, "Message sent successfully")
}

pub async fn subscribe(Submission(form): Submission<SubscribeForm>) -> Response {
    let Some(email) = present(&form.email) else {
        return reply(StatusCode::BAD_REQUEST, false, "Email is required");
    };
    if !is_valid_email(email) {
        return reply(StatusCode::BAD_REQUEST, false, "Invalid email format");
    }

    tracing::info!(email, "New newsletter subscription");
    reply(
        StatusCode::OK,
        true,
        "Subscription successful! Thank you for subscribing.",
    )
}

pub async fn method_not_allowed() -> Response {
    reply(StatusCode::METHOD_NOT_ALLOWED, false, "Method not allowed")
}

fn reply(status: StatusCode, success: bool, message: &str) -> Response {
    (
        status,
        Json(json!({ "success": success, "message": message })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(message: &str) -> ContactForm {
        ContactForm {
            name: Some("Ada".to_string()),
            email: Some("ada@example.com".to_string()),
            company: None,
            subject: Some("Project".to_string()),
            message: Some(message.to_string()),
        }
    }

    #[test]
    fn test_email_format() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.d"));
        assert!(!is_valid_email("@c.d"));
    }

    #[test]
    fn test_contact_validation() {
        assert!(contact("Long enough message").validate().is_ok());

        let short = contact("Too short").validate().unwrap_err();
        assert_eq!(short.message, "Message too short");

        let mut form = contact("Long enough message");
        form.email = Some("nope".to_string());
        assert_eq!(form.validate().unwrap_err().message, "Invalid email format");
    }

    #[test]
    fn test_contact_lists_every_missing_field() {
        let form = ContactForm {
            name: Some("  ".to_string()),
            ..ContactForm::default()
        };
        let invalid = form.validate().unwrap_err();
        assert_eq!(invalid.message, "Missing required fields");
        let fields: Vec<_> = invalid.errors.iter().map(|(f, _)| *f).collect();
        assert_eq!(fields, vec!["name", "email", "subject", "message"]);
    }
}
