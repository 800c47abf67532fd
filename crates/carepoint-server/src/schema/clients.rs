//! Client request types and field validation.
//!
//! Requests are deserialized with every field optional so that a missing
//! field produces the same `BAD_REQUEST` message as an empty one.

use std::sync::LazyLock;

use carepoint_core::{ClientPatch, Gender, NewClient};
use chrono::NaiveDate;
use regex::Regex;
use serde::Deserialize;

use crate::error::ApiError;
use crate::schema::common::{present, require, require_if_present};

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Query string of `GET /clients`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientSearchQuery {
    #[serde(default)]
    pub search: Option<String>,
}

/// Body of `POST /clients`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateClientRequest {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub gender: String,
    pub contact_number: String,
    pub email: Option<String>,
    pub address: String,
    pub medical_history: Option<String>,
}

/// Body of `PUT /clients/{id}`. Absent fields are left unchanged; `email`
/// and `medicalHistory` may be `null` to clear them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateClientRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub contact_number: Option<String>,
    #[serde(deserialize_with = "present")]
    pub email: Option<Option<String>>,
    pub address: Option<String>,
    #[serde(deserialize_with = "present")]
    pub medical_history: Option<Option<String>>,
}

fn parse_date(value: &str) -> Result<NaiveDate, ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::BadRequest("Date of birth is required".into()));
    }
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        ApiError::BadRequest("Date of birth must be a valid date (YYYY-MM-DD)".into())
    })
}

fn parse_gender(value: &str) -> Result<Gender, ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::BadRequest("Gender is required".into()));
    }
    value
        .parse()
        .map_err(|_| ApiError::BadRequest("Gender must be male, female or other".into()))
}

/// Blank emails count as absent; anything else must look like an address.
fn parse_email(value: Option<String>) -> Result<Option<String>, ApiError> {
    match value {
        Some(email) if !email.trim().is_empty() => {
            let email = email.trim().to_string();
            if EMAIL.is_match(&email) {
                Ok(Some(email))
            } else {
                Err(ApiError::BadRequest("Invalid email address".into()))
            }
        }
        _ => Ok(None),
    }
}

impl CreateClientRequest {
    pub fn validate(self) -> Result<NewClient, ApiError> {
        Ok(NewClient {
            first_name: require(self.first_name, "First name is required")?,
            last_name: require(self.last_name, "Last name is required")?,
            date_of_birth: parse_date(&self.date_of_birth)?,
            gender: parse_gender(&self.gender)?,
            contact_number: require(self.contact_number, "Contact number is required")?,
            email: parse_email(self.email)?,
            address: require(self.address, "Address is required")?,
            medical_history: self.medical_history,
        })
    }
}

impl UpdateClientRequest {
    pub fn validate(self) -> Result<ClientPatch, ApiError> {
        Ok(ClientPatch {
            first_name: require_if_present(self.first_name, "First name is required")?,
            last_name: require_if_present(self.last_name, "Last name is required")?,
            date_of_birth: self.date_of_birth.as_deref().map(parse_date).transpose()?,
            gender: self.gender.as_deref().map(parse_gender).transpose()?,
            contact_number: require_if_present(
                self.contact_number,
                "Contact number is required",
            )?,
            email: self.email.map(parse_email).transpose()?,
            address: require_if_present(self.address, "Address is required")?,
            medical_history: self.medical_history,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> CreateClientRequest {
        serde_json::from_value(serde_json::json!({
            "firstName": "John",
            "lastName": "Doe",
            "dateOfBirth": "1985-05-15",
            "gender": "male",
            "contactNumber": "+1234567890",
            "email": "john.doe@example.com",
            "address": "123 Main St"
        }))
        .unwrap()
    }

    fn rejection(req: CreateClientRequest) -> String {
        match req.validate().unwrap_err() {
            ApiError::BadRequest(msg) => msg,
            other => panic!("expected BadRequest, got {other:?}"),
        }
    }

    #[test]
    fn valid_request_builds_new_client() {
        let client = valid().validate().unwrap();
        assert_eq!(client.gender, Gender::Male);
        assert_eq!(client.date_of_birth, NaiveDate::from_ymd_opt(1985, 5, 15).unwrap());
        assert_eq!(client.email.as_deref(), Some("john.doe@example.com"));
    }

    #[test]
    fn missing_field_reads_like_empty_field() {
        let req: CreateClientRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(rejection(req), "First name is required");
    }

    #[test]
    fn rejects_bad_date_gender_and_email() {
        let mut req = valid();
        req.date_of_birth = "15/05/1985".into();
        assert!(rejection(req).contains("YYYY-MM-DD"));

        let mut req = valid();
        req.gender = "robot".into();
        assert!(rejection(req).starts_with("Gender"));

        let mut req = valid();
        req.email = Some("not-an-email".into());
        assert_eq!(rejection(req), "Invalid email address");
    }

    #[test]
    fn blank_email_is_dropped() {
        let mut req = valid();
        req.email = Some("  ".into());
        assert_eq!(req.validate().unwrap().email, None);
    }

    #[test]
    fn patch_keeps_absent_fields_and_clears_null_ones() {
        let req: UpdateClientRequest =
            serde_json::from_str(r#"{"address": "9 Elm", "email": null}"#).unwrap();
        let patch = req.validate().unwrap();
        assert_eq!(patch.address.as_deref(), Some("9 Elm"));
        assert_eq!(patch.email, Some(None));
        assert_eq!(patch.first_name, None);
        assert_eq!(patch.medical_history, None);
    }

    #[test]
    fn patch_rejects_blank_present_name() {
        let req: UpdateClientRequest = serde_json::from_str(r#"{"lastName": ""}"#).unwrap();
        assert!(req.validate().is_err());
    }
}
