//! Enrollment request types.

use carepoint_core::{ClientId, EnrollmentPatch, EnrollmentStatus, ProgramId};
use serde::Deserialize;

use crate::error::ApiError;
use crate::schema::common::{present, require};

/// Query string of `GET /enrollments`. Every filter is optional and they
/// combine with AND.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EnrollmentQuery {
    pub client_id: Option<ClientId>,
    pub program_id: Option<ProgramId>,
    pub status: Option<EnrollmentStatus>,
}

/// Body of `POST /enrollments`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateEnrollmentRequest {
    pub client_id: String,
    pub program_id: String,
    pub notes: Option<String>,
}

/// Validated enrollment request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollRequest {
    pub client_id: ClientId,
    pub program_id: ProgramId,
    pub notes: Option<String>,
}

/// Body of `PUT /enrollments/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateEnrollmentRequest {
    pub status: Option<EnrollmentStatus>,
    #[serde(deserialize_with = "present")]
    pub notes: Option<Option<String>>,
}

impl CreateEnrollmentRequest {
    pub fn validate(self) -> Result<EnrollRequest, ApiError> {
        Ok(EnrollRequest {
            client_id: require(self.client_id, "Client is required")?.into(),
            program_id: require(self.program_id, "Program is required")?.into(),
            notes: self.notes,
        })
    }
}

impl UpdateEnrollmentRequest {
    pub fn into_patch(self) -> EnrollmentPatch {
        EnrollmentPatch {
            status: self.status,
            notes: self.notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_both_ids() {
        let req: CreateEnrollmentRequest =
            serde_json::from_str(r#"{"clientId": "c1"}"#).unwrap();
        assert!(matches!(req.validate(), Err(ApiError::BadRequest(m)) if m == "Program is required"));
    }

    #[test]
    fn unknown_status_fails_to_deserialize() {
        let parsed = serde_json::from_str::<UpdateEnrollmentRequest>(r#"{"status": "paused"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn update_maps_to_patch() {
        let req: UpdateEnrollmentRequest =
            serde_json::from_str(r#"{"status": "completed", "notes": null}"#).unwrap();
        let patch = req.into_patch();
        assert_eq!(patch.status, Some(EnrollmentStatus::Completed));
        assert_eq!(patch.notes, Some(None));
    }
}
