//! Health program request and response types.

use carepoint_core::{HealthProgram, NewProgram, ProgramId, ProgramPatch};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::schema::common::{require, require_if_present};

/// Body of `POST /programs`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateProgramRequest {
    pub name: String,
    pub description: String,
}

/// Body of `PUT /programs/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateProgramRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl CreateProgramRequest {
    pub fn validate(self) -> Result<NewProgram, ApiError> {
        Ok(NewProgram {
            name: require(self.name, "Program name is required")?,
            description: require(self.description, "Description is required")?,
        })
    }
}

impl UpdateProgramRequest {
    pub fn validate(self) -> Result<ProgramPatch, ApiError> {
        Ok(ProgramPatch {
            name: require_if_present(self.name, "Program name is required")?,
            description: require_if_present(self.description, "Description is required")?,
        })
    }
}

/// Entry of the unauthenticated `GET /public/programs` listing.
#[derive(Debug, Clone, Serialize)]
pub struct PublicProgramView {
    pub id: ProgramId,
    pub name: String,
    pub description: String,
}

impl From<HealthProgram> for PublicProgramView {
    fn from(program: HealthProgram) -> Self {
        PublicProgramView {
            id: program.id,
            name: program.name,
            description: program.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_both_fields() {
        let req = CreateProgramRequest {
            name: "TB Treatment".into(),
            description: String::new(),
        };
        assert!(matches!(req.validate(), Err(ApiError::BadRequest(m)) if m == "Description is required"));
    }

    #[test]
    fn empty_update_is_a_no_op_patch() {
        let req: UpdateProgramRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.validate().unwrap(), ProgramPatch::default());
    }
}
