//! Health programs: the named service offerings clients enroll in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::ProgramId;
use crate::time;

/// A health program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthProgram {
    pub id: ProgramId,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Program attributes supplied on creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProgram {
    pub name: String,
    pub description: String,
}

/// Patchable program fields. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl HealthProgram {
    /// Builds a new program record with a fresh id and matching timestamps.
    pub fn new(data: NewProgram) -> Self {
        let now = time::now();
        HealthProgram {
            id: ProgramId::generate(),
            name: data.name,
            description: data.description,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies `patch` in place and bumps `updated_at`.
    pub fn apply(&mut self, patch: ProgramPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        self.updated_at = time::touch(self.updated_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hiv() -> HealthProgram {
        HealthProgram::new(NewProgram {
            name: "HIV Prevention".into(),
            description: "Education and screening".into(),
        })
    }

    #[test]
    fn rename_keeps_description() {
        let mut program = hiv();
        let created = program.created_at;
        program.apply(ProgramPatch {
            name: Some("HIV Care".into()),
            description: None,
        });
        assert_eq!(program.name, "HIV Care");
        assert_eq!(program.description, "Education and screening");
        assert_eq!(program.created_at, created);
        assert!(program.updated_at >= created);
    }
}
