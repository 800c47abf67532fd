//! Enrollments: the link between one client and one health program.
//!
//! Status transitions are deliberately unconstrained; any status may be set
//! to any other. The only workflow-specific helper is
//! [`EnrollmentPatch::withdraw`], used by cancellation.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::id::{ClientId, EnrollmentId, ProgramId};
use crate::time;

/// Lifecycle status of an enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    Active,
    Completed,
    Withdrawn,
}

impl EnrollmentStatus {
    /// The lowercase wire/storage form.
    pub fn as_str(self) -> &'static str {
        match self {
            EnrollmentStatus::Active => "active",
            EnrollmentStatus::Completed => "completed",
            EnrollmentStatus::Withdrawn => "withdrawn",
        }
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnrollmentStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(EnrollmentStatus::Active),
            "completed" => Ok(EnrollmentStatus::Completed),
            "withdrawn" => Ok(EnrollmentStatus::Withdrawn),
            _ => Err(CoreError::UnknownStatus {
                value: s.to_string(),
            }),
        }
    }
}

/// An enrollment of a client in a health program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: EnrollmentId,
    pub client_id: ClientId,
    pub program_id: ProgramId,
    pub enrollment_date: DateTime<Utc>,
    pub status: EnrollmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Patchable enrollment fields. The client and program an enrollment links
/// are fixed at creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrollmentPatch {
    pub status: Option<EnrollmentStatus>,
    /// `Some(None)` clears the notes.
    pub notes: Option<Option<String>>,
}

impl EnrollmentPatch {
    /// The patch applied by cancellation.
    pub fn withdraw() -> Self {
        EnrollmentPatch {
            status: Some(EnrollmentStatus::Withdrawn),
            notes: None,
        }
    }
}

impl Enrollment {
    /// Builds a new active enrollment dated now. Missing notes become an
    /// empty string.
    pub fn new(client_id: ClientId, program_id: ProgramId, notes: Option<String>) -> Self {
        let now = time::now();
        Enrollment {
            id: EnrollmentId::generate(),
            client_id,
            program_id,
            enrollment_date: now,
            status: EnrollmentStatus::Active,
            notes: Some(notes.unwrap_or_default()),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == EnrollmentStatus::Active
    }

    /// Whether this enrollment links exactly `client` and `program`.
    pub fn links(&self, client: &ClientId, program: &ProgramId) -> bool {
        &self.client_id == client && &self.program_id == program
    }

    /// Applies `patch` in place and bumps `updated_at`.
    pub fn apply(&mut self, patch: EnrollmentPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        self.updated_at = time::touch(self.updated_at);
    }
}
