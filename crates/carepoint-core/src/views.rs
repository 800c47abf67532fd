//! Read-only join views.
//!
//! These are what the relational accessors return: an entity flattened
//! together with its enrollments, each enrollment carrying the entity on the
//! other side of the link.

use serde::Serialize;

use crate::client::Client;
use crate::enrollment::Enrollment;
use crate::program::HealthProgram;

/// An enrollment with its program embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrollmentWithProgram {
    #[serde(flatten)]
    pub enrollment: Enrollment,
    pub program: HealthProgram,
}

/// An enrollment with its client embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrollmentWithClient {
    #[serde(flatten)]
    pub enrollment: Enrollment,
    pub client: Client,
}

/// A client together with every enrollment it has, whatever the status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientWithEnrollments {
    #[serde(flatten)]
    pub client: Client,
    pub enrollments: Vec<EnrollmentWithProgram>,
}

/// A program together with every enrollment in it, whatever the status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgramWithEnrollments {
    #[serde(flatten)]
    pub program: HealthProgram,
    pub enrollments: Vec<EnrollmentWithClient>,
}

impl ClientWithEnrollments {
    /// Enrollments currently active.
    pub fn active(&self) -> impl Iterator<Item = &EnrollmentWithProgram> {
        self.enrollments.iter().filter(|e| e.enrollment.is_active())
    }
}

impl ProgramWithEnrollments {
    /// Enrollments currently active.
    pub fn active(&self) -> impl Iterator<Item = &EnrollmentWithClient> {
        self.enrollments.iter().filter(|e| e.enrollment.is_active())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::NewProgram;
    use crate::{ClientId, EnrollmentPatch};

    #[test]
    fn flattens_enrollment_next_to_embedded_program() {
        let program = HealthProgram::new(NewProgram {
            name: "TB Treatment".into(),
            description: "Monitoring".into(),
        });
        let enrollment = Enrollment::new(ClientId::new("c1"), program.id.clone(), None);
        let view = EnrollmentWithProgram {
            enrollment,
            program,
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["clientId"], "c1");
        assert_eq!(json["status"], "active");
        assert_eq!(json["program"]["name"], "TB Treatment");
    }

    #[test]
    fn active_filters_by_status() {
        let program = HealthProgram::new(NewProgram {
            name: "Malaria Control".into(),
            description: "Prevention".into(),
        });
        let mut withdrawn = Enrollment::new(ClientId::new("c1"), program.id.clone(), None);
        withdrawn.apply(EnrollmentPatch::withdraw());
        let active = Enrollment::new(ClientId::new("c2"), program.id.clone(), None);

        let client = |id: &str| {
            let mut c = crate::Client::new(crate::NewClient {
                first_name: "A".into(),
                last_name: "B".into(),
                date_of_birth: chrono::NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
                gender: crate::Gender::Other,
                contact_number: "1".into(),
                email: None,
                address: "x".into(),
                medical_history: None,
            });
            c.id = ClientId::new(id);
            c
        };

        let view = ProgramWithEnrollments {
            program,
            enrollments: vec![
                EnrollmentWithClient {
                    enrollment: withdrawn,
                    client: client("c1"),
                },
                EnrollmentWithClient {
                    enrollment: active,
                    client: client("c2"),
                },
            ],
        };
        let ids: Vec<_> = view.active().map(|e| e.client.id.as_str()).collect();
        assert_eq!(ids, vec!["c2"]);
    }
}
