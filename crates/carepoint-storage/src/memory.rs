//! In-memory implementation of [`RecordStore`].
//!
//! [`InMemoryStore`] is a first-class backend for tests, ephemeral sessions,
//! and (wrapped in [`crate::SnapshotStore`]) snapshot-backed deployments. It
//! keeps each collection in a `Vec` so iteration follows insertion order,
//! and enforces the same id uniqueness and reference checks the SQLite
//! schema does.

use carepoint_core::{Client, ClientId, Enrollment, EnrollmentId, HealthProgram, ProgramId};

use crate::error::StorageError;
use crate::snapshot::Snapshot;
use crate::traits::RecordStore;

/// Vector-backed record store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    clients: Vec<Client>,
    programs: Vec<HealthProgram>,
    enrollments: Vec<Enrollment>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the records of `snapshot`, checked the same
    /// way as individual inserts.
    pub fn from_snapshot(snapshot: &Snapshot) -> Result<Self, StorageError> {
        let mut store = Self::new();
        store.import_snapshot(snapshot)?;
        Ok(store)
    }

    fn duplicate(kind: &str, id: &str) -> StorageError {
        StorageError::IntegrityError {
            reason: format!("{kind} {id} already exists"),
        }
    }

    fn missing(kind: &str, id: &str) -> StorageError {
        StorageError::IntegrityError {
            reason: format!("{kind} {id} does not exist"),
        }
    }
}

impl RecordStore for InMemoryStore {
    fn get_client(&self, id: &ClientId) -> Result<Option<Client>, StorageError> {
        Ok(self.clients.iter().find(|c| &c.id == id).cloned())
    }

    fn get_program(&self, id: &ProgramId) -> Result<Option<HealthProgram>, StorageError> {
        Ok(self.programs.iter().find(|p| &p.id == id).cloned())
    }

    fn get_enrollment(&self, id: &EnrollmentId) -> Result<Option<Enrollment>, StorageError> {
        Ok(self.enrollments.iter().find(|e| &e.id == id).cloned())
    }

    fn list_clients(&self) -> Result<Vec<Client>, StorageError> {
        Ok(self.clients.clone())
    }

    fn list_programs(&self) -> Result<Vec<HealthProgram>, StorageError> {
        Ok(self.programs.clone())
    }

    fn list_enrollments(&self) -> Result<Vec<Enrollment>, StorageError> {
        Ok(self.enrollments.clone())
    }

    fn find_enrollments_by_client(&self, id: &ClientId) -> Result<Vec<Enrollment>, StorageError> {
        Ok(self
            .enrollments
            .iter()
            .filter(|e| &e.client_id == id)
            .cloned()
            .collect())
    }

    fn find_enrollments_by_program(
        &self,
        id: &ProgramId,
    ) -> Result<Vec<Enrollment>, StorageError> {
        Ok(self
            .enrollments
            .iter()
            .filter(|e| &e.program_id == id)
            .cloned()
            .collect())
    }

    fn find_active_enrollment(
        &self,
        client: &ClientId,
        program: &ProgramId,
    ) -> Result<Option<Enrollment>, StorageError> {
        Ok(self
            .enrollments
            .iter()
            .find(|e| e.links(client, program) && e.is_active())
            .cloned())
    }

    fn insert_client(&mut self, client: &Client) -> Result<(), StorageError> {
        if self.clients.iter().any(|c| c.id == client.id) {
            return Err(Self::duplicate("client", client.id.as_str()));
        }
        self.clients.push(client.clone());
        Ok(())
    }

    fn replace_client(&mut self, client: &Client) -> Result<(), StorageError> {
        let slot = self
            .clients
            .iter_mut()
            .find(|c| c.id == client.id)
            .ok_or_else(|| Self::missing("client", client.id.as_str()))?;
        *slot = client.clone();
        Ok(())
    }

    fn delete_client(&mut self, id: &ClientId) -> Result<bool, StorageError> {
        let before = self.clients.len();
        self.clients.retain(|c| &c.id != id);
        if self.clients.len() == before {
            return Ok(false);
        }
        self.enrollments.retain(|e| &e.client_id != id);
        Ok(true)
    }

    fn insert_program(&mut self, program: &HealthProgram) -> Result<(), StorageError> {
        if self.programs.iter().any(|p| p.id == program.id) {
            return Err(Self::duplicate("program", program.id.as_str()));
        }
        self.programs.push(program.clone());
        Ok(())
    }

    fn replace_program(&mut self, program: &HealthProgram) -> Result<(), StorageError> {
        let slot = self
            .programs
            .iter_mut()
            .find(|p| p.id == program.id)
            .ok_or_else(|| Self::missing("program", program.id.as_str()))?;
        *slot = program.clone();
        Ok(())
    }

    fn delete_program(&mut self, id: &ProgramId) -> Result<bool, StorageError> {
        let before = self.programs.len();
        self.programs.retain(|p| &p.id != id);
        if self.programs.len() == before {
            return Ok(false);
        }
        self.enrollments.retain(|e| &e.program_id != id);
        Ok(true)
    }

    fn insert_enrollment(&mut self, enrollment: &Enrollment) -> Result<(), StorageError> {
        if self.enrollments.iter().any(|e| e.id == enrollment.id) {
            return Err(Self::duplicate("enrollment", enrollment.id.as_str()));
        }
        if !self.clients.iter().any(|c| c.id == enrollment.client_id) {
            return Err(Self::missing("client", enrollment.client_id.as_str()));
        }
        if !self.programs.iter().any(|p| p.id == enrollment.program_id) {
            return Err(Self::missing("program", enrollment.program_id.as_str()));
        }
        self.enrollments.push(enrollment.clone());
        Ok(())
    }

    fn replace_enrollment(&mut self, enrollment: &Enrollment) -> Result<(), StorageError> {
        let slot = self
            .enrollments
            .iter_mut()
            .find(|e| e.id == enrollment.id)
            .ok_or_else(|| Self::missing("enrollment", enrollment.id.as_str()))?;
        *slot = enrollment.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carepoint_core::{EnrollmentStatus, Gender, NewClient, NewProgram};
    use chrono::NaiveDate;

    fn new_client(first: &str) -> NewClient {
        NewClient {
            first_name: first.into(),
            last_name: "Tester".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            gender: Gender::Female,
            contact_number: "555".into(),
            email: None,
            address: "Somewhere".into(),
            medical_history: None,
        }
    }

    fn new_program(name: &str) -> NewProgram {
        NewProgram {
            name: name.into(),
            description: "desc".into(),
        }
    }

    #[test]
    fn lists_preserve_insertion_order() {
        let mut store = InMemoryStore::new();
        for name in ["Ann", "Bob", "Cid"] {
            store.add_client(new_client(name)).unwrap();
        }
        let names: Vec<_> = store
            .list_clients()
            .unwrap()
            .into_iter()
            .map(|c| c.first_name)
            .collect();
        assert_eq!(names, vec!["Ann", "Bob", "Cid"]);
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut store = InMemoryStore::new();
        let client = store.add_client(new_client("Ann")).unwrap();
        let err = store.insert_client(&client).unwrap_err();
        assert!(matches!(err, StorageError::IntegrityError { .. }));
        assert_eq!(store.list_clients().unwrap().len(), 1);
    }

    #[test]
    fn dangling_enrollment_insert_is_rejected() {
        let mut store = InMemoryStore::new();
        let program = store.add_program(new_program("TB")).unwrap();
        let orphan = Enrollment::new(ClientId::new("ghost"), program.id, None);
        assert!(store.insert_enrollment(&orphan).is_err());
        assert!(store.list_enrollments().unwrap().is_empty());
    }

    #[test]
    fn deleting_program_keeps_other_programs_enrollments() {
        let mut store = InMemoryStore::new();
        let client = store.add_client(new_client("Ann")).unwrap();
        let a = store.add_program(new_program("A")).unwrap();
        let b = store.add_program(new_program("B")).unwrap();
        store
            .enroll_client_in_program(&client.id, &a.id, None)
            .unwrap()
            .unwrap();
        let kept = store
            .enroll_client_in_program(&client.id, &b.id, None)
            .unwrap()
            .unwrap();

        assert!(store.delete_program(&a.id).unwrap());
        let remaining = store.list_enrollments().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, kept.id);
    }

    #[test]
    fn from_snapshot_rejects_duplicates_and_dangling_references() {
        let mut store = InMemoryStore::new();
        let client = store.add_client(new_client("Ann")).unwrap();
        let program = store.add_program(new_program("A")).unwrap();

        let duplicated = Snapshot {
            clients: vec![client.clone(), client],
            ..Default::default()
        };
        assert!(InMemoryStore::from_snapshot(&duplicated).is_err());

        let dangling = Snapshot {
            programs: vec![program.clone()],
            enrollments: vec![Enrollment::new(ClientId::new("gone"), program.id, None)],
            ..Default::default()
        };
        assert!(matches!(
            InMemoryStore::from_snapshot(&dangling),
            Err(StorageError::IntegrityError { .. })
        ));
    }

    #[test]
    fn snapshot_round_trip_preserves_records() {
        let mut store = InMemoryStore::new();
        let client = store.add_client(new_client("Ann")).unwrap();
        let program = store.add_program(new_program("A")).unwrap();
        let enrollment = store
            .enroll_client_in_program(&client.id, &program.id, Some("n".into()))
            .unwrap()
            .unwrap();

        let restored = InMemoryStore::from_snapshot(&store.snapshot().unwrap()).unwrap();
        assert_eq!(restored.get_client(&client.id).unwrap(), Some(client));
        let e = restored.get_enrollment(&enrollment.id).unwrap().unwrap();
        assert_eq!(e.status, EnrollmentStatus::Active);
        assert_eq!(e, enrollment);
    }
}
