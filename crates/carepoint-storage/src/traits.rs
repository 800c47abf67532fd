//! The [`RecordStore`] trait defining the storage contract for the registry.
//!
//! Two-layer API design:
//! - **Primitive** methods form the trait foundation. Each one reads or
//!   writes a single record (or, for deletes, a record and its dependent
//!   enrollments). Backends implement these.
//! - **Registry operations** are provided methods built on the primitives:
//!   id/timestamp assignment, patch application, idempotent enrollment,
//!   and the relational joins.
//!
//! All backends (InMemoryStore, SnapshotStore, SqliteStore) implement this
//! trait, ensuring they are fully swappable without changing callers.

use carepoint_core::{
    Client, ClientId, ClientPatch, ClientWithEnrollments, Enrollment, EnrollmentId,
    EnrollmentPatch, EnrollmentWithClient, EnrollmentWithProgram, HealthProgram, NewClient,
    NewProgram, ProgramId, ProgramPatch, ProgramWithEnrollments,
};

use crate::error::StorageError;
use crate::snapshot::Snapshot;

/// The storage contract for clients, programs and enrollments.
///
/// The trait is synchronous: every operation runs to completion on the
/// calling thread. Callers sharing a store across tasks wrap it in a mutex.
pub trait RecordStore {
    // -------------------------------------------------------------------
    // Lookup by id
    // -------------------------------------------------------------------

    /// Retrieves a client by id.
    fn get_client(&self, id: &ClientId) -> Result<Option<Client>, StorageError>;

    /// Retrieves a program by id.
    fn get_program(&self, id: &ProgramId) -> Result<Option<HealthProgram>, StorageError>;

    /// Retrieves an enrollment by id.
    fn get_enrollment(&self, id: &EnrollmentId) -> Result<Option<Enrollment>, StorageError>;

    // -------------------------------------------------------------------
    // Collections (insertion order)
    // -------------------------------------------------------------------

    fn list_clients(&self) -> Result<Vec<Client>, StorageError>;

    fn list_programs(&self) -> Result<Vec<HealthProgram>, StorageError>;

    fn list_enrollments(&self) -> Result<Vec<Enrollment>, StorageError>;

    /// All enrollments of a client, whatever their status.
    fn find_enrollments_by_client(&self, id: &ClientId) -> Result<Vec<Enrollment>, StorageError>;

    /// All enrollments in a program, whatever their status.
    fn find_enrollments_by_program(
        &self,
        id: &ProgramId,
    ) -> Result<Vec<Enrollment>, StorageError>;

    /// The first active enrollment linking `client` and `program`, if any.
    fn find_active_enrollment(
        &self,
        client: &ClientId,
        program: &ProgramId,
    ) -> Result<Option<Enrollment>, StorageError>;

    // -------------------------------------------------------------------
    // Record writes
    // -------------------------------------------------------------------

    /// Appends a fully formed client record.
    fn insert_client(&mut self, client: &Client) -> Result<(), StorageError>;

    /// Overwrites the stored client with the same id.
    fn replace_client(&mut self, client: &Client) -> Result<(), StorageError>;

    /// Removes a client and every enrollment referencing it.
    ///
    /// Returns `false` (and changes nothing) if the id is unknown.
    fn delete_client(&mut self, id: &ClientId) -> Result<bool, StorageError>;

    /// Appends a fully formed program record.
    fn insert_program(&mut self, program: &HealthProgram) -> Result<(), StorageError>;

    /// Overwrites the stored program with the same id.
    fn replace_program(&mut self, program: &HealthProgram) -> Result<(), StorageError>;

    /// Removes a program and every enrollment referencing it.
    ///
    /// Returns `false` (and changes nothing) if the id is unknown.
    fn delete_program(&mut self, id: &ProgramId) -> Result<bool, StorageError>;

    /// Appends a fully formed enrollment record.
    fn insert_enrollment(&mut self, enrollment: &Enrollment) -> Result<(), StorageError>;

    /// Overwrites the stored enrollment with the same id.
    fn replace_enrollment(&mut self, enrollment: &Enrollment) -> Result<(), StorageError>;

    // -------------------------------------------------------------------
    // Registry operations
    // -------------------------------------------------------------------

    /// Registers a client, assigning its id and timestamps.
    fn add_client(&mut self, data: NewClient) -> Result<Client, StorageError> {
        let client = Client::new(data);
        self.insert_client(&client)?;
        Ok(client)
    }

    /// Applies `patch` to an existing client. `None` if the id is unknown.
    fn update_client(
        &mut self,
        id: &ClientId,
        patch: ClientPatch,
    ) -> Result<Option<Client>, StorageError> {
        let Some(mut client) = self.get_client(id)? else {
            return Ok(None);
        };
        client.apply(patch);
        self.replace_client(&client)?;
        Ok(Some(client))
    }

    /// Creates a program, assigning its id and timestamps.
    fn add_program(&mut self, data: NewProgram) -> Result<HealthProgram, StorageError> {
        let program = HealthProgram::new(data);
        self.insert_program(&program)?;
        Ok(program)
    }

    /// Applies `patch` to an existing program. `None` if the id is unknown.
    fn update_program(
        &mut self,
        id: &ProgramId,
        patch: ProgramPatch,
    ) -> Result<Option<HealthProgram>, StorageError> {
        let Some(mut program) = self.get_program(id)? else {
            return Ok(None);
        };
        program.apply(patch);
        self.replace_program(&program)?;
        Ok(Some(program))
    }

    /// Enrolls a client in a program.
    ///
    /// Returns `None` if either the client or the program does not exist.
    /// If the pair already has an active enrollment, that enrollment is
    /// returned unchanged. Completed or withdrawn enrollments do not count,
    /// so re-enrolling after a withdrawal creates a new record.
    fn enroll_client_in_program(
        &mut self,
        client_id: &ClientId,
        program_id: &ProgramId,
        notes: Option<String>,
    ) -> Result<Option<Enrollment>, StorageError> {
        if self.get_client(client_id)?.is_none() || self.get_program(program_id)?.is_none() {
            return Ok(None);
        }
        if let Some(existing) = self.find_active_enrollment(client_id, program_id)? {
            return Ok(Some(existing));
        }
        let enrollment = Enrollment::new(client_id.clone(), program_id.clone(), notes);
        self.insert_enrollment(&enrollment)?;
        Ok(Some(enrollment))
    }

    /// Applies `patch` to an existing enrollment. `None` if the id is unknown.
    fn update_enrollment(
        &mut self,
        id: &EnrollmentId,
        patch: EnrollmentPatch,
    ) -> Result<Option<Enrollment>, StorageError> {
        let Some(mut enrollment) = self.get_enrollment(id)? else {
            return Ok(None);
        };
        enrollment.apply(patch);
        self.replace_enrollment(&enrollment)?;
        Ok(Some(enrollment))
    }

    /// Marks an enrollment withdrawn. Returns whether it existed.
    fn cancel_enrollment(&mut self, id: &EnrollmentId) -> Result<bool, StorageError> {
        Ok(self
            .update_enrollment(id, EnrollmentPatch::withdraw())?
            .is_some())
    }

    // -------------------------------------------------------------------
    // Relational accessors
    // -------------------------------------------------------------------

    /// A client with all its enrollments, each carrying its program.
    fn get_client_with_programs(
        &self,
        id: &ClientId,
    ) -> Result<Option<ClientWithEnrollments>, StorageError> {
        let Some(client) = self.get_client(id)? else {
            return Ok(None);
        };
        let mut enrollments = Vec::new();
        for enrollment in self.find_enrollments_by_client(id)? {
            let program = self.get_program(&enrollment.program_id)?.ok_or_else(|| {
                StorageError::IntegrityError {
                    reason: format!(
                        "enrollment {} references missing program {}",
                        enrollment.id, enrollment.program_id
                    ),
                }
            })?;
            enrollments.push(EnrollmentWithProgram {
                enrollment,
                program,
            });
        }
        Ok(Some(ClientWithEnrollments {
            client,
            enrollments,
        }))
    }

    /// A program with all its enrollments, each carrying its client.
    fn get_program_with_clients(
        &self,
        id: &ProgramId,
    ) -> Result<Option<ProgramWithEnrollments>, StorageError> {
        let Some(program) = self.get_program(id)? else {
            return Ok(None);
        };
        let mut enrollments = Vec::new();
        for enrollment in self.find_enrollments_by_program(id)? {
            let client = self.get_client(&enrollment.client_id)?.ok_or_else(|| {
                StorageError::IntegrityError {
                    reason: format!(
                        "enrollment {} references missing client {}",
                        enrollment.id, enrollment.client_id
                    ),
                }
            })?;
            enrollments.push(EnrollmentWithClient { enrollment, client });
        }
        Ok(Some(ProgramWithEnrollments {
            program,
            enrollments,
        }))
    }

    /// Clients matching `term` (see [`Client::matches`]), in insertion order.
    /// A blank term returns every client.
    fn search_clients(&self, term: &str) -> Result<Vec<Client>, StorageError> {
        Ok(self
            .list_clients()?
            .into_iter()
            .filter(|client| client.matches(term))
            .collect())
    }

    // -------------------------------------------------------------------
    // Snapshots
    // -------------------------------------------------------------------

    /// Captures all three collections.
    fn snapshot(&self) -> Result<Snapshot, StorageError> {
        Ok(Snapshot {
            clients: self.list_clients()?,
            programs: self.list_programs()?,
            enrollments: self.list_enrollments()?,
        })
    }

    /// Inserts every record of `snapshot` verbatim (ids and timestamps
    /// included). Meant for an empty store; ids already present are a
    /// backend error.
    fn import_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), StorageError> {
        for client in &snapshot.clients {
            self.insert_client(client)?;
        }
        for program in &snapshot.programs {
            self.insert_program(program)?;
        }
        for enrollment in &snapshot.enrollments {
            self.insert_enrollment(enrollment)?;
        }
        Ok(())
    }
}
