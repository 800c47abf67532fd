//! RegistryService: the single coordinator between HTTP handlers and the
//! record store.
//!
//! Handlers validate their request bodies, then delegate here. The service
//! turns missing records into [`ApiError::NotFound`] (or `BadRequest` where
//! the missing record was named in the request body) and logs every
//! mutation.

use carepoint_core::{
    Client, ClientId, ClientPatch, ClientWithEnrollments, Enrollment, EnrollmentId,
    EnrollmentPatch, EnrollmentStatus, HealthProgram, NewClient, NewProgram, ProgramId,
    ProgramPatch, ProgramWithEnrollments,
};
use carepoint_storage::demo;
use carepoint_storage::{InMemoryStore, RecordStore};

use crate::error::ApiError;
use crate::schema::dashboard::{DashboardResponse, RECENT_CLIENTS};
use crate::schema::enrollments::{EnrollRequest, EnrollmentQuery};
use crate::schema::programs::PublicProgramView;

/// Registry operations over a boxed [`RecordStore`].
pub struct RegistryService {
    store: Box<dyn RecordStore + Send>,
}

fn client_not_found(id: &ClientId) -> ApiError {
    ApiError::NotFound(format!("Client {id} not found"))
}

fn program_not_found(id: &ProgramId) -> ApiError {
    ApiError::NotFound(format!("Program {id} not found"))
}

fn enrollment_not_found(id: &EnrollmentId) -> ApiError {
    ApiError::NotFound(format!("Enrollment {id} not found"))
}

impl RegistryService {
    pub fn new(store: Box<dyn RecordStore + Send>) -> Self {
        RegistryService { store }
    }

    /// A service over an empty [`InMemoryStore`].
    pub fn in_memory() -> Self {
        Self::new(Box::new(InMemoryStore::new()))
    }

    /// Seeds the demo programs and clients if the store is empty. Returns
    /// whether anything was inserted.
    pub fn seed_demo(&mut self) -> Result<bool, ApiError> {
        let seeded = demo::seed_demo(&mut *self.store)?;
        if seeded {
            tracing::info!("seeded demo clients and programs");
        }
        Ok(seeded)
    }

    // -----------------------------------------------------------------------
    // Clients
    // -----------------------------------------------------------------------

    /// All clients, or those matching `search` when it is non-blank.
    pub fn list_clients(&self, search: Option<&str>) -> Result<Vec<Client>, ApiError> {
        let clients = match search {
            Some(term) => self.store.search_clients(term)?,
            None => self.store.list_clients()?,
        };
        tracing::debug!(count = clients.len(), search, "listed clients");
        Ok(clients)
    }

    pub fn create_client(&mut self, data: NewClient) -> Result<Client, ApiError> {
        let client = self.store.add_client(data)?;
        tracing::info!(client_id = %client.id, "registered client");
        Ok(client)
    }

    /// A client with its enrollments and their programs.
    pub fn get_client(&self, id: &ClientId) -> Result<ClientWithEnrollments, ApiError> {
        self.store
            .get_client_with_programs(id)?
            .ok_or_else(|| client_not_found(id))
    }

    pub fn update_client(&mut self, id: &ClientId, patch: ClientPatch) -> Result<Client, ApiError> {
        let client = self
            .store
            .update_client(id, patch)?
            .ok_or_else(|| client_not_found(id))?;
        tracing::info!(client_id = %id, "updated client");
        Ok(client)
    }

    /// Deletes a client and its enrollments.
    pub fn delete_client(&mut self, id: &ClientId) -> Result<(), ApiError> {
        if !self.store.delete_client(id)? {
            return Err(client_not_found(id));
        }
        tracing::info!(client_id = %id, "deleted client");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Programs
    // -----------------------------------------------------------------------

    pub fn list_programs(&self) -> Result<Vec<HealthProgram>, ApiError> {
        Ok(self.store.list_programs()?)
    }

    /// The unauthenticated program listing.
    pub fn public_programs(&self) -> Result<Vec<PublicProgramView>, ApiError> {
        Ok(self
            .store
            .list_programs()?
            .into_iter()
            .map(PublicProgramView::from)
            .collect())
    }

    pub fn create_program(&mut self, data: NewProgram) -> Result<HealthProgram, ApiError> {
        let program = self.store.add_program(data)?;
        tracing::info!(program_id = %program.id, name = %program.name, "created program");
        Ok(program)
    }

    /// A program with its enrollments and their clients.
    pub fn get_program(&self, id: &ProgramId) -> Result<ProgramWithEnrollments, ApiError> {
        self.store
            .get_program_with_clients(id)?
            .ok_or_else(|| program_not_found(id))
    }

    pub fn update_program(
        &mut self,
        id: &ProgramId,
        patch: ProgramPatch,
    ) -> Result<HealthProgram, ApiError> {
        let program = self
            .store
            .update_program(id, patch)?
            .ok_or_else(|| program_not_found(id))?;
        tracing::info!(program_id = %id, "updated program");
        Ok(program)
    }

    /// Deletes a program and its enrollments.
    pub fn delete_program(&mut self, id: &ProgramId) -> Result<(), ApiError> {
        if !self.store.delete_program(id)? {
            return Err(program_not_found(id));
        }
        tracing::info!(program_id = %id, "deleted program");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Enrollments
    // -----------------------------------------------------------------------

    /// Enrollments matching every filter present in `query`.
    pub fn list_enrollments(&self, query: &EnrollmentQuery) -> Result<Vec<Enrollment>, ApiError> {
        let candidates = match (&query.client_id, &query.program_id) {
            (Some(client), _) => self.store.find_enrollments_by_client(client)?,
            (None, Some(program)) => self.store.find_enrollments_by_program(program)?,
            (None, None) => self.store.list_enrollments()?,
        };
        let enrollments: Vec<Enrollment> = candidates
            .into_iter()
            .filter(|e| query.program_id.as_ref().is_none_or(|p| &e.program_id == p))
            .filter(|e| query.status.is_none_or(|s| e.status == s))
            .collect();
        tracing::debug!(count = enrollments.len(), "listed enrollments");
        Ok(enrollments)
    }

    /// Enrolls a client, returning the existing enrollment if the pair is
    /// already active.
    pub fn enroll(&mut self, req: EnrollRequest) -> Result<Enrollment, ApiError> {
        let Some(enrollment) =
            self.store
                .enroll_client_in_program(&req.client_id, &req.program_id, req.notes)?
        else {
            tracing::warn!(
                client_id = %req.client_id,
                program_id = %req.program_id,
                "enrollment references unknown client or program"
            );
            return Err(ApiError::BadRequest("Client or program not found".into()));
        };
        tracing::info!(
            enrollment_id = %enrollment.id,
            client_id = %enrollment.client_id,
            program_id = %enrollment.program_id,
            "enrolled client"
        );
        Ok(enrollment)
    }

    pub fn get_enrollment(&self, id: &EnrollmentId) -> Result<Enrollment, ApiError> {
        self.store
            .get_enrollment(id)?
            .ok_or_else(|| enrollment_not_found(id))
    }

    pub fn update_enrollment(
        &mut self,
        id: &EnrollmentId,
        patch: EnrollmentPatch,
    ) -> Result<Enrollment, ApiError> {
        let enrollment = self
            .store
            .update_enrollment(id, patch)?
            .ok_or_else(|| enrollment_not_found(id))?;
        tracing::info!(enrollment_id = %id, status = %enrollment.status, "updated enrollment");
        Ok(enrollment)
    }

    /// Withdraws an enrollment. The record is kept.
    pub fn cancel_enrollment(&mut self, id: &EnrollmentId) -> Result<(), ApiError> {
        if !self.store.cancel_enrollment(id)? {
            return Err(enrollment_not_found(id));
        }
        tracing::info!(enrollment_id = %id, "withdrew enrollment");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Dashboard
    // -----------------------------------------------------------------------

    pub fn dashboard(&self) -> Result<DashboardResponse, ApiError> {
        let mut clients = self.store.list_clients()?;
        let total_clients = clients.len();
        let total_programs = self.store.list_programs()?.len();
        let active_enrollments = self
            .store
            .list_enrollments()?
            .iter()
            .filter(|e| e.status == EnrollmentStatus::Active)
            .count();

        // Stable sort keeps insertion order among equal timestamps.
        clients.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        clients.truncate(RECENT_CLIENTS);

        Ok(DashboardResponse {
            total_clients,
            total_programs,
            active_enrollments,
            recent_clients: clients,
        })
    }
}
