//! SQLite implementation of [`RecordStore`].
//!
//! [`SqliteStore`] persists the registry in a SQLite database with WAL mode,
//! foreign keys, and automatic schema migrations. Enum attributes are stored
//! as their lowercase text form; dates and timestamps use rusqlite's chrono
//! conversions.

use std::str::FromStr;

use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use carepoint_core::{
    Client, ClientId, CoreError, Enrollment, EnrollmentId, HealthProgram, ProgramId,
};

use crate::error::StorageError;
use crate::traits::RecordStore;

const CLIENT_COLUMNS: &str = "id, first_name, last_name, date_of_birth, gender, contact_number, \
     email, address, medical_history, created_at, updated_at";

const PROGRAM_COLUMNS: &str = "id, name, description, created_at, updated_at";

const ENROLLMENT_COLUMNS: &str =
    "id, client_id, program_id, enrollment_date, status, notes, created_at, updated_at";

/// SQLite-backed implementation of [`RecordStore`].
///
/// Multi-statement writes run inside a transaction. Cascading deletes are
/// enforced both by the schema's foreign keys and explicitly.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) a SQLite database at `path`.
    pub fn new(path: &str) -> Result<Self, StorageError> {
        let conn = crate::schema::open_database(path)?;
        Ok(SqliteStore { conn })
    }

    /// Opens an in-memory SQLite database (for testing).
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = crate::schema::open_in_memory()?;
        Ok(SqliteStore { conn })
    }

    // -----------------------------------------------------------------------
    // Row mapping
    // -----------------------------------------------------------------------

    fn parse_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
    where
        T: FromStr<Err = CoreError>,
    {
        let raw: String = row.get(idx)?;
        raw.parse()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    }

    fn row_to_client(row: &Row<'_>) -> rusqlite::Result<Client> {
        Ok(Client {
            id: ClientId::new(row.get::<_, String>(0)?),
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            date_of_birth: row.get(3)?,
            gender: Self::parse_column(row, 4)?,
            contact_number: row.get(5)?,
            email: row.get(6)?,
            address: row.get(7)?,
            medical_history: row.get(8)?,
            created_at: row.get(9)?,
            updated_at: row.get(10)?,
        })
    }

    fn row_to_program(row: &Row<'_>) -> rusqlite::Result<HealthProgram> {
        Ok(HealthProgram {
            id: ProgramId::new(row.get::<_, String>(0)?),
            name: row.get(1)?,
            description: row.get(2)?,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
        })
    }

    fn row_to_enrollment(row: &Row<'_>) -> rusqlite::Result<Enrollment> {
        Ok(Enrollment {
            id: EnrollmentId::new(row.get::<_, String>(0)?),
            client_id: ClientId::new(row.get::<_, String>(1)?),
            program_id: ProgramId::new(row.get::<_, String>(2)?),
            enrollment_date: row.get(3)?,
            status: Self::parse_column(row, 4)?,
            notes: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }

    fn query_enrollments(
        &self,
        filter: &str,
        args: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<Enrollment>, StorageError> {
        let sql = format!("SELECT {ENROLLMENT_COLUMNS} FROM enrollments {filter} ORDER BY seq");
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let rows = stmt.query_map(args, Self::row_to_enrollment)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

// Insert statements, shared by single writes and transactional import.

fn insert_client_row(conn: &Connection, client: &Client) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO clients (id, first_name, last_name, date_of_birth, gender, contact_number, email, address, medical_history, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            client.id.as_str(),
            client.first_name,
            client.last_name,
            client.date_of_birth,
            client.gender.as_str(),
            client.contact_number,
            client.email,
            client.address,
            client.medical_history,
            client.created_at,
            client.updated_at,
        ],
    )?;
    Ok(())
}

fn insert_program_row(conn: &Connection, program: &HealthProgram) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO programs (id, name, description, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            program.id.as_str(),
            program.name,
            program.description,
            program.created_at,
            program.updated_at,
        ],
    )?;
    Ok(())
}

fn insert_enrollment_row(conn: &Connection, enrollment: &Enrollment) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO enrollments (id, client_id, program_id, enrollment_date, status, notes, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            enrollment.id.as_str(),
            enrollment.client_id.as_str(),
            enrollment.program_id.as_str(),
            enrollment.enrollment_date,
            enrollment.status.as_str(),
            enrollment.notes,
            enrollment.created_at,
            enrollment.updated_at,
        ],
    )?;
    Ok(())
}

impl RecordStore for SqliteStore {
    fn get_client(&self, id: &ClientId) -> Result<Option<Client>, StorageError> {
        let sql = format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = ?1");
        Ok(self
            .conn
            .query_row(&sql, params![id.as_str()], Self::row_to_client)
            .optional()?)
    }

    fn get_program(&self, id: &ProgramId) -> Result<Option<HealthProgram>, StorageError> {
        let sql = format!("SELECT {PROGRAM_COLUMNS} FROM programs WHERE id = ?1");
        Ok(self
            .conn
            .query_row(&sql, params![id.as_str()], Self::row_to_program)
            .optional()?)
    }

    fn get_enrollment(&self, id: &EnrollmentId) -> Result<Option<Enrollment>, StorageError> {
        let sql = format!("SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE id = ?1");
        Ok(self
            .conn
            .query_row(&sql, params![id.as_str()], Self::row_to_enrollment)
            .optional()?)
    }

    fn list_clients(&self) -> Result<Vec<Client>, StorageError> {
        let sql = format!("SELECT {CLIENT_COLUMNS} FROM clients ORDER BY seq");
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let rows = stmt.query_map([], Self::row_to_client)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn list_programs(&self) -> Result<Vec<HealthProgram>, StorageError> {
        let sql = format!("SELECT {PROGRAM_COLUMNS} FROM programs ORDER BY seq");
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let rows = stmt.query_map([], Self::row_to_program)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn list_enrollments(&self) -> Result<Vec<Enrollment>, StorageError> {
        self.query_enrollments("", &[])
    }

    fn find_enrollments_by_client(&self, id: &ClientId) -> Result<Vec<Enrollment>, StorageError> {
        self.query_enrollments("WHERE client_id = ?1", &[&id.as_str()])
    }

    fn find_enrollments_by_program(
        &self,
        id: &ProgramId,
    ) -> Result<Vec<Enrollment>, StorageError> {
        self.query_enrollments("WHERE program_id = ?1", &[&id.as_str()])
    }

    fn find_active_enrollment(
        &self,
        client: &ClientId,
        program: &ProgramId,
    ) -> Result<Option<Enrollment>, StorageError> {
        let sql = format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments \
             WHERE client_id = ?1 AND program_id = ?2 AND status = 'active' \
             ORDER BY seq LIMIT 1"
        );
        Ok(self
            .conn
            .query_row(
                &sql,
                params![client.as_str(), program.as_str()],
                Self::row_to_enrollment,
            )
            .optional()?)
    }

    fn insert_client(&mut self, client: &Client) -> Result<(), StorageError> {
        insert_client_row(&self.conn, client)
    }

    fn replace_client(&mut self, client: &Client) -> Result<(), StorageError> {
        let changed = self.conn.execute(
            "UPDATE clients SET first_name = ?2, last_name = ?3, date_of_birth = ?4, gender = ?5, \
             contact_number = ?6, email = ?7, address = ?8, medical_history = ?9, updated_at = ?10 \
             WHERE id = ?1",
            params![
                client.id.as_str(),
                client.first_name,
                client.last_name,
                client.date_of_birth,
                client.gender.as_str(),
                client.contact_number,
                client.email,
                client.address,
                client.medical_history,
                client.updated_at,
            ],
        )?;
        if changed == 0 {
            return Err(StorageError::IntegrityError {
                reason: format!("client {} does not exist", client.id),
            });
        }
        Ok(())
    }

    fn delete_client(&mut self, id: &ClientId) -> Result<bool, StorageError> {
        let tx = self.conn.transaction()?;
        // CASCADE handles this, but the explicit delete keeps the intent visible.
        tx.execute(
            "DELETE FROM enrollments WHERE client_id = ?1",
            params![id.as_str()],
        )?;
        let deleted = tx.execute("DELETE FROM clients WHERE id = ?1", params![id.as_str()])?;
        if deleted == 0 {
            tx.rollback()?;
            return Ok(false);
        }
        tx.commit()?;
        Ok(true)
    }

    fn insert_program(&mut self, program: &HealthProgram) -> Result<(), StorageError> {
        insert_program_row(&self.conn, program)
    }

    fn replace_program(&mut self, program: &HealthProgram) -> Result<(), StorageError> {
        let changed = self.conn.execute(
            "UPDATE programs SET name = ?2, description = ?3, updated_at = ?4 WHERE id = ?1",
            params![
                program.id.as_str(),
                program.name,
                program.description,
                program.updated_at,
            ],
        )?;
        if changed == 0 {
            return Err(StorageError::IntegrityError {
                reason: format!("program {} does not exist", program.id),
            });
        }
        Ok(())
    }

    fn delete_program(&mut self, id: &ProgramId) -> Result<bool, StorageError> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM enrollments WHERE program_id = ?1",
            params![id.as_str()],
        )?;
        let deleted = tx.execute("DELETE FROM programs WHERE id = ?1", params![id.as_str()])?;
        if deleted == 0 {
            tx.rollback()?;
            return Ok(false);
        }
        tx.commit()?;
        Ok(true)
    }

    fn insert_enrollment(&mut self, enrollment: &Enrollment) -> Result<(), StorageError> {
        insert_enrollment_row(&self.conn, enrollment)
    }

    fn replace_enrollment(&mut self, enrollment: &Enrollment) -> Result<(), StorageError> {
        let changed = self.conn.execute(
            "UPDATE enrollments SET enrollment_date = ?2, status = ?3, notes = ?4, updated_at = ?5 WHERE id = ?1",
            params![
                enrollment.id.as_str(),
                enrollment.enrollment_date,
                enrollment.status.as_str(),
                enrollment.notes,
                enrollment.updated_at,
            ],
        )?;
        if changed == 0 {
            return Err(StorageError::IntegrityError {
                reason: format!("enrollment {} does not exist", enrollment.id),
            });
        }
        Ok(())
    }

    fn import_snapshot(&mut self, snapshot: &crate::Snapshot) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;
        for client in &snapshot.clients {
            insert_client_row(&tx, client)?;
        }
        for program in &snapshot.programs {
            insert_program_row(&tx, program)?;
        }
        for enrollment in &snapshot.enrollments {
            insert_enrollment_row(&tx, enrollment)?;
        }
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carepoint_core::{EnrollmentStatus, Gender, NewClient, NewProgram};
    use chrono::NaiveDate;

    fn jane() -> NewClient {
        NewClient {
            first_name: "Jane".into(),
            last_name: "Smith".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 8, 20).unwrap(),
            gender: Gender::Female,
            contact_number: "+1987654321".into(),
            email: Some("jane.smith@example.com".into()),
            address: "456 Elm St".into(),
            medical_history: Some("History of asthma".into()),
        }
    }

    #[test]
    fn client_round_trips_exactly() {
        let mut store = SqliteStore::in_memory().unwrap();
        let client = store.add_client(jane()).unwrap();
        assert_eq!(store.get_client(&client.id).unwrap(), Some(client));
    }

    #[test]
    fn unknown_ids_are_absent() {
        let store = SqliteStore::in_memory().unwrap();
        assert!(store.get_client(&ClientId::new("x")).unwrap().is_none());
        assert!(store.get_program(&ProgramId::new("x")).unwrap().is_none());
        assert!(store.get_enrollment(&EnrollmentId::new("x")).unwrap().is_none());
    }

    #[test]
    fn foreign_key_rejects_dangling_enrollment() {
        let mut store = SqliteStore::in_memory().unwrap();
        let orphan = Enrollment::new(ClientId::new("ghost"), ProgramId::new("ghost"), None);
        assert!(matches!(
            store.insert_enrollment(&orphan),
            Err(StorageError::Sqlite(_))
        ));
    }

    #[test]
    fn status_is_stored_as_text() {
        let mut store = SqliteStore::in_memory().unwrap();
        let client = store.add_client(jane()).unwrap();
        let program = store
            .add_program(NewProgram {
                name: "TB Treatment".into(),
                description: "Monitoring".into(),
            })
            .unwrap();
        let enrollment = store
            .enroll_client_in_program(&client.id, &program.id, None)
            .unwrap()
            .unwrap();
        store.cancel_enrollment(&enrollment.id).unwrap();

        let raw: String = store
            .conn
            .query_row(
                "SELECT status FROM enrollments WHERE id = ?1",
                params![enrollment.id.as_str()],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(raw, "withdrawn");
        assert_eq!(
            store.get_enrollment(&enrollment.id).unwrap().unwrap().status,
            EnrollmentStatus::Withdrawn
        );
    }

    #[test]
    fn failed_import_rolls_back() {
        let mut store = SqliteStore::in_memory().unwrap();
        let client = Client::new(jane());
        let snapshot = crate::Snapshot {
            clients: vec![client.clone(), client],
            ..Default::default()
        };
        let err = store.import_snapshot(&snapshot).unwrap_err();
        assert!(matches!(err, StorageError::Sqlite(_)));
        assert!(store.list_clients().unwrap().is_empty());

        // The connection is usable again after the rollback.
        store.add_client(jane()).unwrap();
        assert_eq!(store.list_clients().unwrap().len(), 1);
    }

    #[test]
    fn file_database_persists_across_connections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("carepoint.db");
        let path = path.to_str().unwrap();

        let client = {
            let mut store = SqliteStore::new(path).unwrap();
            store.add_client(jane()).unwrap()
        };
        let store = SqliteStore::new(path).unwrap();
        assert_eq!(store.list_clients().unwrap(), vec![client]);
    }
}
