//! JSON snapshots of the whole registry, and the snapshot-backed store.
//!
//! A snapshot file holds one JSON object keyed by [`STORE_NAME`]:
//!
//! ```json
//! { "health-system-storage": { "state": { "clients": [], "programs": [], "enrollments": [] }, "version": 0 } }
//! ```
//!
//! The format is restored verbatim; there is no migration between versions.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use carepoint_core::{Client, ClientId, Enrollment, EnrollmentId, HealthProgram, ProgramId};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::memory::InMemoryStore;
use crate::traits::RecordStore;

/// Key under which the registry state is stored in a snapshot file.
pub const STORE_NAME: &str = "health-system-storage";

/// Format version written into new snapshots.
pub const SNAPSHOT_VERSION: u32 = 0;

/// The three collections, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub programs: Vec<HealthProgram>,
    #[serde(default)]
    pub enrollments: Vec<Enrollment>,
}

#[derive(Serialize, Deserialize)]
struct SnapshotFile<T> {
    // Must match STORE_NAME.
    #[serde(rename = "health-system-storage")]
    store: Envelope<T>,
}

#[derive(Serialize, Deserialize)]
struct Envelope<T> {
    state: T,
    #[serde(default)]
    version: u32,
}

impl Snapshot {
    /// Serializes the snapshot in the keyed file format.
    pub fn to_json(&self) -> Result<String, StorageError> {
        let file = SnapshotFile {
            store: Envelope {
                state: self,
                version: SNAPSHOT_VERSION,
            },
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Parses the keyed file format.
    pub fn from_json(json: &str) -> Result<Self, StorageError> {
        let file: SnapshotFile<Snapshot> = serde_json::from_str(json)?;
        Ok(file.store.state)
    }

    /// Reads a snapshot file.
    pub fn read_from(path: &Path) -> Result<Self, StorageError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Writes a snapshot file atomically (temp file in the same directory,
    /// then rename).
    pub fn write_to(&self, path: &Path) -> Result<(), StorageError> {
        let json = self.to_json()?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

/// An [`InMemoryStore`] mirrored to a snapshot file.
///
/// The file is loaded once by [`SnapshotStore::open`] and rewritten after
/// every successful write. Reads never touch the file.
#[derive(Debug)]
pub struct SnapshotStore {
    inner: InMemoryStore,
    path: PathBuf,
}

impl SnapshotStore {
    /// Opens the snapshot at `path`, starting empty if the file does not
    /// exist yet.
    ///
    /// The file is loaded through the same checks as individual inserts; a
    /// snapshot with duplicate ids or dangling enrollments is an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let snapshot = match Snapshot::read_from(&path) {
            Ok(snapshot) => snapshot,
            Err(StorageError::Io(e)) if e.kind() == io::ErrorKind::NotFound => Snapshot::default(),
            Err(e) => return Err(e),
        };
        Ok(SnapshotStore {
            inner: InMemoryStore::from_snapshot(&snapshot)?,
            path,
        })
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Applies `write` to a copy of the records and writes that copy to the
    /// file. The live records change only once the file write succeeded.
    /// `write` returning `Ok(false)` means nothing changed, and the file is
    /// left alone.
    fn commit(
        &mut self,
        write: impl FnOnce(&mut InMemoryStore) -> Result<bool, StorageError>,
    ) -> Result<bool, StorageError> {
        let mut next = self.inner.clone();
        if !write(&mut next)? {
            return Ok(false);
        }
        next.snapshot()?.write_to(&self.path)?;
        self.inner = next;
        Ok(true)
    }
}

impl RecordStore for SnapshotStore {
    fn get_client(&self, id: &ClientId) -> Result<Option<Client>, StorageError> {
        self.inner.get_client(id)
    }

    fn get_program(&self, id: &ProgramId) -> Result<Option<HealthProgram>, StorageError> {
        self.inner.get_program(id)
    }

    fn get_enrollment(&self, id: &EnrollmentId) -> Result<Option<Enrollment>, StorageError> {
        self.inner.get_enrollment(id)
    }

    fn list_clients(&self) -> Result<Vec<Client>, StorageError> {
        self.inner.list_clients()
    }

    fn list_programs(&self) -> Result<Vec<HealthProgram>, StorageError> {
        self.inner.list_programs()
    }

    fn list_enrollments(&self) -> Result<Vec<Enrollment>, StorageError> {
        self.inner.list_enrollments()
    }

    fn find_enrollments_by_client(&self, id: &ClientId) -> Result<Vec<Enrollment>, StorageError> {
        self.inner.find_enrollments_by_client(id)
    }

    fn find_enrollments_by_program(
        &self,
        id: &ProgramId,
    ) -> Result<Vec<Enrollment>, StorageError> {
        self.inner.find_enrollments_by_program(id)
    }

    fn find_active_enrollment(
        &self,
        client: &ClientId,
        program: &ProgramId,
    ) -> Result<Option<Enrollment>, StorageError> {
        self.inner.find_active_enrollment(client, program)
    }

    fn insert_client(&mut self, client: &Client) -> Result<(), StorageError> {
        self.commit(|store| store.insert_client(client).map(|()| true))?;
        Ok(())
    }

    fn replace_client(&mut self, client: &Client) -> Result<(), StorageError> {
        self.commit(|store| store.replace_client(client).map(|()| true))?;
        Ok(())
    }

    fn delete_client(&mut self, id: &ClientId) -> Result<bool, StorageError> {
        self.commit(|store| store.delete_client(id))
    }

    fn insert_program(&mut self, program: &HealthProgram) -> Result<(), StorageError> {
        self.commit(|store| store.insert_program(program).map(|()| true))?;
        Ok(())
    }

    fn replace_program(&mut self, program: &HealthProgram) -> Result<(), StorageError> {
        self.commit(|store| store.replace_program(program).map(|()| true))?;
        Ok(())
    }

    fn delete_program(&mut self, id: &ProgramId) -> Result<bool, StorageError> {
        self.commit(|store| store.delete_program(id))
    }

    fn insert_enrollment(&mut self, enrollment: &Enrollment) -> Result<(), StorageError> {
        self.commit(|store| store.insert_enrollment(enrollment).map(|()| true))?;
        Ok(())
    }

    fn replace_enrollment(&mut self, enrollment: &Enrollment) -> Result<(), StorageError> {
        self.commit(|store| store.replace_enrollment(enrollment).map(|()| true))?;
        Ok(())
    }

    fn import_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), StorageError> {
        self.commit(|store| store.import_snapshot(snapshot).map(|()| true))?;
        Ok(())
    }

    fn snapshot(&self) -> Result<Snapshot, StorageError> {
        self.inner.snapshot()
    }
}
