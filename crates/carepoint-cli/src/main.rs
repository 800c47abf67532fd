//! CarePoint registry admin CLI.
//!
//! Provides the `carepoint` binary for inspecting and maintaining a registry
//! SQLite database without running the HTTP server: listing records,
//! summary counts, snapshot export/import, and demo seeding.
//!
//! Output is JSON on stdout. Errors go to stderr with a non-zero exit code:
//! 1 = invalid input or refused operation, 3 = storage or I/O error.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use serde_json::json;

use carepoint_core::EnrollmentStatus;
use carepoint_storage::{demo, RecordStore, Snapshot, SqliteStore, StorageError};

/// CarePoint client and health-program registry tools.
#[derive(Parser)]
#[command(name = "carepoint", about = "CarePoint registry admin tools")]
struct Cli {
    /// Path to the registry database file.
    #[arg(short, long, default_value = "carepoint.db", global = true)]
    db: String,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// List clients, optionally filtered by a search term.
    Clients {
        /// Matches first/last name and email (case-insensitive) or phone.
        #[arg(short, long)]
        search: Option<String>,
    },
    /// List health programs.
    Programs,
    /// List enrollments.
    Enrollments,
    /// Print record counts.
    Stats,
    /// Write the whole registry to a snapshot file.
    Export {
        /// Destination file.
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Load a snapshot file into an empty database.
    Import {
        /// Snapshot file to read.
        #[arg(short, long)]
        from: PathBuf,
    },
    /// Insert demo programs and clients into an empty database.
    Seed,
}

fn main() {
    let cli = Cli::parse();

    let mut store = match SqliteStore::new(&cli.db) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: failed to open database '{}': {}", cli.db, e);
            process::exit(3);
        }
    };

    let exit_code = match run(&mut store, cli.command) {
        Ok(output) => {
            let json = serde_json::to_string_pretty(&output).unwrap_or_else(|e| {
                format!("{{\"error\": \"failed to serialize output: {}\"}}", e)
            });
            println!("{}", json);
            0
        }
        Err(CommandError::Refused(msg)) => {
            eprintln!("Error: {}", msg);
            1
        }
        Err(CommandError::Storage(e)) => {
            eprintln!("Storage error: {}", e);
            3
        }
    };
    process::exit(exit_code);
}

#[derive(Debug)]
enum CommandError {
    Refused(String),
    Storage(StorageError),
}

impl From<StorageError> for CommandError {
    fn from(e: StorageError) -> Self {
        CommandError::Storage(e)
    }
}

impl From<serde_json::Error> for CommandError {
    fn from(e: serde_json::Error) -> Self {
        CommandError::Storage(StorageError::Serialization(e))
    }
}

/// Executes one subcommand, returning the JSON to print.
fn run(store: &mut dyn RecordStore, command: Commands) -> Result<serde_json::Value, CommandError> {
    match command {
        Commands::Clients { search } => {
            let clients = match search {
                Some(term) => store.search_clients(&term)?,
                None => store.list_clients()?,
            };
            Ok(serde_json::to_value(clients)?)
        }
        Commands::Programs => Ok(serde_json::to_value(store.list_programs()?)?),
        Commands::Enrollments => Ok(serde_json::to_value(store.list_enrollments()?)?),
        Commands::Stats => stats(store),
        Commands::Export { out } => export(store, &out),
        Commands::Import { from } => import(store, &from),
        Commands::Seed => {
            if !demo::seed_demo(store)? {
                return Err(CommandError::Refused(
                    "database already has records; not seeding".into(),
                ));
            }
            stats(store)
        }
    }
}

fn stats(store: &dyn RecordStore) -> Result<serde_json::Value, CommandError> {
    let enrollments = store.list_enrollments()?;
    let count = |status: EnrollmentStatus| {
        enrollments
            .iter()
            .filter(|e| e.status == status)
            .count()
    };
    Ok(json!({
        "clients": store.list_clients()?.len(),
        "programs": store.list_programs()?.len(),
        "enrollments": {
            "total": enrollments.len(),
            "active": count(EnrollmentStatus::Active),
            "completed": count(EnrollmentStatus::Completed),
            "withdrawn": count(EnrollmentStatus::Withdrawn),
        },
    }))
}

fn export(store: &dyn RecordStore, out: &Path) -> Result<serde_json::Value, CommandError> {
    let snapshot = store.snapshot()?;
    snapshot.write_to(out)?;
    Ok(json!({
        "path": out.display().to_string(),
        "clients": snapshot.clients.len(),
        "programs": snapshot.programs.len(),
        "enrollments": snapshot.enrollments.len(),
    }))
}

fn import(store: &mut dyn RecordStore, from: &Path) -> Result<serde_json::Value, CommandError> {
    let current = store.snapshot()?;
    if current != Snapshot::default() {
        return Err(CommandError::Refused(
            "database already has records; import requires an empty database".into(),
        ));
    }
    let snapshot = Snapshot::read_from(from)?;
    store.import_snapshot(&snapshot)?;
    stats(store)
}
