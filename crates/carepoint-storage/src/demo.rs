//! Demo records for a fresh registry.

use carepoint_core::{Gender, NewClient, NewProgram};
use chrono::NaiveDate;

use crate::error::StorageError;
use crate::traits::RecordStore;

/// Programs created by [`seed_demo`].
pub fn demo_programs() -> Vec<NewProgram> {
    vec![
        NewProgram {
            name: "HIV Prevention".into(),
            description: "Program aimed at HIV prevention through education and screening.".into(),
        },
        NewProgram {
            name: "TB Treatment".into(),
            description: "Comprehensive tuberculosis treatment and monitoring program.".into(),
        },
        NewProgram {
            name: "Malaria Control".into(),
            description: "Malaria prevention, diagnosis and treatment program.".into(),
        },
    ]
}

/// Clients created by [`seed_demo`].
pub fn demo_clients() -> Vec<NewClient> {
    vec![
        NewClient {
            first_name: "John".into(),
            last_name: "Doe".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1985, 5, 15).unwrap_or_default(),
            gender: Gender::Male,
            contact_number: "+1234567890".into(),
            email: Some("john.doe@example.com".into()),
            address: "123 Main St, Anytown".into(),
            medical_history: Some("No significant history".into()),
        },
        NewClient {
            first_name: "Jane".into(),
            last_name: "Smith".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 8, 20).unwrap_or_default(),
            gender: Gender::Female,
            contact_number: "+1987654321".into(),
            email: Some("jane.smith@example.com".into()),
            address: "456 Elm St, Othertown".into(),
            medical_history: Some("History of asthma".into()),
        },
    ]
}

/// Adds the demo programs and clients if the store has neither.
///
/// Returns whether anything was inserted.
pub fn seed_demo(store: &mut dyn RecordStore) -> Result<bool, StorageError> {
    if !store.list_clients()?.is_empty() || !store.list_programs()?.is_empty() {
        return Ok(false);
    }
    for program in demo_programs() {
        store.add_program(program)?;
    }
    for client in demo_clients() {
        store.add_client(client)?;
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryStore;

    #[test]
    fn seeds_once() {
        let mut store = InMemoryStore::new();
        assert!(seed_demo(&mut store).unwrap());
        assert!(!seed_demo(&mut store).unwrap());
        assert_eq!(store.list_programs().unwrap().len(), 3);
        assert_eq!(store.list_clients().unwrap().len(), 2);
        assert!(store.list_enrollments().unwrap().is_empty());
    }
}
