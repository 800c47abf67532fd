//! Opaque string identifiers for registry entities.
//!
//! Each entity kind gets its own newtype so a `ClientId` cannot be passed
//! where a `ProgramId` is expected. Ids are generated as random UUIDs, but
//! any string is accepted when parsing (ids arrive from URLs and snapshots),
//! so an unknown id simply fails to match.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Allocates a fresh, random identifier.
            pub fn generate() -> Self {
                $name(Uuid::new_v4().to_string())
            }

            /// Wraps an existing identifier string.
            pub fn new(id: impl Into<String>) -> Self {
                $name(id.into())
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                $name(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                $name(id.to_string())
            }
        }
    };
}

string_id!(
    /// Identity of a registered client.
    ClientId
);

string_id!(
    /// Identity of a health program.
    ProgramId
);

string_id!(
    /// Identity of an enrollment record.
    EnrollmentId
);

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn generated_ids_are_distinct() {
        let ids: HashSet<ClientId> = (0..100).map(|_| ClientId::generate()).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn display_prints_inner_value() {
        assert_eq!(format!("{}", ProgramId::new("p-1")), "p-1");
    }

    #[test]
    fn serializes_as_bare_string() {
        let id = EnrollmentId::new("abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
        let back: EnrollmentId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(back, id);
    }
}
