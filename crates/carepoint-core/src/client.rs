//! Client records: the people receiving services.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::id::ClientId;
use crate::time;

/// Self-reported gender of a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// The lowercase wire/storage form.
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(CoreError::UnknownGender {
                value: s.to_string(),
            }),
        }
    }
}

/// A registered client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: ClientId,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub contact_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client attributes supplied on registration (everything but the
/// generated id and timestamps).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClient {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub contact_number: String,
    #[serde(default)]
    pub email: Option<String>,
    pub address: String,
    #[serde(default)]
    pub medical_history: Option<String>,
}

/// Patchable client fields. `None` leaves a field untouched.
///
/// The optional attributes use a nested `Option`: `Some(None)` clears the
/// value, `Some(Some(v))` replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub contact_number: Option<String>,
    pub email: Option<Option<String>>,
    pub address: Option<String>,
    pub medical_history: Option<Option<String>>,
}

impl Client {
    /// Builds a new client record with a fresh id and matching timestamps.
    pub fn new(data: NewClient) -> Self {
        let now = time::now();
        Client {
            id: ClientId::generate(),
            first_name: data.first_name,
            last_name: data.last_name,
            date_of_birth: data.date_of_birth,
            gender: data.gender,
            contact_number: data.contact_number,
            email: data.email,
            address: data.address,
            medical_history: data.medical_history,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies `patch` in place and bumps `updated_at`.
    pub fn apply(&mut self, patch: ClientPatch) {
        if let Some(v) = patch.first_name {
            self.first_name = v;
        }
        if let Some(v) = patch.last_name {
            self.last_name = v;
        }
        if let Some(v) = patch.date_of_birth {
            self.date_of_birth = v;
        }
        if let Some(v) = patch.gender {
            self.gender = v;
        }
        if let Some(v) = patch.contact_number {
            self.contact_number = v;
        }
        if let Some(v) = patch.email {
            self.email = v;
        }
        if let Some(v) = patch.address {
            self.address = v;
        }
        if let Some(v) = patch.medical_history {
            self.medical_history = v;
        }
        self.updated_at = time::touch(self.updated_at);
    }

    /// Full display name, "First Last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Whether this client matches a free-text search term.
    ///
    /// Names and email match case-insensitively; the contact number matches
    /// as typed. A blank term matches every client.
    pub fn matches(&self, term: &str) -> bool {
        if term.trim().is_empty() {
            return true;
        }
        let needle = term.to_lowercase();
        self.first_name.to_lowercase().contains(&needle)
            || self.last_name.to_lowercase().contains(&needle)
            || self
                .email
                .as_deref()
                .is_some_and(|email| email.to_lowercase().contains(&needle))
            || self.contact_number.contains(term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn john() -> NewClient {
        NewClient {
            first_name: "John".into(),
            last_name: "Doe".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1985, 5, 15).unwrap(),
            gender: Gender::Male,
            contact_number: "+1234567890".into(),
            email: Some("john.doe@example.com".into()),
            address: "123 Main St".into(),
            medical_history: None,
        }
    }

    #[test]
    fn new_client_has_matching_timestamps() {
        let client = Client::new(john());
        assert_eq!(client.created_at, client.updated_at);
        assert_eq!(client.full_name(), "John Doe");
    }

    #[test]
    fn patch_changes_only_named_fields() {
        let original = Client::new(john());
        let mut patched = original.clone();
        patched.apply(ClientPatch {
            first_name: Some("X".into()),
            ..Default::default()
        });

        assert_eq!(patched.first_name, "X");
        assert!(patched.updated_at >= original.updated_at);
        assert_eq!(
            Client {
                first_name: original.first_name.clone(),
                updated_at: original.updated_at,
                ..patched
            },
            original
        );
    }

    #[test]
    fn patch_can_clear_optional_fields() {
        let mut client = Client::new(john());
        client.apply(ClientPatch {
            email: Some(None),
            medical_history: Some(Some("asthma".into())),
            ..Default::default()
        });
        assert_eq!(client.email, None);
        assert_eq!(client.medical_history.as_deref(), Some("asthma"));
    }

    #[test]
    fn search_is_case_insensitive_on_names_and_email() {
        let client = Client::new(john());
        assert!(client.matches("jOHn"));
        assert!(client.matches("DOE"));
        assert!(client.matches("EXAMPLE.COM"));
        assert!(!client.matches("smith"));
    }

    #[test]
    fn search_matches_contact_number_as_typed() {
        let client = Client::new(john());
        assert!(client.matches("+1234"));
        assert!(!client.matches("999"));
    }

    #[test]
    fn blank_term_matches_everyone() {
        let client = Client::new(john());
        assert!(client.matches(""));
        assert!(client.matches("   "));
    }

    #[test]
    fn gender_parses_its_own_display_form() {
        for g in [Gender::Male, Gender::Female, Gender::Other] {
            assert_eq!(g.to_string().parse::<Gender>().unwrap(), g);
        }
        assert!("robot".parse::<Gender>().is_err());
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(Client::new(john())).unwrap();
        assert_eq!(json["firstName"], "John");
        assert_eq!(json["dateOfBirth"], "1985-05-15");
        assert_eq!(json["gender"], "male");
        assert!(json.get("medicalHistory").is_none());
    }

    proptest! {
        #[test]
        fn any_slice_of_first_name_matches(start in 0usize..4, len in 1usize..4, upper in any::<bool>()) {
            let client = Client::new(john());
            let name = &client.first_name;
            let end = (start + len).min(name.len());
            prop_assume!(start < end);
            let term = if upper { name[start..end].to_uppercase() } else { name[start..end].to_string() };
            prop_assert!(client.matches(&term));
        }

        #[test]
        fn empty_patch_preserves_every_attribute(first in "[a-zA-Z]{1,12}", phone in "[0-9]{5,12}") {
            let mut data = john();
            data.first_name = first;
            data.contact_number = phone;
            let original = Client::new(data);
            let mut patched = original.clone();
            patched.apply(ClientPatch::default());
            prop_assert_eq!(Client { updated_at: original.updated_at, ..patched }, original);
        }
    }
}
