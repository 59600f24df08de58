/*!
 * Data type definitions for customer records
 *
 * This module contains the target entity shape that CSV rows are mapped onto
 * before persistence, along with the fallback rules for missing fields.
 */

use serde::{Deserialize, Serialize};

/// A customer record as persisted to the store
///
/// The `id` is taken from the source file's numeric identifier column and is
/// the uniqueness key for duplicate-skip persistence: a customer is inserted
/// at most once per id, and re-loading the same file is a no-op for ids that
/// already exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

/// Fallback name used when a source name field is empty
pub const UNKNOWN_NAME: &str = "Unknown";

impl Customer {
    /// Placeholder email synthesized when the source email field is empty
    pub fn placeholder_email(id: i64) -> String {
        format!("customer{}@example.com", id)
    }

    /// Build a customer from already-extracted source fields, applying the
    /// fallback rules for missing values
    pub fn from_fields(
        id: i64,
        email: Option<String>,
        first_name: Option<String>,
        last_name: Option<String>,
        phone: Option<String>,
    ) -> Self {
        Self {
            id,
            email: email.unwrap_or_else(|| Self::placeholder_email(id)),
            password: String::new(),
            first_name: first_name.unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            last_name: last_name.unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            phone,
        }
    }

    /// Full display name for reporting
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl std::fmt::Display for Customer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} | {} | {}", self.id, self.display_name(), self.email)
    }
}
