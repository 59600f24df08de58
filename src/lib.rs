/*!
 * # cdpload — customer CSV cleaning and bulk loading
 *
 * A library and CLI for preparing customer-profile CSV exports and loading
 * them into a relational customer table.
 *
 * ## Features
 *
 * - **Phone normalization**: strip a phone column down to digits-only, into a
 *   new file or in place with an automatic backup
 * - **Idempotent bulk load**: fixed-size batches, duplicate-skip inserts keyed
 *   on the customer id, safe to re-run against a non-empty table
 * - **Row isolation**: a failed batch insert falls back to per-row inserts so
 *   one bad row cannot block a whole batch
 * - **Reports, not globals**: every run returns a report struct with its
 *   counters
 *
 * ## Quick Start
 *
 * ```no_run
 * use cdpload::prelude::*;
 *
 * # fn main() -> Result<()> {
 * // Clean the phone column into a new file
 * let report = PhoneCleaner::new().clean_file("profiles.csv", "profiles_cleaned.csv")?;
 * println!("cleaned {} of {} rows", report.cleaned, report.total);
 *
 * // Load the cleaned file into SQLite, 50 rows per batch
 * let mut store = SqliteStore::open("customers.db")?;
 * let report = CsvLoader::new().load("profiles_cleaned.csv", &mut store)?;
 * println!("inserted {} rows ({} skipped)", report.inserted, report.skipped());
 * # Ok(())
 * # }
 * ```
 *
 * ## In-place cleaning
 *
 * ```no_run
 * # use cdpload::prelude::*;
 * # fn main() -> Result<()> {
 * // A byte-for-byte backup is written to profiles_backup.csv first; a failed
 * // write restores the original from it.
 * PhoneCleaner::new().clean_in_place("profiles.csv")?;
 * # Ok(())
 * # }
 * ```
 *
 * ## Custom column names
 *
 * ```no_run
 * # use cdpload::prelude::*;
 * # fn main() -> Result<()> {
 * let reader = CustomerReader::new().with_id_column("CustomerId");
 * let mut store = SqliteStore::open_in_memory()?;
 * CsvLoader::new()
 *     .with_reader(reader)
 *     .with_batch_size(100)
 *     .load("export.csv", &mut store)?;
 * # Ok(())
 * # }
 * ```
 */

// Re-export error types from root
pub use error::{CdpError, ErrorContext, Result};

// Public modules
pub mod batch;
pub mod clean;
pub mod config;
pub mod customer;
pub mod error;
pub mod loader;
pub mod reader;
pub mod store;

/// Prelude module for convenient imports
///
/// Import everything you need with:
/// ```
/// use cdpload::prelude::*;
/// ```
pub mod prelude {
    pub use crate::batch::{into_batches, DEFAULT_BATCH_SIZE};
    pub use crate::clean::{clean_phone_number, CleanReport, PhoneCleaner};
    pub use crate::config::{CdpConfig, ConfigBuilder};
    pub use crate::customer::Customer;
    pub use crate::error::{CdpError, Result};
    pub use crate::loader::{CsvLoader, LoadReport};
    pub use crate::reader::{CustomerColumns, CustomerReader, CustomerRecords};
    pub use crate::store::{CustomerStore, SqliteStore};
}

#[cfg(test)]
mod tests {
    use crate::clean::clean_phone_number;
    use crate::customer::Customer;

    #[test]
    fn test_phone_cleaning() {
        assert_eq!(clean_phone_number("(555) 123-4567"), "5551234567");
        assert_eq!(clean_phone_number("abc"), "");
    }

    #[test]
    fn test_placeholder_email() {
        assert_eq!(Customer::placeholder_email(17), "customer17@example.com");
    }
}
