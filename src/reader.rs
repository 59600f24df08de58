/*!
 * CSV reader for customer profile exports
 *
 * Maps CSV rows onto the `Customer` entity shape through a synchronous,
 * restartable iterator, so batching and persistence can be exercised without
 * any file I/O in tests.
 */

use std::fs::File;
use std::path::Path;

use crate::customer::Customer;
use crate::{CdpError, Result};

/// Default source column names for the customer load path
pub mod columns {
    pub const ID: &str = "Indiv_ID";
    pub const EMAIL: &str = "Email";
    pub const FIRST_NAME: &str = "First_Name";
    pub const LAST_NAME: &str = "Last_Name";
    pub const PHONE: &str = "Cell_Number";
}

/// Column names used to map rows onto `Customer`
#[derive(Debug, Clone)]
pub struct CustomerColumns {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

impl Default for CustomerColumns {
    fn default() -> Self {
        Self {
            id: columns::ID.to_string(),
            email: columns::EMAIL.to_string(),
            first_name: columns::FIRST_NAME.to_string(),
            last_name: columns::LAST_NAME.to_string(),
            phone: columns::PHONE.to_string(),
        }
    }
}

/// Resolved header positions for one file
///
/// Only the identifier column is required; the others fall back to defaults
/// at mapping time when absent.
#[derive(Debug, Clone)]
struct ColumnIndexes {
    id: usize,
    email: Option<usize>,
    first_name: Option<usize>,
    last_name: Option<usize>,
    phone: Option<usize>,
}

impl ColumnIndexes {
    fn resolve(headers: &csv::StringRecord, names: &CustomerColumns) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h == name);

        let id = find(&names.id).ok_or_else(|| CdpError::missing_column(&names.id, headers))?;

        Ok(Self {
            id,
            email: find(&names.email),
            first_name: find(&names.first_name),
            last_name: find(&names.last_name),
            phone: find(&names.phone),
        })
    }
}

/// Customer CSV reader
pub struct CustomerReader {
    columns: CustomerColumns,
}

impl Default for CustomerReader {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomerReader {
    /// Create a new reader with the default column names
    pub fn new() -> Self {
        Self {
            columns: CustomerColumns::default(),
        }
    }

    /// Override the source column names
    pub fn with_columns(mut self, columns: CustomerColumns) -> Self {
        self.columns = columns;
        self
    }

    /// Override just the identifier column name
    pub fn with_id_column<S: Into<String>>(mut self, name: S) -> Self {
        self.columns.id = name.into();
        self
    }

    /// Open a customer CSV file as an iterator of mapped records
    ///
    /// Fails immediately with `SourceNotFound` if the path does not exist and
    /// `MissingColumn` if the identifier column is absent from the header.
    pub fn records<P: AsRef<Path>>(&self, path: P) -> Result<CustomerRecords> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(CdpError::source_not_found(path.to_path_buf()));
        }

        let file = File::open(path)?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(file);

        let headers = reader.headers()?.clone();
        let indexes = ColumnIndexes::resolve(&headers, &self.columns)?;

        Ok(CustomerRecords {
            inner: reader.into_records(),
            indexes,
            line: 1, // header occupies line 1
        })
    }

    /// Read and map every row of a customer CSV file
    pub fn read_all<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Customer>> {
        self.records(path)?.collect()
    }
}

/// Iterator over the mapped customer records of one CSV file
///
/// Each call to `records()` produces a fresh, finite iterator over the file's
/// rows; the iterator owns its underlying file handle.
pub struct CustomerRecords {
    inner: csv::StringRecordsIntoIter<File>,
    indexes: ColumnIndexes,
    line: usize,
}

impl CustomerRecords {
    fn map_record(&self, record: &csv::StringRecord) -> Result<Customer> {
        let get_field = |index: Option<usize>| -> Option<String> {
            index
                .and_then(|i| record.get(i))
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.trim().to_string())
        };

        let id_value = record.get(self.indexes.id).unwrap_or("").trim();
        let id: i64 = id_value
            .parse()
            .map_err(|_| CdpError::invalid_identifier(id_value, self.line))?;

        Ok(Customer::from_fields(
            id,
            get_field(self.indexes.email),
            get_field(self.indexes.first_name),
            get_field(self.indexes.last_name),
            get_field(self.indexes.phone),
        ))
    }
}

impl Iterator for CustomerRecords {
    type Item = Result<Customer>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.inner.next()?;
        self.line += 1;

        Some(match result {
            Ok(record) => self.map_record(&record),
            Err(e) => Err(e.into()),
        })
    }
}
