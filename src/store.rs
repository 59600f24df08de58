/*!
 * Relational store capability for customer persistence
 *
 * The loader talks to storage through the `CustomerStore` trait so the
 * batching and fallback behavior can be tested against a stub. The shipped
 * implementation is a single-connection SQLite store whose bulk insert uses
 * `INSERT OR IGNORE` for duplicate-skip semantics keyed on the customer id.
 */

use std::path::Path;

use rusqlite::{params, Connection};

use crate::customer::Customer;
use crate::Result;

/// Store capability required by the load pipeline
pub trait CustomerStore {
    /// Insert a batch, silently skipping rows whose id already exists
    ///
    /// Returns the number of rows actually inserted. Skipped duplicates are
    /// not an error and are not reported individually.
    fn insert_many_skipping_duplicates(&mut self, batch: &[Customer]) -> Result<usize>;

    /// Insert a single customer, failing on a duplicate id
    ///
    /// Used by the per-row fallback path to isolate bad rows in a batch.
    fn insert(&mut self, customer: &Customer) -> Result<()>;

    /// Count the customers currently in the store
    fn count(&self) -> Result<u64>;
}

/// SQLite-backed customer store
///
/// One connection, used by one caller at a time. Each batch insert runs in
/// its own transaction; no transaction spans multiple batches.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a store at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Open an in-memory store, mainly for tests
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS customer (
                id          INTEGER PRIMARY KEY,
                email       TEXT NOT NULL,
                password    TEXT NOT NULL DEFAULT '',
                first_name  TEXT NOT NULL,
                last_name   TEXT NOT NULL,
                phone       TEXT
            );",
        )?;
        Ok(())
    }

    /// Delete every customer, returning the number of rows removed
    pub fn clear(&mut self) -> Result<u64> {
        let removed = self.conn.execute("DELETE FROM customer", [])?;
        Ok(removed as u64)
    }

    /// Fetch the first `n` customers ordered by id, for verification output
    pub fn sample(&self, n: usize) -> Result<Vec<Customer>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, email, password, first_name, last_name, phone
             FROM customer ORDER BY id ASC LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![n as i64], |row| {
            Ok(Customer {
                id: row.get(0)?,
                email: row.get(1)?,
                password: row.get(2)?,
                first_name: row.get(3)?,
                last_name: row.get(4)?,
                phone: row.get(5)?,
            })
        })?;

        let mut customers = Vec::new();
        for row in rows {
            customers.push(row?);
        }
        Ok(customers)
    }

    /// Report emails appearing more than once, with their occurrence counts
    ///
    /// Email uniqueness is not enforced by the loader, so duplicates are a
    /// data-quality observation rather than an error.
    pub fn duplicate_emails(&self, limit: usize) -> Result<Vec<(String, i64)>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT email, COUNT(*) as count
             FROM customer
             GROUP BY email
             HAVING COUNT(*) > 1
             ORDER BY count DESC
             LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut duplicates = Vec::new();
        for row in rows {
            duplicates.push(row?);
        }
        Ok(duplicates)
    }
}

impl CustomerStore for SqliteStore {
    fn insert_many_skipping_duplicates(&mut self, batch: &[Customer]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT OR IGNORE INTO customer
                    (id, email, password, first_name, last_name, phone)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;

            for customer in batch {
                inserted += stmt.execute(params![
                    customer.id,
                    customer.email,
                    customer.password,
                    customer.first_name,
                    customer.last_name,
                    customer.phone,
                ])?;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    fn insert(&mut self, customer: &Customer) -> Result<()> {
        self.conn.execute(
            "INSERT INTO customer
                (id, email, password, first_name, last_name, phone)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                customer.id,
                customer.email,
                customer.password,
                customer.first_name,
                customer.last_name,
                customer.phone,
            ],
        )?;
        Ok(())
    }

    fn count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM customer", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(id: i64) -> Customer {
        Customer::from_fields(id, None, None, None, Some("5551234567".to_string()))
    }

    #[test]
    fn test_insert_many_counts_new_rows_only() {
        let mut store = SqliteStore::open_in_memory().unwrap();

        let batch: Vec<Customer> = (1..=5).map(customer).collect();
        assert_eq!(store.insert_many_skipping_duplicates(&batch).unwrap(), 5);

        // Re-inserting the same batch is a no-op, not an error.
        assert_eq!(store.insert_many_skipping_duplicates(&batch).unwrap(), 0);
        assert_eq!(store.count().unwrap(), 5);
    }

    #[test]
    fn test_insert_many_skips_only_duplicates() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store
            .insert_many_skipping_duplicates(&[customer(1), customer(2)])
            .unwrap();

        let mixed: Vec<Customer> = vec![customer(2), customer(3), customer(4)];
        assert_eq!(store.insert_many_skipping_duplicates(&mixed).unwrap(), 2);
        assert_eq!(store.count().unwrap(), 4);
    }

    #[test]
    fn test_single_insert_fails_on_duplicate() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.insert(&customer(9)).unwrap();
        assert!(store.insert(&customer(9)).is_err());
    }

    #[test]
    fn test_clear_and_sample() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let batch: Vec<Customer> = (1..=10).map(customer).collect();
        store.insert_many_skipping_duplicates(&batch).unwrap();

        let sample = store.sample(3).unwrap();
        assert_eq!(sample.iter().map(|c| c.id).collect::<Vec<_>>(), vec![1, 2, 3]);

        assert_eq!(store.clear().unwrap(), 10);
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_duplicate_emails_reported() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let shared = Customer::from_fields(
            1,
            Some("shared@example.com".to_string()),
            None,
            None,
            None,
        );
        let mut other = shared.clone();
        other.id = 2;
        store
            .insert_many_skipping_duplicates(&[shared, other, customer(3)])
            .unwrap();

        let duplicates = store.duplicate_emails(5).unwrap();
        assert_eq!(duplicates, vec![("shared@example.com".to_string(), 2)]);
    }
}
