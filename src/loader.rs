/*!
 * Idempotent bulk-persist pipeline
 *
 * Reads a customer CSV file, materializes the full ordered batch queue, then
 * persists batches strictly sequentially over a single store connection.
 * A failed batch-level insert falls back to per-row inserts so one bad row
 * cannot block an entire batch.
 */

use std::path::Path;

use crate::batch::{into_batches, DEFAULT_BATCH_SIZE};
use crate::customer::Customer;
use crate::reader::CustomerReader;
use crate::store::CustomerStore;
use crate::Result;

#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};

/// Outcome of one load run, returned by value rather than accumulated in
/// process-wide counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Rows read and mapped from the source file
    pub total_read: usize,
    /// Rows actually inserted into the store
    pub inserted: usize,
    /// Number of batches formed
    pub batches: usize,
    /// Rows that failed individually during per-row fallback
    pub fallback_rows_failed: usize,
}

impl LoadReport {
    /// Rows not inserted (duplicates skipped plus fallback failures)
    pub fn skipped(&self) -> usize {
        self.total_read - self.inserted
    }

    /// Print a summary of the load run
    pub fn print_summary(&self) {
        println!("Data load completed!");
        println!("   Rows read: {}", self.total_read);
        println!("   Rows inserted: {}", self.inserted);
        println!("   Rows skipped: {}", self.skipped());
        println!("   Batches processed: {}", self.batches);
        if self.fallback_rows_failed > 0 {
            println!(
                "   Rows failed during fallback: {}",
                self.fallback_rows_failed
            );
        }
    }
}

/// Batched CSV-to-store loader
pub struct CsvLoader {
    batch_size: usize,
    reader: CustomerReader,
    show_progress: bool,
}

impl Default for CsvLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvLoader {
    /// Create a loader with the default batch size and column names
    pub fn new() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            reader: CustomerReader::new(),
            show_progress: true,
        }
    }

    /// Set the number of customers per batch (clamped to at least 1)
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Use a customized reader (for non-default column names)
    pub fn with_reader(mut self, reader: CustomerReader) -> Self {
        self.reader = reader;
        self
    }

    /// Enable or disable progress output
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Load every row of `path` into `store`, once per unique id
    ///
    /// Re-running against the same file and a non-empty store inserts nothing
    /// new and returns Ok: already-present ids are silently skipped. An
    /// unparsable identifier aborts the whole run before any batch is
    /// persisted.
    pub fn load<P: AsRef<Path>, S: CustomerStore>(
        &self,
        path: P,
        store: &mut S,
    ) -> Result<LoadReport> {
        let path = path.as_ref();

        if self.show_progress {
            println!("Loading data from: {}", path.display());
        }

        // Materialize every row before persisting anything, so a mapping
        // failure cannot leave a partially loaded file behind.
        let customers: Vec<Customer> = self
            .reader
            .records(path)?
            .collect::<Result<Vec<Customer>>>()?;
        let total_read = customers.len();

        let batches = into_batches(customers, self.batch_size);
        let batch_count = batches.len();

        if self.show_progress {
            println!(
                "Finished reading CSV. Total records: {} ({} batches)",
                total_read, batch_count
            );
        }

        #[cfg(feature = "progress")]
        let progress_bar = if self.show_progress {
            let pb = ProgressBar::new(batch_count as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} batches")
                    .unwrap()
                    .progress_chars("#>-"),
            );
            Some(pb)
        } else {
            None
        };

        let mut report = LoadReport {
            total_read,
            batches: batch_count,
            ..Default::default()
        };

        // Batches persist strictly in formation order, one at a time, to keep
        // a single store connection in flight.
        for (index, batch) in batches.iter().enumerate() {
            let (inserted, failed) = self.process_batch(store, batch, index + 1);
            report.inserted += inserted;
            report.fallback_rows_failed += failed;

            #[cfg(feature = "progress")]
            if let Some(ref pb) = progress_bar {
                pb.set_position((index + 1) as u64);
            }

            if self.show_progress {
                println!(
                    "Processed batch {}/{}: {} records (Total: {}/{})",
                    index + 1,
                    batch_count,
                    inserted,
                    report.inserted,
                    total_read
                );
            }
        }

        #[cfg(feature = "progress")]
        if let Some(pb) = progress_bar {
            pb.finish_with_message("Load complete");
        }

        if self.show_progress {
            report.print_summary();
        }

        Ok(report)
    }

    /// Persist one batch, returning (rows inserted, fallback rows failed)
    ///
    /// The batch-level duplicate-skip insert is tried first. If that call
    /// itself errors, each row is inserted individually; a row's failure is
    /// logged and skipped so the rest of the batch still lands.
    fn process_batch<S: CustomerStore>(
        &self,
        store: &mut S,
        batch: &[Customer],
        batch_number: usize,
    ) -> (usize, usize) {
        match store.insert_many_skipping_duplicates(batch) {
            Ok(inserted) => (inserted, 0),
            Err(batch_err) => {
                eprintln!(
                    "Error processing batch {}: {} (falling back to per-row inserts)",
                    batch_number, batch_err
                );

                let mut inserted = 0;
                let mut failed = 0;
                for customer in batch {
                    match store.insert(customer) {
                        Ok(()) => inserted += 1,
                        Err(row_err) => {
                            failed += 1;
                            eprintln!(
                                "Failed to insert customer {}: {}",
                                customer.id, row_err
                            );
                        }
                    }
                }
                (inserted, failed)
            }
        }
    }
}
