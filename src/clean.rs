/*!
 * Phone number normalization for customer CSV files
 *
 * This module strips a designated phone-like column down to digits-only,
 * either into a new file or in place after creating a backup copy of the
 * original. All other columns pass through unchanged.
 */

use std::path::{Path, PathBuf};

use crate::{CdpError, Result};

/// Default name of the column holding phone numbers
pub const DEFAULT_PHONE_COLUMN: &str = "Cell_Number";

/// Suffix appended to the file stem for the in-place backup copy
pub const BACKUP_SUFFIX: &str = "_backup";

/// Number of changed examples printed during cleaning
const EXAMPLE_LIMIT: usize = 5;

/// Remove every character that is not a decimal digit
///
/// Empty or whitespace-only input maps to the empty string. The transform is
/// idempotent: cleaning an already-cleaned value returns it unchanged.
pub fn clean_phone_number(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Statistics accumulated over one cleaning run
///
/// Every row falls into exactly one class: cleaned (non-empty original whose
/// digit-stripped form differs), empty (original was empty or whitespace-only),
/// or unchanged (the rest).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    /// Total rows processed
    pub total: usize,
    /// Rows whose phone value changed
    pub cleaned: usize,
    /// Rows whose original phone value was empty
    pub empty: usize,
}

impl CleanReport {
    /// Rows whose phone value was already digits-only
    pub fn unchanged(&self) -> usize {
        self.total - self.cleaned - self.empty
    }

    /// Print a summary of the cleaning run
    pub fn print_summary(&self) {
        println!("Processing completed!");
        println!("   Total records: {}", self.total);
        println!("   Records with phone numbers cleaned: {}", self.cleaned);
        println!("   Records with empty phone numbers: {}", self.empty);
        println!("   Records unchanged: {}", self.unchanged());
    }
}

/// CSV phone number cleaner
pub struct PhoneCleaner {
    /// Name of the column to clean
    column: String,
    /// Whether to print progress and example lines
    show_progress: bool,
}

impl Default for PhoneCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl PhoneCleaner {
    /// Create a new cleaner targeting the default phone column
    pub fn new() -> Self {
        Self {
            column: DEFAULT_PHONE_COLUMN.to_string(),
            show_progress: true,
        }
    }

    /// Set the name of the column to clean
    pub fn with_column<S: Into<String>>(mut self, column: S) -> Self {
        self.column = column.into();
        self
    }

    /// Enable or disable progress output
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Clean `input` into a new file at `output`
    ///
    /// Fails with `MissingColumn` before writing anything if the designated
    /// column is absent from the header. The output keeps the same header and
    /// row count, with standard CSV quoting applied by the writer.
    pub fn clean_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
    ) -> Result<CleanReport> {
        let input = input.as_ref();
        let output = output.as_ref();

        if !input.exists() {
            return Err(CdpError::source_not_found(input.to_path_buf()));
        }

        let (headers, rows, report) = self.clean_rows(input)?;

        let mut writer = csv::Writer::from_path(output)?;
        writer.write_record(&headers)?;
        for row in &rows {
            writer.write_record(row)?;
        }
        writer.flush()?;

        if self.show_progress {
            report.print_summary();
            println!("Cleaned file written to: {}", output.display());
        }

        Ok(report)
    }

    /// Clean `path` in place, preserving a backup copy first
    ///
    /// The original file is copied byte-for-byte to the sibling backup path
    /// before anything is written. If writing the cleaned content fails, the
    /// original is restored from the backup and the write failure is
    /// re-signaled. The backup is never deleted.
    pub fn clean_in_place<P: AsRef<Path>>(&self, path: P) -> Result<CleanReport> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(CdpError::source_not_found(path.to_path_buf()));
        }

        let backup = backup_path(path);
        std::fs::copy(path, &backup)?;
        if self.show_progress {
            println!("Backup created at: {}", backup.display());
        }

        let (headers, rows, report) = self.clean_rows(path)?;

        // Serialize the full output before touching the original so a failed
        // read can never leave a truncated file behind.
        let buffer = write_to_buffer(&headers, &rows)?;

        if let Err(write_err) = std::fs::write(path, &buffer) {
            let restored = std::fs::copy(&backup, path).is_ok();
            if self.show_progress {
                if restored {
                    eprintln!("Write failed, original restored from backup");
                } else {
                    eprintln!(
                        "Write failed and restore failed; backup remains at {}",
                        backup.display()
                    );
                }
            }
            return Err(CdpError::WriteFailure {
                path: path.to_path_buf(),
                restored,
                source: write_err,
            });
        }

        if self.show_progress {
            report.print_summary();
            println!("Original file updated: {}", path.display());
            println!("Backup available at: {}", backup.display());
        }

        Ok(report)
    }

    /// Read all rows, cleaning the phone column and accumulating statistics
    fn clean_rows(
        &self,
        input: &Path,
    ) -> Result<(csv::StringRecord, Vec<csv::StringRecord>, CleanReport)> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(input)?;

        let headers = reader.headers()?.clone();
        let phone_index = headers
            .iter()
            .position(|h| h == self.column)
            .ok_or_else(|| CdpError::missing_column(&self.column, &headers))?;

        let mut rows = Vec::new();
        let mut report = CleanReport::default();

        for result in reader.records() {
            let record = result?;
            report.total += 1;

            let original = record.get(phone_index).unwrap_or("");
            let cleaned = clean_phone_number(original);

            if original.trim().is_empty() {
                report.empty += 1;
            } else if original != cleaned {
                report.cleaned += 1;
                if self.show_progress && report.cleaned <= EXAMPLE_LIMIT {
                    println!(
                        "Example {}: \"{}\" -> \"{}\"",
                        report.cleaned, original, cleaned
                    );
                }
            }

            let row: csv::StringRecord = record
                .iter()
                .enumerate()
                .map(|(i, value)| {
                    if i == phone_index {
                        cleaned.clone()
                    } else {
                        value.to_string()
                    }
                })
                .collect();
            rows.push(row);

            if self.show_progress && report.total % 10_000 == 0 {
                println!("Processed {} records...", report.total);
            }
        }

        Ok((headers, rows, report))
    }
}

/// Sibling backup path for in-place cleaning: `<stem>_backup.<ext>`
pub fn backup_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("backup");
    let name = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}{}.{}", stem, BACKUP_SUFFIX, ext),
        None => format!("{}{}", stem, BACKUP_SUFFIX),
    };
    path.with_file_name(name)
}

/// Serialize header and rows into an in-memory CSV buffer
fn write_to_buffer(headers: &csv::StringRecord, rows: &[csv::StringRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| CdpError::Custom {
            message: format!("Failed to flush CSV buffer: {}", e),
            suggestion: None,
        })
}
