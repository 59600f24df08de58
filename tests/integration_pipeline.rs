/*!
 * Integration tests for the full clean -> load pipeline
 *
 * Exercises cleaning (including in-place mode with backup), the batched
 * duplicate-skip load, and re-run idempotence against real files and a
 * SQLite database in a temporary directory.
 */

use std::fs;
use std::path::Path;

use cdpload::prelude::*;
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn read_rows(path: &Path) -> (csv::StringRecord, Vec<csv::StringRecord>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let headers = reader.headers().unwrap().clone();
    let rows = reader.records().map(|r| r.unwrap()).collect();
    (headers, rows)
}

const PROFILE_CSV: &str = "\
Indiv_ID,Email,First_Name,Last_Name,Cell_Number
1,ann@example.com,Ann,Lee,(555) 123-4567
2,bob@example.com,\"Bob, Jr.\",O'Brien,555.987.6543
3,,,,
4,dee@example.com,Dee,\"Smith \"\"The Rock\"\"\",5550001111
";

#[test]
fn clean_round_trip_preserves_rows_and_other_columns() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "profiles.csv", PROFILE_CSV);
    let output = dir.path().join("profiles_cleaned.csv");

    let report = PhoneCleaner::new()
        .with_progress(false)
        .clean_file(&input, &output)
        .unwrap();

    assert_eq!(report.total, 4);
    assert_eq!(report.cleaned, 2);
    assert_eq!(report.empty, 1);
    assert_eq!(report.unchanged(), 1);

    let (in_headers, in_rows) = read_rows(&input);
    let (out_headers, out_rows) = read_rows(&output);

    assert_eq!(in_headers, out_headers);
    assert_eq!(in_rows.len(), out_rows.len());

    let phone_index = out_headers.iter().position(|h| h == "Cell_Number").unwrap();
    for (before, after) in in_rows.iter().zip(out_rows.iter()) {
        for i in 0..before.len() {
            if i == phone_index {
                let cleaned = after.get(i).unwrap();
                assert!(cleaned.chars().all(|c| c.is_ascii_digit()));
            } else {
                assert_eq!(before.get(i), after.get(i));
            }
        }
    }

    assert_eq!(out_rows[0].get(phone_index), Some("5551234567"));
    assert_eq!(out_rows[1].get(phone_index), Some("5559876543"));
    assert_eq!(out_rows[2].get(phone_index), Some(""));
}

#[test]
fn clean_in_place_backup_matches_original() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "profiles.csv", PROFILE_CSV);
    let original_bytes = fs::read(&input).unwrap();

    PhoneCleaner::new()
        .with_progress(false)
        .clean_in_place(&input)
        .unwrap();

    let backup = dir.path().join("profiles_backup.csv");
    assert!(backup.exists());
    assert_eq!(fs::read(&backup).unwrap(), original_bytes);

    // The file itself now holds the cleaned content.
    let (headers, rows) = read_rows(&input);
    let phone_index = headers.iter().position(|h| h == "Cell_Number").unwrap();
    assert_eq!(rows[0].get(phone_index), Some("5551234567"));
}

#[cfg(unix)]
#[test]
fn clean_in_place_failed_write_leaves_original_intact() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "profiles.csv", PROFILE_CSV);
    let original_bytes = fs::read(&input).unwrap();

    // Make the target unwritable so the cleaned-content write fails after
    // the backup was taken.
    fs::set_permissions(&input, fs::Permissions::from_mode(0o444)).unwrap();

    let err = PhoneCleaner::new()
        .with_progress(false)
        .clean_in_place(&input)
        .unwrap_err();
    assert!(matches!(err, CdpError::WriteFailure { .. }));

    fs::set_permissions(&input, fs::Permissions::from_mode(0o644)).unwrap();
    assert_eq!(fs::read(&input).unwrap(), original_bytes);

    // The backup survives the failure.
    let backup = dir.path().join("profiles_backup.csv");
    assert_eq!(fs::read(&backup).unwrap(), original_bytes);
}

#[test]
fn clean_missing_column_produces_no_output() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "noheader.csv", "Indiv_ID,Email\n1,a@example.com\n");
    let output = dir.path().join("out.csv");

    let err = PhoneCleaner::new()
        .with_progress(false)
        .clean_file(&input, &output)
        .unwrap_err();

    assert!(matches!(err, CdpError::MissingColumn { ref column, .. } if column == "Cell_Number"));
    assert!(!output.exists());
}

#[test]
fn load_pipeline_is_idempotent_against_file_database() {
    let dir = TempDir::new().unwrap();
    let raw = write_file(&dir, "profiles.csv", PROFILE_CSV);
    let cleaned = dir.path().join("profiles_cleaned.csv");
    let db_path = dir.path().join("customers.db");

    PhoneCleaner::new()
        .with_progress(false)
        .clean_file(&raw, &cleaned)
        .unwrap();

    let loader = CsvLoader::new().with_batch_size(2).with_progress(false);

    let mut store = SqliteStore::open(&db_path).unwrap();
    let first = loader.load(&cleaned, &mut store).unwrap();
    assert_eq!(first.total_read, 4);
    assert_eq!(first.inserted, 4);
    assert_eq!(first.batches, 2);
    drop(store);

    // Fresh connection, same file: nothing new is inserted and nothing errors.
    let mut store = SqliteStore::open(&db_path).unwrap();
    let second = loader.load(&cleaned, &mut store).unwrap();
    assert_eq!(second.inserted, 0);
    assert_eq!(second.skipped(), 4);
    assert_eq!(store.count().unwrap(), 4);

    // Row 3 had every optional field empty; the fallbacks landed in the store.
    let sample = store.sample(5).unwrap();
    let row3 = sample.iter().find(|c| c.id == 3).unwrap();
    assert_eq!(row3.email, "customer3@example.com");
    assert_eq!(row3.first_name, "Unknown");
    assert_eq!(row3.phone, None);
}

#[test]
fn load_missing_source_file_fails_before_processing() {
    let dir = TempDir::new().unwrap();
    let mut store = SqliteStore::open(dir.path().join("customers.db")).unwrap();

    let err = CsvLoader::new()
        .with_progress(false)
        .load(dir.path().join("missing.csv"), &mut store)
        .unwrap_err();

    assert!(matches!(err, CdpError::SourceNotFound { .. }));
    assert_eq!(store.count().unwrap(), 0);
}
