use clap::{Args, Parser, Subcommand};
use std::io::{BufRead, IsTerminal, Write};
use std::path::PathBuf;

use cdpload::config::CdpConfig;
use cdpload::prelude::*;

#[derive(Parser)]
#[command(name = "cdpctl")]
#[command(about = "Customer CSV toolkit - clean phone numbers and bulk-load profiles into a customer table", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean the phone column of a CSV export
    Clean(CleanArgs),
    /// Load a CSV export into the customer table
    Load(LoadArgs),
    /// Run verification queries against the customer table
    Verify(VerifyArgs),
}

#[derive(Args)]
struct CleanArgs {
    /// Path to the CSV file to clean
    #[arg(short, long)]
    input: PathBuf,
    /// Path for the cleaned output file
    #[arg(short, long, conflicts_with = "in_place")]
    output: Option<PathBuf>,
    /// Overwrite the input file after creating a backup copy
    #[arg(long)]
    in_place: bool,
    /// Phone column name (defaults to the configured column)
    #[arg(long)]
    column: Option<String>,
    /// Skip the interactive confirmation for in-place cleaning
    #[arg(short = 'y', long)]
    yes: bool,
}

#[derive(Args)]
struct LoadArgs {
    /// Path to the CSV file to load
    #[arg(short, long)]
    input: PathBuf,
    /// Path to the SQLite database file
    #[arg(short, long)]
    database: PathBuf,
    /// Rows per insert batch (defaults to the configured size)
    #[arg(long)]
    batch_size: Option<usize>,
    /// Delete all existing customers before loading
    #[arg(long)]
    clear: bool,
}

#[derive(Args)]
struct VerifyArgs {
    /// Path to the SQLite database file
    #[arg(short, long)]
    database: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    let config = CdpConfig::load();
    match cli.command {
        Commands::Clean(args) => cmd_clean(args, &config),
        Commands::Load(args) => cmd_load(args, &config),
        Commands::Verify(args) => cmd_verify(args),
    }
}

fn cmd_clean(args: CleanArgs, config: &CdpConfig) {
    let column = args
        .column
        .unwrap_or_else(|| config.phone_column.clone());
    let cleaner = PhoneCleaner::new()
        .with_column(column)
        .with_progress(config.enable_progress_bar);

    let result = if args.in_place {
        println!("This will modify the original CSV file in place.");
        println!("A backup will be created before making changes.");
        if !args.yes && !confirm("Do you want to proceed with in-place cleaning? (y/N): ") {
            println!("Operation cancelled by user");
            std::process::exit(0);
        }
        cleaner.clean_in_place(&args.input)
    } else {
        match args.output {
            Some(output) => cleaner.clean_file(&args.input, output),
            None => {
                eprintln!("Either --output or --in-place must be given");
                std::process::exit(1);
            }
        }
    };

    match result {
        Ok(_) => println!("Phone number cleaning completed successfully!"),
        Err(e) => {
            eprintln!("Error during phone number cleaning: {}", e.user_message());
            std::process::exit(1);
        }
    }
}

fn cmd_load(args: LoadArgs, config: &CdpConfig) {
    let mut store = match SqliteStore::open(&args.database) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error opening database: {}", e.user_message());
            std::process::exit(1);
        }
    };

    match store.count() {
        Ok(count) if count > 0 => {
            println!("Current customer count in database: {}", count);
            println!("Already-present ids will be skipped during the load.");
        }
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error querying database: {}", e.user_message());
            std::process::exit(1);
        }
    }

    if args.clear {
        match store.clear() {
            Ok(removed) => println!("Cleared {} existing customer records", removed),
            Err(e) => {
                eprintln!("Error clearing customer table: {}", e.user_message());
                std::process::exit(1);
            }
        }
    }

    let loader = CsvLoader::new()
        .with_batch_size(args.batch_size.unwrap_or(config.batch_size))
        .with_reader(CustomerReader::new().with_columns(config.customer_columns()))
        .with_progress(config.enable_progress_bar);

    match loader.load(&args.input, &mut store) {
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error loading CSV data: {}", e.user_message());
            std::process::exit(1);
        }
    }
}

fn cmd_verify(args: VerifyArgs) {
    let store = match SqliteStore::open(&args.database) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error opening database: {}", e.user_message());
            std::process::exit(1);
        }
    };

    let result = (|| -> Result<()> {
        println!("Total customers in database: {}", store.count()?);

        let sample = store.sample(5)?;
        if !sample.is_empty() {
            println!("\nSample records:");
            for customer in &sample {
                println!("  {}", customer);
            }
        }

        let duplicates = store.duplicate_emails(5)?;
        if duplicates.is_empty() {
            println!("\nNo duplicate emails found");
        } else {
            println!("\nDuplicate emails found:");
            for (email, count) in &duplicates {
                println!("  {}: {} occurrences", email, count);
            }
        }
        Ok(())
    })();

    if let Err(e) = result {
        eprintln!("Error verifying data: {}", e.user_message());
        std::process::exit(1);
    }
}

/// Prompt for a y/N confirmation; non-interactive stdin counts as confirmed
fn confirm(prompt: &str) -> bool {
    let stdin = std::io::stdin();
    if !stdin.is_terminal() {
        return true;
    }

    print!("{}", prompt);
    let _ = std::io::stdout().flush();

    let mut answer = String::new();
    if stdin.lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
