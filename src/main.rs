//! Statement Analyzer CLI
//!
//! Imports a statement CSV into an in-memory store and prints the import
//! report (categorized transactions plus spending analysis) as JSON.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- statement.csv [user-id] > report.json
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity
//! - `STATEMENT_DELIMITER`: Field separator override, e.g. `;`

use statement_analyzer::{EngineError, ImportConfig, ImportPipeline, MemoryStore, Result};
use std::env;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::process;

const DEFAULT_USER: &str = "local";

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(EngineError::MissingArgument);
    }

    let input_path = &args[1];
    let user_id = args.get(2).map(String::as_str).unwrap_or(DEFAULT_USER);

    let mut config = ImportConfig::default();
    if let Ok(raw) = env::var("STATEMENT_DELIMITER") {
        config.parser.delimiter = parse_delimiter(&raw)?;
    }

    let file = File::open(input_path)?;
    let reader = BufReader::new(file);

    let mut pipeline = ImportPipeline::with_config(MemoryStore::new(), config);
    let report = pipeline.import(user_id, reader)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, &report)?;
    writeln!(handle)?;

    Ok(())
}

fn parse_delimiter(raw: &str) -> Result<u8> {
    match raw.as_bytes() {
        [b] if b.is_ascii() => Ok(*b),
        _ => Err(EngineError::InvalidDelimiter(raw.to_string())),
    }
}
