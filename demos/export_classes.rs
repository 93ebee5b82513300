//! Writes the registered entity class definitions to a JSON file.
//!
//! Run with `cargo run --example export_classes -- <output.json>`. The
//! output lists every registered classname with its base class and the
//! merged set of typed fields, which editor tooling can ingest.

#![expect(
    clippy::print_stdout,
    clippy::print_stderr,
    reason = "command-line tool output"
)]

use std::process::ExitCode;

use bsp_entities::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: export_classes <output.json>");
        return ExitCode::FAILURE;
    };

    let config = InitConfig {
        export_classes_path: Some(path.clone().into()),
    };
    let registry = match init(&config) {
        Ok(registry) => registry,
        Err(error) => {
            eprintln!("{error}");
            return ExitCode::FAILURE;
        }
    };

    println!("wrote {} class definitions to {path}", registry.len());
    for name in registry.class_names() {
        println!("  {name}");
    }
    ExitCode::SUCCESS
}
