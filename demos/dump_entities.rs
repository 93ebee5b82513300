//! Prints every entity decoded from a map's entity lump.
//!
//! Run with `cargo run --example dump_entities -- <map.bsp>`. Set
//! `RUST_LOG=info` to see the decode logs alongside the listing.

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
        eprintln!("usage: dump_entities <map.bsp>");
        return ExitCode::FAILURE;
    };

    match run(&path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}

fn run(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    init(&InitConfig::default())?;

    let lump = EntityLump::new(BspFile::open(path)?);
    for (index, entity) in lump.iter()?.enumerate() {
        println!("[{index}] {entity}");

        let mut pairs: Vec<_> = entity.entity().properties().iter().collect();
        pairs.sort();
        for (key, value) in pairs {
            println!("    {key:?} {value:?}");
        }
    }

    println!("{} entities total", lump.len()?);
    Ok(())
}
