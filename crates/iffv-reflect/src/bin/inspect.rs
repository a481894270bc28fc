// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! iffv-inspect - List the object blocks and field headers of an IFFV stream.
//!
//! Usage:
//!   iffv-inspect --input save.iffv
//!   iffv-inspect --input save.iffv --names x,y,position
//!   iffv-inspect --input save.iffv --json

use anyhow::Context;
use clap::Parser;
use iffv_reflect::codec::{inspect_iffv, ObjectBlock};
use iffv_reflect::hash_name;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "iffv-inspect")]
#[command(about = "Inspect the framing of an IFFV binary stream")]
#[command(version)]
struct Args {
    /// Input file holding one or more IFFV object blocks
    #[arg(short, long)]
    input: PathBuf,

    /// Field names to match against header hashes (comma separated)
    #[arg(short, long)]
    names: Option<String>,

    /// Print the block listing as JSON
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let file = File::open(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;
    let mut reader = BufReader::new(file);
    let blocks = inspect_iffv(&mut reader)
        .with_context(|| format!("Failed to parse {}", args.input.display()))?;
    debug!("Parsed {} blocks", blocks.len());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&blocks)?);
        return Ok(());
    }

    let names = known_names(args.names.as_deref());
    info!("Input: {}", args.input.display());
    print_blocks(&blocks, &names);
    Ok(())
}

fn known_names(list: Option<&str>) -> HashMap<u32, String> {
    list.map(|list| {
        list.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| (hash_name(name), name.to_string()))
            .collect()
    })
    .unwrap_or_default()
}

fn print_blocks(blocks: &[ObjectBlock], names: &HashMap<u32, String>) {
    for (index, block) in blocks.iter().enumerate() {
        println!(
            "block {} @ {:#x}: {} fields",
            index,
            block.offset,
            block.fields.len()
        );
        for entry in &block.fields {
            let label = names
                .get(&entry.header.name_hash)
                .map_or("?", String::as_str);
            println!(
                "  {:#010x} {:<16} v{:<3} {:>8} bytes @ {:#x}",
                entry.header.name_hash,
                label,
                entry.header.version,
                entry.header.data_size,
                entry.payload_offset
            );
        }
    }
}
