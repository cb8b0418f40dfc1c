//! fieldmap-select: Discover product fields and build a field selection
//!
//! Reads a platform extraction payload, discovers the fields of its first
//! record, applies the requested exclusions and identifiers, and prints the
//! selection payload the integration expects.
//!
//! Usage:
//!   # Everything selected, product id on "id"
//!   fieldmap-select products.json --product-id id
//!
//!   # Drop images, keep only the sku of each variant and identify variants by it
//!   fieldmap-select products.json --exclude images --exclude variants \
//!       --include 'variants[0].sku' --array-id 'variants=variants[0].sku'
//!
//!   # Browse the discovered tree, restricted to media fields
//!   cat products.jsonl | fieldmap-select --ndjson --tree --group media
//!
//! Set RUST_LOG=debug for discovery details.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::Parser;
use fieldmap::schema::{filter_fields, FieldGroup};
use fieldmap::{
    missing_recommended_fields, DiscoveryConfig, Extraction, FieldMappingSession, FieldPath, Propagation,
    SessionConfig,
};
use std::fs::File;
use std::io::{stdin, BufReader, Read};

#[derive(Parser, Debug)]
#[command(name = "fieldmap-select")]
#[command(about = "Discover product fields and build a field selection", long_about = None)]
struct Args {
    /// Extraction payload (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Read newline-delimited JSON records
    #[arg(long)]
    ndjson: bool,

    /// Exclude a field and everything below it (applied before --include)
    #[arg(long, value_name = "PATH")]
    exclude: Vec<FieldPath>,

    /// Include a field and everything below it
    #[arg(long, value_name = "PATH")]
    include: Vec<FieldPath>,

    /// Top-level field that uniquely identifies a product
    #[arg(long, value_name = "PATH")]
    product_id: Option<FieldPath>,

    /// Identifier of an array's items, e.g. 'variants=variants[0].sku'
    #[arg(long, value_name = "ARRAY=FIELD", value_parser = parse_array_id)]
    array_id: Vec<(FieldPath, FieldPath)>,

    /// Deepest nesting level to discover (default: 2)
    #[arg(long)]
    max_depth: Option<usize>,

    /// Re-evaluate every ancestor on toggle, not just the parent
    #[arg(long)]
    full_depth: bool,

    /// Keep identifier fields in the output even when excluded
    #[arg(long)]
    force_include_identifiers: bool,

    /// Print the discovered field tree instead of the selection payload
    #[arg(long)]
    tree: bool,

    /// Only show top-level fields whose name contains this text
    #[arg(long, requires = "tree")]
    search: Option<String>,

    /// Only show top-level fields of this group
    #[arg(long, requires = "tree")]
    group: Option<FieldGroup>,

    /// Compact output (no pretty-printing)
    #[arg(long)]
    compact: bool,
}

fn parse_array_id(raw: &str) -> std::result::Result<(FieldPath, FieldPath), String> {
    let (array, field) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected ARRAY=FIELD, got '{}'", raw))?;
    let array = array.parse::<FieldPath>().map_err(|e| e.to_string())?;
    let field = field.parse::<FieldPath>().map_err(|e| e.to_string())?;
    Ok((array, field))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let reader: Box<dyn Read> = if let Some(file_path) = &args.input {
        Box::new(BufReader::new(
            File::open(file_path).with_context(|| format!("Failed to open {}", file_path))?,
        ))
    } else {
        Box::new(stdin())
    };

    let extraction = if args.ndjson {
        Extraction::from_ndjson(BufReader::new(reader))
    } else {
        Extraction::from_reader(reader)
    }
    .context("Failed to read extraction payload")?;

    let stats = extraction.stats();
    log::info!(
        "Extracted {} records with {} top-level fields",
        stats.total_records,
        stats.total_fields
    );

    let sample = extraction.sample()?;
    let missing = missing_recommended_fields(sample);
    if !missing.is_empty() {
        log::warn!("Sample record is missing recommended fields: {}", missing.join(", "));
    }

    let mut config = SessionConfig {
        force_include_identifiers: args.force_include_identifiers,
        ..SessionConfig::default()
    };
    if let Some(depth) = args.max_depth {
        config.discovery = DiscoveryConfig { max_depth: depth };
    }
    if args.full_depth {
        config.propagation = Propagation::FullDepth;
    }

    let mut session = FieldMappingSession::with_config(sample, config)?;

    for path in &args.exclude {
        session
            .set_field(path, false)
            .with_context(|| format!("Failed to exclude {}", path))?;
    }
    for path in &args.include {
        session
            .set_field(path, true)
            .with_context(|| format!("Failed to include {}", path))?;
    }
    if let Some(path) = &args.product_id {
        session
            .set_product_identifier(path)
            .with_context(|| format!("Failed to set product identifier {}", path))?;
    }
    for (array, field) in &args.array_id {
        session
            .set_array_identifier(array, field)
            .with_context(|| format!("Failed to set identifier of {}", array))?;
    }

    if args.tree {
        let query = args.search.as_deref().unwrap_or("");
        for root in filter_fields(session.tree(), query, args.group) {
            print_field(&session, root, 0);
        }
        println!(
            "\n{} of {} fields selected, product identifier: {}",
            session.selection().selected_count(),
            session.selection().total_count(),
            session
                .identifiers()
                .product_identifier()
                .map_or_else(|| "not set".to_string(), |p| p.to_string())
        );
        return Ok(());
    }

    let selection = session.finish()?;
    let output = if args.compact {
        serde_json::to_string(&selection)?
    } else {
        serde_json::to_string_pretty(&selection)?
    };
    println!("{}", output);

    Ok(())
}

/// Print one field and its subtree, one line each
fn print_field(session: &FieldMappingSession, path: &FieldPath, indent: usize) {
    let Some(node) = session.tree().get(path) else {
        return;
    };

    let mark = match session.checkbox_state(path) {
        Some(state) if state.indeterminate => "[-]",
        Some(state) if state.checked => "[x]",
        _ => "[ ]",
    };

    let mut line = format!("{:width$}{} {} ({}", "", mark, path.display_name(), node.info.type_label, width = indent * 2);
    if let Some(format) = node.info.format {
        line.push_str(&format!(", {}", format));
    }
    line.push(')');

    if session.is_product_identifier(path) {
        line.push_str(" <product id>");
    }
    if let Some(array) = session.tree().parent(path) {
        if session.is_array_identifier(array, path) {
            line.push_str(" <identifier>");
        }
    }
    if let Some(description) = node.info.description {
        line.push_str(&format!(" - {}", description));
    }
    println!("{}", line);

    for child in &node.children {
        print_field(session, child, indent + 1);
    }
}
