//! classin-convert CLI - Turn ClassIn gradebook exports into import files
//!
//! # Main Commands
//!
//! ```bash
//! classin-convert convert export.csv --start 2026-09-01    # Normalized CSV on stdout
//! classin-convert statuses export.csv --write              # Add new statuses to the mapping
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! classin-convert parse export.csv      # Show header row and detected assignments
//! classin-convert mapping               # Show the effective grade mapping
//! ```
//!
//! The grade mapping is a JSON object `{ "TOKEN": "percentage" }`, taken from
//! `--mapping`, else from the `CLASSIN_MAPPING` variable (`.env` is read),
//! else the built-in letter grade defaults.

use clap::{Parser, Subcommand, ValueEnum};
use classin_convert::config::MAPPING_ENV_VAR;
use classin_convert::{
    convert_bytes, detect_layout, parse_file_auto, propose_additions, records_to_csv,
    records_to_json, transform::discover_in_table, ConvertOptions, GradeMapping, TargetRecord,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "classin-convert")]
#[command(about = "Convert ClassIn gradebook exports into per-student marks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Full conversion: export → normalized records
    Convert {
        /// ClassIn export file
        input: PathBuf,

        /// First possible assignment date (yyyy-mm-dd, default: today)
        #[arg(short, long)]
        start: Option<String>,

        /// Grade mapping JSON file
        #[arg(short, long)]
        mapping: Option<PathBuf>,

        /// Seed for reproducible assignment dates
        #[arg(long)]
        seed: Option<u64>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: OutputFormat,

        /// Number of records to preview on stderr
        #[arg(long, default_value = "0")]
        preview: usize,
    },

    /// List status tokens the mapping does not cover yet
    Statuses {
        /// ClassIn export file
        input: PathBuf,

        /// Grade mapping JSON file
        #[arg(short, long)]
        mapping: Option<PathBuf>,

        /// Add the new tokens to the mapping file with percentage 0
        #[arg(short, long)]
        write: bool,
    },

    /// Show the detected header row and assignments
    Parse {
        /// ClassIn export file
        input: PathBuf,
    },

    /// Show the effective grade mapping
    Mapping {
        /// Grade mapping JSON file
        #[arg(short, long)]
        mapping: Option<PathBuf>,
    },
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            input,
            start,
            mapping,
            seed,
            output,
            format,
            preview,
        } => cmd_convert(
            &input,
            start.as_deref(),
            mapping.as_deref(),
            seed,
            output.as_deref(),
            format,
            preview,
        ),

        Commands::Statuses { input, mapping, write } => {
            cmd_statuses(&input, mapping.as_deref(), write)
        }

        Commands::Parse { input } => cmd_parse(&input),

        Commands::Mapping { mapping } => cmd_mapping(mapping.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

/// Mapping path from the flag or the environment.
fn mapping_path(flag: Option<&Path>) -> Option<PathBuf> {
    flag.map(Path::to_path_buf)
        .or_else(|| std::env::var_os(MAPPING_ENV_VAR).map(PathBuf::from))
}

/// Load the mapping, falling back to defaults when no file exists yet.
fn load_mapping(flag: Option<&Path>) -> Result<GradeMapping, Box<dyn std::error::Error>> {
    match mapping_path(flag) {
        Some(path) if path.exists() => {
            eprintln!("🗺️  Mapping: {}", path.display());
            Ok(GradeMapping::load(&path)?)
        }
        Some(path) => {
            eprintln!("🗺️  Mapping file {} not found, using defaults", path.display());
            Ok(GradeMapping::with_defaults())
        }
        None => Ok(GradeMapping::with_defaults()),
    }
}

fn cmd_convert(
    input: &Path,
    start: Option<&str>,
    mapping: Option<&Path>,
    seed: Option<u64>,
    output: Option<&Path>,
    format: OutputFormat,
    preview: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Processing: {}", input.display());

    let mut options = match start {
        Some(s) => ConvertOptions::from_start_str(s)?,
        None => ConvertOptions::default(),
    };
    options.seed = seed;

    let mapping = load_mapping(mapping)?;
    for problem in mapping.validate() {
        eprintln!("   ⚠️ {}", problem);
    }

    let bytes = fs::read(input)?;
    let result = convert_bytes(&bytes, &mapping, &options);

    for entry in result.log.entries() {
        eprintln!("{}", entry.render());
    }

    let result = result.require_records()?;

    if preview > 0 {
        print_preview(&result.records, preview);
    }

    let content = match format {
        OutputFormat::Csv => records_to_csv(&result.records),
        OutputFormat::Json => records_to_json(&result.records)?,
    };
    write_output(&content, output)?;

    eprintln!("\n✨ Done!");
    Ok(())
}

fn print_preview(records: &[TargetRecord], limit: usize) {
    eprintln!("\n👀 Preview ({} of {}):", limit.min(records.len()), records.len());
    for r in records.iter().take(limit) {
        eprintln!(
            "   {:<16} {:<20} {}  {:>6} / {}",
            r.student_name,
            r.assignment_name,
            r.date_label(),
            if r.has_mark() { r.marks.as_str() } else { "—" },
            r.total_marks_possible
        );
    }
}

fn cmd_statuses(
    input: &Path,
    mapping: Option<&Path>,
    write: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("🔎 Scanning statuses: {}", input.display());

    let parsed = parse_file_auto(input)?;
    let tokens = discover_in_table(&parsed.table);
    let mut grade_mapping = load_mapping(mapping)?;
    let proposals = propose_additions(&tokens, &grade_mapping);

    eprintln!("   {} status token(s), {} new", tokens.len(), proposals.len());
    for token in proposals.keys() {
        println!("{}", token);
    }

    if write && !proposals.is_empty() {
        let path = mapping_path(mapping)
            .ok_or_else(|| format!("--write needs --mapping or {}", MAPPING_ENV_VAR))?;
        let added = grade_mapping.merge_proposals(proposals);
        grade_mapping.save(&path)?;
        eprintln!("💾 Added {} token(s) to {}", added, path.display());
    }

    Ok(())
}

fn cmd_parse(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing: {}", input.display());

    let parsed = parse_file_auto(input)?;
    let layout = detect_layout(&parsed.table);

    eprintln!("   Encoding: {}", parsed.encoding);
    eprintln!("   Rows: {}, columns: {}", parsed.table.len(), parsed.table.width());
    eprintln!("   Header row: {}", layout.header_row + 1);

    if !layout.has_assignments() {
        return Err("No valid assignment columns found".into());
    }
    println!("📋 {} assignment(s):", layout.assignments.len());
    for a in &layout.assignments {
        println!("[{:2}] {} (out of {})", a.source_column, a.name, a.total_marks_label());
    }

    Ok(())
}

fn cmd_mapping(mapping: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let grade_mapping = load_mapping(mapping)?;

    for (token, pct) in grade_mapping.iter() {
        println!("{:<12} {}", token, pct);
    }
    for problem in grade_mapping.validate() {
        eprintln!("   ⚠️ {}", problem);
    }

    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
