use std::fs::File;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use rayon::prelude::*;
use walkdir::WalkDir;

use calscape_normalize::logger::{log_info, set_log_file};
use calscape_normalize::options::CALSCAPE_PREAMBLE_ROWS;
use calscape_normalize::source::read_rows_from_path;
use calscape_normalize::{
    BatchSummary, CsvSink, JsonLinesSink, NormalizeOptions, Normalizer, SourceOptions,
    normalize_rows, parse_dimension, split_soil,
};

#[derive(Parser)]
#[command(
    name = "calscape",
    version,
    about = "Normalize CalScape plant exports for upload to a record store"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Normalize one or more exports into JSON lines or CSV/TSV.
    Normalize(Box<NormalizeArgs>),
    /// Parse a single height/width string and print the result.
    ParseDimension(ProbeArgs),
    /// Split a single soil description and print the result.
    SplitSoil(ProbeArgs),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Jsonl,
    Csv,
    Tsv,
}

impl OutputFormat {
    const fn extension(self) -> &'static str {
        match self {
            Self::Jsonl => "jsonl",
            Self::Csv => "csv",
            Self::Tsv => "tsv",
        }
    }
}

#[derive(Parser, Clone)]
struct NormalizeArgs {
    /// Input exports or directories (recurses directories for .csv/.tsv).
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output directory (computed file names).
    #[arg(long, conflicts_with = "out")]
    out_dir: Option<PathBuf>,

    /// Output file (only valid with a single input).
    #[arg(long, conflicts_with = "out_dir")]
    out: Option<PathBuf>,

    /// Output format: jsonl, csv, or tsv.
    #[arg(long, value_enum, default_value_t = OutputFormat::Jsonl)]
    format: OutputFormat,

    /// Preamble rows before the header row.
    #[arg(long, default_value_t = CALSCAPE_PREAMBLE_ROWS)]
    skip_rows: usize,

    /// Input delimiter. Defaults to '\t' for .tsv inputs and ',' otherwise.
    #[arg(long)]
    delimiter: Option<char>,

    /// Write header row (CSV/TSV only).
    #[arg(long = "headers", action = ArgAction::SetTrue, default_value_t = true)]
    headers: bool,
    /// Disable header row (CSV/TSV only).
    #[arg(long = "no-headers", action = ArgAction::SetFalse, overrides_with = "headers")]
    _no_headers: bool,

    /// JSON file with column names and missing-value placeholders.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Column identifying each record in diagnostics (overrides --config).
    #[arg(long)]
    name_column: Option<String>,

    /// Cell values treated as missing (comma-separated, overrides --config).
    #[arg(long = "missing", value_delimiter = ',')]
    missing: Option<Vec<String>>,

    /// Mirror warnings and errors into this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Number of concurrent worker threads.
    #[arg(long)]
    jobs: Option<usize>,

    /// Stop on the first rejected record.
    #[arg(long)]
    fail_fast: bool,
}

#[derive(Parser, Clone)]
struct ProbeArgs {
    text: String,
    /// Emit JSON instead of human readable output.
    #[arg(long)]
    json: bool,
}

type AnyError = Box<dyn std::error::Error + Send + Sync>;

fn main() -> Result<(), AnyError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Normalize(args) => run_normalize(&args),
        Command::ParseDimension(args) => run_parse_dimension(&args),
        Command::SplitSoil(args) => run_split_soil(&args),
    }
}

fn run_normalize(args: &NormalizeArgs) -> Result<(), AnyError> {
    if let Some(jobs) = args.jobs {
        // Ignore error if the global pool was already configured.
        let _ = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global();
    }
    if let Some(path) = &args.log_file {
        set_log_file(path)?;
    }

    let normalizer = Normalizer::new(resolve_options(args)?);
    let files = discover_inputs(&args.inputs);
    if files.is_empty() {
        return Err("no .csv or .tsv inputs found".into());
    }
    if args.out.is_some() && files.len() != 1 {
        return Err("--out requires a single input".into());
    }

    let mut tasks: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(files.len());
    if let Some(ref out) = args.out {
        tasks.push((files[0].clone(), out.clone()));
    } else {
        for input in files {
            let output = compute_output_path(&input, args);
            tasks.push((input, output));
        }
    }

    let process = |(input, output): (PathBuf, PathBuf)| -> Result<BatchSummary, AnyError> {
        let summary = normalize_one(&input, &output, &normalizer, args)?;
        println!(
            "{} -> {} ({} rows: {} normalized, {} partial, {} rejected)",
            input.display(),
            output.display(),
            summary.rows,
            summary.normalized,
            summary.partial,
            summary.rejected
        );
        Ok(summary)
    };

    if args.fail_fast {
        tasks
            .into_par_iter()
            .map(process)
            .collect::<Result<Vec<_>, _>>()?;
    } else {
        let results = tasks
            .into_par_iter()
            .map(|t| {
                let res = process(t);
                if let Err(ref e) = res {
                    eprintln!("error: {e}");
                }
                res
            })
            .collect::<Vec<_>>();
        let failures = results.iter().filter(|r| r.is_err()).count();
        let rejected: usize = results
            .iter()
            .filter_map(|r| r.as_ref().ok())
            .map(|s| s.rejected)
            .sum();
        if failures > 0 || rejected > 0 {
            log_info(&format!(
                "completed with {failures} failed inputs and {rejected} rejected records"
            ));
        }
    }

    Ok(())
}

fn resolve_options(args: &NormalizeArgs) -> Result<NormalizeOptions, AnyError> {
    let mut options = match &args.config {
        Some(path) => NormalizeOptions::from_json_file(path)?,
        None => NormalizeOptions::new(),
    };
    if let Some(name) = &args.name_column {
        options = options.with_name_column(name.clone());
    }
    if let Some(missing) = &args.missing {
        options = options.with_missing_placeholders(missing.iter().cloned());
    }
    options.validate()?;
    Ok(options)
}

fn normalize_one(
    input: &Path,
    output: &Path,
    normalizer: &Normalizer,
    args: &NormalizeArgs,
) -> Result<BatchSummary, AnyError> {
    let delimiter = match args.delimiter {
        Some(ch) => u8::try_from(ch).map_err(|_| format!("delimiter {ch:?} is not a single byte"))?,
        None if is_tsv(input) => b'\t',
        None => b',',
    };
    let source = SourceOptions::new()
        .with_skip_rows(args.skip_rows)
        .with_delimiter(delimiter);
    let rows = read_rows_from_path(input, &source)?;

    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(output)?;
    let summary = match args.format {
        OutputFormat::Jsonl => {
            let mut sink = JsonLinesSink::new(file);
            normalize_rows(&rows, normalizer, &mut sink, args.fail_fast)?
        }
        OutputFormat::Csv | OutputFormat::Tsv => {
            let mut sink = CsvSink::new(file)
                .with_headers(args.headers)
                .with_delimiter(if args.format == OutputFormat::Tsv { b'\t' } else { b',' });
            normalize_rows(&rows, normalizer, &mut sink, args.fail_fast)?
        }
    };
    Ok(summary)
}

fn run_parse_dimension(args: &ProbeArgs) -> Result<(), AnyError> {
    let parsed = parse_dimension(&args.text)?;
    if args.json {
        serde_json::to_writer_pretty(std::io::stdout(), &parsed)?;
        println!();
    } else {
        let show = |v: Option<f64>| v.map_or_else(|| "-".to_owned(), |v| v.to_string());
        println!("min (ft): {}", show(parsed.min_ft));
        println!("max (ft): {}", show(parsed.max_ft));
        println!("min (m):  {}", show(parsed.min_m));
        println!("max (m):  {}", show(parsed.max_m));
    }
    Ok(())
}

fn run_split_soil(args: &ProbeArgs) -> Result<(), AnyError> {
    let split = split_soil(&args.text);
    if args.json {
        serde_json::to_writer_pretty(std::io::stdout(), &split)?;
        println!();
    } else {
        println!("tolerates: {}", split.tolerates.as_deref().unwrap_or("-"));
        println!("prefers:   {}", split.prefers.as_deref().unwrap_or("-"));
    }
    Ok(())
}

fn discover_inputs(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input)
                .follow_links(false)
                .into_iter()
                .filter_map(Result::ok)
            {
                let path = entry.path();
                if path.is_file() && is_export(path) && !is_normalized_output(path) {
                    files.push(path.to_path_buf());
                }
            }
        } else if input.is_file() {
            files.push(input.clone());
        } else {
            eprintln!("warning: skipping missing input {}", input.display());
        }
    }
    files.sort();
    files.dedup();
    files
}

fn is_export(path: &Path) -> bool {
    path.extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("csv") || e.eq_ignore_ascii_case("tsv"))
}

fn is_tsv(path: &Path) -> bool {
    path.extension().is_some_and(|e| e.eq_ignore_ascii_case("tsv"))
}

fn is_normalized_output(path: &Path) -> bool {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .is_some_and(|stem| stem.ends_with(".normalized"))
}

fn compute_output_path(input: &Path, args: &NormalizeArgs) -> PathBuf {
    use std::ffi::OsStr;
    let stem = input.file_stem().unwrap_or_else(|| OsStr::new("export"));
    let mut name = stem.to_os_string();
    name.push(".normalized.");
    name.push(args.format.extension());
    args.out_dir.as_ref().map_or_else(
        || input.with_file_name(&name),
        |dir| dir.join(&name),
    )
}
