use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use pdf_table_extractor::{
    DEFAULT_MIN_HEADER_COLS, DEFAULT_MIN_TABLE_ROWS, DEFAULT_ROW_TOLERANCE, ExtractOptions,
    ExtractionReport, PageSelection, Progress, extract_pdf_to_xlsx,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "pdf2xlsx",
    version,
    about = "Detect tables in text PDFs and write them to an xlsx workbook"
)]
struct Cli {
    /// Input PDF path.
    pdf_file: PathBuf,

    /// Output workbook path. Defaults to <input stem>_tables.xlsx next to the input.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Vertical distance within which spans are clustered into one row.
    #[arg(long, default_value_t = DEFAULT_ROW_TOLERANCE)]
    tolerance: f64,

    /// Cells a row needs to be accepted as a strict-mode header.
    #[arg(long, default_value_t = DEFAULT_MIN_HEADER_COLS)]
    min_header_cols: usize,

    /// Smallest table kept, header included.
    #[arg(long, default_value_t = DEFAULT_MIN_TABLE_ROWS)]
    min_table_rows: usize,

    /// Page selection like 1-3,5.
    #[arg(long)]
    pages: Option<String>,

    /// Print the extraction report as JSON when done.
    #[arg(long)]
    json: bool,
}

fn parse_options(cli: &Cli) -> Result<ExtractOptions> {
    let pages = cli
        .pages
        .as_deref()
        .map(PageSelection::from_str)
        .transpose()
        .map_err(|error| anyhow!("invalid page selection: {error}"))
        .context("failed to parse --pages")?;

    let options = ExtractOptions {
        row_tolerance: cli.tolerance,
        min_header_cols: cli.min_header_cols,
        min_table_rows: cli.min_table_rows,
        pages,
    };
    options.validate()?;
    Ok(options)
}

fn print_progress(event: &Progress) {
    match event {
        Progress::PageStarted { page, total } => {
            println!("Processing page {page} of {total}...");
        }
        Progress::PageEmpty { .. } => println!("No text extracted from page."),
        Progress::PageFailed { page, message } => {
            println!("Could not read page {page}: {message}");
        }
        Progress::PageFinished {
            page,
            tables,
            method,
        } => {
            if let Some(method) = method {
                println!("Found tables using {method} method.");
                println!("Found {tables} table(s) on page {page}");
            } else {
                println!("No tables detected on page {page}");
            }
        }
    }
}

fn print_summary(report: &ExtractionReport, json: bool) -> Result<()> {
    match &report.output {
        Some(output) => println!(
            "Tables saved to {}. Total tables extracted: {}",
            output.display(),
            report.table_count
        ),
        None => println!("No tables detected in the entire PDF."),
    }

    if json {
        let rendered =
            serde_json::to_string_pretty(report).context("failed to render JSON report")?;
        println!("{rendered}");
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let options = parse_options(cli)?;
    println!("Processing {}...", cli.pdf_file.display());

    let report = extract_pdf_to_xlsx(
        &cli.pdf_file,
        cli.output.as_deref(),
        &options,
        &mut print_progress,
    )
    .with_context(|| format!("failed to extract tables from '{}'", cli.pdf_file.display()))?;

    print_summary(&report, cli.json)
}

fn input_exists(path: &Path) -> bool {
    if path.exists() {
        return true;
    }
    println!("Error: {} not found.", path.display());
    false
}

fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pdf_table_extractor=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();
    if !input_exists(&cli.pdf_file) {
        return ExitCode::from(1);
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::from(1)
        }
    }
}
