//! reportfill CLI - fill weekly report templates and combine the results
//! into a single PDF.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use reportfill_core::assets::load_signature;
use reportfill_core::document::InlineImage;
use reportfill_core::fill::fill_report;
use reportfill_core::record::{load_records, WeeklyRecord};
use reportfill_docx::DocxPackage;
use reportfill_pdf::{combine_reports, PdfConverter};

#[derive(Parser)]
#[command(
    name = "reportfill",
    version,
    about = "Fill weekly report templates and combine them into a PDF"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill one output document per weekly record
    Fill(FillArgs),
    /// Convert the filled documents into one combined PDF
    Combine(CombineArgs),
}

#[derive(Args)]
struct FillArgs {
    /// Template document to fill
    #[arg(long, default_value = "data/Daily Report Template.docx")]
    template: PathBuf,

    /// JSON array of weekly records
    #[arg(long, default_value = "data/weekly_data.json")]
    data: PathBuf,

    /// Directory for the filled documents
    #[arg(long, default_value = "Weekly Reports")]
    out_dir: PathBuf,

    /// Signature image placed in the trainee signature cell
    #[arg(long, default_value = "data/signature.png")]
    signature: PathBuf,

    /// Process records one at a time instead of in parallel
    #[arg(long)]
    sequential: bool,
}

#[derive(Args)]
struct CombineArgs {
    /// Directory containing the filled documents
    #[arg(long, default_value = "Weekly Reports")]
    input_dir: PathBuf,

    /// Combined PDF output path
    #[arg(long, default_value = "Combined_Weekly_Reports.pdf")]
    output: PathBuf,

    /// DOCX-to-PDF converter binary
    #[arg(long, default_value = "soffice")]
    converter: String,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Fill(args) => cmd_fill(&args),
        Commands::Combine(args) => cmd_combine(&args),
    }
}

fn cmd_fill(args: &FillArgs) -> Result<()> {
    if !args.template.exists() {
        anyhow::bail!("Template not found: {}", args.template.display());
    }
    let records = load_records(&args.data).context("loading weekly records")?;
    if records.is_empty() {
        println!("{}", "No weekly records to fill.".yellow());
        return Ok(());
    }

    // A missing or undecodable signature degrades to a fill without the
    // image rather than failing the whole batch.
    let signature = match load_signature(&args.signature) {
        Ok(image) => Some(image),
        Err(e) => {
            eprintln!("{} {e}", "warning:".yellow().bold());
            None
        }
    };

    std::fs::create_dir_all(&args.out_dir)?;

    let progress = ProgressBar::new(records.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:30.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let fill_one = |record: &WeeklyRecord| {
        let outcome = fill_record(&args.template, &args.out_dir, record, signature.as_ref());
        progress.inc(1);
        (record.week_no.clone(), outcome)
    };
    let outcomes: Vec<(String, Result<PathBuf>)> = if args.sequential {
        records.iter().map(fill_one).collect()
    } else {
        records.par_iter().map(fill_one).collect()
    };
    progress.finish_and_clear();

    let mut failed = 0usize;
    for (week_no, outcome) in &outcomes {
        match outcome {
            Ok(path) => println!("{} {}", "✓".green(), path.display()),
            Err(e) => {
                failed += 1;
                eprintln!("{} week {week_no}: {e:#}", "✗".red());
            }
        }
    }
    let succeeded = outcomes.len() - failed;
    println!(
        "{} {succeeded} filled, {failed} failed",
        "Summary:".bold()
    );
    if succeeded == 0 {
        anyhow::bail!("no records were filled successfully");
    }
    Ok(())
}

/// Fill one record against a fresh template instance and save it.
///
/// Every record gets its own freshly parsed package, so records are
/// independent and safe to process in parallel.
fn fill_record(
    template: &Path,
    out_dir: &Path,
    record: &WeeklyRecord,
    signature: Option<&InlineImage>,
) -> Result<PathBuf> {
    let mut package = DocxPackage::open(template)?;
    fill_report(&mut package.document, record, signature);
    let path = out_dir.join(record.output_file_name());
    package.save(&path)?;
    log::debug!("Filled week {} -> {}", record.week_no, path.display());
    Ok(path)
}

fn cmd_combine(args: &CombineArgs) -> Result<()> {
    let converter = PdfConverter::new(&args.converter);
    let summary = combine_reports(&args.input_dir, &args.output, &converter)
        .context("combining reports")?;

    println!(
        "{} {} of {} converted, {} failed",
        "Summary:".bold(),
        summary.converted,
        summary.total,
        summary.failed
    );
    println!("{} {}", "✓".green(), summary.output.display());
    Ok(())
}
