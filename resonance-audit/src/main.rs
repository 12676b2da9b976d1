mod reports;
mod source;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::process::ExitCode;

use resonance_engine::AuditEngine;
use source::FileSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Colored console summary
    Text,
    /// Markdown document with tables
    Markdown,
    /// Full structured report
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "resonance-audit", version)]
#[command(about = "Audit a card catalog against resonance allocation rules")]
struct Args {
    /// Catalog JSON file (array of card records)
    #[arg(long)]
    catalog: PathBuf,

    /// Audit configuration JSON; built-in defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,

    /// Previous round's catalog, to include a change summary
    #[arg(long)]
    previous: Option<PathBuf>,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(false) => ExitCode::SUCCESS,
        Ok(true) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

/// Run the audit and write the report; `Ok(true)` means findings exist.
fn run(args: &Args) -> Result<bool> {
    let engine = AuditEngine::new(FileSource {
        catalog: args.catalog.clone(),
        config: args.config.clone(),
        previous: args.previous.clone(),
    });
    let report = engine.audit().context("audit could not start")?;

    if args.output.is_some() || args.format != ReportFormat::Text {
        colored::control::set_override(false);
    }

    let mut output_target = OutputTarget::new(args.output.clone())?;
    match args.format {
        ReportFormat::Text => reports::emit_text(&mut output_target, &report)?,
        ReportFormat::Markdown => reports::emit_markdown(&mut output_target, &report)?,
        ReportFormat::Json => reports::emit_json(&mut output_target, &report)?,
    }
    output_target.flush_inner()?;

    Ok(report.has_violations())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
