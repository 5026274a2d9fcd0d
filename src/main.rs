//! # dossier CLI entry point
//!
//! Parses command-line arguments, loads the configuration and templates
//! once, and dispatches to the command handlers.

use anyhow::{bail, Context, Result};
use chrono::{Datelike, Local};
use clap::{Args, Parser, Subcommand};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use dossier::records::{
    build_checklist, calculate_stats, ChecklistEntry, ImmediateEvent, MonthlyBasicInfo,
};
use dossier::report::{generate_summary, parse_report_file};
use dossier::sheet::import_workbook;
use dossier::template::{
    build_immediate_event_document, event_file_name, find_named_tags, find_numbered_tokens,
    render_checklist, render_daily_log, render_monthly_report, DocxPackage, MonthlyReportInputs,
    PeriodSource,
};
use dossier::{
    ArchivePeriod, Config, DailyLog, ExtractFormat, RecordBundle, ReportStatistics, SheetKind,
    TemplateSet,
};

#[derive(Parser, Debug)]
#[command(name = "dossier", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract statistics from a situation report (.docx or .txt).
    Extract {
        file: PathBuf,

        #[arg(long, value_enum, default_value_t = ExtractFormat::Json)]
        format: ExtractFormat,
    },

    /// Fill the numbered monthly work report template.
    FillReport(FillReportArgs),

    /// Render one daily inspection log.
    FillLog(FillLogArgs),

    /// Fill the monthly checklist template.
    FillChecklist(FillChecklistArgs),

    /// Write the report for one immediate-inspection event.
    FillEvent {
        /// Event record (JSON).
        event: PathBuf,

        /// Output file; named after the event date, type and title when absent.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Map the first worksheet of a spreadsheet export to records (JSON).
    ImportSheet {
        file: PathBuf,

        /// Original file name used for kind detection.
        #[arg(long)]
        name: Option<String>,

        /// Skip detection and map as this kind.
        #[arg(long, value_enum)]
        kind: Option<SheetKind>,
    },

    /// List the numbered tokens and named tags in a template.
    Inspect { template: PathBuf },

    /// Write a default configuration file.
    InitConfig,
}

#[derive(Args, Debug)]
struct FillReportArgs {
    /// Report period, YYYY-MM.
    #[arg(long)]
    period: String,

    #[arg(long)]
    prison: Option<String>,

    /// Day of month printed on the signature line (defaults to today).
    #[arg(long)]
    day: Option<u32>,

    /// Template to use instead of the configured one.
    #[arg(long)]
    template: Option<PathBuf>,

    /// Manually entered monthly record (JSON).
    #[arg(long)]
    manual: Option<PathBuf>,

    /// Previously extracted statistics (JSON).
    #[arg(long, conflicts_with = "report")]
    parsed: Option<PathBuf>,

    /// Situation report to extract statistics from.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Inspection records of the month (JSON).
    #[arg(long)]
    records: Option<PathBuf>,

    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct FillLogArgs {
    /// Daily log (JSON).
    #[arg(long)]
    log: PathBuf,

    #[arg(long)]
    template: Option<PathBuf>,

    /// Weekly and monthly records for same-day notes (JSON).
    #[arg(long)]
    records: Option<PathBuf>,

    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct FillChecklistArgs {
    /// Checklist period, YYYY-MM.
    #[arg(long)]
    period: String,

    #[arg(long)]
    prison: Option<String>,

    /// Edited checklist entries (JSON); derived from records when absent.
    #[arg(long, conflicts_with = "records")]
    entries: Option<PathBuf>,

    #[arg(long)]
    records: Option<PathBuf>,

    #[arg(long)]
    template: Option<PathBuf>,

    #[arg(short, long)]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

fn init_config() -> Result<()> {
    Config::init_default()?;
    if let Some(path) = Config::get_config_path() {
        println!("Wrote default configuration to {}", path.display());
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Config::load(),
    }
}

/// Configuration and templates for the commands that write documents.
fn load_workspace(path: Option<&Path>) -> Result<(Config, TemplateSet)> {
    let config = load_config(path)?;
    let templates = TemplateSet::load(&config.templates).context("failed to load templates")?;
    Ok((config, templates))
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Extract { file, format } => {
            let stats = parse_report_file(&file).await?;
            match format {
                ExtractFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
                ExtractFormat::Summary => println!("{}", generate_summary(&stats)?),
            }
        }
        Commands::FillReport(args) => {
            let (config, templates) = load_workspace(config_path)?;
            fill_report(&config, &templates, args).await?
        }
        Commands::FillLog(args) => {
            let (config, templates) = load_workspace(config_path)?;
            fill_log(&config, &templates, args)?
        }
        Commands::FillChecklist(args) => {
            let (config, templates) = load_workspace(config_path)?;
            fill_checklist(&config, &templates, args)?
        }
        Commands::FillEvent { event, output } => {
            let config = load_config(config_path)?;
            fill_event(&config, &event, output.as_deref())?
        }
        Commands::ImportSheet { file, name, kind } => {
            let import = import_workbook(&file, name.as_deref(), kind)?;
            println!("{}", serde_json::to_string_pretty(&import)?);
        }
        Commands::Inspect { template } => inspect(&template)?,
        // Runs without reading any existing configuration.
        Commands::InitConfig => init_config()?,
    }
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid JSON in {}", path.display()))
}

fn read_records(path: Option<&Path>) -> Result<RecordBundle> {
    path.map_or_else(|| Ok(RecordBundle::default()), read_json)
}

/// The template given on the command line, else the configured one.
fn choose_template(given: Option<&Path>, configured: Option<&[u8]>) -> Result<Option<Vec<u8>>> {
    match given {
        Some(path) => Ok(Some(DocxPackage::open(path)?.into_bytes()?)),
        None => Ok(configured.map(<[u8]>::to_vec)),
    }
}

fn parse_period(config: &Config, prison: Option<&str>, period: &str) -> Result<ArchivePeriod> {
    let prison_name = config.prison_name(prison);
    match ArchivePeriod::from_report_month(&prison_name, period) {
        Some(period) => Ok(period),
        None => bail!("Invalid period \"{period}\". Expected YYYY-MM"),
    }
}

fn write_output(config: &Config, output: &Path, bytes: &[u8]) -> Result<()> {
    let path = config.output_path(output);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "wrote document");
    Ok(())
}

async fn fill_report(config: &Config, templates: &TemplateSet, args: FillReportArgs) -> Result<()> {
    let template = choose_template(args.template.as_deref(), templates.report())?;

    let period = parse_period(config, args.prison.as_deref(), &args.period)?;
    let manual: Option<MonthlyBasicInfo> = args.manual.as_deref().map(read_json).transpose()?;
    let parsed: Option<ReportStatistics> = match (&args.parsed, &args.report) {
        (Some(path), _) => Some(read_json(path)?),
        (None, Some(path)) => Some(parse_report_file(path).await?),
        (None, None) => None,
    };
    let records = read_records(args.records.as_deref())?.for_period(&period);
    let activity = args.records.as_ref().map(|_| {
        calculate_stats(
            &records.daily_logs,
            &records.weekly_records,
            &records.monthly_records,
        )
    });

    let source = PeriodSource {
        period,
        day: args.day.unwrap_or_else(|| Local::now().day()),
    };
    let inputs = MonthlyReportInputs::new(source, manual, parsed, activity)?;

    let bytes = render_monthly_report(template.as_deref(), &inputs, &records)?;
    write_output(config, &args.output, &bytes)
}

fn fill_log(config: &Config, templates: &TemplateSet, args: FillLogArgs) -> Result<()> {
    let template = choose_template(args.template.as_deref(), templates.daily_log())?;
    let log: DailyLog = read_json(&args.log)?;
    let records = read_records(args.records.as_deref())?;

    let bytes = render_daily_log(
        template.as_deref(),
        &log,
        &records.weekly_records,
        &records.monthly_records,
    )?;
    write_output(config, &args.output, &bytes)
}

fn fill_checklist(config: &Config, templates: &TemplateSet, args: FillChecklistArgs) -> Result<()> {
    let template = choose_template(args.template.as_deref(), templates.checklist())?;

    let period = parse_period(config, args.prison.as_deref(), &args.period)?;
    let records = read_records(args.records.as_deref())?.for_period(&period);
    let entries: Vec<ChecklistEntry> = match &args.entries {
        Some(path) => read_json(path)?,
        None => build_checklist(
            &records.daily_logs,
            &records.weekly_records,
            &records.monthly_records,
            &records.immediate_events,
        ),
    };

    let bytes = render_checklist(template.as_deref(), &period, &entries, &records)?;
    write_output(config, &args.output, &bytes)
}

fn fill_event(config: &Config, path: &Path, output: Option<&Path>) -> Result<()> {
    let mut event: ImmediateEvent = read_json(path)?;
    if event.prison_name.trim().is_empty() {
        event.prison_name = config.prison_name(None);
    }

    let bytes = build_immediate_event_document(&event)?;
    let output = output.map_or_else(|| PathBuf::from(event_file_name(&event)), Path::to_path_buf);
    write_output(config, &output, &bytes)
}

fn inspect(path: &Path) -> Result<()> {
    let package = DocxPackage::open(path)?;
    let tokens = find_numbered_tokens(&package.document_xml()?);
    let tags = find_named_tags(&package.into_bytes()?)?;

    println!("Numbered tokens ({}):", tokens.len());
    for index in &tokens {
        println!("  {{{index}}}");
    }
    let named: Vec<_> = tags
        .iter()
        .filter(|tag| tag.parse::<u32>().is_err())
        .collect();
    println!("Named tags ({}):", named.len());
    for tag in named {
        println!("  {{{tag}}}");
    }
    Ok(())
}
