use std::{
    fs::File,
    io::{BufWriter, Write as _},
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "pagewright", version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// Log verbosity (written to stderr).
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,

    /// Override the tag that marks slot elements.
    #[arg(long, global = true)]
    slot_tag: Option<String>,

    /// Override the maximum page nesting depth.
    #[arg(long, global = true)]
    max_depth: Option<usize>,

    /// Override how untagged page content picks its slot.
    #[arg(long, global = true, value_enum)]
    default_slot: Option<DefaultSlotChoice>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose a page into its layout and print the result as JSON.
    Resolve(ResolveArgs),
    /// Print the absolute URL of a page.
    Url(UrlArgs),
    /// Print `url<TAB>title` for every page.
    Routes(RoutesArgs),
    /// Check whether a page may be moved under a new parent.
    CheckParent(CheckParentArgs),
}

#[derive(Parser, Debug)]
struct ResolveArgs {
    /// Input snapshot JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Page to resolve; defaults to the snapshot's current page.
    #[arg(long)]
    page: Option<String>,

    /// Output JSON path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Exit with failure when required slots are empty.
    #[arg(long)]
    strict: bool,
}

#[derive(Parser, Debug)]
struct UrlArgs {
    /// Input snapshot JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Page id; defaults to the snapshot's current page.
    #[arg(long)]
    page: Option<String>,
}

#[derive(Parser, Debug)]
struct RoutesArgs {
    /// Input snapshot JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct CheckParentArgs {
    /// Input snapshot JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Page being moved.
    #[arg(long)]
    page: String,

    /// Candidate parent; omit to move the page to the top level.
    #[arg(long)]
    parent: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DefaultSlotChoice {
    FirstUnfilledRequired,
    FirstRequired,
}

impl From<DefaultSlotChoice> for pagewright::DefaultSlotPolicy {
    fn from(value: DefaultSlotChoice) -> Self {
        match value {
            DefaultSlotChoice::FirstUnfilledRequired => Self::FirstUnfilledRequired,
            DefaultSlotChoice::FirstRequired => Self::FirstRequired,
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::from(cli.global.log_level))
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Resolve(args) => cmd_resolve(&cli.global, args),
        Command::Url(args) => cmd_url(&cli.global, args),
        Command::Routes(args) => cmd_routes(&cli.global, args),
        Command::CheckParent(args) => cmd_check_parent(&cli.global, args),
    }
}

fn read_snapshot(path: &Path, global: &GlobalArgs) -> anyhow::Result<pagewright::Snapshot> {
    let mut snap = pagewright::Snapshot::from_path(path)
        .with_context(|| format!("load snapshot '{}'", path.display()))?;
    if let Some(tag) = &global.slot_tag {
        snap.options.slot_tag = tag.clone();
    }
    if let Some(max) = global.max_depth {
        snap.options.max_nesting_depth = max;
    }
    if let Some(choice) = global.default_slot {
        snap.options.default_slot = choice.into();
    }
    snap.validate()
        .with_context(|| format!("validate snapshot '{}'", path.display()))?;
    Ok(snap)
}

fn page_or_current(snap: &pagewright::Snapshot, page: Option<String>) -> anyhow::Result<String> {
    page.or_else(|| snap.current_page_id.clone())
        .context("no --page given and the snapshot has no currentPageId")
}

fn cmd_resolve(global: &GlobalArgs, args: ResolveArgs) -> anyhow::Result<ExitCode> {
    let snap = read_snapshot(&args.in_path, global)?;
    let page_id = page_or_current(&snap, args.page)?;
    let resolution = snap.resolve_page(&page_id)?;

    for err in &resolution.validation_errors {
        tracing::warn!(slot = %err.slot_name, "{}", err.message);
    }

    match &args.out {
        Some(out) => {
            if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            let f = File::create(out)
                .with_context(|| format!("create output '{}'", out.display()))?;
            let mut w = BufWriter::new(f);
            serde_json::to_writer_pretty(&mut w, &resolution)
                .with_context(|| format!("write resolution '{}'", out.display()))?;
            w.flush()
                .with_context(|| format!("write resolution '{}'", out.display()))?;
            eprintln!("wrote {}", out.display());
        }
        None => {
            let json = serde_json::to_string_pretty(&resolution)
                .context("serialize resolution")?;
            println!("{json}");
        }
    }

    if args.strict && !resolution.is_publishable() {
        eprintln!(
            "{} required slot(s) empty",
            resolution.validation_errors.len()
        );
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_url(global: &GlobalArgs, args: UrlArgs) -> anyhow::Result<ExitCode> {
    let snap = read_snapshot(&args.in_path, global)?;
    let page_id = page_or_current(&snap, args.page)?;
    println!("{}", snap.page_url(&page_id)?);
    Ok(ExitCode::SUCCESS)
}

fn cmd_routes(global: &GlobalArgs, args: RoutesArgs) -> anyhow::Result<ExitCode> {
    let snap = read_snapshot(&args.in_path, global)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for route in snap.routes() {
        writeln!(out, "{}\t{}", route.url, route.title).context("write routes")?;
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_check_parent(global: &GlobalArgs, args: CheckParentArgs) -> anyhow::Result<ExitCode> {
    let snap = read_snapshot(&args.in_path, global)?;
    match snap.check_parent(&args.page, args.parent.as_deref()) {
        Ok(()) => {
            println!("ok");
            Ok(ExitCode::SUCCESS)
        }
        Err(pagewright::PagewrightError::Routing(reason)) => {
            println!("refused: {reason}");
            Ok(ExitCode::FAILURE)
        }
        Err(err) => Err(err.into()),
    }
}
