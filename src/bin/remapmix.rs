use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "remapmix", version)]
struct Cli {
    /// Default log level when RUST_LOG is unset.
    #[arg(long, value_enum, default_value_t = LogLevel::Warn, global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the canvas a layout negotiates to, as JSON.
    Negotiate(LayoutArgs),
    /// Composite one tick of a layout's still frames into a PNG.
    Frame(FrameArgs),
    /// Write an identity map of the given size.
    IdentityMap(IdentityMapArgs),
}

#[derive(Parser, Debug)]
struct LayoutArgs {
    /// Layout JSON.
    #[arg(long)]
    layout: PathBuf,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Layout JSON.
    #[arg(long)]
    layout: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct IdentityMapArgs {
    #[arg(long)]
    width: u32,

    #[arg(long)]
    height: u32,

    /// Output map JSON path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::builder()
        .with_default_directive(cli.log_level.as_directive().parse()?)
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.cmd {
        Command::Negotiate(args) => cmd_negotiate(args),
        Command::Frame(args) => cmd_frame(args),
        Command::IdentityMap(args) => cmd_identity_map(args),
    }
}

fn prepare(layout: &Path) -> anyhow::Result<remapmix::PreparedLayout> {
    let cfg = remapmix::LayoutConfig::load(layout)?;
    let root = layout.parent().unwrap_or_else(|| Path::new("."));
    Ok(cfg.prepare(root)?)
}

fn cmd_negotiate(args: LayoutArgs) -> anyhow::Result<()> {
    let prepared = prepare(&args.layout)?;
    let canvas = prepared.session.negotiate();

    let streams: Vec<serde_json::Value> = prepared
        .ids
        .iter()
        .filter_map(|&id| prepared.session.stream(id).map(|d| (id, d)))
        .map(|(id, d)| {
            serde_json::json!({
                "id": id.to_string(),
                "name": d.name(),
                "offset": d.offset(),
                "native_size": d.native_size(),
                "footprint": d.footprint(),
            })
        })
        .collect();

    let report = serde_json::json!({ "canvas": canvas, "streams": streams });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let prepared = prepare(&args.layout)?;
    let frame = prepared.render()?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    frame
        .to_rgba_image()?
        .save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_identity_map(args: IdentityMapArgs) -> anyhow::Result<()> {
    let map = remapmix::TransformMap::identity(args.width, args.height)?;
    map.save(&args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}
