use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "wobble", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a scene and run frames against the recording backend.
    Run(RunArgs),
    /// Print the resolved layer order and the draw order of a scene.
    Order(OrderArgs),
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Number of frames to run.
    #[arg(long, default_value_t = 1)]
    frames: u32,

    /// Milliseconds per frame.
    #[arg(long, default_value_t = 16.0)]
    dt: f64,

    /// Also print every recorded backend call.
    #[arg(long)]
    calls: bool,
}

#[derive(Parser, Debug)]
struct OrderArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(serde::Serialize)]
struct RunReport {
    frames: u32,
    total: wobble::BatchStats,
    per_frame: Vec<wobble::BatchStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    calls: Option<Vec<wobble::RenderCall>>,
}

#[derive(serde::Serialize)]
struct OrderReport {
    layers: Vec<String>,
    draw_order: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Run(args) => cmd_run(args),
        Command::Order(args) => cmd_order(args),
    }
}

fn build_scene(path: &Path) -> anyhow::Result<wobble::BuiltScene> {
    let def = wobble::SceneDef::from_path(path)
        .with_context(|| format!("load scene '{}'", path.display()))?;
    let built = def.build().with_context(|| "build scene")?;
    Ok(built)
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    if !args.dt.is_finite() || args.dt < 0.0 {
        anyhow::bail!("--dt must be finite and >= 0, got {}", args.dt);
    }
    let mut built = build_scene(&args.in_path)?;
    let mut backend = wobble::RecordingBackend::new();

    let mut total = wobble::BatchStats::default();
    let mut per_frame = Vec::with_capacity(args.frames as usize);
    for frame in 0..args.frames {
        let stats = built
            .ctx
            .frame(args.dt, &mut backend)
            .with_context(|| format!("run frame {frame}"))?;
        total += stats;
        per_frame.push(stats);
    }

    let report = RunReport {
        frames: args.frames,
        total,
        per_frame,
        calls: args.calls.then(|| backend.take_calls()),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn cmd_order(args: OrderArgs) -> anyhow::Result<()> {
    let built = build_scene(&args.in_path)?;
    let ctx = &built.ctx;

    let layers = ctx
        .layers
        .resolved_order()
        .into_iter()
        .map(|id| ctx.layers.name(id).unwrap_or("?").to_owned())
        .collect();
    let draw_order = ctx
        .scene
        .draw_order(&ctx.layers)?
        .into_iter()
        .map(|id| {
            ctx.scene
                .get(id)
                .and_then(|d| d.name.clone())
                .unwrap_or_else(|| format!("#{}", id.index()))
        })
        .collect();

    let report = OrderReport { layers, draw_order };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
