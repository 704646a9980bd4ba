//! fruit-catcher CLI: replay recorded camera frames and scripted window input
//! through the game and print a JSON report of the session.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use log::LevelFilter;

use fruit_catcher::{
    run, AssetStore, CanvasPresenter, GameEngine, GameParams, GameRng, ImageSequence,
    LogPresenter, Presenter, RunOptions, ScriptedInput, Session,
};

use fruit_catcher::core::{LogSettings, ModuleLevel};

#[cfg(not(feature = "tracing"))]
use fruit_catcher::core::init;
#[cfg(feature = "tracing")]
use fruit_catcher::core::init_tracing;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser, Debug)]
#[command(name = "fruit-catcher")]
#[command(about = "Catch falling fruit by tilting two colored markers in front of a camera")]
#[command(version)]
struct Cli {
    /// Directory of camera frames, played back in file-name order.
    #[arg(long)]
    frames: PathBuf,

    /// Asset directory; omit it for a headless run that only logs the overlay text.
    ///
    /// Holds background.jpg, basket.png, font.ttf and the fruit sprites. When
    /// given, every file must be present and readable or the run does not start.
    #[arg(long)]
    assets: Option<PathBuf>,

    /// JSON input script: `[{"tick": 0, "event": {"pointer_click": {"x": 1, "y": 2}}}]`.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Write composited game frames (and camera previews) here.
    #[arg(long, requires = "assets")]
    render_dir: Option<PathBuf>,

    /// Write the per-marker masks of every tick here.
    #[arg(long)]
    dump_masks: Option<PathBuf>,

    /// Seed for fruit spawning; random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Advance the game clock by this much per frame instead of using wall time.
    #[arg(long)]
    frame_interval_ms: Option<u64>,

    #[arg(long, default_value = "info")]
    log_level: LevelFilter,

    /// Per-module level, e.g. `tracker=warn`. Repeatable.
    #[arg(long = "log-module", value_name = "MODULE=LEVEL")]
    log_modules: Vec<ModuleLevel>,

    /// Emit logs as JSON lines.
    #[cfg(feature = "tracing")]
    #[arg(long)]
    json_logs: bool,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();

    let settings = cli
        .log_modules
        .iter()
        .cloned()
        .fold(LogSettings::new(cli.log_level), LogSettings::with_module);

    #[cfg(not(feature = "tracing"))]
    init(settings)?;

    #[cfg(feature = "tracing")]
    init_tracing(&settings, cli.json_logs);

    let report = run_cli(&cli)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run_cli(cli: &Cli) -> CliResult<fruit_catcher::RunReport> {
    let params = GameParams::default();

    // Startup preconditions first: assets, then frames.
    let mut presenter: Box<dyn Presenter> = match (&cli.render_dir, &cli.assets) {
        (Some(out), Some(assets)) => {
            let store = AssetStore::load(assets)?;
            let canvas = CanvasPresenter::new(&store, &params, out)?.with_camera(true);
            Box::new((LogPresenter::default(), canvas))
        }
        (None, Some(assets)) => {
            AssetStore::load(assets)?;
            Box::new(LogPresenter::default())
        }
        _ => Box::new(LogPresenter::default()),
    };
    let mut frames = ImageSequence::open(&cli.frames)?;
    let mut input = match &cli.script {
        Some(path) => ScriptedInput::load_json(path)?,
        None => ScriptedInput::empty(),
    };

    let rng = cli.seed.map_or_else(GameRng::from_entropy, GameRng::new);
    let mut session = Session::new(GameEngine::new(params, rng));
    let opts = RunOptions {
        frame_interval: cli.frame_interval_ms.map(Duration::from_millis),
        dump_masks: cli.dump_masks.clone(),
    };

    Ok(run(
        &mut session,
        &mut frames,
        &mut input,
        &mut presenter,
        &opts,
    )?)
}
