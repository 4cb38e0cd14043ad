use std::fs;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use foundation::time::Time;
use scene::{Basemap, CameraOptions, HeadlessBasemap, Interaction, ViewState};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use viewer::{AppContext, ViewerConfig, ViewerError};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Demo dataset shipped with the web app, resolved from this crate so the
/// default works from any working directory.
const DEFAULT_DATA: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../viewer_web/assets/buildings.geojson"
);

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless building vacancy viewer")]
struct Args {
    /// GeoJSON FeatureCollection with Yr_Comp and vacancy_ap properties
    #[arg(long, default_value = DEFAULT_DATA)]
    data: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize the dataset: loaded and rejected features, buildings per color
    Inspect,

    /// Write render-ready layer data as JSON
    Export {
        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Camera pose as ViewState JSON, e.g. '{"longitude":35.5,"latitude":33.9,"zoom":15}'
        #[arg(long)]
        view_state: Option<String>,

        #[arg(long)]
        pretty: bool,
    },

    /// Replay recorded input (one JSON step per line) and print the basemap
    /// camera after each step
    Replay {
        /// JSON lines file; `-` reads stdin
        input: PathBuf,

        /// Seconds between steps
        #[arg(long, default_value_t = 1.0 / 60.0)]
        dt: f64,

        /// Start with the basemap still loading; a `{"basemapLoaded":true}`
        /// step finishes the load
        #[arg(long)]
        defer_load: bool,
    },

    /// Print the effective configuration
    Config,
}

/// One line of a replay file.
#[derive(Debug, PartialEq, Deserialize)]
#[serde(untagged)]
enum ReplayStep {
    Input(Interaction),
    Pose {
        #[serde(rename = "viewState")]
        view_state: ViewState,
    },
    BasemapLoaded {
        #[serde(rename = "basemapLoaded")]
        basemap_loaded: bool,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplayRecord {
    line: usize,
    frame: u64,
    view_state: ViewState,
    camera: CameraOptions,
    basemap_loaded: bool,
    jumps: u64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> CliResult<()> {
    let config = ViewerConfig::from_env()?;
    if let Err(ViewerError::MissingAccessToken) = config.access_token() {
        warn!("no basemap access token set; headless run continues without tiles");
    }

    match args.command {
        Command::Inspect => cmd_inspect(config, &args.data),
        Command::Export {
            out,
            view_state,
            pretty,
        } => cmd_export(config, &args.data, out.as_deref(), view_state.as_deref(), pretty),
        Command::Replay {
            input,
            dt,
            defer_load,
        } => cmd_replay(config, &args.data, &input, dt, defer_load),
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn open_context(
    config: ViewerConfig,
    data: &Path,
    loaded: bool,
) -> CliResult<AppContext<HeadlessBasemap>> {
    let options = config.basemap_options();
    let basemap = if loaded {
        HeadlessBasemap::loaded(options)
    } else {
        HeadlessBasemap::new(options)
    };
    let mut app = AppContext::new(config, basemap)?;
    app.load_file(data)?;
    Ok(app)
}

fn cmd_inspect(config: ViewerConfig, data: &Path) -> CliResult<()> {
    let app = open_context(config, data, true)?;
    let summary = app
        .summary()
        .ok_or_else(|| format!("no dataset loaded from {}", data.display()))?;
    println!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

fn cmd_export(
    config: ViewerConfig,
    data: &Path,
    out: Option<&Path>,
    view_state: Option<&str>,
    pretty: bool,
) -> CliResult<()> {
    let mut app = open_context(config, data, true)?;
    if let Some(json) = view_state {
        let pose: ViewState = serde_json::from_str(json)?;
        app.set_view_state(pose)?;
    }

    let layer_data = app.layer_data();
    let text = if pretty {
        serde_json::to_string_pretty(&layer_data)?
    } else {
        serde_json::to_string(&layer_data)?
    };

    match out {
        Some(path) => {
            fs::write(path, text.as_bytes())
                .map_err(|e| format!("write {}: {e}", path.display()))?;
            info!(
                "wrote {} buildings to {}",
                layer_data.buildings.buildings.len(),
                path.display()
            );
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn cmd_replay(
    config: ViewerConfig,
    data: &Path,
    input: &Path,
    dt: f64,
    defer_load: bool,
) -> CliResult<()> {
    let mut app = open_context(config, data, !defer_load)?;

    let reader: Box<dyn BufRead> = if input == Path::new("-") {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let file =
            fs::File::open(input).map_err(|e| format!("open {}: {e}", input.display()))?;
        Box::new(BufReader::new(file))
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let steps = replay(&mut app, reader, &mut out, dt)?;
    info!(steps, "replay finished");
    Ok(())
}

/// Applies each step to `app` and writes one `ReplayRecord` JSON line per
/// step. Blank lines are skipped. Returns the number of steps applied.
fn replay(
    app: &mut AppContext<HeadlessBasemap>,
    reader: impl BufRead,
    out: &mut impl Write,
    dt: f64,
) -> CliResult<usize> {
    let mut steps = 0;
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = i + 1;
        if line.trim().is_empty() {
            continue;
        }
        let step: ReplayStep = serde_json::from_str(&line)
            .map_err(|e| format!("line {line_no}: {e}"))?;

        match step {
            ReplayStep::Input(interaction) => {
                app.dispatch_at(Time(line_no as f64 * dt), interaction);
            }
            ReplayStep::Pose { view_state } => {
                app.set_view_state(view_state)
                    .map_err(|e| format!("line {line_no}: {e}"))?;
            }
            ReplayStep::BasemapLoaded { basemap_loaded } => {
                if basemap_loaded {
                    app.basemap_mut().set_loaded();
                    app.basemap_loaded();
                }
            }
        }
        steps += 1;

        let record = ReplayRecord {
            line: line_no,
            frame: app.frame().index,
            view_state: *app.view_state(),
            camera: app.basemap().camera(),
            basemap_loaded: app.basemap().is_loaded(),
            jumps: app.basemap().jump_count(),
        };
        serde_json::to_writer(&mut *out, &record)?;
        out.write_all(b"\n")?;
    }
    Ok(steps)
}
