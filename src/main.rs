//! PIE Atlas command line
//!
//! Validates the bundled datasets and runs the tree and map engines
//! headlessly, printing what a renderer would draw.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use pie_atlas::core::config::{config, set_config, AtlasConfig};
use pie_atlas::core::error::Result;
use pie_atlas::core::types::{bce_label, Date};
use pie_atlas::data::Dataset;
use pie_atlas::map::{MapScene, MigrationMapView, PlaybackSpeed};
use pie_atlas::tree::LanguageTreeView;

/// Indo-European atlas engines
#[derive(Parser, Debug)]
#[command(name = "pie-atlas")]
#[command(about = "Inspect the language tree and migration map engines from the terminal")]
struct Args {
    /// TOML file overriding the default tuning constants
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Read datasets from this directory instead of the embedded copies
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load and check every dataset
    Validate {
        /// Fail on structural problems instead of only reporting them
        #[arg(long)]
        strict: bool,
    },
    /// Print the laid-out visible language tree
    Tree {
        /// Expand every branch before laying out
        #[arg(long)]
        expand_all: bool,

        /// Container width in pixels
        #[arg(long, default_value_t = 1000.0)]
        width: f32,

        /// Emit JSON instead of an indented outline
        #[arg(long)]
        json: bool,
    },
    /// Show the map state at one date
    Map {
        /// Year, negative for BCE
        #[arg(long, allow_hyphen_values = true)]
        date: Date,

        #[arg(long)]
        json: bool,
    },
    /// Run the playback transport without a display
    Play {
        /// 0.5, 1 or 2
        #[arg(long, default_value_t = 1.0)]
        speed: f64,

        /// Simulated seconds to run
        #[arg(long, default_value_t = 10.0)]
        seconds: f64,

        /// Frames per simulated second
        #[arg(long, default_value_t = 60)]
        fps: u32,

        /// Start here instead of the beginning of the timeline
        #[arg(long, allow_hyphen_values = true)]
        from: Option<Date>,
    },
}

#[derive(Serialize)]
struct TreeRow {
    name: String,
    status: String,
    depth: usize,
    kind: String,
    x: f32,
    y: f32,
}

#[derive(Serialize)]
struct RouteRow {
    id: String,
    phase: String,
    progress: f64,
    points: usize,
}

#[derive(Serialize)]
struct MapReport {
    date: Date,
    label: String,
    cultures: Vec<String>,
    routes: Vec<RouteRow>,
    active_migrations: Vec<String>,
    ticker: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pie_atlas=info")),
        )
        .init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    if let Some(path) = &args.config {
        if set_config(AtlasConfig::load(path)?).is_err() {
            tracing::warn!("Config already installed, ignoring {}", path.display());
        }
    }
    let config = config();
    let dataset = match &args.data_dir {
        Some(dir) => Dataset::load_dir(dir)?,
        None => Dataset::embedded()?,
    };

    match args.command {
        Command::Validate { strict } => validate(&dataset, strict),
        Command::Tree {
            expand_all,
            width,
            json,
        } => print_tree(&dataset, config, expand_all, width, json),
        Command::Map { date, json } => print_map(&dataset, config, date, json),
        Command::Play {
            speed,
            seconds,
            fps,
            from,
        } => play(dataset, config, speed, seconds, fps, from),
    }
}

fn validate(dataset: &Dataset, strict: bool) -> Result<()> {
    let report = if strict {
        dataset.validate_strict()?
    } else {
        dataset.validate()
    };
    for warning in &report.warnings {
        println!("warning: {}", warning);
    }
    for error in &report.errors {
        println!("error: {}", error);
    }
    println!(
        "{} languages, {} migrations, {} cultures, {} timeline events: {}",
        dataset.language_tree.count(),
        dataset.migrations.len(),
        dataset.cultures.len(),
        dataset.timeline.events().len(),
        if report.is_clean() { "ok" } else { "problems found" }
    );
    Ok(())
}

fn print_tree(
    dataset: &Dataset,
    config: &AtlasConfig,
    expand_all: bool,
    width: f32,
    json: bool,
) -> Result<()> {
    let mut view = LanguageTreeView::new(&dataset.language_tree, config, width, 0.0);
    if expand_all {
        view.expand_all(0.0);
    }
    let model = view.model();
    let rows: Vec<TreeRow> = model
        .visible_nodes()
        .into_iter()
        .map(|id| {
            let node = model.tree.node(id);
            let pos = model.state.get(id).current.unwrap_or_default();
            TreeRow {
                name: node.name.clone(),
                status: node.status.to_string(),
                depth: node.depth,
                kind: format!("{:?}", model.kind(id)).to_lowercase(),
                x: pos.x,
                y: pos.y,
            }
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }
    for row in &rows {
        println!(
            "{:indent$}{} [{}, {}] ({:.0}, {:.0})",
            "",
            row.name,
            row.status,
            row.kind,
            row.x,
            row.y,
            indent = row.depth * 2
        );
    }
    println!("{} visible of {} languages", rows.len(), model.tree.len());
    Ok(())
}

fn map_report(scene: &MapScene) -> MapReport {
    MapReport {
        date: scene.date,
        label: bce_label(scene.date),
        cultures: scene.visible_cultures.clone(),
        routes: scene
            .route_states
            .iter()
            .map(|r| RouteRow {
                id: r.id.clone(),
                phase: format!("{:?}", r.phase).to_lowercase(),
                progress: r.progress,
                points: r.path.len(),
            })
            .collect(),
        active_migrations: scene
            .legend
            .routes
            .iter()
            .filter(|r| r.active)
            .map(|r| r.label.clone())
            .collect(),
        ticker: scene.ticker.as_ref().map(|e| e.label.clone()),
    }
}

fn print_map(dataset: &Dataset, config: &AtlasConfig, date: Date, json: bool) -> Result<()> {
    let date = date.clamp(config.map.min_date, config.map.max_date);
    let scene = MapScene::build(dataset, date, &config.map);
    let report = map_report(&scene);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    println!("{}", report.label);
    if let Some(ticker) = &report.ticker {
        println!("  latest: {}", ticker);
    }
    println!("cultures ({}):", report.cultures.len());
    for id in &report.cultures {
        println!("  {}", id);
    }
    println!("routes:");
    for route in &report.routes {
        println!(
            "  {:<24} {:<9} {:>5.1}%  {} pts",
            route.id,
            route.phase,
            route.progress * 100.0,
            route.points
        );
    }
    Ok(())
}

fn play(
    dataset: Dataset,
    config: &AtlasConfig,
    speed: f64,
    seconds: f64,
    fps: u32,
    from: Option<Date>,
) -> Result<()> {
    let speed = PlaybackSpeed::ALL
        .into_iter()
        .min_by(|a, b| {
            (a.multiplier() - speed)
                .abs()
                .total_cmp(&(b.multiplier() - speed).abs())
        })
        .unwrap_or_default();
    let fps = fps.max(1);
    let frame_ms = 1000.0 / fps as f64;

    let mut view = MigrationMapView::new(Arc::new(dataset), config, 1000.0, 600.0);
    if let Some(from) = from {
        view.seek(from);
    }
    view.set_speed(speed);
    view.play();

    tracing::info!(
        "Playing at {} ({} years/s) for {}s",
        speed,
        view.transport().years_per_second(),
        seconds
    );

    let frames = (seconds * fps as f64).ceil() as u64;
    let mut last_ticker: Option<String> = None;
    for frame in 0..=frames {
        let changed = view.on_frame(frame as f64 * frame_ms);
        let ticker = view.scene().ticker.as_ref().map(|e| e.label.clone());
        if changed && ticker != last_ticker {
            if let Some(label) = &ticker {
                println!("{:>10}  {}", bce_label(view.transport().display_date()), label);
            }
            last_ticker = ticker;
        }
        if !view.transport().is_playing() {
            break;
        }
    }

    println!(
        "{} at {}",
        view.transport().state(),
        bce_label(view.transport().display_date())
    );
    Ok(())
}
