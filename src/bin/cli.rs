//! tripmap CLI - Debug tool for pin dedup and marker reconciliation
//!
//! Usage:
//!   tripmap-cli pins <trips.json>
//!   tripmap-cli reconcile <trips.json> [--select-trip <id>] [--full-screen <id>]
//!
//! Loads a trip dataset (the map screen's JSON payload) and shows verbose
//! output of the dedup and reconciliation logic against a headless engine,
//! helping to understand which pins render and which camera moves fire.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tripmap::adapter::RecordingEngine;
use tripmap::view::{AutoCenterFlag, MapView, MemoryViewportStore};
use tripmap::{dedup_trips, parse_trip_date, EngineOp, LocationKey, MapConfig, Trip};

#[derive(Parser)]
#[command(name = "tripmap-cli")]
#[command(about = "Debug tool for pin dedup and marker reconciliation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose debug output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show location groups and the representative chosen for each pin
    Pins {
        /// JSON file containing an array of trips
        file: PathBuf,
    },

    /// Run a reconciliation pass against a headless engine and dump the
    /// resulting operations
    Reconcile {
        /// JSON file containing an array of trips
        file: PathBuf,

        /// Select a trip in sidebar mode
        #[arg(long)]
        select_trip: Option<u64>,

        /// Enter full-screen mode for a trip
        #[arg(long)]
        full_screen: Option<u64>,

        /// Select an activity of the focused trip
        #[arg(long)]
        select_activity: Option<u64>,

        /// Select a lodging of the focused trip
        #[arg(long)]
        select_lodging: Option<u64>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| writeln!(buf, "[{:5}] {}", record.level(), record.args()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Pins { file } => run_pins(&file, cli.verbose),
        Commands::Reconcile {
            file,
            select_trip,
            full_screen,
            select_activity,
            select_lodging,
        } => run_reconcile(
            &file,
            select_trip,
            full_screen,
            select_activity,
            select_lodging,
            cli.verbose,
        ),
    }
}

/// Load a trip array from a JSON file, dropping unmappable trips.
fn load_trips(file: &PathBuf, verbose: bool) -> Option<Vec<Trip>> {
    let handle = match File::open(file) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Error opening {}: {}", file.display(), e);
            return None;
        }
    };

    let trips: Vec<Trip> = match serde_json::from_reader(BufReader::new(handle)) {
        Ok(trips) => trips,
        Err(e) => {
            eprintln!("Error parsing {}: {}", file.display(), e);
            return None;
        }
    };

    let total = trips.len();
    let mapped: Vec<Trip> = trips.into_iter().filter(Trip::has_valid_point).collect();
    if verbose && mapped.len() < total {
        println!(
            "  Dropped {} trips without a mappable coordinate",
            total - mapped.len()
        );
    }

    println!("Loaded {} trips ({} mappable)", total, mapped.len());
    Some(mapped)
}

/// Show location groups and the chosen representative per pin.
fn run_pins(file: &PathBuf, verbose: bool) -> ExitCode {
    let Some(trips) = load_trips(file, verbose) else {
        return ExitCode::FAILURE;
    };

    println!("\n{}", "=".repeat(60));
    println!("LOCATION GROUPS");
    println!("{}", "=".repeat(60));

    let mut groups: HashMap<LocationKey, Vec<&Trip>> = HashMap::new();
    for trip in &trips {
        groups
            .entry(LocationKey::of_raw(trip.lat, trip.lng))
            .or_default()
            .push(trip);
    }

    let representatives = dedup_trips(&trips);
    let representative_ids: Vec<u64> = representatives.iter().map(|trip| trip.id).collect();

    let mut keys: Vec<LocationKey> = groups.keys().copied().collect();
    keys.sort_by(|a, b| {
        (a.latitude(), a.longitude())
            .partial_cmp(&(b.latitude(), b.longitude()))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    for (i, key) in keys.iter().enumerate() {
        let members = &groups[key];
        println!(
            "\n  Group {} at ({:.6}, {:.6}) - {} trips:",
            i + 1,
            key.latitude(),
            key.longitude(),
            members.len()
        );
        for trip in members {
            let marker = if representative_ids.contains(&trip.id) {
                "*"
            } else {
                " "
            };
            println!(
                "    {} #{} {:40} date: {:12}",
                marker,
                trip.id,
                trip.title,
                if trip.date.is_empty() {
                    "(none)"
                } else {
                    trip.date.as_str()
                }
            );
            if verbose {
                println!("        parsed timestamp: {}", parse_trip_date(&trip.date));
            }
        }
    }

    println!(
        "\n{} distinct locations for {} trips (* = rendered representative)",
        keys.len(),
        trips.len()
    );
    ExitCode::SUCCESS
}

/// Run one reconciliation pass and dump the engine operations.
fn run_reconcile(
    file: &PathBuf,
    select_trip: Option<u64>,
    full_screen: Option<u64>,
    select_activity: Option<u64>,
    select_lodging: Option<u64>,
    verbose: bool,
) -> ExitCode {
    let Some(trips) = load_trips(file, verbose) else {
        return ExitCode::FAILURE;
    };

    let mut view = match MapView::mount(
        || Ok(RecordingEngine::new()),
        MapConfig::default(),
        MemoryViewportStore::new(),
        AutoCenterFlag::new(),
    ) {
        Ok(view) => view,
        Err(e) => {
            eprintln!("Error mounting view: {e}");
            return ExitCode::FAILURE;
        }
    };

    view.set_trips(trips);

    if let Some(id) = full_screen {
        view.enter_full_screen(id);
    } else if let Some(id) = select_trip {
        view.select_trip(Some(id));
    }
    if let Some(id) = select_activity {
        view.select_activity(Some(id));
    }
    if let Some(id) = select_lodging {
        view.select_lodging(Some(id));
    }

    println!("\n{}", "=".repeat(60));
    println!("ENGINE OPERATIONS");
    println!("{}", "=".repeat(60));

    for (i, op) in view.engine().ops().iter().enumerate() {
        match op {
            EngineOp::AddMarker { id, spec } => {
                println!(
                    "  {:3}. add    {:?} {:?} at ({:.5}, {:.5}) active: {}",
                    i + 1,
                    id,
                    spec.key,
                    spec.point.latitude,
                    spec.point.longitude,
                    spec.icon.is_active()
                );
            }
            EngineOp::RemoveMarker { id } => {
                println!("  {:3}. remove {:?}", i + 1, id);
            }
            EngineOp::SetView { center, zoom } => {
                println!(
                    "  {:3}. view   ({:.5}, {:.5}) zoom {}",
                    i + 1,
                    center.latitude,
                    center.longitude,
                    zoom
                );
            }
            EngineOp::FlyTo {
                center,
                zoom,
                duration_secs,
            } => {
                println!(
                    "  {:3}. fly    ({:.5}, {:.5}) zoom {} over {}s",
                    i + 1,
                    center.latitude,
                    center.longitude,
                    zoom,
                    duration_secs
                );
            }
            EngineOp::FitBounds {
                bounds,
                max_zoom,
                duration_secs,
            } => {
                println!(
                    "  {:3}. fit    [{:.4}, {:.4}] to [{:.4}, {:.4}] max zoom {} over {}s",
                    i + 1,
                    bounds.min_lat,
                    bounds.min_lng,
                    bounds.max_lat,
                    bounds.max_lng,
                    max_zoom,
                    duration_secs
                );
            }
            EngineOp::InvalidateSize => {
                println!("  {:3}. invalidate size", i + 1);
            }
        }
    }

    println!(
        "\n{} markers rendered, {} engine ops total",
        view.rendered_marker_count(),
        view.engine().ops().len()
    );
    ExitCode::SUCCESS
}
