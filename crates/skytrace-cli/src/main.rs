// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use anyhow::Result;
use clap::{Parser, Subcommand};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use skytrace_core::flight::filter_by_callsign;
use skytrace_core::route::RouteResolver;
use skytrace_core::store::GeopointCache;
use skytrace_core::swim::SwimClient;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URI of the SWIM provider API
    #[arg(long, env = "SWIM_API_URI")]
    api_uri: String,

    /// API key sent as the `apikey` header
    #[arg(long, env = "SWIM_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all flights the provider currently tracks
    Flights,
    /// Search flights by callsign (partial match)
    Search { callsign: String },
    /// Resolve a flight's filed route into waypoints
    Route {
        id: String,
        /// Emit the waypoints as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show resolved departure/arrival coordinates for a flight
    Transit { id: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let client = SwimClient::new(&cli.api_uri, &cli.api_key)?;

    match &cli.command {
        Commands::Flights => {
            let flights = client.display_all_flights()?;
            if flights.is_empty() {
                println!("No flights found");
                return Ok(());
            }
            for f in &flights {
                println!(
                    "{:8} {:10} {:4} -> {:4}",
                    f.id,
                    f.aircraft_identification,
                    f.departure_aerodrome().unwrap_or("----"),
                    f.destination_aerodrome().unwrap_or("----"),
                );
            }
        }
        Commands::Search { callsign } => {
            let flights = client.display_all_flights()?;
            let hits = filter_by_callsign(&flights, callsign);
            if hits.is_empty() {
                println!("No flights found matching '{}'", callsign);
                return Ok(());
            }
            for f in hits {
                println!("{:8} {}", f.id, f.aircraft_identification);
            }
        }
        Commands::Route { id, json } => {
            let cache = init_store(&client);
            let resolver = RouteResolver::new(&client, &cache);
            let waypoints = resolver.route_for_flight(id)?;

            if *json {
                println!("{}", serde_json::to_string_pretty(&waypoints)?);
            } else {
                for wp in &waypoints {
                    let pos = match (wp.lat, wp.lon) {
                        (Some(lat), Some(lon)) => format!("{:9.4} {:10.4}", lat, lon),
                        _ => "  (unresolved)      ".to_string(),
                    };
                    println!(
                        "{:3} {:7} {:8} {} {}",
                        wp.seq_num,
                        wp.designated_point,
                        wp.point_type,
                        pos,
                        wp.airway.as_deref().unwrap_or(""),
                    );
                }
            }
        }
        Commands::Transit { id } => {
            let cache = init_store(&client);
            let resolver = RouteResolver::new(&client, &cache);
            let transit = resolver.transit_coords(id)?;
            println!("{}", serde_json::to_string_pretty(&transit)?);
        }
    }

    Ok(())
}

fn init_store(client: &SwimClient) -> GeopointCache {
    let cache = GeopointCache::new();
    let report = cache.initialize(client);
    for failure in &report.failures {
        log::warn!(
            "Geopoint category unavailable, resolving without it — category={} error={:#}",
            failure.category,
            failure.error
        );
    }
    cache
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    let _ = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}
