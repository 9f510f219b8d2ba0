//! `penumbra` command-line front-end.
//!
//! ```bash
//! penumbra compute --latitude 32.9 --longitude=-96.8 --date 2024-04-08
//! echo '{"latitude": 32.9, "longitude": -96.8, "date": "2024-04-08"}' | penumbra request
//! penumbra --ephemeris /data/de440s.bsp info
//! ```
//!
//! Responses are written to stdout as JSON, logs go to stderr.
//!
//! # Environment Variables
//!
//! - `PENUMBRA_EPHEMERIS`: ephemeris source (default: `naif:DE421`, fetched
//!   into the user cache on first use unless built with `--no-default-features`)
//! - `PENUMBRA_EOP_FILE`: JPL EOP file for UT1
//! - `RUST_LOG`: log filter (default: info)
use std::io::Read;
use std::process::ExitCode;

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use penumbra::jpl_ephem::download_jpl_file::EphemFileSource;
use penumbra::{
    ContactRadii, EclipseRequest, EclipseResponse, JPLEphem, Penumbra, PenumbraConfig,
};

#[derive(Parser)]
#[command(name = "penumbra")]
#[command(about = "Solar eclipse contacts and maximum for a site and a day")]
#[command(version)]
struct Cli {
    /// Ephemeris source: `naif:DE421`, `naif:DE440`, ... or a path to a .bsp file
    #[arg(
        long,
        global = true,
        env = "PENUMBRA_EPHEMERIS",
        default_value = "naif:DE421"
    )]
    ephemeris: String,

    /// JPL Earth orientation file (latest_eop2.long) for UT1
    #[arg(long, global = true, env = "PENUMBRA_EOP_FILE")]
    eop_file: Option<Utf8PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the eclipse circumstances for one site and one day
    Compute {
        /// Geodetic latitude in degrees, north positive
        #[arg(long, allow_negative_numbers = true)]
        latitude: f64,
        /// Longitude in degrees, east positive
        #[arg(long, allow_negative_numbers = true)]
        longitude: f64,
        /// UTC date, YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// Apparent radius of the Sun in degrees
        #[arg(long, default_value_t = penumbra::constants::DEFAULT_SUN_RADIUS_DEG)]
        sun_radius: f64,
        /// Apparent radius of the Moon in degrees
        #[arg(long, default_value_t = penumbra::constants::DEFAULT_MOON_RADIUS_DEG)]
        moon_radius: f64,
        /// Apply annual and diurnal aberration
        #[arg(long)]
        aberration: bool,
    },
    /// Answer one JSON request read from a file or stdin
    Request {
        /// Request file, stdin when absent
        #[arg(long)]
        input: Option<Utf8PathBuf>,
    },
    /// Print the ephemeris kernel summary
    Info,
}

fn init_logging() {
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn respond(response: &EclipseResponse) -> anyhow::Result<ExitCode> {
    println!("{}", response.to_json()?);
    Ok(if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    })
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging();

    let ephemeris = EphemFileSource::try_from(cli.ephemeris.as_str())
        .with_context(|| format!("invalid ephemeris source '{}'", cli.ephemeris))?;
    let mut config = PenumbraConfig {
        ephemeris,
        eop_file: cli.eop_file,
        ..Default::default()
    };

    match cli.command {
        Commands::Info => {
            let ephem = JPLEphem::new(&config.ephemeris)
                .with_context(|| format!("cannot load ephemeris {}", config.ephemeris))?;
            println!("{ephem}");
            Ok(ExitCode::SUCCESS)
        }
        Commands::Compute {
            latitude,
            longitude,
            date,
            sun_radius,
            moon_radius,
            aberration,
        } => {
            config.radii = ContactRadii::new(sun_radius, moon_radius)?;
            config.aberration = aberration;
            let penumbra = load(&config)?;
            let request = EclipseRequest::new(latitude, longitude, &date);
            respond(&penumbra.handle_request(&request))
        }
        Commands::Request { input } => {
            let penumbra = load(&config)?;
            let body = match input {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("cannot read request file {path}"))?,
                None => {
                    let mut body = String::new();
                    std::io::stdin()
                        .read_to_string(&mut body)
                        .context("cannot read request from stdin")?;
                    body
                }
            };
            let response = match EclipseRequest::from_json(&body) {
                Ok(request) => penumbra.handle_request(&request),
                Err(err) => EclipseResponse::failure(&err),
            };
            respond(&response)
        }
    }
}

fn load(config: &PenumbraConfig) -> anyhow::Result<Penumbra> {
    let penumbra = Penumbra::new(config)
        .with_context(|| format!("cannot load ephemeris {}", config.ephemeris))?;
    info!(?penumbra, "ready");
    Ok(penumbra)
}
