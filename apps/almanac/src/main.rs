use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use urania::ephemeris::{snapshot, EphemerisProvider};
use urania::scan::{sample_series, scan_range, Criterion};
use urania::search::{find_transit_hits, seasonal_ingresses, TransitQuery};
use urania::time::{datetime_to_julian_day, parse_instant};
use urania::{
    detect_patterns, AspectCalculator, AspectGraph, AspectKind, Body, SwissEphemerisAdapter,
};
use urania_config::UraniaSettings;

#[derive(Parser, Debug)]
#[command(author, version, about = "Ingress, transit and aspect-pattern searches")]
struct Args {
    /// Settings file (default: configs/urania.toml, then built-in defaults).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Compact single-line JSON instead of pretty output.
    #[arg(long, global = true, default_value_t = false)]
    compact: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Equinoxes and solstices of one year.
    Ingresses { year: i32 },
    /// Exact transits of a body to a natal longitude.
    Transits {
        #[arg(long)]
        body: String,
        #[arg(long)]
        aspect: String,
        /// Natal longitude in degrees.
        #[arg(long)]
        natal: f64,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        /// Largest distance from exact at which a pass is considered.
        #[arg(long, default_value_t = 1.0)]
        max_orb: f64,
    },
    /// Positions, aspects and patterns at one instant.
    Chart {
        #[arg(long)]
        at: String,
    },
    /// Date ranges during which a body is retrograde.
    Retrograde {
        #[arg(long)]
        body: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
    },
}

#[derive(Serialize)]
struct TransitReport {
    body: Body,
    aspect: AspectKind,
    natal_longitude: f64,
    hits: Vec<TransitHitReport>,
}

#[derive(Serialize)]
struct TransitHitReport {
    instant: DateTime<Utc>,
    #[serde(flatten)]
    hit: urania::ExactHit,
}

#[derive(Serialize)]
struct ChartReport {
    instant: DateTime<Utc>,
    positions: std::collections::BTreeMap<Body, urania::Position>,
    aspects: Vec<urania::AspectInstance>,
    patterns: Vec<urania::patterns::PatternSummary>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let settings = load_settings(args.config.as_deref())?;

    // Validate every argument before the ephemeris is touched
    let report = match &args.command {
        Command::Ingresses { year } => {
            let provider = open_ephemeris(&settings)?;
            let ingresses = seasonal_ingresses(&provider, *year, &settings.bisection)?;
            log::info!("Found {} seasonal ingresses in {}", ingresses.len(), year);
            serde_json::to_value(&ingresses)?
        }
        Command::Transits {
            body,
            aspect,
            natal,
            start,
            end,
            max_orb,
        } => {
            let query = TransitQuery {
                body: body.parse()?,
                aspect: aspect.parse()?,
                natal_longitude: *natal,
                start_jd: datetime_to_julian_day(parse_instant(start)?),
                end_jd: datetime_to_julian_day(parse_instant(end)?),
                max_orb: *max_orb,
            };
            query.validate()?;
            let provider = open_ephemeris(&settings)?;
            serde_json::to_value(transit_report(&provider, &query, &settings)?)?
        }
        Command::Chart { at } => {
            let instant = parse_instant(at)?;
            let provider = open_ephemeris(&settings)?;
            serde_json::to_value(chart_report(&provider, instant, &settings)?)?
        }
        Command::Retrograde { body, start, end } => {
            let body: Body = body.parse()?;
            let (start, end) = (parse_instant(start)?, parse_instant(end)?);
            if end < start {
                anyhow::bail!("--end {end} is before --start {start}");
            }
            let provider = open_ephemeris(&settings)?;
            let samples = sample_series(
                &provider,
                &[body],
                start,
                end,
                Duration::hours(settings.scan.step_hours),
                None,
            )?;
            let criteria = settings
                .scan
                .criteria(vec![Criterion::Retrograde { body }]);
            serde_json::to_value(scan_range(&samples, &criteria))?
        }
    };

    let text = if args.compact {
        serde_json::to_string(&report)?
    } else {
        serde_json::to_string_pretty(&report)?
    };
    println!("{text}");
    Ok(())
}

fn load_settings(path: Option<&std::path::Path>) -> anyhow::Result<UraniaSettings> {
    match path {
        Some(p) => urania_config::load_settings(Some(p)),
        None => match urania_config::load_settings(None) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                log::debug!("Using default settings: {e}");
                Ok(UraniaSettings::default())
            }
        },
    }
}

fn open_ephemeris(settings: &UraniaSettings) -> anyhow::Result<SwissEphemerisAdapter> {
    let adapter = SwissEphemerisAdapter::new(&settings.ephemeris)
        .context("Failed to open the Swiss Ephemeris")?;
    log::info!("Ephemeris data: {}", adapter.ephemeris_path().display());
    Ok(adapter)
}

fn transit_report<P: EphemerisProvider>(
    provider: &P,
    query: &TransitQuery,
    settings: &UraniaSettings,
) -> anyhow::Result<TransitReport> {
    let hits = find_transit_hits(provider, query, &settings.transit, None)?
        .into_iter()
        .map(|hit| {
            Ok(TransitHitReport {
                instant: hit.instant()?,
                hit,
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    log::info!(
        "{} {} natal {:.2}: {} hits",
        query.body,
        query.aspect,
        query.natal_longitude,
        hits.len()
    );

    Ok(TransitReport {
        body: query.body,
        aspect: query.aspect,
        natal_longitude: query.natal_longitude,
        hits,
    })
}

fn chart_report<P: EphemerisProvider>(
    provider: &P,
    instant: DateTime<Utc>,
    settings: &UraniaSettings,
) -> anyhow::Result<ChartReport> {
    let positions = snapshot(provider, &Body::ALL, datetime_to_julian_day(instant))?;
    let aspects = AspectCalculator::new(settings.orbs.clone()).compute_aspects(&positions);
    let graph = AspectGraph::from_aspects(aspects.clone(), &positions);
    let patterns = detect_patterns(&graph).summaries();

    Ok(ChartReport {
        instant,
        positions,
        aspects,
        patterns,
    })
}
