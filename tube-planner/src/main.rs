use std::path::PathBuf;
use std::process::ExitCode;

use tracing::info;
use tracing_subscriber::EnvFilter;
use tube_planner::builder::{BuildError, TimetableLink, build_network, sort_links};
use tube_planner::domain::{InvalidIdentifier, StationName, TimeError, decode};
use tube_planner::planner::{JourneyQuery, PlanError, Planner, PlannerConfig, QueryMode};

/// Environment variable limiting how far from the requested time the
/// query endpoints may connect.
const TIME_WINDOW_VAR: &str = "TUBE_TIME_WINDOW_MINS";

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(
        "usage: tube-planner <links.json> <from> <to> <HH:MM[:SS]> [depart-after|arrive-before]"
    )]
    Usage,

    #[error("unknown query mode '{0}', expected depart-after or arrive-before")]
    Mode(String),

    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("TUBE_TIME_WINDOW_MINS must be a non-negative number, got '{0}'")]
    Window(String),

    #[error(transparent)]
    Station(#[from] InvalidIdentifier),

    #[error(transparent)]
    Time(#[from] TimeError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Plan(#[from] PlanError),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(std::env::args().skip(1).collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Vec<String>) -> Result<(), CliError> {
    let [path, from, to, time, rest @ ..] = args.as_slice() else {
        return Err(CliError::Usage);
    };
    let mode = match rest {
        [] => QueryMode::DepartAfter,
        [mode] => parse_mode(mode)?,
        _ => return Err(CliError::Usage),
    };

    let path = PathBuf::from(path);
    let json = std::fs::read_to_string(&path).map_err(|source| CliError::Read {
        path: path.clone(),
        source,
    })?;
    let mut links: Vec<TimetableLink> =
        serde_json::from_str(&json).map_err(|source| CliError::Parse {
            path: path.clone(),
            source,
        })?;
    sort_links(&mut links);

    let (network, summary) = build_network(links)?;
    info!(
        nodes = summary.nodes,
        travel_edges = summary.travel_edges,
        wait_edges = summary.wait_edges,
        dead_ends = summary.dead_ends,
        "network built"
    );

    let config = PlannerConfig::new(true, time_window()?);
    let query = JourneyQuery::new(
        StationName::new(from.as_str())?,
        StationName::new(to.as_str())?,
        decode(time)?,
        mode,
    );

    let plan = Planner::new(&network, &config).plan(&query)?;
    for step in &plan.steps {
        println!("{step}");
    }

    Ok(())
}

fn parse_mode(s: &str) -> Result<QueryMode, CliError> {
    match s {
        "depart-after" => Ok(QueryMode::DepartAfter),
        "arrive-before" => Ok(QueryMode::ArriveBefore),
        other => Err(CliError::Mode(other.to_string())),
    }
}

fn time_window() -> Result<Option<f64>, CliError> {
    let Ok(raw) = std::env::var(TIME_WINDOW_VAR) else {
        return Ok(None);
    };
    match raw.trim().parse::<f64>() {
        Ok(mins) if mins.is_finite() && mins >= 0.0 => Ok(Some(mins)),
        _ => Err(CliError::Window(raw)),
    }
}
