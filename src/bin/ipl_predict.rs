use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

use ipl_predictor::config::PredictorConfig;
use ipl_predictor::records::{TossDecision, resolve_team};
use ipl_predictor::service::PredictionService;
use ipl_predictor::source::CsvDatasetSource;
use ipl_predictor::win_prob::PredictionRequest;

const USAGE: &str = "\
usage:
  ipl_predict predict <team1> <team2> <venue> <toss_winner> <bat|field>
  ipl_predict venues
  ipl_predict teams
  ipl_predict form <team>";

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cfg = PredictorConfig::from_env()?;
    let source = CsvDatasetSource::new(cfg.datasets.clone(), cfg.http_timeout_secs);
    let service = match cfg.seed {
        Some(seed) => PredictionService::seeded(source, seed),
        None => PredictionService::new(source),
    };

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cmd = args.first().map(String::as_str).unwrap_or("venues");
    let rest = args.get(1..).unwrap_or_default();

    let out = match (cmd, rest) {
        ("predict", [team1, team2, venue, toss_winner, decision]) => {
            let request = PredictionRequest {
                team1: resolve_team(team1),
                team2: resolve_team(team2),
                venue: venue.clone(),
                toss_winner: resolve_team(toss_winner),
                toss_decision: TossDecision::from_text(decision),
            };
            serde_json::to_string_pretty(&service.build_prediction(&request)?)
        }
        ("venues", []) => serde_json::to_string_pretty(&service.list_known_venues()?),
        ("teams", []) => serde_json::to_string_pretty(&service.known_teams()?),
        ("form", [team]) => serde_json::to_string_pretty(&service.team_recent_form(&resolve_team(team))?),
        _ => return Err(anyhow!("{USAGE}")),
    }
    .context("serialize output")?;

    println!("{out}");
    Ok(())
}
