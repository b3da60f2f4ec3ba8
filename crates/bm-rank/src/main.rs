use std::io::{Read, Write};
use std::path::PathBuf;

use bm_common::{
    api::{self, match_request::MatchRequest},
    config::MatchingConfig,
    logging,
    matching::MatchingEngine,
    run_id,
};
use clap::Parser;
use dotenvy::dotenv;
use tracing::info;

mod error;

use error::RankCliError;

const APP_NAME: &str = "bm-rank";

#[derive(Debug, Clone, Parser)]
#[command(name = APP_NAME, about = "Rank a blind match request read as JSON")]
struct Cli {
    /// Request file, or `-` for stdin
    #[arg(long, env = "BM_REQUEST", default_value = "-")]
    request: String,

    /// Weight preset (mission-first, skills-first, balanced); overrides the request body
    #[arg(long, env = "BM_MODE")]
    mode: Option<String>,

    /// Number of results to return; overrides the request body
    #[arg(long, env = "BM_K")]
    k: Option<usize>,

    /// Keep hard-failed pairs and rank near matches
    #[arg(long, env = "BM_NEAR", default_value_t = false)]
    near: bool,

    /// Minimum score for near matches; requires --near
    #[arg(long, env = "BM_THRESHOLD")]
    threshold: Option<f64>,

    /// Pretty-print the response
    #[arg(long, env = "BM_PRETTY", default_value_t = false)]
    pretty: bool,

    /// Write the response here instead of stdout
    #[arg(long, env = "BM_OUTPUT")]
    output: Option<PathBuf>,
}

impl Cli {
    /// CLI flags win over values in the request body.
    fn apply_overrides(&self, request: &mut MatchRequest) {
        if let Some(mode) = &self.mode {
            request.mode = Some(mode.clone());
        }
        if let Some(k) = self.k {
            request.k = Some(k);
        }
        if self.near {
            request.near_matches = true;
        }
        if let Some(threshold) = self.threshold {
            request.threshold = Some(threshold);
        }
    }
}

fn read_request(source: &str) -> Result<MatchRequest, RankCliError> {
    let raw = if source == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|source| RankCliError::Read {
                path: "stdin".into(),
                source,
            })?;
        buffer
    } else {
        std::fs::read_to_string(source).map_err(|err| RankCliError::Read {
            path: source.to_string(),
            source: err,
        })?
    };

    Ok(serde_json::from_str(&raw)?)
}

fn render(cli: &Cli, request: &MatchRequest, engine: &MatchingEngine) -> Result<String, RankCliError> {
    let response = api::execute(engine, request)?;
    info!(
        match_run_id = %response.meta.match_run_id,
        returned = response.meta.returned,
        pool_size = response.meta.pool_size,
        "match request ranked"
    );

    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    Ok(rendered)
}

fn run() -> Result<(), RankCliError> {
    dotenv().ok();
    logging::init_tracing_subscriber(APP_NAME);
    logging::install_tracing_panic_hook(APP_NAME);

    let cli = Cli::parse();
    info!(run_id = run_id::get(), request = %cli.request, "bm-rank starting");

    let mut request = read_request(&cli.request)?;
    cli.apply_overrides(&mut request);

    let engine = MatchingEngine::new(MatchingConfig::from_env());
    let rendered = render(&cli, &request, &engine)?;

    match &cli.output {
        Some(path) => std::fs::write(path, rendered + "\n").map_err(|source| RankCliError::Write {
            path: path.display().to_string(),
            source,
        })?,
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{rendered}").map_err(|source| RankCliError::Write {
                path: "stdout".into(),
                source,
            })?;
        }
    }

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        tracing::error!(error = %err, "bm-rank failed");
        eprintln!("bm-rank: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bm_common::MatchError;

    fn request_json() -> &'static str {
        r#"{
            "direction": "candidates_for_assignment",
            "assignment": {"id": "a-1", "must_have_skills": [{"id": "rust", "level": 3}]},
            "candidates": [
                {"id": "p-1", "display_name": "Ada", "skills": {"rust": {"level": 4, "months_experience": 40}}},
                {"id": "p-2", "skills": {"rust": {"level": 3, "months_experience": 10}}},
                {"id": "p-3", "skills": {"rust": {"level": 1}}}
            ],
            "k": 10
        }"#
    }

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("bm-rank").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn flags_override_the_request_body() {
        let mut request: MatchRequest = serde_json::from_str(request_json()).unwrap();
        let cli = cli(&["--k", "1", "--mode", "skills-first", "--near", "--threshold", "0.2"]);
        cli.apply_overrides(&mut request);

        assert_eq!(request.k, Some(1));
        assert_eq!(request.mode.as_deref(), Some("skills-first"));
        assert!(request.near_matches);
        assert_eq!(request.threshold, Some(0.2));
    }

    #[test]
    fn renders_ranked_response_without_identity_fields() {
        let request: MatchRequest = serde_json::from_str(request_json()).unwrap();
        let rendered = render(&cli(&[]), &request, &MatchingEngine::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        let items = value["items"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["counterparty_id"], "p-1");
        assert!(!rendered.contains("Ada"));
        assert_eq!(value["meta"]["hard_filtered"], 1);
    }

    #[test]
    fn invalid_limit_is_an_error() {
        let mut request: MatchRequest = serde_json::from_str(request_json()).unwrap();
        cli(&["--k", "0"]).apply_overrides(&mut request);

        let err = render(&cli(&[]), &request, &MatchingEngine::default()).unwrap_err();
        assert!(matches!(
            err,
            RankCliError::Match(MatchError::InvalidLimit { k: 0, .. })
        ));
    }

    #[test]
    fn threshold_without_near_is_an_error() {
        let mut request: MatchRequest = serde_json::from_str(request_json()).unwrap();
        cli(&["--threshold", "0.4"]).apply_overrides(&mut request);

        let err = render(&cli(&[]), &request, &MatchingEngine::default()).unwrap_err();
        assert!(matches!(
            err,
            RankCliError::Match(MatchError::ThresholdWithoutNearMatches(_))
        ));
    }

    #[test]
    fn missing_file_is_reported_with_path() {
        let err = read_request("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
