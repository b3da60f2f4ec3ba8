use bm_common::MatchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RankCliError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid match request: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Match(#[from] MatchError),
}
