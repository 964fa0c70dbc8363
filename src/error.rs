use thiserror::Error;

#[derive(Debug, Error)]
pub enum LigaError {
    // A result cell that doesn't read as "<home goals>-<away goals>"
    #[error("malformed result {raw:?} for {home} vs {away}, expected \"<home goals>-<away goals>\"")]
    MalformedResult {
        home: String,
        away: String,
        raw: String,
    },

    // A by-name lookup failed against a table built from the same team set.
    // This is an internal invariant violation, not user input.
    #[error("team {0:?} missing from the standings table")]
    MissingTeam(String),

    #[error("team {0:?} is not part of this league")]
    UnknownTeam(String),

    #[error("no history row for matchday {matchday}, team {team:?}")]
    MissingHistoryRow { matchday: u32, team: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
