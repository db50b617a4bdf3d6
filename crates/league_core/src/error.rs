use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Missing strength coefficient for team: {0}")]
    MissingCoefficient(String),

    #[error("Invalid strength coefficient for {team}: {value}")]
    InvalidCoefficient { team: String, value: f64 },

    #[error("Coefficients of a fixture must sum to a positive finite value, got {total}")]
    InvalidCoefficientPair { total: f64 },

    #[error("Duplicate strength coefficient for team: {0}")]
    DuplicateCoefficient(String),

    #[error("Draw probability must be within [0, 1], got {0}")]
    InvalidDrawProbability(f64),

    #[error("Matches played out of range: {matches_played} > {total_rounds} rounds")]
    MatchesPlayedOutOfRange {
        matches_played: usize,
        total_rounds: usize,
    },

    #[error(
        "Invalid band boundaries: qualification up to {qualification_last}, \
         play-off up to {playoff_last}, {team_count} teams"
    )]
    InvalidBands {
        qualification_last: usize,
        playoff_last: usize,
        team_count: usize,
    },

    #[error("Invalid competition format: {0}")]
    InvalidFormat(String),

    #[error("Invalid simulation config: {0}")]
    InvalidConfig(String),

    #[error("Team scheduled against itself: {0}")]
    SelfFixture(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
