//! # league_core - Monte Carlo League Projection Engine
//!
//! Projects the final table of a round-robin or league-phase competition from
//! a partially played fixture list, the current points of each team and an
//! external strength coefficient per team.
//!
//! ## Pipeline
//! - [`ledger::FixtureLedger`]: current standing + remaining fixtures per team
//! - [`strength`]: coefficients -> {home win, draw, away win} probabilities
//! - [`resolver`]: one weighted draw per fixture
//! - [`season::SeasonSimulator`]: one full trial and its final ranking
//! - [`aggregate::Aggregator`]: N trials, band counts, points distributions
//!
//! Seeded runs are reproducible, sequentially or on the rayon pool.

#![allow(clippy::too_many_arguments)]
#![allow(clippy::needless_range_loop)]

pub mod aggregate;
pub mod api;
pub mod config;
pub mod error;
pub mod format;
pub mod ledger;
pub mod models;
pub mod resolver;
pub mod season;
pub mod strength;

pub use aggregate::{
    AggregateResult, Aggregator, BandCounts, BandPercentages, PointsBandRow, ProgressObserver,
    TeamProjection,
};
pub use api::{
    project_league, project_league_json, project_league_with_progress, standing_report,
    standing_report_json, LeagueProjection, ProjectionRequest, StandingReport,
};
pub use config::SimulationConfig;
pub use error::{Result, SimError};
pub use format::{Band, BandBoundaries, BandLabels, CompetitionFormat, CompetitionPreset, TieBreak};
pub use ledger::{FixtureLedger, OpponentRank, StandingRow};
pub use models::{CoefficientEntry, Fixture, FixtureResult, Score, TeamId, TeamRegistry};
pub use resolver::MatchOutcome;
pub use season::{SeasonSimulator, TrialOutcome};
pub use strength::{outcome_probabilities, OutcomeProbabilities, StrengthModel};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;
