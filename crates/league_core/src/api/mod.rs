pub mod json_api;
pub mod projection;

pub use json_api::{project_league_json, standing_report_json, JsonProjectionRequest, RawFixture};
pub use projection::{
    project_league, project_league_with_progress, standing_report, LeagueProjection,
    ProjectionRequest, StandingReport,
};
