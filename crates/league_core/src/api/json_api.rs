use serde::{Deserialize, Serialize};

use super::projection::{project_league, standing_report, ProjectionRequest};
use crate::config::SimulationConfig;
use crate::error::{Result, SimError};
use crate::format::{CompetitionFormat, CompetitionPreset};
use crate::models::{CoefficientEntry, Fixture};
use crate::SCHEMA_VERSION;

/// Fixture as it arrives from a table: the score is free text or absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawFixture {
    pub home: String,
    pub away: String,
    #[serde(default)]
    pub score: Option<String>,
}

impl From<&RawFixture> for Fixture {
    fn from(raw: &RawFixture) -> Self {
        Fixture::from_raw(raw.home.clone(), raw.away.clone(), raw.score.as_deref())
    }
}

#[derive(Debug, Deserialize)]
pub struct JsonProjectionRequest {
    pub schema_version: u8,
    /// Known competition; ignored when `format` is given.
    #[serde(default)]
    pub preset: Option<CompetitionPreset>,
    #[serde(default)]
    pub format: Option<CompetitionFormat>,
    pub matches_played: usize,
    pub fixtures: Vec<RawFixture>,
    #[serde(default)]
    pub coefficients: Vec<CoefficientEntry>,
    #[serde(default)]
    pub config: SimulationConfig,
}

impl JsonProjectionRequest {
    fn resolve_format(&self) -> Result<CompetitionFormat> {
        match (&self.format, self.preset) {
            (Some(format), _) => {
                format.validate()?;
                Ok(format.clone())
            }
            (None, Some(preset)) => Ok(preset.format()),
            (None, None) => Err(SimError::InvalidFormat(
                "request needs either `format` or `preset`".to_string(),
            )),
        }
    }

    pub fn into_request(self) -> Result<ProjectionRequest> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(SimError::InvalidConfig(format!(
                "Unsupported schema version: {}",
                self.schema_version
            )));
        }
        let format = self.resolve_format()?;
        Ok(ProjectionRequest {
            format,
            matches_played: self.matches_played,
            fixtures: self.fixtures.iter().map(Fixture::from).collect(),
            coefficients: self.coefficients,
            config: self.config,
        })
    }
}

fn parse_request(request_json: &str) -> Result<ProjectionRequest> {
    let request: JsonProjectionRequest = serde_json::from_str(request_json)?;
    request.into_request()
}

/// Runs a full projection from a JSON request and returns the JSON result.
pub fn project_league_json(request_json: &str) -> Result<String> {
    let request = parse_request(request_json)?;
    let projection = project_league(&request)?;
    Ok(serde_json::to_string(&projection)?)
}

/// Current standing and opponent difficulty only; coefficients are not needed.
pub fn standing_report_json(request_json: &str) -> Result<String> {
    let request = parse_request(request_json)?;
    let report = standing_report(&request.fixtures, &request.format, request.matches_played)?;
    Ok(serde_json::to_string(&report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mini_request(seed: u64) -> serde_json::Value {
        json!({
            "schema_version": 1,
            "format": {
                "name": "Mini",
                "total_rounds": 3,
                "round_size": 2,
                "bands": { "qualification_last": 1, "playoff_last": 2 },
                "tie_break": "points_only"
            },
            "matches_played": 2,
            "fixtures": [
                { "home": "A", "away": "C", "score": "1-0" },
                { "home": "B", "away": "D", "score": "2–0" },
                { "home": "A", "away": "D", "score": "3-1" },
                { "home": "C", "away": "B", "score": "abc" },
                { "home": "A", "away": "B" },
                { "home": "C", "away": "D", "score": null }
            ],
            "coefficients": [
                { "team": "A", "coefficient": 1.0 },
                { "team": "B", "coefficient": 1.0 },
                { "team": "C", "coefficient": 1.0 },
                { "team": "D", "coefficient": 1.0 }
            ],
            "config": { "trials": 1000, "seed": seed }
        })
    }

    #[test]
    fn test_projection_round_trip() {
        let response = project_league_json(&mini_request(9).to_string()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&response).unwrap();
        assert_eq!(parsed["competition"], "Mini");
        assert_eq!(parsed["unreadable_scores"], 1);
        assert_eq!(parsed["remaining_fixtures"], 2);
        assert_eq!(parsed["result"]["trials"], 1000);
        assert_eq!(parsed["result"]["seed"], 9);
        assert_eq!(parsed["result"]["teams"].as_array().unwrap().len(), 4);
        // C vs B was unreadable, so C and B stay on 0 and 3.
        assert_eq!(parsed["standing"][0]["team"], "A");
        assert_eq!(parsed["standing"][0]["points"], 6);
    }

    #[test]
    fn test_determinism() {
        let request = mini_request(1234).to_string();
        let first: serde_json::Value =
            serde_json::from_str(&project_league_json(&request).unwrap()).unwrap();
        let second: serde_json::Value =
            serde_json::from_str(&project_league_json(&request).unwrap()).unwrap();
        assert_eq!(
            first["result"],
            second["result"],
            "Same seed should produce same result"
        );
    }

    #[test]
    fn test_preset_request() {
        let request = json!({
            "schema_version": 1,
            "preset": "conference-league",
            "matches_played": 0,
            "fixtures": [ { "home": "A", "away": "B" } ]
        });
        let report = standing_report_json(&request.to_string()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&report).unwrap();
        assert_eq!(parsed["competition"], "UEFA Europa Conference League");
        assert_eq!(parsed["standing"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_rejects_bad_requests() {
        let mut request = mini_request(1);
        request["schema_version"] = json!(2);
        assert!(matches!(
            project_league_json(&request.to_string()),
            Err(SimError::InvalidConfig(_))
        ));

        let mut request = mini_request(1);
        request.as_object_mut().unwrap().remove("format");
        assert!(matches!(
            project_league_json(&request.to_string()),
            Err(SimError::InvalidFormat(_))
        ));

        assert!(matches!(
            project_league_json("{not json"),
            Err(SimError::Json(_))
        ));
    }
}
