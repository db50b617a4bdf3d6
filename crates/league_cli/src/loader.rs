//! CSV loaders for the fixture list and the coefficient table.
//!
//! Fixture files: `Home Team,Away Team,Score` (score may be empty).
//! Coefficient files: `Team,Pts`. Extra columns are ignored.

use anyhow::{Context, Result};
use league_core::{CoefficientEntry, Fixture};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct FixtureRecord {
    #[serde(rename = "Home Team")]
    home: String,
    #[serde(rename = "Away Team")]
    away: String,
    #[serde(rename = "Score", default)]
    score: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CoefficientRecord {
    #[serde(rename = "Team")]
    team: String,
    #[serde(rename = "Pts")]
    points: f64,
}

pub fn load_fixtures(path: &Path) -> Result<Vec<Fixture>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open fixture CSV: {}", path.display()))?;

    let mut fixtures = Vec::new();
    for (row, record) in reader.deserialize::<FixtureRecord>().enumerate() {
        let record = record
            .with_context(|| format!("Invalid fixture row {} in {}", row + 2, path.display()))?;
        fixtures.push(Fixture::from_raw(
            record.home,
            record.away,
            record.score.as_deref(),
        ));
    }
    Ok(fixtures)
}

pub fn load_coefficients(path: &Path) -> Result<Vec<CoefficientEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open coefficient CSV: {}", path.display()))?;

    let mut entries = Vec::new();
    for (row, record) in reader.deserialize::<CoefficientRecord>().enumerate() {
        let record = record
            .with_context(|| format!("Invalid coefficient row {} in {}", row + 2, path.display()))?;
        entries.push(CoefficientEntry::new(record.team, record.points));
    }
    Ok(entries)
}
