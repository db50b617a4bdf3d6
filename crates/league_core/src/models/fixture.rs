//! Fixture records and score parsing.
//!
//! Score text comes from scraped tables and may use typographic dashes
//! (or their mis-decoded UTF-8 form), so it is normalised before parsing.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Dash variants seen in upstream score columns. The mojibake entry must be
/// replaced before the plain en dash it decodes to.
const DASH_VARIANTS: &[&str] = &["â€\u{201c}", "â€“", "â€”", "–", "—", "−", "‒"];

/// Final score of a played fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub home_goals: u32,
    pub away_goals: u32,
}

impl Score {
    pub fn new(home_goals: u32, away_goals: u32) -> Self {
        Self {
            home_goals,
            away_goals,
        }
    }

    /// Parses `"<home>-<away>"`. Returns `None` for anything that is not
    /// exactly two non-negative integers.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut text = raw.to_string();
        for dash in DASH_VARIANTS {
            text = text.replace(dash, "-");
        }
        let mut parts = text.split('-');
        let home = parts.next()?.trim().parse::<u32>().ok()?;
        let away = parts.next()?.trim().parse::<u32>().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self::new(home, away))
    }

    /// League points awarded to (home, away).
    pub fn points(&self) -> (u32, u32) {
        match self.home_goals.cmp(&self.away_goals) {
            Ordering::Greater => (3, 0),
            Ordering::Less => (0, 3),
            Ordering::Equal => (1, 1),
        }
    }
}

/// What is known about a fixture's result at load time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum FixtureResult {
    /// No score recorded yet.
    Pending,
    Played(Score),
    /// Score text that could not be parsed; contributes nothing.
    Unreadable(String),
}

impl FixtureResult {
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => FixtureResult::Pending,
            Some(text) => match Score::parse(text) {
                Some(score) => FixtureResult::Played(score),
                None => FixtureResult::Unreadable(text.to_string()),
            },
        }
    }
}

/// A scheduled match between two named teams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub home: String,
    pub away: String,
    pub result: FixtureResult,
}

impl Fixture {
    pub fn pending(home: impl Into<String>, away: impl Into<String>) -> Self {
        Self {
            home: home.into(),
            away: away.into(),
            result: FixtureResult::Pending,
        }
    }

    pub fn played(home: impl Into<String>, away: impl Into<String>, score: Score) -> Self {
        Self {
            home: home.into(),
            away: away.into(),
            result: FixtureResult::Played(score),
        }
    }

    /// Builds a fixture from raw table cells; the score cell may be empty.
    pub fn from_raw(home: impl Into<String>, away: impl Into<String>, score: Option<&str>) -> Self {
        Self {
            home: home.into(),
            away: away.into(),
            result: FixtureResult::from_raw(score),
        }
    }

    pub fn score(&self) -> Option<Score> {
        match self.result {
            FixtureResult::Played(score) => Some(score),
            _ => None,
        }
    }
}
