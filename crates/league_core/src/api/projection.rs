//! Typed entry point: validates inputs, builds the ledger and strength model,
//! runs the aggregator and packages everything for display.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::aggregate::{AggregateResult, Aggregator, ProgressObserver};
use crate::config::SimulationConfig;
use crate::error::Result;
use crate::format::{BandLabels, CompetitionFormat};
use crate::ledger::{FixtureLedger, OpponentRank, StandingRow};
use crate::models::{CoefficientEntry, Fixture};
use crate::season::SeasonSimulator;
use crate::strength::{ResolvedStrengths, StrengthModel};

/// Everything the engine needs for one projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionRequest {
    pub format: CompetitionFormat,
    pub matches_played: usize,
    pub fixtures: Vec<Fixture>,
    pub coefficients: Vec<CoefficientEntry>,
    #[serde(default)]
    pub config: SimulationConfig,
}

/// Current table plus opponent difficulty, without any simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingReport {
    pub competition: String,
    pub matches_played: usize,
    pub standing: Vec<StandingRow>,
    pub opponent_ranks: Vec<OpponentRank>,
    pub unreadable_scores: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueProjection {
    pub competition: String,
    pub matches_played: usize,
    pub draw_probability: f64,
    pub band_labels: BandLabels,
    pub generated_at: DateTime<Utc>,
    pub standing: Vec<StandingRow>,
    pub opponent_ranks: Vec<OpponentRank>,
    pub unreadable_scores: usize,
    pub remaining_fixtures: usize,
    pub result: AggregateResult,
}

pub fn standing_report(
    fixtures: &[Fixture],
    format: &CompetitionFormat,
    matches_played: usize,
) -> Result<StandingReport> {
    let ledger = FixtureLedger::build(fixtures, format, matches_played)?;
    Ok(StandingReport {
        competition: format.name.clone(),
        matches_played,
        standing: ledger.standing().to_vec(),
        opponent_ranks: ledger.opponent_ranks(),
        unreadable_scores: ledger.unreadable_count(),
    })
}

pub fn project_league(request: &ProjectionRequest) -> Result<LeagueProjection> {
    project_league_with_progress(request, None)
}

pub fn project_league_with_progress(
    request: &ProjectionRequest,
    progress: Option<&dyn ProgressObserver>,
) -> Result<LeagueProjection> {
    let ProjectionRequest {
        format,
        matches_played,
        fixtures,
        coefficients,
        config,
    } = request;
    config.validate()?;

    let ledger = FixtureLedger::build(fixtures, format, *matches_played)?;
    let model = StrengthModel::new(coefficients)?;
    // Every team in the fixture list needs a coefficient before any trial runs.
    let strengths = ResolvedStrengths::new(&model, ledger.teams(), config.draw_probability)?;
    let simulator = SeasonSimulator::new(&ledger, &strengths)?;
    let aggregator = Aggregator::new(&simulator, format.bands)?;

    info!(
        "Projecting {} after {} rounds: {} teams, {} fixtures to simulate",
        format.name,
        matches_played,
        ledger.team_count(),
        ledger.remaining().len()
    );
    let result = aggregator.run(config, progress)?;

    Ok(LeagueProjection {
        competition: format.name.clone(),
        matches_played: *matches_played,
        draw_probability: config.draw_probability,
        band_labels: format.band_labels.clone(),
        generated_at: Utc::now(),
        standing: ledger.standing().to_vec(),
        opponent_ranks: ledger.opponent_ranks(),
        unreadable_scores: ledger.unreadable_count(),
        remaining_fixtures: ledger.remaining().len(),
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;
    use crate::format::CompetitionPreset;
    use crate::models::Score;

    /// 36-team, 8-round schedule with 18 fixtures per round. Round `r` pairs
    /// each club with the one `OFFSETS[r]` places later; the last two rounds
    /// are return legs of the first two.
    fn league_phase_fixtures(played_rounds: usize) -> Vec<Fixture> {
        const OFFSETS: [usize; 8] = [1, 2, 3, 6, 9, 18, 1, 2];
        let teams = 36;
        let mut fixtures = Vec::new();
        for (round, &offset) in OFFSETS.iter().enumerate() {
            let mut used = vec![false; teams];
            for start in 0..teams {
                let opponent = (start + offset) % teams;
                if used[start] || used[opponent] {
                    continue;
                }
                used[start] = true;
                used[opponent] = true;
                let (home, away) = if round < 6 { (start, opponent) } else { (opponent, start) };
                let home = format!("Club {home:02}");
                let away = format!("Club {away:02}");
                if round < played_rounds {
                    fixtures.push(Fixture::played(
                        home,
                        away,
                        Score::new((round % 3) as u32, 1),
                    ));
                } else {
                    fixtures.push(Fixture::pending(home, away));
                }
            }
        }
        fixtures
    }

    fn coefficients() -> Vec<CoefficientEntry> {
        (0..36)
            .map(|i| CoefficientEntry::new(format!("Club {i:02}"), 20.0 + i as f64 * 3.0))
            .collect()
    }

    #[test]
    fn test_fixture_generator_shape() {
        let fixtures = league_phase_fixtures(0);
        assert_eq!(fixtures.len(), 144);
        let format = CompetitionPreset::ChampionsLeague.format();
        let ledger = FixtureLedger::build(&fixtures, &format, 0).unwrap();
        assert_eq!(ledger.team_count(), 36);
        for team in ledger.teams().ids() {
            assert_eq!(ledger.opponents(team).len(), 8);
        }
    }

    #[test]
    fn test_project_league_phase() {
        let request = ProjectionRequest {
            format: CompetitionPreset::ChampionsLeague.format(),
            matches_played: 4,
            fixtures: league_phase_fixtures(4),
            coefficients: coefficients(),
            config: SimulationConfig::default().with_trials(2_000).with_seed(7),
        };
        let projection = project_league(&request).unwrap();
        assert_eq!(projection.result.teams.len(), 36);
        assert_eq!(projection.standing.len(), 36);
        for team in &projection.result.teams {
            assert!((team.percentages.sum() - 100.0).abs() < 1e-9);
            assert!(team.min_points >= team.current_points);
        }
        let qualified: u64 = projection.result.teams.iter().map(|t| t.bands.qualification).sum();
        assert_eq!(qualified, 8 * 2_000);

        // Strongest club should out-project the weakest one.
        let strongest = projection.result.team("Club 35").unwrap();
        let weakest = projection.result.team("Club 00").unwrap();
        assert!(
            strongest.expected_points - strongest.current_points as f64
                > weakest.expected_points - weakest.current_points as f64
        );
    }

    #[test]
    fn test_missing_coefficient_rejected_up_front() {
        let mut coefficients = coefficients();
        coefficients.retain(|entry| entry.team != "Club 17");
        let request = ProjectionRequest {
            format: CompetitionPreset::ChampionsLeague.format(),
            matches_played: 2,
            fixtures: league_phase_fixtures(2),
            coefficients,
            config: SimulationConfig::default().with_trials(10),
        };
        let err = project_league(&request).unwrap_err();
        assert!(matches!(
            err,
            SimError::MissingCoefficient(team) if team == "Club 17"
        ));
    }

    #[test]
    fn test_matches_played_beyond_format_rejected() {
        let request = ProjectionRequest {
            format: CompetitionPreset::ConferenceLeague.format(),
            matches_played: 7,
            fixtures: league_phase_fixtures(0),
            coefficients: coefficients(),
            config: SimulationConfig::default().with_trials(10),
        };
        assert!(matches!(
            project_league(&request),
            Err(SimError::MatchesPlayedOutOfRange {
                matches_played: 7,
                total_rounds: 6,
            })
        ));
    }

    #[test]
    fn test_standing_report_without_simulation() {
        let format = CompetitionPreset::ChampionsLeague.format();
        let report = standing_report(&league_phase_fixtures(3), &format, 3).unwrap();
        assert_eq!(report.standing.len(), 36);
        let total_points: u32 = report.standing.iter().map(|row| row.points).sum();
        let played: u32 = report.standing.iter().map(|row| row.played).sum();
        assert_eq!(played % 2, 0);
        assert!(total_points >= played / 2 * 2 && total_points <= played / 2 * 3);
        assert_eq!(report.opponent_ranks.len(), 36);
    }
}
