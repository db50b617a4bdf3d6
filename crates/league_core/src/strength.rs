//! Strength model: external coefficients and the three-outcome distribution
//! derived from a pair of them.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::models::{CoefficientEntry, TeamId, TeamRegistry};

/// Draw probability used when the caller does not supply one.
pub const DEFAULT_DRAW_PROBABILITY: f64 = 0.20;

/// Probabilities of {home win, draw, away win}.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeProbabilities {
    pub home_win: f64,
    pub draw: f64,
    pub away_win: f64,
}

impl OutcomeProbabilities {
    pub fn sum(&self) -> f64 {
        self.home_win + self.draw + self.away_win
    }
}

pub fn validate_draw_probability(draw_probability: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&draw_probability) {
        return Err(SimError::InvalidDrawProbability(draw_probability));
    }
    Ok(())
}

/// Splits the non-draw mass in proportion to the two coefficients.
pub fn outcome_probabilities(
    coeff_a: f64,
    coeff_b: f64,
    draw_probability: f64,
) -> Result<OutcomeProbabilities> {
    validate_draw_probability(draw_probability)?;
    let total = coeff_a + coeff_b;
    if !total.is_finite() || total <= 0.0 {
        return Err(SimError::InvalidCoefficientPair { total });
    }
    let decisive = 1.0 - draw_probability;
    Ok(OutcomeProbabilities {
        home_win: coeff_a * decisive / total,
        draw: draw_probability,
        away_win: coeff_b * decisive / total,
    })
}

/// Validated coefficient table keyed by team name.
#[derive(Debug, Clone, Default)]
pub struct StrengthModel {
    coefficients: FxHashMap<String, f64>,
}

impl StrengthModel {
    pub fn new(entries: &[CoefficientEntry]) -> Result<Self> {
        let mut coefficients = FxHashMap::default();
        for entry in entries {
            if !entry.coefficient.is_finite() || entry.coefficient <= 0.0 {
                return Err(SimError::InvalidCoefficient {
                    team: entry.team.clone(),
                    value: entry.coefficient,
                });
            }
            if coefficients.insert(entry.team.clone(), entry.coefficient).is_some() {
                return Err(SimError::DuplicateCoefficient(entry.team.clone()));
            }
        }
        Ok(Self { coefficients })
    }

    pub fn get(&self, team: &str) -> Option<f64> {
        self.coefficients.get(team).copied()
    }

    pub fn require(&self, team: &str) -> Result<f64> {
        self.get(team).ok_or_else(|| SimError::MissingCoefficient(team.to_string()))
    }

    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Coefficients indexed by `TeamId`. Fails on the first team, in registry
    /// order, that has no coefficient.
    pub fn resolve_for(&self, teams: &TeamRegistry) -> Result<Vec<f64>> {
        teams.ids().map(|id| self.require(teams.name(id))).collect()
    }
}

/// Per-team coefficients resolved against a registry, with the fixed draw
/// probability of the run.
#[derive(Debug, Clone)]
pub struct ResolvedStrengths {
    coefficients: Vec<f64>,
    draw_probability: f64,
}

impl ResolvedStrengths {
    pub fn new(model: &StrengthModel, teams: &TeamRegistry, draw_probability: f64) -> Result<Self> {
        validate_draw_probability(draw_probability)?;
        Ok(Self {
            coefficients: model.resolve_for(teams)?,
            draw_probability,
        })
    }

    pub fn coefficient(&self, team: TeamId) -> f64 {
        self.coefficients[team.index()]
    }

    pub fn probabilities(&self, home: TeamId, away: TeamId) -> Result<OutcomeProbabilities> {
        outcome_probabilities(
            self.coefficient(home),
            self.coefficient(away),
            self.draw_probability,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_coefficients_split_evenly() {
        let probs = outcome_probabilities(1.0, 1.0, 0.2).unwrap();
        assert!((probs.home_win - 0.4).abs() < 1e-12);
        assert!((probs.away_win - 0.4).abs() < 1e-12);
        assert_eq!(probs.draw, 0.2);
    }

    #[test]
    fn test_weighted_by_coefficient() {
        let probs = outcome_probabilities(96.25, 32.0, 0.2).unwrap();
        assert!(probs.home_win > probs.away_win);
        assert!((probs.sum() - 1.0).abs() < 1e-12);
        assert!((probs.home_win / probs.away_win - 96.25 / 32.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_total_is_an_error() {
        assert!(matches!(
            outcome_probabilities(0.0, 0.0, 0.2),
            Err(SimError::InvalidCoefficientPair { total }) if total == 0.0
        ));
        assert!(matches!(
            outcome_probabilities(1.0, -1.0, 0.2),
            Err(SimError::InvalidCoefficientPair { .. })
        ));
        assert!(matches!(
            outcome_probabilities(f64::INFINITY, 1.0, 0.2),
            Err(SimError::InvalidCoefficientPair { .. })
        ));
        assert!(matches!(
            outcome_probabilities(1.0, 1.0, 1.5),
            Err(SimError::InvalidDrawProbability(_))
        ));
    }

    #[test]
    fn test_model_validates_entries() {
        let bad = [CoefficientEntry::new("Bodo/Glimt", 0.0)];
        assert!(matches!(
            StrengthModel::new(&bad),
            Err(SimError::InvalidCoefficient { .. })
        ));

        let dup = [CoefficientEntry::new("Ajax", 60.0), CoefficientEntry::new("Ajax", 61.0)];
        assert!(matches!(
            StrengthModel::new(&dup),
            Err(SimError::DuplicateCoefficient(_))
        ));

        let nan = [CoefficientEntry::new("Ajax", f64::NAN)];
        assert!(StrengthModel::new(&nan).is_err());
    }

    #[test]
    fn test_missing_coefficient_is_reported_by_name() {
        let model = StrengthModel::new(&[CoefficientEntry::new("Inter", 101.0)]).unwrap();
        let mut teams = TeamRegistry::new();
        teams.intern("Inter");
        teams.intern("Slavia Praha");
        let err = ResolvedStrengths::new(&model, &teams, 0.2).unwrap_err();
        assert!(matches!(
            err,
            SimError::MissingCoefficient(team) if team == "Slavia Praha"
        ));
    }

    #[cfg(all(test, feature = "proptest"))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: valid inputs always give a proper distribution
            #[test]
            fn prop_probabilities_sum_to_one(
                a in 0.001f64..1000.0,
                b in 0.001f64..1000.0,
                d in 0.0f64..=1.0
            ) {
                let probs = outcome_probabilities(a, b, d).unwrap();
                prop_assert!(probs.home_win >= 0.0);
                prop_assert!(probs.draw >= 0.0);
                prop_assert!(probs.away_win >= 0.0);
                prop_assert!((probs.sum() - 1.0).abs() < 1e-9);
            }
        }
    }
}
