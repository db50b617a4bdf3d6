//! Resolves one fixture with a single weighted draw.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::TeamId;
use crate::strength::{outcome_probabilities, OutcomeProbabilities};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    HomeWin,
    Draw,
    AwayWin,
}

impl MatchOutcome {
    /// Points credited to (home, away).
    pub fn points(self) -> (u32, u32) {
        match self {
            MatchOutcome::HomeWin => (3, 0),
            MatchOutcome::Draw => (1, 1),
            MatchOutcome::AwayWin => (0, 3),
        }
    }
}

/// Draws an outcome from `probabilities` without touching any tally.
#[inline]
pub fn draw_outcome<R: Rng>(rng: &mut R, probabilities: &OutcomeProbabilities) -> MatchOutcome {
    let roll: f64 = rng.gen();
    if roll < probabilities.home_win {
        MatchOutcome::HomeWin
    } else if roll < probabilities.home_win + probabilities.draw {
        MatchOutcome::Draw
    } else {
        MatchOutcome::AwayWin
    }
}

/// Draws an outcome and credits it to `points` (indexed by `TeamId`).
/// Must be called once per fixture per trial.
#[inline]
pub fn resolve<R: Rng>(
    rng: &mut R,
    home: TeamId,
    away: TeamId,
    probabilities: &OutcomeProbabilities,
    points: &mut [u32],
) -> MatchOutcome {
    let outcome = draw_outcome(rng, probabilities);
    let (home_points, away_points) = outcome.points();
    points[home.index()] += home_points;
    points[away.index()] += away_points;
    outcome
}

/// Same as [`resolve`], computing the distribution from raw coefficients.
pub fn resolve_with_coefficients<R: Rng>(
    rng: &mut R,
    home: TeamId,
    away: TeamId,
    coeff_home: f64,
    coeff_away: f64,
    draw_probability: f64,
    points: &mut [u32],
) -> Result<MatchOutcome> {
    let probabilities = outcome_probabilities(coeff_home, coeff_away, draw_probability)?;
    Ok(resolve(rng, home, away, &probabilities, points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_points_credited() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut points = vec![6, 3];
        let outcome =
            resolve_with_coefficients(&mut rng, TeamId(0), TeamId(1), 1.0, 1.0, 0.2, &mut points)
                .unwrap();
        let expected = match outcome {
            MatchOutcome::HomeWin => vec![9, 3],
            MatchOutcome::Draw => vec![7, 4],
            MatchOutcome::AwayWin => vec![6, 6],
        };
        assert_eq!(points, expected);
    }

    #[test]
    fn test_degenerate_distributions() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let always_draw = OutcomeProbabilities {
            home_win: 0.0,
            draw: 1.0,
            away_win: 0.0,
        };
        let always_home = OutcomeProbabilities {
            home_win: 1.0,
            draw: 0.0,
            away_win: 0.0,
        };
        for _ in 0..1_000 {
            assert_eq!(draw_outcome(&mut rng, &always_draw), MatchOutcome::Draw);
            assert_eq!(draw_outcome(&mut rng, &always_home), MatchOutcome::HomeWin);
        }
    }

    #[test]
    fn test_frequencies_follow_probabilities() {
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let probs = outcome_probabilities(3.0, 1.0, 0.2).unwrap();
        let mut counts = [0u32; 3];
        let n = 200_000;
        for _ in 0..n {
            match draw_outcome(&mut rng, &probs) {
                MatchOutcome::HomeWin => counts[0] += 1,
                MatchOutcome::Draw => counts[1] += 1,
                MatchOutcome::AwayWin => counts[2] += 1,
            }
        }
        let share = |c: u32| c as f64 / n as f64;
        assert!((share(counts[0]) - 0.6).abs() < 0.01);
        assert!((share(counts[1]) - 0.2).abs() < 0.01);
        assert!((share(counts[2]) - 0.2).abs() < 0.01);
    }

    #[test]
    fn test_invalid_coefficients_surface_as_errors() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut points = vec![0, 0];
        let result =
            resolve_with_coefficients(&mut rng, TeamId(0), TeamId(1), 0.0, 0.0, 0.2, &mut points);
        assert!(result.is_err());
        assert_eq!(points, vec![0, 0]);
    }
}
