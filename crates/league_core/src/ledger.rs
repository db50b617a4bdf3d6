//! Fixture ledger: the current standing and, per team, the fixtures still to
//! be simulated.
//!
//! Remaining fixtures live once in an arena; each team holds indices into it.
//! Trials never touch the ledger, they only keep their own resolved flags.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, warn};

use crate::error::{Result, SimError};
use crate::format::{CompetitionFormat, TieBreak};
use crate::models::{Fixture, FixtureResult, TeamId, TeamRegistry};

/// One team's line in the current table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingRow {
    pub team: String,
    #[serde(skip)]
    pub team_id: TeamId,
    pub played: u32,
    pub points: u32,
    pub goals_for: u32,
    pub goals_against: u32,
}

impl StandingRow {
    fn new(team: &str, team_id: TeamId) -> Self {
        Self {
            team: team.to_string(),
            team_id,
            played: 0,
            points: 0,
            goals_for: 0,
            goals_against: 0,
        }
    }

    pub fn goal_difference(&self) -> i64 {
        self.goals_for as i64 - self.goals_against as i64
    }
}

/// Orders two rows best-first under the given tie-break rule.
fn compare_rows(a: &StandingRow, b: &StandingRow, tie_break: TieBreak) -> Ordering {
    let by_points = b.points.cmp(&a.points);
    let by_goals = match tie_break {
        TieBreak::PointsOnly => Ordering::Equal,
        TieBreak::GoalDifference => b
            .goal_difference()
            .cmp(&a.goal_difference())
            .then_with(|| b.goals_for.cmp(&a.goals_for)),
    };
    by_points.then(by_goals).then_with(|| a.team.cmp(&b.team))
}

/// Median of `ranks`, halves rounded to the even neighbour.
fn median_rank(ranks: &mut [usize]) -> usize {
    if ranks.is_empty() {
        return 0;
    }
    ranks.sort_unstable();
    let mid = ranks.len() / 2;
    let median = if ranks.len() % 2 == 0 {
        (ranks[mid - 1] + ranks[mid]) as f64 / 2.0
    } else {
        ranks[mid] as f64
    };
    median.round_ties_even() as usize
}

/// A fixture that each trial must resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemainingFixture {
    pub home: TeamId,
    pub away: TeamId,
}

/// Average and median current rank of the opponents a team has already met.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpponentRank {
    pub team: String,
    pub average_rank: f64,
    pub median_rank: usize,
}

#[derive(Debug, Clone)]
pub struct FixtureLedger {
    teams: TeamRegistry,
    matches_played: usize,
    cutoff: usize,
    /// Sorted best-first.
    standing: Vec<StandingRow>,
    /// `TeamId` -> position in `standing`.
    standing_position: Vec<usize>,
    remaining: Vec<RemainingFixture>,
    opponents: Vec<Vec<usize>>,
    faced: Vec<Vec<TeamId>>,
    unreadable: usize,
    unscored: usize,
}

impl FixtureLedger {
    /// Builds the standing after `matches_played` rounds and the per-team list
    /// of fixtures left to simulate.
    pub fn build(
        fixtures: &[Fixture],
        format: &CompetitionFormat,
        matches_played: usize,
    ) -> Result<Self> {
        format.validate()?;
        let cutoff = format.cutoff(matches_played)?;
        let fixtures = &fixtures[..fixtures.len().min(format.fixture_count())];

        let mut teams = TeamRegistry::new();
        for fixture in fixtures {
            if fixture.home == fixture.away {
                return Err(SimError::SelfFixture(fixture.home.clone()));
            }
            teams.intern(&fixture.home);
            teams.intern(&fixture.away);
        }

        let mut rows: Vec<StandingRow> =
            teams.ids().map(|id| StandingRow::new(teams.name(id), id)).collect();
        let mut remaining = Vec::new();
        let mut opponents = vec![Vec::new(); teams.len()];
        let mut faced = vec![Vec::new(); teams.len()];
        let mut unreadable = 0;
        let mut unscored = 0;

        for (index, fixture) in fixtures.iter().enumerate() {
            let home = teams.intern(&fixture.home);
            let away = teams.intern(&fixture.away);
            let known = index < cutoff;

            match (&fixture.result, known) {
                (FixtureResult::Played(score), true) => {
                    let (home_points, away_points) = score.points();
                    let home_row = &mut rows[home.index()];
                    home_row.played += 1;
                    home_row.points += home_points;
                    home_row.goals_for += score.home_goals;
                    home_row.goals_against += score.away_goals;
                    let away_row = &mut rows[away.index()];
                    away_row.played += 1;
                    away_row.points += away_points;
                    away_row.goals_for += score.away_goals;
                    away_row.goals_against += score.home_goals;
                    faced[home.index()].push(away);
                    faced[away.index()].push(home);
                }
                (FixtureResult::Unreadable(raw), true) => {
                    warn!(
                        "Skipping unreadable score '{}' for {} vs {}",
                        raw, fixture.home, fixture.away
                    );
                    unreadable += 1;
                }
                // Known rounds without a score are neither counted nor simulated.
                (FixtureResult::Pending, true) => {
                    debug!(
                        "No score for {} vs {} in a completed round",
                        fixture.home, fixture.away
                    );
                    unscored += 1;
                }
                (_, false) => {
                    let slot = remaining.len();
                    remaining.push(RemainingFixture { home, away });
                    opponents[home.index()].push(slot);
                    opponents[away.index()].push(slot);
                }
            }
        }

        rows.sort_by(|a, b| compare_rows(a, b, format.tie_break));
        let mut standing_position = vec![0; rows.len()];
        for (position, row) in rows.iter().enumerate() {
            standing_position[row.team_id.index()] = position;
        }

        debug!(
            "Built ledger for {}: {} teams, {} known fixtures, {} remaining, {} unreadable, \
             {} unscored",
            format.name,
            teams.len(),
            cutoff.min(fixtures.len()),
            remaining.len(),
            unreadable,
            unscored
        );

        Ok(Self {
            teams,
            matches_played,
            cutoff,
            standing: rows,
            standing_position,
            remaining,
            opponents,
            faced,
            unreadable,
            unscored,
        })
    }

    pub fn teams(&self) -> &TeamRegistry {
        &self.teams
    }

    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    pub fn matches_played(&self) -> usize {
        self.matches_played
    }

    pub fn cutoff(&self) -> usize {
        self.cutoff
    }

    /// Current table, best first.
    pub fn standing(&self) -> &[StandingRow] {
        &self.standing
    }

    pub fn row(&self, team: TeamId) -> &StandingRow {
        &self.standing[self.standing_position[team.index()]]
    }

    pub fn points(&self, team: TeamId) -> u32 {
        self.row(team).points
    }

    /// 1-based rank in the current table.
    pub fn current_rank(&self, team: TeamId) -> usize {
        self.standing_position[team.index()] + 1
    }

    /// Teams in current standing order.
    pub fn standing_order(&self) -> impl Iterator<Item = TeamId> + '_ {
        self.standing.iter().map(|row| row.team_id)
    }

    pub fn remaining(&self) -> &[RemainingFixture] {
        &self.remaining
    }

    /// Arena indices of `team`'s remaining fixtures, in fixture-list order.
    pub fn opponents(&self, team: TeamId) -> &[usize] {
        &self.opponents[team.index()]
    }

    /// Remaining opponents of `team` as ids.
    pub fn remaining_opponents(&self, team: TeamId) -> Vec<TeamId> {
        self.opponents(team)
            .iter()
            .map(|&slot| {
                let fixture = self.remaining[slot];
                if fixture.home == team {
                    fixture.away
                } else {
                    fixture.home
                }
            })
            .collect()
    }

    /// Fixtures before the cutoff whose score could not be parsed.
    pub fn unreadable_count(&self) -> usize {
        self.unreadable
    }

    /// Fixtures in completed rounds that carry no score at all.
    pub fn unscored_count(&self) -> usize {
        self.unscored
    }

    /// Opponent difficulty so far: ranks of already-faced opponents in the
    /// current table, easiest schedule last. Teams that have not played are
    /// left out.
    pub fn opponent_ranks(&self) -> Vec<OpponentRank> {
        let mut summary: Vec<OpponentRank> = self
            .teams
            .ids()
            .filter(|team| !self.faced[team.index()].is_empty())
            .map(|team| {
                let mut ranks: Vec<usize> = self.faced[team.index()]
                    .iter()
                    .map(|&opponent| self.current_rank(opponent))
                    .collect();
                let average_rank = ranks.iter().sum::<usize>() as f64 / ranks.len() as f64;
                OpponentRank {
                    team: self.teams.name(team).to_string(),
                    average_rank,
                    median_rank: median_rank(&mut ranks),
                }
            })
            .collect();
        summary.sort_by(|a, b| {
            a.average_rank
                .partial_cmp(&b.average_rank)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.team.cmp(&b.team))
        });
        summary
    }
}
