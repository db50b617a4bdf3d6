//! Season simulator: plays out every remaining fixture once and ranks the
//! final table.

use rand::Rng;

use crate::error::Result;
use crate::ledger::FixtureLedger;
use crate::models::TeamId;
use crate::resolver::{resolve, MatchOutcome};
use crate::strength::{OutcomeProbabilities, ResolvedStrengths};

/// Final points and 1-based ranks of one trial, both indexed by `TeamId`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialOutcome {
    pub points: Vec<u32>,
    pub ranks: Vec<usize>,
}

impl TrialOutcome {
    pub fn points_of(&self, team: TeamId) -> u32 {
        self.points[team.index()]
    }

    pub fn rank_of(&self, team: TeamId) -> usize {
        self.ranks[team.index()]
    }
}

/// Per-trial working state, reused across trials to avoid reallocating.
#[derive(Debug, Clone)]
pub struct TrialScratch {
    points: Vec<u32>,
    resolved: Vec<bool>,
    order: Vec<TeamId>,
    ranks: Vec<usize>,
}

impl TrialScratch {
    pub fn new(simulator: &SeasonSimulator<'_>) -> Self {
        let teams = simulator.ledger.team_count();
        Self {
            points: vec![0; teams],
            resolved: vec![false; simulator.ledger.remaining().len()],
            order: Vec::with_capacity(teams),
            ranks: vec![0; teams],
        }
    }

    pub fn points(&self) -> &[u32] {
        &self.points
    }

    pub fn ranks(&self) -> &[usize] {
        &self.ranks
    }

    pub fn to_outcome(&self) -> TrialOutcome {
        TrialOutcome {
            points: self.points.clone(),
            ranks: self.ranks.clone(),
        }
    }
}

/// Read-only simulation setup shared by every trial of a run.
#[derive(Debug, Clone)]
pub struct SeasonSimulator<'a> {
    ledger: &'a FixtureLedger,
    /// Distribution per remaining fixture, same indexing as the ledger arena.
    probabilities: Vec<OutcomeProbabilities>,
    starting_points: Vec<u32>,
    standing_order: Vec<TeamId>,
}

impl<'a> SeasonSimulator<'a> {
    pub fn new(ledger: &'a FixtureLedger, strengths: &ResolvedStrengths) -> Result<Self> {
        let probabilities = ledger
            .remaining()
            .iter()
            .map(|fixture| strengths.probabilities(fixture.home, fixture.away))
            .collect::<Result<Vec<_>>>()?;
        let starting_points = ledger.teams().ids().map(|team| ledger.points(team)).collect();
        let standing_order = ledger.standing_order().collect();
        Ok(Self {
            ledger,
            probabilities,
            starting_points,
            standing_order,
        })
    }

    pub fn ledger(&self) -> &FixtureLedger {
        self.ledger
    }

    pub fn team_count(&self) -> usize {
        self.starting_points.len()
    }

    pub fn scratch(&self) -> TrialScratch {
        TrialScratch::new(self)
    }

    pub fn simulate_one_trial<R: Rng>(&self, rng: &mut R) -> TrialOutcome {
        let mut scratch = self.scratch();
        self.simulate_one_trial_into(rng, &mut scratch);
        scratch.to_outcome()
    }

    pub fn simulate_one_trial_into<R: Rng>(&self, rng: &mut R, scratch: &mut TrialScratch) {
        self.run_trial(rng, scratch, |_, _| {});
    }

    /// Runs one trial, reporting every fixture as it is resolved.
    pub fn run_trial<R, F>(&self, rng: &mut R, scratch: &mut TrialScratch, mut on_resolved: F)
    where
        R: Rng,
        F: FnMut(usize, MatchOutcome),
    {
        scratch.points.copy_from_slice(&self.starting_points);
        scratch.resolved.iter_mut().for_each(|flag| *flag = false);

        let remaining = self.ledger.remaining();
        for &team in &self.standing_order {
            for &slot in self.ledger.opponents(team) {
                // Already played from the opponent's side.
                if scratch.resolved[slot] {
                    continue;
                }
                scratch.resolved[slot] = true;
                let fixture = remaining[slot];
                let outcome = resolve(
                    rng,
                    fixture.home,
                    fixture.away,
                    &self.probabilities[slot],
                    &mut scratch.points,
                );
                on_resolved(slot, outcome);
            }
        }

        // Stable sort: level teams keep their current standing order.
        scratch.order.clear();
        scratch.order.extend_from_slice(&self.standing_order);
        let points = &scratch.points;
        scratch.order.sort_by(|a, b| points[b.index()].cmp(&points[a.index()]));
        for (position, team) in scratch.order.iter().enumerate() {
            scratch.ranks[team.index()] = position + 1;
        }
    }
}
