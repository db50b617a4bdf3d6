//! Aggregator: runs N trials and reduces them to band counts, points
//! histograms and percentages.
//!
//! Trials are split into fixed-size chunks. Chunk `i` uses a ChaCha8 stream
//! `i` of the run seed, so the same seed gives the same result sequentially
//! or on any number of rayon workers.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use tracing::{debug, info};

use crate::config::SimulationConfig;
use crate::error::Result;
use crate::format::{Band, BandBoundaries};
use crate::season::SeasonSimulator;

/// Receives `(completed_trials, total_trials)` after each chunk.
pub trait ProgressObserver: Sync {
    fn on_progress(&self, completed: u64, total: u64);
}

impl<F> ProgressObserver for F
where
    F: Fn(u64, u64) + Sync,
{
    fn on_progress(&self, completed: u64, total: u64) {
        self(completed, total)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandCounts {
    pub qualification: u64,
    pub playoff: u64,
    pub elimination: u64,
}

impl BandCounts {
    fn from_array(counts: [u64; 3]) -> Self {
        Self {
            qualification: counts[0],
            playoff: counts[1],
            elimination: counts[2],
        }
    }

    pub fn get(&self, band: Band) -> u64 {
        match band {
            Band::Qualification => self.qualification,
            Band::Playoff => self.playoff,
            Band::Elimination => self.elimination,
        }
    }

    pub fn total(&self) -> u64 {
        self.qualification + self.playoff + self.elimination
    }

    /// Each count as a percentage of `denominator`.
    pub fn percentages(&self, denominator: u64) -> BandPercentages {
        if denominator == 0 {
            return BandPercentages::default();
        }
        let pct = |count: u64| 100.0 * count as f64 / denominator as f64;
        BandPercentages {
            qualification: pct(self.qualification),
            playoff: pct(self.playoff),
            elimination: pct(self.elimination),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BandPercentages {
    pub qualification: f64,
    pub playoff: f64,
    pub elimination: f64,
}

impl BandPercentages {
    pub fn sum(&self) -> f64 {
        self.qualification + self.playoff + self.elimination
    }
}

/// Outcome distribution of one team over all trials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamProjection {
    pub team: String,
    pub current_points: u32,
    pub current_rank: usize,
    pub bands: BandCounts,
    pub percentages: BandPercentages,
    pub expected_points: f64,
    pub min_points: u32,
    pub max_points: u32,
    /// Final points -> number of trials.
    pub points_histogram: BTreeMap<u32, u64>,
}

impl TeamProjection {
    /// Probability of finishing on exactly `points`.
    pub fn points_probability(&self, points: u32, trials: u64) -> f64 {
        let count = self.points_histogram.get(&points).copied().unwrap_or(0);
        count as f64 / trials as f64
    }
}

/// How often a final points total landed in each band, across all teams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointsBandRow {
    pub points: u32,
    pub cases: u64,
    pub bands: BandCounts,
    pub percentages: BandPercentages,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub trials: u64,
    pub seed: u64,
    /// In current standing order.
    pub teams: Vec<TeamProjection>,
    /// Ascending by points; only totals that occurred.
    pub points_bands: Vec<PointsBandRow>,
}

impl AggregateResult {
    pub fn team(&self, name: &str) -> Option<&TeamProjection> {
        self.teams.iter().find(|projection| projection.team == name)
    }

    /// Teams by expected points, best first.
    pub fn expected_points_ranking(&self) -> Vec<&TeamProjection> {
        let mut ranking: Vec<&TeamProjection> = self.teams.iter().collect();
        ranking.sort_by(|a, b| {
            b.expected_points.partial_cmp(&a.expected_points).unwrap_or(Ordering::Equal)
        });
        ranking
    }

    /// Teams by (qualification, play-off, elimination) percentage, descending.
    pub fn qualification_ranking(&self) -> Vec<&TeamProjection> {
        let mut ranking: Vec<&TeamProjection> = self.teams.iter().collect();
        ranking.sort_by(|a, b| {
            let key = |p: &TeamProjection| {
                (p.bands.qualification, p.bands.playoff, p.bands.elimination)
            };
            key(b).cmp(&key(a))
        });
        ranking
    }
}

/// Mergeable counters for a batch of trials. Histograms are dense, indexed by
/// points.
#[derive(Debug, Clone)]
struct TrialTally {
    team_bands: Vec<[u64; 3]>,
    team_points_sum: Vec<u64>,
    team_histograms: Vec<Vec<u64>>,
    points_bands: Vec<[u64; 3]>,
}

impl TrialTally {
    fn new(teams: usize, max_points: usize) -> Self {
        Self {
            team_bands: vec![[0; 3]; teams],
            team_points_sum: vec![0; teams],
            team_histograms: vec![vec![0; max_points + 1]; teams],
            points_bands: vec![[0; 3]; max_points + 1],
        }
    }

    #[inline]
    fn record(&mut self, points: &[u32], ranks: &[usize], bands: &BandBoundaries) {
        for (team, (&pts, &rank)) in points.iter().zip(ranks).enumerate() {
            let band = bands.band_for_rank(rank).index();
            let pts = pts as usize;
            self.team_bands[team][band] += 1;
            self.team_points_sum[team] += pts as u64;
            self.team_histograms[team][pts] += 1;
            self.points_bands[pts][band] += 1;
        }
    }

    fn merge(mut self, other: Self) -> Self {
        for (mine, theirs) in self.team_bands.iter_mut().zip(&other.team_bands) {
            for band in 0..3 {
                mine[band] += theirs[band];
            }
        }
        for (mine, theirs) in self.team_points_sum.iter_mut().zip(&other.team_points_sum) {
            *mine += theirs;
        }
        for (mine, theirs) in self.team_histograms.iter_mut().zip(&other.team_histograms) {
            for (a, b) in mine.iter_mut().zip(theirs) {
                *a += b;
            }
        }
        for (mine, theirs) in self.points_bands.iter_mut().zip(&other.points_bands) {
            for band in 0..3 {
                mine[band] += theirs[band];
            }
        }
        self
    }
}

pub struct Aggregator<'s, 'l> {
    simulator: &'s SeasonSimulator<'l>,
    bands: BandBoundaries,
    max_points: usize,
}

impl<'s, 'l> Aggregator<'s, 'l> {
    pub fn new(simulator: &'s SeasonSimulator<'l>, bands: BandBoundaries) -> Result<Self> {
        let ledger = simulator.ledger();
        bands.validate(ledger.team_count())?;
        let max_points = ledger
            .teams()
            .ids()
            .map(|team| ledger.points(team) as usize + 3 * ledger.opponents(team).len())
            .max()
            .unwrap_or(0);
        Ok(Self {
            simulator,
            bands,
            max_points,
        })
    }

    pub fn run(
        &self,
        config: &SimulationConfig,
        progress: Option<&dyn ProgressObserver>,
    ) -> Result<AggregateResult> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
        let chunks = config.chunk_count();
        info!(
            "Running {} trials in {} chunks (seed {}, parallel: {})",
            config.trials, chunks, seed, config.parallel
        );

        let completed = AtomicU64::new(0);
        let run_chunk = |chunk: u64| {
            let tally = self.run_chunk(seed, chunk, config);
            if let Some(observer) = progress {
                let trials = self.chunk_trials(chunk, config);
                let done = completed.fetch_add(trials, AtomicOrdering::Relaxed) + trials;
                observer.on_progress(done, config.trials);
            }
            tally
        };

        let teams = self.simulator.team_count();
        let tally = if config.parallel {
            (0..chunks)
                .into_par_iter()
                .map(run_chunk)
                .reduce(
                    || TrialTally::new(teams, self.max_points),
                    TrialTally::merge,
                )
        } else {
            (0..chunks)
                .map(run_chunk)
                .fold(TrialTally::new(teams, self.max_points), TrialTally::merge)
        };

        let result = self.finish(tally, config.trials, seed);
        debug!(
            "Aggregated {} points totals across {} teams",
            result.points_bands.len(),
            teams
        );
        Ok(result)
    }

    fn chunk_trials(&self, chunk: u64, config: &SimulationConfig) -> u64 {
        let start = chunk * config.chunk_size;
        config.chunk_size.min(config.trials - start)
    }

    fn run_chunk(&self, seed: u64, chunk: u64, config: &SimulationConfig) -> TrialTally {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(chunk);
        let mut tally = TrialTally::new(self.simulator.team_count(), self.max_points);
        let mut scratch = self.simulator.scratch();
        for _ in 0..self.chunk_trials(chunk, config) {
            self.simulator.simulate_one_trial_into(&mut rng, &mut scratch);
            tally.record(scratch.points(), scratch.ranks(), &self.bands);
        }
        tally
    }

    fn finish(&self, tally: TrialTally, trials: u64, seed: u64) -> AggregateResult {
        let ledger = self.simulator.ledger();
        let teams = ledger
            .standing_order()
            .map(|team| {
                let i = team.index();
                let bands = BandCounts::from_array(tally.team_bands[i]);
                let points_histogram: BTreeMap<u32, u64> = tally.team_histograms[i]
                    .iter()
                    .enumerate()
                    .filter(|(_, &count)| count > 0)
                    .map(|(points, &count)| (points as u32, count))
                    .collect();
                TeamProjection {
                    team: ledger.teams().name(team).to_string(),
                    current_points: ledger.points(team),
                    current_rank: ledger.current_rank(team),
                    bands,
                    percentages: bands.percentages(trials),
                    expected_points: tally.team_points_sum[i] as f64 / trials as f64,
                    min_points: points_histogram.keys().next().copied().unwrap_or(0),
                    max_points: points_histogram.keys().next_back().copied().unwrap_or(0),
                    points_histogram,
                }
            })
            .collect();

        let points_bands = tally
            .points_bands
            .iter()
            .enumerate()
            .filter(|(_, counts)| counts.iter().sum::<u64>() > 0)
            .map(|(points, &counts)| {
                let bands = BandCounts::from_array(counts);
                PointsBandRow {
                    points: points as u32,
                    cases: bands.total(),
                    bands,
                    percentages: bands.percentages(bands.total()),
                }
            })
            .collect();

        AggregateResult {
            trials,
            seed,
            teams,
            points_bands,
        }
    }
}
