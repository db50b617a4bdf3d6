//! Competition formats: how many rounds, how the fixture list is sliced into
//! rounds, how the table is ordered, and which ranks fall into which band.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Outcome band a final rank falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    Qualification,
    Playoff,
    Elimination,
}

impl Band {
    pub const ALL: [Band; 3] = [Band::Qualification, Band::Playoff, Band::Elimination];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Band::Qualification => 0,
            Band::Playoff => 1,
            Band::Elimination => 2,
        }
    }
}

/// Partition of ranks `1..=team_count` into three contiguous bands:
/// `1..=qualification_last`, `qualification_last+1..=playoff_last`, and the
/// rest. A band may be empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandBoundaries {
    pub qualification_last: usize,
    pub playoff_last: usize,
}

impl BandBoundaries {
    pub fn new(qualification_last: usize, playoff_last: usize) -> Self {
        Self {
            qualification_last,
            playoff_last,
        }
    }

    /// Checks that the bands are ordered and fit inside `team_count` ranks.
    pub fn validate(&self, team_count: usize) -> Result<()> {
        if self.qualification_last > self.playoff_last || self.playoff_last > team_count {
            return Err(SimError::InvalidBands {
                qualification_last: self.qualification_last,
                playoff_last: self.playoff_last,
                team_count,
            });
        }
        Ok(())
    }

    /// Band for a 1-based rank.
    #[inline]
    pub fn band_for_rank(&self, rank: usize) -> Band {
        if rank <= self.qualification_last {
            Band::Qualification
        } else if rank <= self.playoff_last {
            Band::Playoff
        } else {
            Band::Elimination
        }
    }
}

/// How teams level on points are ordered in the current standing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Points only; equal teams fall back to name order.
    PointsOnly,
    /// Points, then goal difference, then goals scored.
    GoalDifference,
}

/// Display names for the three bands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandLabels {
    pub qualification: String,
    pub playoff: String,
    pub elimination: String,
}

impl BandLabels {
    pub fn new(qualification: &str, playoff: &str, elimination: &str) -> Self {
        Self {
            qualification: qualification.to_string(),
            playoff: playoff.to_string(),
            elimination: elimination.to_string(),
        }
    }

    pub fn get(&self, band: Band) -> &str {
        match band {
            Band::Qualification => &self.qualification,
            Band::Playoff => &self.playoff,
            Band::Elimination => &self.elimination,
        }
    }
}

impl Default for BandLabels {
    fn default() -> Self {
        Self::new("Qualification", "Play-off", "Elimination")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitionFormat {
    pub name: String,
    /// Matches each team plays in the phase being projected.
    pub total_rounds: usize,
    /// Fixtures per completed round.
    pub round_size: usize,
    pub bands: BandBoundaries,
    pub tie_break: TieBreak,
    #[serde(default)]
    pub band_labels: BandLabels,
}

impl CompetitionFormat {
    pub fn new(
        name: impl Into<String>,
        total_rounds: usize,
        round_size: usize,
        bands: BandBoundaries,
        tie_break: TieBreak,
    ) -> Result<Self> {
        let format = Self {
            name: name.into(),
            total_rounds,
            round_size,
            bands,
            tie_break,
            band_labels: BandLabels::default(),
        };
        format.validate()?;
        Ok(format)
    }

    pub fn with_band_labels(mut self, labels: BandLabels) -> Self {
        self.band_labels = labels;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.total_rounds == 0 {
            return Err(SimError::InvalidFormat(format!(
                "{}: total_rounds must be > 0",
                self.name
            )));
        }
        if self.round_size == 0 {
            return Err(SimError::InvalidFormat(format!(
                "{}: round_size must be > 0",
                self.name
            )));
        }
        if self.bands.qualification_last > self.bands.playoff_last {
            return Err(SimError::InvalidFormat(format!(
                "{}: qualification band ends after play-off band",
                self.name
            )));
        }
        Ok(())
    }

    /// Number of fixtures in the full phase.
    pub fn fixture_count(&self) -> usize {
        self.total_rounds * self.round_size
    }

    /// Index of the first fixture not yet played after `matches_played` rounds.
    pub fn cutoff(&self, matches_played: usize) -> Result<usize> {
        if matches_played > self.total_rounds {
            return Err(SimError::MatchesPlayedOutOfRange {
                matches_played,
                total_rounds: self.total_rounds,
            });
        }
        Ok(matches_played * self.round_size)
    }

    /// Highest points total a team can reach in this format.
    pub fn max_points(&self) -> u32 {
        3 * self.total_rounds as u32
    }
}

/// Competitions with a known format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompetitionPreset {
    ChampionsLeague,
    EuropaLeague,
    ConferenceLeague,
    SerieA,
    Ligue1,
    Bundesliga,
    PremierLeague,
    LaLiga,
}

impl CompetitionPreset {
    pub const ALL: [CompetitionPreset; 8] = [
        CompetitionPreset::ChampionsLeague,
        CompetitionPreset::EuropaLeague,
        CompetitionPreset::ConferenceLeague,
        CompetitionPreset::SerieA,
        CompetitionPreset::Ligue1,
        CompetitionPreset::Bundesliga,
        CompetitionPreset::PremierLeague,
        CompetitionPreset::LaLiga,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            CompetitionPreset::ChampionsLeague => "UEFA Champions League",
            CompetitionPreset::EuropaLeague => "UEFA Europa League",
            CompetitionPreset::ConferenceLeague => "UEFA Europa Conference League",
            CompetitionPreset::SerieA => "Italian Serie A",
            CompetitionPreset::Ligue1 => "French Ligue 1",
            CompetitionPreset::Bundesliga => "German Bundesliga",
            CompetitionPreset::PremierLeague => "English Premier League",
            CompetitionPreset::LaLiga => "Spanish La Liga",
        }
    }

    /// (teams, rounds) of the phase.
    fn shape(self) -> (usize, usize) {
        match self {
            CompetitionPreset::ChampionsLeague | CompetitionPreset::EuropaLeague => (36, 8),
            CompetitionPreset::ConferenceLeague => (36, 6),
            CompetitionPreset::SerieA
            | CompetitionPreset::PremierLeague
            | CompetitionPreset::LaLiga => (20, 38),
            CompetitionPreset::Ligue1 | CompetitionPreset::Bundesliga => (18, 34),
        }
    }

    pub fn is_league_phase(self) -> bool {
        matches!(
            self,
            CompetitionPreset::ChampionsLeague
                | CompetitionPreset::EuropaLeague
                | CompetitionPreset::ConferenceLeague
        )
    }

    pub fn format(self) -> CompetitionFormat {
        let (teams, rounds) = self.shape();
        let round_size = teams / 2;
        let (bands, tie_break, labels) = if self.is_league_phase() {
            (BandBoundaries::new(8, 24), TieBreak::PointsOnly, BandLabels::default())
        } else {
            let (europe_last, safe_last) = match self {
                CompetitionPreset::Ligue1 => (3, 15),
                CompetitionPreset::Bundesliga => (4, 15),
                _ => (4, 17),
            };
            (
                BandBoundaries::new(europe_last, safe_last),
                TieBreak::GoalDifference,
                BandLabels::new("Champions League", "Mid-table", "Relegation"),
            )
        };
        CompetitionFormat {
            name: self.display_name().to_string(),
            total_rounds: rounds,
            round_size,
            bands,
            tie_break,
            band_labels: labels,
        }
    }

    /// Team count the preset expects; used to sanity-check loaded data.
    pub fn team_count(self) -> usize {
        self.shape().0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bands_partition_ranks() {
        let bands = BandBoundaries::new(8, 24);
        bands.validate(36).unwrap();
        let counts = (1..=36).fold([0usize; 3], |mut acc, rank| {
            acc[bands.band_for_rank(rank).index()] += 1;
            acc
        });
        assert_eq!(counts, [8, 16, 12]);
        assert_eq!(bands.band_for_rank(8), Band::Qualification);
        assert_eq!(bands.band_for_rank(9), Band::Playoff);
        assert_eq!(bands.band_for_rank(25), Band::Elimination);
    }

    #[test]
    fn test_bands_rejected_when_too_wide() {
        assert!(BandBoundaries::new(8, 24).validate(20).is_err());
        assert!(BandBoundaries::new(10, 4).validate(20).is_err());
        assert!(BandBoundaries::new(0, 0).validate(4).is_ok());
    }

    #[test]
    fn test_cutoff_rejects_too_many_rounds() {
        let format = CompetitionPreset::ChampionsLeague.format();
        assert_eq!(format.cutoff(3).unwrap(), 54);
        assert_eq!(format.cutoff(8).unwrap(), 144);
        assert!(matches!(
            format.cutoff(9),
            Err(SimError::MatchesPlayedOutOfRange {
                matches_played: 9,
                total_rounds: 8,
            })
        ));
    }

    #[test]
    fn test_presets_are_consistent() {
        for preset in CompetitionPreset::ALL {
            let format = preset.format();
            format.validate().unwrap();
            format.bands.validate(preset.team_count()).unwrap();
            assert_eq!(format.round_size * 2, preset.team_count());
        }
        assert_eq!(
            CompetitionPreset::ConferenceLeague.format().max_points(),
            18
        );
        assert_eq!(
            CompetitionPreset::SerieA.format().tie_break,
            TieBreak::GoalDifference
        );
    }

    #[test]
    fn test_format_new_rejects_zero_round_size() {
        let result =
            CompetitionFormat::new("Cup", 3, 0, BandBoundaries::new(1, 2), TieBreak::PointsOnly);
        assert!(matches!(result, Err(SimError::InvalidFormat(_))));
    }

    #[test]
    fn test_custom_band_labels() {
        let format =
            CompetitionFormat::new("Cup", 3, 2, BandBoundaries::new(1, 2), TieBreak::PointsOnly)
                .unwrap()
                .with_band_labels(BandLabels::new("Final", "Semi-final", "Out"));
        assert_eq!(format.band_labels.get(Band::Playoff), "Semi-final");
        assert_eq!(BandLabels::default().get(Band::Elimination), "Elimination");
    }
}
