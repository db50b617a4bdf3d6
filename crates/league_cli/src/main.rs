//! league-sim
//!
//! Projects final league tables from a fixture CSV and a coefficient CSV.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use league_cli::{
    init_tracing, load_coefficients, load_fixtures, render_projection, render_standing,
};
use league_core::{
    project_league_with_progress, standing_report, CompetitionFormat, CompetitionPreset,
    ProjectionRequest, SimulationConfig,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "league-sim")]
#[command(about = "Monte Carlo projection of league standings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate the remaining fixtures and print band probabilities
    Project {
        #[command(flatten)]
        table: TableArgs,

        /// Coefficient CSV (`Team,Pts`)
        #[arg(long)]
        coefficients: PathBuf,

        /// Number of trials
        #[arg(long, default_value_t = league_core::config::DEFAULT_TRIALS)]
        trials: u64,

        /// Draw probability shared by every fixture
        #[arg(long, default_value_t = league_core::strength::DEFAULT_DRAW_PROBABILITY)]
        draw_probability: f64,

        /// Fixed seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,

        /// Run every trial on the calling thread
        #[arg(long, default_value = "false")]
        sequential: bool,

        /// Print the projection as JSON instead of tables
        #[arg(long, default_value = "false")]
        json: bool,

        /// Also write the JSON projection to this file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Print the current standing and opponent difficulty only
    Standing {
        #[command(flatten)]
        table: TableArgs,

        /// Print the report as JSON instead of tables
        #[arg(long, default_value = "false")]
        json: bool,
    },
}

#[derive(Args)]
struct TableArgs {
    /// Fixture CSV (`Home Team,Away Team,Score`)
    #[arg(long)]
    fixtures: PathBuf,

    /// Competition format
    #[arg(long, value_enum)]
    format: Competition,

    /// Completed rounds; fixtures after them are simulated
    #[arg(long)]
    matches_played: usize,

    /// Override the last rank of the qualification band
    #[arg(long)]
    qualification_last: Option<usize>,

    /// Override the last rank of the play-off band
    #[arg(long)]
    playoff_last: Option<usize>,
}

impl TableArgs {
    fn competition_format(&self) -> CompetitionFormat {
        let mut format = self.format.preset().format();
        if let Some(last) = self.qualification_last {
            format.bands.qualification_last = last;
        }
        if let Some(last) = self.playoff_last {
            format.bands.playoff_last = last;
        }
        format
    }

    fn check_team_count(&self, teams: usize) {
        let expected = self.format.preset().team_count();
        if teams != expected {
            warn!(
                "Fixture list has {} teams, {} expected for this format",
                teams, expected
            );
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Competition {
    ChampionsLeague,
    EuropaLeague,
    ConferenceLeague,
    SerieA,
    Ligue1,
    Bundesliga,
    PremierLeague,
    LaLiga,
}

impl Competition {
    fn preset(self) -> CompetitionPreset {
        match self {
            Competition::ChampionsLeague => CompetitionPreset::ChampionsLeague,
            Competition::EuropaLeague => CompetitionPreset::EuropaLeague,
            Competition::ConferenceLeague => CompetitionPreset::ConferenceLeague,
            Competition::SerieA => CompetitionPreset::SerieA,
            Competition::Ligue1 => CompetitionPreset::Ligue1,
            Competition::Bundesliga => CompetitionPreset::Bundesliga,
            Competition::PremierLeague => CompetitionPreset::PremierLeague,
            Competition::LaLiga => CompetitionPreset::LaLiga,
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Project {
            table,
            coefficients,
            trials,
            draw_probability,
            seed,
            sequential,
            json,
            output,
        } => {
            let format = table.competition_format();
            let fixtures = load_fixtures(&table.fixtures)?;
            let coefficients = load_coefficients(&coefficients)?;
            info!(
                "Loaded {} fixtures and {} coefficients",
                fixtures.len(),
                coefficients.len()
            );

            let mut config = SimulationConfig::default()
                .with_trials(trials)
                .with_draw_probability(draw_probability);
            if let Some(seed) = seed {
                config = config.with_seed(seed);
            }
            if sequential {
                config = config.sequential();
            }

            let request = ProjectionRequest {
                format,
                matches_played: table.matches_played,
                fixtures,
                coefficients,
                config,
            };

            let last_decile = AtomicU64::new(0);
            let progress = |completed: u64, total: u64| {
                let decile = completed * 10 / total.max(1);
                if last_decile.fetch_max(decile, Ordering::Relaxed) < decile {
                    info!("{}% of trials done ({}/{})", decile * 10, completed, total);
                }
            };
            let projection = project_league_with_progress(&request, Some(&progress))
                .context("Projection failed")?;
            table.check_team_count(projection.standing.len());

            if let Some(path) = output {
                save_json(&path, &projection)?;
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&projection)?);
            } else {
                print!("{}", render_projection(&projection));
            }
        }

        Commands::Standing { table, json } => {
            let format = table.competition_format();
            let fixtures = load_fixtures(&table.fixtures)?;
            let report = standing_report(&fixtures, &format, table.matches_played)
                .context("Failed to build standing")?;
            table.check_team_count(report.standing.len());

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render_standing(&report));
            }
        }
    }

    Ok(())
}

fn save_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write projection: {}", path.display()))?;
    info!("Projection saved to {}", path.display());
    Ok(())
}
