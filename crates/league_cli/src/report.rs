//! Plain-text rendering of standings and projection tables.

use league_core::{LeagueProjection, OpponentRank, StandingReport, StandingRow};
use std::fmt::Write;

pub fn standing_table(rows: &[StandingRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>4}  {:<32} {:>3} {:>4} {:>4} {:>4} {:>5}",
        "Rank", "Team", "P", "Pts", "GF", "GA", "GD"
    );
    for (position, row) in rows.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>4}  {:<32} {:>3} {:>4} {:>4} {:>4} {:>+5}",
            position + 1,
            row.team,
            row.played,
            row.points,
            row.goals_for,
            row.goals_against,
            row.goal_difference()
        );
    }
    out
}

pub fn opponent_table(rows: &[OpponentRank]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>4}  {:<32} {:>8} {:>8}",
        "Rank", "Team", "Avg Opp", "Med Opp"
    );
    for (position, row) in rows.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>4}  {:<32} {:>8.2} {:>8}",
            position + 1,
            row.team,
            row.average_rank,
            row.median_rank
        );
    }
    out
}

pub fn render_standing(report: &StandingReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} after {} matches\n",
        report.competition, report.matches_played
    );
    out.push_str(&standing_table(&report.standing));
    if report.unreadable_scores > 0 {
        let _ = writeln!(
            out,
            "\n({} fixtures skipped: unreadable score)",
            report.unreadable_scores
        );
    }
    if !report.opponent_ranks.is_empty() {
        let _ = writeln!(out, "\nAverage Opponent Rank");
        out.push_str(&opponent_table(&report.opponent_ranks));
    }
    out
}

pub fn render_projection(projection: &LeagueProjection) -> String {
    let labels = &projection.band_labels;
    let result = &projection.result;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} after {} matches: {} trials, draw probability {:.2}, seed {}",
        projection.competition,
        projection.matches_played,
        result.trials,
        projection.draw_probability,
        result.seed
    );
    let _ = writeln!(
        out,
        "{} fixtures simulated per trial\n",
        projection.remaining_fixtures
    );

    let _ = writeln!(out, "Standing");
    out.push_str(&standing_table(&projection.standing));

    let _ = writeln!(out, "\nProbability by Points");
    let _ = writeln!(
        out,
        "{:>6} {:>14} {:>14} {:>14}",
        "Points", labels.qualification, labels.playoff, labels.elimination
    );
    for row in &result.points_bands {
        let _ = writeln!(
            out,
            "{:>6} {:>13.2}% {:>13.2}% {:>13.2}%",
            row.points,
            row.percentages.qualification,
            row.percentages.playoff,
            row.percentages.elimination
        );
    }

    let _ = writeln!(out, "\nAverage Points Ranking");
    for (position, team) in result.expected_points_ranking().iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>4}  {:<32} {:>8.2}",
            position + 1,
            team.team,
            team.expected_points
        );
    }

    let _ = writeln!(out, "\nQualification Probabilities per Team");
    let _ = writeln!(
        out,
        "{:<32} {:>14} {:>14} {:>14}",
        "Team", labels.qualification, labels.playoff, labels.elimination
    );
    for team in result.qualification_ranking() {
        let _ = writeln!(
            out,
            "{:<32} {:>13.2}% {:>13.2}% {:>13.2}%",
            team.team,
            team.percentages.qualification,
            team.percentages.playoff,
            team.percentages.elimination
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use league_core::{standing_report, CompetitionPreset, Fixture, Score};

    #[test]
    fn test_standing_table_lists_every_team() {
        let fixtures = vec![
            Fixture::played("Inter", "Ajax", Score::new(2, 0)),
            Fixture::from_raw("Bayer Leverkusen", "Copenhagen", Some("2-2")),
        ];
        let format = CompetitionPreset::ChampionsLeague.format();
        let report = standing_report(&fixtures, &format, 1).unwrap();
        let text = render_standing(&report);
        assert!(text.starts_with("UEFA Champions League after 1 matches"));
        let first_row = text.lines().nth(3).unwrap();
        assert!(first_row.contains("Inter"));
        assert!(first_row.ends_with("+2"));
        assert!(text.contains("Average Opponent Rank"));
    }
}
