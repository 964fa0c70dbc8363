use std::collections::HashMap;

use serde::Serialize;

use crate::data_loader::{parse_result, ResultGrid};
use crate::error::LigaError;

// Season statistics for one team. Serialized column names match the original
// league files (PJ/PG/PE/PP/GF/GC/DIF/PTS).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TeamRecord {
    #[serde(rename = "PJ")]
    pub played: u32,
    #[serde(rename = "PG")]
    pub won: u32,
    #[serde(rename = "PE")]
    pub drawn: u32,
    #[serde(rename = "PP")]
    pub lost: u32,
    #[serde(rename = "GF")]
    pub goals_for: u32,
    #[serde(rename = "GC")]
    pub goals_against: u32,
    #[serde(rename = "DIF")]
    pub goal_difference: i32,
    #[serde(rename = "PTS")]
    pub points: u32,
}

impl TeamRecord {
    // Folds one completed fixture into the record, seen from this team's
    // side. Goal difference is refreshed on every mutation; it is never
    // independent ground truth.
    pub(crate) fn add_result(&mut self, scored: u32, conceded: u32) {
        self.played += 1;
        self.goals_for += scored;
        self.goals_against += conceded;

        if scored > conceded {
            self.won += 1;
            self.points += 3;
        } else if scored < conceded {
            self.lost += 1;
        } else {
            self.drawn += 1;
            self.points += 1;
        }

        self.goal_difference = self.goals_for as i32 - self.goals_against as i32;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StandingRow {
    #[serde(rename = "EQUIPO")]
    pub team: String,
    #[serde(flatten)]
    pub record: TeamRecord,
}

// Ordered standings, rank = 1-based position. After build_table the rows are
// sorted by points only; resolve_ranking settles the order inside each tie
// group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StandingsTable {
    pub rows: Vec<StandingRow>,
}

// Accumulated head-to-head data for one unordered pair of teams. `first` is
// the pair's canonical member, fixed when the index is built: the team that
// appears earlier in the grid's team list.
#[derive(Debug, Clone)]
pub struct HeadToHead {
    pub first: usize,
    pub second: usize,
    pub goals_first: u32,
    pub goals_second: u32,
    pub encounters: u32,
}

impl HeadToHead {
    // Positive favors the canonical first member.
    pub fn goal_average(&self) -> i32 {
        self.goals_first as i32 - self.goals_second as i32
    }
}

#[derive(Debug, Clone, Default)]
pub struct HeadToHeadIndex {
    entries: HashMap<(usize, usize), HeadToHead>,
}

impl HeadToHeadIndex {
    fn new(team_count: usize) -> Self {
        let mut entries = HashMap::new();
        for first in 0..team_count {
            for second in first + 1..team_count {
                entries.insert(
                    (first, second),
                    HeadToHead {
                        first,
                        second,
                        goals_first: 0,
                        goals_second: 0,
                        encounters: 0,
                    },
                );
            }
        }
        Self { entries }
    }

    pub fn pair(&self, a: usize, b: usize) -> Option<&HeadToHead> {
        self.entries.get(&(a.min(b), a.max(b)))
    }

    fn record(&mut self, home: usize, away: usize, home_goals: u32, away_goals: u32) {
        if let Some(entry) = self.entries.get_mut(&(home.min(away), home.max(away))) {
            if entry.first == home {
                entry.goals_first += home_goals;
                entry.goals_second += away_goals;
            } else {
                entry.goals_first += away_goals;
                entry.goals_second += home_goals;
            }
            entry.encounters += 1;
        }
    }
}

// The aggregation pass: one row per team, every played cell folded into both
// sides' records and into the head-to-head index. The returned table is
// sorted by points descending and nothing else; ties are expected and left
// for the resolver. A malformed cell aborts the whole pass.
pub fn build_table(grid: &ResultGrid) -> Result<(StandingsTable, HeadToHeadIndex), LigaError> {
    let teams = grid.teams();
    let mut records = vec![TeamRecord::default(); teams.len()];
    let mut head_to_head = HeadToHeadIndex::new(teams.len());

    for home in 0..teams.len() {
        for away in 0..teams.len() {
            if home == away {
                continue;
            }
            let Some(raw) = grid.result(home, away) else {
                continue;
            };
            let (home_goals, away_goals) = parse_result(&teams[home], &teams[away], raw)?;

            records[home].add_result(home_goals, away_goals);
            records[away].add_result(away_goals, home_goals);
            head_to_head.record(home, away, home_goals, away_goals);
        }
    }

    let mut rows: Vec<StandingRow> = teams
        .iter()
        .cloned()
        .zip(records)
        .map(|(team, record)| StandingRow { team, record })
        .collect();
    rows.sort_by(|a, b| b.record.points.cmp(&a.record.points));

    Ok((StandingsTable { rows }, head_to_head))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::Rng;

    fn grid(teams: &[&str], results: &[(&str, &str, &str)]) -> ResultGrid {
        let mut grid = ResultGrid::empty(teams.iter().map(|s| s.to_string()).collect());
        for (home, away, score) in results {
            grid.set_result(home, away, score).unwrap();
        }
        grid
    }

    fn record_of<'a>(table: &'a StandingsTable, team: &str) -> &'a TeamRecord {
        &table
            .rows
            .iter()
            .find(|row| row.team == team)
            .unwrap()
            .record
    }

    #[test]
    fn aggregates_wins_draws_and_losses() {
        let g = grid(
            &["A", "B", "C"],
            &[("A", "B", "2-1"), ("B", "C", "0-0"), ("C", "A", "1-3")],
        );
        let (table, _) = build_table(&g).unwrap();

        let a = record_of(&table, "A");
        assert_eq!((a.played, a.won, a.drawn, a.lost), (2, 2, 0, 0));
        assert_eq!((a.goals_for, a.goals_against), (5, 2));
        assert_eq!((a.goal_difference, a.points), (3, 6));

        let b = record_of(&table, "B");
        assert_eq!((b.played, b.won, b.drawn, b.lost), (2, 0, 1, 1));
        assert_eq!((b.goal_difference, b.points), (-1, 1));

        let c = record_of(&table, "C");
        assert_eq!((c.played, c.won, c.drawn, c.lost), (2, 0, 1, 1));
        assert_eq!((c.goal_difference, c.points), (-2, 1));

        assert_eq!(table.rows[0].team, "A");
    }

    #[test]
    fn table_is_sorted_by_points_descending() {
        let g = grid(
            &["A", "B", "C", "D"],
            &[("A", "B", "1-0"), ("C", "D", "2-2"), ("B", "D", "0-1")],
        );
        let (table, _) = build_table(&g).unwrap();

        let points: Vec<u32> = table.rows.iter().map(|r| r.record.points).collect();
        let mut sorted = points.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(points, sorted);
    }

    #[test]
    fn head_to_head_orientation_is_stable() {
        // B is canonical first of the {B, D} pair: grid order is alphabetical.
        let g = grid(&["D", "B", "Z"], &[("D", "B", "0-2"), ("B", "D", "1-1")]);
        let (_, h2h) = build_table(&g).unwrap();

        let b = g.team_index("B").unwrap();
        let d = g.team_index("D").unwrap();
        let entry = h2h.pair(d, b).unwrap();

        assert_eq!(entry.first, b);
        assert_eq!(entry.encounters, 2);
        assert_eq!((entry.goals_first, entry.goals_second), (3, 1));
        assert_eq!(entry.goal_average(), 2);
    }

    #[test]
    fn malformed_cell_aborts_aggregation() {
        // A hand-edited file bypasses set_result validation.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("liga.csv");
        std::fs::write(&path, ",A,B\nA,,abc\nB,,\n").unwrap();
        let g = ResultGrid::load(&path).unwrap();

        assert!(matches!(
            build_table(&g).unwrap_err(),
            LigaError::MalformedResult { home, away, raw }
                if home == "A" && away == "B" && raw == "abc"
        ));
    }

    #[test]
    fn single_team_grid_is_a_one_row_table() {
        let g = grid(&["A"], &[]);
        let (table, _) = build_table(&g).unwrap();

        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].record, TeamRecord::default());
    }

    #[test]
    fn empty_grid_is_an_empty_table() {
        let g = grid(&[], &[]);
        let (table, _) = build_table(&g).unwrap();
        assert!(table.rows.is_empty());
    }

    #[test]
    fn points_sum_and_goal_difference_invariants_hold_on_random_grids() {
        let mut rng = rand::rng();

        for _ in 0..50 {
            let teams = ["A", "B", "C", "D", "E", "F"];
            let mut g = grid(&teams, &[]);
            let mut decisive = 0u32;
            let mut drawn = 0u32;

            for home in teams {
                for away in teams {
                    if home == away || !rng.random_bool(0.6) {
                        continue;
                    }
                    let hg: u32 = rng.random_range(0..6);
                    let ag: u32 = rng.random_range(0..6);
                    g.set_result(home, away, &format!("{hg}-{ag}")).unwrap();
                    if hg == ag {
                        drawn += 1;
                    } else {
                        decisive += 1;
                    }
                }
            }

            let (table, _) = build_table(&g).unwrap();
            let total_points: u32 = table.rows.iter().map(|r| r.record.points).sum();
            assert_eq!(total_points, 3 * decisive + 2 * drawn);

            for row in &table.rows {
                assert_eq!(
                    row.record.goal_difference,
                    row.record.goals_for as i32 - row.record.goals_against as i32
                );
            }
        }
    }
}
