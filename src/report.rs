use crate::data_loader::ResultGrid;
use crate::error::LigaError;
use crate::standings::StandingsTable;

pub fn render_table(table: &StandingsTable) -> String {
    let width = table
        .rows
        .iter()
        .map(|row| row.team.len())
        .max()
        .unwrap_or(6)
        .max(6);

    let mut out = String::new();
    out.push_str(&format!(
        "{0:4} {1:<width$} | {2:>3} {3:>3} {4:>3} {5:>3} | {6:>4} {7:>4} {8:>5} | {9:>4}\n",
        "", "EQUIPO", "PJ", "PG", "PE", "PP", "GF", "GC", "DIF", "PTS",
    ));

    for (i, row) in table.rows.iter().enumerate() {
        let r = &row.record;
        out.push_str(&format!(
            "{0:3}. {1:<width$} | {2:>3} {3:>3} {4:>3} {5:>3} | {6:>4} {7:>4} {8:>+5} | {9:>4}\n",
            i + 1,
            row.team,
            r.played,
            r.won,
            r.drawn,
            r.lost,
            r.goals_for,
            r.goals_against,
            r.goal_difference,
            r.points,
        ));
    }

    out
}

pub fn render_grid(grid: &ResultGrid) -> String {
    let width = grid
        .teams()
        .iter()
        .map(|team| team.len())
        .max()
        .unwrap_or(3)
        .max(3);

    let mut out = String::new();
    out.push_str(&format!("{0:width$}", ""));
    for team in grid.teams() {
        out.push_str(&format!(" | {team:>width$}"));
    }
    out.push('\n');

    for (home, team) in grid.teams().iter().enumerate() {
        out.push_str(&format!("{team:width$}"));
        for away in 0..grid.team_count() {
            let cell = if home == away {
                "x"
            } else {
                grid.result(home, away).unwrap_or("")
            };
            out.push_str(&format!(" | {cell:>width$}"));
        }
        out.push('\n');
    }

    out
}

pub fn table_json(table: &StandingsTable) -> Result<String, LigaError> {
    Ok(serde_json::to_string_pretty(&table.rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiebreak::compute_standings;

    fn sample_table() -> StandingsTable {
        let mut grid = ResultGrid::empty(vec!["REAL".into(), "BETIS".into(), "CELTA".into()]);
        grid.set_result("REAL", "BETIS", "2-0").unwrap();
        grid.set_result("BETIS", "CELTA", "1-1").unwrap();
        compute_standings(&grid).unwrap()
    }

    #[test]
    fn table_rendering_lists_every_team_in_rank_order() {
        let rendered = render_table(&sample_table());
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("EQUIPO"));
        assert!(lines[1].starts_with("  1. REAL"));
        assert!(lines[1].ends_with("3"));
    }

    #[test]
    fn json_export_uses_the_original_column_names() {
        let json = table_json(&sample_table()).unwrap();
        let rows: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(rows[0]["EQUIPO"], "REAL");
        assert_eq!(rows[0]["PTS"], 3);
        assert_eq!(rows[0]["DIF"], 2);
        // CELTA edges BETIS on season goal difference for second place.
        assert_eq!(rows[1]["EQUIPO"], "CELTA");
        assert_eq!(rows[2]["PJ"], 2);
    }

    #[test]
    fn grid_rendering_marks_the_diagonal() {
        let mut grid = ResultGrid::empty(vec!["A".into(), "B".into()]);
        grid.set_result("A", "B", "2-0").unwrap();
        let rendered = render_grid(&grid);

        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains('x'));
        assert!(lines[1].contains("2-0"));
    }
}
