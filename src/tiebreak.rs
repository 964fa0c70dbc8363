use std::cmp::Ordering;
use std::ops::Range;

use tracing::debug;

use crate::data_loader::{parse_result, ResultGrid};
use crate::error::LigaError;
use crate::standings::{build_table, HeadToHeadIndex, StandingRow, StandingsTable, TeamRecord};

// Full pipeline: aggregate, detect ties, resolve them, splice the resolved
// groups back. Every call recomputes from the whole grid; nothing persists
// between runs.
pub fn compute_standings(grid: &ResultGrid) -> Result<StandingsTable, LigaError> {
    let (mut table, head_to_head) = build_table(grid)?;
    resolve_ranking(&mut table, grid, &head_to_head)?;
    Ok(table)
}

pub fn resolve_ranking(
    table: &mut StandingsTable,
    grid: &ResultGrid,
    head_to_head: &HeadToHeadIndex,
) -> Result<(), LigaError> {
    // Groups have strictly distinct points values, so they resolve
    // independently and never interact.
    for group in tie_groups(table) {
        let rows = &table.rows[group.clone()];
        let order = if rows.len() == 2 {
            resolve_pair(rows, grid, head_to_head)?
        } else {
            resolve_group(rows, grid, head_to_head)?
        };
        splice(table, group, &order)?;
    }
    Ok(())
}

// Maximal runs of equal points in the sorted table, size 2 or more. A linear
// scan keeps the row order, which the splice step relies on.
pub fn tie_groups(table: &StandingsTable) -> Vec<Range<usize>> {
    let rows = &table.rows;
    let mut groups = Vec::new();
    let mut start = 0;

    while start < rows.len() {
        let mut end = start + 1;
        while end < rows.len() && rows[end].record.points == rows[start].record.points {
            end += 1;
        }
        if end - start >= 2 {
            groups.push(start..end);
        }
        start = end;
    }

    groups
}

// The season-wide fallback chain, used whenever head-to-head data cannot
// decide: points, goal difference, goals for (all descending), then name.
fn season_chain(a: &StandingRow, b: &StandingRow) -> Ordering {
    b.record
        .points
        .cmp(&a.record.points)
        .then(b.record.goal_difference.cmp(&a.record.goal_difference))
        .then(b.record.goals_for.cmp(&a.record.goals_for))
        .then(a.team.cmp(&b.team))
}

fn team_index(grid: &ResultGrid, name: &str) -> Result<usize, LigaError> {
    grid.team_index(name)
        .ok_or_else(|| LigaError::MissingTeam(name.to_string()))
}

// Two teams level on points. A completed double-legged head-to-head decides
// on aggregate goals; anything else (0, 1 or 3+ encounters, or a level
// aggregate) falls to the season chain. The emitted order is authoritative
// even when the incoming points-sort already placed the head-to-head winner
// on top.
fn resolve_pair(
    rows: &[StandingRow],
    grid: &ResultGrid,
    head_to_head: &HeadToHeadIndex,
) -> Result<Vec<String>, LigaError> {
    debug_assert_eq!(rows.len(), 2);
    let upper = team_index(grid, &rows[0].team)?;
    let lower = team_index(grid, &rows[1].team)?;

    if let Some(entry) = head_to_head.pair(upper, lower) {
        if entry.encounters == 2 {
            let average = entry.goal_average();
            if average != 0 {
                let winner = if average > 0 { entry.first } else { entry.second };
                let loser = if average > 0 { entry.second } else { entry.first };
                let winner = grid.teams()[winner].clone();
                let loser = grid.teams()[loser].clone();

                if winner != rows[0].team {
                    debug!(
                        winner = %winner,
                        over = %loser,
                        goal_average = average.abs(),
                        "head-to-head reorders tied pair"
                    );
                }
                return Ok(vec![winner, loser]);
            }
        }
    }

    let mut ordered: Vec<&StandingRow> = rows.iter().collect();
    ordered.sort_by(|a, b| season_chain(a, b));
    Ok(ordered.into_iter().map(|row| row.team.clone()).collect())
}

// Three or more teams level on points. Replays the aggregation over the
// fixtures among the tied teams only; if that restricted schedule is a closed
// double round-robin (every pair that met, met exactly twice) the mini-league
// decides first, otherwise it is judged unreliable and discarded.
fn resolve_group(
    rows: &[StandingRow],
    grid: &ResultGrid,
    head_to_head: &HeadToHeadIndex,
) -> Result<Vec<String>, LigaError> {
    let teams = grid.teams();
    let members: Vec<usize> = rows
        .iter()
        .map(|row| team_index(grid, &row.team))
        .collect::<Result<_, _>>()?;

    let mut mini = vec![TeamRecord::default(); members.len()];
    for (i, &home) in members.iter().enumerate() {
        for (j, &away) in members.iter().enumerate() {
            if home == away {
                continue;
            }
            let Some(raw) = grid.result(home, away) else {
                continue;
            };
            let (home_goals, away_goals) = parse_result(&teams[home], &teams[away], raw)?;
            mini[i].add_result(home_goals, away_goals);
            mini[j].add_result(away_goals, home_goals);
        }
    }

    let mut complete = true;
    for (i, &a) in members.iter().enumerate() {
        for &b in &members[i + 1..] {
            if let Some(entry) = head_to_head.pair(a, b) {
                if entry.encounters != 0 && entry.encounters != 2 {
                    complete = false;
                }
            }
        }
    }

    let mut order: Vec<usize> = (0..rows.len()).collect();
    if complete {
        order.sort_by(|&x, &y| {
            mini[y]
                .points
                .cmp(&mini[x].points)
                .then(mini[y].goal_difference.cmp(&mini[x].goal_difference))
                .then(rows[y].record.goal_difference.cmp(&rows[x].record.goal_difference))
                .then(rows[y].record.goals_for.cmp(&rows[x].record.goals_for))
                .then(rows[x].team.cmp(&rows[y].team))
        });
    } else {
        debug!(
            teams = ?rows.iter().map(|row| row.team.as_str()).collect::<Vec<_>>(),
            "intra-group schedule not a closed double round-robin, using season criteria"
        );
        order.sort_by(|&x, &y| {
            rows[y]
                .record
                .goal_difference
                .cmp(&rows[x].record.goal_difference)
                .then(rows[y].record.goals_for.cmp(&rows[x].record.goals_for))
                .then(rows[x].team.cmp(&rows[y].team))
        });
    }

    Ok(order.into_iter().map(|i| rows[i].team.clone()).collect())
}

// Writes a resolved order back into its index range. The rows keep their
// season-wide statistics; only the positions move.
fn splice(table: &mut StandingsTable, range: Range<usize>, order: &[String]) -> Result<(), LigaError> {
    let mut pool: Vec<StandingRow> = table.rows[range.clone()].to_vec();

    for (slot, name) in range.zip(order) {
        let at = pool
            .iter()
            .position(|row| &row.team == name)
            .ok_or_else(|| LigaError::MissingTeam(name.clone()))?;
        table.rows[slot] = pool.swap_remove(at);
    }

    Ok(())
}
