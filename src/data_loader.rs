use std::path::Path;

use crate::error::LigaError;

// The results grid is a square table: one row per home team, one column per
// away team, each cell either empty (fixture not played) or a raw result
// string like "2-1". Cells stay raw strings until the aggregation pass reads
// them, so a bad edit surfaces as MalformedResult on the next computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultGrid {
    teams: Vec<String>,
    cells: Vec<Option<String>>, // row-major, teams.len() squared
}

impl ResultGrid {
    // New league. Team names are uppercased and sorted, the way the original
    // tool creates its files; duplicate labels are collapsed.
    pub fn empty(teams: Vec<String>) -> Self {
        let mut teams: Vec<String> = teams
            .into_iter()
            .map(|t| t.trim().to_uppercase())
            .filter(|t| !t.is_empty())
            .collect();
        teams.sort();
        teams.dedup();

        let n = teams.len();
        Self {
            teams,
            cells: vec![None; n * n],
        }
    }

    pub fn teams(&self) -> &[String] {
        &self.teams
    }

    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    pub fn team_index(&self, name: &str) -> Option<usize> {
        self.teams.iter().position(|t| t == name)
    }

    pub fn result(&self, home: usize, away: usize) -> Option<&str> {
        self.cells[home * self.teams.len() + away].as_deref()
    }

    // Records a single fixture result, overwriting any previous entry for
    // that (home, away) direction. The score is validated up front so the
    // grid never holds a string the aggregator would reject.
    pub fn set_result(&mut self, home: &str, away: &str, raw: &str) -> Result<(), LigaError> {
        parse_result(home, away, raw)?;

        let home_idx = self
            .team_index(home)
            .ok_or_else(|| LigaError::UnknownTeam(home.to_string()))?;
        let away_idx = self
            .team_index(away)
            .ok_or_else(|| LigaError::UnknownTeam(away.to_string()))?;

        let n = self.teams.len();
        self.cells[home_idx * n + away_idx] = Some(raw.trim().to_string());
        Ok(())
    }

    // Loads a grid CSV: the header row holds the away-team labels, the first
    // column the home-team label of each row.
    pub fn load(path: &Path) -> Result<Self, LigaError> {
        let mut reader = csv::Reader::from_path(path)?;

        let headers = reader.headers()?.clone();
        let teams: Vec<String> = headers.iter().skip(1).map(str::to_owned).collect();
        let n = teams.len();
        let mut cells = vec![None; n * n];

        for record in reader.records() {
            let record = record?;
            let home_name = record.get(0).unwrap_or("").to_string();
            let home = teams
                .iter()
                .position(|t| *t == home_name)
                .ok_or(LigaError::UnknownTeam(home_name))?;

            for (away, field) in record.iter().skip(1).enumerate().take(n) {
                if !field.is_empty() {
                    cells[home * n + away] = Some(field.to_string());
                }
            }
        }

        Ok(Self { teams, cells })
    }

    pub fn save(&self, path: &Path) -> Result<(), LigaError> {
        let mut writer = csv::Writer::from_path(path)?;
        let n = self.teams.len();

        let mut header = vec![String::new()];
        header.extend(self.teams.iter().cloned());
        writer.write_record(&header)?;

        for (home, team) in self.teams.iter().enumerate() {
            let mut row = vec![team.clone()];
            for away in 0..n {
                row.push(self.cells[home * n + away].clone().unwrap_or_default());
            }
            writer.write_record(&row)?;
        }

        writer.flush()?;
        Ok(())
    }
}

// Parses a raw result cell into (home goals, away goals). The team names are
// only carried along for the error report.
pub fn parse_result(home: &str, away: &str, raw: &str) -> Result<(u32, u32), LigaError> {
    let malformed = || LigaError::MalformedResult {
        home: home.to_string(),
        away: away.to_string(),
        raw: raw.to_string(),
    };

    let (home_goals, away_goals) = raw.trim().split_once('-').ok_or_else(malformed)?;
    let home_goals = home_goals.trim().parse::<u32>().map_err(|_| malformed())?;
    let away_goals = away_goals.trim().parse::<u32>().map_err(|_| malformed())?;

    Ok((home_goals, away_goals))
}
