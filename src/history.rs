use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;
use tracing::warn;

use crate::error::LigaError;
use crate::standings::StandingsTable;

// One row of the per-matchday position log, kept in the companion file next
// to each league ("Xclasificacion.csv"). Posicion stays empty until the
// matchday is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionEntry {
    #[serde(rename = "Equipo")]
    pub team: String,
    #[serde(rename = "Jornada")]
    pub matchday: u32,
    #[serde(
        rename = "Posicion",
        deserialize_with = "deserialize_option_number_from_string",
        default
    )]
    pub position: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionLog {
    entries: Vec<PositionEntry>,
}

impl PositionLog {
    // Pre-allocates the full schedule: one row per (team, matchday) over the
    // (N - 1) * 2 matchdays of a double round-robin. Recording later fails
    // loudly if a row is missing, so the whole schedule exists up front.
    pub fn allocate(teams: &[String]) -> Self {
        let rounds = teams.len().saturating_sub(1) as u32 * 2;
        let mut entries = Vec::with_capacity(teams.len() * rounds as usize);

        for team in teams {
            for matchday in 1..=rounds {
                entries.push(PositionEntry {
                    team: team.clone(),
                    matchday,
                    position: None,
                });
            }
        }

        Self { entries }
    }

    pub fn entries(&self) -> &[PositionEntry] {
        &self.entries
    }

    pub fn load(path: &Path) -> Result<Self, LigaError> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut entries = Vec::new();
        for entry in reader.deserialize() {
            entries.push(entry?);
        }
        Ok(Self { entries })
    }

    pub fn save(&self, path: &Path) -> Result<(), LigaError> {
        let mut writer = csv::Writer::from_path(path)?;
        for entry in &self.entries {
            writer.serialize(entry)?;
        }
        writer.flush()?;
        Ok(())
    }

    // Writes the resolved table into the log. The matchday is the played
    // count of the top-ranked team; that derivation assumes every team has
    // played the same number of matches, which holds for a league without
    // postponements. A divergence is logged, not repaired.
    pub fn record(&mut self, table: &StandingsTable) -> Result<u32, LigaError> {
        let Some(top) = table.rows.first() else {
            return Ok(0);
        };
        let matchday = top.record.played;

        for (idx, row) in table.rows.iter().enumerate() {
            if row.record.played != matchday {
                warn!(
                    team = %row.team,
                    played = row.record.played,
                    matchday,
                    "played counts are uneven, matchday derivation is unreliable"
                );
            }

            let entry = self
                .entries
                .iter_mut()
                .find(|entry| entry.matchday == matchday && entry.team == row.team)
                .ok_or_else(|| LigaError::MissingHistoryRow {
                    matchday,
                    team: row.team.clone(),
                })?;
            entry.position = Some(idx as u32 + 1);
        }

        Ok(matchday)
    }

    // "liga.csv" keeps its position log in "ligaclasificacion.csv".
    pub fn companion_path(results: &Path) -> PathBuf {
        let stem = results
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("liga");
        results.with_file_name(format!("{stem}clasificacion.csv"))
    }
}
