mod data_loader;
mod error;
mod history;
mod report;
mod standings;
mod tiebreak;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use data_loader::ResultGrid;
use error::LigaError;
use history::PositionLog;

#[derive(Parser)]
#[command(
    name = "tablas",
    about = "Round-robin league tables: results grid, standings with tie-break resolution, position history"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a league: an empty results grid plus its pre-allocated position history
    New {
        file: PathBuf,
        #[arg(required = true)]
        teams: Vec<String>,
    },
    /// Record one result ("2-1") into the grid
    Result {
        file: PathBuf,
        home: String,
        away: String,
        score: String,
    },
    /// Print the raw results grid
    Grid { file: PathBuf },
    /// Compute and print the resolved standings
    Table {
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Compute the standings and write the ranks into the position history
    Record { file: PathBuf },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_target(false).init();

    match run(Cli::parse().command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), LigaError> {
    match command {
        Command::New { file, teams } => {
            let grid = ResultGrid::empty(teams);
            grid.save(&file)?;

            let log = PositionLog::allocate(grid.teams());
            let history_file = PositionLog::companion_path(&file);
            log.save(&history_file)?;

            println!(
                "created {} ({} teams) and {}",
                file.display(),
                grid.team_count(),
                history_file.display()
            );
        }
        Command::Result {
            file,
            home,
            away,
            score,
        } => {
            let mut grid = ResultGrid::load(&file)?;
            let home = resolve_team(&grid, &home)?;
            let away = resolve_team(&grid, &away)?;
            grid.set_result(&home, &away, &score)?;
            grid.save(&file)?;
        }
        Command::Grid { file } => {
            let grid = ResultGrid::load(&file)?;
            print!("{}", report::render_grid(&grid));
        }
        Command::Table { file, json } => {
            let grid = ResultGrid::load(&file)?;
            let table = tiebreak::compute_standings(&grid)?;
            if json {
                println!("{}", report::table_json(&table)?);
            } else {
                print!("{}", report::render_table(&table));
            }
        }
        Command::Record { file } => {
            let grid = ResultGrid::load(&file)?;
            let table = tiebreak::compute_standings(&grid)?;

            let history_file = PositionLog::companion_path(&file);
            let mut log = PositionLog::load(&history_file)?;
            let matchday = log.record(&table)?;
            log.save(&history_file)?;

            println!("recorded matchday {matchday} into {}", history_file.display());
        }
    }
    Ok(())
}

// CLI sugar: match a typed team name against the grid's labels regardless of
// case, since new leagues store them uppercased.
fn resolve_team(grid: &ResultGrid, name: &str) -> Result<String, LigaError> {
    grid.teams()
        .iter()
        .find(|team| team.eq_ignore_ascii_case(name))
        .cloned()
        .ok_or_else(|| LigaError::UnknownTeam(name.to_string()))
}
