//! sleepshift: plan a gradual sleep-schedule shift across two timezones.
//!
//! Inputs and notes persist in a JSON state file between runs; every command
//! loads it, applies one change, and writes back the slots that changed.

mod render;
mod store;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use shift_engine::notes::set_note;
use shift_engine::zone::parse_date;
use shift_engine::{
    calendar_events, generate, shift_notes_by_one_day, ScheduleInputs, ScheduleRow, ShiftDirection,
    Zones,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::render::render_table;
use crate::store::{AppState, JsonFileStore};

#[derive(Parser)]
#[command(name = "sleepshift", version)]
#[command(about = "Plan a gradual sleep-schedule shift, shown in two timezones")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// State file holding the inputs and notes
    #[arg(
        long,
        global = true,
        env = "SLEEPSHIFT_STATE",
        default_value = "sleepshift-state.json"
    )]
    state: PathBuf,

    /// Enable debug logging on stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the schedule for the saved inputs (the default command).
    Show {
        /// Emit the rows as JSON
        #[arg(long)]
        json: bool,
        /// Emit sleep/awake calendar events as JSON
        #[arg(long, conflicts_with = "json")]
        calendar: bool,
    },

    /// Change one or more inputs, then print the new schedule.
    Set {
        /// Current sleep start, HH:MM
        #[arg(long)]
        sleep_start: Option<String>,
        /// Current sleep end, HH:MM
        #[arg(long)]
        sleep_end: Option<String>,
        /// Date the current sleep times apply to, YYYY-MM-DD
        #[arg(long)]
        current_date: Option<String>,
        /// First day to show, YYYY-MM-DD
        #[arg(long)]
        start_date: Option<String>,
        /// Last day to show, YYYY-MM-DD
        #[arg(long)]
        end_date: Option<String>,
        /// Minutes to move the sleep window each day (negative moves it earlier)
        #[arg(long, allow_negative_numbers = true)]
        daily_shift: Option<f64>,
    },

    /// Set the note for a date; omit TEXT to clear it.
    Note {
        /// Date, YYYY-MM-DD
        date: String,
        /// Note text
        text: Option<String>,
    },

    /// List every saved note.
    Notes,

    /// Move every note one day earlier (up) or later (down).
    ShiftNotes {
        #[arg(value_enum)]
        direction: Direction,
    },

    /// Restore the default inputs. Notes are kept.
    Reset,
}

#[derive(Clone, Copy, ValueEnum)]
enum Direction {
    Up,
    Down,
}

impl From<Direction> for ShiftDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => ShiftDirection::Up,
            Direction::Down => ShiftDirection::Down,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut store = JsonFileStore::open(&cli.state)?;
    debug!(path = %store.path().display(), "state loaded");
    let before = AppState::load(&store);
    let mut state = before.clone();
    let zones = Zones::default();

    match cli.command.unwrap_or(Commands::Show {
        json: false,
        calendar: false,
    }) {
        Commands::Show { json, calendar } => {
            let rows = schedule_for(&state.inputs, &zones)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if calendar {
                println!("{}", serde_json::to_string_pretty(&calendar_events(&rows))?);
            } else {
                print!("{}", render_table(&rows, &state.notes, &zones));
            }
        }

        Commands::Set {
            sleep_start,
            sleep_end,
            current_date,
            start_date,
            end_date,
            daily_shift,
        } => {
            let inputs = &mut state.inputs;
            if let Some(v) = sleep_start {
                inputs.sleep_start = v;
            }
            if let Some(v) = sleep_end {
                inputs.sleep_end = v;
            }
            if let Some(v) = current_date {
                inputs.current_date = v;
            }
            if let Some(v) = start_date {
                inputs.start_date = v;
            }
            if let Some(v) = end_date {
                inputs.end_date = v;
            }
            if let Some(v) = daily_shift {
                inputs.daily_shift_minutes = v;
            }

            let rows = schedule_for(&state.inputs, &zones).context("inputs not saved")?;
            let written = state.save_changes(&before, &mut store)?;
            info!(written, "inputs updated");
            print!("{}", render_table(&rows, &state.notes, &zones));
        }

        Commands::Note { date, text } => {
            let date = parse_date(&date)?;
            let text = text.unwrap_or_default();
            set_note(&mut state.notes, date, &text);
            state.save_changes(&before, &mut store)?;
            if text.trim().is_empty() {
                println!("Cleared note for {date}");
            } else {
                println!("Saved note for {date}");
            }
        }

        Commands::Notes => {
            if state.notes.is_empty() {
                println!("No notes");
            }
            for (date, text) in &state.notes {
                println!("{date}  {text}");
            }
        }

        Commands::ShiftNotes { direction } => {
            let direction = ShiftDirection::from(direction);
            state.notes = shift_notes_by_one_day(&state.notes, direction);
            state.save_changes(&before, &mut store)?;
            let label = match direction {
                ShiftDirection::Up => "earlier",
                ShiftDirection::Down => "later",
            };
            println!("Moved {} notes one day {label}", state.notes.len());
        }

        Commands::Reset => {
            state.inputs = ScheduleInputs::default();
            state.save_changes(&before, &mut store)?;
            println!("Inputs reset to defaults");
        }
    }

    Ok(())
}

fn schedule_for(inputs: &ScheduleInputs, zones: &Zones) -> Result<Vec<ScheduleRow>> {
    let request = inputs.parse()?;
    Ok(generate(&request, zones)?)
}
