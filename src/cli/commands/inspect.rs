//! Inspect command - Summarise a saved Q-table file

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;
use serde::Serialize;

use crate::{
    cli::output::{format_number, print_kv, print_section, print_subsection},
    q_learning::{QTable, serialization::load_from_file},
    types::{ACTION_COUNT, Action},
};

#[derive(Parser, Debug)]
#[command(about = "Summarise a saved Q-table")]
pub struct InspectArgs {
    /// Table file to read
    pub table: PathBuf,

    /// Print the report as JSON instead of text
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

/// Aggregate view of a table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableReport {
    pub states_loaded: usize,
    pub parse_errors: usize,
    pub distinct_states: usize,
    /// Mean value per action, in `Action::ALL` order
    pub mean_values: [f64; ACTION_COUNT],
    /// How many states prefer each action greedily
    pub greedy_counts: [usize; ACTION_COUNT],
}

impl TableReport {
    pub fn from_table(table: &QTable, states_loaded: usize, parse_errors: usize) -> Self {
        let mut sums = [0.0; ACTION_COUNT];
        let mut greedy_counts = [0; ACTION_COUNT];
        for (state, values) in table.iter() {
            for (sum, value) in sums.iter_mut().zip(values) {
                *sum += value;
            }
            if let Some(action) = table.greedy_action(state) {
                greedy_counts[action.index()] += 1;
            }
        }
        let n = table.size();
        let mean_values = sums.map(|sum| if n == 0 { 0.0 } else { sum / n as f64 });

        Self {
            states_loaded,
            parse_errors,
            distinct_states: n,
            mean_values,
            greedy_counts,
        }
    }
}

pub fn execute(args: InspectArgs) -> Result<()> {
    if !args.table.exists() {
        return Err(anyhow!("Table file not found: {}", args.table.display()));
    }
    let (table, load) = load_from_file(&args.table)?;
    let report = TableReport::from_table(&table, load.states_loaded, load.parse_errors);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_section(&format!("Q-table: {}", args.table.display()));
    print_kv("States loaded", &format_number(report.states_loaded));
    print_kv("Distinct states", &format_number(report.distinct_states));
    print_kv("Parse errors", &report.parse_errors.to_string());

    print_subsection("Mean value per action");
    for action in Action::ALL {
        print_kv(
            &action.to_string(),
            &format!("{:.4}", report.mean_values[action.index()]),
        );
    }

    print_subsection("Greedy action histogram");
    for action in Action::ALL {
        let count = report.greedy_counts[action.index()];
        let share = if report.distinct_states == 0 {
            0.0
        } else {
            count as f64 / report.distinct_states as f64 * 100.0
        };
        print_kv(
            &action.to_string(),
            &format!("{} ({share:.1}%)", format_number(count)),
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DiscreteState, VelocitySign};

    fn state(x: u16) -> DiscreteState {
        DiscreteState::new(x, 0, VelocitySign::Zero, VelocitySign::Zero, 0, 0)
    }

    #[test]
    fn test_report_means_and_histogram() {
        let mut table = QTable::new();
        table.insert(state(0), [1.0, 3.0, 0.0]);
        table.insert(state(1), [3.0, 1.0, 0.0]);
        table.insert(state(2), [0.0, 0.0, 0.0]);

        let report = TableReport::from_table(&table, 4, 1);

        assert_eq!(report.distinct_states, 3);
        assert_eq!(report.mean_values, [4.0 / 3.0, 4.0 / 3.0, 0.0]);
        // all-zero row ties to Stay
        assert_eq!(report.greedy_counts, [2, 1, 0]);
    }

    #[test]
    fn test_empty_table_report() {
        let report = TableReport::from_table(&QTable::new(), 0, 0);
        assert_eq!(report.mean_values, [0.0; ACTION_COUNT]);
        assert_eq!(report.greedy_counts, [0; ACTION_COUNT]);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = InspectArgs {
            table: dir.path().join("missing.dat"),
            json: false,
        };
        assert!(execute(args).is_err());
    }
}
