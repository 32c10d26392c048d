//! Plain-text persistence for [`QTable`].
//!
//! One state per line, nine space separated fields:
//!
//! ```text
//! <ball_x> <ball_y> <ball_vx_sign> <ball_vy_sign> <controlled_paddle> <opponent_paddle> <q_stay> <q_up> <q_down>
//! ```
//!
//! No header or footer. Values are written in Rust's shortest round-trip
//! decimal form. Lines that do not parse are skipped and counted.

use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use serde::Serialize;

use crate::{
    Result,
    error::Error,
    q_learning::q_table::{ActionValues, QTable},
    types::{ACTION_COUNT, DiscreteState, VelocitySign},
};

const FIELD_COUNT: usize = 6 + ACTION_COUNT;

/// Outcome of reading a persisted table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Lines accepted into the table.
    pub states_loaded: usize,
    /// Non-blank lines that failed to parse.
    pub parse_errors: usize,
}

/// Parse one persisted line.
///
/// Requires exactly six integers followed by three finite floats. Bucket
/// fields must be non-negative and sign fields one of `-1`, `0`, `1`.
pub fn parse_line(line: &str) -> Option<(DiscreteState, ActionValues)> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != FIELD_COUNT {
        return None;
    }
    let sign = |field: &str| field.parse::<i8>().ok().and_then(VelocitySign::from_value);
    let state = DiscreteState::new(
        fields[0].parse().ok()?,
        fields[1].parse().ok()?,
        sign(fields[2])?,
        sign(fields[3])?,
        fields[4].parse().ok()?,
        fields[5].parse().ok()?,
    );
    let mut values = [0.0; ACTION_COUNT];
    for (slot, field) in values.iter_mut().zip(&fields[6..]) {
        let value: f64 = field.parse().ok()?;
        if !value.is_finite() {
            return None;
        }
        *slot = value;
    }
    Some((state, values))
}

/// Format one table entry as a persisted line, without the newline.
pub fn format_line(state: &DiscreteState, values: &ActionValues) -> String {
    format!("{state} {} {} {}", values[0], values[1], values[2])
}

/// Write every entry of `table`, sorted by state so output is stable.
pub fn write_table<W: Write>(table: &QTable, mut writer: W) -> io::Result<()> {
    let mut entries: Vec<_> = table.iter().collect();
    entries.sort_by(|(a, _), (b, _)| a.cmp(b));
    for (state, values) in entries {
        writeln!(writer, "{}", format_line(state, values))?;
    }
    writer.flush()
}

/// Read a table from text, always starting from an empty table.
///
/// Blank lines are ignored. A state appearing twice keeps its last line.
/// Lines are split on raw bytes, so a line that is not UTF-8 counts as one
/// parse error instead of aborting the read.
pub fn read_table<R: BufRead>(reader: R) -> io::Result<(QTable, LoadReport)> {
    let mut table = QTable::new();
    let mut report = LoadReport::default();

    for (index, line) in reader.split(b'\n').enumerate() {
        let bytes = line?;
        let bytes = bytes.strip_suffix(b"\r").unwrap_or(&bytes);
        let text = std::str::from_utf8(bytes).ok();
        if text.is_some_and(|text| text.trim().is_empty()) {
            continue;
        }
        match text.and_then(parse_line) {
            Some((state, values)) => {
                table.insert(state, values);
                report.states_loaded += 1;
            }
            None => {
                log::warn!(
                    "skipping malformed Q-table line {}: {:?}",
                    index + 1,
                    String::from_utf8_lossy(bytes)
                );
                report.parse_errors += 1;
            }
        }
    }

    Ok((table, report))
}

/// Save a table to `path`, returning the number of states written.
pub fn save_to_file<P: AsRef<Path>>(table: &QTable, path: P) -> Result<usize> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| Error::Io {
        operation: format!("create Q-table file {path:?}"),
        source,
    })?;
    write_table(table, BufWriter::new(file)).map_err(|source| Error::Io {
        operation: format!("write Q-table file {path:?}"),
        source,
    })?;
    Ok(table.size())
}

/// Load a table from `path`.
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<(QTable, LoadReport)> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| Error::Io {
        operation: format!("open Q-table file {path:?}"),
        source,
    })?;
    read_table(BufReader::new(file)).map_err(|source| Error::Io {
        operation: format!("read Q-table file {path:?}"),
        source,
    })
}
