// src/candidate_generation/input.rs

use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::candidate_generation::index::ActivityIndex;
use crate::utils::constants::{DEFAULT_ADDRESS_COLUMN, DEFAULT_RECORD_COLUMN};

/// Layout of the delimited activity log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputOptions {
    pub address_column: String,
    pub record_column: String,
    pub delimiter: char,
}

impl Default for InputOptions {
    fn default() -> Self {
        Self {
            address_column: DEFAULT_ADDRESS_COLUMN.to_string(),
            record_column: DEFAULT_RECORD_COLUMN.to_string(),
            delimiter: ',',
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InputStats {
    pub rows_read: usize,
    pub rows_skipped: usize,
}

fn clean_field(field: &str) -> &str {
    field.trim().trim_matches('"').trim()
}

/// Reads `address,record` activity rows into `index`.
///
/// The first line is a header naming the columns. Rows missing either
/// field are skipped and counted rather than failing the whole load.
pub fn read_activity<R: BufRead>(
    reader: R,
    options: &InputOptions,
    index: &mut ActivityIndex,
) -> Result<InputStats> {
    let mut lines = reader.lines();
    let header = lines
        .next()
        .ok_or_else(|| anyhow!("Input is empty, expected a header row"))?
        .context("Failed to read header row")?;

    let columns: Vec<&str> = header
        .trim_end_matches('\r')
        .split(options.delimiter)
        .map(clean_field)
        .collect();
    let position = |name: &str| {
        columns
            .iter()
            .position(|c| *c == name)
            .ok_or_else(|| anyhow!("Column '{}' not found in header {:?}", name, columns))
    };
    let address_idx = position(&options.address_column)?;
    let record_idx = position(&options.record_column)?;

    let mut stats = InputStats::default();
    for (line_no, line) in lines.enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", line_no + 2))?;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(options.delimiter).map(clean_field).collect();
        match (fields.get(address_idx), fields.get(record_idx)) {
            (Some(address), Some(record)) if !address.is_empty() && !record.is_empty() => {
                index.insert(address, record);
                stats.rows_read += 1;
            }
            _ => {
                debug!("Skipping malformed line {}: {:?}", line_no + 2, line);
                stats.rows_skipped += 1;
            }
        }
    }

    if stats.rows_skipped > 0 {
        warn!("Skipped {} malformed input rows", stats.rows_skipped);
    }
    Ok(stats)
}

/// Loads an activity log from disk into a fresh index.
pub fn load_activity_file(path: &Path, options: &InputOptions) -> Result<(ActivityIndex, InputStats)> {
    let file = File::open(path)
        .with_context(|| format!("Can't find file or read data: {}", path.display()))?;
    let mut index = ActivityIndex::new();
    let stats = read_activity(BufReader::new(file), options, &mut index)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    info!(
        "Read {} rows from {} ({} addresses, {} records)",
        stats.rows_read,
        path.display(),
        index.address_count(),
        index.record_count()
    );
    Ok((index, stats))
}
