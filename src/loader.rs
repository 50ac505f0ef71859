//! Dataset loading from `;`-separated exports, with synthetic fallback
//!
//! A missing or malformed file is not fatal: the caller gets a synthetic
//! dataset and a `DataSource::Synthetic` describing why.

use crate::dataset::{
    Dataset, Record, Schema, COL_AGENT, COL_CLASSIFICATION, COL_DIRECTION, COL_GROUP, COL_SHIFT,
    COL_START, COL_TALKING_TIME,
};
use crate::error::LoadError;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_distr::Exp1;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Field separator of the call export
pub const SEPARATOR: char = ';';

/// Number of records in the synthetic fallback dataset
pub const SYNTHETIC_SIZE: usize = 1000;

/// Scale (mean) of the exponential talking-time distribution, in seconds
pub const SYNTHETIC_SCALE: f64 = 30.0;

const SYNTHETIC_GROUPS: [&str; 4] = [
    "yasmin_marina",
    "melanie_naty",
    "josefina_marcos",
    "otro_grupo",
];
const SYNTHETIC_CLASSIFICATIONS: [&str; 3] =
    ["Cae Muda o Cortada", "Llamada Completa", "No Contesta"];
const SYNTHETIC_SHIFTS: [&str; 3] = ["TT", "TM", "TN"];

/// Where the current dataset came from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataSource {
    File { path: PathBuf },
    Synthetic { reason: String },
}

/// Result of a load attempt that always yields data
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub dataset: Dataset,
    pub source: DataSource,
}

/// Load `path`, falling back to synthetic data when it is absent or malformed
pub fn load_or_synthesize(path: Option<&Path>, seed: Option<u64>) -> LoadOutcome {
    let reason = match path {
        None => "no data file given".to_string(),
        Some(p) if !p.exists() => format!("data file not found: {}", p.display()),
        Some(p) => match load_csv(p) {
            Ok(dataset) => {
                tracing::info!(
                    "Loaded {} records from {} ({:?})",
                    dataset.len(),
                    p.display(),
                    dataset.schema()
                );
                return LoadOutcome {
                    dataset,
                    source: DataSource::File {
                        path: p.to_path_buf(),
                    },
                };
            }
            Err(e) => format!("failed to load {}: {}", p.display(), e),
        },
    };

    tracing::warn!("{}; using synthetic sample data", reason);
    LoadOutcome {
        dataset: synthesize(seed),
        source: DataSource::Synthetic { reason },
    }
}

/// Read a call export strictly
pub fn load_csv(path: &Path) -> Result<Dataset, LoadError> {
    let content = fs::read_to_string(path)?;
    parse_dataset(&content)
}

/// Parse the text of a call export
pub fn parse_dataset(content: &str) -> Result<Dataset, LoadError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, header_line) = lines.next().ok_or(LoadError::EmptyFile)?;
    let header = split_row(header_line);
    let position = |name: &str| header.iter().position(|h| h.trim() == name);
    let required = |name: &str| position(name).ok_or_else(|| LoadError::MissingColumn(name.to_string()));

    let group_idx = required(COL_GROUP)?;
    let classification_idx = required(COL_CLASSIFICATION)?;
    let shift_idx = required(COL_SHIFT)?;
    let time_idx = required(COL_TALKING_TIME)?;
    let agent_idx = position(COL_AGENT);
    let direction_idx = position(COL_DIRECTION);
    let start_idx = position(COL_START);

    let schema = Schema {
        has_agent_name: agent_idx.is_some(),
        has_direction: direction_idx.is_some(),
        has_timestamp: start_idx.is_some(),
    };

    let mut records = Vec::new();
    let mut negative = 0usize;
    for (line_no, line) in lines {
        let fields = split_row(line);
        if fields.len() != header.len() {
            return Err(LoadError::MalformedRow {
                line: line_no + 1,
                expected: header.len(),
                found: fields.len(),
            });
        }

        let optional = |idx: Option<usize>| {
            idx.map(|i| fields[i].trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let talking_time = match parse_talking_time(&fields[time_idx]) {
            Some(t) if t >= 0.0 => t,
            Some(_) => {
                negative += 1;
                f64::NAN
            }
            None => f64::NAN,
        };

        records.push(Record {
            group: fields[group_idx].trim().to_string(),
            classification: fields[classification_idx].trim().to_string(),
            shift: fields[shift_idx].trim().to_string(),
            talking_time,
            agent_name: optional(agent_idx),
            direction: optional(direction_idx),
            start: optional(start_idx),
        });
    }

    if negative > 0 {
        tracing::warn!(
            "{} rows with a negative talking time treated as missing",
            negative
        );
    }
    Ok(Dataset::new(records, schema))
}

/// Numeric cell to seconds
///
/// `None` for unparsable text and for `inf`/`NaN` spellings, which `f64`
/// parsing accepts but no call can last.
fn parse_talking_time(cell: &str) -> Option<f64> {
    let text = cell.trim();
    text.parse::<f64>()
        .or_else(|_| text.replace(',', ".").parse::<f64>())
        .ok()
        .filter(|t| t.is_finite())
}

/// Split one row on `;`, honoring double-quoted fields with `""` escapes
pub fn split_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if current.is_empty() => in_quotes = true,
            c if c == SEPARATOR && !in_quotes => fields.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    fields.push(current);
    fields
}

/// Generate the fallback sample dataset
///
/// Talking times follow Exponential(scale = 30).
/// No optional columns are produced.
pub fn synthesize(seed: Option<u64>) -> Dataset {
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    let records = (0..SYNTHETIC_SIZE)
        .map(|_| {
            let talking_time: f64 = rng.sample(Exp1);
            Record::new(
                pick(&mut rng, &SYNTHETIC_GROUPS),
                pick(&mut rng, &SYNTHETIC_CLASSIFICATIONS),
                pick(&mut rng, &SYNTHETIC_SHIFTS),
                SYNTHETIC_SCALE * talking_time,
            )
        })
        .collect();

    Dataset::new(records, Schema::default())
}

fn pick<'a>(rng: &mut StdRng, values: &[&'a str]) -> &'a str {
    values.choose(rng).copied().unwrap_or_default()
}
