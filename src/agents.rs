//! Per-agent views: outlier breakdown table and performance ranking

use crate::dataset::{Record, Schema};
use crate::display::truncate;
use crate::outliers::OutlierRecord;
use crate::sort::{stable_sort_by, SortDirection, SortState};
use crate::stats::mean;
use serde::Serialize;
use std::collections::BTreeMap;

/// Minimum calls for an agent to be ranked
pub const MIN_CALLS_FOR_RANKING: usize = 5;

/// Agents kept in the performance ranking
pub const RANKING_SIZE: usize = 5;

const NAME_WIDTH: usize = 15;
const NO_DATA: &str = "No data";

/// Outlier count of one agent
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentAggregate {
    pub agent_name: String,
    pub outlier_count: usize,
    /// Share of all outliers, 0-100
    pub percentage: f64,
}

impl AgentAggregate {
    pub fn display_name(&self) -> String {
        truncate(&self.agent_name, NAME_WIDTH)
    }

    pub fn display_percentage(&self) -> String {
        format!("{:.1}%", self.percentage)
    }
}

/// Result of grouping outliers by agent
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "agents", rename_all = "snake_case")]
pub enum AgentSummary {
    /// No agent column, or nothing to group
    NoData,
    Agents(Vec<AgentAggregate>),
}

/// Group outliers by agent name, most outliers first
///
/// Ties keep first-encountered order. Outliers without a name are not
/// grouped but still count toward the percentage denominator.
pub fn aggregate_by_agent(outliers: &[OutlierRecord], schema: Schema) -> AgentSummary {
    if !schema.has_agent_name || outliers.is_empty() {
        return AgentSummary::NoData;
    }

    let mut counts: Vec<(&str, usize)> = Vec::new();
    for name in outliers.iter().filter_map(|o| o.record.agent_name.as_deref()) {
        match counts.iter_mut().find(|(n, _)| *n == name) {
            Some((_, count)) => *count += 1,
            None => counts.push((name, 1)),
        }
    }
    if counts.is_empty() {
        return AgentSummary::NoData;
    }

    let total = outliers.len() as f64;
    let mut aggregates: Vec<AgentAggregate> = counts
        .into_iter()
        .map(|(name, count)| AgentAggregate {
            agent_name: name.to_string(),
            outlier_count: count,
            percentage: 100.0 * count as f64 / total,
        })
        .collect();
    aggregates.sort_by(|a, b| b.outlier_count.cmp(&a.outlier_count));
    AgentSummary::Agents(aggregates)
}

/// Sortable columns of the agent table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentColumn {
    Name,
    Count,
    Percentage,
}

impl AgentColumn {
    pub const ALL: [AgentColumn; 3] = [AgentColumn::Name, AgentColumn::Count, AgentColumn::Percentage];

    pub fn label(self) -> &'static str {
        match self {
            AgentColumn::Name => "Agent",
            AgentColumn::Count => "Outliers",
            AgentColumn::Percentage => "%",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentRow {
    pub name: String,
    pub count: String,
    pub percentage: String,
}

/// Agent aggregate plus its own sort state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentTable {
    summary: AgentSummary,
    sort: SortState<AgentColumn>,
}

impl AgentTable {
    /// Table in aggregation order, marked as sorted by count descending
    pub fn new(summary: AgentSummary) -> Self {
        Self {
            summary,
            sort: SortState::sorted_by(AgentColumn::Count, SortDirection::Descending),
        }
    }

    pub fn summary(&self) -> &AgentSummary {
        &self.summary
    }

    pub fn sort_state(&self) -> SortState<AgentColumn> {
        self.sort
    }

    pub fn sort(&mut self, column: AgentColumn) {
        self.sort = self.sort.request(column);
        let direction = self.sort.direction;
        let AgentSummary::Agents(rows) = &mut self.summary else {
            return;
        };
        match column {
            AgentColumn::Name => {
                stable_sort_by(rows, direction, |a, b| a.display_name().cmp(&b.display_name()))
            }
            AgentColumn::Count => {
                stable_sort_by(rows, direction, |a, b| a.outlier_count.cmp(&b.outlier_count))
            }
            AgentColumn::Percentage => stable_sort_by(rows, direction, |a, b| {
                parse_percentage(&a.display_percentage())
                    .total_cmp(&parse_percentage(&b.display_percentage()))
            }),
        }
    }

    pub fn headers(&self) -> Vec<String> {
        AgentColumn::ALL
            .iter()
            .map(|c| self.sort.header(*c, c.label()))
            .collect()
    }

    pub fn display_rows(&self) -> Vec<AgentRow> {
        match &self.summary {
            AgentSummary::NoData => vec![AgentRow {
                name: NO_DATA.to_string(),
                count: "0".to_string(),
                percentage: "0%".to_string(),
            }],
            AgentSummary::Agents(rows) => rows
                .iter()
                .map(|a| AgentRow {
                    name: a.display_name(),
                    count: a.outlier_count.to_string(),
                    percentage: a.display_percentage(),
                })
                .collect(),
        }
    }
}

/// Numeric value of a `12.5%` cell; unparsable text sorts as zero
fn parse_percentage(text: &str) -> f64 {
    text.trim_end_matches('%').trim().parse().unwrap_or(0.0)
}

/// Mean talking time of one agent
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentPerformance {
    pub agent_name: String,
    pub mean: f64,
    pub count: usize,
}

/// Agents with the lowest mean talking time
///
/// Only agents with at least `MIN_CALLS_FOR_RANKING` timed calls qualify.
/// `None` when the dataset has no agent column.
pub fn agent_performance(records: &[Record], schema: Schema) -> Option<Vec<AgentPerformance>> {
    if !schema.has_agent_name {
        return None;
    }

    let mut by_agent: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for record in records {
        if let Some(name) = record.agent_name.as_deref() {
            if record.talking_time.is_finite() {
                by_agent.entry(name).or_default().push(record.talking_time);
            }
        }
    }

    let mut ranking: Vec<AgentPerformance> = by_agent
        .into_iter()
        .filter(|(_, times)| times.len() >= MIN_CALLS_FOR_RANKING)
        .filter_map(|(name, times)| {
            Some(AgentPerformance {
                agent_name: name.to_string(),
                mean: mean(&times)?,
                count: times.len(),
            })
        })
        .collect();
    ranking.sort_by(|a, b| a.mean.total_cmp(&b.mean));
    ranking.truncate(RANKING_SIZE);
    Some(ranking)
}
