//! Click-to-sort state for result tables
//!
//! Each table owns its own `SortState`. Requesting the active column flips
//! the direction; requesting another column makes it active, ascending.

use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Header marker for the active column
    pub fn indicator(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// Active sort column and direction of one table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortState<C> {
    pub column: Option<C>,
    pub direction: SortDirection,
}

impl<C: Copy + PartialEq> SortState<C> {
    /// No active column
    pub fn unsorted() -> Self {
        Self {
            column: None,
            direction: SortDirection::Ascending,
        }
    }

    pub fn sorted_by(column: C, direction: SortDirection) -> Self {
        Self {
            column: Some(column),
            direction,
        }
    }

    /// Apply one sort request and return the resulting state
    pub fn request(self, column: C) -> Self {
        if self.column == Some(column) {
            Self {
                column: self.column,
                direction: self.direction.flipped(),
            }
        } else {
            Self::sorted_by(column, SortDirection::Ascending)
        }
    }

    /// Header label with the direction marker when `column` is active
    pub fn header(&self, column: C, label: &str) -> String {
        if self.column == Some(column) {
            format!("{} {}", label, self.direction.indicator())
        } else {
            label.to_string()
        }
    }
}

/// Stable sort honoring direction; ties keep their prior relative order
pub fn stable_sort_by<T, F>(items: &mut [T], direction: SortDirection, mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    match direction {
        SortDirection::Ascending => items.sort_by(|a, b| compare(a, b)),
        SortDirection::Descending => items.sort_by(|a, b| compare(b, a)),
    }
}

/// Compare optional keys with missing values last in either direction
pub fn missing_last<K, F>(a: Option<K>, b: Option<K>, direction: SortDirection, cmp: F) -> Ordering
where
    F: FnOnce(&K, &K) -> Ordering,
{
    match (a, b) {
        (Some(a), Some(b)) => cmp(&a, &b),
        (Some(_), None) => match direction {
            SortDirection::Ascending => Ordering::Less,
            SortDirection::Descending => Ordering::Greater,
        },
        (None, Some(_)) => match direction {
            SortDirection::Ascending => Ordering::Greater,
            SortDirection::Descending => Ordering::Less,
        },
        (None, None) => Ordering::Equal,
    }
}
