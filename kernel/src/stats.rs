//! In-memory min/max statistics of storage units.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::expressions::Scalar;
use crate::rs_operator::UnitStatsProvider;
use crate::schema::ColumnId;

/// Min/max/null-count statistics of one column within one unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitStats {
    min: Option<Scalar>,
    max: Option<Scalar>,
    null_count: u64,
    /// Set once a value that does not order against the others has been seen. Min/max are
    /// meaningless from then on.
    unordered: bool,
}

impl UnitStats {
    pub fn new(min: impl Into<Scalar>, max: impl Into<Scalar>, null_count: u64) -> Self {
        let non_null = |v: Scalar| (!v.is_null()).then_some(v);
        Self {
            min: non_null(min.into()),
            max: non_null(max.into()),
            null_count,
            unordered: false,
        }
    }

    /// Builds the statistics of a column from all of its values.
    pub fn from_values<T: Into<Scalar>>(values: impl IntoIterator<Item = T>) -> Self {
        let mut stats = Self::default();
        for value in values {
            stats.update(&value.into());
        }
        stats
    }

    /// Accounts for one more value of the column.
    pub fn update(&mut self, value: &Scalar) {
        if value.is_null() {
            self.null_count += 1;
            return;
        }
        if self.unordered {
            return;
        }
        let (Some(min), Some(max)) = (&self.min, &self.max) else {
            if value.partial_cmp(value).is_some() {
                self.min = Some(value.clone());
                self.max = Some(value.clone());
            } else {
                self.unordered = true;
            }
            return;
        };
        match (value.partial_cmp(min), value.partial_cmp(max)) {
            (Some(Ordering::Less), _) => self.min = Some(value.clone()),
            (_, Some(Ordering::Greater)) => self.max = Some(value.clone()),
            (Some(_), Some(_)) => {}
            _ => {
                self.unordered = true;
                self.min = None;
                self.max = None;
            }
        }
    }

    pub fn min(&self) -> Option<&Scalar> {
        self.min.as_ref()
    }

    pub fn max(&self) -> Option<&Scalar> {
        self.max.as_ref()
    }

    pub fn null_count(&self) -> u64 {
        self.null_count
    }
}

/// Statistics of one storage unit ("pack"): a row count plus per-column [`UnitStats`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackStats {
    row_count: u64,
    columns: HashMap<ColumnId, UnitStats>,
}

impl PackStats {
    pub fn new(row_count: u64) -> Self {
        Self {
            row_count,
            columns: HashMap::new(),
        }
    }

    /// Adds (or replaces) the statistics of one column.
    #[must_use]
    pub fn with_column(mut self, col_id: ColumnId, stats: UnitStats) -> Self {
        self.columns.insert(col_id, stats);
        self
    }

    pub fn column(&self, col_id: ColumnId) -> Option<&UnitStats> {
        self.columns.get(&col_id)
    }
}

impl UnitStatsProvider for PackStats {
    fn get_min_stat(&self, col_id: ColumnId) -> Option<&Scalar> {
        self.column(col_id)?.min()
    }

    fn get_max_stat(&self, col_id: ColumnId) -> Option<&Scalar> {
        self.column(col_id)?.max()
    }

    fn get_nullcount_stat(&self, col_id: ColumnId) -> Option<u64> {
        self.column(col_id).map(UnitStats::null_count)
    }

    fn get_rowcount_stat(&self) -> u64 {
        self.row_count
    }
}
