//! Applies a rough-set filter to the units of a segment, deciding which ones a scan must read.

use tracing::debug;

use crate::rs_operator::{RsOperator, RsResult, UnitStatsProvider};
use crate::schema::Attr;

/// A compiled filter, ready to be checked against the statistics of many units.
#[derive(Debug, Clone)]
pub struct PackFilter {
    filter: RsOperator,
}

impl PackFilter {
    pub fn new(filter: RsOperator) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> &RsOperator {
        &self.filter
    }

    /// The attributes whose min/max indexes must be loaded before calling [`Self::apply`].
    pub fn columns_to_check(&self) -> Vec<Attr> {
        self.filter.get_columns_to_check()
    }

    /// Checks every unit, returning one result per unit in the same order.
    pub fn apply<S: UnitStatsProvider>(&self, units: &[S]) -> Vec<RsResult> {
        let results: Vec<_> = units
            .iter()
            .map(|unit| self.filter.rough_check(unit))
            .collect();
        let skipped = results.iter().filter(|r| !r.is_use()).count();
        debug!(
            "rough set filter {} excluded {skipped} of {} units",
            self.filter,
            units.len()
        );
        results
    }

    /// Indexes of the units that must be read.
    pub fn selected_units<S: UnitStatsProvider>(&self, units: &[S]) -> Vec<usize> {
        self.apply(units)
            .into_iter()
            .enumerate()
            .filter_map(|(i, result)| result.is_use().then_some(i))
            .collect()
    }
}
