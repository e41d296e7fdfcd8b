//! Evaluation of a filter tree against the min/max statistics of one storage unit.
use std::cmp::Ordering;

use tracing::trace;

use super::{CompareOp, RsOperator, RsResult};
use crate::expressions::Scalar;
use crate::schema::{Attr, ColumnId};

/// Provides the statistics of one storage unit ("pack"). Any stat may be missing, in which case
/// nothing is concluded from it.
pub trait UnitStatsProvider {
    /// The smallest non-NULL value of the column in this unit.
    fn get_min_stat(&self, col_id: ColumnId) -> Option<&Scalar>;

    /// The largest non-NULL value of the column in this unit.
    fn get_max_stat(&self, col_id: ColumnId) -> Option<&Scalar>;

    /// The number of NULL values of the column in this unit.
    fn get_nullcount_stat(&self, col_id: ColumnId) -> Option<u64>;

    /// The number of rows in this unit.
    fn get_rowcount_stat(&self) -> u64;
}

impl<T: UnitStatsProvider + ?Sized> UnitStatsProvider for &T {
    fn get_min_stat(&self, col_id: ColumnId) -> Option<&Scalar> {
        (**self).get_min_stat(col_id)
    }

    fn get_max_stat(&self, col_id: ColumnId) -> Option<&Scalar> {
        (**self).get_max_stat(col_id)
    }

    fn get_nullcount_stat(&self, col_id: ColumnId) -> Option<u64> {
        (**self).get_nullcount_stat(col_id)
    }

    fn get_rowcount_stat(&self) -> u64 {
        (**self).get_rowcount_stat()
    }
}

impl RsOperator {
    /// Checks the filter against the statistics of one unit.
    pub fn rough_check(&self, stats: &dyn UnitStatsProvider) -> RsResult {
        match self {
            Self::Empty => RsResult::AllMatch,
            Self::Unsupported { .. } => RsResult::SomeMatch,
            Self::Compare {
                attr, value, op, ..
            } => check_compare(attr, *op, value, stats),
            Self::Not(child) => child.rough_check(stats).not(),
            Self::And(children) => RsResult::all(children.iter().map(|c| c.rough_check(stats))),
            Self::Or(children) => RsResult::any(children.iter().map(|c| c.rough_check(stats))),
        }
    }

    /// True if no row of the unit can satisfy the filter.
    pub fn can_skip(&self, stats: &dyn UnitStatsProvider) -> bool {
        self.rough_check(stats) == RsResult::NoMatch
    }
}

fn check_compare(
    attr: &Attr,
    op: CompareOp,
    value: &Scalar,
    stats: &dyn UnitStatsProvider,
) -> RsResult {
    if value.is_null() || !attr.data_type.is_comparable_with(value) {
        return RsResult::SomeMatch;
    }
    if stats.get_nullcount_stat(attr.col_id) == Some(stats.get_rowcount_stat()) {
        // all-NULL (or empty) unit: its min/max say nothing
        return RsResult::SomeMatch;
    }
    let (Some(min), Some(max)) = (
        stats.get_min_stat(attr.col_id),
        stats.get_max_stat(attr.col_id),
    ) else {
        return RsResult::SomeMatch;
    };
    let (Some(min_ord), Some(max_ord)) = (min.partial_cmp(value), max.partial_cmp(value)) else {
        return RsResult::SomeMatch;
    };

    // NULL rows neither satisfy nor falsify a comparison, so they cannot change the outcome
    let result = check_min_max(op, min_ord, max_ord);
    trace!("{attr} {op} {value} over [{min}, {max}] -> {result}");
    result
}

/// Checks `col <op> value` given how the column's min and max compare to `value`.
fn check_min_max(op: CompareOp, min: Ordering, max: Ordering) -> RsResult {
    use CompareOp::*;
    let (min_lt, min_eq, min_gt) = (min.is_lt(), min.is_eq(), min.is_gt());
    let (max_lt, max_eq, max_gt) = (max.is_lt(), max.is_eq(), max.is_gt());
    match op {
        Equal if min_gt || max_lt => RsResult::NoMatch,
        Equal if min_eq && max_eq => RsResult::AllMatch,
        NotEqual if min_eq && max_eq => RsResult::NoMatch,
        NotEqual if min_gt || max_lt => RsResult::AllMatch,
        Less if max_lt => RsResult::AllMatch,
        Less if !min_lt => RsResult::NoMatch,
        LessEqual if !max_gt => RsResult::AllMatch,
        LessEqual if min_gt => RsResult::NoMatch,
        Greater if min_gt => RsResult::AllMatch,
        Greater if !max_gt => RsResult::NoMatch,
        GreaterEqual if !min_lt => RsResult::AllMatch,
        GreaterEqual if max_lt => RsResult::NoMatch,
        _ => RsResult::SomeMatch,
    }
}
