//! A number of utilities useful for testing that we want to use in multiple crates

use itertools::Itertools;

use rsfilter::classify;
use rsfilter::expressions::{Expr, Scalar, ScalarFuncSig};
use rsfilter::filter_parser::{filter_type_of, RsFilterType};
use rsfilter::rs_operator::CompareOp;
use rsfilter::schema::{ColumnDefine, ColumnDefines, DataType};
use rsfilter::stats::{PackStats, UnitStats};

/// The column set of [`sample_table`]: `id`, `name`, `price`, `qty`.
pub fn sample_columns() -> ColumnDefines {
    vec![
        ColumnDefine::new(1, "id", DataType::Int64),
        ColumnDefine::new(2, "name", DataType::String),
        ColumnDefine::new(3, "price", DataType::Float64),
        ColumnDefine::new(4, "qty", DataType::Int64),
    ]
}

/// An in-memory table: a column set plus rows of values, one per column.
#[derive(Debug, Clone)]
pub struct TestTable {
    pub columns: ColumnDefines,
    pub rows: Vec<Vec<Scalar>>,
}

impl TestTable {
    /// Splits the rows into consecutive units of `unit_size` rows and computes their statistics.
    pub fn unit_stats(&self, unit_size: usize) -> Vec<PackStats> {
        self.units(unit_size)
            .into_iter()
            .map(|rows| {
                self.columns.iter().enumerate().fold(
                    PackStats::new(rows.len() as u64),
                    |stats, (i, column)| {
                        let values = rows.iter().map(|row| row[i].clone());
                        stats.with_column(column.id, UnitStats::from_values(values))
                    },
                )
            })
            .collect()
    }

    /// The rows of each unit, as split by [`Self::unit_stats`].
    pub fn units(&self, unit_size: usize) -> Vec<Vec<Vec<Scalar>>> {
        self.rows
            .iter()
            .chunks(unit_size)
            .into_iter()
            .map(|chunk| chunk.cloned().collect())
            .collect()
    }
}

/// A table of 64 rows over [`sample_columns`] whose `id` increases with the row number, so that
/// units of consecutive rows have narrow, disjoint `id` ranges. Every seventh `qty` is NULL.
pub fn sample_table() -> TestTable {
    const NAMES: [&str; 8] = [
        "apple", "banana", "cherry", "date", "elder", "fig", "grape", "kiwi",
    ];
    let rows = (0..64i64)
        .map(|i| {
            let qty = if i % 7 == 3 {
                Scalar::Null
            } else {
                Scalar::Int64((i * 5) % 23)
            };
            vec![
                Scalar::Int64(i),
                Scalar::from(NAMES[(i / 8) as usize]),
                Scalar::Float64(i as f64 * 0.5),
                qty,
            ]
        })
        .collect();
    TestTable {
        columns: sample_columns(),
        rows,
    }
}

pub fn col(index: i64) -> Expr {
    Expr::column_ref(index)
}

pub fn lit(value: impl Into<Scalar>) -> Expr {
    Expr::literal(value)
}

/// `left <sig> right`
pub fn cmp(sig: ScalarFuncSig, left: Expr, right: Expr) -> Expr {
    Expr::scalar_func(sig, [left, right])
}

/// Evaluates a filter expression against one row, the way an exact row filter would.
///
/// Returns `None` for NULL. Comparisons between a column and a literal, AND, OR and NOT follow SQL
/// three-valued logic. Every other expression evaluates to `opaque`, which lets callers try out
/// whatever an expression the rough set filter does not understand might have returned.
pub fn eval_row(expr: &Expr, row: &[Scalar], opaque: Option<bool>) -> Option<bool> {
    let Some(filter_type) = expr.scalar_func_sig().and_then(filter_type_of) else {
        return opaque;
    };
    let children = &expr.children;
    match filter_type {
        RsFilterType::Not => match children.as_slice() {
            [child] => eval_row(child, row, opaque).map(|v| !v),
            _ => opaque,
        },
        RsFilterType::And => children.iter().fold(Some(true), |acc, child| {
            match (acc, eval_row(child, row, opaque)) {
                (Some(false), _) | (_, Some(false)) => Some(false),
                (Some(true), Some(true)) => Some(true),
                _ => None,
            }
        }),
        RsFilterType::Or => children.iter().fold(Some(false), |acc, child| {
            match (acc, eval_row(child, row, opaque)) {
                (Some(true), _) | (_, Some(true)) => Some(true),
                (Some(false), Some(false)) => Some(false),
                _ => None,
            }
        }),
        RsFilterType::Compare(op) => eval_compare(children, row, op).unwrap_or(opaque),
    }
}

/// `None` if the comparison is not between a column and a literal of a comparable type.
fn eval_compare(children: &[Expr], row: &[Scalar], op: CompareOp) -> Option<Option<bool>> {
    let [left, right] = children else {
        return None;
    };
    let operand = |expr: &Expr| -> Option<(Scalar, bool)> {
        if classify::is_column_expr(expr) {
            let index = classify::decode_column_index(expr).ok()?;
            let index = usize::try_from(index).ok()?;
            Some((row.get(index)?.clone(), true))
        } else if classify::is_literal_expr(expr) {
            Some((classify::decode_literal(expr).ok()?, false))
        } else {
            None
        }
    };
    let (column, literal) = match (operand(left)?, operand(right)?) {
        ((column, true), (literal, false)) | ((literal, false), (column, true)) => {
            (column, literal)
        }
        _ => return None,
    };
    // `literal <op> column` holds iff `column <commuted op> literal` does
    let op = if classify::is_literal_expr(&children[0]) {
        op.commute()
    } else {
        op
    };
    if column.is_null() || literal.is_null() {
        return Some(None);
    }
    let ordering = column.partial_cmp(&literal)?;
    let holds = match op {
        CompareOp::Equal => ordering.is_eq(),
        CompareOp::NotEqual => ordering.is_ne(),
        CompareOp::Less => ordering.is_lt(),
        CompareOp::LessEqual => ordering.is_le(),
        CompareOp::Greater => ordering.is_gt(),
        CompareOp::GreaterEqual => ordering.is_ge(),
    };
    Some(Some(holds))
}
