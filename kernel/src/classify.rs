//! Discriminant-only classification of expression nodes, and decoding of the payloads carried by
//! literal and column-reference nodes.
//!
//! Nothing here recurses into children: a node is classified purely by its expression type code.

use strum::AsRefStr;

use crate::expressions::{codec, Expr, ExprType, Scalar};
use crate::schema::{ColumnDefine, ColumnId};
use crate::{Error, FilterResult};

/// What role an expression node can play in a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
pub enum ExprKind {
    ColumnRef,
    Literal,
    ScalarFunc,
    Aggregate,
    /// An expression type code this crate does not know about
    Unclassified,
}

/// Classifies a node by its expression type code.
pub fn classify(expr: &Expr) -> ExprKind {
    use ExprType::*;
    let Some(tp) = expr.expr_type() else {
        return ExprKind::Unclassified;
    };
    match tp {
        ColumnRef => ExprKind::ColumnRef,
        Null | Int64 | Uint64 | Float32 | Float64 | String | Bytes | MysqlBit | MysqlDecimal
        | MysqlDuration | MysqlEnum | MysqlHex | MysqlSet | MysqlTime | MysqlJson | ValueList => {
            ExprKind::Literal
        }
        ScalarFunc => ExprKind::ScalarFunc,
        Count | Sum | Avg | Min | Max | First | GroupConcat | AggBitAnd | AggBitOr | AggBitXor
        | Std | Stddev | StddevPop | StddevSamp | VarPop | VarSamp | Variance | JsonArrayAgg
        | JsonObjectAgg | ApproxCountDistinct => ExprKind::Aggregate,
    }
}

pub fn is_column_expr(expr: &Expr) -> bool {
    classify(expr) == ExprKind::ColumnRef
}

pub fn is_literal_expr(expr: &Expr) -> bool {
    classify(expr) == ExprKind::Literal
}

pub fn is_function_expr(expr: &Expr) -> bool {
    classify(expr) == ExprKind::ScalarFunc
}

pub fn is_agg_function_expr(expr: &Expr) -> bool {
    classify(expr) == ExprKind::Aggregate
}

/// Decodes the value of a literal node.
///
/// Fails with [`Error::InvalidPayload`] if the node is not a literal, if its payload is malformed,
/// or if it is a literal kind whose min/max ordering we cannot reason about (JSON, bit, enum, set,
/// hex, value lists).
pub fn decode_literal(expr: &Expr) -> FilterResult<Scalar> {
    use ExprType::*;
    let val = &expr.val;
    let value = match expr.expr_type() {
        Some(Null) => Scalar::Null,
        Some(Int64) => Scalar::Int64(codec::decode_int64(val)?),
        Some(MysqlDuration) => Scalar::Duration(codec::decode_int64(val)?),
        Some(Uint64) => Scalar::UInt64(codec::decode_uint64(val)?),
        Some(MysqlTime) => Scalar::Time(codec::decode_uint64(val)?),
        Some(Float32 | Float64) => Scalar::Float64(codec::decode_float64(val)?),
        Some(String) => match std::str::from_utf8(val) {
            Ok(s) => Scalar::String(s.to_owned()),
            Err(_) => Scalar::Binary(val.clone()),
        },
        Some(Bytes) => Scalar::Binary(val.clone()),
        Some(MysqlDecimal) => Scalar::Decimal(codec::decode_decimal(val)?),
        Some(tp) => {
            return Err(Error::invalid_payload(format!("{tp} literal is not decodable")));
        }
        None => {
            return Err(Error::invalid_payload(format!("unknown expression type {}", expr.tp)));
        }
    };
    Ok(value)
}

/// Decodes the column index carried by a column-reference node.
pub fn decode_column_index(expr: &Expr) -> FilterResult<i64> {
    codec::decode_int64(&expr.val)
}

/// Resolves a column-reference node to the id of the column it addresses in `columns`.
///
/// An index outside `[0, columns.len())` makes the whole request invalid, and so does a payload
/// that does not even decode to an index.
pub fn column_id_for_column_expr(expr: &Expr, columns: &[ColumnDefine]) -> FilterResult<ColumnId> {
    // A malformed payload cannot address any column; report it as index -1.
    let index = decode_column_index(expr).unwrap_or(-1);
    usize::try_from(index)
        .ok()
        .and_then(|i| columns.get(i))
        .map(|column| column.id)
        .ok_or_else(|| Error::bad_request(index, columns.len()))
}
