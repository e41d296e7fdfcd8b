//! Definitions and builders for the pushed-down expression tree shipped by the query coordinator.
//!
//! An [`Expr`] mirrors the decoded wire node: the expression type and function signature are kept
//! as raw codes, because a newer coordinator may send codes this crate does not know about. Such
//! nodes are legal input; they just never turn into a usable filter.

use std::fmt::{Display, Formatter};

use itertools::Itertools;
use strum::{AsRefStr, Display as StrumDisplay, EnumIter, FromRepr};

use crate::classify;

pub use self::scalars::{DecimalData, Scalar, MAX_DECIMAL_PRECISION};
pub use self::signatures::ScalarFuncSig;

pub mod codec;
mod scalars;
mod signatures;

/// The discriminant of an expression node. Discriminants are the wire codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, StrumDisplay, EnumIter, FromRepr)]
#[repr(i32)]
pub enum ExprType {
    // literals
    Null = 0,
    Int64 = 1,
    Uint64 = 2,
    Float32 = 3,
    Float64 = 4,
    String = 5,
    Bytes = 6,
    MysqlBit = 101,
    MysqlDecimal = 102,
    MysqlDuration = 103,
    MysqlEnum = 104,
    MysqlHex = 105,
    MysqlSet = 106,
    MysqlTime = 107,
    MysqlJson = 108,
    ValueList = 151,

    ColumnRef = 201,

    // aggregates
    Count = 3001,
    Sum = 3002,
    Avg = 3003,
    Min = 3004,
    Max = 3005,
    First = 3006,
    GroupConcat = 3007,
    AggBitAnd = 3008,
    AggBitOr = 3009,
    AggBitXor = 3010,
    Std = 3011,
    Stddev = 3012,
    StddevPop = 3013,
    StddevSamp = 3014,
    VarPop = 3015,
    VarSamp = 3016,
    Variance = 3017,
    JsonArrayAgg = 3018,
    JsonObjectAgg = 3019,
    ApproxCountDistinct = 3020,

    ScalarFunc = 10000,
}

/// A node of a pushed-down expression tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Expr {
    /// Raw [`ExprType`] code
    pub tp: i32,
    /// Raw [`ScalarFuncSig`] code, only meaningful for scalar function nodes
    pub sig: i32,
    /// Encoded literal value or column index (see [`codec`])
    pub val: Vec<u8>,
    pub children: Vec<Expr>,
}

impl Expr {
    /// The node's expression type, if the code is known.
    pub fn expr_type(&self) -> Option<ExprType> {
        ExprType::from_repr(self.tp)
    }

    /// The node's function signature, if the code is known.
    pub fn scalar_func_sig(&self) -> Option<ScalarFuncSig> {
        ScalarFuncSig::from_code(self.sig)
    }

    /// Creates a node from raw codes and payload, exactly as it would arrive off the wire.
    pub fn raw(tp: i32, sig: i32, val: Vec<u8>, children: Vec<Expr>) -> Self {
        Self {
            tp,
            sig,
            val,
            children,
        }
    }

    /// Create a new reference to the column at `index` of the scanned column set.
    pub fn column_ref(index: i64) -> Self {
        Self::raw(
            ExprType::ColumnRef as i32,
            0,
            codec::encode_int64(index),
            vec![],
        )
    }

    /// Create a new literal node holding the encoding of `value`.
    pub fn literal(value: impl Into<Scalar>) -> Self {
        let (tp, val) = match value.into() {
            Scalar::Null => (ExprType::Null, vec![]),
            Scalar::Int64(v) => (ExprType::Int64, codec::encode_int64(v)),
            Scalar::UInt64(v) => (ExprType::Uint64, codec::encode_uint64(v)),
            Scalar::Float64(v) => (ExprType::Float64, codec::encode_float64(v)),
            Scalar::Decimal(v) => (ExprType::MysqlDecimal, codec::encode_decimal(&v)),
            Scalar::String(v) => (ExprType::String, v.into_bytes()),
            Scalar::Binary(v) => (ExprType::Bytes, v),
            Scalar::Time(v) => (ExprType::MysqlTime, codec::encode_uint64(v)),
            Scalar::Duration(v) => (ExprType::MysqlDuration, codec::encode_int64(v)),
        };
        Self::raw(tp as i32, 0, val, vec![])
    }

    /// Creates a new scalar function application `sig(children...)`
    pub fn scalar_func(sig: ScalarFuncSig, children: impl IntoIterator<Item = Expr>) -> Self {
        Self::raw(
            ExprType::ScalarFunc as i32,
            sig.code(),
            vec![],
            children.into_iter().collect(),
        )
    }

    /// Creates a new aggregate function application `tp(children...)`
    pub fn aggregate(tp: ExprType, children: impl IntoIterator<Item = Expr>) -> Self {
        Self::raw(tp as i32, 0, vec![], children.into_iter().collect())
    }

    /// Creates a new expression `left AND right`
    pub fn and(left: Expr, right: Expr) -> Self {
        Self::and_from([left, right])
    }

    /// Creates a new expression `left OR right`
    pub fn or(left: Expr, right: Expr) -> Self {
        Self::or_from([left, right])
    }

    /// Creates a new expression AND(children...)
    pub fn and_from(children: impl IntoIterator<Item = Expr>) -> Self {
        Self::scalar_func(ScalarFuncSig::LogicalAnd, children)
    }

    /// Creates a new expression OR(children...)
    pub fn or_from(children: impl IntoIterator<Item = Expr>) -> Self {
        Self::scalar_func(ScalarFuncSig::LogicalOr, children)
    }

    /// Creates a new expression `NOT child`, using the integer flavor of NOT
    pub fn not(child: Expr) -> Self {
        Self::scalar_func(ScalarFuncSig::UnaryNotInt, [child])
    }
}

/// Nodes nested deeper than this are elided by `Display for Expr`.
pub const MAX_DISPLAY_DEPTH: usize = 64;

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.display_depth(MAX_DISPLAY_DEPTH).fmt(f)
    }
}

impl Expr {
    /// Renders this node and at most `depth` levels of descendants. The children of the deepest
    /// rendered nodes are elided as `...`.
    pub fn display_depth(&self, depth: usize) -> ExprDisplay<'_> {
        ExprDisplay { expr: self, depth }
    }
}

/// The debug text of an [`Expr`], see [`Expr::display_depth`].
#[derive(Debug, Clone, Copy)]
pub struct ExprDisplay<'a> {
    expr: &'a Expr,
    depth: usize,
}

impl ExprDisplay<'_> {
    fn children(&self) -> String {
        if self.expr.children.is_empty() {
            return String::new();
        }
        match self.depth.checked_sub(1) {
            Some(depth) => self
                .expr
                .children
                .iter()
                .map(|child| child.display_depth(depth))
                .join(", "),
            None => "...".to_string(),
        }
    }
}

impl Display for ExprDisplay<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let expr = self.expr;
        let Some(tp) = expr.expr_type() else {
            return write!(f, "Unknown(tp={})", expr.tp);
        };
        match tp {
            ExprType::ColumnRef => match codec::decode_int64(&expr.val) {
                Ok(index) => write!(f, "ColumnRef(#{index})"),
                Err(_) => write!(f, "ColumnRef(0x{})", hex(&expr.val)),
            },
            ExprType::ScalarFunc => match expr.scalar_func_sig() {
                Some(sig) => write!(f, "{sig}({})", self.children()),
                None => write!(f, "UnknownFunc[sig={}]({})", expr.sig, self.children()),
            },
            tp if classify::is_literal_expr(expr) => match classify::decode_literal(expr) {
                Ok(value) => write!(f, "{tp}({value})"),
                Err(_) => write!(f, "{tp}(0x{})", hex(&expr.val)),
            },
            tp => write!(f, "{tp}({})", self.children()),
        }
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).join("")
}
