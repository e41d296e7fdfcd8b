//! The rough-set filter tree produced by the filter parser, and its three-valued evaluation
//! against per-unit column statistics.
//!
//! A filter is a sound over-approximation of the predicate it was compiled from: whenever some row
//! of a unit satisfies the predicate, [`RsOperator::rough_check`] reports a possible match for that
//! unit. Anything the parser could not prove is represented by [`RsOperator::Unsupported`], which
//! matches every unit.

use std::fmt::{Display, Formatter};

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use strum::{AsRefStr, Display as StrumDisplay, EnumIter};

use crate::expressions::Scalar;
use crate::schema::Attr;

pub use self::rough_check::UnitStatsProvider;

mod rough_check;


/// A comparison between a column and a literal, with the column on the left.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    AsRefStr,
    StrumDisplay,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

impl CompareOp {
    /// Returns `<op2>` such that `B <op2> A` is equivalent to `A <op> B`.
    pub fn commute(&self) -> CompareOp {
        use CompareOp::*;
        match self {
            Less => Greater,
            LessEqual => GreaterEqual,
            Greater => Less,
            GreaterEqual => LessEqual,
            Equal | NotEqual => *self,
        }
    }
}

/// Where NULLs sort relative to non-NULL values in the min/max index of a comparison.
///
/// The parser does not know how the index was built, so the direction is always unspecified and
/// evaluation never draws conclusions from NULL placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullDirection {
    #[default]
    Unspecified,
}

/// Outcome of checking a filter against the statistics of one storage unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, StrumDisplay, EnumIter)]
pub enum RsResult {
    /// Some rows may match.
    SomeMatch,
    /// No row satisfies the filter; the unit can be skipped.
    NoMatch,
    /// No row falsifies the filter (rows may still evaluate to NULL).
    AllMatch,
}

impl RsResult {
    #[must_use]
    pub fn not(self) -> Self {
        use RsResult::*;
        match self {
            SomeMatch => SomeMatch,
            NoMatch => AllMatch,
            AllMatch => NoMatch,
        }
    }

    #[must_use]
    pub fn and(self, other: Self) -> Self {
        use RsResult::*;
        match (self, other) {
            (NoMatch, _) | (_, NoMatch) => NoMatch,
            (AllMatch, AllMatch) => AllMatch,
            _ => SomeMatch,
        }
    }

    #[must_use]
    pub fn or(self, other: Self) -> Self {
        use RsResult::*;
        match (self, other) {
            (AllMatch, _) | (_, AllMatch) => AllMatch,
            (NoMatch, NoMatch) => NoMatch,
            _ => SomeMatch,
        }
    }

    /// Conjunction of any number of results. The empty conjunction matches everything.
    pub fn all(results: impl IntoIterator<Item = Self>) -> Self {
        results.into_iter().fold(Self::AllMatch, Self::and)
    }

    /// Disjunction of any number of results. The empty disjunction matches nothing.
    pub fn any(results: impl IntoIterator<Item = Self>) -> Self {
        results.into_iter().fold(Self::NoMatch, Self::or)
    }

    /// True if the unit this result was computed for needs to be read.
    pub fn is_use(&self) -> bool {
        *self != Self::NoMatch
    }
}

/// A rough-set filter over column statistics.
#[derive(Debug, Clone, PartialEq)]
pub enum RsOperator {
    /// Matches every unit. Used when there is nothing to filter on.
    Empty,
    /// Matches every unit. Stands in for a (sub)predicate that could not be compiled.
    Unsupported {
        /// Rendering of the offending expression
        content: String,
        reason: String,
    },
    /// `attr <op> value`
    Compare {
        attr: Attr,
        value: Scalar,
        op: CompareOp,
        null_direction: NullDirection,
    },
    Not(Box<RsOperator>),
    And(Vec<RsOperator>),
    Or(Vec<RsOperator>),
}

impl RsOperator {
    pub fn unsupported(content: impl ToString, reason: impl ToString) -> Self {
        Self::Unsupported {
            content: content.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates a new comparison `attr <op> value`
    pub fn compare(attr: Attr, op: CompareOp, value: impl Into<Scalar>) -> Self {
        Self::Compare {
            attr,
            value: value.into(),
            op,
            null_direction: NullDirection::Unspecified,
        }
    }

    pub fn not(child: RsOperator) -> Self {
        Self::Not(Box::new(child))
    }

    pub fn and(children: impl IntoIterator<Item = RsOperator>) -> Self {
        Self::And(children.into_iter().collect())
    }

    pub fn or(children: impl IntoIterator<Item = RsOperator>) -> Self {
        Self::Or(children.into_iter().collect())
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }

    /// Short lowercase name of the operator.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Unsupported { .. } => "unsupported",
            Self::Compare { op, .. } => match op {
                CompareOp::Equal => "equal",
                CompareOp::NotEqual => "not_equal",
                CompareOp::Less => "less",
                CompareOp::LessEqual => "less_equal",
                CompareOp::Greater => "greater",
                CompareOp::GreaterEqual => "greater_equal",
            },
            Self::Not(_) => "not",
            Self::And(_) => "and",
            Self::Or(_) => "or",
        }
    }

    /// The attributes whose statistics the filter needs, in order of first reference.
    pub fn get_columns_to_check(&self) -> Vec<Attr> {
        let mut attrs: Vec<Attr> = vec![];
        self.collect_columns(&mut attrs);
        attrs
    }

    fn collect_columns(&self, attrs: &mut Vec<Attr>) {
        match self {
            Self::Empty | Self::Unsupported { .. } => {}
            Self::Compare { attr, .. } => {
                if !attrs.iter().any(|a| a.col_id == attr.col_id) {
                    attrs.push(attr.clone());
                }
            }
            Self::Not(child) => child.collect_columns(attrs),
            Self::And(children) | Self::Or(children) => {
                children.iter().for_each(|c| c.collect_columns(attrs))
            }
        }
    }

    /// JSON rendering of the filter tree, for diagnostics.
    pub fn to_debug_string(&self) -> String {
        self.to_debug_json().to_string()
    }

    fn to_debug_json(&self) -> Value {
        match self {
            Self::Empty => json!({ "op": self.name() }),
            Self::Unsupported { content, reason } => json!({
                "op": self.name(),
                "reason": reason,
                "content": content,
            }),
            Self::Compare { attr, value, .. } => json!({
                "op": self.name(),
                "col": attr.col_name,
                "col_id": attr.col_id,
                "value": value.to_string(),
            }),
            Self::Not(child) => json!({
                "op": self.name(),
                "children": [child.to_debug_json()],
            }),
            Self::And(children) | Self::Or(children) => json!({
                "op": self.name(),
                "children": children.iter().map(Self::to_debug_json).collect_vec(),
            }),
        }
    }
}

impl Display for RsOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty"),
            Self::Unsupported { reason, .. } => write!(f, "unsupported({reason})"),
            Self::Compare { attr, value, .. } => write!(f, "{}({attr}, {value})", self.name()),
            Self::Not(child) => write!(f, "not({child})"),
            Self::And(children) | Self::Or(children) => {
                write!(f, "{}({})", self.name(), children.iter().join(", "))
            }
        }
    }
}
