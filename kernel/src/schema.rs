//! Column definitions of the scanned table and the attribute descriptors that rough-set filters
//! are built against.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::expressions::Scalar;

/// Stable identifier of a column, independent of its position in any particular column set.
pub type ColumnId = i64;

/// The logical type of a column, as far as its min/max statistics are concerned.
///
/// Narrower integer types are widened to 64 bits by the statistics writer, so only the signedness
/// matters here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Int64,
    UInt64,
    Float64,
    Decimal { precision: u8, scale: u8 },
    /// A string with a binary collation; its statistics and literals compare bytewise
    String,
    Binary,
    /// A packed MySQL datetime
    Time,
    /// A MySQL duration, in nanoseconds
    Duration,
    Json,
}

impl DataType {
    /// True if min/max statistics of a column of this type can be compared against `value`.
    ///
    /// NULL is comparable with every type; the comparison simply never proves anything.
    pub fn is_comparable_with(&self, value: &Scalar) -> bool {
        use DataType::*;
        match (self, value) {
            (_, Scalar::Null) => true,
            (Json, _) => false,
            (Int64 | UInt64 | Decimal { .. }, Scalar::Int64(_))
            | (Int64 | UInt64 | Decimal { .. }, Scalar::UInt64(_))
            | (Int64 | UInt64 | Decimal { .. }, Scalar::Decimal(_)) => true,
            (Float64, Scalar::Float64(_)) => true,
            (String | Binary, Scalar::String(_) | Scalar::Binary(_)) => true,
            (Time, Scalar::Time(_)) => true,
            (Duration, Scalar::Duration(_)) => true,
            _ => false,
        }
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use DataType::*;
        match self {
            Int64 => write!(f, "Int64"),
            UInt64 => write!(f, "UInt64"),
            Float64 => write!(f, "Float64"),
            Decimal { precision, scale } => write!(f, "Decimal({precision}, {scale})"),
            String => write!(f, "String"),
            Binary => write!(f, "Binary"),
            Time => write!(f, "MyDateTime"),
            Duration => write!(f, "MyDuration"),
            Json => write!(f, "Json"),
        }
    }
}

/// A column of the column set being read by the scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefine {
    pub id: ColumnId,
    pub name: String,
    pub data_type: DataType,
}

impl ColumnDefine {
    pub fn new(id: ColumnId, name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            id,
            name: name.into(),
            data_type,
        }
    }

    /// The attribute descriptor for this column.
    pub fn to_attr(&self) -> Attr {
        Attr::new(self.name.clone(), self.id, self.data_type)
    }
}

/// The ordered column set a request's column references index into.
pub type ColumnDefines = Vec<ColumnDefine>;

/// Identifies the column a rough-set filter checks, and the type of its statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attr {
    pub col_name: String,
    pub col_id: ColumnId,
    pub data_type: DataType,
}

impl Attr {
    pub fn new(col_name: impl Into<String>, col_id: ColumnId, data_type: DataType) -> Self {
        Self {
            col_name: col_name.into(),
            col_id,
            data_type,
        }
    }
}

impl Display for Attr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.col_name, self.col_id)
    }
}

/// Creates attribute descriptors for column ids. The storage layer injects one of these into each
/// compilation; it is only borrowed for the duration of that call.
///
/// Any `Fn(ColumnId) -> Attr` closure is a resolver, as is a [`ColumnDefines`] (which looks the id
/// up among its own columns).
pub trait ResolveAttr {
    fn resolve_attr(&self, col_id: ColumnId) -> Attr;
}

impl<F: Fn(ColumnId) -> Attr> ResolveAttr for F {
    fn resolve_attr(&self, col_id: ColumnId) -> Attr {
        self(col_id)
    }
}

impl ResolveAttr for [ColumnDefine] {
    fn resolve_attr(&self, col_id: ColumnId) -> Attr {
        match self.iter().find(|cd| cd.id == col_id) {
            Some(cd) => cd.to_attr(),
            // Not reachable for ids taken from this very column set
            None => Attr::new(format!("col_{col_id}"), col_id, DataType::Json),
        }
    }
}
