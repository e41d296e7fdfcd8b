use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::utils::require;
use crate::{Error, FilterResult};

/// The largest precision a decimal literal may have to be representable as an `i128`.
pub const MAX_DECIMAL_PRECISION: u8 = 38;

/// A fixed-point decimal value: `unscaled * 10^-scale`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "DecimalParts")]
pub struct DecimalData {
    unscaled: i128,
    precision: u8,
    scale: u8,
}

/// The serialized fields of a [`DecimalData`], checked by [`DecimalData::try_new`] on the way in.
#[derive(Deserialize)]
struct DecimalParts {
    unscaled: i128,
    precision: u8,
    scale: u8,
}

impl TryFrom<DecimalParts> for DecimalData {
    type Error = Error;

    fn try_from(parts: DecimalParts) -> FilterResult<Self> {
        Self::try_new(parts.unscaled, parts.precision, parts.scale)
    }
}

impl DecimalData {
    pub fn try_new(unscaled: i128, precision: u8, scale: u8) -> FilterResult<Self> {
        require!(
            (1..=MAX_DECIMAL_PRECISION).contains(&precision),
            Error::invalid_payload(format!(
                "decimal precision {precision} is outside [1, {MAX_DECIMAL_PRECISION}]"
            ))
        );
        require!(
            scale <= precision,
            Error::invalid_payload(format!("decimal scale {scale} exceeds precision {precision}"))
        );
        let digits = unscaled
            .unsigned_abs()
            .checked_ilog10()
            .map_or(1, |d| d + 1);
        require!(
            digits <= precision as u32,
            Error::invalid_payload(format!("decimal {unscaled} does not fit precision {precision}"))
        );
        Ok(Self {
            unscaled,
            precision,
            scale,
        })
    }

    pub fn unscaled(&self) -> i128 {
        self.unscaled
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    pub fn scale(&self) -> u8 {
        self.scale
    }

    /// The unscaled value rescaled to a larger `scale`, if it does not overflow.
    fn rescaled(&self, scale: u8) -> Option<i128> {
        let factor = 10i128.checked_pow((scale.checked_sub(self.scale)?) as u32)?;
        self.unscaled.checked_mul(factor)
    }
}

impl PartialOrd for DecimalData {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let scale = self.scale.max(other.scale);
        Some(self.rescaled(scale)?.cmp(&other.rescaled(scale)?))
    }
}

impl Display for DecimalData {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let sign = if self.unscaled < 0 { "-" } else { "" };
        let abs = self.unscaled.unsigned_abs();
        match self.scale {
            0 => write!(f, "{sign}{abs}"),
            scale => {
                let factor = 10u128.pow(scale as u32);
                let width = scale as usize;
                write!(f, "{sign}{}.{:0width$}", abs / factor, abs % factor)
            }
        }
    }
}

/// A decoded literal value, or a min/max statistic of a storage unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    Null,
    Int64(i64),
    UInt64(u64),
    Float64(f64),
    Decimal(DecimalData),
    String(String),
    Binary(Vec<u8>),
    /// A packed MySQL datetime, which orders the same way its unpacked value does
    Time(u64),
    /// A MySQL duration in nanoseconds
    Duration(i64),
}

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::String(s) => Some(s.as_bytes()),
            Self::Binary(b) => Some(b),
            _ => None,
        }
    }
}

/// Scalars of the same family compare by value; anything else (including NULL) is incomparable.
///
/// Strings and binaries compare bytewise. Statistics and literals of a string column must
/// therefore both use a binary collation: under a case-insensitive collation `'A' = 'a'` holds
/// while their bytes differ, and pruning on such a column could skip matching rows.
///
/// Integers and decimals are compared exactly. Integers are never compared against floats,
/// because the conversion is lossy and a wrong answer here would wrongly skip data.
impl PartialOrd for Scalar {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        use Scalar::*;
        match (self, other) {
            (Int64(a), Int64(b)) => a.partial_cmp(b),
            (UInt64(a), UInt64(b)) => a.partial_cmp(b),
            (Int64(a), UInt64(b)) => (*a as i128).partial_cmp(&(*b as i128)),
            (UInt64(a), Int64(b)) => (*a as i128).partial_cmp(&(*b as i128)),
            (Float64(a), Float64(b)) => a.partial_cmp(b),
            (Decimal(a), Decimal(b)) => a.partial_cmp(b),
            (Decimal(a), Int64(b)) => a.partial_cmp(&DecimalData::integral(*b as i128)),
            (Decimal(a), UInt64(b)) => a.partial_cmp(&DecimalData::integral(*b as i128)),
            (Int64(a), Decimal(b)) => DecimalData::integral(*a as i128).partial_cmp(b),
            (UInt64(a), Decimal(b)) => DecimalData::integral(*a as i128).partial_cmp(b),
            (Time(a), Time(b)) => a.partial_cmp(b),
            (Duration(a), Duration(b)) => a.partial_cmp(b),
            (a, b) => a.as_bytes()?.partial_cmp(b.as_bytes()?),
        }
    }
}

impl DecimalData {
    // Integers are compared as scale-0 decimals. Precision is irrelevant for comparisons.
    fn integral(value: i128) -> Self {
        Self {
            unscaled: value,
            precision: MAX_DECIMAL_PRECISION,
            scale: 0,
        }
    }
}

impl Display for Scalar {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use Scalar::*;
        match self {
            Null => write!(f, "NULL"),
            Int64(v) => write!(f, "{v}"),
            UInt64(v) => write!(f, "{v}"),
            Float64(v) => write!(f, "{v}"),
            Decimal(d) => write!(f, "{d}"),
            String(s) => write!(f, "'{s}'"),
            Binary(b) => {
                write!(f, "0x")?;
                b.iter().try_for_each(|byte| write!(f, "{byte:02x}"))
            }
            Time(t) => write!(f, "MyDateTime({t})"),
            Duration(d) => write!(f, "MyDuration({d})"),
        }
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Self::Int64(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Self::Int64(v.into())
    }
}

impl From<u64> for Scalar {
    fn from(v: u64) -> Self {
        Self::UInt64(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Self::Float64(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Self::String(v.into())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<DecimalData> for Scalar {
    fn from(v: DecimalData) -> Self {
        Self::Decimal(v)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
