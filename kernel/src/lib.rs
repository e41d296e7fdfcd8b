//! Compiles pushed-down filter expressions into rough-set filters.
//!
//! A query coordinator ships the filter conditions of a scan as trees of [`Expr`] nodes. The
//! storage layer cannot evaluate arbitrary expressions while deciding which storage units
//! ("packs") to read, but it keeps min/max statistics per unit and column. [`FilterParser`]
//! translates the part of the filter it understands into an [`RsOperator`] tree, which is then
//! checked against the statistics of each unit to skip units that cannot contain a matching row.
//!
//! ```
//! use rsfilter::expressions::{Expr, ScalarFuncSig};
//! use rsfilter::schema::{ColumnDefine, DataType};
//! use rsfilter::stats::{PackStats, UnitStats};
//! use rsfilter::{DagQueryInfo, FilterParser};
//!
//! let columns = vec![ColumnDefine::new(1, "a", DataType::Int64)];
//! // a < 5
//! let query = DagQueryInfo::new([Expr::scalar_func(
//!     ScalarFuncSig::LtInt,
//!     [Expr::column_ref(0), Expr::literal(5)],
//! )]);
//! let filter = FilterParser::new()
//!     .parse_dag_query(&query, &columns, columns.as_slice())
//!     .unwrap();
//!
//! let unit = PackStats::new(100).with_column(1, UnitStats::new(10, 20, 0));
//! assert!(filter.can_skip(&unit));
//! ```
//!
//! Compilation is conservative: whatever cannot be compiled becomes [`RsOperator::Unsupported`],
//! which never causes a unit to be skipped. The only error is a column reference that does not
//! address any column of the scan ([`Error::BadRequest`]).

pub mod classify;
pub mod error;
pub mod expressions;
pub mod filter_parser;
pub mod pack_filter;
pub mod rs_operator;
pub mod schema;
pub mod settings;
pub mod stats;

pub(crate) mod utils;

pub use error::{Error, FilterResult};
pub use expressions::Expr;
pub use filter_parser::{DagQueryInfo, FilterParser};
pub use pack_filter::PackFilter;
pub use rs_operator::{RsOperator, RsResult, UnitStatsProvider};
pub use settings::FilterSettings;
