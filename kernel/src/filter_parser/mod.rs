//! Compiles the filter expressions of a pushed-down request into a rough-set filter.
//!
//! Compilation degrades instead of failing: any (sub)expression that cannot be turned into a
//! filter becomes [`RsOperator::Unsupported`], which never excludes a unit. The only error is a
//! column reference that does not address a column of the scanned column set, which means the
//! request itself is broken.

use std::fmt::Display;

use tracing::{debug, trace, warn};

use crate::classify::{self, ExprKind};
use crate::expressions::{Expr, Scalar, ScalarFuncSig};
use crate::rs_operator::{CompareOp, RsOperator};
use crate::schema::{Attr, ColumnDefine, ResolveAttr};
use crate::settings::FilterSettings;
use crate::FilterResult;

pub use self::signatures::{filter_type_of, RsFilterType};

mod signatures;

#[cfg(test)]
mod tests;

/// The part of a pushed-down request the filter parser looks at.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DagQueryInfo {
    /// Independent filter conditions, implicitly conjoined.
    pub filters: Vec<Expr>,
}

impl DagQueryInfo {
    pub fn new(filters: impl IntoIterator<Item = Expr>) -> Self {
        Self {
            filters: filters.into_iter().collect(),
        }
    }
}

/// Translates pushed-down expressions into rough-set filters.
#[derive(Debug, Clone, Default)]
pub struct FilterParser {
    settings: FilterSettings,
}

impl FilterParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: FilterSettings) -> Self {
        Self { settings }
    }

    /// Compiles the filters of a request into one filter.
    ///
    /// No filters compile to [`RsOperator::Empty`], a single filter is compiled as is, and several
    /// filters are compiled one by one and conjoined.
    ///
    /// `resolver` creates the attribute descriptor of every column a comparison refers to. It is
    /// only borrowed for the duration of the call.
    pub fn parse_dag_query<R: ResolveAttr + ?Sized>(
        &self,
        query: &DagQueryInfo,
        columns: &[ColumnDefine],
        resolver: &R,
    ) -> FilterResult<RsOperator> {
        let Some(parser) = self.expr_parser(columns, resolver) else {
            return Ok(RsOperator::Empty);
        };
        let op = match query.filters.as_slice() {
            [] => RsOperator::Empty,
            [filter] => parser.parse_filter(filter, 1, "filter")?,
            filters => RsOperator::And(
                filters
                    .iter()
                    .map(|filter| parser.parse_filter(filter, 1, "filter"))
                    .collect::<FilterResult<_>>()?,
            ),
        };
        debug!("compiled rough set filter: {op}");
        Ok(op)
    }

    /// Compiles a single filter expression, like a request with only that filter.
    pub fn parse_expr<R: ResolveAttr + ?Sized>(
        &self,
        expr: &Expr,
        columns: &[ColumnDefine],
        resolver: &R,
    ) -> FilterResult<RsOperator> {
        let Some(parser) = self.expr_parser(columns, resolver) else {
            return Ok(RsOperator::Empty);
        };
        let op = parser.parse_filter(expr, 1, "filter")?;
        debug!("compiled rough set filter: {op}");
        Ok(op)
    }

    /// `None` if rough set filtering is disabled.
    fn expr_parser<'a, R: ResolveAttr + ?Sized>(
        &'a self,
        columns: &'a [ColumnDefine],
        resolver: &'a R,
    ) -> Option<ExprParser<'a, R>> {
        if !self.settings.enable_rough_set_filter {
            debug!("rough set filter is disabled");
            return None;
        }
        Some(ExprParser {
            columns,
            resolver,
            settings: &self.settings,
        })
    }
}

/// The state of one compilation.
struct ExprParser<'a, R: ?Sized> {
    columns: &'a [ColumnDefine],
    resolver: &'a R,
    settings: &'a FilterSettings,
}

impl<R: ResolveAttr + ?Sized> ExprParser<'_, R> {
    /// Compiles a top-level filter, or a child of a logical operator.
    fn parse_filter(&self, expr: &Expr, depth: usize, position: &str) -> FilterResult<RsOperator> {
        match classify::classify(expr) {
            ExprKind::ScalarFunc => self.parse_ti_expr(expr, depth),
            ExprKind::Aggregate => {
                let tp = expr
                    .expr_type()
                    .map(|tp| tp.to_string())
                    .unwrap_or_default();
                Ok(self.unsupported(expr, format!("agg function: {tp}")))
            }
            _ => Ok(self.unsupported(expr, format!("{position} is not a function"))),
        }
    }

    /// Compiles a scalar function node.
    fn parse_ti_expr(&self, expr: &Expr, depth: usize) -> FilterResult<RsOperator> {
        if depth > self.settings.max_expr_depth {
            // only the head of the subtree: rendering all of it would recurse just as deep
            let head = expr.display_depth(0);
            warn!(
                "Max expression depth {} exceeded by {head}",
                self.settings.max_expr_depth
            );
            return Ok(self.unsupported(head, "expression is nested too deeply"));
        }

        let Some(sig) = expr.scalar_func_sig() else {
            return Ok(self.unsupported(expr, format!("sig {} is not supported", expr.sig)));
        };
        let Some(filter_type) = filter_type_of(sig) else {
            return Ok(self.unsupported(expr, format!("{sig} is not supported")));
        };
        trace!("parsing {sig} as {filter_type}");

        let op = match filter_type {
            RsFilterType::Not => match expr.children.as_slice() {
                [child] if classify::is_function_expr(child) => {
                    RsOperator::not(self.parse_ti_expr(child, depth + 1)?)
                }
                [_] => self.unsupported(expr, "child of logical not is not function"),
                children => self.unsupported(
                    expr,
                    format!("logical not with {} children", children.len()),
                ),
            },
            RsFilterType::And => RsOperator::And(self.parse_children(expr, depth, "and")?),
            RsFilterType::Or => RsOperator::Or(self.parse_children(expr, depth, "or")?),
            RsFilterType::Compare(op) => self.parse_compare(expr, sig, op)?,
        };
        Ok(op)
    }

    fn parse_children(
        &self,
        expr: &Expr,
        depth: usize,
        name: &str,
    ) -> FilterResult<Vec<RsOperator>> {
        let position = format!("child of logical {name}");
        expr.children
            .iter()
            .map(|child| self.parse_filter(child, depth + 1, &position))
            .collect()
    }

    /// Compiles `column <op> literal` or `literal <op> column`.
    fn parse_compare(
        &self,
        expr: &Expr,
        sig: ScalarFuncSig,
        op: CompareOp,
    ) -> FilterResult<RsOperator> {
        if expr.children.len() != 2 {
            let count = expr.children.len();
            let reason = format!("{sig} with {count} children is not supported");
            return Ok(self.unsupported(expr, reason));
        }

        const HAS_COLUMN: u8 = 0b01;
        const HAS_LITERAL: u8 = 0b10;
        let mut state = 0;
        let mut attr: Option<Attr> = None;
        let mut value = None;
        let mut literal_first = false;
        for (i, child) in expr.children.iter().enumerate() {
            match classify::classify(child) {
                ExprKind::ColumnRef => {
                    let col_id = classify::column_id_for_column_expr(child, self.columns)?;
                    attr = Some(self.resolver.resolve_attr(col_id));
                    state |= HAS_COLUMN;
                }
                ExprKind::Literal => {
                    value = Some(classify::decode_literal(child));
                    literal_first = i == 0;
                    state |= HAS_LITERAL;
                }
                _ => {}
            }
        }

        let (Some(attr), Some(value)) = (attr, value) else {
            let reason = format!("{sig} with state {state} is not supported");
            return Ok(self.unsupported(expr, reason));
        };
        let value: Scalar = match value {
            Ok(value) => value,
            Err(err) => {
                let reason = format!("{sig} with undecodable literal: {err}");
                return Ok(self.unsupported(expr, reason));
            }
        };
        if !attr.data_type.is_comparable_with(&value) {
            let data_type = &attr.data_type;
            return Ok(self.unsupported(
                expr,
                format!("{sig} compares {attr} of type {data_type} with {value}"),
            ));
        }

        // the filter always has the column on the left
        let op = if literal_first { op.commute() } else { op };
        Ok(RsOperator::compare(attr, op, value))
    }

    fn unsupported(&self, content: impl Display, reason: impl Into<String>) -> RsOperator {
        let content = content.to_string();
        let reason = reason.into();
        if self.settings.log_unsupported {
            debug!("unsupported filter {content}: {reason}");
        }
        RsOperator::Unsupported { content, reason }
    }
}
