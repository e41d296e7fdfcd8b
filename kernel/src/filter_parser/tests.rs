use std::cell::RefCell;

use super::*;
use crate::expressions::{codec, DecimalData, ExprType};
use crate::rs_operator::{NullDirection, RsResult};
use crate::schema::{ColumnId, DataType};
use crate::stats::{PackStats, UnitStats};
use crate::Error;

use strum::IntoEnumIterator;

macro_rules! expect_eq {
    ( $expr: expr, $expect: expr, $fmt: literal ) => {
        let expect = ($expect);
        let result = ($expr);
        assert!(
            result == expect,
            "Expected {} = {:?}, got {:?}",
            format!($fmt),
            expect,
            result
        );
    };
}

fn columns() -> Vec<ColumnDefine> {
    vec![
        ColumnDefine::new(101, "a", DataType::Int64),
        ColumnDefine::new(102, "b", DataType::String),
        ColumnDefine::new(103, "c", DataType::Float64),
        ColumnDefine::new(104, "d", DataType::Decimal { precision: 10, scale: 2 }),
        ColumnDefine::new(105, "e", DataType::Json),
    ]
}

fn attr(index: usize) -> Attr {
    columns()[index].to_attr()
}

fn col(index: i64) -> Expr {
    Expr::column_ref(index)
}

fn lit(value: impl Into<Scalar>) -> Expr {
    Expr::literal(value)
}

fn func(sig: ScalarFuncSig, children: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::scalar_func(sig, children)
}

fn parse(filters: impl IntoIterator<Item = Expr>) -> FilterResult<RsOperator> {
    let columns = columns();
    FilterParser::new().parse_dag_query(&DagQueryInfo::new(filters), &columns, columns.as_slice())
}

fn parse_one(filter: Expr) -> RsOperator {
    parse([filter]).unwrap()
}

#[track_caller]
fn assert_unsupported(op: &RsOperator, expected_reason: &str) {
    match op {
        RsOperator::Unsupported { reason, .. } => assert_eq!(reason, expected_reason),
        other => panic!("expected unsupported({expected_reason}), got {other}"),
    }
}

#[test_log::test]
fn test_empty_query() {
    let op = parse([]).unwrap();
    assert_eq!(op, RsOperator::Empty);

    let units = [
        PackStats::new(0),
        PackStats::new(10).with_column(101, UnitStats::new(1, 2, 0)),
        PackStats::new(10).with_column(101, UnitStats::new(None::<i64>, None::<i64>, 10)),
    ];
    for unit in &units {
        assert!(!op.can_skip(unit));
    }
}

#[test_log::test]
fn test_conjunction_assembly() {
    let op = parse([
        func(ScalarFuncSig::LtInt, [col(0), lit(5)]),
        func(ScalarFuncSig::EqString, [col(1), lit("x")]),
    ])
    .unwrap();
    assert_eq!(
        op,
        RsOperator::and([
            RsOperator::compare(attr(0), CompareOp::Less, 5),
            RsOperator::compare(attr(1), CompareOp::Equal, "x"),
        ])
    );

    // a single filter is not wrapped
    let op = parse([func(ScalarFuncSig::GeInt, [col(0), lit(5)])]).unwrap();
    assert_eq!(op, RsOperator::compare(attr(0), CompareOp::GreaterEqual, 5));

    // non-function entries degrade individually
    let gt = func(ScalarFuncSig::GtInt, [col(0), lit(1)]);
    let op = parse([col(0), gt, lit(1)]).unwrap();
    let RsOperator::And(children) = &op else {
        panic!("expected and, got {op}");
    };
    assert_eq!(children.len(), 3);
    assert_unsupported(&children[0], "filter is not a function");
    assert_eq!(
        children[1],
        RsOperator::compare(attr(0), CompareOp::Greater, 1)
    );
    assert_unsupported(&children[2], "filter is not a function");

    assert_unsupported(&parse_one(col(0)), "filter is not a function");
}

#[test_log::test]
fn test_comparison_kinds_both_orders() {
    use ScalarFuncSig::*;
    let cases = [
        (LtInt, CompareOp::Less),
        (LeInt, CompareOp::LessEqual),
        (GtInt, CompareOp::Greater),
        (GeInt, CompareOp::GreaterEqual),
        (EqInt, CompareOp::Equal),
        (NeInt, CompareOp::NotEqual),
    ];
    for (sig, op) in cases {
        expect_eq!(
            parse_one(func(sig, [col(0), lit(7)])),
            RsOperator::compare(attr(0), op, 7),
            "a {sig} 7"
        );
        expect_eq!(
            parse_one(func(sig, [lit(7), col(0)])),
            RsOperator::compare(attr(0), op.commute(), 7),
            "7 {sig} a"
        );
    }

    // `5 < a` holds exactly when `a > 5` does
    assert_eq!(
        parse_one(func(LtInt, [lit(5), col(0)])),
        RsOperator::compare(attr(0), CompareOp::Greater, 5)
    );
}

#[test_log::test]
fn test_comparison_carries_typed_literal() {
    use ScalarFuncSig::*;
    let decimal = DecimalData::try_new(-12345, 10, 2).unwrap();
    let cases = [
        (
            func(EqString, [col(1), lit("x")]),
            attr(1),
            Scalar::from("x"),
        ),
        (
            func(LtReal, [col(2), lit(1.5)]),
            attr(2),
            Scalar::Float64(1.5),
        ),
        (
            func(GeDecimal, [col(3), lit(decimal)]),
            attr(3),
            Scalar::Decimal(decimal),
        ),
        (func(GtInt, [col(0), lit(3u64)]), attr(0), Scalar::UInt64(3)),
        (
            func(EqInt, [col(0), lit(None::<i64>)]),
            attr(0),
            Scalar::Null,
        ),
    ];
    for (expr, attr, value) in cases {
        let op = parse_one(expr.clone());
        let RsOperator::Compare {
            attr: got_attr,
            value: got_value,
            null_direction,
            ..
        } = &op
        else {
            panic!("{expr} compiled to {op}");
        };
        assert_eq!(*got_attr, attr, "{expr}");
        assert_eq!(*got_value, value, "{expr}");
        assert_eq!(*null_direction, NullDirection::Unspecified);
    }
}

#[test_log::test]
fn test_comparison_degrades() {
    use ScalarFuncSig::*;
    let json_literal = Expr::raw(ExprType::MysqlJson as i32, 0, b"{}".to_vec(), vec![]);
    let bad_int = Expr::raw(ExprType::Int64 as i32, 0, vec![1, 2, 3], vec![]);
    let cases = [
        (
            func(LtInt, [col(0)]),
            "LtInt with 1 children is not supported",
        ),
        (func(LtInt, []), "LtInt with 0 children is not supported"),
        (
            func(EqInt, [col(0), lit(1), lit(2)]),
            "EqInt with 3 children is not supported",
        ),
        (
            func(LtInt, [col(0), col(2)]),
            "LtInt with state 1 is not supported",
        ),
        (
            func(LtInt, [lit(1), lit(2)]),
            "LtInt with state 2 is not supported",
        ),
        (
            func(LtInt, [func(PlusInt, [col(0), lit(1)]), lit(2)]),
            "LtInt with state 2 is not supported",
        ),
        (
            func(LtInt, [col(0), func(PlusInt, [lit(1), lit(1)])]),
            "LtInt with state 1 is not supported",
        ),
        (
            func(EqJson, [col(4), json_literal]),
            "EqJson with undecodable literal: Invalid expression payload: MysqlJson literal is not decodable",
        ),
        (
            func(EqInt, [col(0), bad_int]),
            "EqInt with undecodable literal: Invalid expression payload: int64 payload must be 8 bytes, got 3",
        ),
        (
            func(EqString, [col(0), lit("x")]),
            "EqString compares a#101 of type Int64 with 'x'",
        ),
        (
            func(LtInt, [col(2), lit(1)]),
            "LtInt compares c#103 of type Float64 with 1",
        ),
    ];
    for (expr, reason) in cases {
        let op = parse_one(expr);
        assert_unsupported(&op, reason);
    }
}

#[test_log::test]
fn test_unsupported_functions() {
    use ScalarFuncSig::*;
    let cases = [
        (
            func(LikeSig, [col(1), lit("%x")]),
            "LikeSig is not supported",
        ),
        (func(IntIsNull, [col(0)]), "IntIsNull is not supported"),
        (
            func(NullEqInt, [col(0), lit(1)]),
            "NullEqInt is not supported",
        ),
        (
            func(InInt, [col(0), lit(1), lit(2)]),
            "InInt is not supported",
        ),
        (
            func(LogicalXor, [col(0), col(0)]),
            "LogicalXor is not supported",
        ),
        (
            Expr::raw(ExprType::ScalarFunc as i32, 987654, vec![], vec![col(0)]),
            "sig 987654 is not supported",
        ),
    ];
    for (expr, reason) in cases {
        let op = parse_one(expr.clone());
        assert_unsupported(&op, reason);
        let RsOperator::Unsupported { content, .. } = &op else {
            unreachable!()
        };
        assert_eq!(*content, expr.to_string());
    }

    let op = parse_one(Expr::aggregate(ExprType::Count, [col(0)]));
    assert_unsupported(&op, "agg function: Count");
    let op = parse_one(func(
        LogicalAnd,
        [
            Expr::aggregate(ExprType::Sum, [col(0)]),
            Expr::raw(4242, 0, vec![], vec![]),
        ],
    ));
    assert_eq!(
        op,
        RsOperator::and([
            RsOperator::unsupported("Sum(ColumnRef(#0))", "agg function: Sum"),
            RsOperator::unsupported("Unknown(tp=4242)", "child of logical and is not a function"),
        ])
    );
    let max = Expr::aggregate(ExprType::Max, [col(0)]);
    assert_unsupported(
        &parse_one(func(UnaryNotInt, [max])),
        "child of logical not is not function",
    );
}

#[test_log::test]
fn test_logical_not() {
    use ScalarFuncSig::*;
    let lt = func(LtInt, [col(0), lit(5)]);
    for sig in [UnaryNotInt, UnaryNotReal, UnaryNotDecimal] {
        expect_eq!(
            parse_one(func(sig, [lt.clone()])),
            RsOperator::not(RsOperator::compare(attr(0), CompareOp::Less, 5)),
            "{sig}"
        );
    }

    assert_unsupported(
        &parse_one(func(UnaryNotInt, [col(0)])),
        "child of logical not is not function",
    );
    assert_unsupported(
        &parse_one(func(UnaryNotInt, [])),
        "logical not with 0 children",
    );
    assert_unsupported(
        &parse_one(func(UnaryNotInt, [lt.clone(), lt])),
        "logical not with 2 children",
    );

    // an unsupported child stays inside the NOT, which keeps it unsupported
    let op = parse_one(func(UnaryNotInt, [func(LikeSig, [col(1), lit("x")])]));
    let RsOperator::Not(child) = &op else {
        panic!("expected not, got {op}");
    };
    assert!(child.is_unsupported());
}

#[test_log::test]
fn test_logical_and_or() {
    use ScalarFuncSig::*;
    let lt = || func(LtInt, [col(0), lit(5)]);
    let eq = || func(EqString, [col(1), lit("x")]);
    let expected_lt = || RsOperator::compare(attr(0), CompareOp::Less, 5);
    let expected_eq = || RsOperator::compare(attr(1), CompareOp::Equal, "x");

    assert_eq!(
        parse_one(func(LogicalOr, [lt(), eq()])),
        RsOperator::or([expected_lt(), expected_eq()])
    );
    let expected_or = RsOperator::or([expected_eq(), expected_lt()]);
    assert_eq!(
        parse_one(func(LogicalAnd, [lt(), func(LogicalOr, [eq(), lt()])])),
        RsOperator::and([expected_lt(), expected_or])
    );

    // zero and one child are legal
    assert_eq!(parse_one(func(LogicalAnd, [])), RsOperator::and([]));
    assert_eq!(
        parse_one(func(LogicalOr, [lt()])),
        RsOperator::or([expected_lt()])
    );

    // non-function children degrade one by one
    let op = parse_one(func(LogicalOr, [lt(), col(0), lit(1)]));
    assert_eq!(
        op,
        RsOperator::or([
            expected_lt(),
            RsOperator::unsupported("ColumnRef(#0)", "child of logical or is not a function"),
            RsOperator::unsupported("Int64(1)", "child of logical or is not a function"),
        ])
    );

    let op = parse_one(func(LogicalAnd, [lt(), func(LikeSig, [col(1), lit("x")])]));
    let RsOperator::And(children) = &op else {
        panic!("expected and, got {op}");
    };
    assert_eq!(children[0], expected_lt());
    assert_unsupported(&children[1], "LikeSig is not supported");
}

#[test_log::test]
fn test_column_index_bounds() {
    let column_count = columns().len() as i64;
    for index in [0, column_count - 1] {
        let op = parse_one(func(ScalarFuncSig::EqInt, [col(index), lit(1)]));
        assert!(matches!(
            op,
            RsOperator::Compare { .. } | RsOperator::Unsupported { .. }
        ));
    }

    let out_of_range = func(ScalarFuncSig::GtInt, [col(99), lit(1)]);
    let malformed = Expr::raw(ExprType::ColumnRef as i32, 0, vec![], vec![]);
    let bad_filters = [
        func(ScalarFuncSig::EqInt, [col(column_count), lit(1)]),
        func(ScalarFuncSig::EqInt, [lit(1), col(-1)]),
        // fatal even where the comparison itself is unsupported
        func(ScalarFuncSig::EqInt, [col(0), col(column_count)]),
        func(
            ScalarFuncSig::LogicalOr,
            [
                func(ScalarFuncSig::EqInt, [col(0), lit(1)]),
                func(ScalarFuncSig::UnaryNotInt, [out_of_range]),
            ],
        ),
        func(ScalarFuncSig::EqInt, [malformed, lit(1)]),
    ];
    let valid = func(ScalarFuncSig::GtInt, [col(0), lit(0)]);
    for filter in bad_filters {
        let err = parse([valid.clone(), filter.clone()])
            .expect_err("out of range column reference");
        assert!(err.is_bad_request(), "{filter}: {err}");
    }

    let err = parse([func(ScalarFuncSig::EqInt, [col(5), lit(1)])]).unwrap_err();
    assert!(matches!(
        err,
        Error::BadRequest {
            index: 5,
            column_count: 5
        }
    ));
    assert_eq!(
        err.to_string(),
        "Column index out of bound: 5, should in [0,5)"
    );

    // never looked at: the signature is rejected before its children are
    let op = parse_one(func(ScalarFuncSig::LikeSig, [col(42), lit("x")]));
    assert_unsupported(&op, "LikeSig is not supported");
}

#[test_log::test]
fn test_resolver_is_called_per_column() {
    let columns = columns();
    let seen: RefCell<Vec<ColumnId>> = RefCell::new(vec![]);
    let resolver = |col_id: ColumnId| {
        seen.borrow_mut().push(col_id);
        Attr::new(format!("resolved_{col_id}"), col_id, DataType::Int64)
    };
    let query = DagQueryInfo::new([
        func(ScalarFuncSig::LtInt, [col(0), lit(1)]),
        func(ScalarFuncSig::EqInt, [lit(1), col(3)]),
    ]);
    let op = FilterParser::new()
        .parse_dag_query(&query, &columns, &resolver)
        .unwrap();
    assert_eq!(*seen.borrow(), vec![101, 104]);
    assert_eq!(
        op.get_columns_to_check(),
        vec![
            Attr::new("resolved_101", 101, DataType::Int64),
            Attr::new("resolved_104", 104, DataType::Int64),
        ]
    );
}

#[test_log::test]
fn test_idempotent() {
    use ScalarFuncSig::*;
    let query = DagQueryInfo::new([
        func(
            LogicalOr,
            [func(LtInt, [col(0), lit(5)]), func(LikeSig, [col(1)])],
        ),
        func(UnaryNotInt, [func(NeString, [lit("x"), col(1)])]),
        Expr::aggregate(ExprType::Max, [col(0)]),
    ]);
    let columns = columns();
    let parser = FilterParser::new();
    let first = parser
        .parse_dag_query(&query, &columns, columns.as_slice())
        .unwrap();
    let second = parser
        .parse_dag_query(&query, &columns, columns.as_slice())
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(first.to_debug_string(), second.to_debug_string());
}

#[test_log::test]
fn test_settings() {
    use ScalarFuncSig::*;
    let columns = columns();
    let query = DagQueryInfo::new([func(LtInt, [col(0), lit(5)])]);

    let disabled = FilterParser::with_settings(FilterSettings {
        enable_rough_set_filter: false,
        ..Default::default()
    });
    assert_eq!(
        disabled
            .parse_dag_query(&query, &columns, columns.as_slice())
            .unwrap(),
        RsOperator::Empty
    );

    // AND(AND(AND(a < 5)))
    let leaf = func(LtInt, [col(0), lit(5)]);
    let nested = (0..3).fold(leaf, |expr, _| func(LogicalAnd, [expr]));
    let shallow = FilterParser::with_settings(FilterSettings {
        max_expr_depth: 3,
        ..Default::default()
    });
    let op = shallow
        .parse_expr(&nested, &columns, columns.as_slice())
        .unwrap();
    let RsOperator::And(level1) = &op else {
        panic!("expected and, got {op}");
    };
    let RsOperator::And(level2) = &level1[0] else {
        panic!("expected and, got {op}");
    };
    let RsOperator::And(level3) = &level2[0] else {
        panic!("expected and, got {op}");
    };
    assert_unsupported(&level3[0], "expression is nested too deeply");

    let deep_enough = FilterParser::with_settings(FilterSettings {
        max_expr_depth: 4,
        ..Default::default()
    });
    let op = deep_enough
        .parse_expr(&nested, &columns, columns.as_slice())
        .unwrap();
    assert_eq!(
        op,
        RsOperator::and([RsOperator::and([RsOperator::and([RsOperator::compare(
            attr(0),
            CompareOp::Less,
            5
        )])])])
    );

    let quiet = FilterParser::with_settings(FilterSettings {
        log_unsupported: false,
        ..Default::default()
    });
    let op = quiet
        .parse_expr(&func(LikeSig, [col(1)]), &columns, columns.as_slice())
        .unwrap();
    assert_unsupported(&op, "LikeSig is not supported");
}

#[test_log::test]
fn test_depth_limit_bounds_recursion() {
    // Building and dropping the input recurses through all of it, so give it room. Compiling it
    // must only ever look at the first `max_expr_depth` levels.
    const INPUT_DEPTH: usize = 100_000;
    let handle = std::thread::Builder::new()
        .stack_size(64 << 20)
        .spawn(|| {
            let columns = columns();
            let leaf = func(ScalarFuncSig::LtInt, [col(0), lit(5)]);
            let deep = (0..INPUT_DEPTH).fold(leaf, |expr, _| Expr::not(expr));
            let parser = FilterParser::new();
            let max_depth = parser.settings.max_expr_depth;
            let op = parser
                .parse_expr(&deep, &columns, columns.as_slice())
                .unwrap();

            let mut node = &op;
            for _ in 0..max_depth {
                let RsOperator::Not(child) = node else {
                    panic!("expected not, got {}", node.name());
                };
                node = child;
            }
            match node {
                RsOperator::Unsupported { content, reason } => {
                    assert_eq!(content, "UnaryNotInt(...)");
                    assert_eq!(reason, "expression is nested too deeply");
                }
                other => panic!("expected unsupported, got {}", other.name()),
            }
            let unit = PackStats::new(10).with_column(101, UnitStats::new(7, 9, 0));
            assert!(!op.can_skip(&unit));

            // a pushed-down request takes the same path
            let query = DagQueryInfo::new([deep]);
            let from_query = parser
                .parse_dag_query(&query, &columns, columns.as_slice())
                .unwrap();
            assert_eq!(from_query, op);
        })
        .unwrap();
    handle.join().unwrap();
}

#[test_log::test]
fn test_compiled_filter_is_sound() {
    use ScalarFuncSig::*;
    // rows of (a, b)
    let rows: [(Option<i64>, &str); 4] = [
        (Some(1), "m"),
        (Some(4), "p"),
        (None, "q"),
        (Some(9), "z"),
    ];
    let unit = PackStats::new(rows.len() as u64)
        .with_column(101, UnitStats::from_values(rows.map(|(a, _)| a)))
        .with_column(102, UnitStats::from_values(rows.map(|(_, b)| b)));

    let sigs = [LtInt, LeInt, GtInt, GeInt, EqInt, NeInt];
    for sig in sigs {
        let op = filter_type_of(sig);
        let Some(RsFilterType::Compare(op)) = op else {
            panic!("{sig} is not a comparison");
        };
        for value in -1..=11 {
            for literal_first in [false, true] {
                let children = if literal_first {
                    [lit(value), col(0)]
                } else {
                    [col(0), lit(value)]
                };
                let filter = parse_one(func(sig, children));
                let any_match = rows.iter().any(|(a, _)| {
                    a.is_some_and(|a| {
                        if literal_first {
                            compare_i64(op, value, a)
                        } else {
                            compare_i64(op, a, value)
                        }
                    })
                });
                if filter.can_skip(&unit) {
                    assert!(!any_match, "{filter} skipped a matching unit");
                }
            }
        }
    }

    // the unit is read for anything that cannot be compiled
    for expr in [
        func(LikeSig, [col(1), lit("%")]),
        func(LtInt, [col(0), col(0)]),
        func(CastIntAsReal, [col(0)]),
    ] {
        assert_eq!(parse_one(expr).rough_check(&unit), RsResult::SomeMatch);
    }
}

fn compare_i64(op: CompareOp, left: i64, right: i64) -> bool {
    use CompareOp::*;
    match op {
        Equal => left == right,
        NotEqual => left != right,
        Less => left < right,
        LessEqual => left <= right,
        Greater => left > right,
        GreaterEqual => left >= right,
    }
}

#[test]
fn test_every_signature_compiles_or_degrades() {
    // any signature with column/literal children either compiles or degrades, never fails
    for sig in ScalarFuncSig::iter() {
        let op = parse([func(sig, [col(0), lit(1)])]).unwrap();
        match filter_type_of(sig) {
            Some(RsFilterType::Compare(_)) => {
                let compiled = matches!(op, RsOperator::Compare { .. });
                assert!(compiled || op.is_unsupported(), "{sig}");
            }
            Some(RsFilterType::And | RsFilterType::Or | RsFilterType::Not) => {
                assert!(!matches!(op, RsOperator::Compare { .. }), "{sig}")
            }
            None => assert!(op.is_unsupported(), "{sig}"),
        }
    }
}

#[test]
fn test_float32_literal_payload() {
    let half = Expr::raw(
        ExprType::Float32 as i32,
        0,
        codec::encode_float64(0.5),
        vec![],
    );
    let expr = func(ScalarFuncSig::GtReal, [col(2), half]);
    assert_eq!(
        parse_one(expr),
        RsOperator::compare(attr(2), CompareOp::Greater, 0.5)
    );
}
