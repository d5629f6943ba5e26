use std::fs;

use pushdown_eval::codec::{decode_literal, encode_datum};
use pushdown_eval::{Datum, DatumKind, EvalRequest, Expr, ExprKind, FieldType, Row};
use rust_decimal::Decimal;
use tempfile::tempdir;

fn sample_request() -> EvalRequest {
    let row: Row = vec![
        (1, Datum::Int64(100)),
        (2, Datum::from("pushdown")),
        (3, Datum::Null),
    ]
    .into_iter()
    .collect();

    // CASE WHEN col2 LIKE 'push%' THEN col1 * 3 ELSE COALESCE(col3, -1) END
    let expr = Expr::case(
        vec![(
            Expr::binary(ExprKind::Like, Expr::column(2), Expr::constant("push%")),
            Expr::binary(ExprKind::Mul, Expr::column(1), Expr::constant(3i64)),
        )],
        Some(Expr::coalesce(vec![Expr::column(3), Expr::constant(-1i64)])),
    );
    EvalRequest::new(expr, row)
}

#[test]
fn test_save_and_load_request() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("request.bin");

    let request = sample_request();
    request.save(&path).unwrap();

    let loaded = EvalRequest::load(&path).unwrap();
    assert_eq!(loaded, request);
    assert_eq!(loaded.evaluate().unwrap(), Datum::Int64(300));
}

#[test]
fn test_load_missing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.bin");

    let err = EvalRequest::load(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to read request file"));
}

#[test]
fn test_load_corrupt_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("corrupt.bin");
    fs::write(&path, [0xffu8; 7]).unwrap();

    let err = EvalRequest::load(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to decode request file"));
}

#[test]
fn test_raw_tree_from_wire_parts() {
    // 1.5 + col7, assembled from wire tags and encoded payloads
    let decimal = Decimal::new(15, 1);
    let literal = Expr::from_raw(
        0,
        encode_datum(&Datum::Decimal(decimal)),
        vec![],
        Some(FieldType::new(DatumKind::Decimal)),
    )
    .unwrap();
    let column = Expr::from_raw(
        1,
        pushdown_eval::codec::encode_column_id(7),
        vec![],
        None,
    )
    .unwrap();
    let plus = Expr::from_raw(300, Default::default(), vec![literal, column], None).unwrap();

    let row: Row = vec![(7, Datum::Int64(2))].into_iter().collect();
    let request = EvalRequest::new(plus, row);
    assert_eq!(request.evaluate().unwrap(), Datum::Decimal(Decimal::new(35, 1)));
}

#[test]
fn test_literal_payload_survives_request_framing() {
    let field_type = FieldType::new(DatumKind::String).with_flen(16);
    let payload = encode_datum(&Datum::from("hello"));
    assert_eq!(
        decode_literal(&payload, &field_type).unwrap(),
        Datum::from("hello")
    );

    let expr = Expr::from_raw(0, payload, vec![], Some(field_type)).unwrap();
    let request = EvalRequest::new(expr, Row::new());
    let bytes = request.serialize().unwrap();
    let decoded = EvalRequest::deserialize(&bytes).unwrap();
    assert_eq!(decoded.evaluate().unwrap(), Datum::from("hello"));
}

#[test]
fn test_unknown_tag_in_request_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("unknown_tag.bin");

    // The root node's kind tag leads the framed request
    let mut bytes = sample_request().serialize().unwrap();
    assert_eq!(bytes[..4], (ExprKind::Case as i32).to_le_bytes());
    bytes[..4].copy_from_slice(&7777i32.to_le_bytes());
    fs::write(&path, &bytes).unwrap();

    let err = EvalRequest::load(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("unknown tag 7777"));
}
