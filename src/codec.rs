//! Literal payload codec.
//!
//! Leaf nodes carry their value as raw bytes next to a declared field type.
//! Fixed-width kinds are little-endian; decimals travel as their text form;
//! durations and timestamps are whole seconds (i64) followed by nanoseconds
//! (i32 for durations, u32 for timestamps).

use byteorder::{ByteOrder, LittleEndian};
use bytes::Bytes;
use chrono::{DateTime, Duration};
use rust_decimal::Decimal;

use crate::expression::{EvalError, EvalResult};
use crate::types::{Datum, DatumKind, FieldType};

const NANOS_PER_SEC: u32 = 1_000_000_000;

/// Encode a datum into the payload of a constant node
pub fn encode_datum(datum: &Datum) -> Bytes {
    match datum {
        Datum::Null => Bytes::new(),
        Datum::Int64(v) => {
            let mut buf = [0u8; 8];
            LittleEndian::write_i64(&mut buf, *v);
            Bytes::copy_from_slice(&buf)
        }
        Datum::Uint64(v) => {
            let mut buf = [0u8; 8];
            LittleEndian::write_u64(&mut buf, *v);
            Bytes::copy_from_slice(&buf)
        }
        Datum::Float64(v) => {
            let mut buf = [0u8; 8];
            LittleEndian::write_f64(&mut buf, *v);
            Bytes::copy_from_slice(&buf)
        }
        Datum::Decimal(d) => Bytes::from(d.to_string()),
        Datum::String(s) => Bytes::from(s.clone()),
        Datum::Bytes(b) => Bytes::from(b.clone()),
        Datum::Duration(d) => {
            let mut buf = [0u8; 12];
            LittleEndian::write_i64(&mut buf[..8], d.num_seconds());
            LittleEndian::write_i32(&mut buf[8..], d.subsec_nanos());
            Bytes::copy_from_slice(&buf)
        }
        Datum::Time(t) => {
            let utc = t.and_utc();
            let mut buf = [0u8; 12];
            LittleEndian::write_i64(&mut buf[..8], utc.timestamp());
            LittleEndian::write_u32(&mut buf[8..], utc.timestamp_subsec_nanos());
            Bytes::copy_from_slice(&buf)
        }
    }
}

/// Decode a constant payload according to its declared field type
pub fn decode_literal(payload: &[u8], field_type: &FieldType) -> EvalResult<Datum> {
    let kind = field_type.tp;
    let malformed = |reason: String| EvalError::malformed_literal(Some(kind), reason);

    match kind {
        DatumKind::Null => {
            if payload.is_empty() {
                Ok(Datum::Null)
            } else {
                Err(malformed(format!(
                    "expected empty payload, got {} bytes",
                    payload.len()
                )))
            }
        }
        DatumKind::Int64 => {
            let buf = fixed_width(payload, 8, kind)?;
            Ok(Datum::Int64(LittleEndian::read_i64(buf)))
        }
        DatumKind::Uint64 => {
            let buf = fixed_width(payload, 8, kind)?;
            Ok(Datum::Uint64(LittleEndian::read_u64(buf)))
        }
        DatumKind::Float64 => {
            let buf = fixed_width(payload, 8, kind)?;
            Ok(Datum::Float64(LittleEndian::read_f64(buf)))
        }
        DatumKind::Decimal => {
            let text = std::str::from_utf8(payload)
                .map_err(|e| malformed(format!("decimal text is not UTF-8: {}", e)))?;
            let value = Decimal::from_str_exact(text)
                .map_err(|e| malformed(format!("invalid decimal '{}': {}", text, e)))?;
            if let Some(max_scale) = field_type.decimal {
                if value.scale() > max_scale {
                    return Err(malformed(format!(
                        "decimal '{}' has {} fractional digits, declared {}",
                        text,
                        value.scale(),
                        max_scale
                    )));
                }
            }
            Ok(Datum::Decimal(value))
        }
        DatumKind::String => {
            check_flen(payload, field_type)?;
            let text = String::from_utf8(payload.to_vec())
                .map_err(|e| malformed(format!("string is not UTF-8: {}", e)))?;
            Ok(Datum::String(text))
        }
        DatumKind::Bytes => {
            check_flen(payload, field_type)?;
            Ok(Datum::Bytes(payload.to_vec()))
        }
        DatumKind::Duration => {
            let buf = fixed_width(payload, 12, kind)?;
            let secs = LittleEndian::read_i64(&buf[..8]);
            let nanos = LittleEndian::read_i32(&buf[8..]);
            if nanos.unsigned_abs() >= NANOS_PER_SEC {
                return Err(malformed(format!("nanoseconds {} out of range", nanos)));
            }
            Duration::try_seconds(secs)
                .and_then(|d| d.checked_add(&Duration::nanoseconds(nanos as i64)))
                .map(Datum::Duration)
                .ok_or_else(|| malformed(format!("duration of {} seconds out of range", secs)))
        }
        DatumKind::Time => {
            let buf = fixed_width(payload, 12, kind)?;
            let secs = LittleEndian::read_i64(&buf[..8]);
            let nanos = LittleEndian::read_u32(&buf[8..]);
            // chrono reads nanoseconds past 1e9 as a leap second
            if nanos >= NANOS_PER_SEC {
                return Err(malformed(format!("nanoseconds {} out of range", nanos)));
            }
            DateTime::from_timestamp(secs, nanos)
                .map(|dt| Datum::Time(dt.naive_utc()))
                .ok_or_else(|| malformed(format!("timestamp {}.{:09} out of range", secs, nanos)))
        }
    }
}

/// Encode the payload of a column reference node
pub fn encode_column_id(column_id: i64) -> Bytes {
    let mut buf = [0u8; 8];
    LittleEndian::write_i64(&mut buf, column_id);
    Bytes::copy_from_slice(&buf)
}

/// Decode the payload of a column reference node
pub fn decode_column_id(payload: &[u8]) -> EvalResult<i64> {
    let buf = fixed_width(payload, 8, DatumKind::Int64)?;
    Ok(LittleEndian::read_i64(buf))
}

fn fixed_width(payload: &[u8], width: usize, kind: DatumKind) -> EvalResult<&[u8]> {
    if payload.len() != width {
        return Err(EvalError::malformed_literal(
            Some(kind),
            format!("expected {} bytes, got {}", width, payload.len()),
        ));
    }
    Ok(payload)
}

fn check_flen(payload: &[u8], field_type: &FieldType) -> EvalResult<()> {
    match field_type.flen {
        Some(flen) if payload.len() > flen as usize => Err(EvalError::malformed_literal(
            Some(field_type.tp),
            format!("{} bytes exceed declared length {}", payload.len(), flen),
        )),
        _ => Ok(()),
    }
}
