use std::cmp::Ordering;
use std::fmt;

use chrono::{Duration, NaiveDateTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::expression::{EvalError, EvalResult};

/// Variant tag of a [`Datum`]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatumKind {
    Null = 0,
    Int64 = 1,
    Uint64 = 2,
    Float64 = 3,
    Decimal = 4,
    String = 5,
    Bytes = 6,
    Duration = 7,
    Time = 8,
}

impl DatumKind {
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            DatumKind::Int64 | DatumKind::Uint64 | DatumKind::Float64 | DatumKind::Decimal
        )
    }

    pub fn is_binary_string(self) -> bool {
        matches!(self, DatumKind::String | DatumKind::Bytes)
    }
}

/// A single typed value, or SQL NULL.
///
/// A Datum never changes its variant after construction. Handlers produce new
/// Datums instead of mutating operands. Booleans are represented as
/// `Int64(1)` and `Int64(0)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Datum {
    Null,
    Int64(i64),
    Uint64(u64),
    Float64(f64),
    Decimal(Decimal),
    String(String),
    Bytes(Vec<u8>),
    Duration(#[serde(with = "duration_parts")] Duration),
    Time(NaiveDateTime),
}

impl Datum {
    /// Get the variant tag of this datum
    pub fn kind(&self) -> DatumKind {
        match self {
            Datum::Null => DatumKind::Null,
            Datum::Int64(_) => DatumKind::Int64,
            Datum::Uint64(_) => DatumKind::Uint64,
            Datum::Float64(_) => DatumKind::Float64,
            Datum::Decimal(_) => DatumKind::Decimal,
            Datum::String(_) => DatumKind::String,
            Datum::Bytes(_) => DatumKind::Bytes,
            Datum::Duration(_) => DatumKind::Duration,
            Datum::Time(_) => DatumKind::Time,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Datum::Null)
    }

    /// Boolean result of a comparison or logical operator
    pub fn from_bool(value: bool) -> Self {
        Datum::Int64(value as i64)
    }

    /// Total order between two non-null datums.
    ///
    /// Numeric kinds are promoted to a common representation before
    /// comparing; strings and bytes compare byte-wise. NULL is not ordered
    /// here: callers must test for NULL first.
    pub fn compare(&self, other: &Datum) -> EvalResult<Ordering> {
        let ordering = match (self, other) {
            (Datum::Int64(a), Datum::Int64(b)) => a.cmp(b),
            (Datum::Uint64(a), Datum::Uint64(b)) => a.cmp(b),
            (Datum::Int64(a), Datum::Uint64(b)) => compare_signed_unsigned(*a, *b),
            (Datum::Uint64(a), Datum::Int64(b)) => compare_signed_unsigned(*b, *a).reverse(),
            (Datum::String(a), Datum::String(b)) => a.as_bytes().cmp(b.as_bytes()),
            (Datum::String(a), Datum::Bytes(b)) => a.as_bytes().cmp(b.as_slice()),
            (Datum::Bytes(a), Datum::String(b)) => a.as_slice().cmp(b.as_bytes()),
            (Datum::Bytes(a), Datum::Bytes(b)) => a.cmp(b),
            (Datum::Duration(a), Datum::Duration(b)) => a.cmp(b),
            (Datum::Time(a), Datum::Time(b)) => a.cmp(b),
            _ if self.kind().is_numeric() && other.kind().is_numeric() => {
                self.compare_numeric(other)?
            }
            _ => {
                return Err(EvalError::coercion(
                    "comparison",
                    self.kind(),
                    Some(other.kind()),
                ))
            }
        };
        Ok(ordering)
    }

    /// Mixed numeric comparison.
    ///
    /// Integers against floats compare exactly. Decimals against floats go
    /// through f64; otherwise integers are widened to decimal.
    fn compare_numeric(&self, other: &Datum) -> EvalResult<Ordering> {
        let coercion_error = || EvalError::coercion("comparison", self.kind(), Some(other.kind()));

        if let (Some(int), Datum::Float64(float)) = (self.as_i128(), other) {
            return Ok(compare_integer_float(int, *float));
        }
        if let (Datum::Float64(float), Some(int)) = (self, other.as_i128()) {
            return Ok(compare_integer_float(int, *float).reverse());
        }

        if matches!(self, Datum::Float64(_)) || matches!(other, Datum::Float64(_)) {
            let a = self.as_f64().ok_or_else(coercion_error)?;
            let b = other.as_f64().ok_or_else(coercion_error)?;
            return Ok(a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b)));
        }

        let a = self.as_decimal().ok_or_else(coercion_error)?;
        let b = other.as_decimal().ok_or_else(coercion_error)?;
        Ok(a.cmp(&b))
    }

    /// Numeric value as f64, or None for non-numeric kinds
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Datum::Int64(v) => Some(*v as f64),
            Datum::Uint64(v) => Some(*v as f64),
            Datum::Float64(v) => Some(*v),
            Datum::Decimal(d) => d.to_f64(),
            _ => None,
        }
    }

    /// Exact numeric value as Decimal; floats are not converted
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Datum::Int64(v) => Some(Decimal::from(*v)),
            Datum::Uint64(v) => Some(Decimal::from(*v)),
            Datum::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// Integer value widened to i128, or None for non-integer kinds
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Datum::Int64(v) => Some(*v as i128),
            Datum::Uint64(v) => Some(*v as i128),
            _ => None,
        }
    }

    /// Truth value of a logical operand; `None` means NULL (unknown).
    ///
    /// Only numeric kinds carry a truth value: non-zero is true.
    pub fn to_bool(&self, operator: &str) -> EvalResult<Option<bool>> {
        match self {
            Datum::Null => Ok(None),
            Datum::Int64(v) => Ok(Some(*v != 0)),
            Datum::Uint64(v) => Ok(Some(*v != 0)),
            Datum::Float64(v) => Ok(Some(*v != 0.0)),
            Datum::Decimal(d) => Ok(Some(!d.is_zero())),
            _ => Err(EvalError::coercion(operator, self.kind(), None)),
        }
    }

    /// Whether this value selects a CASE or IF branch.
    ///
    /// NULL and numeric zero are not satisfied. Every other non-null value
    /// is, whatever its content: `""`, `"0"`, a zero duration and any time.
    pub fn is_satisfied(&self) -> bool {
        match self {
            Datum::Null => false,
            Datum::Int64(v) => *v != 0,
            Datum::Uint64(v) => *v != 0,
            Datum::Float64(v) => *v != 0.0,
            Datum::Decimal(d) => !d.is_zero(),
            Datum::String(_) | Datum::Bytes(_) | Datum::Duration(_) | Datum::Time(_) => true,
        }
    }
}

/// Exact comparison of an integer with a float, without rounding the integer
fn compare_integer_float(int: i128, float: f64) -> Ordering {
    if float.is_nan() {
        return if float.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    // 2^64 and -2^63 bound every Int64 and Uint64 value
    if float >= 18_446_744_073_709_551_616.0 {
        return Ordering::Less;
    }
    if float < -9_223_372_036_854_775_808.0 {
        return Ordering::Greater;
    }

    let whole = float.trunc();
    match int.cmp(&(whole as i128)) {
        Ordering::Equal if float > whole => Ordering::Less,
        Ordering::Equal if float < whole => Ordering::Greater,
        ordering => ordering,
    }
}

/// Exact comparison of a signed and an unsigned 64-bit integer
fn compare_signed_unsigned(signed: i64, unsigned: u64) -> Ordering {
    if signed < 0 {
        Ordering::Less
    } else {
        (signed as u64).cmp(&unsigned)
    }
}

impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Datum::Null => write!(f, "NULL"),
            Datum::Int64(v) => write!(f, "{}", v),
            Datum::Uint64(v) => write!(f, "{}", v),
            Datum::Float64(v) => write!(f, "{}", v),
            Datum::Decimal(d) => write!(f, "{}", d),
            Datum::String(s) => write!(f, "{}", s),
            Datum::Bytes(b) => {
                write!(f, "0x")?;
                for byte in b {
                    write!(f, "{:02X}", byte)?;
                }
                Ok(())
            }
            Datum::Duration(d) => {
                let sign = if *d < Duration::zero() { "-" } else { "" };
                let abs = d.abs();
                let total_secs = abs.num_seconds();
                let micros = abs.subsec_nanos() / 1_000;
                write!(
                    f,
                    "{}{:02}:{:02}:{:02}",
                    sign,
                    total_secs / 3600,
                    (total_secs / 60) % 60,
                    total_secs % 60
                )?;
                if micros != 0 {
                    write!(f, ".{:06}", micros)?;
                }
                Ok(())
            }
            Datum::Time(t) => write!(f, "{}", t.format("%Y-%m-%d %H:%M:%S%.f")),
        }
    }
}

impl From<i64> for Datum {
    fn from(value: i64) -> Self {
        Datum::Int64(value)
    }
}

impl From<u64> for Datum {
    fn from(value: u64) -> Self {
        Datum::Uint64(value)
    }
}

impl From<f64> for Datum {
    fn from(value: f64) -> Self {
        Datum::Float64(value)
    }
}

impl From<Decimal> for Datum {
    fn from(value: Decimal) -> Self {
        Datum::Decimal(value)
    }
}

impl From<&str> for Datum {
    fn from(value: &str) -> Self {
        Datum::String(value.to_string())
    }
}

impl From<String> for Datum {
    fn from(value: String) -> Self {
        Datum::String(value)
    }
}

impl From<Vec<u8>> for Datum {
    fn from(value: Vec<u8>) -> Self {
        Datum::Bytes(value)
    }
}

impl From<Duration> for Datum {
    fn from(value: Duration) -> Self {
        Datum::Duration(value)
    }
}

impl From<NaiveDateTime> for Datum {
    fn from(value: NaiveDateTime) -> Self {
        Datum::Time(value)
    }
}

/// Serde adapter storing a chrono duration as whole seconds plus nanoseconds.
mod duration_parts {
    use chrono::Duration;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        (value.num_seconds(), value.subsec_nanos()).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let (secs, nanos) = <(i64, i32)>::deserialize(deserializer)?;
        Duration::try_seconds(secs)
            .and_then(|d| d.checked_add(&Duration::nanoseconds(nanos as i64)))
            .ok_or_else(|| D::Error::custom("duration out of range"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn time(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_kind_and_null() {
        assert_eq!(Datum::Null.kind(), DatumKind::Null);
        assert!(Datum::Null.is_null());
        assert_eq!(Datum::Int64(1).kind(), DatumKind::Int64);
        assert_eq!(Datum::from("a").kind(), DatumKind::String);
        assert_eq!(Datum::from(vec![1u8]).kind(), DatumKind::Bytes);
        assert!(!Datum::Int64(0).is_null());
    }

    #[test]
    fn test_compare_integers() {
        assert_eq!(
            Datum::Int64(-1).compare(&Datum::Uint64(0)).unwrap(),
            Ordering::Less
        );
        assert_eq!(
            Datum::Uint64(u64::MAX).compare(&Datum::Int64(i64::MAX)).unwrap(),
            Ordering::Greater
        );
        assert_eq!(
            Datum::Int64(5).compare(&Datum::Uint64(5)).unwrap(),
            Ordering::Equal
        );
    }

    #[test]
    fn test_compare_mixed_numeric() {
        let dec = Datum::Decimal(Decimal::from_str("100.00").unwrap());
        assert_eq!(Datum::Int64(100).compare(&dec).unwrap(), Ordering::Equal);
        assert_eq!(
            Datum::Float64(99.5).compare(&dec).unwrap(),
            Ordering::Less
        );
        assert_eq!(
            Datum::Uint64(3).compare(&Datum::Float64(2.5)).unwrap(),
            Ordering::Greater
        );
        assert_eq!(
            Datum::Float64(0.0).compare(&Datum::Float64(-0.0)).unwrap(),
            Ordering::Equal
        );
    }

    #[test]
    fn test_compare_integer_float_exact() {
        // 2^53 + 1 has no f64 representation; the order must stay transitive
        let a = Datum::Int64((1 << 53) + 1);
        let b = Datum::Float64((1u64 << 53) as f64);
        let c = Datum::Int64(1 << 53);
        assert_eq!(a.compare(&b).unwrap(), Ordering::Greater);
        assert_eq!(b.compare(&c).unwrap(), Ordering::Equal);
        assert_eq!(a.compare(&c).unwrap(), Ordering::Greater);
        assert_eq!(b.compare(&a).unwrap(), Ordering::Less);

        assert_eq!(
            Datum::Int64(-1).compare(&Datum::Float64(-1.5)).unwrap(),
            Ordering::Greater
        );
        assert_eq!(
            Datum::Int64(-2).compare(&Datum::Float64(-1.5)).unwrap(),
            Ordering::Less
        );
        assert_eq!(
            Datum::Uint64(u64::MAX)
                .compare(&Datum::Float64(18_446_744_073_709_551_616.0))
                .unwrap(),
            Ordering::Less
        );
        assert_eq!(
            Datum::Int64(i64::MIN)
                .compare(&Datum::Float64(f64::NEG_INFINITY))
                .unwrap(),
            Ordering::Greater
        );
        assert_eq!(
            Datum::Int64(i64::MAX).compare(&Datum::Float64(f64::NAN)).unwrap(),
            Ordering::Less
        );
    }

    #[test]
    fn test_compare_strings_bytewise() {
        assert_eq!(
            Datum::from("abc").compare(&Datum::from("abd")).unwrap(),
            Ordering::Less
        );
        assert_eq!(
            Datum::from("B").compare(&Datum::from("a")).unwrap(),
            Ordering::Less
        );
        assert_eq!(
            Datum::from("abc")
                .compare(&Datum::Bytes(b"abc".to_vec()))
                .unwrap(),
            Ordering::Equal
        );
    }

    #[test]
    fn test_compare_temporal() {
        assert_eq!(
            Datum::Duration(Duration::seconds(10))
                .compare(&Datum::Duration(Duration::seconds(-10)))
                .unwrap(),
            Ordering::Greater
        );
        assert_eq!(
            Datum::Time(time(2020, 1, 1, 0))
                .compare(&Datum::Time(time(2020, 1, 1, 1)))
                .unwrap(),
            Ordering::Less
        );
    }

    #[test]
    fn test_compare_incompatible_kinds() {
        assert!(matches!(
            Datum::Int64(1).compare(&Datum::from("1")),
            Err(EvalError::TypeCoercion { .. })
        ));
        assert!(matches!(
            Datum::Duration(Duration::seconds(1)).compare(&Datum::Int64(1)),
            Err(EvalError::TypeCoercion { .. })
        ));
        // The raw ordering does not special-case NULL
        assert!(matches!(
            Datum::Null.compare(&Datum::Null),
            Err(EvalError::TypeCoercion { .. })
        ));
    }

    #[test]
    fn test_to_bool_numeric() {
        assert_eq!(Datum::Null.to_bool("AND").unwrap(), None);
        assert_eq!(Datum::Int64(0).to_bool("AND").unwrap(), Some(false));
        assert_eq!(Datum::Int64(-3).to_bool("AND").unwrap(), Some(true));
        assert_eq!(Datum::Uint64(0).to_bool("AND").unwrap(), Some(false));
        assert_eq!(Datum::Float64(0.1).to_bool("AND").unwrap(), Some(true));
        assert_eq!(
            Datum::Decimal(Decimal::from_str("0.000").unwrap())
                .to_bool("AND")
                .unwrap(),
            Some(false)
        );
    }

    #[test]
    fn test_to_bool_rejects_non_numeric() {
        assert_eq!(
            Datum::from("1").to_bool("OR"),
            Err(EvalError::TypeCoercion {
                operator: "OR".to_string(),
                left: DatumKind::String,
                right: None,
            })
        );
        assert!(Datum::Duration(Duration::zero()).to_bool("NOT").is_err());
        assert!(Datum::Time(time(2000, 1, 1, 0)).to_bool("XOR").is_err());
    }

    #[test]
    fn test_is_satisfied_numeric() {
        assert!(!Datum::Null.is_satisfied());
        assert!(!Datum::Int64(0).is_satisfied());
        assert!(Datum::Int64(1).is_satisfied());
        assert!(Datum::Int64(-1).is_satisfied());
        assert!(!Datum::Uint64(0).is_satisfied());
        assert!(!Datum::Float64(0.0).is_satisfied());
        assert!(!Datum::Float64(-0.0).is_satisfied());
        assert!(Datum::Float64(f64::NAN).is_satisfied());
        assert!(!Datum::Decimal(Decimal::from_str("0.00").unwrap()).is_satisfied());
        assert!(Datum::Decimal(Decimal::from_str("0.01").unwrap()).is_satisfied());
    }

    #[test]
    fn test_is_satisfied_non_numeric() {
        assert!(Datum::from("").is_satisfied());
        assert!(Datum::from("0").is_satisfied());
        assert!(Datum::from("abc").is_satisfied());
        assert!(Datum::Bytes(vec![]).is_satisfied());
        assert!(Datum::Duration(Duration::zero()).is_satisfied());
        assert!(Datum::Time(time(1970, 1, 1, 0)).is_satisfied());
    }

    #[test]
    fn test_display() {
        assert_eq!(Datum::Null.to_string(), "NULL");
        assert_eq!(Datum::Int64(-4).to_string(), "-4");
        assert_eq!(Datum::Bytes(vec![0xAB, 0x01]).to_string(), "0xAB01");
        assert_eq!(
            Datum::Duration(Duration::seconds(3723)).to_string(),
            "01:02:03"
        );
        assert_eq!(
            Datum::Duration(-Duration::milliseconds(1500)).to_string(),
            "-00:00:01.500000"
        );
        assert_eq!(
            Datum::Time(time(2016, 2, 29, 13)).to_string(),
            "2016-02-29 13:00:00"
        );
    }
}
