use serde::{Deserialize, Serialize};

use crate::types::{Datum, DatumKind};

/// Declared type of a leaf expression.
///
/// The planner attaches a field type to every constant so the evaluator
/// knows how to decode the literal payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldType {
    /// Kind of datum the payload decodes to
    pub tp: DatumKind,
    /// Maximum payload length in bytes for strings and bytes
    pub flen: Option<u32>,
    /// Maximum number of fractional digits for decimals
    pub decimal: Option<u32>,
}

impl FieldType {
    pub fn new(tp: DatumKind) -> Self {
        Self {
            tp,
            flen: None,
            decimal: None,
        }
    }

    pub fn with_flen(mut self, flen: u32) -> Self {
        self.flen = Some(flen);
        self
    }

    pub fn with_decimal(mut self, decimal: u32) -> Self {
        self.decimal = Some(decimal);
        self
    }

    /// Unconstrained field type matching the datum's kind
    pub fn of(datum: &Datum) -> Self {
        Self::new(datum.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_builders() {
        let ft = FieldType::new(DatumKind::String).with_flen(16);
        assert_eq!(ft.tp, DatumKind::String);
        assert_eq!(ft.flen, Some(16));
        assert_eq!(ft.decimal, None);

        let ft = FieldType::new(DatumKind::Decimal).with_decimal(2);
        assert_eq!(ft.decimal, Some(2));

        assert_eq!(FieldType::of(&Datum::Null), FieldType::new(DatumKind::Null));
        assert_eq!(
            FieldType::of(&Datum::Float64(1.5)).tp,
            DatumKind::Float64
        );
    }
}
