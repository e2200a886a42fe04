use sheetmap_common::{CellValue, ConvertContext, ConvertError, Value, serial_to_datetime};
use std::fmt;
use std::sync::Arc;

/// Signature of a custom field conversion.
pub type ConvertFn =
    dyn Fn(&CellValue, &mut ConvertContext) -> Result<Value, ConvertError> + Send + Sync;

/// How a bound cell becomes a record field value.
///
/// The primitive kinds are an explicit, closed set; each has a canonical
/// value for blank cells so simple schemas need no blank default. `Custom`
/// converters receive blank cells verbatim (unless the field declares
/// `if_blank`) and may record warnings through the context.
#[derive(Clone)]
pub enum Convert {
    /// Stringification of the cell (blank ⇒ `""`).
    Text,
    /// Boolean coercion (blank ⇒ `false`).
    Boolean,
    /// `f64` coercion (blank ⇒ `0.0`).
    Number,
    /// `i64` coercion (blank ⇒ `0`).
    Integer,
    /// Caller-supplied conversion.
    Custom(Arc<ConvertFn>),
}

impl Convert {
    pub fn custom<F>(convert: F) -> Self
    where
        F: Fn(&CellValue, &mut ConvertContext) -> Result<Value, ConvertError>
            + Send
            + Sync
            + 'static,
    {
        Convert::Custom(Arc::new(convert))
    }

    /// Decode an Excel date serial into a [`Value::DateTime`].
    ///
    /// Fails on non-numeric cells so malformed date columns surface as
    /// conversion errors (recoverable via `if_error`).
    pub fn date_time() -> Self {
        Convert::custom(|value, _ctx| match value {
            CellValue::Number(n) => Ok(Value::DateTime(serial_to_datetime(*n))),
            CellValue::Int(i) => Ok(Value::DateTime(serial_to_datetime(*i as f64))),
            other => Err(ConvertError::new(format!(
                "cannot convert `{other}` to a datetime: expected an Excel date serial"
            ))),
        })
    }

    /// The canonical value a primitive kind produces for a blank cell.
    ///
    /// `None` for `Custom`: user logic decides what blank means.
    pub fn blank_value(&self) -> Option<Value> {
        match self {
            Convert::Text => Some(Value::Text(String::new())),
            Convert::Boolean => Some(Value::Boolean(false)),
            Convert::Number => Some(Value::Number(0.0)),
            Convert::Integer => Some(Value::Int(0)),
            Convert::Custom(_) => None,
        }
    }

    /// Apply the conversion to a cell value.
    pub fn apply(
        &self,
        value: &CellValue,
        ctx: &mut ConvertContext,
    ) -> Result<Value, ConvertError> {
        match self {
            Convert::Text => Ok(Value::Text(value.to_string())),
            Convert::Boolean => coerce_boolean(value),
            Convert::Number => coerce_number(value),
            Convert::Integer => coerce_integer(value),
            Convert::Custom(convert) => convert(value, ctx),
        }
    }
}

impl fmt::Debug for Convert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Convert::Text => f.write_str("Text"),
            Convert::Boolean => f.write_str("Boolean"),
            Convert::Number => f.write_str("Number"),
            Convert::Integer => f.write_str("Integer"),
            Convert::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

fn coerce_boolean(value: &CellValue) -> Result<Value, ConvertError> {
    match value {
        CellValue::Boolean(b) => Ok(Value::Boolean(*b)),
        CellValue::Number(n) => Ok(Value::Boolean(*n != 0.0)),
        CellValue::Int(i) => Ok(Value::Boolean(*i != 0)),
        CellValue::Text(s) => match s.trim() {
            t if t.eq_ignore_ascii_case("true") => Ok(Value::Boolean(true)),
            t if t.eq_ignore_ascii_case("false") => Ok(Value::Boolean(false)),
            _ => Err(ConvertError::new(format!(
                "cannot convert `{s}` to a boolean"
            ))),
        },
        CellValue::Empty => Ok(Value::Boolean(false)),
    }
}

fn coerce_number(value: &CellValue) -> Result<Value, ConvertError> {
    match value {
        CellValue::Number(n) => Ok(Value::Number(*n)),
        CellValue::Int(i) => Ok(Value::Number(*i as f64)),
        CellValue::Boolean(b) => Ok(Value::Number(if *b { 1.0 } else { 0.0 })),
        CellValue::Text(s) => s
            .trim()
            .parse::<f64>()
            .map(Value::Number)
            .map_err(|_| ConvertError::new(format!("cannot convert `{s}` to a number"))),
        CellValue::Empty => Ok(Value::Number(0.0)),
    }
}

fn coerce_integer(value: &CellValue) -> Result<Value, ConvertError> {
    match value {
        CellValue::Int(i) => Ok(Value::Int(*i)),
        CellValue::Number(n) => {
            if n.is_finite() && n.fract() == 0.0 && (i64::MIN as f64..=i64::MAX as f64).contains(n)
            {
                Ok(Value::Int(*n as i64))
            } else {
                Err(ConvertError::new(format!(
                    "cannot convert `{n}` to an integer"
                )))
            }
        }
        CellValue::Boolean(b) => Ok(Value::Int(if *b { 1 } else { 0 })),
        CellValue::Text(s) => s
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| ConvertError::new(format!("cannot convert `{s}` to an integer"))),
        CellValue::Empty => Ok(Value::Int(0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetmap_common::Warnings;

    fn apply(convert: &Convert, value: CellValue) -> Result<Value, ConvertError> {
        let mut warnings = Warnings::new();
        let mut ctx = ConvertContext::new("'Sheet'!A1".to_string(), &mut warnings);
        convert.apply(&value, &mut ctx)
    }

    #[test]
    fn primitive_blank_values() {
        assert_eq!(Convert::Text.blank_value(), Some(Value::Text(String::new())));
        assert_eq!(Convert::Boolean.blank_value(), Some(Value::Boolean(false)));
        assert_eq!(Convert::Number.blank_value(), Some(Value::Number(0.0)));
        assert_eq!(Convert::Integer.blank_value(), Some(Value::Int(0)));
        assert!(Convert::custom(|_, _| Ok(Value::Null)).blank_value().is_none());
    }

    #[test]
    fn number_coercion() {
        assert_eq!(
            apply(&Convert::Number, CellValue::Text(" 2.5 ".into())).unwrap(),
            Value::Number(2.5)
        );
        assert_eq!(
            apply(&Convert::Number, CellValue::Boolean(true)).unwrap(),
            Value::Number(1.0)
        );
        assert!(apply(&Convert::Number, CellValue::Text("abc".into())).is_err());
    }

    #[test]
    fn integer_rejects_fractions() {
        assert_eq!(
            apply(&Convert::Integer, CellValue::Number(3.0)).unwrap(),
            Value::Int(3)
        );
        assert!(apply(&Convert::Integer, CellValue::Number(3.5)).is_err());
        assert!(apply(&Convert::Integer, CellValue::Text("12.0".into())).is_err());
    }

    #[test]
    fn boolean_coercion() {
        assert_eq!(
            apply(&Convert::Boolean, CellValue::Text("TRUE".into())).unwrap(),
            Value::Boolean(true)
        );
        assert_eq!(
            apply(&Convert::Boolean, CellValue::Int(2)).unwrap(),
            Value::Boolean(true)
        );
        assert!(apply(&Convert::Boolean, CellValue::Text("yes".into())).is_err());
    }

    #[test]
    fn date_time_decodes_serials() {
        let converted = apply(&Convert::date_time(), CellValue::Number(45247.5)).unwrap();
        let dt = converted.as_datetime().expect("datetime value");
        assert_eq!(dt.to_string(), "2023-11-17 12:00:00");

        assert!(apply(&Convert::date_time(), CellValue::Text("tomorrow".into())).is_err());
    }
}
