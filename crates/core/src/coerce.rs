//! Value coercion from decoded wire values to typed fields
//!
//! HubSpot is loose about value types: numbers frequently arrive as decimal
//! strings, booleans as `"true"`, and timestamps as strings of Unix
//! milliseconds. Coercion is best-effort and never fails hard. A value that
//! cannot be mapped onto the target type yields [`Coerced::Unsupported`] and
//! the field keeps its zero value.
//!
//! ## Rules
//!
//! | Target | Accepted wire values |
//! |--------|----------------------|
//! | `bool` | bool, number (`!= 0`), `"1" "t" "true"` / `"0" "f" "false"` (any case of the word forms) |
//! | integers | integer number, float (truncated), numeric string, bool |
//! | floats | number, numeric string, bool |
//! | `String` | string, number, bool |
//! | `DateTime<Utc>` | all-digit string (Unix ms), RFC 3339 / ISO date strings, number (Unix s) |
//! | `Vec<T>` | array whose elements all coerce to `T` |
//! | `Option<T>` | `null` (None) or anything `T` accepts |
//!
//! `null` and objects are unsupported for every non-optional target.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::{Number, Value as JsonValue};

/// Runtime description of a field's declared type.
///
/// Used by the model builder to validate role/type combinations
/// (association lists must be `Vec<i64>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireKind {
    /// `bool`
    Bool,
    /// `i8`
    I8,
    /// `i16`
    I16,
    /// `i32`
    I32,
    /// `i64`
    I64,
    /// `isize`
    Isize,
    /// `u8`
    U8,
    /// `u16`
    U16,
    /// `u32`
    U32,
    /// `u64`
    U64,
    /// `usize`
    Usize,
    /// `f32`
    F32,
    /// `f64`
    F64,
    /// `String`
    String,
    /// `DateTime<Utc>`
    Time,
    /// `Vec<T>` with the element kind
    List(Box<WireKind>),
    /// `Option<T>` with the inner kind
    Optional(Box<WireKind>),
}

impl WireKind {
    /// The kind of association list fields: `Vec<i64>`
    pub fn id_list() -> Self {
        WireKind::List(Box::new(WireKind::I64))
    }
}

/// Outcome of coercing a wire value into a target type.
///
/// Keeps "correctly typed", "converted" and "dropped" apart so callers and
/// tests can tell a faithful decode from a silently lost value.
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced<T> {
    /// The wire value already had the target type
    Exact(T),
    /// The wire value was converted (string to number, float to int, ...)
    Converted(T),
    /// The wire value cannot be represented as the target type
    Unsupported,
}

impl<T> Coerced<T> {
    /// The coerced value, if any
    pub fn value(self) -> Option<T> {
        match self {
            Coerced::Exact(v) | Coerced::Converted(v) => Some(v),
            Coerced::Unsupported => None,
        }
    }

    /// The coerced value, or the type's zero value when unsupported
    pub fn value_or_default(self) -> T
    where
        T: Default,
    {
        self.value().unwrap_or_default()
    }

    /// Check if the wire value already had the target type
    pub fn is_exact(&self) -> bool {
        matches!(self, Coerced::Exact(_))
    }

    /// Check if the value had to be converted
    pub fn is_converted(&self) -> bool {
        matches!(self, Coerced::Converted(_))
    }

    /// Check if no value could be produced
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Coerced::Unsupported)
    }

    /// Map the contained value, keeping the outcome class
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Coerced<U> {
        match self {
            Coerced::Exact(v) => Coerced::Exact(f(v)),
            Coerced::Converted(v) => Coerced::Converted(f(v)),
            Coerced::Unsupported => Coerced::Unsupported,
        }
    }
}

/// A Rust type that can live in an entity field mapped to a HubSpot property.
pub trait WireType: Default + PartialEq + Send + Sync + 'static {
    /// Runtime kind of this type
    fn kind() -> WireKind;

    /// Best-effort conversion of a decoded wire value
    fn coerce(value: &JsonValue) -> Coerced<Self>;

    /// Value as sent to HubSpot in a write request
    fn to_wire(&self) -> JsonValue;

    /// Whether this is the type's zero value (omitted on write)
    fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// Coerce a wire value into `T`
pub fn coerce<T: WireType>(value: &JsonValue) -> Coerced<T> {
    T::coerce(value)
}

// ============================================================================
// Scalar helpers
// ============================================================================

/// Accepted spellings of boolean strings
fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

fn truncate_float(f: f64) -> Option<i128> {
    if f.is_finite() {
        Some(f.trunc() as i128)
    } else {
        None
    }
}

fn number_as_integer(n: &Number) -> Option<(i128, bool)> {
    if let Some(i) = n.as_i64() {
        Some((i as i128, true))
    } else if let Some(u) = n.as_u64() {
        Some((u as i128, true))
    } else {
        n.as_f64().and_then(truncate_float).map(|i| (i, false))
    }
}

/// Integer view of a wire value, plus whether it was already an integer
fn integer_of(value: &JsonValue) -> Option<(i128, bool)> {
    match value {
        JsonValue::Number(n) => number_as_integer(n),
        JsonValue::String(s) => {
            let s = s.trim();
            match s.parse::<i128>() {
                Ok(i) => Some((i, false)),
                Err(_) => s
                    .parse::<f64>()
                    .ok()
                    .and_then(truncate_float)
                    .map(|i| (i, false)),
            }
        }
        JsonValue::Bool(b) => Some((i128::from(*b), false)),
        _ => None,
    }
}

/// Float view of a wire value, plus whether it was already a number
fn float_of(value: &JsonValue) -> Option<(f64, bool)> {
    match value {
        JsonValue::Number(n) => n.as_f64().map(|f| (f, true)),
        JsonValue::String(s) => s.trim().parse::<f64>().ok().map(|f| (f, false)),
        JsonValue::Bool(b) => Some((if *b { 1.0 } else { 0.0 }, false)),
        _ => None,
    }
}

macro_rules! impl_wire_integer {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl WireType for $ty {
                fn kind() -> WireKind {
                    WireKind::$kind
                }

                fn coerce(value: &JsonValue) -> Coerced<Self> {
                    match integer_of(value) {
                        Some((n, exact)) => match <$ty>::try_from(n) {
                            Ok(v) if exact => Coerced::Exact(v),
                            Ok(v) => Coerced::Converted(v),
                            Err(_) => Coerced::Unsupported,
                        },
                        None => Coerced::Unsupported,
                    }
                }

                fn to_wire(&self) -> JsonValue {
                    JsonValue::from(*self)
                }
            }
        )*
    };
}

impl_wire_integer! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
}

impl WireType for bool {
    fn kind() -> WireKind {
        WireKind::Bool
    }

    fn coerce(value: &JsonValue) -> Coerced<Self> {
        match value {
            JsonValue::Bool(b) => Coerced::Exact(*b),
            JsonValue::Number(n) => match n.as_f64() {
                Some(f) => Coerced::Converted(f != 0.0),
                None => Coerced::Unsupported,
            },
            JsonValue::String(s) => match parse_bool(s.trim()) {
                Some(b) => Coerced::Converted(b),
                None => Coerced::Unsupported,
            },
            _ => Coerced::Unsupported,
        }
    }

    fn to_wire(&self) -> JsonValue {
        JsonValue::Bool(*self)
    }
}

impl WireType for f64 {
    fn kind() -> WireKind {
        WireKind::F64
    }

    fn coerce(value: &JsonValue) -> Coerced<Self> {
        match float_of(value) {
            Some((f, true)) => Coerced::Exact(f),
            Some((f, false)) => Coerced::Converted(f),
            None => Coerced::Unsupported,
        }
    }

    fn to_wire(&self) -> JsonValue {
        JsonValue::from(*self)
    }
}

impl WireType for f32 {
    fn kind() -> WireKind {
        WireKind::F32
    }

    fn coerce(value: &JsonValue) -> Coerced<Self> {
        match float_of(value) {
            Some((f, true)) => Coerced::Exact(f as f32),
            Some((f, false)) => Coerced::Converted(f as f32),
            None => Coerced::Unsupported,
        }
    }

    fn to_wire(&self) -> JsonValue {
        JsonValue::from(*self)
    }
}

/// Whole floats are written without a fractional part (`60000.0` as `"60000"`)
fn number_to_string(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        _ => n.to_string(),
    }
}

impl WireType for String {
    fn kind() -> WireKind {
        WireKind::String
    }

    fn coerce(value: &JsonValue) -> Coerced<Self> {
        match value {
            JsonValue::String(s) => Coerced::Exact(s.clone()),
            JsonValue::Number(n) => Coerced::Converted(number_to_string(n)),
            JsonValue::Bool(b) => Coerced::Converted(b.to_string()),
            _ => Coerced::Unsupported,
        }
    }

    fn to_wire(&self) -> JsonValue {
        JsonValue::String(self.clone())
    }
}

// ============================================================================
// Time
// ============================================================================

fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Unix milliseconds as written by `to_wire`; dates before 1970 are negative
fn is_millis(s: &str) -> bool {
    is_all_digits(s.strip_prefix('-').unwrap_or(s))
}

/// Parse the textual date formats HubSpot and its users produce
fn parse_time(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

impl WireType for DateTime<Utc> {
    fn kind() -> WireKind {
        WireKind::Time
    }

    fn coerce(value: &JsonValue) -> Coerced<Self> {
        let parsed = match value {
            // HubSpot sends unix time in milliseconds
            JsonValue::String(s) if is_millis(s) => s
                .parse::<i64>()
                .ok()
                .and_then(DateTime::from_timestamp_millis),
            JsonValue::String(s) => parse_time(s.trim()),
            JsonValue::Number(_) => integer_of(value)
                .and_then(|(secs, _)| i64::try_from(secs).ok())
                .and_then(|secs| DateTime::from_timestamp(secs, 0)),
            _ => None,
        };
        match parsed {
            Some(dt) => Coerced::Converted(dt),
            None => Coerced::Unsupported,
        }
    }

    /// Written as a string of Unix milliseconds, the format HubSpot uses
    /// for date properties.
    fn to_wire(&self) -> JsonValue {
        JsonValue::String(self.timestamp_millis().to_string())
    }
}

// ============================================================================
// Containers
// ============================================================================

impl<T: WireType> WireType for Vec<T> {
    fn kind() -> WireKind {
        WireKind::List(Box::new(T::kind()))
    }

    fn coerce(value: &JsonValue) -> Coerced<Self> {
        let JsonValue::Array(items) = value else {
            return Coerced::Unsupported;
        };

        let mut exact = true;
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            match T::coerce(item) {
                Coerced::Exact(v) => out.push(v),
                Coerced::Converted(v) => {
                    exact = false;
                    out.push(v);
                }
                Coerced::Unsupported => return Coerced::Unsupported,
            }
        }

        if exact {
            Coerced::Exact(out)
        } else {
            Coerced::Converted(out)
        }
    }

    fn to_wire(&self) -> JsonValue {
        JsonValue::Array(self.iter().map(WireType::to_wire).collect())
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

/// `None` is the unset state; `Some(zero)` is an explicit zero that is
/// still written to HubSpot.
impl<T: WireType> WireType for Option<T> {
    fn kind() -> WireKind {
        WireKind::Optional(Box::new(T::kind()))
    }

    fn coerce(value: &JsonValue) -> Coerced<Self> {
        match value {
            JsonValue::Null => Coerced::Exact(None),
            other => T::coerce(other).map(Some),
        }
    }

    fn to_wire(&self) -> JsonValue {
        match self {
            Some(v) => v.to_wire(),
            None => JsonValue::Null,
        }
    }

    fn is_zero(&self) -> bool {
        self.is_none()
    }
}
