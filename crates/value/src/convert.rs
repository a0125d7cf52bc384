//! Loose conversions between value representations.
//!
//! These follow the host conventions option rules were written against:
//! `to_number` parses strings the way a numeric cast does, [`Display`]
//! renders the string form, and `to_bigint` refuses anything with a
//! fractional part.

use std::fmt;

use crate::value::Value;

// ============================================================================
// NUMBER
// ============================================================================

impl Value {
    /// Numeric cast. Values with no numeric reading become NaN.
    #[must_use]
    pub fn to_number(&self) -> f64 {
        match self {
            Self::Undefined | Self::Symbol(_) | Self::Function(_) => f64::NAN,
            Self::Null => 0.0,
            Self::Bool(b) => f64::from(u8::from(*b)),
            Self::Number(n) => *n,
            Self::BigInt(i) => *i as f64,
            Self::String(s) => parse_number(s),
            Self::Array(_) | Self::TypedArray(_) | Self::Map(_) | Self::Set(_) | Self::Object(_) => {
                parse_number(&self.to_string())
            }
        }
    }

    /// Truthiness: `false` for undefined, null, `false`, zero, NaN and the
    /// empty string.
    #[must_use]
    pub fn truthy(&self) -> bool {
        match self {
            Self::Undefined | Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::BigInt(i) => *i != 0,
            Self::String(s) => !s.is_empty(),
            _ => true,
        }
    }

    /// Big integer cast. `None` when the source has no exact integer reading.
    #[must_use]
    pub fn to_bigint(&self) -> Option<i128> {
        match self {
            Self::BigInt(i) => Some(*i),
            Self::Bool(b) => Some(i128::from(*b)),
            Self::Number(n) => f64_to_i128(*n),
            Self::String(s) => parse_bigint(s),
            _ => None,
        }
    }

    /// String form, as produced by string coercion.
    #[must_use]
    pub fn to_js_string(&self) -> String {
        self.to_string()
    }
}

fn f64_to_i128(n: f64) -> Option<i128> {
    // 2^127
    const LIMIT: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;
    if !n.is_finite() || n.fract() != 0.0 || n.abs() >= LIMIT {
        return None;
    }
    Some(n as i128)
}

fn parse_bigint(s: &str) -> Option<i128> {
    let t = s.trim();
    if t.is_empty() {
        return Some(0);
    }
    if let Some(radix_value) = parse_radix(t) {
        return radix_value;
    }
    if !t.bytes().all(|b| b.is_ascii_digit() || b == b'+' || b == b'-') {
        return None;
    }
    t.parse().ok()
}

/// Parses `0x`, `0o` and `0b` literals. The outer `None` means `s` carries
/// no radix prefix.
fn parse_radix(s: &str) -> Option<Option<i128>> {
    let (digits, radix) = match s.get(..2).map(str::to_ascii_lowercase).as_deref() {
        Some("0x") => (&s[2..], 16),
        Some("0o") => (&s[2..], 8),
        Some("0b") => (&s[2..], 2),
        _ => return None,
    };
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return Some(None);
    }
    Some(i128::from_str_radix(digits, radix).ok())
}

fn parse_number(s: &str) -> f64 {
    let t = s.trim();
    if t.is_empty() {
        return 0.0;
    }
    match t {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if let Some(radix_value) = parse_radix(t) {
        return radix_value.map_or(f64::NAN, |i| i as f64);
    }
    let decimal = t
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
    if !decimal {
        return f64::NAN;
    }
    t.parse().unwrap_or(f64::NAN)
}

/// Renders a number in its shortest round-trip decimal form, switching to
/// exponent notation outside `[1e-6, 1e21)`.
#[must_use]
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_owned();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }
    if n == 0.0 {
        return "0".to_owned();
    }
    let magnitude = n.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return n.to_string();
    }
    let exp = format!("{n:e}");
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
        _ => exp,
    }
}

// ============================================================================
// STRING FORM
// ============================================================================

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::BigInt(i) => write!(f, "{i}"),
            Self::String(s) => f.write_str(s),
            Self::Symbol(sym) => write!(f, "{sym}"),
            Self::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    if !matches!(item, Self::Undefined | Self::Null) {
                        write!(f, "{item}")?;
                    }
                }
                Ok(())
            }
            Self::TypedArray(arr) => {
                let parts: Vec<String> = arr.elements().iter().map(|n| format_number(*n)).collect();
                f.write_str(&parts.join(","))
            }
            Self::Map(_) => f.write_str("[object Map]"),
            Self::Set(_) => f.write_str("[object Set]"),
            Self::Object(_) => f.write_str("[object Object]"),
            Self::Function(func) => write!(
                f,
                "function {}() {{ [native code] }}",
                func.name().unwrap_or_default()
            ),
        }
    }
}
