use serde_json::{Number, Value};

// Largest integer an f64 holds exactly (2^53 - 1).
const MAX_SAFE_INTEGER: i64 = 9_007_199_254_740_991;
// 2^63 and 2^64, the first floats outside i64 and u64.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;
const U64_LIMIT: f64 = 18_446_744_073_709_551_616.0;

/// Interprets a raw replacement string as a JSON value.
///
/// In priority order: a missing or empty input is `null`, `"true"` and `"false"` are booleans,
/// anything numeric (surrounding whitespace, a sign, a fraction and an exponent are allowed)
/// is a number, and everything else stays a string.
///
/// Numerals beyond f64 precision are accepted and rounded. Overflowing values, `Infinity`,
/// `NaN` and hex literals are not numeric here and stay strings.
///
/// ## Example
///
/// ```rust
/// use jsonsubst::coerce_value;
/// use serde_json::json;
///
/// assert_eq!(coerce_value(Some("")), json!(null));
/// assert_eq!(coerce_value(Some("false")), json!(false));
/// assert_eq!(coerce_value(Some(" -1.5e2 ")), json!(-150));
/// assert_eq!(coerce_value(Some("1.0.0")), json!("1.0.0"));
/// ```
pub fn coerce_value(raw: Option<&str>) -> Value {
    match raw {
        None | Some("") => Value::Null,
        Some("true") => Value::Bool(true),
        Some("false") => Value::Bool(false),
        Some(raw) => match parse_number(raw) {
            Some(number) => Value::Number(number),
            None => Value::String(raw.to_string()),
        },
    }
}

/// Formats a value the way it reads as text: strings as-is, everything else as JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// The value to store over `existing`. A string destination stays a string.
pub(crate) fn preserve_string_type(existing: &Value, value: &Value) -> Value {
    if existing.is_string() {
        Value::String(display_value(value))
    } else {
        value.clone()
    }
}

fn parse_number(raw: &str) -> Option<Number> {
    let trimmed = raw.trim();
    if !is_decimal_numeral(trimmed) {
        return None;
    }
    if let Ok(int) = trimmed.parse::<i64>() {
        if int.unsigned_abs() <= MAX_SAFE_INTEGER as u64 {
            return Some(Number::from(int));
        }
    }
    // Everything else goes through f64, rounding integers beyond 2^53.
    let float = trimmed.parse::<f64>().ok().filter(|f| f.is_finite())?;
    if float.fract() == 0.0 {
        if float.abs() < I64_LIMIT {
            return Some(Number::from(float as i64));
        }
        if float > 0.0 && float < U64_LIMIT {
            return Some(Number::from(float as u64));
        }
    }
    Number::from_f64(float)
}

// [+-] digits [. digits] [(e|E) [+-] digits], with at least one mantissa digit.
fn is_decimal_numeral(s: &str) -> bool {
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    let unsigned = s.strip_prefix(&['+', '-'][..]).unwrap_or(s);

    let (mantissa, exponent) = match unsigned.find(&['e', 'E'][..]) {
        Some(at) => (&unsigned[..at], Some(&unsigned[at + 1..])),
        None => (unsigned, None),
    };
    let (int, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if int.is_empty() && frac.is_empty() {
        return false;
    }
    if !all_digits(int) || !all_digits(frac) {
        return false;
    }

    match exponent {
        None => true,
        Some(exp) => {
            let exp = exp.strip_prefix(&['+', '-'][..]).unwrap_or(exp);
            !exp.is_empty() && all_digits(exp)
        }
    }
}
