//! Numeric normalization shared by planning, display and history.
//!
//! Every width or remainder leaves the planner as a value with at most two
//! decimal places. Whole numbers render without a fractional part.

/// Round to 10 decimal places to drop floating-point noise such as
/// `0.1 + 0.2 = 0.30000000000000004`.
fn round_noise(num: f64) -> f64 {
    format!("{num:.10}").parse().unwrap_or(num)
}

/// Render `num` as an integer string when it is whole, otherwise with exactly
/// two decimal places.
///
/// ```
/// use plank_planner::format::format_number;
/// assert_eq!(format_number(61.0), "61");
/// assert_eq!(format_number(22.5), "22.50");
/// assert_eq!(format_number(0.1 + 0.2), "0.30");
/// ```
pub fn format_number(num: f64) -> String {
    let value = round_noise(num);
    if !value.is_finite() {
        return value.to_string();
    }
    // Ties round away from zero: 22.125 is 22.13, not 22.12
    let cents = (value * 100.0).round() / 100.0;
    let fixed = format!("{cents:.2}");
    match fixed.strip_suffix(".00") {
        Some("-0") => "0".to_string(),
        Some(whole) => whole.to_string(),
        None => fixed,
    }
}

/// Numeric value of [`format_number`].
pub fn normalize(num: f64) -> f64 {
    format_number(num).parse().unwrap_or(num)
}

/// Re-format an already formatted number. Returns `None` if `s` is not numeric.
pub fn reformat(s: &str) -> Option<String> {
    s.trim().parse::<f64>().ok().map(format_number)
}
