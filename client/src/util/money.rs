//! Currency display helpers.

#[cfg(test)]
#[path = "money_test.rs"]
mod money_test;

/// Format an amount with two decimals and comma thousands separators.
#[must_use]
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return "0.00".to_owned();
    }
    let fixed = format!("{:.2}", value.abs());
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac}")
}
