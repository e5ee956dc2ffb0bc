//! Display helpers for dashboard figures.

/// Abbreviate large figures: `1.5M`, `146K`, plain below a thousand.
pub fn format_compact_number(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if magnitude >= 1_000.0 {
        format!("{:.0}K", value / 1_000.0)
    } else {
        format!("{value}")
    }
}

/// Currency amount with thousands separators and no decimals, e.g. `USD 873,000`.
pub fn format_currency(amount: f64, currency: &str) -> String {
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{currency} {sign}{grouped}")
}
