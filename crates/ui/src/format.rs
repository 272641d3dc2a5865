use time::OffsetDateTime;

/// Two decimals with comma thousands separators, e.g. `66,012.50`.
pub fn format_price(price: f64) -> String {
    if !price.is_finite() {
        return "--".to_string();
    }

    let fixed = format!("{:.2}", price.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if price < 0.0 && fixed != "0.00" { "-" } else { "" };

    format!("{sign}{}.{fraction}", group_thousands(whole))
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

/// Signed percentage with two decimals: `+1.23%`, `-0.50%`.
pub fn format_percentage(percentage: f64) -> String {
    if !percentage.is_finite() {
        return "--".to_string();
    }
    let sign = if percentage >= 0.0 { "+" } else { "" };
    format!("{sign}{percentage:.2}%")
}

pub fn format_amount(amount: f64) -> String {
    format!("{amount:.4}")
}

/// `HH:MM` of a millisecond timestamp, in UTC.
pub fn format_timestamp(timestamp_ms: i64) -> String {
    let nanos = i128::from(timestamp_ms) * 1_000_000;
    match OffsetDateTime::from_unix_timestamp_nanos(nanos) {
        Ok(moment) => format!("{:02}:{:02}", moment.hour(), moment.minute()),
        Err(_) => "--:--".to_string(),
    }
}
