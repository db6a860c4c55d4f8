use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

/// Formats an IDR amount the way the listing cards do: no decimals,
/// dot-separated thousands.
pub fn format_idr(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-Rp {}", grouped)
    } else {
        format!("Rp {}", grouped)
    }
}

/// Long-form date for display ("January 5, 2026"). Unparseable input is
/// shown as-is rather than failing the whole card.
pub fn format_date(raw: &str) -> String {
    let display = format_description!("[month repr:long] [day padding:none], [year]");
    match parse_remote_date(raw) {
        Some(moment) => moment.date().format(&display).unwrap_or_else(|_| raw.to_string()),
        None => raw.to_string(),
    }
}

/// "HH:MM:SS" from the wire, shown as "HH:MM".
pub fn format_time(raw: &str) -> &str {
    raw.get(..5).unwrap_or(raw)
}

/// Parses the timestamp shapes the service emits: RFC 3339 (with or
/// without fractional seconds), a space-separated datetime, or a bare
/// date. `None` when nothing matches.
pub fn parse_remote_date(raw: &str) -> Option<OffsetDateTime> {
    let trimmed = raw.trim();

    if let Ok(moment) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        return Some(moment);
    }

    let datetime = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    if let Ok(moment) = PrimitiveDateTime::parse(trimmed, &datetime) {
        return Some(moment.assume_utc());
    }

    let date_only = format_description!("[year]-[month]-[day]");
    if let Ok(date) = Date::parse(trimmed, &date_only) {
        return Some(date.midnight().assume_utc());
    }

    None
}
