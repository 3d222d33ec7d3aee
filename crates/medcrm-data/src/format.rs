// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::macros::format_description;
use time::{Date, Time};

/// Placeholder for values the dataset cannot supply.
pub const UNKNOWN: &str = "unknown";

pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let absolute = cents.unsigned_abs();
    format!(
        "{sign}${}.{:02}",
        group_thousands(absolute / 100),
        absolute % 100
    )
}

pub fn format_date(value: Date) -> String {
    value
        .format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| UNKNOWN.to_owned())
}

pub fn format_time(value: Time) -> String {
    value
        .format(format_description!("[hour]:[minute]"))
        .unwrap_or_else(|_| UNKNOWN.to_owned())
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut output = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            output.push(',');
        }
        output.push(ch);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::{format_cents, format_date, format_time};
    use time::macros::{date, time};

    #[test]
    fn cents_render_with_grouping() {
        assert_eq!(format_cents(0), "$0.00");
        assert_eq!(format_cents(5), "$0.05");
        assert_eq!(format_cents(123_456_789), "$1,234,567.89");
        assert_eq!(format_cents(-250_000), "-$2,500.00");
        assert_eq!(format_cents(i64::MIN), "-$92,233,720,368,547,758.08");
    }

    #[test]
    fn dates_and_times_are_zero_padded() {
        assert_eq!(format_date(date!(2026 - 03 - 04)), "2026-03-04");
        assert_eq!(format_time(time!(09:05)), "09:05");
    }
}
