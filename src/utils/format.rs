//! Display labels for the Japanese (ja-JP) presentation layer

use bigdecimal::{BigDecimal, RoundingMode};
use chrono::{Datelike, NaiveDate};

use crate::types::*;

/// `"6月"`
pub fn month_label(key: MonthKey) -> String {
    format!("{}月", key.month())
}

/// `"2025年6月"`
pub fn month_year_label(key: MonthKey) -> String {
    format!("{}年{}月", key.year(), key.month())
}

/// `"2025年の振込状況"`, the heading of a calendar-year view
pub fn year_heading(year: i32) -> String {
    format!("{}年の振込状況", year)
}

/// Whole-yen amount with thousands separators, e.g. `"¥50,000"`; fractions round half up
pub fn format_yen(amount: &BigDecimal) -> String {
    let rounded = amount.with_scale_round(0, RoundingMode::HalfUp).to_string();
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rounded.as_str()),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!("{}¥{}", sign, grouped)
}

pub fn status_label(status: TransferStatus) -> &'static str {
    match status {
        TransferStatus::Completed => "振込完了",
        TransferStatus::Overdue => "期限超過",
        TransferStatus::Pending => "未完了",
    }
}

/// Caption of the toggle button for a record in the given state
pub fn toggle_label(completed: bool) -> &'static str {
    if completed {
        "完了を取消"
    } else {
        "完了にする"
    }
}

/// `"3/12 完了 (25%)"`
pub fn progress_label(summary: &LedgerSummary) -> String {
    format!(
        "{}/{} 完了 ({}%)",
        summary.completed_count, summary.total_months, summary.completion_rate
    )
}

/// Short ja-JP date, e.g. `"2025/6/15"`
pub fn date_label(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.year(), date.month(), date.day())
}
