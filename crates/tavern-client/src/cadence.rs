//! Human-readable rendering of job cadences.
//!
//! The cron string itself is never parsed for execution on this side; it is
//! forwarded to the backend as-is.

use tavern_types::models::Cadence;

pub trait CadenceFormatter {
    fn format(&self, cadence: &Cadence) -> String;
}

/// Lightweight cron summary: `"0 9 * * 1-5"` renders as `"9:00 on Weekdays"`.
///
/// Only the minute, hour and day-of-week fields are read. Anything it cannot
/// express, including every-day schedules, comes back as the raw string.
#[derive(Debug, Clone, Copy, Default)]
pub struct CronSummary;

impl CadenceFormatter for CronSummary {
    fn format(&self, cadence: &Cadence) -> String {
        let raw = cadence.as_str();
        let parts: Vec<&str> = raw.split(' ').collect();
        let [minute, hour, _day, _month, dow] = parts.as_slice() else {
            return raw.to_string();
        };

        let dow_display = match *dow {
            "1-5" => "Weekdays",
            "0,6" => "Weekends",
            "*" => "Daily",
            other => other,
        };

        let minute = format!("{minute:0>2}");
        let time_display = if hour.contains(',') {
            hour.split(',')
                .map(|h| format!("{h}:{minute}"))
                .collect::<Vec<_>>()
                .join(", ")
        } else if *hour != "*" {
            format!("{hour}:{minute}")
        } else {
            String::new()
        };

        if !time_display.is_empty() && dow_display != "Daily" {
            format!("{time_display} on {dow_display}")
        } else {
            raw.to_string()
        }
    }
}

/// Shorthand for [`CronSummary`].
pub fn describe(cadence: &Cadence) -> String {
    CronSummary.format(cadence)
}
