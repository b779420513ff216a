use crate::models::Entry;
use crate::stats::parse_date;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RangeWindow {
    #[serde(rename = "1D")]
    Day,
    #[default]
    #[serde(rename = "1W")]
    Week,
    #[serde(rename = "1Y")]
    Year,
    #[serde(rename = "ALL")]
    All,
}

impl RangeWindow {
    /// Window length in days; `None` is unbounded.
    pub fn days(self) -> Option<i64> {
        match self {
            RangeWindow::Day => Some(1),
            RangeWindow::Week => Some(7),
            RangeWindow::Year => Some(365),
            RangeWindow::All => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RangeWindow::Day => "1D",
            RangeWindow::Week => "1W",
            RangeWindow::Year => "1Y",
            RangeWindow::All => "ALL",
        }
    }
}

impl fmt::Display for RangeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RangeWindow {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "1D" => Ok(RangeWindow::Day),
            "1W" => Ok(RangeWindow::Week),
            "1Y" => Ok(RangeWindow::Year),
            "ALL" => Ok(RangeWindow::All),
            other => Err(format!("unknown range '{other}', expected 1D, 1W, 1Y or ALL")),
        }
    }
}

/// Entries with a value for `key` that fall in the window ending at the
/// latest such entry, oldest first.
pub fn select<'a>(entries: &'a [Entry], key: &str, window: RangeWindow) -> Vec<&'a Entry> {
    let present: Vec<&Entry> = entries.iter().filter(|entry| entry.is_present(key)).collect();

    let Some(days) = window.days() else {
        return present;
    };
    let Some(end) = present.last().and_then(|entry| parse_date(&entry.date)) else {
        return Vec::new();
    };
    let start = end - Duration::days(days - 1);

    present
        .into_iter()
        .filter(|entry| parse_date(&entry.date).is_some_and(|date| date >= start && date <= end))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn daily(key: &str, dates: &[&str]) -> Vec<Entry> {
        dates
            .iter()
            .enumerate()
            .map(|(index, date)| Entry::new(*date).with_number(key, index as f64))
            .collect()
    }

    fn dates(selected: &[&Entry]) -> Vec<String> {
        selected.iter().map(|entry| entry.date.clone()).collect()
    }

    #[test]
    fn one_day_keeps_only_latest() {
        let entries = daily(
            "moneyBank",
            &["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04", "2024-01-05"],
        );
        let selected = select(&entries, "moneyBank", RangeWindow::Day);
        assert_eq!(dates(&selected), ["2024-01-05"]);
    }

    #[test]
    fn week_is_inclusive_of_both_ends() {
        let entries = daily("moneyBank", &["2023-12-29", "2023-12-30", "2024-01-05"]);
        let selected = select(&entries, "moneyBank", RangeWindow::Week);
        assert_eq!(dates(&selected), ["2023-12-30", "2024-01-05"]);
    }

    #[test]
    fn window_anchors_on_latest_present_value() {
        let mut entries = daily("moneyBank", &["2024-01-01", "2024-01-02"]);
        entries.push(Entry::new("2024-03-01").with_number("gym", 1.0));
        let selected = select(&entries, "moneyBank", RangeWindow::Day);
        assert_eq!(dates(&selected), ["2024-01-02"]);
    }

    #[test]
    fn all_skips_only_absent_values() {
        let mut entries = daily("teeth", &["2020-01-01", "2024-01-01"]);
        let mut blank = Entry::new("2024-01-02");
        blank.set_number("teeth", None);
        entries.push(blank);
        let selected = select(&entries, "teeth", RangeWindow::All);
        assert_eq!(dates(&selected), ["2020-01-01", "2024-01-01"]);
        assert!(select(&entries, "gym", RangeWindow::All).is_empty());
    }

    #[test]
    fn year_spans_365_days() {
        let entries = daily("moneyBank", &["2023-01-05", "2023-01-06", "2024-01-05"]);
        let selected = select(&entries, "moneyBank", RangeWindow::Year);
        // 364 days before 2024-01-05
        assert_eq!(dates(&selected), ["2023-01-06", "2024-01-05"]);
    }

    #[test]
    fn parses_and_serialises_labels() {
        assert_eq!("1y".parse::<RangeWindow>(), Ok(RangeWindow::Year));
        assert!("2W".parse::<RangeWindow>().is_err());
        assert_eq!(serde_json::to_string(&RangeWindow::All).unwrap(), "\"ALL\"");
        let parsed: RangeWindow = serde_json::from_str("\"1D\"").unwrap();
        assert_eq!(parsed, RangeWindow::Day);
    }
}
