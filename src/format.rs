use crate::catalog::{self, BAD_COLOR, GOOD_COLOR, GoodDirection, MetricDefinition, NEUTRAL_COLOR};
use crate::models::Entry;
use crate::stats::{round_half_up, round_tenth};
use serde::Serialize;

pub const PLACEHOLDER: &str = "—";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Good,
    Bad,
    Neutral,
}

impl Tone {
    pub fn color(self) -> &'static str {
        match self {
            Tone::Good => GOOD_COLOR,
            Tone::Bad => BAD_COLOR,
            Tone::Neutral => NEUTRAL_COLOR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeltaDisplay {
    pub text: String,
    pub tone: Tone,
    pub color: &'static str,
}

/// What the chart widget needs: one label, raw value and hover text per point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<Option<f64>>,
    pub display: Vec<String>,
    pub color: &'static str,
}

pub fn format_value(key: &str, value: Option<f64>) -> String {
    let Some(value) = value else {
        return PLACEHOLDER.to_string();
    };
    let metric = catalog::find(key);

    if metric.is_some_and(|metric| metric.is_boolean) {
        return if value != 0.0 { "Yes" } else { "No" }.to_string();
    }
    match metric.map(|metric| metric.unit) {
        Some("$") => format!("${}", group_thousands(round_half_up(value))),
        Some("%") => format!("{:.1}%", round_tenth(value)),
        _ => with_unit(&plain_number(round_tenth(value)), metric),
    }
}

pub fn format_delta(key: &str, delta: Option<f64>) -> DeltaDisplay {
    let Some(delta) = delta else {
        return DeltaDisplay {
            text: PLACEHOLDER.to_string(),
            tone: Tone::Neutral,
            color: Tone::Neutral.color(),
        };
    };
    let metric = catalog::find(key);
    let is_currency = metric.is_some_and(|metric| metric.unit == "$");
    let magnitude = if is_currency {
        round_half_up(delta.abs())
    } else {
        round_tenth(delta.abs())
    };
    // A change too small to show counts as no change.
    let rising = delta >= 0.0 || magnitude == 0.0;
    let sign = if rising { "+" } else { "-" };

    let text = if is_currency {
        format!("{sign}${}", group_thousands(magnitude))
    } else {
        format!("{sign}{}", with_unit(&plain_number(magnitude), metric))
    };

    let up_is_good = metric.is_some_and(|metric| metric.good_direction == GoodDirection::Up);
    let tone = if up_is_good == rising {
        Tone::Good
    } else {
        Tone::Bad
    };

    DeltaDisplay {
        text,
        tone,
        color: tone.color(),
    }
}

pub fn format_hours(hours: Option<f64>) -> String {
    match hours {
        Some(hours) => format!("{} h", plain_number(hours)),
        None => PLACEHOLDER.to_string(),
    }
}

pub fn chart_series(key: &str, entries: &[&Entry]) -> ChartSeries {
    let values: Vec<Option<f64>> = entries.iter().map(|entry| entry.number(key)).collect();
    ChartSeries {
        labels: entries.iter().map(|entry| entry.date.clone()).collect(),
        display: values.iter().map(|value| format_value(key, *value)).collect(),
        values,
        color: catalog::color(key),
    }
}

fn with_unit(number: &str, metric: Option<&MetricDefinition>) -> String {
    match metric.map(|metric| metric.unit) {
        Some(unit) if !unit.is_empty() => format!("{number} {unit}"),
        _ => number.to_string(),
    }
}

/// Shortest rendering of an already rounded number: `3`, `2.5`, never `-0`.
fn plain_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    value.to_string()
}

fn group_thousands(value: f64) -> String {
    let digits = format!("{}", value.abs() as u64);
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if value < 0.0 {
        grouped.insert(0, '-');
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_is_rounded_and_grouped() {
        assert_eq!(format_value("moneyBank", Some(1234.6)), "$1,235");
        assert_eq!(format_value("moneyBank", Some(999.4)), "$999");
        assert_eq!(format_value("moneyBank", Some(1_234_567.0)), "$1,234,567");
        assert_eq!(format_value("moneyBank", Some(-1500.0)), "$-1,500");
    }

    #[test]
    fn percentages_keep_one_decimal() {
        assert_eq!(format_value("classAvg", Some(42.34)), "42.3%");
        assert_eq!(format_value("classAvg", Some(90.0)), "90.0%");
    }

    #[test]
    fn booleans_read_yes_no() {
        assert_eq!(format_value("gym", Some(0.0)), "No");
        assert_eq!(format_value("gym", Some(1.0)), "Yes");
    }

    #[test]
    fn plain_units_and_placeholders() {
        assert_eq!(format_value("phoneHours", Some(3.04)), "3 h");
        assert_eq!(format_value("treadmillMins", Some(12.25)), "12.3 min");
        assert_eq!(format_value("jobCount", Some(2.0)), "2");
        assert_eq!(format_value("jobCount", None), "—");
        assert_eq!(format_value("unknownKey", Some(1.26)), "1.3");
    }

    #[test]
    fn delta_sign_and_tone_follow_direction() {
        let gain = format_delta("moneyBank", Some(1234.6));
        assert_eq!(gain.text, "+$1,235");
        assert_eq!(gain.tone, Tone::Good);

        let loss = format_delta("moneyBank", Some(-20.0));
        assert_eq!(loss.text, "-$20");
        assert_eq!(loss.tone, Tone::Bad);

        let less_phone = format_delta("phoneHours", Some(-1.5));
        assert_eq!(less_phone.text, "-1.5 h");
        assert_eq!(less_phone.tone, Tone::Good);
        assert_eq!(less_phone.color, GOOD_COLOR);

        let more_phone = format_delta("phoneHours", Some(0.0));
        assert_eq!(more_phone.text, "+0 h");
        assert_eq!(more_phone.tone, Tone::Bad);
    }

    #[test]
    fn delta_rounding_to_zero_reads_as_no_change() {
        let hours = format_delta("phoneHours", Some(-0.04));
        assert_eq!(hours.text, "+0 h");
        assert_eq!(hours.tone, Tone::Bad);

        let money = format_delta("moneyBank", Some(-0.4));
        assert_eq!(money.text, "+$0");
        assert_eq!(money.tone, Tone::Good);

        assert_eq!(format_delta("moneyBank", Some(-0.6)).text, "-$1");
    }

    #[test]
    fn missing_delta_is_neutral() {
        let none = format_delta("moneyBank", None);
        assert_eq!(none.text, PLACEHOLDER);
        assert_eq!(none.tone, Tone::Neutral);
    }

    #[test]
    fn hours_summary() {
        assert_eq!(format_hours(Some(12.5)), "12.5 h");
        assert_eq!(format_hours(Some(8.0)), "8 h");
        assert_eq!(format_hours(None), "—");
    }

    #[test]
    fn series_formats_every_point() {
        let first = Entry::new("2024-01-01").with_number("moneyBank", 100.0);
        let mut second = Entry::new("2024-01-02");
        second.fields.insert("moneyBank".into(), serde_json::json!("lots"));
        let series = chart_series("moneyBank", &[&first, &second]);

        assert_eq!(series.labels, ["2024-01-01", "2024-01-02"]);
        assert_eq!(series.values, [Some(100.0), None]);
        assert_eq!(series.display, ["$100", "—"]);
        assert_eq!(series.color, GOOD_COLOR);
    }
}
