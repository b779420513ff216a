use crate::catalog::{
    OVERALL_PROGRESS, STREAK_ASHWAGANDHA, STREAK_CREATINE, STREAK_NICOTINE_SOBER, STREAK_VIT_D,
};
use crate::models::Entry;
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

pub const HOURS_WORKED: &str = "hoursWorkedToday";

#[derive(Debug, Clone, Copy)]
enum Scoring {
    Flag { good_when_true: bool },
    PhoneHours,
    TreadmillMinutes,
    TeethBrushed,
}

struct ProgressItem {
    key: &'static str,
    weight: f64,
    scoring: Scoring,
}

const fn good_when(key: &'static str, weight: f64, good_when_true: bool) -> ProgressItem {
    ProgressItem {
        key,
        weight,
        scoring: Scoring::Flag { good_when_true },
    }
}

const PROGRESS_ITEMS: [ProgressItem; 11] = [
    good_when("gym", 15.0, true),
    good_when("hwDone", 10.0, true),
    good_when("retainer", 5.0, true),
    good_when("contactsRemoved", 5.0, true),
    good_when("creatine", 5.0, true),
    good_when("ashwagandha", 5.0, true),
    good_when("vitD", 5.0, true),
    good_when("nicotineUsed", 15.0, false),
    ProgressItem {
        key: "phoneHours",
        weight: 15.0,
        scoring: Scoring::PhoneHours,
    },
    ProgressItem {
        key: "treadmillMins",
        weight: 10.0,
        scoring: Scoring::TreadmillMinutes,
    },
    ProgressItem {
        key: "teeth",
        weight: 10.0,
        scoring: Scoring::TeethBrushed,
    },
];

impl Scoring {
    /// Fraction of the item's weight earned, in `[0, 1]`.
    fn credit(self, value: f64) -> f64 {
        match self {
            Scoring::Flag { good_when_true } => {
                let good = if good_when_true { 1.0 } else { 0.0 };
                if value == good { 1.0 } else { 0.0 }
            }
            // full credit up to 2h, nothing from 8h
            Scoring::PhoneHours => (1.0 - (value - 2.0) / 6.0).clamp(0.0, 1.0),
            Scoring::TreadmillMinutes => (value / 30.0).clamp(0.0, 1.0),
            Scoring::TeethBrushed => {
                if value >= 2.0 {
                    1.0
                } else if value >= 1.0 {
                    0.5
                } else {
                    0.0
                }
            }
        }
    }
}

/// Consecutive most-recent entries whose flag equals the good value.
/// An absent value ends the streak just like a bad one.
pub fn streak(entries: &[Entry], key: &str, good_when_true: bool) -> u32 {
    let good = if good_when_true { 1.0 } else { 0.0 };
    entries
        .iter()
        .rev()
        .take_while(|entry| entry.number(key) == Some(good))
        .count() as u32
}

/// Weighted compliance score in `[0, 100]`, or `None` when the entry has
/// none of the scored fields.
pub fn progress_score(entry: &Entry) -> Option<u32> {
    let mut earned = 0.0;
    let mut total = 0.0;
    for item in &PROGRESS_ITEMS {
        let Some(value) = entry.number(item.key) else {
            continue;
        };
        earned += item.weight * item.scoring.credit(value);
        total += item.weight;
    }

    if total == 0.0 {
        return None;
    }
    Some(round_half_up(100.0 * earned / total) as u32)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Streaks {
    pub creatine: u32,
    pub ashwagandha: u32,
    pub vit_d: u32,
    pub nicotine_sober: u32,
}

pub fn current_streaks(entries: &[Entry]) -> Streaks {
    Streaks {
        creatine: streak(entries, "creatine", true),
        ashwagandha: streak(entries, "ashwagandha", true),
        vit_d: streak(entries, "vitD", true),
        nicotine_sober: streak(entries, "nicotineUsed", false),
    }
}

/// View copy of `entries` carrying the derived fields: each entry's own
/// progress score, plus today's streaks repeated on every entry. The input
/// is never modified.
pub fn annotate(entries: &[Entry]) -> Vec<Entry> {
    let streaks = current_streaks(entries);
    entries
        .iter()
        .map(|entry| {
            let mut view = entry.clone();
            if let Some(score) = progress_score(entry) {
                view.set_number(OVERALL_PROGRESS, Some(f64::from(score)));
            }
            view.set_number(STREAK_CREATINE, Some(f64::from(streaks.creatine)));
            view.set_number(STREAK_ASHWAGANDHA, Some(f64::from(streaks.ashwagandha)));
            view.set_number(STREAK_VIT_D, Some(f64::from(streaks.vit_d)));
            view.set_number(STREAK_NICOTINE_SOBER, Some(f64::from(streaks.nicotine_sober)));
            view
        })
        .collect()
}

/// Hours worked in the Monday to Sunday week holding the latest entry,
/// rounded to one decimal.
pub fn week_hours(entries: &[Entry]) -> Option<f64> {
    // An unreadable anchor date matches no week, so the sum is zero.
    let Some(latest) = parse_date(&entries.last()?.date) else {
        return Some(0.0);
    };
    let start = week_start(latest);
    let end = start + Duration::days(6);

    let sum: f64 = entries
        .iter()
        .filter(|entry| parse_date(&entry.date).is_some_and(|date| date >= start && date <= end))
        .filter_map(|entry| entry.number(HOURS_WORKED))
        .sum();
    Some(round_tenth(sum))
}

pub fn average(values: &[Option<f64>]) -> Option<f64> {
    let finite: Vec<f64> = finite_values(values).collect();
    if finite.is_empty() {
        return None;
    }
    Some(finite.iter().sum::<f64>() / finite.len() as f64)
}

/// Last finite value minus the first one.
pub fn delta(values: &[Option<f64>]) -> Option<f64> {
    let mut finite = finite_values(values);
    let first = finite.next()?;
    let last = finite.last()?;
    Some(last - first)
}

fn finite_values(values: &[Option<f64>]) -> impl Iterator<Item = f64> + '_ {
    values.iter().flatten().copied().filter(|value| value.is_finite())
}

pub fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Rounds halves towards positive infinity, matching how the dashboard has
/// always displayed numbers.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

pub fn round_tenth(value: f64) -> f64 {
    round_half_up(value * 10.0) / 10.0
}
