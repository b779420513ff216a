use serde::Serialize;

pub const GOOD_COLOR: &str = "#3ddc97";
pub const BAD_COLOR: &str = "#ff5c7a";
pub const NEUTRAL_COLOR: &str = "#e8eef7";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GoodDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricDefinition {
    pub key: &'static str,
    pub label: &'static str,
    pub unit: &'static str,
    pub good_direction: GoodDirection,
    pub is_boolean: bool,
    pub privacy_hideable: bool,
    /// Computed from other fields on every render, never entered or stored.
    pub derived: bool,
}

const fn metric(
    key: &'static str,
    label: &'static str,
    unit: &'static str,
    good_direction: GoodDirection,
) -> MetricDefinition {
    MetricDefinition {
        key,
        label,
        unit,
        good_direction,
        is_boolean: false,
        privacy_hideable: false,
        derived: false,
    }
}

const fn flag(key: &'static str, label: &'static str, good_direction: GoodDirection) -> MetricDefinition {
    MetricDefinition {
        is_boolean: true,
        ..metric(key, label, "", good_direction)
    }
}

const fn derived(key: &'static str, label: &'static str, unit: &'static str) -> MetricDefinition {
    MetricDefinition {
        derived: true,
        ..metric(key, label, unit, GoodDirection::Up)
    }
}

pub const OVERALL_PROGRESS: &str = "_overallProgress";
pub const STREAK_CREATINE: &str = "_streakCreatine";
pub const STREAK_ASHWAGANDHA: &str = "_streakAshwagandha";
pub const STREAK_VIT_D: &str = "_streakVitD";
pub const STREAK_NICOTINE_SOBER: &str = "_streakNicotineSober";

pub const DERIVED_KEYS: [&str; 5] = [
    OVERALL_PROGRESS,
    STREAK_CREATINE,
    STREAK_ASHWAGANDHA,
    STREAK_VIT_D,
    STREAK_NICOTINE_SOBER,
];

static METRICS: [MetricDefinition; 23] = [
    metric("phoneHours", "Hours on phone", "h", GoodDirection::Down),
    metric("moneyBank", "Money in bank", "$", GoodDirection::Up),
    flag("gym", "Gym today", GoodDirection::Up),
    metric("gymSessions", "Gym sessions (total)", "", GoodDirection::Up),
    MetricDefinition {
        privacy_hideable: true,
        ..metric("daysSinceMast", "Days since masturbation", "d", GoodDirection::Up)
    },
    metric("hoursWorkedToday", "Hours worked today", "h", GoodDirection::Up),
    metric("jobCount", "Job count", "", GoodDirection::Up),
    metric("freelanceCompletions", "Freelance completions (total)", "", GoodDirection::Up),
    metric("treadmillMins", "Time on treadmill", "min", GoodDirection::Up),
    flag("hwDone", "HW completed", GoodDirection::Up),
    metric("classAvg", "Overall class average", "%", GoodDirection::Up),
    metric("teeth", "Teeth brushed (times)", "x", GoodDirection::Up),
    flag("retainer", "Retainer worn", GoodDirection::Up),
    flag("contactsRemoved", "Contacts removed", GoodDirection::Up),
    flag("creatine", "Creatine taken", GoodDirection::Up),
    flag("ashwagandha", "Ashwagandha taken", GoodDirection::Up),
    flag("vitD", "Vitamin D taken", GoodDirection::Up),
    flag("nicotineUsed", "Nicotine used", GoodDirection::Down),
    derived(OVERALL_PROGRESS, "Overall progress", "%"),
    derived(STREAK_CREATINE, "Creatine streak", "d"),
    derived(STREAK_ASHWAGANDHA, "Ashwagandha streak", "d"),
    derived(STREAK_VIT_D, "Vitamin D streak", "d"),
    derived(STREAK_NICOTINE_SOBER, "Nicotine-free streak", "d"),
];

pub fn all() -> &'static [MetricDefinition] {
    &METRICS
}

/// Metrics the user types in; derived ones are excluded.
pub fn inputs() -> impl Iterator<Item = &'static MetricDefinition> {
    METRICS.iter().filter(|metric| !metric.derived)
}

pub fn find(key: &str) -> Option<&'static MetricDefinition> {
    METRICS.iter().find(|metric| metric.key == key)
}

pub fn is_derived_key(key: &str) -> bool {
    DERIVED_KEYS.contains(&key)
}

/// Chart color for a metric. Unknown keys fall back to the "bad" color.
pub fn color(key: &str) -> &'static str {
    match find(key).map(|metric| metric.good_direction) {
        Some(GoodDirection::Up) => GOOD_COLOR,
        _ => BAD_COLOR,
    }
}

/// Entry field holding the privacy toggle of a hideable metric,
/// e.g. `daysSinceMast` -> `_hideDaysSinceMast`.
pub fn privacy_flag_key(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => format!("_hide{}{}", first.to_ascii_uppercase(), chars.as_str()),
        None => "_hide".to_string(),
    }
}
