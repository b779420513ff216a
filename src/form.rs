use crate::catalog;
use crate::errors::TrackerError;
use crate::models::{Entry, EntryForm};
use crate::stats::parse_date;
use crate::store::EntryStore;
use serde_json::Value;

/// Parses a form field. Blank or non-numeric input is treated as "not entered".
pub fn parse_num(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Builds the entry for one day from raw form strings. Every input metric is
/// written, as `null` when left blank; yes/no metrics default to "no".
pub fn entry_from_form(request: &EntryForm, today: &str) -> Result<Entry, TrackerError> {
    let raw = match request.date.as_deref().map(str::trim) {
        Some(date) if !date.is_empty() => date,
        _ => today,
    };
    // Stored zero padded so one calendar day maps to one key.
    let date = parse_date(raw).ok_or_else(|| TrackerError::InvalidDate(raw.to_string()))?;

    let mut entry = Entry::new(date.format("%Y-%m-%d").to_string());
    for metric in catalog::inputs() {
        let value = request
            .values
            .get(metric.key)
            .and_then(|raw| parse_num(raw));
        let value = if metric.is_boolean {
            Some(value.unwrap_or(0.0))
        } else {
            value
        };
        entry.set_number(metric.key, value);

        if metric.privacy_hideable {
            let hidden = request.hidden.iter().any(|key| key == metric.key);
            entry.set_number(
                &catalog::privacy_flag_key(metric.key),
                Some(if hidden { 1.0 } else { 0.0 }),
            );
        }
    }
    Ok(entry)
}

/// The latest entry re-dated to `date`, used to pre-fill the form.
pub fn fill_from_latest(store: &EntryStore, date: &str) -> Option<Entry> {
    let mut copy = store.latest()?.clone();
    copy.date = date.to_string();
    Some(copy)
}

/// Form contents for an entry: blanks for absent values, "0" for unset
/// yes/no metrics, and the privacy toggles that are on.
pub fn form_fill(entry: &Entry) -> EntryForm {
    let mut form = EntryForm {
        date: Some(entry.date.clone()),
        ..Default::default()
    };
    for metric in catalog::inputs() {
        let text = match entry.get(metric.key) {
            Some(Value::Number(number)) => number.to_string(),
            Some(Value::Bool(flag)) => (if *flag { "1" } else { "0" }).to_string(),
            Some(Value::String(text)) => text.clone(),
            _ if metric.is_boolean => "0".to_string(),
            _ => String::new(),
        };
        form.values.insert(metric.key.to_string(), text);

        let flag = catalog::privacy_flag_key(metric.key);
        if metric.privacy_hideable && entry.number(&flag).is_some_and(|value| value != 0.0) {
            form.hidden.push(metric.key.to_string());
        }
    }
    form
}
