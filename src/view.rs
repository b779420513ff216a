use crate::catalog;
use crate::errors::TrackerError;
use crate::format::{self, ChartSeries, DeltaDisplay};
use crate::range::{self, RangeWindow};
use crate::stats::{self, Streaks};
use crate::store::EntryStore;
use serde::Serialize;

/// Everything one render of the dashboard shows for the selected metric.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub metric: String,
    pub label: String,
    pub unit: String,
    pub range: RangeWindow,
    pub series: ChartSeries,
    pub average: Option<f64>,
    pub average_display: String,
    pub delta: Option<f64>,
    pub delta_display: DeltaDisplay,
    pub week_hours: Option<f64>,
    pub week_hours_display: String,
    /// Progress score of the latest entry.
    pub progress: Option<u32>,
    pub streaks: Streaks,
    pub entry_count: usize,
}

pub fn build_dashboard(
    store: &EntryStore,
    metric_key: &str,
    window: RangeWindow,
) -> Result<DashboardView, TrackerError> {
    let metric = catalog::find(metric_key)
        .ok_or_else(|| TrackerError::UnknownMetric(metric_key.to_string()))?;

    // derived fields only ever live on this copy
    let annotated = stats::annotate(store.entries());
    let selected = range::select(&annotated, metric.key, window);
    let series = format::chart_series(metric.key, &selected);

    let average = stats::average(&series.values);
    let delta = stats::delta(&series.values);
    let week_hours = stats::week_hours(store.entries());

    Ok(DashboardView {
        metric: metric.key.to_string(),
        label: metric.label.to_string(),
        unit: metric.unit.to_string(),
        range: window,
        average,
        average_display: format::format_value(metric.key, average),
        delta,
        delta_display: format::format_delta(metric.key, delta),
        week_hours,
        week_hours_display: format::format_hours(week_hours),
        progress: store.latest().and_then(stats::progress_score),
        streaks: stats::current_streaks(store.entries()),
        entry_count: store.len(),
        series,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Tone;
    use crate::models::Entry;

    fn store() -> EntryStore {
        let mut store = EntryStore::new("2024-01-01");
        let days = [
            ("2024-01-01", 1000.0, 1.0),
            ("2024-01-02", 1100.0, 1.0),
            ("2024-01-03", 900.0, 0.0),
            ("2024-01-04", 1500.0, 1.0),
        ];
        for (date, money, creatine) in days {
            store.upsert(
                Entry::new(date)
                    .with_number("moneyBank", money)
                    .with_number("creatine", creatine)
                    .with_number("hoursWorkedToday", 2.0),
            );
        }
        store
    }

    #[test]
    fn dashboard_summarises_selected_window() {
        let view = build_dashboard(&store(), "moneyBank", RangeWindow::Week).unwrap();

        assert_eq!(view.series.labels.len(), 4);
        assert_eq!(view.average, Some(1125.0));
        assert_eq!(view.average_display, "$1,125");
        assert_eq!(view.delta, Some(500.0));
        assert_eq!(view.delta_display.text, "+$500");
        assert_eq!(view.delta_display.tone, Tone::Good);
        // 2024-01-01 is a Monday, all four days share a week
        assert_eq!(view.week_hours_display, "8 h");
        assert_eq!(view.streaks.creatine, 1);
        assert_eq!(view.progress, Some(100));
        assert_eq!(view.entry_count, 4);
    }

    #[test]
    fn single_day_window_has_no_delta() {
        let view = build_dashboard(&store(), "moneyBank", RangeWindow::Day).unwrap();
        assert_eq!(view.series.labels, ["2024-01-04"]);
        assert_eq!(view.delta, None);
        assert_eq!(view.delta_display.text, "—");
    }

    #[test]
    fn derived_metrics_can_be_charted() {
        let store = store();
        let view = build_dashboard(&store, catalog::STREAK_CREATINE, RangeWindow::All).unwrap();
        assert_eq!(view.series.values, [Some(1.0); 4]);
        assert_eq!(view.series.display[0], "1 d");

        let view = build_dashboard(&store, catalog::OVERALL_PROGRESS, RangeWindow::All).unwrap();
        assert_eq!(view.series.values, [Some(100.0), Some(100.0), Some(0.0), Some(100.0)]);
        assert!(store.entries().iter().all(|entry| !entry.is_present(catalog::OVERALL_PROGRESS)));
    }

    #[test]
    fn empty_store_renders_placeholders() {
        let view = build_dashboard(&EntryStore::new("2024-01-01"), "phoneHours", RangeWindow::All)
            .unwrap();
        assert!(view.series.labels.is_empty());
        assert_eq!(view.average_display, "—");
        assert_eq!(view.week_hours_display, "—");
        assert_eq!(view.progress, None);
    }

    #[test]
    fn unknown_metric_is_rejected() {
        let err = build_dashboard(&store(), "steps", RangeWindow::All).unwrap_err();
        assert!(matches!(err, TrackerError::UnknownMetric(_)));
    }
}
