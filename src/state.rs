use crate::catalog;
use crate::channel::{ByteChannel, FileChannel, SaveOutcome, UploadChannel};
use crate::config::Config;
use crate::errors::TrackerError;
use crate::form;
use crate::models::{ChannelStatus, Entry, EntryForm};
use crate::range::RangeWindow;
use crate::store::EntryStore;
use crate::view::{DashboardView, build_dashboard};
use chrono::Local;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub metric: String,
    pub range: RangeWindow,
}

/// Everything the dashboard mutates: the entries, the file they came from
/// and what the chart is showing.
pub struct Tracker {
    store: EntryStore,
    channel: Option<Box<dyn ByteChannel>>,
    selection: Selection,
}

impl Tracker {
    pub fn new(selection: Selection) -> Self {
        Self {
            store: EntryStore::new(today_string()),
            channel: None,
            selection,
        }
    }

    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Acquires a persistent file handle. Nothing is read until `load`.
    pub fn connect(&mut self, path: impl Into<PathBuf>) -> ChannelStatus {
        let channel = FileChannel::new(path);
        info!(path = %channel.path().display(), "file connected");
        self.channel = Some(Box::new(channel));
        self.channel_status()
    }

    pub fn channel_status(&self) -> ChannelStatus {
        match &self.channel {
            Some(channel) => ChannelStatus {
                connected: true,
                direct_save: channel.direct_save(),
                status: channel.describe(),
            },
            None => ChannelStatus {
                connected: false,
                direct_save: false,
                status: "Not connected".to_string(),
            },
        }
    }

    /// Re-reads the connected channel and replaces the entries wholesale.
    pub async fn load(&mut self) -> Result<usize, TrackerError> {
        let channel = self.channel.as_ref().ok_or(TrackerError::NoChannelConnected)?;
        let bytes = channel.read().await?;
        self.store.load(&bytes, &today_string())?;
        Ok(self.store.len())
    }

    /// Loads a one-shot upload. On success the upload becomes the active
    /// channel, so later saves turn into downloads.
    pub fn load_upload(&mut self, name: &str, bytes: Vec<u8>) -> Result<usize, TrackerError> {
        self.store.load(&bytes, &today_string())?;
        info!(name, "upload loaded, saves will download");
        self.channel = Some(Box::new(UploadChannel::new(name, bytes)));
        Ok(self.store.len())
    }

    /// Hands the serialized entries to the active channel. Without one the
    /// document is exported as a download.
    pub async fn save(&self) -> Result<SaveOutcome, TrackerError> {
        let bytes = self.store.save()?;
        match &self.channel {
            Some(channel) => channel.write(bytes).await,
            None => {
                warn!("no file connected, exporting as download");
                Ok(SaveOutcome::Download {
                    file_name: crate::channel::DOWNLOAD_FILE_NAME.to_string(),
                    bytes,
                })
            }
        }
    }

    pub fn log_entry(&mut self, request: &EntryForm) -> Result<String, TrackerError> {
        let entry = form::entry_from_form(request, &today_string())?;
        let date = entry.date.clone();
        self.store.upsert(entry);
        info!(%date, entries = self.store.len(), "entry logged");
        Ok(date)
    }

    pub fn select(
        &mut self,
        metric: Option<String>,
        range: Option<RangeWindow>,
    ) -> Result<&Selection, TrackerError> {
        if let Some(metric) = metric {
            if catalog::find(&metric).is_none() {
                return Err(TrackerError::UnknownMetric(metric));
            }
            self.selection.metric = metric;
        }
        if let Some(range) = range {
            self.selection.range = range;
        }
        Ok(&self.selection)
    }

    pub fn dashboard(&self) -> Result<DashboardView, TrackerError> {
        self.dashboard_for(None, None)
    }

    /// Renders `metric` over `range` without touching the stored selection.
    /// Either falls back to the selection when absent.
    pub fn dashboard_for(
        &self,
        metric: Option<&str>,
        range: Option<RangeWindow>,
    ) -> Result<DashboardView, TrackerError> {
        build_dashboard(
            &self.store,
            metric.unwrap_or(&self.selection.metric),
            range.unwrap_or(self.selection.range),
        )
    }

    /// Latest entry re-dated to `date` (today when absent).
    pub fn fill_from_latest(&self, date: Option<&str>) -> Option<Entry> {
        let today = today_string();
        form::fill_from_latest(&self.store, date.unwrap_or(&today))
    }
}

#[derive(Clone)]
pub struct AppState {
    pub tracker: Arc<Mutex<Tracker>>,
}

impl AppState {
    pub fn new(tracker: Tracker) -> Self {
        Self {
            tracker: Arc::new(Mutex::new(tracker)),
        }
    }

    /// Builds the state from configuration, connecting and loading the
    /// configured data file when there is one.
    pub async fn from_config(config: &Config) -> Self {
        let mut tracker = Tracker::new(Selection {
            metric: config.default_metric.clone(),
            range: config.default_range,
        });

        if let Some(path) = &config.data_path {
            tracker.connect(path.clone());
            match tokio::fs::try_exists(path).await {
                Ok(true) => match tracker.load().await {
                    Ok(count) => info!(count, "loaded data file"),
                    Err(err) => warn!("starting empty, data file not loaded: {err}"),
                },
                Ok(false) => info!(path = %path.display(), "data file not found, starting empty"),
                Err(err) => warn!("failed to check data file: {err}"),
            }
        }

        Self::new(tracker)
    }
}

pub fn today_string() -> String {
    Local::now().date_naive().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> Tracker {
        Tracker::new(Selection {
            metric: "moneyBank".to_string(),
            range: RangeWindow::Week,
        })
    }

    fn log(tracker: &mut Tracker, date: &str, money: &str) {
        let mut request = EntryForm {
            date: Some(date.to_string()),
            ..Default::default()
        };
        request.values.insert("moneyBank".to_string(), money.to_string());
        tracker.log_entry(&request).unwrap();
    }

    #[tokio::test]
    async fn load_without_channel_fails_and_keeps_entries() {
        let mut tracker = tracker();
        log(&mut tracker, "2024-01-01", "10");
        let err = tracker.load().await.unwrap_err();
        assert!(matches!(err, TrackerError::NoChannelConnected));
        assert_eq!(tracker.store().len(), 1);
        assert!(!tracker.channel_status().connected);
    }

    #[tokio::test]
    async fn save_without_channel_downloads() {
        let mut tracker = tracker();
        log(&mut tracker, "2024-01-01", "10");
        match tracker.save().await.unwrap() {
            SaveOutcome::Download { bytes, .. } => {
                let text = String::from_utf8(bytes).unwrap();
                assert!(text.contains("\"moneyBank\": 10"));
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[tokio::test]
    async fn file_channel_saves_in_place_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");

        let mut tracker = tracker();
        let status = tracker.connect(&path);
        assert!(status.direct_save);
        log(&mut tracker, "2024-01-02", "20");
        log(&mut tracker, "2024-01-01", "10");

        let outcome = tracker.save().await.unwrap();
        assert_eq!(outcome, SaveOutcome::Written { path: path.clone() });

        let mut other = self::tracker();
        other.connect(&path);
        assert_eq!(other.load().await.unwrap(), 2);
        assert_eq!(other.store().entries(), tracker.store().entries());
    }

    #[tokio::test]
    async fn saved_file_has_no_derived_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let mut tracker = tracker();
        tracker.connect(&path);
        let mut request = EntryForm {
            date: Some("2024-01-01".to_string()),
            ..Default::default()
        };
        request.values.insert("creatine".to_string(), "1".to_string());
        tracker.log_entry(&request).unwrap();

        let view = tracker.dashboard().unwrap();
        assert_eq!(view.streaks.creatine, 1);
        tracker.save().await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(!text.contains("_streak"));
        assert!(!text.contains("_overallProgress"));
    }

    #[test]
    fn failed_upload_leaves_state_alone() {
        let mut tracker = tracker();
        log(&mut tracker, "2024-01-01", "10");
        let err = tracker.load_upload("bad.json", b"{\"entries\": 3}".to_vec()).unwrap_err();
        assert!(matches!(err, TrackerError::InvalidFormat(_)));
        assert_eq!(tracker.store().len(), 1);
        assert!(!tracker.channel_status().connected);
    }

    #[tokio::test]
    async fn upload_switches_saves_to_download() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = tracker();
        tracker.connect(dir.path().join("data.json"));

        let count = tracker
            .load_upload("phone.json", br#"{"entries":[{"date":"2024-01-01"}]}"#.to_vec())
            .unwrap();
        assert_eq!(count, 1);
        assert!(!tracker.channel_status().direct_save);
        assert!(matches!(tracker.save().await.unwrap(), SaveOutcome::Download { .. }));
    }

    #[test]
    fn select_rejects_unknown_metric() {
        let mut tracker = tracker();
        let err = tracker.select(Some("steps".to_string()), None).unwrap_err();
        assert!(matches!(err, TrackerError::UnknownMetric(_)));

        let selection = tracker.select(Some("gym".to_string()), Some(RangeWindow::All)).unwrap();
        assert_eq!(selection.metric, "gym");
        assert_eq!(selection.range, RangeWindow::All);
    }

    #[test]
    fn dashboard_for_leaves_selection_alone() {
        let mut tracker = tracker();
        log(&mut tracker, "2024-01-01", "10");

        let view = tracker.dashboard_for(Some("gym"), Some(RangeWindow::All)).unwrap();
        assert_eq!(view.metric, "gym");
        assert_eq!(tracker.selection().metric, "moneyBank");
        assert_eq!(tracker.selection().range, RangeWindow::Week);
        assert_eq!(tracker.dashboard().unwrap().metric, "moneyBank");

        let err = tracker.dashboard_for(Some("steps"), None).unwrap_err();
        assert!(matches!(err, TrackerError::UnknownMetric(_)));
    }
}
