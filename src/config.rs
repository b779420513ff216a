use crate::catalog;
use crate::range::RangeWindow;
use std::{env, path::PathBuf};
use tracing::warn;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_METRIC: &str = "moneyBank";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// File connected at startup, if any.
    pub data_path: Option<PathBuf>,
    pub default_metric: String,
    pub default_range: RangeWindow,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_path: None,
            default_metric: DEFAULT_METRIC.to_string(),
            default_range: RangeWindow::Week,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Invalid values are logged and replaced by their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(port) = lookup("PORT") {
            match port.parse::<u16>() {
                Ok(port) => config.port = port,
                Err(_) => warn!("ignoring invalid PORT '{port}'"),
            }
        }

        config.data_path = lookup("APP_DATA_PATH")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        if let Some(metric) = lookup("ASCEND_DEFAULT_METRIC") {
            if catalog::find(&metric).is_some() {
                config.default_metric = metric;
            } else {
                warn!("ignoring unknown ASCEND_DEFAULT_METRIC '{metric}'");
            }
        }

        if let Some(range) = lookup("ASCEND_DEFAULT_RANGE") {
            match range.parse::<RangeWindow>() {
                Ok(range) => config.default_range = range,
                Err(err) => warn!("ignoring ASCEND_DEFAULT_RANGE: {err}"),
            }
        }

        config
    }
}
