pub mod app;
pub mod catalog;
pub mod channel;
pub mod config;
pub mod errors;
pub mod form;
pub mod format;
pub mod handlers;
pub mod models;
pub mod range;
pub mod state;
pub mod stats;
pub mod store;
pub mod ui;
pub mod view;

pub use app::router;
pub use config::Config;
pub use state::{AppState, Tracker};
pub use store::EntryStore;
