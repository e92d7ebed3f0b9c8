// Configuration loading

pub mod settings;

pub use settings::{ExportFormat, ExportSettings, LoggingSettings, Settings, StorageSettings};
