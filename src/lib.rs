pub mod api;
pub mod config;
pub mod error;
pub mod labels;
pub mod models;
pub mod service;

pub use crate::config::AppConfig;
pub use crate::error::{ReconcileError, Result, ValidationError};
pub use labels::LabelManifest;
pub use service::{reconcile, BatchProcessor, ExhaustedLinePolicy, Reconciler};
