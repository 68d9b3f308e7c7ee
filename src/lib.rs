// Fairness Audit - Core Library
// Data preparation, model training and disparate-impact metrics for the CLI and web server

pub mod config;
pub mod error;
pub mod dataset;
pub mod prepare;
pub mod features;
pub mod split;
pub mod scaler;
pub mod model;
pub mod metrics;
pub mod audit;

#[cfg(feature = "server")]
pub mod web;

// Re-export commonly used types
pub use config::{AuditConfig, ModelConfig};
pub use error::{AuditError, Result};
pub use dataset::{auditable_columns, CensusRecord, Frame, COLUMN_NAMES};
pub use prepare::{clean_raw, prepare_from_reader, write_clean, PrepareSummary};
pub use features::{encode, FeatureMatrix};
pub use split::{stratified_split, Split};
pub use scaler::StandardScaler;
pub use model::LogisticRegression;
pub use metrics::{accuracy, disparate_impact, is_fair, positive_rate, DEFAULT_FAIRNESS_THRESHOLD};
pub use audit::{audit_frame, audit_model, AuditReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// `RUST_LOG` fallback for both binaries
pub const DEFAULT_LOG_FILTER: &str = "fairness_audit=info,fairness_server=info,tower_http=info";

/// Install the global tracing subscriber
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
