//! Soil Moisture Monitor
//!
//! Loads a persisted scaler + classifier bundle once at startup, classifies
//! soil moisture readings, and aligns the classifier's internal class
//! ordering to the canonical application ordering by label name before
//! producing an irrigation recommendation.
//!
//! Module structure:
//! - `states`: canonical moisture state set (fixed ordering, labels)
//! - `artifact`: persisted scaler/classifier bundle (inference only)
//! - `resolver`: label alignment between model ordering and canonical ordering
//! - `recommend`: state -> irrigation advice table
//! - `monitor`: validate -> scale -> classify -> resolve pipeline

pub mod artifact;
pub mod error;
pub mod monitor;
pub mod recommend;
pub mod resolver;
pub mod states;

#[cfg(feature = "api")]
pub mod api_server;

#[cfg(feature = "api")]
pub mod web;

// Re-export commonly used types
pub use artifact::{ArtifactBundle, MoistureClassifier, StandardScaler};
pub use error::{ArtifactError, LabelMismatchError, MonitorError, ValidationError};
pub use monitor::{MoistureMonitor, MoistureReport};
pub use recommend::{recommendation_for, Recommendation, Severity};
pub use resolver::{LabelResolver, PredictionResult};
pub use states::{MoistureState, STATE_COUNT};

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};
