//! Inference orchestrator: validate -> scale -> classify -> resolve -> recommend.
//!
//! The monitor owns the loaded artifacts and the resolver built from the
//! classifier's declared class ordering. Construction performs the one-time
//! alignment step, so a model whose ordering cannot be matched to the
//! canonical states never serves a request. The monitor is read-only after
//! construction and safe to share behind an `Arc` across sessions.

use std::path::Path;

use crate::artifact::{ArtifactBundle, MoistureClassifier, StandardScaler};
use crate::error::{MonitorError, ValidationError};
use crate::recommend::{recommendation_for, Recommendation};
use crate::resolver::LabelResolver;
use crate::states::{MoistureState, STATE_COUNT};

/// Accepted reading range, percent, inclusive on both ends.
pub const READING_MIN: f64 = 0.0;
pub const READING_MAX: f64 = 100.0;

/// One complete prediction, ready for display.
#[derive(Debug, Clone)]
pub struct MoistureReport {
    /// Echo of the validated input.
    pub raw_percent: f64,
    /// Scaler output actually fed to the classifier.
    pub normalized: f64,
    /// Classifier output position before canonical alignment (diagnostics).
    pub raw_position: usize,
    pub state: MoistureState,
    /// Probability per canonical state, canonical order.
    pub probabilities: Option<[f64; STATE_COUNT]>,
    pub recommendation: Recommendation,
}

/// Loaded artifacts plus the alignment built from them.
#[derive(Debug)]
pub struct MoistureMonitor {
    scaler: StandardScaler,
    classifier: MoistureClassifier,
    resolver: LabelResolver,
}

impl MoistureMonitor {
    /// Build a monitor from a validated bundle, constructing the label
    /// alignment once. Fails fast on any ordering mismatch.
    pub fn from_bundle(bundle: ArtifactBundle) -> Result<Self, MonitorError> {
        let resolver = LabelResolver::from_classes(bundle.classifier.classes())?;
        Ok(Self {
            scaler: bundle.scaler,
            classifier: bundle.classifier,
            resolver,
        })
    }

    /// Load the bundle from disk and build the monitor.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MonitorError> {
        Self::from_bundle(ArtifactBundle::load(path)?)
    }

    /// Reject readings outside `[0, 100]` (and non-finite values) before
    /// they reach the scaler or the classifier.
    pub fn validate_reading(raw_percent: f64) -> Result<(), ValidationError> {
        if !raw_percent.is_finite() {
            return Err(ValidationError::NotFinite);
        }
        if !(READING_MIN..=READING_MAX).contains(&raw_percent) {
            return Err(ValidationError::OutOfRange(raw_percent));
        }
        Ok(())
    }

    /// Run one inference for a raw soil-moisture percentage.
    pub fn predict(&self, raw_percent: f64) -> Result<MoistureReport, MonitorError> {
        Self::validate_reading(raw_percent)?;

        let normalized = self.scaler.transform(raw_percent);
        let raw_position = self.classifier.predict(normalized);
        let proba = self.classifier.predict_proba(normalized);

        // The proba path keeps the displayed breakdown and the displayed
        // state consistent by construction.
        let result = self.resolver.resolve_proba(&proba)?;
        let recommendation = recommendation_for(result.state);

        Ok(MoistureReport {
            raw_percent,
            normalized,
            raw_position,
            state: result.state,
            probabilities: result.probabilities,
            recommendation,
        })
    }

    /// Declared class ordering of the loaded classifier (diagnostics).
    pub fn declared_classes(&self) -> &[String] {
        self.classifier.classes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommend::Severity;
    use approx::assert_relative_eq;

    /// Bundle matching the fitted export: mean 50 / scale 25, class ordering
    /// shuffled relative to canonical order.
    fn fitted_bundle() -> ArtifactBundle {
        let json = serde_json::json!({
            "schema_version": 1,
            "scaler": { "mean": 50.0, "scale": 25.0 },
            "classifier": {
                "classes": ["Óptimo", "Saturado", "Seco", "Muy Seco"],
                "centroids": [-0.2, 1.8, -1.0, -1.9]
            }
        });
        ArtifactBundle::from_json(&json.to_string()).unwrap()
    }

    #[test]
    fn optimal_reading_resolves_despite_shuffled_ordering() {
        let monitor = MoistureMonitor::from_bundle(fitted_bundle()).unwrap();
        let report = monitor.predict(45.0).unwrap();

        assert_relative_eq!(report.normalized, -0.2);
        assert_eq!(report.raw_position, 0); // "Óptimo" in model ordering
        assert_eq!(report.state, MoistureState::Optimal);
        assert_eq!(report.recommendation.severity, Severity::Ok);
    }

    #[test]
    fn saturated_reading_maps_to_excess() {
        let monitor = MoistureMonitor::from_bundle(fitted_bundle()).unwrap();
        let report = monitor.predict(95.0).unwrap();

        assert_eq!(report.raw_position, 1); // "Saturado" in model ordering
        assert_eq!(report.state, MoistureState::Saturated);
        assert_eq!(report.recommendation.severity, Severity::Excess);
    }

    #[test]
    fn probabilities_are_canonical_and_normalized() {
        let monitor = MoistureMonitor::from_bundle(fitted_bundle()).unwrap();
        let report = monitor.predict(45.0).unwrap();

        let probs = report.probabilities.unwrap();
        let sum: f64 = probs.iter().sum();
        assert_relative_eq!(sum, 1.0, epsilon = 1e-9);

        // Optimal carries the most mass in canonical order
        let optimal = probs[MoistureState::Optimal.canonical_index()];
        for (idx, p) in probs.iter().enumerate() {
            if idx != MoistureState::Optimal.canonical_index() {
                assert!(*p < optimal);
            }
        }
    }

    #[test]
    fn out_of_range_reading_is_rejected_before_inference() {
        let monitor = MoistureMonitor::from_bundle(fitted_bundle()).unwrap();

        let err = monitor.predict(100.1).unwrap_err();
        assert!(matches!(
            err,
            MonitorError::Validation(ValidationError::OutOfRange(_))
        ));

        let err = monitor.predict(-0.1).unwrap_err();
        assert!(matches!(
            err,
            MonitorError::Validation(ValidationError::OutOfRange(_))
        ));

        let err = monitor.predict(f64::NAN).unwrap_err();
        assert!(matches!(
            err,
            MonitorError::Validation(ValidationError::NotFinite)
        ));
    }

    #[test]
    fn range_boundaries_are_inclusive() {
        let monitor = MoistureMonitor::from_bundle(fitted_bundle()).unwrap();
        assert!(monitor.predict(0.0).is_ok());
        assert!(monitor.predict(100.0).is_ok());
    }

    #[test]
    fn misaligned_bundle_never_builds_a_monitor() {
        let json = serde_json::json!({
            "schema_version": 1,
            "scaler": { "mean": 50.0, "scale": 25.0 },
            "classifier": {
                "classes": ["Óptimo", "Saturado", "Seco", "Mojado"],
                "centroids": [-0.2, 1.8, -1.0, -1.9]
            }
        });
        let bundle = ArtifactBundle::from_json(&json.to_string()).unwrap();
        let err = MoistureMonitor::from_bundle(bundle).unwrap_err();
        assert!(matches!(err, MonitorError::LabelMismatch(_)));
    }
}
