//! Persisted artifact bundle: fitted scaler + fitted classifier.
//!
//! Both collaborators are exported by the training pipeline and treated as
//! opaque here: this module performs inference only, no fitting. The bundle
//! is a single JSON file loaded once per process; load is all-or-nothing and
//! any failure is fatal to session start.
//!
//! The classifier mirrors the sklearn export convention of parallel arrays:
//! `classes[i]` is the label the model internally associates with output
//! position `i`, and `centroids[i]` is that class's fitted centroid in
//! normalized feature space.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ArtifactError;

/// Bundle schema revision this build understands.
pub const SCHEMA_VERSION: u32 = 1;

/// Fitted standard scaler: `z = (x - mean) / scale`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: f64,
    pub scale: f64,
}

impl StandardScaler {
    /// Apply the fitted linear transform to a raw reading.
    pub fn transform(&self, raw: f64) -> f64 {
        (raw - self.mean) / self.scale
    }
}

/// Pre-fitted nearest-centroid classifier over the normalized reading.
///
/// `classes` is the model's internal class ordering as recorded at training
/// time (the `classes_` attribute of the exported model). It is not
/// guaranteed to match the canonical state ordering; the resolver handles
/// that alignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoistureClassifier {
    classes: Vec<String>,
    centroids: Vec<f64>,
}

impl MoistureClassifier {
    /// Build a classifier from parallel arrays (test and tooling use).
    pub fn from_arrays(classes: Vec<String>, centroids: Vec<f64>) -> Self {
        Self { classes, centroids }
    }

    /// Declared class ordering: position `i` of any output refers to
    /// `classes()[i]`.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Number of output positions.
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Predict the output position for a normalized reading: the position of
    /// the nearest centroid, ties resolved to the lower position.
    pub fn predict(&self, normalized: f64) -> usize {
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for (position, centroid) in self.centroids.iter().enumerate() {
            let dist = (normalized - centroid).abs();
            if dist < best_dist {
                best = position;
                best_dist = dist;
            }
        }
        best
    }

    /// Probability distribution over output positions: softmax of negative
    /// squared centroid distances, shifted by the maximum exponent for
    /// numeric stability. Sums to 1 within floating tolerance.
    pub fn predict_proba(&self, normalized: f64) -> Vec<f64> {
        let neg_sq: Vec<f64> = self
            .centroids
            .iter()
            .map(|c| {
                let d = normalized - c;
                -(d * d)
            })
            .collect();

        let max = neg_sq.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let exps: Vec<f64> = neg_sq.iter().map(|v| (v - max).exp()).collect();
        let sum: f64 = exps.iter().sum();

        exps.iter().map(|e| e / sum).collect()
    }
}

/// Persisted bundle holding both fitted collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactBundle {
    pub schema_version: u32,
    pub scaler: StandardScaler,
    pub classifier: MoistureClassifier,
}

impl ArtifactBundle {
    /// Load and validate the bundle from a JSON file.
    ///
    /// All-or-nothing: I/O failures, malformed JSON, and structural
    /// inconsistencies all abort with an `ArtifactError`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Parse and validate a bundle from a JSON string.
    pub fn from_json(contents: &str) -> Result<Self, ArtifactError> {
        let bundle: ArtifactBundle = serde_json::from_str(contents)?;
        bundle.validate()?;
        Ok(bundle)
    }

    fn validate(&self) -> Result<(), ArtifactError> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(ArtifactError::Invalid(format!(
                "unsupported schema version {} (expected {})",
                self.schema_version, SCHEMA_VERSION
            )));
        }
        if !self.scaler.mean.is_finite() {
            return Err(ArtifactError::Invalid("scaler mean is not finite".into()));
        }
        if !self.scaler.scale.is_finite() || self.scaler.scale <= 0.0 {
            return Err(ArtifactError::Invalid(
                "scaler scale must be finite and positive".into(),
            ));
        }
        if self.classifier.classes.is_empty() {
            // A bundle without a declared class ordering cannot be aligned;
            // retrain with an explicit label encoding instead of guessing.
            return Err(ArtifactError::Invalid(
                "classifier declares no classes".into(),
            ));
        }
        if self.classifier.centroids.len() != self.classifier.classes.len() {
            return Err(ArtifactError::Invalid(format!(
                "classifier declares {} classes but {} centroids",
                self.classifier.classes.len(),
                self.classifier.centroids.len()
            )));
        }
        if self.classifier.centroids.iter().any(|c| !c.is_finite()) {
            return Err(ArtifactError::Invalid(
                "classifier centroids must be finite".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn fitted_classifier() -> MoistureClassifier {
        MoistureClassifier::from_arrays(
            vec![
                "Óptimo".to_string(),
                "Saturado".to_string(),
                "Seco".to_string(),
                "Muy Seco".to_string(),
            ],
            vec![-0.2, 1.8, -1.0, -1.9],
        )
    }

    #[test]
    fn scaler_applies_linear_transform() {
        let scaler = StandardScaler { mean: 50.0, scale: 25.0 };
        assert_relative_eq!(scaler.transform(45.0), -0.2);
        assert_relative_eq!(scaler.transform(50.0), 0.0);
        assert_relative_eq!(scaler.transform(95.0), 1.8);
    }

    #[test]
    fn predict_picks_nearest_centroid() {
        let clf = fitted_classifier();
        assert_eq!(clf.predict(-0.2), 0); // Óptimo
        assert_eq!(clf.predict(1.8), 1); // Saturado
        assert_eq!(clf.predict(-1.05), 2); // Seco
        assert_eq!(clf.predict(-3.0), 3); // Muy Seco
    }

    #[test]
    fn predict_breaks_ties_toward_lower_position() {
        let clf = MoistureClassifier::from_arrays(
            vec!["Seco".to_string(), "Óptimo".to_string()],
            vec![-1.0, 1.0],
        );
        // Equidistant from both centroids
        assert_eq!(clf.predict(0.0), 0);
    }

    #[test]
    fn predict_proba_sums_to_one_and_peaks_at_prediction() {
        let clf = fitted_classifier();
        for x in [-2.5, -1.0, -0.2, 0.7, 1.8] {
            let proba = clf.predict_proba(x);
            assert_eq!(proba.len(), clf.n_classes());
            let sum: f64 = proba.iter().sum();
            assert_relative_eq!(sum, 1.0, epsilon = 1e-9);

            let argmax = proba
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
                .map(|(i, _)| i)
                .unwrap();
            assert_eq!(argmax, clf.predict(x));
        }
    }

    #[test]
    fn bundle_round_trips_through_json() {
        let json = serde_json::json!({
            "schema_version": 1,
            "scaler": { "mean": 50.0, "scale": 25.0 },
            "classifier": {
                "classes": ["Óptimo", "Saturado", "Seco", "Muy Seco"],
                "centroids": [-0.2, 1.8, -1.0, -1.9]
            }
        });
        let bundle = ArtifactBundle::from_json(&json.to_string()).unwrap();
        assert_eq!(bundle.classifier.n_classes(), 4);
        assert_relative_eq!(bundle.scaler.transform(45.0), -0.2);
    }

    #[test]
    fn malformed_json_fails_parse() {
        let err = ArtifactBundle::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ArtifactError::Parse(_)));
    }

    #[test]
    fn missing_fields_fail_parse() {
        let err = ArtifactBundle::from_json(r#"{"schema_version": 1}"#).unwrap_err();
        assert!(matches!(err, ArtifactError::Parse(_)));
    }

    #[test]
    fn zero_scale_fails_validation() {
        let json = serde_json::json!({
            "schema_version": 1,
            "scaler": { "mean": 50.0, "scale": 0.0 },
            "classifier": { "classes": ["Seco"], "centroids": [0.0] }
        });
        let err = ArtifactBundle::from_json(&json.to_string()).unwrap_err();
        assert!(matches!(err, ArtifactError::Invalid(_)));
    }

    #[test]
    fn centroid_count_mismatch_fails_validation() {
        let json = serde_json::json!({
            "schema_version": 1,
            "scaler": { "mean": 50.0, "scale": 25.0 },
            "classifier": { "classes": ["Seco", "Óptimo"], "centroids": [0.0] }
        });
        let err = ArtifactBundle::from_json(&json.to_string()).unwrap_err();
        assert!(matches!(err, ArtifactError::Invalid(_)));
    }

    #[test]
    fn empty_class_ordering_fails_validation() {
        let json = serde_json::json!({
            "schema_version": 1,
            "scaler": { "mean": 50.0, "scale": 25.0 },
            "classifier": { "classes": [], "centroids": [] }
        });
        let err = ArtifactBundle::from_json(&json.to_string()).unwrap_err();
        assert!(matches!(err, ArtifactError::Invalid(_)));
    }

    #[test]
    fn unsupported_schema_version_fails_validation() {
        let json = serde_json::json!({
            "schema_version": 2,
            "scaler": { "mean": 50.0, "scale": 25.0 },
            "classifier": { "classes": ["Seco"], "centroids": [0.0] }
        });
        let err = ArtifactBundle::from_json(&json.to_string()).unwrap_err();
        assert!(matches!(err, ArtifactError::Invalid(_)));
    }

    #[test]
    fn load_reads_bundle_from_disk() {
        let path = std::env::temp_dir().join(format!(
            "moisture_bundle_test_{}.json",
            std::process::id()
        ));
        let json = serde_json::json!({
            "schema_version": 1,
            "scaler": { "mean": 50.0, "scale": 25.0 },
            "classifier": {
                "classes": ["Óptimo", "Saturado", "Seco", "Muy Seco"],
                "centroids": [-0.2, 1.8, -1.0, -1.9]
            }
        });
        std::fs::write(&path, json.to_string()).unwrap();

        let bundle = ArtifactBundle::load(&path).unwrap();
        assert_eq!(bundle.schema_version, SCHEMA_VERSION);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn load_missing_file_fails_with_io_error() {
        let err = ArtifactBundle::load("/nonexistent/moisture_bundle.json").unwrap_err();
        assert!(matches!(err, ArtifactError::Io { .. }));
    }
}
