//! Label Resolver: aligns the classifier's internal class ordering to the
//! canonical state set.
//!
//! A trained model records its own class ordering at fit time, and that
//! ordering changes across retrains. Earlier revisions of this tool patched
//! the drift with hand-maintained permutation arrays, which broke silently
//! every time the model was re-exported. The resolver replaces those arrays
//! with a permutation built once at load time by matching each declared
//! class against a canonical state's training label, by name. Construction
//! fails fast if the declared ordering is not a bijection onto the canonical
//! set; a resolver that constructed successfully can never misalign.

use rustc_hash::FxHashMap;

use crate::error::LabelMismatchError;
use crate::states::{MoistureState, STATE_COUNT};

/// Outcome of one inference, expressed in canonical terms.
///
/// Created fresh per prediction and discarded after display. When present,
/// `probabilities` is indexed by canonical state order.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    pub state: MoistureState,
    pub probabilities: Option<[f64; STATE_COUNT]>,
}

/// Fixed permutation from classifier output position to canonical state
/// index, built once at artifact-load time.
#[derive(Debug, Clone)]
pub struct LabelResolver {
    to_canonical: [usize; STATE_COUNT],
}

impl LabelResolver {
    /// Build the permutation from the classifier's declared class ordering.
    ///
    /// Each declared class is matched against the canonical states'
    /// training labels after trimming surrounding whitespace (the original
    /// training pipeline emitted labels with stray leading spaces). Fails
    /// with the precise mismatch if the declared ordering has the wrong
    /// cardinality, an unknown label, or a duplicate.
    pub fn from_classes(classes: &[String]) -> Result<Self, LabelMismatchError> {
        if classes.len() != STATE_COUNT {
            return Err(LabelMismatchError::CardinalityMismatch {
                expected: STATE_COUNT,
                found: classes.len(),
            });
        }

        let by_training_label: FxHashMap<&str, usize> = MoistureState::ALL
            .iter()
            .map(|s| (s.training_label(), s.canonical_index()))
            .collect();

        let mut to_canonical = [0usize; STATE_COUNT];
        let mut seen = [false; STATE_COUNT];

        for (position, label) in classes.iter().enumerate() {
            let canonical = *by_training_label
                .get(label.trim())
                .ok_or_else(|| LabelMismatchError::UnknownLabel(label.clone()))?;
            if seen[canonical] {
                return Err(LabelMismatchError::DuplicateLabel(label.clone()));
            }
            seen[canonical] = true;
            to_canonical[position] = canonical;
        }

        Ok(Self { to_canonical })
    }

    /// Resolve a single predicted output position to its canonical state.
    pub fn resolve_position(&self, position: usize) -> Result<MoistureState, LabelMismatchError> {
        let canonical = self
            .to_canonical
            .get(position)
            .copied()
            .ok_or(LabelMismatchError::UndeclaredPosition(position))?;
        Ok(MoistureState::ALL[canonical])
    }

    /// Re-index a probability vector (aligned to the classifier's declared
    /// ordering) into canonical order and pick the predicted state.
    ///
    /// The state is the argmax over the canonically ordered distribution;
    /// ties break toward the lower canonical index.
    pub fn resolve_proba(&self, proba: &[f64]) -> Result<PredictionResult, LabelMismatchError> {
        if proba.len() != STATE_COUNT {
            return Err(LabelMismatchError::CardinalityMismatch {
                expected: STATE_COUNT,
                found: proba.len(),
            });
        }

        let mut canonical = [0.0f64; STATE_COUNT];
        for (position, p) in proba.iter().enumerate() {
            canonical[self.to_canonical[position]] = *p;
        }

        let mut best = 0;
        for idx in 1..STATE_COUNT {
            if canonical[idx] > canonical[best] {
                best = idx;
            }
        }

        Ok(PredictionResult {
            state: MoistureState::ALL[best],
            probabilities: Some(canonical),
        })
    }
}
