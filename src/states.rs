//! Canonical moisture state set.
//!
//! The application-facing ordering is fixed and stable across runs:
//! `VeryDry < Dry < Optimal < Saturated`. A trained classifier may declare
//! its classes in any order; the resolver maps model output positions back
//! onto this set by training label, never by numeric position.

/// Number of canonical states. Classifier artifacts must declare exactly
/// this many classes.
pub const STATE_COUNT: usize = 4;

/// Soil moisture category, declared in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MoistureState {
    VeryDry,
    Dry,
    Optimal,
    Saturated,
}

impl MoistureState {
    /// All states in canonical order.
    pub const ALL: [MoistureState; STATE_COUNT] = [
        MoistureState::VeryDry,
        MoistureState::Dry,
        MoistureState::Optimal,
        MoistureState::Saturated,
    ];

    /// Position in the canonical ordering.
    pub fn canonical_index(self) -> usize {
        self as usize
    }

    /// Inverse of `canonical_index`.
    pub fn from_canonical_index(index: usize) -> Option<MoistureState> {
        Self::ALL.get(index).copied()
    }

    /// Human-facing display label.
    pub fn display_label(self) -> &'static str {
        match self {
            MoistureState::VeryDry => "Very Dry",
            MoistureState::Dry => "Dry",
            MoistureState::Optimal => "Optimal",
            MoistureState::Saturated => "Saturated",
        }
    }

    /// Label the classifier was fitted with (Spanish, from the original
    /// sensor training pipeline). This is the identity used for alignment.
    pub fn training_label(self) -> &'static str {
        match self {
            MoistureState::VeryDry => "Muy Seco",
            MoistureState::Dry => "Seco",
            MoistureState::Optimal => "Óptimo",
            MoistureState::Saturated => "Saturado",
        }
    }
}
