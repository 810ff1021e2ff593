//! Irrigation recommendation table.
//!
//! Pure lookup from canonical moisture state to a fixed advice string and
//! severity tier. One entry per state; the type invariant on `MoistureState`
//! means there is no failure mode.

use crate::states::MoistureState;

/// Severity tier for the recommendation's visual treatment, one per
/// canonical state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Urgent,
    Soon,
    Ok,
    Excess,
}

impl Severity {
    /// Wire/display tag for the tier.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Urgent => "urgent",
            Severity::Soon => "soon",
            Severity::Ok => "ok",
            Severity::Excess => "excess",
        }
    }
}

/// A canned irrigation recommendation for a moisture state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recommendation {
    pub state: MoistureState,
    pub advice: &'static str,
    pub severity: Severity,
}

/// Fixed advice table.
pub fn recommendation_for(state: MoistureState) -> Recommendation {
    let (advice, severity) = match state {
        MoistureState::VeryDry => ("Irrigate immediately", Severity::Urgent),
        MoistureState::Dry => ("Schedule watering soon", Severity::Soon),
        MoistureState::Optimal => ("Ideal condition, no watering needed", Severity::Ok),
        MoistureState::Saturated => (
            "Hold off watering; excess water risks fungal disease",
            Severity::Excess,
        ),
    };
    Recommendation { state, advice, severity }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_state_has_a_distinct_stable_recommendation() {
        let mut advice_seen = Vec::new();
        let mut severity_seen = Vec::new();

        for state in MoistureState::ALL {
            let first = recommendation_for(state);
            let second = recommendation_for(state);
            assert_eq!(first, second); // idempotent, no hidden state
            assert_eq!(first.state, state);

            assert!(!advice_seen.contains(&first.advice));
            advice_seen.push(first.advice);
            assert!(!severity_seen.contains(&first.severity));
            severity_seen.push(first.severity);
        }
    }

    #[test]
    fn severity_tags_match_wire_format() {
        assert_eq!(recommendation_for(MoistureState::VeryDry).severity.as_str(), "urgent");
        assert_eq!(recommendation_for(MoistureState::Dry).severity.as_str(), "soon");
        assert_eq!(recommendation_for(MoistureState::Optimal).severity.as_str(), "ok");
        assert_eq!(recommendation_for(MoistureState::Saturated).severity.as_str(), "excess");
    }
}
