//! Static pricing table mapping image model identifiers to token costs.
//!
//! Consulted by reservation and by generation-request creation. The cost is
//! snapshotted onto the generation row at creation time, so later changes
//! to this table never affect already-created requests.

use crate::error::CoreError;

/// Known models and their token cost per generation.
pub const MODEL_COSTS: &[(&str, i32)] = &[
    ("flux-schnell", 1),
    ("flux-dev", 3),
    ("sdxl-turbo", 1),
    ("sdxl", 2),
];

/// Look up the token cost for a model identifier.
pub fn cost_for_model(model: &str) -> Option<i32> {
    MODEL_COSTS
        .iter()
        .find(|(name, _)| *name == model)
        .map(|(_, cost)| *cost)
}

/// Like [`cost_for_model`] but rejects unknown identifiers, so callers can
/// fail before any state mutation.
pub fn require_cost(model: &str) -> Result<i32, CoreError> {
    cost_for_model(model).ok_or_else(|| CoreError::UnsupportedModel(model.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_models_have_positive_cost() {
        for (model, _) in MODEL_COSTS {
            assert!(cost_for_model(model).unwrap() > 0);
        }
    }

    #[test]
    fn cheapest_and_priciest() {
        assert_eq!(cost_for_model("flux-schnell"), Some(1));
        assert_eq!(cost_for_model("flux-dev"), Some(3));
    }

    #[test]
    fn unknown_model_is_none() {
        assert_eq!(cost_for_model("dall-e-2"), None);
    }

    #[test]
    fn require_cost_rejects_unknown() {
        let err = require_cost("midjourney").unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedModel(m) if m == "midjourney"));
    }
}
