//! Request validation.
//!
//! Checks run in a fixed order and the first failure wins, so callers
//! always see the same reason for the same bad payload. No side effects.

use crate::error::{ScaleError, ScaleResult};
use crate::request::{DeleteOption, ScaleAction, ScaleConfig, ScalingRequest, whole_number};

/// Validate a raw config and produce the typed request.
pub fn validate(config: &ScaleConfig) -> ScaleResult<ScalingRequest> {
    if config.action.is_empty() {
        return Err(ScaleError::MissingAction);
    }
    let action = ScaleAction::parse(&config.action)
        .ok_or_else(|| ScaleError::InvalidAction(config.action.clone()))?;

    let amount = whole_number(config.amount.as_ref())
        .filter(|n| *n > 0)
        .ok_or_else(|| ScaleError::InvalidAmount(raw_number(config.amount.as_ref())))?;

    if config.host_template_id.is_empty() {
        return Err(ScaleError::MissingHostTemplateId);
    }

    let min = whole_number(config.min.as_ref())
        .filter(|n| *n > 0)
        .ok_or(ScaleError::InvalidMin)?;
    let max = whole_number(config.max.as_ref())
        .filter(|n| *n > 0)
        .ok_or(ScaleError::InvalidMax)?;
    if min >= max {
        return Err(ScaleError::MinNotBelowMax);
    }

    let delete_option = match action {
        ScaleAction::Up => {
            if !config.delete_option.is_empty() {
                return Err(ScaleError::DeleteOptionOnScaleUp);
            }
            None
        }
        ScaleAction::Down => Some(
            DeleteOption::parse(&config.delete_option)
                .ok_or_else(|| ScaleError::InvalidDeleteOption(config.delete_option.clone()))?,
        ),
    };

    // All three are > 0 here, so the casts are lossless.
    Ok(ScalingRequest {
        action,
        amount: amount as u64,
        host_template_id: config.host_template_id.clone(),
        min: min as u64,
        max: max as u64,
        delete_option,
    })
}

fn raw_number(n: Option<&serde_json::Number>) -> String {
    n.map(|n| n.to_string()).unwrap_or_else(|| "missing".to_string())
}
