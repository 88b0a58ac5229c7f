// Local validation run before any remote call is attempted.

use crate::models::Visibility;
use fleet_common::constants::MAX_NAME_LENGTH;
use fleet_common::{FleetError, Result};

/// Validate a runner name.
///
/// The name must be non-empty, at most 64 characters, and contain only
/// alphanumeric characters, hyphens, underscores, and periods.
pub fn validate_runner_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(FleetError::validation("runner name cannot be empty"));
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(FleetError::validation(format!(
            "runner name must be at most {} characters (got {})",
            MAX_NAME_LENGTH,
            name.chars().count()
        )));
    }

    let is_valid = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.');

    if !is_valid {
        return Err(FleetError::validation(format!(
            "runner name '{name}' contains invalid characters. \
             Only alphanumeric characters, hyphens, underscores, and periods are allowed."
        )));
    }

    Ok(())
}

/// Validate one label list. `kind` names the list in error messages.
///
/// The list must be non-empty and pass `validate_label_values`.
pub fn validate_labels(kind: &str, labels: &[String]) -> Result<()> {
    if labels.is_empty() {
        return Err(FleetError::validation(format!(
            "at least one {kind} label is required"
        )));
    }

    validate_label_values(kind, labels)
}

/// Validate the labels of a list that may be empty: every label non-blank
/// and at most 64 characters.
pub fn validate_label_values(kind: &str, labels: &[String]) -> Result<()> {
    for label in labels {
        if label.trim().is_empty() {
            return Err(FleetError::validation(format!(
                "{kind} label list contains an empty label"
            )));
        }
        if label.chars().count() > MAX_NAME_LENGTH {
            return Err(FleetError::validation(format!(
                "{kind} label '{label}' exceeds the maximum length of {MAX_NAME_LENGTH} characters"
            )));
        }
    }

    Ok(())
}

/// Check the visibility / selected-repository pairing.
///
/// `all` admits no selected repositories and `selected` needs at least one.
pub fn validate_group_visibility(visibility: Visibility, selected_repository_ids: &[u64]) -> Result<()> {
    match visibility {
        Visibility::All if !selected_repository_ids.is_empty() => Err(FleetError::validation(
            "selected_repository_ids cannot be set when visibility is 'all'",
        )),
        Visibility::Selected if selected_repository_ids.is_empty() => Err(FleetError::validation(
            "selected_repository_ids cannot be empty when visibility is 'selected'",
        )),
        _ => Ok(()),
    }
}

/// Validate a runner group name.
pub fn validate_group_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(FleetError::validation("runner group name cannot be empty"));
    }
    Ok(())
}
