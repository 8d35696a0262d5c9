// crates/listing-conformance-cli/src/selection.rs
// ============================================================================
// Module: Scenario Selection
// Description: Resolves suite and scenario filters against the catalog.
// Purpose: Turn CLI filters into an ordered, de-duplicated scenario list.
// Dependencies: listing-conformance-core, thiserror
// ============================================================================

//! ## Overview
//! With no filters every catalog scenario is selected. Otherwise the selection
//! is the union of the named suites and the named scenarios, in catalog order.
//! Unknown scenario ids fail closed rather than being skipped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use listing_conformance_core::Scenario;
use listing_conformance_core::Suite;
use listing_conformance_core::runtime::catalog;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Scenario selection failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// A scenario id is not in the catalog.
    #[error("unknown scenario: {0}")]
    UnknownScenario(String),
}

// ============================================================================
// SECTION: Selection
// ============================================================================

/// Selects catalog scenarios matching `suites` or `scenario_ids`.
///
/// # Errors
///
/// Returns [`SelectionError::UnknownScenario`] when an id is not in the catalog.
pub fn select_scenarios(
    suites: &[Suite],
    scenario_ids: &[String],
) -> Result<Vec<Scenario>, SelectionError> {
    let all = catalog::scenarios();
    if let Some(unknown) =
        scenario_ids.iter().find(|id| !all.iter().any(|scenario| scenario.id.as_str() == id.as_str()))
    {
        return Err(SelectionError::UnknownScenario(unknown.clone()));
    }
    if suites.is_empty() && scenario_ids.is_empty() {
        return Ok(all);
    }
    Ok(all
        .into_iter()
        .filter(|scenario| {
            suites.contains(&scenario.suite)
                || scenario_ids.iter().any(|id| id.as_str() == scenario.id.as_str())
        })
        .collect())
}
