// system-tests/tests/suites/live_catalog.rs
// ============================================================================
// Module: Live Catalog Tests
// Description: Runs each catalog suite against the configured listing service.
// Purpose: Record conformance of a real deployment suite by suite.
// Dependencies: system-tests helpers
// ============================================================================

use helpers::record::RunRecorder;
use helpers::harness::live_setup;
use helpers::harness::run_and_record;
use listing_conformance_core::Suite;
use listing_conformance_core::runtime::catalog;

use crate::helpers;

/// Runs one suite against the live service and applies the pass gate.
fn run_live_suite(suite: Suite) -> Result<(), Box<dyn std::error::Error>> {
    let mut recorder = RunRecorder::new(&format!("live_{}", suite.as_str()))?;
    let setup = live_setup()?;
    let target = setup.gateway.base_url().to_string();
    let scenarios = catalog::suite(suite);

    let report = run_and_record(&mut recorder, &setup.gateway, setup.runner, &scenarios, &target)?;

    if report.totals.failed != 0 {
        let failed = report
            .failures()
            .filter(|result| result.known_bug.is_none())
            .map(|result| result.scenario_id.to_string())
            .collect::<Vec<_>>();
        return Err(format!("{} failed against {target}: {failed:?}", suite.as_str()).into());
    }
    if setup.strict && report.totals.known_bug_failures != 0 {
        return Err(format!(
            "{} has {} tracked-defect failures in strict mode",
            suite.as_str(),
            report.totals.known_bug_failures
        )
        .into());
    }
    Ok(())
}

#[test]
fn live_item_creation_suite() -> Result<(), Box<dyn std::error::Error>> {
    run_live_suite(Suite::ItemCreation)
}

#[test]
fn live_get_item_suite() -> Result<(), Box<dyn std::error::Error>> {
    run_live_suite(Suite::GetItem)
}

#[test]
fn live_seller_items_suite() -> Result<(), Box<dyn std::error::Error>> {
    run_live_suite(Suite::SellerItems)
}

#[test]
fn live_statistics_suite() -> Result<(), Box<dyn std::error::Error>> {
    run_live_suite(Suite::Statistics)
}
