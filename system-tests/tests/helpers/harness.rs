// system-tests/tests/helpers/harness.rs
// ============================================================================
// Module: System Test Harness
// Description: Runs catalog scenarios through a gateway and records the run.
// Purpose: Share run and gateway setup between system-test suites.
// Dependencies: listing-conformance-config, listing-conformance-core,
//               listing-conformance-gateway, system-tests
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use listing_conformance_config::HarnessConfig;
use listing_conformance_core::MemoryAuditSink;
use listing_conformance_core::RunnerConfig;
use listing_conformance_core::Scenario;
use listing_conformance_core::ScenarioRunner;
use listing_conformance_core::ServiceGateway;
use listing_conformance_core::SuiteReport;
use listing_conformance_gateway::GatewayConfig;
use listing_conformance_gateway::HttpGateway;
use system_tests::config::SystemTestConfig;

use super::record::RunRecorder;

/// Seed used for loopback runs so fixtures repeat between runs.
pub const LOOPBACK_SEED: u64 = 20_240_601;

/// Runner settings for loopback runs: seeded, with short retry backoff.
pub fn loopback_runner_config() -> RunnerConfig {
    let mut config = RunnerConfig {
        seed: Some(LOOPBACK_SEED),
        ..RunnerConfig::default()
    };
    config.read_retry.backoff = Duration::from_millis(10);
    config
}

/// Builds an HTTP gateway for a loopback base URL.
pub fn loopback_gateway(base_url: &str) -> Result<HttpGateway, String> {
    HttpGateway::new(GatewayConfig {
        base_url: base_url.to_string(),
        timeout: Duration::from_secs(5),
        ..GatewayConfig::default()
    })
    .map_err(|err| err.to_string())
}

/// Live run setup resolved from the harness config and system-test env.
pub struct LiveSetup {
    /// Gateway for the live service.
    pub gateway: HttpGateway,
    /// Runner settings for the live run.
    pub runner: RunnerConfig,
    /// Whether tracked-defect failures fail the test.
    pub strict: bool,
}

/// Resolves the live gateway from config files, env overrides, and system-test env.
pub fn live_setup() -> Result<LiveSetup, String> {
    let env = SystemTestConfig::load()?;
    let mut config = HarnessConfig::load(None).map_err(|err| err.to_string())?;
    if let Some(base_url) = env.base_url {
        config.service.base_url = base_url;
    }
    if let Some(timeout) = env.timeout {
        config.service.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
    }
    if let Some(seed) = env.seed {
        config.runner.seed = Some(seed);
    }
    config.validate().map_err(|err| err.to_string())?;
    let gateway = HttpGateway::new(config.gateway_config()).map_err(|err| err.to_string())?;
    Ok(LiveSetup {
        gateway,
        runner: config.runner_config(),
        strict: env.strict,
    })
}

/// Runs `scenarios` and records the report and audit trail under `recorder`.
pub fn run_and_record<G: ServiceGateway>(
    recorder: &mut RunRecorder,
    gateway: G,
    config: RunnerConfig,
    scenarios: &[Scenario],
    target: &str,
) -> Result<SuiteReport, Box<dyn std::error::Error>> {
    let audit = Arc::new(MemoryAuditSink::new());
    let mut runner = ScenarioRunner::new(gateway, Arc::clone(&audit), config);
    let report = runner.run_all(scenarios, target);
    recorder.record_report(&report, &audit.events())?;
    Ok(report)
}
