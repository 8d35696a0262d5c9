// crates/listing-conformance-config/src/config.rs
// ============================================================================
// Module: Listing Conformance Configuration
// Description: Configuration loading and validation for the harness.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: listing-conformance-core, listing-conformance-gateway, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with size and path limits, then
//! environment overrides are applied through an injectable lookup. Every
//! section has defaults, so an absent default file yields the default config;
//! an explicitly named file that cannot be read is an error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use listing_conformance_core::FileAuditSink;
use listing_conformance_core::HarnessAuditSink;
use listing_conformance_core::NoopAuditSink;
use listing_conformance_core::RetryPolicy;
use listing_conformance_core::RunnerConfig;
use listing_conformance_core::StderrAuditSink;
use listing_conformance_gateway::DEFAULT_BASE_URL;
use listing_conformance_gateway::GatewayConfig;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "listing-conformance.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "LISTING_CONFORMANCE_CONFIG";
/// Environment variable overriding `service.base_url`.
pub const BASE_URL_ENV_VAR: &str = "LISTING_CONFORMANCE_BASE_URL";
/// Environment variable overriding `service.timeout_ms`, in whole seconds.
pub const TIMEOUT_ENV_VAR: &str = "LISTING_CONFORMANCE_TIMEOUT_SEC";
/// Environment variable overriding `runner.seed`.
pub const SEED_ENV_VAR: &str = "LISTING_CONFORMANCE_SEED";
/// Maximum configuration file size in bytes.
const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum environment override length.
const MAX_ENV_VALUE_LENGTH: usize = 4096;
/// Minimum request timeout in milliseconds.
const MIN_TIMEOUT_MS: u64 = 100;
/// Maximum request timeout in milliseconds.
const MAX_TIMEOUT_MS: u64 = 120_000;
/// Maximum accepted response size in bytes.
const MAX_RESPONSE_BYTES: usize = 64 * 1024 * 1024;
/// Maximum user agent length.
const MAX_USER_AGENT_LENGTH: usize = 256;
/// Maximum read retry attempts.
const MAX_RETRY_ATTEMPTS: u32 = 20;
/// Maximum read retry backoff in milliseconds.
const MAX_RETRY_BACKOFF_MS: u64 = 10_000;
/// Maximum response-time budget in milliseconds.
const MAX_TIME_BUDGET_MS: u64 = 120_000;
/// Maximum back-to-back reads per scenario.
const MAX_REPEATED_READS: usize = 50;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Harness configuration loaded from `listing-conformance.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HarnessConfig {
    /// Target service settings.
    #[serde(default)]
    pub service: ServiceConfig,
    /// Scenario runner settings.
    #[serde(default)]
    pub runner: RunnerSettings,
    /// Audit sink settings.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Report output settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Target service settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Service base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Maximum response body size in bytes.
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: usize,
    /// User agent for outbound requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            max_response_bytes: default_max_response_bytes(),
            user_agent: default_user_agent(),
        }
    }
}

impl ServiceConfig {
    /// Validates service settings.
    fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigError::Invalid("service.base_url must be non-empty".to_string()));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid(
                "service.base_url must use http or https".to_string(),
            ));
        }
        if !(MIN_TIMEOUT_MS ..= MAX_TIMEOUT_MS).contains(&self.timeout_ms) {
            return Err(ConfigError::Invalid(format!(
                "service.timeout_ms must be between {MIN_TIMEOUT_MS} and {MAX_TIMEOUT_MS}"
            )));
        }
        if self.max_response_bytes == 0 || self.max_response_bytes > MAX_RESPONSE_BYTES {
            return Err(ConfigError::Invalid(format!(
                "service.max_response_bytes must be between 1 and {MAX_RESPONSE_BYTES}"
            )));
        }
        let user_agent = self.user_agent.trim();
        if user_agent.is_empty() || user_agent.len() > MAX_USER_AGENT_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "service.user_agent must be 1..={MAX_USER_AGENT_LENGTH} bytes"
            )));
        }
        Ok(())
    }
}

/// Scenario runner settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RunnerSettings {
    /// Total read-after-create attempts.
    #[serde(default = "default_read_retry_attempts")]
    pub read_retry_attempts: u32,
    /// Backoff unit between read attempts, in milliseconds.
    #[serde(default = "default_read_retry_backoff_ms")]
    pub read_retry_backoff_ms: u64,
    /// Soft response-time budget, in milliseconds.
    #[serde(default = "default_response_time_budget_ms")]
    pub response_time_budget_ms: u64,
    /// Soft response-time budget for seller listings, in milliseconds.
    #[serde(default = "default_listing_time_budget_ms")]
    pub listing_time_budget_ms: u64,
    /// Fixture seed for reproducible runs.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Back-to-back reads in repeated-read scenarios.
    #[serde(default = "default_repeated_reads")]
    pub repeated_reads: usize,
    /// Deletes created items after each scenario.
    #[serde(default = "default_teardown")]
    pub teardown: bool,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            read_retry_attempts: default_read_retry_attempts(),
            read_retry_backoff_ms: default_read_retry_backoff_ms(),
            response_time_budget_ms: default_response_time_budget_ms(),
            listing_time_budget_ms: default_listing_time_budget_ms(),
            seed: None,
            repeated_reads: default_repeated_reads(),
            teardown: default_teardown(),
        }
    }
}

impl RunnerSettings {
    /// Validates runner settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(1 ..= MAX_RETRY_ATTEMPTS).contains(&self.read_retry_attempts) {
            return Err(ConfigError::Invalid(format!(
                "runner.read_retry_attempts must be between 1 and {MAX_RETRY_ATTEMPTS}"
            )));
        }
        if self.read_retry_backoff_ms > MAX_RETRY_BACKOFF_MS {
            return Err(ConfigError::Invalid(format!(
                "runner.read_retry_backoff_ms must be at most {MAX_RETRY_BACKOFF_MS}"
            )));
        }
        for (field, value) in [
            ("runner.response_time_budget_ms", self.response_time_budget_ms),
            ("runner.listing_time_budget_ms", self.listing_time_budget_ms),
        ] {
            if value == 0 || value > MAX_TIME_BUDGET_MS {
                return Err(ConfigError::Invalid(format!(
                    "{field} must be between 1 and {MAX_TIME_BUDGET_MS}"
                )));
            }
        }
        if !(1 ..= MAX_REPEATED_READS).contains(&self.repeated_reads) {
            return Err(ConfigError::Invalid(format!(
                "runner.repeated_reads must be between 1 and {MAX_REPEATED_READS}"
            )));
        }
        Ok(())
    }
}

/// Audit sink selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// JSON lines on stderr.
    Stderr,
    /// JSON lines appended to `audit.path`.
    File,
    /// Audit disabled.
    #[default]
    None,
}

/// Audit sink settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Sink selection.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Audit log path for the file sink.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl AuditConfig {
    /// Validates audit settings.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.path is required for the file sink".to_string()))
            }
            (_, Some(path)) => validate_path_limits("audit.path", path),
            (_, None) => Ok(()),
        }
    }

    /// Opens the configured audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the audit file cannot be opened.
    pub fn open_sink(&self) -> Result<Box<dyn HarnessAuditSink>, ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkKind::Stderr, _) => Ok(Box::new(StderrAuditSink)),
            (AuditSinkKind::File, Some(path)) => {
                let sink = FileAuditSink::new(path)
                    .map_err(|err| ConfigError::Io(format!("{}: {err}", path.display())))?;
                Ok(Box::new(sink))
            }
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.path is required for the file sink".to_string()))
            }
            (AuditSinkKind::None, _) => Ok(Box::new(NoopAuditSink)),
        }
    }
}

/// Report output settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    /// Directory for `report.json` and `report.md`.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl ReportConfig {
    /// Validates report settings.
    fn validate(&self) -> Result<(), ConfigError> {
        self.output_dir
            .as_deref()
            .map_or(Ok(()), |dir| validate_path_limits("report.output_dir", dir))
    }
}

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Loading
// ============================================================================

impl HarnessConfig {
    /// Loads configuration using the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading, overrides or validation fail.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, process_env)
    }

    /// Loads configuration resolving environment values through `lookup`.
    ///
    /// Resolution order for the file: `path`, then [`CONFIG_ENV_VAR`], then
    /// [`DEFAULT_CONFIG_NAME`] in the working directory. Only the last may be
    /// absent, in which case defaults are used.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading, overrides or validation fail.
    pub fn load_with_env<F>(path: Option<&Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let (resolved, explicit) = resolve_path(path, &lookup)?;
        validate_path_limits("config path", &resolved)?;
        let mut config = match fs::read(&resolved) {
            Ok(bytes) => Self::from_bytes(&bytes)?,
            Err(err) if err.kind() == io::ErrorKind::NotFound && !explicit => Self::default(),
            Err(err) => {
                return Err(ConfigError::Io(format!("{}: {err}", resolved.display())));
            }
        };
        config.apply_env_overrides(&lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses configuration from TOML bytes without validating it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the input is oversized, not UTF-8 or not TOML.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Applies `LISTING_CONFORMANCE_*` overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when an override is empty, not UTF-8 or
    /// does not parse.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        if let Some(base_url) = env_value(&lookup, BASE_URL_ENV_VAR)? {
            self.service.base_url = base_url;
        }
        if let Some(raw) = env_value(&lookup, TIMEOUT_ENV_VAR)? {
            let seconds = raw.parse::<u64>().map_err(|_| {
                ConfigError::Invalid(format!("{TIMEOUT_ENV_VAR} must be whole seconds"))
            })?;
            self.service.timeout_ms = seconds.checked_mul(1000).ok_or_else(|| {
                ConfigError::Invalid(format!("{TIMEOUT_ENV_VAR} is out of range"))
            })?;
        }
        if let Some(raw) = env_value(&lookup, SEED_ENV_VAR)? {
            let seed = raw.parse::<u64>().map_err(|_| {
                ConfigError::Invalid(format!("{SEED_ENV_VAR} must be an unsigned integer"))
            })?;
            self.runner.seed = Some(seed);
        }
        Ok(())
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.service.validate()?;
        self.runner.validate()?;
        self.audit.validate()?;
        self.report.validate()?;
        Ok(())
    }

    /// Returns the gateway settings for this configuration.
    #[must_use]
    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            base_url: self.service.base_url.trim().to_string(),
            timeout: Duration::from_millis(self.service.timeout_ms),
            max_response_bytes: self.service.max_response_bytes,
            user_agent: self.service.user_agent.trim().to_string(),
        }
    }

    /// Returns the runner settings for this configuration.
    #[must_use]
    pub const fn runner_config(&self) -> RunnerConfig {
        RunnerConfig {
            read_retry: RetryPolicy {
                attempts: self.runner.read_retry_attempts,
                backoff: Duration::from_millis(self.runner.read_retry_backoff_ms),
            },
            response_time_budget: Duration::from_millis(self.runner.response_time_budget_ms),
            listing_time_budget: Duration::from_millis(self.runner.listing_time_budget_ms),
            repeated_reads: self.runner.repeated_reads,
            teardown: self.runner.teardown,
            seed: self.runner.seed,
        }
    }
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default service base URL.
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Default request timeout.
const fn default_timeout_ms() -> u64 {
    10_000
}

/// Default response size limit.
const fn default_max_response_bytes() -> usize {
    1024 * 1024
}

/// Default user agent.
fn default_user_agent() -> String {
    GatewayConfig::default().user_agent
}

/// Default read attempts.
const fn default_read_retry_attempts() -> u32 {
    3
}

/// Default read backoff.
const fn default_read_retry_backoff_ms() -> u64 {
    200
}

/// Default response-time budget.
const fn default_response_time_budget_ms() -> u64 {
    2_000
}

/// Default listing response-time budget.
const fn default_listing_time_budget_ms() -> u64 {
    3_000
}

/// Default repeated reads.
const fn default_repeated_reads() -> usize {
    3
}

/// Teardown is on unless disabled.
const fn default_teardown() -> bool {
    true
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads a variable from the process environment.
fn process_env(key: &str) -> Option<OsString> {
    env::var_os(key)
}

/// Resolves the config path; the flag reports whether it was named explicitly.
fn resolve_path<F>(path: Option<&Path>, lookup: &F) -> Result<(PathBuf, bool), ConfigError>
where
    F: Fn(&str) -> Option<OsString>,
{
    if let Some(path) = path {
        return Ok((path.to_path_buf(), true));
    }
    if let Some(env_path) = env_value(lookup, CONFIG_ENV_VAR)? {
        return Ok((PathBuf::from(env_path), true));
    }
    Ok((PathBuf::from(DEFAULT_CONFIG_NAME), false))
}

/// Reads a strict UTF-8, non-empty environment value.
fn env_value<F>(lookup: &F, key: &str) -> Result<Option<String>, ConfigError>
where
    F: Fn(&str) -> Option<OsString>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let value =
        raw.into_string().map_err(|_| ConfigError::Invalid(format!("{key} must be utf-8")))?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{key} must be non-empty")));
    }
    if trimmed.len() > MAX_ENV_VALUE_LENGTH {
        return Err(ConfigError::Invalid(format!("{key} exceeds max length")));
    }
    Ok(Some(trimmed.to_string()))
}

/// Validates a path against length limits.
fn validate_path_limits(field: &str, path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} component too long")));
        }
    }
    Ok(())
}
