// system-tests/src/config/env.rs
// ============================================================================
// Module: System Test Environment
// Description: Environment-backed configuration for system tests.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Environment values are parsed with strict UTF-8 enforcement to avoid silent
//! misconfiguration. Invalid UTF-8 fails closed. Values are resolved through a
//! lookup function so unit tests never mutate the process environment.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Environment keys for system test configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemTestEnv {
    /// Optional run root override.
    RunRoot,
    /// Optional base URL of the live listing service.
    BaseUrl,
    /// Optional timeout override in seconds (positive integer).
    TimeoutSeconds,
    /// Optional fixture seed for live runs.
    Seed,
    /// Treat tracked-defect failures as test failures (`true`/`false` or `1`/`0`).
    Strict,
}

impl SystemTestEnv {
    /// Every key, in documentation order.
    pub const ALL: [Self; 5] =
        [Self::RunRoot, Self::BaseUrl, Self::TimeoutSeconds, Self::Seed, Self::Strict];

    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RunRoot => "LISTING_CONFORMANCE_SYSTEM_TEST_RUN_ROOT",
            Self::BaseUrl => "LISTING_CONFORMANCE_SYSTEM_TEST_BASE_URL",
            Self::TimeoutSeconds => "LISTING_CONFORMANCE_SYSTEM_TEST_TIMEOUT_SEC",
            Self::Seed => "LISTING_CONFORMANCE_SYSTEM_TEST_SEED",
            Self::Strict => "LISTING_CONFORMANCE_SYSTEM_TEST_STRICT",
        }
    }
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Typed system test configuration derived from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SystemTestConfig {
    /// Optional run root override.
    pub run_root: Option<PathBuf>,
    /// Optional live service base URL override.
    pub base_url: Option<String>,
    /// Optional timeout override in seconds (positive integer).
    pub timeout: Option<Duration>,
    /// Optional fixture seed.
    pub seed: Option<u64>,
    /// Fail live suites on tracked-defect failures too.
    pub strict: bool,
}

impl SystemTestConfig {
    /// Loads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when an environment value is not valid UTF-8, is empty,
    /// or fails validation (for example, an invalid timeout or boolean value).
    pub fn load() -> Result<Self, String> {
        Self::load_with(process_env)
    }

    /// Loads configuration resolving variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error when a value is not valid UTF-8, is empty, or fails
    /// validation.
    pub fn load_with<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let read = |key: SystemTestEnv| read_env_nonempty(key.as_str(), lookup(key.as_str()));
        let run_root = read(SystemTestEnv::RunRoot)?.map(PathBuf::from);
        let base_url = read(SystemTestEnv::BaseUrl)?;
        let timeout = read(SystemTestEnv::TimeoutSeconds)?
            .map(|value| parse_timeout_seconds(SystemTestEnv::TimeoutSeconds.as_str(), &value))
            .transpose()?;
        let seed = read(SystemTestEnv::Seed)?
            .map(|value| parse_seed(SystemTestEnv::Seed.as_str(), &value))
            .transpose()?;
        let strict = parse_bool_env(SystemTestEnv::Strict.as_str(), read(SystemTestEnv::Strict)?)?;
        Ok(Self {
            run_root,
            base_url,
            timeout,
            seed,
            strict,
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads a variable from the process environment.
fn process_env(name: &str) -> Option<OsString> {
    std::env::var_os(name)
}

/// Decodes a raw environment value as UTF-8.
fn decode_strict(name: &str, raw: Option<OsString>) -> Result<Option<String>, String> {
    raw.map_or(Ok(None), |raw| {
        raw.into_string().map(Some).map_err(|_| format!("{name} must be valid UTF-8"))
    })
}

/// Decodes a raw environment value and rejects empty values.
fn read_env_nonempty(name: &str, raw: Option<OsString>) -> Result<Option<String>, String> {
    match decode_strict(name, raw)? {
        Some(value) if value.trim().is_empty() => Err(format!("{name} must not be empty")),
        Some(value) => Ok(Some(value)),
        None => Ok(None),
    }
}

/// Parses a positive timeout value from an environment variable string.
///
/// # Errors
///
/// Returns an error when the value is missing, non-numeric, or zero.
fn parse_timeout_seconds(name: &str, raw: &str) -> Result<Duration, String> {
    let trimmed = raw.trim();
    let secs: u64 = trimmed
        .parse()
        .map_err(|_| format!("{name} must be a positive integer number of seconds"))?;
    if secs == 0 {
        return Err(format!("{name} must be greater than zero"));
    }
    Ok(Duration::from_secs(secs))
}

/// Parses an unsigned fixture seed.
fn parse_seed(name: &str, raw: &str) -> Result<u64, String> {
    raw.trim().parse().map_err(|_| format!("{name} must be an unsigned integer"))
}

/// Parses a boolean environment variable, defaulting to `false` when unset.
///
/// # Errors
///
/// Returns an error when the value is not a recognized boolean literal.
fn parse_bool_env(name: &str, raw: Option<String>) -> Result<bool, String> {
    let Some(value) = raw else {
        return Ok(false);
    };
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("true") || trimmed == "1" {
        return Ok(true);
    }
    if trimmed.eq_ignore_ascii_case("false") || trimmed == "0" {
        return Ok(false);
    }
    Err(format!("{name} must be 1, 0, true, or false"))
}
