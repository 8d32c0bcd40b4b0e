// SPDX-License-Identifier: Apache-2.0

//! Strategy settings parsed from the flat parameter map given to `setup`.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::JoinError;

/// Flat, string-keyed parameter map handed to `JoinImplementation::setup`.
pub type JoinParams = HashMap<String, serde_json::Value>;

/// Rows per build-side partition when nothing else is configured.
pub const DEFAULT_BLOCK_SIZE: usize = 100_000;

/// Parameter key for the build-side partition size.
pub const BLOCK_SIZE_KEY: &str = "block_size";

/// Environment variable overriding [`DEFAULT_BLOCK_SIZE`].
pub const BLOCK_SIZE_ENV: &str = "FEDJOIN_BLOCK_SIZE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct JoinSettings {
    /// Rows per build-side partition (must be > 0)
    pub block_size: usize,
}

impl Default for JoinSettings {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

impl JoinSettings {
    /// Defaults, with `FEDJOIN_BLOCK_SIZE` applied when it holds a positive integer.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        if let Ok(raw) = std::env::var(BLOCK_SIZE_ENV) {
            match parse_block_size(&serde_json::Value::String(raw.clone())) {
                Ok(block_size) => settings.block_size = block_size,
                Err(e) => warn!("Ignoring {}={:?}: {}", BLOCK_SIZE_ENV, raw, e),
            }
        }
        settings
    }

    /// Builds settings from a `setup` parameter map on top of [`JoinSettings::from_env`].
    ///
    /// `block_size` accepts a JSON integer or a numeric string. Unknown keys
    /// are ignored.
    pub fn from_params(params: &JoinParams) -> Result<Self, JoinError> {
        let mut settings = Self::from_env();
        for (key, value) in params {
            match key.as_str() {
                BLOCK_SIZE_KEY => {
                    settings.block_size = parse_block_size(value)
                        .map_err(|msg| JoinError::configuration(BLOCK_SIZE_KEY, msg))?;
                }
                other => debug!("Ignoring unknown join setting '{}'", other),
            }
        }
        Ok(settings)
    }
}

fn parse_block_size(value: &serde_json::Value) -> Result<usize, String> {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    match parsed {
        Some(n) if n > 0 => usize::try_from(n).map_err(|_| format!("{n} is too large")),
        _ => Err(format!("must be a positive integer, got {value}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(pairs: &[(&str, serde_json::Value)]) -> JoinParams {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn empty_params_use_default_block_size() {
        let settings = JoinSettings::from_params(&JoinParams::new()).unwrap();
        // The env override is not set under test.
        assert!(settings.block_size > 0);
    }

    #[test]
    fn block_size_accepts_numbers_and_numeric_strings() {
        let settings = JoinSettings::from_params(&params(&[(BLOCK_SIZE_KEY, json!(250))])).unwrap();
        assert_eq!(settings.block_size, 250);

        let settings =
            JoinSettings::from_params(&params(&[(BLOCK_SIZE_KEY, json!(" 42 "))])).unwrap();
        assert_eq!(settings.block_size, 42);
    }

    #[test]
    fn non_positive_block_size_is_rejected() {
        for bad in [json!(0), json!(-5), json!("abc"), json!(1.5), json!(null)] {
            let err = JoinSettings::from_params(&params(&[(BLOCK_SIZE_KEY, bad)])).unwrap_err();
            assert!(
                matches!(err, JoinError::Configuration { ref key, .. } if key == BLOCK_SIZE_KEY),
                "unexpected error: {err:?}"
            );
        }
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let settings =
            JoinSettings::from_params(&params(&[("parallelism", json!(8))])).unwrap();
        assert!(settings.block_size > 0);
    }

    #[test]
    fn deserialized_settings_fill_defaults() {
        let settings: JoinSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, JoinSettings::default());
    }
}
