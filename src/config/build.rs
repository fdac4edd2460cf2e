// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::{error::FoodcartError, settings::FoodcartSettings};
use config::{Config, Environment, File};

use super::params::Params;

/// Environment variable prefix, e.g. `FOODCART__GEOCODER__API_KEY`.
const ENV_PREFIX: &str = "FOODCART";
const ENV_SEPARATOR: &str = "__";

/// Build the node settings.
///
/// # Arguments
///
/// * `env` - Read `FOODCART__*` environment variables, overriding the file
/// * `file` - Configuration file (json, yaml or toml), empty for none
///
/// # Errors
///
/// * `FoodcartError::Config` - unreadable file or invalid values
///
pub fn build_config(env: bool, file: &str) -> Result<FoodcartSettings, FoodcartError> {
    let mut config = Config::builder();

    // file configuration (json, yaml or toml)
    if !file.is_empty() {
        config = config.add_source(File::with_name(file));
    }

    // Env configuration
    if env {
        config = config.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator(ENV_SEPARATOR)
                .separator(ENV_SEPARATOR)
                .keep_prefix(true)
                .try_parsing(true),
        );
    }

    let config = config
        .build()
        .map_err(|e| FoodcartError::Config(format!("Error building config: {}", e)))?;

    let params: Params = config
        .try_deserialize()
        .map_err(|e| FoodcartError::Config(format!("Error try deserialize config: {}", e)))?;

    Ok(FoodcartSettings::from(params))
}
