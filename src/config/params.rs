// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

use serde::{Deserialize, Deserializer};

use crate::settings::{
    DbSettings, FoodcartSettings, GeocoderSettings, HttpSettings, PrometheusSettings,
};

#[derive(Debug, Deserialize, Default)]
pub struct Params {
    #[serde(default)]
    foodcart: FoodcartParams,
}

impl From<Params> for FoodcartSettings {
    fn from(params: Params) -> Self {
        let params = params.foodcart;
        Self {
            db: params.db_path,
            http: HttpSettings {
                listen_address: params.http.listen_address,
                static_url: params.http.static_url,
                media_url: params.http.media_url,
            },
            geocoder: GeocoderSettings {
                api_key: params.geocoder.api_key,
                base_url: params.geocoder.base_url,
                timeout_secs: params.geocoder.timeout_secs,
            },
            prometheus: PrometheusSettings {
                enabled: params.prometheus.enabled,
                listen_address: params.prometheus.listen_address,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct FoodcartParams {
    #[serde(default = "default_db_path", deserialize_with = "deserialize_db_path")]
    db_path: DbSettings,
    #[serde(default)]
    http: HttpParams,
    #[serde(default)]
    geocoder: GeocoderParams,
    #[serde(default)]
    prometheus: PrometheusParams,
}

impl Default for FoodcartParams {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            http: HttpParams::default(),
            geocoder: GeocoderParams::default(),
            prometheus: PrometheusParams::default(),
        }
    }
}

fn deserialize_db_path<'de, D>(deserializer: D) -> Result<DbSettings, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = String::deserialize(deserializer)?;
    Ok(DbSettings::Sqlite(s))
}

fn default_db_path() -> DbSettings {
    DbSettings::Sqlite("foodcart.sqlite3".to_owned())
}

#[derive(Debug, Deserialize)]
struct HttpParams {
    #[serde(default = "default_listen_address")]
    listen_address: String,
    #[serde(default = "default_static_url")]
    static_url: String,
    #[serde(default = "default_media_url")]
    media_url: String,
}

impl Default for HttpParams {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
            static_url: default_static_url(),
            media_url: default_media_url(),
        }
    }
}

fn default_listen_address() -> String {
    "0.0.0.0:8080".to_owned()
}

fn default_static_url() -> String {
    "/static/".to_owned()
}

fn default_media_url() -> String {
    "/media/".to_owned()
}

#[derive(Debug, Deserialize)]
struct GeocoderParams {
    #[serde(default)]
    api_key: String,
    #[serde(default = "default_geocoder_url")]
    base_url: String,
    #[serde(default = "default_geocoder_timeout_secs")]
    timeout_secs: u64,
}

impl Default for GeocoderParams {
    fn default() -> Self {
        Self {
            api_key: String::default(),
            base_url: default_geocoder_url(),
            timeout_secs: default_geocoder_timeout_secs(),
        }
    }
}

fn default_geocoder_url() -> String {
    "https://geocode-maps.yandex.ru/1.x".to_owned()
}

fn default_geocoder_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Deserialize)]
struct PrometheusParams {
    #[serde(default = "default_true")]
    enabled: bool,
    #[serde(default = "default_prometheus_address")]
    listen_address: String,
}

impl Default for PrometheusParams {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            listen_address: default_prometheus_address(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_prometheus_address() -> String {
    "127.0.0.1:3000".to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = FoodcartSettings::from(Params::default());
        assert_eq!(settings.db, DbSettings::Sqlite("foodcart.sqlite3".to_owned()));
        assert_eq!(settings.http.listen_address, "0.0.0.0:8080");
        assert_eq!(settings.http.static_url, "/static/");
        assert_eq!(settings.http.media_url, "/media/");
        assert_eq!(settings.geocoder.base_url, "https://geocode-maps.yandex.ru/1.x");
        assert_eq!(settings.geocoder.timeout_secs, 10);
        assert!(settings.geocoder.api_key.is_empty());
        assert!(settings.prometheus.enabled);
        assert_eq!(settings.prometheus.listen_address, "127.0.0.1:3000");
        assert_eq!(settings, FoodcartSettings::default());
    }

    #[test]
    fn test_partial_params() {
        let params: Params = serde_json::from_str(
            r#"{"foodcart": {"db_path": ":memory:", "geocoder": {"api_key": "key"}}}"#,
        )
        .unwrap();
        let settings = FoodcartSettings::from(params);
        assert_eq!(settings.db, DbSettings::Sqlite(":memory:".to_owned()));
        assert_eq!(settings.geocoder.api_key, "key");
        assert_eq!(settings.geocoder.timeout_secs, 10);
    }
}
