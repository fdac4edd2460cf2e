// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Geocoder client.
//!
//! Resolves postal addresses into coordinates through the Yandex geocoder
//! HTTP API.
//!

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::{error::FoodcartError, model::Coordinates, settings::GeocoderSettings};

/// Address to coordinates resolution.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve an address.
    ///
    /// # Returns
    ///
    /// * `Ok(None)` - the geocoder knows no place for the address
    ///
    /// # Errors
    ///
    /// * `FoodcartError::Geocoder` - request failed or the answer is malformed
    ///
    async fn fetch_coordinates(&self, address: &str) -> Result<Option<Coordinates>, FoodcartError>;
}

/// Yandex geocoder HTTP client.
#[derive(Debug, Clone)]
pub struct YandexGeocoder {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl YandexGeocoder {
    /// Build a new geocoder client.
    ///
    /// # Errors
    ///
    /// * `FoodcartError::Config` - invalid base url or HTTP client settings
    ///
    pub fn new(settings: &GeocoderSettings) -> Result<Self, FoodcartError> {
        let base_url = Url::parse(&settings.base_url).map_err(|error| {
            FoodcartError::Config(format!(
                "Cannot parse '{}' as URL: {}",
                settings.base_url, error
            ))
        })?;
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|error| FoodcartError::Config(format!("HTTP client error: {}", error)))?;
        Ok(Self {
            client,
            base_url,
            api_key: settings.api_key.clone(),
        })
    }
}

#[async_trait]
impl Geocoder for YandexGeocoder {
    async fn fetch_coordinates(&self, address: &str) -> Result<Option<Coordinates>, FoodcartError> {
        let response = self
            .client
            .get(self.base_url.clone())
            .query(&[
                ("geocode", address),
                ("apikey", self.api_key.as_str()),
                ("format", "json"),
            ])
            .send()
            .await?
            .error_for_status()?;
        let body: GeocoderResponse = response.json().await?;
        body.most_relevant()
    }
}

#[derive(Deserialize, Debug)]
struct GeocoderResponse {
    response: ResponseBody,
}

#[derive(Deserialize, Debug)]
struct ResponseBody {
    #[serde(rename = "GeoObjectCollection")]
    collection: GeoObjectCollection,
}

#[derive(Deserialize, Debug)]
struct GeoObjectCollection {
    #[serde(rename = "featureMember")]
    feature_member: Vec<FeatureMember>,
}

#[derive(Deserialize, Debug)]
struct FeatureMember {
    #[serde(rename = "GeoObject")]
    geo_object: GeoObject,
}

#[derive(Deserialize, Debug)]
struct GeoObject {
    #[serde(rename = "Point")]
    point: Point,
}

#[derive(Deserialize, Debug)]
struct Point {
    /// `"<lon> <lat>"`.
    pos: String,
}

impl GeocoderResponse {
    /// Coordinates of the first found place.
    fn most_relevant(&self) -> Result<Option<Coordinates>, FoodcartError> {
        let Some(member) = self.response.collection.feature_member.first() else {
            return Ok(None);
        };
        parse_pos(&member.geo_object.point.pos).map(Some)
    }
}

fn parse_pos(pos: &str) -> Result<Coordinates, FoodcartError> {
    let malformed = || FoodcartError::Geocoder(format!("malformed position '{}'", pos));
    let mut parts = pos.split_whitespace();
    let (Some(lon), Some(lat), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(malformed());
    };
    let lon: f64 = lon.parse().map_err(|_| malformed())?;
    let lat: f64 = lat.parse().map_err(|_| malformed())?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(malformed());
    }
    Ok(Coordinates::new(lat, lon))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use std::{collections::HashMap, sync::Mutex};

    use httpmock::Method::GET;
    use httpmock::MockServer;
    use serde_json::json;

    /// In-memory geocoder counting its calls.
    #[derive(Default)]
    pub(crate) struct FakeGeocoder {
        pub places: HashMap<String, Coordinates>,
        pub failing: Vec<String>,
        pub calls: Mutex<Vec<String>>,
    }

    impl FakeGeocoder {
        pub fn with_places(places: &[(&str, Coordinates)]) -> Self {
            Self {
                places: places
                    .iter()
                    .map(|(address, coordinates)| (address.to_string(), *coordinates))
                    .collect(),
                ..Default::default()
            }
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Geocoder for FakeGeocoder {
        async fn fetch_coordinates(
            &self,
            address: &str,
        ) -> Result<Option<Coordinates>, FoodcartError> {
            self.calls.lock().unwrap().push(address.to_owned());
            if self.failing.iter().any(|failing| failing == address) {
                return Err(FoodcartError::Geocoder("unavailable".to_owned()));
            }
            Ok(self.places.get(address).copied())
        }
    }

    fn geocoder(server: &MockServer) -> YandexGeocoder {
        YandexGeocoder::new(&GeocoderSettings {
            api_key: "secret".to_owned(),
            base_url: server.url("/1.x"),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_well_formed_request_and_first_place() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/1.x")
                    .query_param("geocode", "Moscow, Red Square 1")
                    .query_param("apikey", "secret")
                    .query_param("format", "json");
                then.status(200).json_body(json!({
                    "response": {
                        "GeoObjectCollection": {
                            "featureMember": [
                                {"GeoObject": {"Point": {"pos": "37.620795 55.753930"}}},
                                {"GeoObject": {"Point": {"pos": "30.0 60.0"}}}
                            ]
                        }
                    }
                }));
            })
            .await;

        let coordinates = geocoder(&server)
            .fetch_coordinates("Moscow, Red Square 1")
            .await
            .unwrap();

        assert_eq!(coordinates, Some(Coordinates::new(55.753930, 37.620795)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_nothing_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/1.x");
                then.status(200).json_body(json!({
                    "response": {"GeoObjectCollection": {"featureMember": []}}
                }));
            })
            .await;

        let coordinates = geocoder(&server).fetch_coordinates("Nowhere").await.unwrap();
        assert_eq!(coordinates, None);
    }

    #[tokio::test]
    async fn test_error_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(403);
            })
            .await;

        let result = geocoder(&server).fetch_coordinates("Moscow").await;
        assert!(matches!(result, Err(FoodcartError::Geocoder(_))));
    }

    #[test]
    fn test_parse_pos() {
        assert_eq!(
            parse_pos("37.6 55.7").unwrap(),
            Coordinates::new(55.7, 37.6)
        );
        assert!(parse_pos("37.6").is_err());
        assert!(parse_pos("a b").is_err());
        assert!(parse_pos("1 2 3").is_err());
        assert!(parse_pos("nan nan").is_err());
        assert!(parse_pos("37.6 inf").is_err());
        assert!(parse_pos("200 55.7").is_err());
    }

    #[test]
    fn test_invalid_base_url() {
        let result = YandexGeocoder::new(&GeocoderSettings {
            api_key: String::new(),
            base_url: "not a url".to_owned(),
            timeout_secs: 1,
        });
        assert!(matches!(result, Err(FoodcartError::Config(_))));
    }
}
