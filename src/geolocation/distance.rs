// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::model::Coordinates;

/// Mean Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Great-circle distance in kilometers (haversine formula).
pub fn distance_km(from: Coordinates, to: Coordinates) -> f64 {
    let lat_from = from.lat.to_radians();
    let lat_to = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lon = (to.lon - from.lon).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat_from.cos() * lat_to.cos() * (delta_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
}

/// Human readable distance: meters below one kilometer, two decimals below
/// ten kilometers, whole kilometers otherwise.
pub fn distance_text(km: f64) -> String {
    if km < 1.0 {
        format!("{} м", (km * 1000.0).trunc() as i64)
    } else if km < 10.0 {
        format!("{:.2} км", km)
    } else {
        format!("{} км", km.trunc() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_same_point() {
        let point = Coordinates::new(55.7539, 37.6208);
        assert_eq!(distance_km(point, point), 0.0);
    }

    #[test]
    fn test_distance_moscow_saint_petersburg() {
        let moscow = Coordinates::new(55.7558, 37.6173);
        let saint_petersburg = Coordinates::new(59.9343, 30.3351);
        let km = distance_km(moscow, saint_petersburg);
        assert!((630.0..640.0).contains(&km), "{}", km);
        assert_eq!(km, distance_km(saint_petersburg, moscow));
    }

    #[test]
    fn test_distance_text_units() {
        assert_eq!(distance_text(0.0), "0 м");
        assert_eq!(distance_text(0.4567), "456 м");
        assert_eq!(distance_text(1.0), "1.00 км");
        assert_eq!(distance_text(3.14159), "3.14 км");
        assert_eq!(distance_text(9.999), "10.00 км");
        assert_eq!(distance_text(10.0), "10 км");
        assert_eq!(distance_text(634.9), "634 км");
    }
}
