use std::collections::HashMap;

use crate::core::distance::haversine_km;

/// A city's reference coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CityCoords {
    pub lat: f64,
    pub lon: f64,
}

/// Read-only city → coordinates table
///
/// Providers carry no individual coordinates, only a city name, so every
/// distance the service reports is an approximation against this table. The
/// same table drives the nearby-city expansion in the second search stage.
///
/// Keys are lowercase city names; lookup is by exact lowercased name. The
/// table is constructed once and injected wherever it is needed, so tests
/// and other deployment regions can swap in their own entries.
#[derive(Debug, Clone)]
pub struct CityGazetteer {
    cities: HashMap<String, CityCoords>,
}

impl CityGazetteer {
    /// Build a gazetteer from explicit entries
    ///
    /// City names are lowercased on the way in.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, CityCoords)>,
        S: Into<String>,
    {
        let cities = entries
            .into_iter()
            .map(|(name, coords)| (name.into().to_lowercase(), coords))
            .collect();

        Self { cities }
    }

    /// The built-in deployment table: major and mid-size Pakistani cities
    pub fn builtin() -> Self {
        Self::from_entries(BUILTIN_CITIES.iter().map(|&(name, lat, lon)| {
            (name, CityCoords { lat, lon })
        }))
    }

    /// Look up a city's coordinates by name (case-insensitive)
    pub fn coords(&self, city: &str) -> Option<CityCoords> {
        self.cities.get(city.trim().to_lowercase().as_str()).copied()
    }

    /// Approximate distance in km from an origin to a provider's city
    ///
    /// Returns `None` when the city has no entry; callers decide how unknown
    /// distances rank.
    pub fn distance_from(&self, origin_lat: f64, origin_lon: f64, city: &str) -> Option<f64> {
        self.coords(city)
            .map(|c| haversine_km(origin_lat, origin_lon, c.lat, c.lon))
    }

    /// All cities within `radius_km` of a point, excluding `own_city`
    ///
    /// `own_city` is compared by lowercased name, matching how the caller's
    /// city arrives in a search request.
    pub fn cities_within(
        &self,
        lat: f64,
        lon: f64,
        radius_km: f64,
        own_city: &str,
    ) -> Vec<String> {
        let own = own_city.to_lowercase();

        let mut nearby: Vec<String> = self
            .cities
            .iter()
            .filter(|(name, coords)| {
                **name != own && haversine_km(lat, lon, coords.lat, coords.lon) <= radius_km
            })
            .map(|(name, _)| name.clone())
            .collect();

        // HashMap iteration order is arbitrary; keep the expansion stable
        nearby.sort();
        nearby
    }

    /// Number of known cities
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}

impl Default for CityGazetteer {
    fn default() -> Self {
        Self::builtin()
    }
}

/// (name, lat, lon) reference rows for the deployment region
const BUILTIN_CITIES: &[(&str, f64, f64)] = &[
    ("karachi", 24.8607, 67.0011),
    ("lahore", 31.5204, 74.3587),
    ("islamabad", 33.6844, 73.0479),
    ("rawalpindi", 33.5651, 73.0169),
    ("faisalabad", 31.4504, 73.1350),
    ("multan", 30.1575, 71.5249),
    ("peshawar", 34.0151, 71.5249),
    ("quetta", 30.1798, 66.9750),
    ("sialkot", 32.4945, 74.5229),
    ("gujranwala", 32.1877, 74.1945),
    ("hyderabad", 25.3960, 68.3578),
    ("bahawalpur", 29.4027, 71.6838),
    ("sargodha", 32.0836, 72.6711),
    ("sukkur", 27.8583, 68.8578),
    ("larkana", 27.5590, 68.2123),
    ("sheikhupura", 31.7167, 73.9667),
    ("jhang", 31.2681, 72.3317),
    ("rahim yar khan", 28.4212, 70.2989),
    ("gujrat", 32.5742, 74.0778),
    ("kasur", 31.1156, 74.4502),
    ("mardan", 34.1958, 72.0408),
    ("mingora", 34.7797, 72.3625),
    ("nawabshah", 26.2442, 68.4103),
    ("chiniot", 31.7167, 72.9781),
    ("kamoke", 31.9742, 74.2239),
    ("sadiqabad", 28.3089, 70.1261),
    ("burewala", 30.1644, 72.6536),
    ("jacobabad", 28.2820, 68.4375),
    ("muzaffargarh", 30.0736, 71.1939),
    ("khanpur", 28.6448, 70.6850),
    ("gojra", 31.1492, 72.6856),
    ("bahawalnagar", 30.0000, 73.2500),
    ("muridke", 31.8000, 74.2667),
    ("pakpattan", 30.3394, 73.3881),
    ("abottabad", 34.1688, 73.2215),
    ("tando allahyar", 25.4608, 68.7194),
    ("jaranwala", 31.3333, 73.4167),
    ("chishtian", 29.7944, 72.8661),
    ("daska", 32.3297, 74.3500),
    ("mandi bahauddin", 32.5861, 73.4917),
    ("ahmadpur east", 29.1439, 71.2581),
    ("kamalia", 30.7267, 72.6447),
    ("khushab", 32.2969, 72.3519),
    ("wazirabad", 32.4428, 74.1194),
    ("mirpur khas", 25.5276, 69.0142),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_has_major_cities() {
        let gazetteer = CityGazetteer::builtin();

        assert!(gazetteer.coords("karachi").is_some());
        assert!(gazetteer.coords("lahore").is_some());
        assert!(gazetteer.len() >= 40);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let gazetteer = CityGazetteer::builtin();

        let lower = gazetteer.coords("karachi").unwrap();
        let mixed = gazetteer.coords("Karachi").unwrap();
        assert_eq!(lower, mixed);
    }

    #[test]
    fn test_unknown_city_has_no_coords() {
        let gazetteer = CityGazetteer::builtin();

        assert!(gazetteer.coords("atlantis").is_none());
        assert!(gazetteer.distance_from(24.86, 67.0, "atlantis").is_none());
    }

    #[test]
    fn test_cities_within_excludes_own_city() {
        let gazetteer = CityGazetteer::builtin();

        // Rawalpindi is ~14km from Islamabad center
        let nearby = gazetteer.cities_within(33.6844, 73.0479, 25.0, "Islamabad");

        assert!(nearby.contains(&"rawalpindi".to_string()));
        assert!(!nearby.contains(&"islamabad".to_string()));
    }

    #[test]
    fn test_cities_within_respects_radius() {
        let gazetteer = CityGazetteer::builtin();

        // Nothing else in the table sits within 25km of Karachi
        let nearby = gazetteer.cities_within(24.8607, 67.0011, 25.0, "karachi");
        assert!(nearby.is_empty());

        // Widen far enough and Hyderabad (~150km) shows up
        let wider = gazetteer.cities_within(24.8607, 67.0011, 200.0, "karachi");
        assert!(wider.contains(&"hyderabad".to_string()));
    }

    #[test]
    fn test_from_entries_lowercases_keys() {
        let gazetteer = CityGazetteer::from_entries(vec![
            ("Springfield", CityCoords { lat: 39.78, lon: -89.65 }),
        ]);

        assert!(gazetteer.coords("springfield").is_some());
        assert!(gazetteer.coords("SPRINGFIELD").is_some());
    }
}
