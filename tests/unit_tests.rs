// Unit tests for medmatch

use medmatch::core::{
    distance::{haversine_km, haversine_miles, round_tenth},
    gazetteer::CityGazetteer,
    specialty::{SpecialtyIndex, GENERAL_PHYSICIAN},
};
use medmatch::models::{ConditionReport, Confidence};

fn condition(name: &str) -> ConditionReport {
    ConditionReport {
        name: name.to_string(),
        confidence: Confidence::Medium,
    }
}

#[test]
fn test_haversine_identity() {
    let distance = haversine_km(24.8607, 67.0011, 24.8607, 67.0011);
    assert!(distance < 0.001);
}

#[test]
fn test_haversine_symmetry() {
    let cities = [
        (24.8607, 67.0011), // Karachi
        (31.5204, 74.3587), // Lahore
        (33.6844, 73.0479), // Islamabad
        (30.1798, 66.9750), // Quetta
    ];

    for &(lat1, lon1) in &cities {
        for &(lat2, lon2) in &cities {
            let forward = haversine_km(lat1, lon1, lat2, lon2);
            let backward = haversine_km(lat2, lon2, lat1, lon1);
            assert!(
                (forward - backward).abs() < 1e-9,
                "Symmetry violated for ({},{}) -> ({},{})",
                lat1, lon1, lat2, lon2
            );
        }
    }
}

#[test]
fn test_haversine_karachi_lahore_reference() {
    // Known reference distance, ~1030km
    let distance = haversine_km(24.8607, 67.0011, 31.5204, 74.3587);
    assert!(
        distance > 1000.0 && distance < 1100.0,
        "Expected ~1033km, got {}",
        distance
    );
}

#[test]
fn test_haversine_always_non_negative() {
    let distance = haversine_km(-33.8688, 151.2093, 40.7128, -74.0060);
    assert!(distance > 0.0);
    assert!(distance.is_finite());
}

#[test]
fn test_miles_variant_consistent_with_km() {
    let km = haversine_km(24.8607, 67.0011, 25.3960, 68.3578);
    let miles = haversine_miles(24.8607, 67.0011, 25.3960, 68.3578);
    assert!((km / miles - 1.609).abs() < 0.01);
}

#[test]
fn test_round_tenth_presentation() {
    assert_eq!(round_tenth(148.2499), 148.2);
    assert_eq!(round_tenth(148.25), 148.3);
}

#[test]
fn test_gazetteer_known_and_unknown_cities() {
    let gazetteer = CityGazetteer::builtin();

    let karachi = gazetteer.coords("Karachi").unwrap();
    assert!((karachi.lat - 24.8607).abs() < 0.001);
    assert!((karachi.lon - 67.0011).abs() < 0.001);

    assert!(gazetteer.coords("gotham").is_none());
}

#[test]
fn test_gazetteer_nearby_expansion() {
    let gazetteer = CityGazetteer::builtin();

    // Rawalpindi sits well inside 25km of Islamabad center
    let nearby = gazetteer.cities_within(33.6844, 73.0479, 25.0, "islamabad");
    assert_eq!(nearby, vec!["rawalpindi".to_string()]);
}

#[test]
fn test_specialty_fallback_always_present_and_last() {
    let index = SpecialtyIndex::builtin();

    let inputs: Vec<Vec<ConditionReport>> = vec![
        vec![],
        vec![condition("diabetes")],
        vec![condition("no such ailment")],
        vec![condition("flu"), condition("chest pain"), condition("acne")],
    ];

    for conditions in inputs {
        let specialties = index.resolve(&conditions);
        assert_eq!(
            specialties.last().map(String::as_str),
            Some(GENERAL_PHYSICIAN),
            "Fallback missing or misplaced for {:?}",
            conditions
        );
        assert_eq!(
            specialties.iter().filter(|s| *s == GENERAL_PHYSICIAN).count(),
            1
        );
    }
}

#[test]
fn test_specialty_exact_match_diabetes() {
    let index = SpecialtyIndex::builtin();
    let specialties = index.resolve(&[condition("diabetes")]);

    assert!(specialties.contains(&"Endocrinologist".to_string()));
}

#[test]
fn test_specialty_substring_both_directions() {
    let index = SpecialtyIndex::builtin();

    // Condition phrase contains a table key
    let phrase = index.resolve(&[condition("severe chest pain episodes")]);
    assert!(phrase.contains(&"Cardiologist".to_string()));

    // Table key contains the condition term
    let term = index.resolve(&[condition("reflux")]);
    assert!(term.contains(&"Gastroenterologist".to_string()));
}

#[test]
fn test_specialty_confidence_does_not_change_resolution() {
    let index = SpecialtyIndex::builtin();

    let high = index.resolve(&[ConditionReport {
        name: "asthma".to_string(),
        confidence: Confidence::High,
    }]);
    let low = index.resolve(&[ConditionReport {
        name: "asthma".to_string(),
        confidence: Confidence::Low,
    }]);

    assert_eq!(high, low);
}
