mod common;

use serde_json::Value;

use common::{write_eclipse_kernel, ECLIPSE_DATE};
use penumbra::{
    CalendarDate, EclipseRequest, EclipseResponse, GeoLocation, GeometryEngine, JPLEphem,
    Penumbra, PenumbraConfig, PenumbraError, TimeGrid,
};

fn load(moon_offset_km: f64) -> (tempfile::TempDir, Penumbra) {
    let (dir, path) = write_eclipse_kernel(moon_offset_km);
    let config = PenumbraConfig::new(path.as_str()).unwrap();
    (dir, Penumbra::new(&config).unwrap())
}

#[test]
fn test_eclipse_from_kernel() {
    let (_dir, penumbra) = load(0.0);
    let site = GeoLocation::from_degrees(0.0, 0.0).unwrap();
    let date = CalendarDate::parse(ECLIPSE_DATE).unwrap();
    let report = penumbra.eclipse_circumstances(&site, date).unwrap();

    assert_eq!(report.date, date);
    assert_eq!(report.separation.len(), 1440);
    assert!(report
        .separation
        .iter()
        .all(|s| (0.0..=180.0).contains(s)));

    let phases = report.phases;
    assert!(phases.is_eclipse());
    let first = phases.first_contact.unwrap().time;
    let last = phases.last_contact.unwrap().time;
    assert!(first <= phases.maximum.time && phases.maximum.time <= last);
    assert!(phases.maximum.separation < 0.01);

    // closest approach a few minutes after noon
    let noon = CalendarDate::parse(ECLIPSE_DATE)
        .unwrap()
        .midnight()
        .unwrap()
        + hifitime::Unit::Hour * 12_i64;
    let offset = (phases.maximum.time.epoch() - noon).to_seconds();
    assert!((0.0..600.0).contains(&offset), "maximum {offset} s after noon");

    let partial = phases.partial_phase_duration().unwrap().to_seconds() / 3600.0;
    assert!((3.8..4.2).contains(&partial), "partial phase {partial} h");
    assert!(report.sun_altitude_at_maximum > 60.0);
}

#[test]
fn test_night_side_eclipse_is_still_reported() {
    let (_dir, penumbra) = load(0.0);
    let site = GeoLocation::from_degrees(0.0, 180.0).unwrap();
    let date = CalendarDate::parse(ECLIPSE_DATE).unwrap();
    let report = penumbra.eclipse_circumstances(&site, date).unwrap();

    assert!(report.phases.first_contact.is_some());
    assert!(report.sun_altitude_at_maximum < 0.0);
}

#[test]
fn test_no_eclipse_from_kernel() {
    let (_dir, penumbra) = load(5.0e6);
    let site = GeoLocation::from_degrees(45.0, 10.0).unwrap();
    let date = CalendarDate::parse(ECLIPSE_DATE).unwrap();
    let report = penumbra.eclipse_circumstances(&site, date).unwrap();

    assert!(!report.phases.is_eclipse());
    assert_eq!(report.phases.last_contact, None);
    assert!(report.phases.maximum.separation > 3.0);
}

#[test]
fn test_date_outside_kernel() {
    let (_dir, penumbra) = load(0.0);
    let site = GeoLocation::from_degrees(0.0, 0.0).unwrap();
    let date = CalendarDate::parse("2024-04-20").unwrap();

    let err = penumbra.eclipse_circumstances(&site, date).unwrap_err();
    assert!(matches!(err, PenumbraError::EphemerisRange { .. }));
    assert!(err.is_client_error());
}

#[test]
fn test_series_matches_engine() {
    let (_dir, path) = write_eclipse_kernel(0.0);
    let config = PenumbraConfig::new(path.as_str()).unwrap();
    let penumbra = Penumbra::new(&config).unwrap();
    let ephem = JPLEphem::new(&config.ephemeris).unwrap();

    let site = GeoLocation::new(-33.9, 18.4, 1200.0).unwrap();
    let grid = TimeGrid::from_date_str(ECLIPSE_DATE).unwrap();

    let series = penumbra.separation_series(&site, &grid).unwrap();
    let engine = GeometryEngine::new(&ephem);
    assert_eq!(series, engine.observe(&site, &grid).unwrap());

    for index in [0, 500, 1439] {
        let geometry = engine.observe_instant(&site, &grid.instants()[index]).unwrap();
        assert_eq!(series[index], geometry.separation);
    }
}

#[test]
fn test_json_request_round() {
    let (_dir, penumbra) = load(0.0);

    let body = format!(r#"{{"latitude": "10.5", "longitude": -20, "date": "{ECLIPSE_DATE}"}}"#);
    let request = EclipseRequest::from_json(&body).unwrap();
    let response = penumbra.handle_request(&request);
    assert!(response.is_success());

    let json: Value = serde_json::from_str(&response.to_json().unwrap()).unwrap();
    assert_eq!(json["success"], Value::Bool(true));
    assert_eq!(json["separation"].as_array().unwrap().len(), 1440);
    assert!(json["phases"]["first_contact"].is_string());
    assert!(json["phases"]["maximum"]["separation"].is_number());
    assert!(json["visibility"]["sun_above_horizon"].is_boolean());
    assert!(json["partial_phase_minutes"].as_f64().unwrap() > 200.0);
}

#[test]
fn test_json_request_failures() {
    let (_dir, penumbra) = load(0.0);

    let response = penumbra.handle_request(&EclipseRequest::new(10.0, 20.0, "2024-02-30"));
    let json: Value = serde_json::from_str(&response.to_json().unwrap()).unwrap();
    assert_eq!(json["success"], Value::Bool(false));
    assert!(json["error"].as_str().unwrap().starts_with("Invalid date"));

    let response = penumbra.handle_request(&EclipseRequest::new(120.0, 20.0, ECLIPSE_DATE));
    assert!(!response.is_success());

    let response = penumbra.handle_request(&EclipseRequest::new(10.0, 20.0, "2024-04-20"));
    match response {
        EclipseResponse::Failure(failure) => {
            assert!(failure.error.starts_with("Ephemeris does not cover"))
        }
        EclipseResponse::Success(_) => panic!("date outside the kernel must fail"),
    }
}

#[test]
fn test_shared_context_across_threads() {
    let (_dir, penumbra) = load(0.0);
    let requests = [
        EclipseRequest::new(0.0, 0.0, ECLIPSE_DATE),
        EclipseRequest::new(45.0, -70.0, ECLIPSE_DATE),
        EclipseRequest::new(-60.0, 120.0, ECLIPSE_DATE),
    ];

    let sequential: Vec<EclipseResponse> =
        requests.iter().map(|r| penumbra.handle_request(r)).collect();

    let concurrent: Vec<EclipseResponse> = std::thread::scope(|scope| {
        let handles: Vec<_> = requests
            .iter()
            .map(|request| {
                let penumbra = penumbra.clone();
                scope.spawn(move || penumbra.handle_request(request))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(sequential, concurrent);
}
