//! Property tests for great-circle bearing and heading filter ranges

use proptest::prelude::*;
use qibla_core::geo::{compute_bearing, wrap_180, wrap_360, GeoPoint, KAABA};
use qibla_core::heading::{HeadingFilter, HeadingSample};

fn geo_point() -> impl Strategy<Value = GeoPoint> {
    (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(latitude, longitude)| GeoPoint {
        latitude,
        longitude,
    })
}

proptest! {
    #[test]
    fn test_bearing_always_in_range(origin in geo_point(), target in geo_point()) {
        let bearing = compute_bearing(&origin, &target).unwrap().degrees();
        prop_assert!((0.0..360.0).contains(&bearing), "bearing {} out of range", bearing);
    }

    #[test]
    fn test_bearing_to_self_is_north(point in geo_point()) {
        prop_assert_eq!(compute_bearing(&point, &point).unwrap().degrees(), 0.0);
    }

    #[test]
    fn test_bearing_to_kaaba_in_range(origin in geo_point()) {
        let bearing = compute_bearing(&origin, &KAABA).unwrap().degrees();
        prop_assert!((0.0..360.0).contains(&bearing));
    }

    #[test]
    fn test_wraps_stay_in_range(degrees in -10_000.0f64..10_000.0) {
        let wrapped = wrap_360(degrees);
        prop_assert!((0.0..360.0).contains(&wrapped));
        let signed = wrap_180(degrees);
        prop_assert!(signed > -180.0 && signed <= 180.0);
    }

    #[test]
    fn test_filter_output_in_range(
        alpha in 0.0f64..=1.0,
        headings in proptest::collection::vec(-720.0f64..720.0, 1..64),
    ) {
        let mut filter = HeadingFilter::new(alpha);
        for (i, heading) in headings.iter().enumerate() {
            let out = filter.ingest(&HeadingSample::true_north(*heading, i as u64)).degrees();
            prop_assert!((0.0..360.0).contains(&out), "filtered {} out of range", out);
        }
    }
}
