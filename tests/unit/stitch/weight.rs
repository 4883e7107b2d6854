use super::*;

fn masked(margin: f32, transition: f32) -> BlendParams {
    BlendParams {
        fisheye_masking: true,
        fisheye_masking_margin: margin,
        transition_size: transition,
    }
}

#[test]
fn sigmoid_shape() {
    assert_eq!(sigmoid(95.0, 10.0, 95.0), 0.5);
    assert!(sigmoid(0.0, 10.0, 95.0) > 0.999_999);
    assert!(sigmoid(200.0, 10.0, 95.0) < 1e-6);

    let samples: Vec<f32> = (0..=100).map(|d| sigmoid(d as f32, 10.0, 50.0)).collect();
    assert!(samples.windows(2).all(|p| p[1] <= p[0]));
}

#[test]
fn mask_geometry() {
    let w = ContributionWeighter::new(200, 100, &masked(0.1, 10.0));
    assert!((w.max_radius() - 45.0).abs() < 1e-4);
    assert!((w.blur_mid() - 40.0).abs() < 1e-4);
}

#[test]
fn unmasked_in_bounds_pixels_weigh_one() {
    let w = ContributionWeighter::new(4, 3, &BlendParams::default());
    assert_eq!(w.weight(&Point2::new(0.0, 0.0)), Some(1.0));
    assert_eq!(w.weight(&Point2::new(3.99, 2.99)), Some(1.0));
}

#[test]
fn bounds_are_half_open() {
    let w = ContributionWeighter::new(4, 3, &BlendParams::default());
    assert_eq!(w.weight(&Point2::new(4.0, 1.0)), None);
    assert_eq!(w.weight(&Point2::new(1.0, 3.0)), None);
    assert_eq!(w.weight(&Point2::new(-0.001, 1.0)), None);
    assert_eq!(w.weight(&Point2::new(f64::NAN, 1.0)), None);
    assert_eq!(w.weight(&Point2::new(1.0, f64::INFINITY)), None);
}

#[test]
fn masked_weights_follow_distance() {
    let w = ContributionWeighter::new(200, 200, &masked(0.0, 10.0));
    assert_eq!(w.max_radius(), 100.0);
    assert_eq!(w.blur_mid(), 95.0);

    let at_center = w.weight(&Point2::new(100.0, 100.0)).unwrap();
    assert!(at_center > 0.999_999);

    let at_mid = w.weight(&Point2::new(195.0, 100.0)).unwrap();
    assert_eq!(at_mid, 0.5);

    let radial: Vec<f32> = (0..=99)
        .map(|d| w.weight(&Point2::new(100.0 + d as f64, 100.0)).unwrap())
        .collect();
    assert!(radial.windows(2).all(|p| p[1] <= p[0]));

    // Corner lies past max_radius.
    assert_eq!(w.weight(&Point2::new(1.0, 1.0)), None);
}

#[test]
fn odd_sizes_use_truncated_center() {
    let w = ContributionWeighter::new(201, 201, &masked(0.0, 10.0));
    assert_eq!(w.max_radius(), 100.5);
    assert_eq!(w.blur_mid(), 95.5);
    // Centre is (100, 100), not (100.5, 100.5).
    assert_eq!(w.weight(&Point2::new(195.5, 100.0)), Some(0.5));
}
