use poptop::core::system_monitor::{has_data, BoundedSeries};
use poptop::PoptopError;

#[test]
fn test_display_window_is_always_full_width() {
    let mut series = BoundedSeries::new(5).unwrap();
    for n in 0..3 {
        series.push(n as f64);
    }

    let window = series.display_window();
    assert_eq!(window.len(), 5);
    assert!(!has_data(window[0]));
    assert!(!has_data(window[1]));
    assert_eq!(&window[2..], &[0.0, 1.0, 2.0]);
}

#[test]
fn test_oldest_samples_fall_off_the_left() {
    let mut series = BoundedSeries::new(3).unwrap();
    for n in 0..20 {
        series.push(n as f64);
    }
    assert_eq!(series.display_window(), vec![17.0, 18.0, 19.0]);
    assert_eq!(series.high_water(), 20);
}

#[test]
fn test_smoothing_a_constant_keeps_it_constant() {
    let mut series = BoundedSeries::new(10).unwrap();
    for _ in 0..30 {
        series.push(7.0);
    }

    let smoothed = series.smoothed(4);
    assert_eq!(smoothed.len(), 10);
    assert!(smoothed.iter().all(|v| *v == 7.0));
}

#[test]
fn test_zero_capacity_is_rejected() {
    assert!(matches!(
        BoundedSeries::new(0),
        Err(PoptopError::InvalidCapacity(0))
    ));
}
