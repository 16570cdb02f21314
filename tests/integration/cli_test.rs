use std::time::Duration;

use poptop::commands::dashboard::{command, config_from_matches};
use poptop::core::config::WidgetKind;
use poptop::PoptopError;

fn parse(args: &[&str]) -> poptop::Result<poptop::DashboardConfig> {
    let matches = command()
        .try_get_matches_from(std::iter::once("poptop").chain(args.iter().copied()))
        .unwrap();
    config_from_matches(&matches)
}

#[test]
fn test_all_widget_flags() {
    let config = parse(&["-L", "-C", "-N", "-D", "-E", "-T", "-M"]).unwrap();
    assert_eq!(config.widgets.len(), 7);
    for widget in WidgetKind::ALL {
        assert!(config.widgets.contains(&widget));
    }
}

#[test]
fn test_long_flags() {
    let config = parse(&[
        "--redraw-interval",
        "200",
        "--sample-interval",
        "100",
        "--chart-duration",
        "10",
        "--smooth",
        "1",
        "--top-rows",
        "5",
        "--top-cpu",
    ])
    .unwrap();

    assert_eq!(config.redraw_interval, Duration::from_millis(200));
    assert_eq!(config.num_samples(), 100);
    assert_eq!(config.smoothing_samples, 1);
    assert_eq!(config.top_rows, 5);
    assert_eq!(config.widgets, vec![WidgetKind::TopCpu]);
}

#[test]
fn test_zero_top_rows_is_rejected() {
    assert!(matches!(
        parse(&["--top-rows", "0"]),
        Err(PoptopError::Config(_))
    ));
}

#[test]
fn test_non_numeric_interval_fails_to_parse() {
    assert!(command()
        .try_get_matches_from(["poptop", "-r", "fast"])
        .is_err());
}

#[test]
fn test_huge_smoothing_window_is_rejected() {
    assert!(matches!(
        parse(&["-a", "18446744073709551615"]),
        Err(PoptopError::InvalidWindow(_))
    ));
}

#[test]
fn test_huge_chart_duration_is_rejected() {
    assert!(matches!(
        parse(&["-d", "100000000", "-s", "20"]),
        Err(PoptopError::Config(_))
    ));
}
