use std::time::Duration;

use poptop::core::config::{
    DashboardConfig, WidgetKind, MAX_CHART_SAMPLES, MIN_REDRAW_INTERVAL, MIN_SAMPLE_INTERVAL,
};
use poptop::PoptopError;

#[test]
fn test_config_default() {
    let config = DashboardConfig::default();
    assert_eq!(config.widgets.len(), 4);
    assert_eq!(config.top_rows, 25);
    assert!(!config.tile);
    assert!(config.validate().is_ok());
}

#[test]
fn test_minimum_redraw_interval_is_allowed() {
    let mut config = DashboardConfig::default();
    config.redraw_interval = MIN_REDRAW_INTERVAL;
    assert!(config.validate().is_ok());
}

#[test]
fn test_chart_shorter_than_one_sample_is_rejected() {
    let mut config = DashboardConfig::default();
    config.sample_interval = Duration::from_secs(2);
    config.chart_duration = Duration::from_secs(1);
    assert!(matches!(config.validate(), Err(PoptopError::Config(_))));
}

#[test]
fn test_empty_widget_list_is_rejected() {
    let mut config = DashboardConfig::default();
    config.widgets.clear();
    assert!(matches!(config.validate(), Err(PoptopError::NoWidgets)));
}

#[test]
fn test_sampler_params_follow_config() {
    let mut config = DashboardConfig::default();
    config.sample_interval = Duration::from_millis(100);
    config.chart_duration = Duration::from_secs(30);
    config.smoothing_samples = 2;
    config.top_rows = 10;
    let params = config.sampler_params();

    assert_eq!(params.retention, 300);
    assert_eq!(params.smoothing, 2);
    assert_eq!(params.top_rows, 10);
    assert_eq!(params.top_interval(), Duration::from_millis(400));
}

#[test]
fn test_widget_ids_are_stable() {
    let ids: Vec<u8> = WidgetKind::ALL.iter().map(|w| w.id()).collect();
    assert_eq!(ids, vec![0, 1, 2, 3, 4, 5, 6]);
    assert_eq!(WidgetKind::TopCpu.coupled(), Some(WidgetKind::TopMemory));
    assert_eq!(WidgetKind::CpuLoad.coupled(), None);
}

#[test]
fn test_config_built_outside_the_crate_validates() {
    let mut config = DashboardConfig::default();
    config.widgets = vec![WidgetKind::TopCpu, WidgetKind::TopMemory];
    config.smoothing_samples = 1;
    config.top_rows = 5;
    assert!(config.validate().is_ok());
}

#[test]
fn test_smoothing_wider_than_chart_is_rejected() {
    let mut config = DashboardConfig::default();
    config.chart_duration = Duration::from_secs(2);
    config.smoothing_samples = 5;
    assert!(matches!(
        config.validate(),
        Err(PoptopError::InvalidWindow(5))
    ));
}

#[test]
fn test_retention_is_capped() {
    let mut config = DashboardConfig::default();
    config.sample_interval = MIN_SAMPLE_INTERVAL;
    config.chart_duration = Duration::from_secs(100_000_000);
    assert!(matches!(config.validate(), Err(PoptopError::Config(_))));

    config.chart_duration = MIN_SAMPLE_INTERVAL * (MAX_CHART_SAMPLES as u32 + 1);
    assert!(matches!(config.validate(), Err(PoptopError::Config(_))));
}
