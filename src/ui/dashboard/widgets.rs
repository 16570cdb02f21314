use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders},
};

use crate::core::system_monitor::{has_data, ChartState, ValueFormat};

/// Rounded border around a pane with its title
pub fn pane_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray))
}

/// Chart points for a series, leaving gaps where there is no data yet
pub fn chart_points(values: &[f64]) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| has_data(**v))
        .map(|(i, v)| (i as f64, *v))
        .collect()
}

/// Y axis range covering every plotted value, starting at zero
pub fn y_bounds(chart: &ChartState) -> [f64; 2] {
    let max = chart
        .series
        .iter()
        .flat_map(|s| s.values.iter().copied())
        .filter(|v| has_data(*v))
        .fold(0.0_f64, f64::max);

    let top = match chart.format {
        ValueFormat::Percent => max.max(100.0),
        _ if max <= 0.0 => 1.0,
        _ => max * 1.1,
    };
    [0.0, top]
}

/// Bottom, middle and top labels for the y axis
pub fn y_labels(format: ValueFormat, bounds: [f64; 2]) -> Vec<String> {
    let [low, high] = bounds;
    vec![
        format.format(low),
        format.format((low + high) / 2.0),
        format.format(high),
    ]
}

/// First, middle and last of the x axis labels
pub fn x_labels(labels: &[String]) -> Vec<String> {
    match labels {
        [] => Vec::new(),
        [only] => vec![only.clone()],
        _ => vec![
            labels[0].clone(),
            labels[labels.len() / 2].clone(),
            labels[labels.len() - 1].clone(),
        ],
    }
}
