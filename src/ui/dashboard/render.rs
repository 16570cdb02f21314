use ratatui::{
    prelude::*,
    symbols,
    widgets::{Axis, Block, Borders, Chart, Clear, Dataset, GraphType, Paragraph},
};

use super::app::DashboardApp;
use super::widgets::{chart_points, pane_block, x_labels, y_bounds, y_labels};
use crate::core::system_monitor::{ChartHandle, LayoutNode, Orientation, TextHandle, WidgetHandle};

/// Main render function
pub fn render_ui(frame: &mut Frame, app: &DashboardApp) {
    let area = frame.area();

    render_node(frame, area, app.layout());

    if app.show_help {
        render_help_overlay(frame, area);
    }
}

fn render_node(frame: &mut Frame, area: Rect, node: &LayoutNode<WidgetHandle>) {
    match node {
        LayoutNode::Leaf(WidgetHandle::Chart(chart)) => render_chart(frame, area, chart),
        LayoutNode::Leaf(WidgetHandle::Text(text)) => render_text(frame, area, text),
        LayoutNode::Split {
            orientation,
            first,
            second,
        } => {
            let direction = match orientation {
                Orientation::Stacked => Direction::Vertical,
                Orientation::SideBySide => Direction::Horizontal,
            };
            let chunks = Layout::default()
                .direction(direction)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(area);

            render_node(frame, chunks[0], first);
            render_node(frame, chunks[1], second);
        }
    }
}

fn render_chart(frame: &mut Frame, area: Rect, handle: &ChartHandle) {
    // Copy out under the read lock so the sampler is never blocked on drawing
    let state = handle.snapshot();

    let points: Vec<Vec<(f64, f64)>> = state.series.iter().map(|s| chart_points(&s.values)).collect();
    let datasets = state
        .series
        .iter()
        .zip(&points)
        .map(|(series, points)| {
            Dataset::default()
                .name(series.name)
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::Indexed(series.color)))
                .data(points)
        })
        .collect::<Vec<_>>();

    let width = state
        .series
        .iter()
        .map(|s| s.values.len())
        .max()
        .unwrap_or(0)
        .saturating_sub(1)
        .max(1);
    let bounds = y_bounds(&state);

    let chart = Chart::new(datasets)
        .block(pane_block(&state.title))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, width as f64])
                .labels(x_labels(&state.x_labels)),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds(bounds)
                .labels(y_labels(state.format, bounds)),
        );

    frame.render_widget(chart, area);
}

fn render_text(frame: &mut Frame, area: Rect, handle: &TextHandle) {
    let state = handle.snapshot();
    let paragraph = Paragraph::new(state.body).block(pane_block(&state.title));
    frame.render_widget(paragraph, area);
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let help_text = r#"
    Poptop - Help

    Keyboard Shortcuts:
    ─────────────────────────────────────
    q / Esc     Quit the application
    ?           Toggle this help screen
    1 .. 7      Show or hide a widget
                1 CPU load     2 CPU %
                3 Network IO   4 Disk IOPS
                5 Disk IO      6 Top CPU
                7 Top memory
    t           Toggle grid tiling
    o           Toggle stacked / side by side
    "#;

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .alignment(Alignment::Left);

    // Center the help popup
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);
    frame.render_widget(paragraph, popup_area);
}

/// Helper function to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
