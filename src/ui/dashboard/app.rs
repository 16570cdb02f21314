use std::io;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::core::config::DashboardConfig;
use crate::core::system_monitor::{
    layout, LayoutNode, MetricsRuntime, SysinfoSource, WidgetCache, WidgetHandle,
};

use super::event_handler::DashboardEvent;
use super::render::render_ui;

/// Dashboard application state
pub struct DashboardApp {
    config: DashboardConfig,
    cache: WidgetCache,
    tree: LayoutNode<WidgetHandle>,
    pub should_quit: bool,
    pub show_help: bool,
}

impl DashboardApp {
    pub fn new(config: DashboardConfig, mut cache: WidgetCache) -> crate::Result<Self> {
        let handles = cache.resolve_all(&config.widgets)?;
        let tree = layout(&handles, config.layout_options())?;

        Ok(Self {
            config,
            cache,
            tree,
            should_quit: false,
            show_help: false,
        })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn layout(&self) -> &LayoutNode<WidgetHandle> {
        &self.tree
    }

    /// Lay the panes out again from the current configuration.
    ///
    /// Widgets seen before come back from the cache with their history.
    pub fn rebuild_layout(&mut self) -> crate::Result<()> {
        let handles = self.cache.resolve_all(&self.config.widgets)?;
        self.tree = layout(&handles, self.config.layout_options())?;
        log::debug!(
            "Rebuilt layout with {} widgets (tile: {}, orientation: {:?})",
            handles.len(),
            self.config.tile,
            self.config.orientation
        );
        Ok(())
    }

    /// Handle keyboard events
    pub fn handle_event(&mut self, event: DashboardEvent) -> crate::Result<()> {
        match event {
            DashboardEvent::Quit => self.should_quit = true,
            DashboardEvent::ToggleHelp => self.show_help = !self.show_help,
            DashboardEvent::ToggleWidget(kind) => {
                if self.config.toggle_widget(kind) {
                    self.rebuild_layout()?;
                } else {
                    log::debug!("Keeping {}, it is the last widget shown", kind.label());
                }
            }
            DashboardEvent::ToggleTile => {
                self.config.tile = !self.config.tile;
                self.rebuild_layout()?;
            }
            DashboardEvent::ToggleOrientation => {
                self.config.orientation = self.config.orientation.flipped();
                self.rebuild_layout()?;
            }
            DashboardEvent::None => {}
        }
        Ok(())
    }
}

type DashboardTerminal = Terminal<CrosstermBackend<io::Stdout>>;

/// Run the dashboard until the user quits or a sampler fails
pub fn run_dashboard(config: DashboardConfig) -> Result<()> {
    let mut runtime = MetricsRuntime::new().context("Failed to start metrics runtime")?;
    let cache = WidgetCache::new(config.sampler_params(), SysinfoSource::factory(), runtime.spawner());
    let mut app = DashboardApp::new(config, cache).context("Failed to build dashboard")?;

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let result = event_loop(&mut terminal, &mut app, &mut runtime);

    // Restore terminal even when the loop failed
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    drop(app);
    runtime.shutdown();
    result
}

fn event_loop(
    terminal: &mut DashboardTerminal,
    app: &mut DashboardApp,
    runtime: &mut MetricsRuntime,
) -> Result<()> {
    let redraw_interval = app.config().redraw_interval;
    let mut last_draw = Instant::now();
    terminal.draw(|frame| render_ui(frame, app))?;

    loop {
        let timeout = redraw_interval
            .checked_sub(last_draw.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout).context("Event poll failed")? {
            if let Event::Key(key) = event::read().context("Event read failed")? {
                if key.kind == KeyEventKind::Press {
                    app.handle_event(DashboardEvent::from_key(key))?;
                    terminal.draw(|frame| render_ui(frame, app))?;
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }

        if let Some(failure) = runtime.try_failure() {
            return Err(anyhow!(
                "{} sampler stopped: {}",
                failure.widget.label(),
                failure.error
            ));
        }

        if last_draw.elapsed() >= redraw_interval {
            terminal.draw(|frame| render_ui(frame, app))?;
            last_draw = Instant::now();
        }
    }
}
