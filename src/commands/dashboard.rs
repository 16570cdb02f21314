//! Dashboard command handler.
//!
//! Turns command line flags into a dashboard configuration and runs either
//! the terminal dashboard or the headless JSON stream.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use serde::Serialize;

use crate::core::config::{DashboardConfig, WidgetKind};
use crate::core::system_monitor::{
    has_data, MetricsRuntime, Orientation, SysinfoSource, WidgetCache, WidgetHandle,
};

const ABOUT: &str =
    "A modern top command that charts system metrics like CPU load, network IO, etc in the terminal.";

const LONG_ABOUT: &str = "\
A modern top command that charts system metrics like CPU load, network IO, etc in the terminal.

While top and htop show precise point-in-time data, poptop charts metrics over a time window \
to give an at-a-glance summary of recent system activity.

Metrics:

  CPU Load (1min, 5min, 15min)
      Roughly how many processes are executing or waiting to execute on a CPU. Load above the
      number of cores means processes are waiting.

  CPU (%) (min, avg, max)
      Minimum, average and maximum busy time across all cores.

  Network IO (KiB/s) (send, recv)
      Throughput of the interface that has received the most data since boot. The chart
      follows a different interface if it takes the lead.

  Disk IOPS (read, write)
      Disk operations per second. A simple measure when many processes share the disk.

  Disk IO (KiB/s) (read, write)
      Disk throughput. Better than IOPS when one process dominates disk load.

  Top CPU Processes (%, pid, command)
  Top Memory Processes (%, pid, command)
      Processes using the most CPU or memory. Sampled at a quarter of the chart rate since
      these are point-in-time lists.

Keys: q quit, ? help, 1-7 show or hide a widget, t tile, o orientation.";

/// Widget flags in the order their widgets are added.
const WIDGET_FLAGS: [(&str, WidgetKind); 7] = [
    ("cpu-load", WidgetKind::CpuLoad),
    ("cpu-percent", WidgetKind::CpuPercent),
    ("disk-iops", WidgetKind::DiskIops),
    ("disk-io", WidgetKind::DiskIo),
    ("network-io", WidgetKind::NetworkIo),
    ("top-cpu", WidgetKind::TopCpu),
    ("top-memory", WidgetKind::TopMemory),
];

fn widget_flag(id: &'static str, short: char, help: &'static str) -> Arg {
    Arg::new(id)
        .short(short)
        .long(id)
        .help(help)
        .action(ArgAction::SetTrue)
}

/// Command line definition
pub fn command() -> Command {
    Command::new("poptop")
        .version(env!("CARGO_PKG_VERSION"))
        .about(ABOUT)
        .long_about(LONG_ABOUT)
        .arg(
            Arg::new("redraw-interval")
                .short('r')
                .long("redraw-interval")
                .value_name("MS")
                .help("Redraw interval in milliseconds (how often to repaint charts)")
                .value_parser(clap::value_parser!(u64))
                .default_value("500"),
        )
        .arg(
            Arg::new("sample-interval")
                .short('s')
                .long("sample-interval")
                .value_name("MS")
                .help("Sample interval in milliseconds (how often to fetch a new datapoint)")
                .value_parser(clap::value_parser!(u64))
                .default_value("500"),
        )
        .arg(
            Arg::new("chart-duration")
                .short('d')
                .long("chart-duration")
                .value_name("SECONDS")
                .help("Duration of the charted series in seconds (width of the chart x axis in time)")
                .value_parser(clap::value_parser!(u64))
                .default_value("120"),
        )
        .arg(
            Arg::new("smooth")
                .short('a')
                .long("smooth")
                .value_name("SAMPLES")
                .help("How many samples are included in the running average")
                .value_parser(clap::value_parser!(usize))
                .default_value("4"),
        )
        .arg(widget_flag("cpu-load", 'L', "Add CPU Load chart to layout"))
        .arg(widget_flag("cpu-percent", 'C', "Add CPU % chart to layout"))
        .arg(widget_flag("disk-iops", 'D', "Add Disk IOPS chart to layout"))
        .arg(widget_flag("disk-io", 'E', "Add Disk IO chart to layout"))
        .arg(widget_flag("network-io", 'N', "Add Network IO chart to layout"))
        .arg(widget_flag("top-cpu", 'T', "Add Top Processes by CPU list to layout"))
        .arg(widget_flag("top-memory", 'M', "Add Top Processes by Memory list to layout"))
        .arg(
            Arg::new("tile")
                .long("tile")
                .help("Arrange widgets in a grid instead of a single column")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("side-by-side")
                .long("side-by-side")
                .help("Place widgets side by side instead of stacked")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("top-rows")
                .long("top-rows")
                .value_name("ROWS")
                .help("Rows shown in the top process lists")
                .value_parser(clap::value_parser!(usize))
                .default_value("25"),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .value_name("PATH")
                .help("Write logs to this file (the dashboard owns the terminal)")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print widget data as JSON lines instead of drawing the dashboard")
                .action(ArgAction::SetTrue),
        )
}

/// Build a validated configuration from parsed flags
pub fn config_from_matches(matches: &ArgMatches) -> crate::Result<DashboardConfig> {
    let mut config = DashboardConfig::default();

    if let Some(ms) = matches.get_one::<u64>("redraw-interval") {
        config.redraw_interval = Duration::from_millis(*ms);
    }
    if let Some(ms) = matches.get_one::<u64>("sample-interval") {
        config.sample_interval = Duration::from_millis(*ms);
    }
    if let Some(secs) = matches.get_one::<u64>("chart-duration") {
        config.chart_duration = Duration::from_secs(*secs);
    }
    if let Some(samples) = matches.get_one::<usize>("smooth") {
        config.smoothing_samples = *samples;
    }
    if let Some(rows) = matches.get_one::<usize>("top-rows") {
        config.top_rows = *rows;
    }

    for (flag, widget) in WIDGET_FLAGS {
        if matches.get_flag(flag) {
            config.select_widget(widget);
        }
    }

    config.tile = matches.get_flag("tile");
    if matches.get_flag("side-by-side") {
        config.orientation = Orientation::SideBySide;
    }

    config.validate()?;
    Ok(config)
}

/// Execute the dashboard command
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let config = config_from_matches(matches)?;

    let log_file = matches.get_one::<PathBuf>("log-file");
    crate::init_logging(log_file.map(PathBuf::as_path)).context("Failed to set up logging")?;

    log::info!(
        "Starting with widgets {:?}, sampling every {:?}, {} samples per chart",
        config.widgets,
        config.sample_interval,
        config.num_samples()
    );

    if matches.get_flag("json") {
        return run_json_output(config);
    }

    crate::ui::run_dashboard(config).context("Failed to run dashboard")
}

#[derive(Debug, Serialize)]
pub struct DashboardSnapshot {
    pub timestamp: String,
    pub widgets: Vec<WidgetSnapshot>,
}

#[derive(Debug, Serialize)]
pub struct WidgetSnapshot {
    pub widget: WidgetKind,
    pub title: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub series: Vec<SeriesSnapshot>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SeriesSnapshot {
    pub name: &'static str,
    pub values: Vec<Option<f64>>,
}

/// Current contents of every widget, with missing samples as `None`
pub fn snapshot(widgets: &[(WidgetKind, WidgetHandle)]) -> DashboardSnapshot {
    let widgets = widgets
        .iter()
        .map(|(kind, handle)| match handle {
            WidgetHandle::Chart(chart) => {
                let state = chart.snapshot();
                WidgetSnapshot {
                    widget: *kind,
                    title: state.title.trim().to_string(),
                    series: state
                        .series
                        .into_iter()
                        .map(|s| SeriesSnapshot {
                            name: s.name,
                            values: s
                                .values
                                .into_iter()
                                .map(|v| has_data(v).then_some(v))
                                .collect(),
                        })
                        .collect(),
                    lines: Vec::new(),
                }
            }
            WidgetHandle::Text(text) => {
                let state = text.snapshot();
                WidgetSnapshot {
                    widget: *kind,
                    title: state.title.trim().to_string(),
                    series: Vec::new(),
                    lines: state.body.lines().map(str::to_string).collect(),
                }
            }
        })
        .collect();

    DashboardSnapshot {
        timestamp: chrono::Local::now().to_rfc3339(),
        widgets,
    }
}

/// Run in JSON output mode (for scripting)
fn run_json_output(config: DashboardConfig) -> Result<()> {
    let mut runtime = MetricsRuntime::new().context("Failed to start metrics runtime")?;
    let mut cache =
        WidgetCache::new(config.sampler_params(), SysinfoSource::factory(), runtime.spawner());

    let handles = cache.resolve_all(&config.widgets)?;
    let widgets: Vec<_> = config.widgets.iter().copied().zip(handles).collect();

    let running = Arc::new(AtomicBool::new(true));
    let flag = running.clone();
    ctrlc::set_handler(move || flag.store(false, Ordering::SeqCst))
        .context("Failed to set Ctrl-C handler")?;

    let mut result = Ok(());
    while running.load(Ordering::SeqCst) {
        std::thread::sleep(config.redraw_interval);

        if let Some(failure) = runtime.try_failure() {
            result = Err(anyhow!(
                "{} sampler stopped: {}",
                failure.widget.label(),
                failure.error
            ));
            break;
        }

        println!("{}", serde_json::to_string(&snapshot(&widgets))?);
    }

    drop(widgets);
    drop(cache);
    runtime.shutdown();
    result
}
