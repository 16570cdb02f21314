//! Render handles shared between a sampler (writer) and the renderer (reader).

use std::sync::Arc;

use parking_lot::RwLock;

/// How values on a chart's y axis are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFormat {
    OneDecimal,
    Whole,
    Percent,
}

impl ValueFormat {
    pub fn format(self, value: f64) -> String {
        match self {
            ValueFormat::OneDecimal => format!("{value:.1}"),
            ValueFormat::Whole => format!("{value:.0}"),
            ValueFormat::Percent => format!("{value:.0}%"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesData {
    pub name: &'static str,
    /// 256-color palette index
    pub color: u8,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartState {
    pub title: String,
    pub format: ValueFormat,
    pub series: Vec<SeriesData>,
    pub x_labels: Vec<String>,
}

/// Line chart whose series are replaced wholesale on every sample.
#[derive(Debug, Clone)]
pub struct ChartHandle {
    inner: Arc<RwLock<ChartState>>,
}

impl ChartHandle {
    pub fn new(title: impl Into<String>, format: ValueFormat) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ChartState {
                title: title.into(),
                format,
                series: Vec::new(),
                x_labels: Vec::new(),
            })),
        }
    }

    /// Replace the values of series `name`, adding it if new.
    pub fn set_series(&self, name: &'static str, color: u8, values: Vec<f64>) {
        let mut state = self.inner.write();
        match state.series.iter_mut().find(|s| s.name == name) {
            Some(series) => {
                series.color = color;
                series.values = values;
            }
            None => state.series.push(SeriesData {
                name,
                color,
                values,
            }),
        }
    }

    pub fn set_title(&self, title: impl Into<String>) {
        self.inner.write().title = title.into();
    }

    pub fn set_x_labels(&self, labels: Vec<String>) {
        self.inner.write().x_labels = labels;
    }

    pub fn snapshot(&self) -> ChartState {
        self.inner.read().clone()
    }

    pub fn ptr_eq(&self, other: &ChartHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextState {
    pub title: String,
    pub body: String,
}

/// Multi-line text panel, replaced wholesale on every sample.
#[derive(Debug, Clone)]
pub struct TextHandle {
    inner: Arc<RwLock<TextState>>,
}

impl TextHandle {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(TextState {
                title: title.into(),
                body: String::new(),
            })),
        }
    }

    pub fn replace(&self, body: String) {
        self.inner.write().body = body;
    }

    pub fn snapshot(&self) -> TextState {
        self.inner.read().clone()
    }

    pub fn ptr_eq(&self, other: &TextHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// What the layout places in each pane.
#[derive(Debug, Clone)]
pub enum WidgetHandle {
    Chart(ChartHandle),
    Text(TextHandle),
}

impl WidgetHandle {
    pub fn ptr_eq(&self, other: &WidgetHandle) -> bool {
        match (self, other) {
            (WidgetHandle::Chart(a), WidgetHandle::Chart(b)) => a.ptr_eq(b),
            (WidgetHandle::Text(a), WidgetHandle::Text(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}
