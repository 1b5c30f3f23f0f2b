use shared::domain::{DistributionEntry, ValueTriple};

const CURRENT_PALETTE: [&str; 3] = ["#EF4444", "#10B981", "#3B82F6"];
const HISTORY_PALETTE: [&str; 3] = ["#3B82F6", "#8B5CF6", "#06B6D4"];
const SLICE_NAMES: [&str; 3] = ["A", "B", "C"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartSource {
    #[default]
    None,
    Preview,
    Confirmed,
}

/// What the chart currently renders, as seen by the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChartSnapshot {
    pub source: ChartSource,
    pub displayed: Option<ValueTriple>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSlice {
    pub label: String,
    pub value: f64,
    pub color: &'static str,
}

/// View model deciding which triple the chart draws.
///
/// A preview, while present, always renders in place of the confirmed triple.
/// It stops doing so only when cleared or promoted; `show_confirmed` alone
/// never hides it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartPresentationState {
    preview: Option<ValueTriple>,
    confirmed: Option<ValueTriple>,
}

impl ChartPresentationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show_preview(&mut self, triple: ValueTriple) {
        self.preview = Some(triple);
    }

    pub fn show_confirmed(&mut self, triple: ValueTriple) {
        self.confirmed = Some(triple);
    }

    pub fn clear_preview(&mut self) {
        self.preview = None;
    }

    /// Turns the pending preview into the confirmed triple.
    pub fn promote_preview(&mut self) {
        if let Some(triple) = self.preview.take() {
            self.confirmed = Some(triple);
        }
    }

    pub fn clear(&mut self) {
        self.preview = None;
        self.confirmed = None;
    }

    pub fn source(&self) -> ChartSource {
        if self.preview.is_some() {
            ChartSource::Preview
        } else if self.confirmed.is_some() {
            ChartSource::Confirmed
        } else {
            ChartSource::None
        }
    }

    pub fn displayed(&self) -> Option<ValueTriple> {
        self.preview.or(self.confirmed)
    }

    pub fn confirmed(&self) -> Option<ValueTriple> {
        self.confirmed
    }

    pub fn is_visible(&self) -> bool {
        self.source() != ChartSource::None
    }

    pub fn snapshot(&self) -> ChartSnapshot {
        ChartSnapshot {
            source: self.source(),
            displayed: self.displayed(),
        }
    }

    pub fn slices(&self) -> Vec<ChartSlice> {
        self.displayed()
            .map(|triple| build_slices(triple, CURRENT_PALETTE))
            .unwrap_or_default()
    }
}

/// Slices for the small per-entry chart in the history list.
pub fn entry_slices(entry: &DistributionEntry) -> Vec<ChartSlice> {
    build_slices(entry.triple(), HISTORY_PALETTE)
}

fn build_slices(triple: ValueTriple, palette: [&'static str; 3]) -> Vec<ChartSlice> {
    SLICE_NAMES
        .iter()
        .zip(triple.components())
        .zip(palette)
        .map(|((name, value), color)| ChartSlice {
            label: format!("{name}: {value}%"),
            value,
            color,
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/chart_tests.rs"]
mod tests;
