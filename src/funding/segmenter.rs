use serde::{Deserialize, Serialize};
use std::time::Duration;
use crate::events::funding::FundingEvent;
use crate::funding::pagination::CollectionWindow;

/// Inactivity gap that closes a funding cycle.
///
/// Sized against venues settling every 8h or longer. Re-validate it when
/// adding an exchange with a shorter funding cadence.
pub const CYCLE_GAP_THRESHOLD: Duration = Duration::from_secs(9 * 3600);

/// A maximal run of funding events with no gap above the threshold.
#[derive(Clone, Debug, PartialEq)]
pub struct FundingCycle(Vec<FundingEvent>);

impl FundingCycle {
    pub fn events(&self) -> &[FundingEvent] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_events(self) -> Vec<FundingEvent> {
        self.0
    }
}

/// Which events of a collection a position record reports on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePolicy {
    /// Only the most recent cycle of a long lookback.
    #[default]
    LatestCycle,
    /// Every event in a short window, without segmentation.
    WindowSum,
}

impl CyclePolicy {
    /// The collection mode each policy is meant to consume.
    pub fn collection_window(&self, lookback: Duration, window: Duration) -> CollectionWindow {
        match self {
            CyclePolicy::LatestCycle => CollectionWindow::FullHistory { lookback },
            CyclePolicy::WindowSum => CollectionWindow::Windowed { span: window },
        }
    }
}

pub struct CycleSegmenter {
    gap: Duration,
}

impl Default for CycleSegmenter {
    fn default() -> Self {
        CycleSegmenter::new(CYCLE_GAP_THRESHOLD)
    }
}

impl CycleSegmenter {
    pub fn new(gap: Duration) -> Self {
        CycleSegmenter { gap }
    }

    /// Splits ascending events wherever consecutive timestamps are more than
    /// `gap` apart. Concatenating the result reproduces the input.
    pub fn segment(&self, events: &[FundingEvent]) -> Vec<FundingCycle> {
        let mut cycles = Vec::new();
        let mut current: Vec<FundingEvent> = Vec::new();

        for event in events {
            if let Some(previous) = current.last() {
                if event.timestamp - previous.timestamp > self.gap {
                    cycles.push(FundingCycle(std::mem::take(&mut current)));
                }
            }
            current.push(event.clone());
        }

        if !current.is_empty() {
            cycles.push(FundingCycle(current));
        }

        cycles
    }

    /// Reduces a collection to the events one position record reports on.
    pub fn select(&self, events: Vec<FundingEvent>, policy: CyclePolicy) -> Vec<FundingEvent> {
        match policy {
            CyclePolicy::LatestCycle => self
                .segment(&events)
                .pop()
                .map(FundingCycle::into_events)
                .unwrap_or_default(),
            CyclePolicy::WindowSum => events,
        }
    }
}
