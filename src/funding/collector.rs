use crate::connectors::session::ExchangeSession;
use crate::events::funding::FundingEvent;
use crate::funding::dedup::{merge_page, SeenKeys};
use crate::funding::pagination::{CollectionWindow, PaginationScheme};
use crate::interfaces::exchange_adapter::PageRequest;
use crate::observability::metrics::{FUNDING_DUPLICATES_DROPPED, FUNDING_EVENTS_COLLECTED, FUNDING_PAGES_FETCHED};
use crate::types::exchange::Exchange;
use crate::types::timestamp::Timestamp;
use std::time::Duration;

const ONE_MS: Duration = Duration::from_millis(1);

/// Why a collection loop stopped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The history ran out or the requested range was covered.
    Exhausted,
    /// The server returned a page that would not move the time cursor.
    Stalled,
    /// The offset or page ceiling was reached.
    Ceiling,
    /// A page request failed or returned garbage; earlier pages are kept.
    PageFailed(String),
}

/// Deduplicated, ascending funding events for one (exchange, symbol).
#[derive(Clone, Debug)]
pub struct Collection {
    pub events: Vec<FundingEvent>,
    pub pages: usize,
    pub duplicates: usize,
    pub stop: StopReason,
}

impl Collection {
    pub fn page_failure(&self) -> Option<&str> {
        match &self.stop {
            StopReason::PageFailed(reason) => Some(reason),
            _ => None,
        }
    }
}

struct Accumulator {
    exchange: Exchange,
    bounds: Option<(Timestamp, Timestamp)>,
    seen: SeenKeys,
    events: Vec<FundingEvent>,
    pages: usize,
    duplicates: usize,
}

impl Accumulator {
    fn add_page(&mut self, page: Vec<FundingEvent>) {
        self.pages += 1;
        let page: Vec<FundingEvent> = match self.bounds {
            Some((start, end)) => page
                .into_iter()
                .filter(|e| e.timestamp >= start && e.timestamp <= end)
                .collect(),
            None => page,
        };
        self.duplicates += merge_page(&mut self.seen, &mut self.events, page);
    }

    fn finish(mut self, stop: StopReason) -> Collection {
        self.events.sort_by_key(|e| e.timestamp);

        let label = [self.exchange.as_str()];
        FUNDING_PAGES_FETCHED.with_label_values(&label).inc_by(self.pages as u64);
        FUNDING_EVENTS_COLLECTED.with_label_values(&label).inc_by(self.events.len() as u64);
        FUNDING_DUPLICATES_DROPPED.with_label_values(&label).inc_by(self.duplicates as u64);

        Collection {
            events: self.events,
            pages: self.pages,
            duplicates: self.duplicates,
            stop,
        }
    }
}

/// Drives one exchange's paginated funding history to exhaustion.
pub struct FundingCollector {
    scheme: PaginationScheme,
}

impl FundingCollector {
    pub fn new(scheme: PaginationScheme) -> Self {
        FundingCollector { scheme }
    }

    /// Pages are requested strictly one after another through the session's
    /// pacer. A failed page ends the loop; whatever was collected is returned.
    pub async fn collect(
        &self,
        session: &mut ExchangeSession,
        symbol: &str,
        window: CollectionWindow,
        now: Timestamp,
    ) -> Collection {
        let (start, end) = window.bounds(now);
        let mut acc = Accumulator {
            exchange: session.exchange(),
            bounds: window.filters_events().then_some((start, end)),
            seen: SeenKeys::new(),
            events: Vec::new(),
            pages: 0,
            duplicates: 0,
        };

        let stop = match self.scheme {
            PaginationScheme::TimeCursor { limit } => {
                time_cursor(session, symbol, &mut acc, start, end, limit).await
            }
            PaginationScheme::Offset { page_size, max_offset } => {
                offset_cursor(session, symbol, &mut acc, page_size, max_offset).await
            }
            PaginationScheme::PageNumber { page_size, max_pages } => {
                page_cursor(session, symbol, &mut acc, page_size, max_pages).await
            }
            PaginationScheme::TimeWindow { span, limit } => {
                time_windows(session, symbol, &mut acc, start, end, span, limit).await
            }
        };

        if let StopReason::PageFailed(reason) = &stop {
            tracing::warn!(
                exchange = %acc.exchange,
                symbol,
                operation = "fetch_funding_history_page",
                pages = acc.pages,
                kept = acc.events.len(),
                "Funding pagination ended early: {}",
                reason
            );
        }

        let collection = acc.finish(stop);
        tracing::debug!(
            symbol,
            pages = collection.pages,
            events = collection.events.len(),
            duplicates = collection.duplicates,
            stop = ?collection.stop,
            "Funding history collected"
        );
        collection
    }
}

async fn time_cursor(
    session: &mut ExchangeSession,
    symbol: &str,
    acc: &mut Accumulator,
    start: Timestamp,
    end: Timestamp,
    limit: u32,
) -> StopReason {
    let mut cursor = start;

    while cursor < end {
        let request = PageRequest::TimeRange { start: cursor, end, limit };
        let page = match session.funding_page(symbol, &request).await {
            Ok(page) => page,
            Err(e) => return StopReason::PageFailed(e.to_string()),
        };

        let Some(last) = page.iter().map(|e| e.timestamp).max() else {
            return StopReason::Exhausted;
        };
        acc.add_page(page);

        if last <= cursor {
            return StopReason::Stalled;
        }
        cursor = last + ONE_MS;
    }

    StopReason::Exhausted
}

async fn offset_cursor(
    session: &mut ExchangeSession,
    symbol: &str,
    acc: &mut Accumulator,
    page_size: u32,
    max_offset: u32,
) -> StopReason {
    if page_size == 0 {
        return StopReason::Ceiling;
    }
    let mut offset = 0;

    while offset < max_offset {
        let request = PageRequest::Offset { offset, limit: page_size };
        let page = match session.funding_page(symbol, &request).await {
            Ok(page) => page,
            Err(e) => return StopReason::PageFailed(e.to_string()),
        };

        let len = page.len();
        if len == 0 {
            return StopReason::Exhausted;
        }
        acc.add_page(page);

        if len < page_size as usize {
            return StopReason::Exhausted;
        }
        offset += page_size;
    }

    StopReason::Ceiling
}

async fn page_cursor(
    session: &mut ExchangeSession,
    symbol: &str,
    acc: &mut Accumulator,
    page_size: u32,
    max_pages: u32,
) -> StopReason {
    if page_size == 0 {
        return StopReason::Ceiling;
    }
    for page_number in 1..=max_pages {
        let request = PageRequest::PageNumber { page: page_number, page_size };
        let page = match session.funding_page(symbol, &request).await {
            Ok(page) => page,
            Err(e) => return StopReason::PageFailed(e.to_string()),
        };

        let len = page.len();
        if len == 0 {
            return StopReason::Exhausted;
        }
        acc.add_page(page);

        if len < page_size as usize {
            return StopReason::Exhausted;
        }
    }

    StopReason::Ceiling
}

async fn time_windows(
    session: &mut ExchangeSession,
    symbol: &str,
    acc: &mut Accumulator,
    start: Timestamp,
    end: Timestamp,
    span: Duration,
    limit: u32,
) -> StopReason {
    let mut cursor = start;

    while cursor < end {
        let window_end = (cursor + span).min(end);
        let request = PageRequest::TimeRange { start: cursor, end: window_end, limit };
        match session.funding_page(symbol, &request).await {
            Ok(page) => acc.add_page(page),
            Err(e) => return StopReason::PageFailed(e.to_string()),
        }

        if window_end >= end {
            break;
        }
        cursor = window_end + ONE_MS;
    }

    StopReason::Exhausted
}
