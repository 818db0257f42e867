//! Stock-analysis state machine.
//!
//! ```text
//!            select_symbol            run_analysis
//!   Idle ───────────────▶ Selected ───────────────▶ Fetching
//!                            ▲  ▲                     │   │
//!                            │  │        run_analysis │   │ ok
//!         select_symbol      │  └──── Failed ◀────────┘   ▼
//!         (from any state) ──┘           err            Ready
//! ```
//!
//! Fetching is split in two so the caller can keep handling user input
//! while a request is in flight: [`AnalysisOrchestrator::run_analysis`]
//! hands out a [`FetchTicket`], and [`AnalysisOrchestrator::complete`]
//! applies the result only if the ticket still matches the current
//! selection. Responses for a superseded selection are dropped.

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::analytics::{cumulative_returns, rolling_volatility, VolatilityPoint};
use crate::api::SnapshotSource;
use crate::indicators::{classify, Signals};
use crate::window::window;
use crate::{
    FetchError, OptionsSummary, SeriesPoint, StockMetrics, StockSnapshot, Ticker, TimeHorizon,
    ValidationError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisState {
    Idle,
    Selected,
    Fetching,
    Ready,
    Failed,
}

impl AnalysisState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Selected => "selected",
            Self::Fetching => "fetching",
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }
}

impl Display for AnalysisState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Selection-related state as seen by the view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    pub selected_symbol: Option<Ticker>,
    pub analysis_armed: bool,
    pub horizon: TimeHorizon,
}

/// Proof that a snapshot fetch was started for a given selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    ticker: Ticker,
    generation: u64,
}

impl FetchTicket {
    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Run the fetch this ticket was issued for.
    pub async fn fetch<S>(&self, source: &S) -> Result<StockSnapshot, FetchError>
    where
        S: SnapshotSource + ?Sized,
    {
        source.fetch_snapshot(&self.ticker).await
    }
}

#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The result was recorded; the machine is now `Ready` or `Failed`.
    Applied(AnalysisState),
    /// The selection changed while the request was in flight.
    Discarded,
}

/// Render-ready data for the current snapshot and horizon.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisView {
    snapshot: Arc<StockSnapshot>,
    horizon: TimeHorizon,
    series: Vec<SeriesPoint>,
    signals: Signals,
}

impl AnalysisView {
    fn derive(snapshot: Arc<StockSnapshot>, horizon: TimeHorizon, today: Date) -> Self {
        let series = window(&snapshot.series, horizon, today);
        let signals = classify(&snapshot.metrics);
        Self {
            snapshot,
            horizon,
            series,
            signals,
        }
    }

    pub fn ticker(&self) -> &Ticker {
        &self.snapshot.ticker
    }

    pub fn current_price(&self) -> f64 {
        self.snapshot.current_price
    }

    pub fn horizon(&self) -> TimeHorizon {
        self.horizon
    }

    /// Series narrowed to the active horizon.
    pub fn series(&self) -> &[SeriesPoint] {
        &self.series
    }

    /// Labels derived from the full-history metrics.
    pub fn signals(&self) -> Signals {
        self.signals
    }

    pub fn metrics(&self) -> &StockMetrics {
        &self.snapshot.metrics
    }

    pub fn options_summary(&self) -> Option<&OptionsSummary> {
        self.snapshot.options_summary.as_ref()
    }

    pub fn snapshot(&self) -> &Arc<StockSnapshot> {
        &self.snapshot
    }

    /// Returns compounded from the first point of the displayed window.
    pub fn cumulative_returns(&self) -> Vec<f64> {
        cumulative_returns(&self.series)
    }

    pub fn rolling_volatility(&self, window: usize) -> Result<Vec<VolatilityPoint>, ValidationError> {
        rolling_volatility(&self.series, window)
    }
}

/// Where "today" comes from when windowing.
#[derive(Debug, Clone, Copy)]
enum ReferenceDate {
    Clock(fn() -> Date),
    Fixed(Date),
}

impl ReferenceDate {
    fn resolve(self) -> Date {
        match self {
            Self::Clock(today) => today(),
            Self::Fixed(date) => date,
        }
    }
}

fn utc_today() -> Date {
    OffsetDateTime::now_utc().date()
}

#[derive(Debug, Clone)]
enum Phase {
    Idle,
    Selected,
    Fetching,
    Ready(AnalysisView),
    Failed(FetchError),
}

#[derive(Debug)]
pub struct AnalysisOrchestrator {
    selected: Option<Ticker>,
    horizon: TimeHorizon,
    phase: Phase,
    generation: u64,
    reference: ReferenceDate,
}

impl Default for AnalysisOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisOrchestrator {
    /// Orchestrator windowing against the current UTC date, read each time
    /// a window is derived.
    pub fn new() -> Self {
        Self::with_clock(utc_today)
    }

    /// Orchestrator windowing against whatever `today` returns.
    pub fn with_clock(today: fn() -> Date) -> Self {
        Self::with_reference(ReferenceDate::Clock(today))
    }

    /// Orchestrator windowing against a fixed date.
    pub fn with_reference_date(today: Date) -> Self {
        Self::with_reference(ReferenceDate::Fixed(today))
    }

    fn with_reference(reference: ReferenceDate) -> Self {
        Self {
            selected: None,
            horizon: TimeHorizon::default(),
            phase: Phase::Idle,
            generation: 0,
            reference,
        }
    }

    pub fn state(&self) -> AnalysisState {
        match self.phase {
            Phase::Idle => AnalysisState::Idle,
            Phase::Selected => AnalysisState::Selected,
            Phase::Fetching => AnalysisState::Fetching,
            Phase::Ready(_) => AnalysisState::Ready,
            Phase::Failed(_) => AnalysisState::Failed,
        }
    }

    pub fn selection(&self) -> SelectionState {
        SelectionState {
            selected_symbol: self.selected.clone(),
            analysis_armed: matches!(
                self.phase,
                Phase::Fetching | Phase::Ready(_) | Phase::Failed(_)
            ),
            horizon: self.horizon,
        }
    }

    pub fn selected_symbol(&self) -> Option<&Ticker> {
        self.selected.as_ref()
    }

    pub fn horizon(&self) -> TimeHorizon {
        self.horizon
    }

    pub fn reference_date(&self) -> Date {
        self.reference.resolve()
    }

    /// Choose a symbol. Disarms analysis and drops any displayed snapshot;
    /// results of fetches started earlier will be discarded.
    pub fn select_symbol(&mut self, ticker: Ticker) {
        log::debug!("selected {ticker}");
        self.selected = Some(ticker);
        self.phase = Phase::Selected;
        self.generation += 1;
    }

    /// Return to `Idle`, invalidating any in-flight fetch.
    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.phase = Phase::Idle;
        self.generation += 1;
    }

    /// Whether the run action should be enabled.
    pub fn can_run_analysis(&self) -> bool {
        self.selected.is_some() && matches!(self.phase, Phase::Selected | Phase::Failed(_))
    }

    /// Arm analysis for the selected symbol and move to `Fetching`.
    pub fn run_analysis(&mut self) -> Result<FetchTicket, ValidationError> {
        let Some(ticker) = self.selected.clone() else {
            return Err(ValidationError::NoSymbolSelected);
        };
        if !self.can_run_analysis() {
            return Err(ValidationError::AnalysisNotRunnable {
                state: self.state().as_str(),
            });
        }

        self.generation += 1;
        self.phase = Phase::Fetching;
        log::debug!("fetching snapshot for {ticker} (generation {})", self.generation);

        Ok(FetchTicket {
            ticker,
            generation: self.generation,
        })
    }

    /// Apply the result of the fetch identified by `ticket`.
    ///
    /// The result is kept only if, at this moment, the machine is still
    /// `Fetching` for the same ticket and the same selected ticker.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<StockSnapshot, FetchError>,
    ) -> FetchOutcome {
        let current = matches!(self.phase, Phase::Fetching)
            && ticket.generation == self.generation
            && self.selected.as_ref() == Some(&ticket.ticker);

        if !current {
            log::warn!(
                "discarding stale snapshot response for {} (generation {}, current {})",
                ticket.ticker,
                ticket.generation,
                self.generation
            );
            return FetchOutcome::Discarded;
        }

        self.phase = match result {
            Ok(snapshot) => {
                log::info!(
                    "snapshot ready for {} with {} points",
                    ticket.ticker,
                    snapshot.series.len()
                );
                Phase::Ready(AnalysisView::derive(
                    snapshot.into_shared(),
                    self.horizon,
                    self.reference_date(),
                ))
            }
            Err(error) => {
                log::warn!("snapshot fetch for {} failed: {error}", ticket.ticker);
                Phase::Failed(error)
            }
        };

        FetchOutcome::Applied(self.state())
    }

    /// Run the full fetch cycle against `source` without interleaving.
    pub async fn analyze<S>(&mut self, source: &S) -> Result<FetchOutcome, ValidationError>
    where
        S: SnapshotSource + ?Sized,
    {
        let ticket = self.run_analysis()?;
        let result = ticket.fetch(source).await;
        Ok(self.complete(ticket, result))
    }

    /// Change the displayed horizon. Re-windows the current snapshot when
    /// `Ready`; otherwise the horizon applies to the next snapshot.
    pub fn set_horizon(&mut self, horizon: TimeHorizon) {
        self.horizon = horizon;
        self.rederive();
    }

    /// Pin the reference date used for windowing.
    pub fn set_reference_date(&mut self, today: Date) {
        self.reference = ReferenceDate::Fixed(today);
        self.rederive();
    }

    /// Re-window the displayed snapshot against the current reference date,
    /// e.g. after the clock has crossed midnight.
    pub fn refresh(&mut self) {
        self.rederive();
    }

    fn rederive(&mut self) {
        if let Phase::Ready(view) = &self.phase {
            let snapshot = Arc::clone(view.snapshot());
            let today = self.reference_date();
            self.phase = Phase::Ready(AnalysisView::derive(snapshot, self.horizon, today));
        }
    }

    /// Displayed data, present only in `Ready`.
    pub fn view(&self) -> Option<&AnalysisView> {
        match &self.phase {
            Phase::Ready(view) => Some(view),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match &self.phase {
            Phase::Failed(error) => Some(error),
            _ => None,
        }
    }

    /// Inline message for the `Failed` state.
    pub fn error_message(&self) -> Option<String> {
        self.error().map(FetchError::message)
    }
}
