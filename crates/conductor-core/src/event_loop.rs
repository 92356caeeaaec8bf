//! Long-lived driver feeding market events through the pipeline.
//!
//! Events are pulled one at a time from an [`EventSource`], selected, and
//! dispatched; the resulting [`DispatchRecord`] goes to a [`DispatchObserver`]
//! before the next event is pulled. Cancellation is only honoured while
//! waiting for the next event, so a dispatch in flight always completes.

use std::future::Future;
use std::io::Write;
use std::pin::Pin;

use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::orchestrator::{DispatchContext, DispatchRecord, OutputOrchestrator};
use crate::selector::CompositionSelector;
use crate::{ConfigurationError, CoreError, MarketMetrics};

pub type EventFuture<'a> = Pin<Box<dyn Future<Output = Option<MarketMetrics>> + Send + 'a>>;

/// Ordered supply of market events. `None` ends the stream.
pub trait EventSource: Send {
    fn next_event(&mut self) -> EventFuture<'_>;
}

/// Source backed by any iterator.
#[derive(Debug)]
pub struct IterSource<I> {
    events: I,
}

impl<I> IterSource<I>
where
    I: Iterator<Item = MarketMetrics> + Send,
{
    pub fn new(events: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            events: events.into_iter(),
        }
    }
}

impl<I> EventSource for IterSource<I>
where
    I: Iterator<Item = MarketMetrics> + Send,
{
    fn next_event(&mut self) -> EventFuture<'_> {
        Box::pin(std::future::ready(self.events.next()))
    }
}

/// Source fed by a producer task through a tokio channel.
#[derive(Debug)]
pub struct ReceiverSource {
    receiver: mpsc::Receiver<MarketMetrics>,
}

impl ReceiverSource {
    pub fn new(receiver: mpsc::Receiver<MarketMetrics>) -> Self {
        Self { receiver }
    }
}

impl EventSource for ReceiverSource {
    fn next_event(&mut self) -> EventFuture<'_> {
        Box::pin(async move { self.receiver.recv().await })
    }
}

/// Source reading one JSON metrics object per line.
///
/// Blank lines are ignored. Lines that fail to parse, including lines that
/// are not valid UTF-8, are logged and skipped; a read error ends the stream.
pub struct NdjsonSource<R> {
    reader: R,
    buffer: Vec<u8>,
    line_number: u64,
    skipped: u64,
}

impl<R> NdjsonSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::new(),
            line_number: 0,
            skipped: 0,
        }
    }

    /// Number of malformed lines skipped so far.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}

impl<R> EventSource for NdjsonSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    fn next_event(&mut self) -> EventFuture<'_> {
        Box::pin(async move {
            loop {
                self.buffer.clear();
                match self.reader.read_until(b'\n', &mut self.buffer).await {
                    Ok(0) => return None,
                    Ok(_) => {}
                    Err(error) => {
                        warn!(error = %error, "metrics input read failed; ending stream");
                        return None;
                    }
                }
                self.line_number += 1;

                let line = self.buffer.trim_ascii();
                if line.is_empty() {
                    continue;
                }

                match serde_json::from_slice::<MarketMetrics>(line) {
                    Ok(metrics) => return Some(metrics),
                    Err(error) => {
                        self.skipped += 1;
                        warn!(
                            line = self.line_number,
                            error = %error,
                            "skipping malformed metrics line"
                        );
                    }
                }
            }
        })
    }
}

/// Receives every dispatch record in event order.
pub trait DispatchObserver {
    fn observe(&mut self, record: &DispatchRecord) -> Result<(), CoreError>;
}

impl DispatchObserver for Vec<DispatchRecord> {
    fn observe(&mut self, record: &DispatchRecord) -> Result<(), CoreError> {
        self.push(record.clone());
        Ok(())
    }
}

/// Writes each record as one JSON line and flushes.
pub struct NdjsonObserver<W: Write> {
    writer: W,
}

impl<W: Write> NdjsonObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DispatchObserver for NdjsonObserver<W> {
    fn observe(&mut self, record: &DispatchRecord) -> Result<(), CoreError> {
        let payload = serde_json::to_string(record)?;
        self.writer.write_all(payload.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Emits a one-line `info!` summary per record.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl DispatchObserver for TracingObserver {
    fn observe(&mut self, record: &DispatchRecord) -> Result<(), CoreError> {
        info!(
            sequence = record.sequence,
            label = %record.label,
            state = %record.state,
            frequency_hz = record.effective_frequency.unwrap_or_default(),
            failures = record.failure_count(),
            rejected = record.is_rejected(),
            "dispatch settled"
        );
        Ok(())
    }
}

/// Counters reported when a loop stops.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoopStats {
    pub processed: u64,
    pub rejected: u64,
    pub channel_failures: u64,
}

impl LoopStats {
    fn record(&mut self, record: &DispatchRecord) {
        self.processed += 1;
        if record.is_rejected() {
            self.rejected += 1;
        } else {
            self.channel_failures += record.failure_count() as u64;
        }
    }
}

/// Single-worker pipeline: select, dispatch, observe, repeat.
pub struct MarketEventLoop {
    selector: CompositionSelector,
    orchestrator: OutputOrchestrator,
    intensity_scale: f64,
}

impl MarketEventLoop {
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if the selector's catalog is incomplete;
    /// the loop cannot be started over such a catalog.
    pub fn new(
        selector: CompositionSelector,
        orchestrator: OutputOrchestrator,
        intensity_scale: f64,
    ) -> Result<Self, ConfigurationError> {
        selector.catalog().validate()?;
        Ok(Self {
            selector,
            orchestrator,
            intensity_scale,
        })
    }

    pub fn orchestrator(&self) -> &OutputOrchestrator {
        &self.orchestrator
    }

    /// Runs one event through selection and dispatch.
    ///
    /// Invalid dispatch parameters do not fail the call; they come back as a
    /// rejected record.
    pub async fn process(
        &self,
        sequence: u64,
        metrics: &MarketMetrics,
    ) -> Result<DispatchRecord, ConfigurationError> {
        let selection = self.selector.resolve(metrics)?;
        let context = DispatchContext::for_state(selection.state, self.intensity_scale);
        debug!(sequence, state = %selection.state, "selected composition");

        let mut record = match self.orchestrator.dispatch(&selection.composition, &context).await {
            Ok(record) => record,
            Err(error) => {
                warn!(sequence, error = %error, "dispatch rejected");
                DispatchRecord::rejected(&selection.composition, &context, &error)
            }
        };
        record.sequence = sequence;
        Ok(record)
    }

    /// Processes events until the source is exhausted.
    pub async fn run<S, O>(&self, source: &mut S, observer: &mut O) -> Result<LoopStats, CoreError>
    where
        S: EventSource + ?Sized,
        O: DispatchObserver + ?Sized,
    {
        self.run_until(source, observer, std::future::pending()).await
    }

    /// Processes events until the source is exhausted or `cancel` resolves.
    ///
    /// `cancel` is only raced against waiting for the next event; once an
    /// event has been pulled it is dispatched and observed in full.
    pub async fn run_until<S, O, C>(
        &self,
        source: &mut S,
        observer: &mut O,
        cancel: C,
    ) -> Result<LoopStats, CoreError>
    where
        S: EventSource + ?Sized,
        O: DispatchObserver + ?Sized,
        C: Future<Output = ()>,
    {
        tokio::pin!(cancel);
        let mut stats = LoopStats::default();
        info!(intensity_scale = self.intensity_scale, "market event loop started");

        loop {
            let next = tokio::select! {
                biased;
                _ = &mut cancel => {
                    info!(processed = stats.processed, "market event loop cancelled");
                    break;
                }
                next = source.next_event() => next,
            };

            let Some(metrics) = next else {
                info!(processed = stats.processed, "event source exhausted");
                break;
            };

            let record = self.process(stats.processed + 1, &metrics).await?;
            stats.record(&record);
            observer.observe(&record)?;
        }

        Ok(stats)
    }
}
