//! Terminal input and timers, merged into one channel.
//!
//! A background task owns the crossterm `EventStream` plus two intervals:
//! a one-second countdown tick and a faster frame tick. The app loop only
//! ever awaits [`EventReader::next`].

use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    /// New terminal size as (cols, rows).
    Resize(u16, u16),
    /// Once per `countdown` period.
    Tick,
    /// Once per `frame` period.
    Render,
}

/// Timer periods for the reader.
#[derive(Debug, Clone, Copy)]
pub struct Rates {
    pub countdown: Duration,
    pub frame: Duration,
}

impl Default for Rates {
    fn default() -> Self {
        Self {
            countdown: Duration::from_secs(1),
            frame: Duration::from_millis(100),
        }
    }
}

pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl EventReader {
    /// Spawn the reader task. It runs until [`stop`](Self::stop), drop, or
    /// the receiving side going away.
    pub fn spawn(rates: Rates) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        tokio::spawn(read_loop(tx, rates, cancel.clone()));
        Self { rx, cancel }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn skipping(period: Duration) -> Interval {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

async fn read_loop(tx: mpsc::UnboundedSender<Event>, rates: Rates, cancel: CancellationToken) {
    let mut input = EventStream::new();
    let mut countdown = skipping(rates.countdown);
    let mut frame = skipping(rates.frame);

    // An interval's first tick is immediate; the countdown must wait a full period.
    countdown.tick().await;

    loop {
        let event = tokio::select! {
            () = cancel.cancelled() => break,
            _ = countdown.tick() => Event::Tick,
            _ = frame.tick() => Event::Render,
            next = input.next() => match next {
                Some(Ok(raw)) => match translate(raw) {
                    Some(event) => event,
                    None => continue,
                },
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "terminal input error");
                    continue;
                }
                None => break,
            },
        };

        if tx.send(event).is_err() {
            break;
        }
    }
}

/// Keep key presses and resizes; drop releases, repeats, mouse and focus.
fn translate(raw: CrosstermEvent) -> Option<Event> {
    match raw {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        CrosstermEvent::Resize(w, h) => Some(Event::Resize(w, h)),
        _ => None,
    }
}
