use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum CourseEvent {
    Key(KeyEvent),
    Resize,
    /// Drives simulated video playback
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait CourseEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<CourseEvent, RecvTimeoutError>;
}

/// Production event source reading crossterm events on a helper thread
pub struct CrosstermEventSource {
    rx: Receiver<CourseEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let forwarded = match event::read() {
                // only presses; release/repeat events would double-toggle steps
                Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                    Some(CourseEvent::Key(key))
                }
                Ok(CtEvent::Resize(_, _)) => Some(CourseEvent::Resize),
                Ok(_) => None,
                Err(_) => break,
            };
            if let Some(ev) = forwarded {
                if tx.send(ev).is_err() {
                    break;
                }
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CourseEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<CourseEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms.max(1)))
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Channel-fed event source for headless tests
pub struct TestEventSource {
    rx: Receiver<CourseEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<CourseEvent>) -> Self {
        Self { rx }
    }
}

impl CourseEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<CourseEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the application one event/tick at a time
pub struct Runner<E: CourseEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: CourseEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to tick interval and returns the next event, or Tick on timeout
    pub fn step(&self) -> CourseEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                CourseEvent::Tick
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[test]
    fn step_returns_tick_on_timeout() {
        let (_tx, rx) = mpsc::channel();
        let runner = Runner::new(TestEventSource::new(rx), FixedTicker::from_millis(1));

        assert!(matches!(runner.step(), CourseEvent::Tick));
    }

    #[test]
    fn step_passes_through_events_in_order() {
        let (tx, rx) = mpsc::channel();
        tx.send(CourseEvent::Resize).unwrap();
        tx.send(CourseEvent::Key(KeyEvent::new(
            KeyCode::Enter,
            KeyModifiers::NONE,
        )))
        .unwrap();
        let runner = Runner::new(TestEventSource::new(rx), FixedTicker::from_millis(10));

        assert!(matches!(runner.step(), CourseEvent::Resize));
        match runner.step() {
            CourseEvent::Key(key) => assert_eq!(key.code, KeyCode::Enter),
            other => panic!("expected key event, got {other:?}"),
        }
    }

    #[test]
    fn zero_interval_is_raised_to_one_millisecond() {
        assert_eq!(FixedTicker::from_millis(0).interval(), Duration::from_millis(1));
    }
}
