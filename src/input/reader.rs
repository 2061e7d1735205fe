//! Background input reader.
//!
//! Terminal reads block, so the reader runs on tokio's blocking pool and polls
//! with a short timeout. Between polls it checks a stop flag, which bounds how
//! long [`InputReader::stop`] waits. Messages go to the game loop over an
//! unbounded channel; the loop is the only consumer.

use crate::input::{translate_event, InputEvent, InputHandler, SessionMessage};
use crate::{CrawlError, CrawlResult};
use crossterm::event;
use log::{debug, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Source of input events.
pub trait EventSource: Send + 'static {
    /// Waits up to `timeout` for the next relevant event.
    ///
    /// Returns `Ok(None)` when nothing relevant arrived in time.
    fn poll_event(&mut self, timeout: Duration) -> CrawlResult<Option<InputEvent>>;
}

/// Reads events from the real terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct CrosstermEvents;

impl EventSource for CrosstermEvents {
    fn poll_event(&mut self, timeout: Duration) -> CrawlResult<Option<InputEvent>> {
        if event::poll(timeout)? {
            Ok(translate_event(&event::read()?))
        } else {
            Ok(None)
        }
    }
}

/// Handle to a running input task.
#[derive(Debug)]
pub struct InputReader {
    stop: Arc<AtomicBool>,
    task: JoinHandle<CrawlResult<()>>,
}

impl InputReader {
    /// Starts reading from `source` and returns the handle with the receiving
    /// end of the message channel.
    ///
    /// The task ends on its own after sending [`SessionMessage::Quit`], when
    /// the receiver is dropped, or when the source fails. In every case the
    /// sender is dropped, so the loop sees a closed channel.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<S: EventSource>(
        mut source: S,
        handler: InputHandler,
        poll_interval: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<SessionMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let task = tokio::task::spawn_blocking(move || {
            while !stop_flag.load(Ordering::Relaxed) {
                let event = match source.poll_event(poll_interval) {
                    Ok(Some(event)) => event,
                    Ok(None) => continue,
                    Err(e) => {
                        warn!("Input source failed: {}", e);
                        return Err(e);
                    }
                };

                let Some(message) = handler.to_message(event) else {
                    continue;
                };

                debug!("Input message: {:?}", message);
                if tx.send(message).is_err() {
                    debug!("Message receiver closed, stopping input reader");
                    break;
                }
                if message == SessionMessage::Quit {
                    break;
                }
            }
            Ok(())
        });

        (Self { stop, task }, rx)
    }

    /// Checks whether the task has already ended.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Asks the task to stop and waits for it.
    ///
    /// Returns the source's error if reading failed.
    pub async fn stop(self) -> CrawlResult<()> {
        self.stop.store(true, Ordering::Relaxed);
        match self.task.await {
            Ok(result) => result,
            Err(e) => Err(CrawlError::Input(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, GridConvention, Position};
    use std::collections::VecDeque;

    /// Replays a fixed list of events, then stays silent.
    struct ScriptedEvents {
        events: VecDeque<InputEvent>,
    }

    impl ScriptedEvents {
        fn new(events: Vec<InputEvent>) -> Self {
            Self {
                events: events.into(),
            }
        }
    }

    impl EventSource for ScriptedEvents {
        fn poll_event(&mut self, timeout: Duration) -> CrawlResult<Option<InputEvent>> {
            match self.events.pop_front() {
                Some(event) => Ok(Some(event)),
                None => {
                    std::thread::sleep(timeout);
                    Ok(None)
                }
            }
        }
    }

    struct BrokenEvents;

    impl EventSource for BrokenEvents {
        fn poll_event(&mut self, _timeout: Duration) -> CrawlResult<Option<InputEvent>> {
            Err(CrawlError::Io(std::io::Error::other("terminal went away")))
        }
    }

    fn handler() -> InputHandler {
        InputHandler::new(GridConvention::Axial, 20, 20)
    }

    #[tokio::test]
    async fn test_reader_forwards_messages_in_order() {
        let source = ScriptedEvents::new(vec![
            InputEvent::Move(Direction::Right),
            InputEvent::Click { column: 0, row: 1 },
            InputEvent::Click { column: 5, row: 1 },
            InputEvent::Quit,
            InputEvent::Move(Direction::Left),
        ]);
        let (reader, mut rx) = InputReader::spawn(source, handler(), Duration::from_millis(5));

        assert_eq!(rx.recv().await, Some(SessionMessage::Step(Direction::Right)));
        assert_eq!(
            rx.recv().await,
            Some(SessionMessage::TargetSelected(Position::new(2, 1)))
        );
        assert_eq!(rx.recv().await, Some(SessionMessage::Quit));
        // The reader ends after quitting and closes the channel.
        assert_eq!(rx.recv().await, None);
        assert!(reader.stop().await.is_ok());
    }

    #[tokio::test]
    async fn test_stop_ends_idle_reader() {
        let (reader, mut rx) = InputReader::spawn(
            ScriptedEvents::new(Vec::new()),
            handler(),
            Duration::from_millis(5),
        );
        assert!(!reader.is_finished());
        assert!(reader.stop().await.is_ok());
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_source_error_is_reported() {
        let (reader, mut rx) =
            InputReader::spawn(BrokenEvents, handler(), Duration::from_millis(5));
        assert_eq!(rx.recv().await, None);
        assert!(matches!(reader.stop().await, Err(CrawlError::Io(_))));
    }
}
