use std::{
    sync::mpsc::{self, RecvTimeoutError, Sender},
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use chrono::{DateTime, Utc};
use log::{debug, error};

use crate::{clock::Clock, errors::ItineraryError};

/// Default refresh period of the tracker.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// A repeating timer that samples a clock and hands the instant to a callback.
///
/// The first tick fires as soon as the timer starts; later ticks follow every
/// `interval`.
pub struct Timer<C: Clock> {
    clock: C,
    interval: Duration,
}

/// Keeps a started [`Timer`] alive. Stopping or dropping the handle cancels
/// the timer and waits for its thread to finish.
pub struct TimerHandle {
    stop_tx: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl<C: Clock + 'static> Timer<C> {
    pub fn new(clock: C, interval: Duration) -> Self {
        Self { clock, interval }
    }

    /// Starts the timer and executes the callback with the sampled instant
    /// and the tick count on each tick.
    pub fn start(
        self,
        mut tick_callback: impl FnMut(DateTime<Utc>, usize) + Send + 'static,
    ) -> Result<TimerHandle, ItineraryError> {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let worker = thread::Builder::new()
            .name("refresh-timer".to_string())
            .spawn(move || {
                let mut tick_count = 0;
                loop {
                    let started = Instant::now();

                    tick_count += 1;
                    tick_callback(self.clock.now(), tick_count);

                    let wait = self.interval.saturating_sub(started.elapsed());
                    match stop_rx.recv_timeout(wait) {
                        Err(RecvTimeoutError::Timeout) => continue,
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                debug!("Refresh timer stopped after {tick_count} tick(s).");
            })
            .map_err(|e| ItineraryError::Spawn(e.to_string()))?;

        Ok(TimerHandle {
            stop_tx: Some(stop_tx),
            worker: Some(worker),
        })
    }
}

impl TimerHandle {
    pub fn stop(&mut self) {
        // Dropping the sender wakes the worker.
        self.stop_tx.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("Refresh timer thread panicked.");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use chrono::TimeZone;

    use super::*;
    use crate::clock::FixedClock;

    #[test]
    fn test_first_tick_is_immediate() {
        let instant = Utc.with_ymd_and_hms(2024, 12, 24, 18, 0, 0).unwrap();
        let (tick_tx, tick_rx) = mpsc::channel();

        let _handle = Timer::new(FixedClock(instant), Duration::from_secs(3600))
            .start(move |now, count| {
                let _ = tick_tx.send((now, count));
            })
            .unwrap();

        let (now, count) = tick_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(now, instant);
        assert_eq!(count, 1);
    }

    #[test]
    fn test_ticks_repeat_with_increasing_count() {
        let instant = Utc.with_ymd_and_hms(2024, 12, 24, 18, 0, 0).unwrap();
        let (tick_tx, tick_rx) = mpsc::channel();

        let mut handle = Timer::new(FixedClock(instant), Duration::from_millis(10))
            .start(move |_, count| {
                let _ = tick_tx.send(count);
            })
            .unwrap();

        let counts: Vec<usize> = (0..3)
            .map(|_| tick_rx.recv_timeout(Duration::from_secs(5)).unwrap())
            .collect();
        handle.stop();

        assert_eq!(counts, vec![1, 2, 3]);
    }

    #[test]
    fn test_dropping_handle_stops_promptly() {
        let ticks = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&ticks);

        let handle = Timer::new(FixedClock(Utc::now()), Duration::from_secs(3600))
            .start(move |_, _| {
                if let Ok(mut ticks) = counter.lock() {
                    *ticks += 1;
                }
            })
            .unwrap();
        assert!(handle.is_running());

        let started = Instant::now();
        drop(handle);

        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(*ticks.lock().unwrap(), 1);
    }
}
