//! Background ticking at a fixed rate

use crate::hex_life::Automaton;
use anyhow::{Context, Result};
use crossbeam_channel::{unbounded, RecvTimeoutError, Sender};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, warn};

/// Runs [`Automaton::tick`] on a worker thread every `1 / ups` seconds.
///
/// All access to the automaton goes through the shared mutex, so ticks never
/// overlap with each other or with the caller's own operations. Once
/// [`Ticker::stop`] returns no further tick runs.
pub struct Ticker {
    automaton: Arc<Mutex<Automaton>>,
    state: Arc<TickerState>,
    wake: Sender<()>,
    handle: Option<JoinHandle<()>>,
}

struct TickerState {
    running: AtomicBool,
    interval_nanos: AtomicU64,
    ticks: AtomicU64,
}

impl Ticker {
    pub fn start(automaton: Arc<Mutex<Automaton>>, ups: f64) -> Result<Self> {
        let state = Arc::new(TickerState {
            running: AtomicBool::new(true),
            interval_nanos: AtomicU64::new(interval_nanos(ups)?),
            ticks: AtomicU64::new(0),
        });
        let (wake, wake_rx) = unbounded::<()>();

        let worker_automaton = Arc::clone(&automaton);
        let worker_state = Arc::clone(&state);
        let handle = std::thread::Builder::new()
            .name("hex-life-ticker".to_string())
            .spawn(move || loop {
                let interval = Duration::from_nanos(worker_state.interval_nanos.load(Ordering::Acquire));
                match wake_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {}
                    // Woken by set_ups: re-read the interval
                    Ok(()) => {
                        if worker_state.running.load(Ordering::Acquire) {
                            continue;
                        }
                        break;
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                }

                let Ok(mut automaton) = worker_automaton.lock() else {
                    warn!("automaton lock poisoned, ticker exiting");
                    break;
                };
                // Checked under the lock so stop() cannot race a pending tick
                if !worker_state.running.load(Ordering::Acquire) {
                    break;
                }
                automaton.tick();
                worker_state.ticks.fetch_add(1, Ordering::AcqRel);
            })?;

        debug!(ups, "ticker started");
        Ok(Self {
            automaton,
            state,
            wake,
            handle: Some(handle),
        })
    }

    /// Change the tick rate; takes effect from the next interval
    pub fn set_ups(&self, ups: f64) -> Result<()> {
        self.state
            .interval_nanos
            .store(interval_nanos(ups)?, Ordering::Release);
        let _ = self.wake.send(());
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.state.running.load(Ordering::Acquire)
    }

    /// Ticks performed by this ticker so far
    pub fn ticks(&self) -> u64 {
        self.state.ticks.load(Ordering::Acquire)
    }

    /// Lock the shared automaton for a driver-side operation
    pub fn lock(&self) -> MutexGuard<'_, Automaton> {
        self.automaton.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stop ticking and wait for the worker to exit
    pub fn stop(&mut self) {
        {
            // Holding the lock means no tick is mid-flight while the flag flips
            let _guard = self.lock();
            self.state.running.store(false, Ordering::Release);
        }
        let _ = self.wake.send(());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("ticker thread panicked");
            }
            debug!(ticks = self.ticks(), "ticker stopped");
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Period between ticks at `ups` updates per second.
///
/// Rates so slow that the period does not fit the ticker's nanosecond
/// counter are rejected rather than truncated.
pub fn tick_interval(ups: f64) -> Result<Duration> {
    if !(ups.is_finite() && ups > 0.0) {
        anyhow::bail!("Updates per second must be a positive number, got {}", ups);
    }
    let interval = Duration::try_from_secs_f64(1.0 / ups)
        .with_context(|| format!("Updates per second {} is too slow", ups))?;
    u64::try_from(interval.as_nanos())
        .with_context(|| format!("Updates per second {} is too slow", ups))?;
    Ok(interval.max(Duration::from_nanos(1)))
}

fn interval_nanos(ups: f64) -> Result<u64> {
    // tick_interval guarantees the nanos fit
    Ok(tick_interval(ups)?.as_nanos() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn shared(size: u32, pattern: &str) -> Arc<Mutex<Automaton>> {
        let mut automaton = Automaton::new(size).unwrap();
        automaton.load_alive_string(pattern);
        Arc::new(Mutex::new(automaton))
    }

    fn wait_for_ticks(ticker: &Ticker, count: u64) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while ticker.ticks() < count {
            assert!(Instant::now() < deadline, "ticker did not reach {count} ticks");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_ticks_until_stopped() {
        let automaton = shared(4, "-1,0 0,-1");
        let mut ticker = Ticker::start(Arc::clone(&automaton), 500.0).unwrap();
        wait_for_ticks(&ticker, 3);
        ticker.stop();
        assert!(!ticker.is_running());

        let generation = automaton.lock().unwrap().generation();
        assert_eq!(generation, ticker.ticks());
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(automaton.lock().unwrap().generation(), generation);
    }

    #[test]
    fn test_stop_before_first_tick() {
        let automaton = shared(3, "0,0");
        let mut ticker = Ticker::start(Arc::clone(&automaton), 0.5).unwrap();
        ticker.stop();
        assert_eq!(ticker.ticks(), 0);
        assert_eq!(automaton.lock().unwrap().generation(), 0);
    }

    #[test]
    fn test_set_ups_speeds_up() {
        let automaton = shared(3, "0,0");
        let ticker = Ticker::start(automaton, 0.1).unwrap();
        ticker.set_ups(1000.0).unwrap();
        wait_for_ticks(&ticker, 2);
        assert!(ticker.set_ups(-1.0).is_err());
    }

    #[test]
    fn test_driver_operations_interleave_with_ticks() {
        let automaton = shared(4, "");
        let ticker = Ticker::start(automaton, 500.0).unwrap();
        ticker.lock().resize(6).unwrap();
        wait_for_ticks(&ticker, 1);
        let guard = ticker.lock();
        assert_eq!(guard.size(), 6);
        assert_eq!(guard.grid().check_invariants(), Ok(()));
    }

    #[test]
    fn test_invalid_rate() {
        assert!(Ticker::start(shared(2, ""), 0.0).is_err());
        assert!(Ticker::start(shared(2, ""), f64::NAN).is_err());
    }

    #[test]
    fn test_tiny_rates_are_rejected() {
        // 1 / ups overflows Duration entirely
        assert!(tick_interval(1e-20).is_err());
        // Fits a Duration but not the u64 nanosecond counter
        assert!(tick_interval(1.0 / 18_446_744_074.0).is_err());
        assert!(Ticker::start(shared(2, ""), 1e-20).is_err());

        let ticker = Ticker::start(shared(2, ""), 0.5).unwrap();
        assert!(ticker.set_ups(1e-20).is_err());
        assert!(ticker.is_running());
    }

    #[test]
    fn test_tick_interval_bounds() {
        assert_eq!(tick_interval(4.0).unwrap(), Duration::from_millis(250));
        assert_eq!(tick_interval(1e12).unwrap(), Duration::from_nanos(1));
        // Slowest rates that still fit
        assert!(tick_interval(1.0 / 3600.0).is_ok());
        assert!(tick_interval(1.0 / 1.0e9).is_ok());
    }
}
