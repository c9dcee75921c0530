//! Cancellable roll animation.
//!
//! While a party is "rolling", a background thread keeps printing random
//! faces of the die until the front end calls [`RollTicker::stop`]. The
//! ticker only draws from `rand::thread_rng`; the adjudicated roll comes
//! from the match RNG after the ticker has stopped.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rand::Rng;

use crate::rules::RollRequest;

/// Shown instead of numbers while the roller is garbled.
pub const GARBLED_CHARS: &str = "!@#$%^&*?";

/// How long `stop` waits for the ticker thread.
pub const JOIN_TIMEOUT: Duration = Duration::from_secs(1);

/// Smallest tick interval the ticker honors.
const MIN_TICK: Duration = Duration::from_millis(10);

/// One frame of the animation, `tick` counting from 0.
#[must_use]
pub fn ticker_frame(request: &RollRequest, value: i64, tick: usize) -> String {
    let face = if request.garbled {
        garbled_char(tick).to_string()
    } else {
        value.to_string()
    };
    format!("\r{} [{}]: {face}   ", request.label, request.dice)
}

fn garbled_char(tick: usize) -> char {
    let chars = GARBLED_CHARS.as_bytes();
    chars[tick % chars.len()] as char
}

/// A running ticker thread.
pub struct RollTicker {
    stop: Arc<AtomicBool>,
    finished: Receiver<usize>,
    handle: Option<JoinHandle<()>>,
}

impl RollTicker {
    /// Start animating `request` into `out`.
    pub fn start<W>(request: &RollRequest, mut out: W) -> Self
    where
        W: Write + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let (done, finished) = mpsc::channel();
        let request = request.clone();
        let interval = Duration::from_millis(request.interval_ms).max(MIN_TICK);

        let flag = Arc::clone(&stop);
        let handle = thread::spawn(move || {
            let mut rng = rand::thread_rng();
            let mut ticks = 0;
            while !flag.load(Ordering::Acquire) {
                let value = rng.gen_range(request.dice.min_value..=request.dice.sides);
                // A closed terminal is not worth failing the match over.
                let _ = write!(out, "{}", ticker_frame(&request, value, ticks));
                let _ = out.flush();
                ticks += 1;
                thread::sleep(interval);
            }
            let _ = write!(out, "\r");
            let _ = out.flush();
            let _ = done.send(ticks);
        });

        Self {
            stop,
            finished,
            handle: Some(handle),
        }
    }

    /// Whether `stop` has been requested.
    #[must_use]
    pub fn is_stopping(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    /// Signal the thread and wait up to [`JOIN_TIMEOUT`] for it.
    ///
    /// Returns the number of frames drawn, or `None` if the thread did not
    /// finish in time (it is then left to exit on its own).
    pub fn stop(mut self) -> Option<usize> {
        self.stop.store(true, Ordering::Release);
        let ticks = self.finished.recv_timeout(JOIN_TIMEOUT).ok()?;
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("roll ticker thread panicked");
            }
        }
        Some(ticks)
    }
}

impl Drop for RollTicker {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
    }
}
