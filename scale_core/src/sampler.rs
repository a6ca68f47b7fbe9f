//! Background advertisement sampling.
//!
//! Spawns a thread that owns the `AdvertisementSource`, stamps every
//! advertisement with the clock on arrival and forwards it over a bounded
//! channel. The thread stops when the `Sampler` is dropped, when the consumer
//! disconnects, or when the source reports the end of its stream.
//!
//! Each `Sampler` owns exactly one thread and joins it on drop.
use crate::error::ScaleError;
use crate::source_error::map_source_error;
use crossbeam_channel as xch;
use scale_traits::clock::Clock;
use scale_traits::{Advertisement, AdvertisementSource};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Channel depth; a slow consumer applies back-pressure beyond this.
const CHANNEL_CAPACITY: usize = 64;
/// How often a blocked send re-checks the shutdown flag.
const SEND_POLL: Duration = Duration::from_millis(20);
/// Pause after a source error so a failing radio does not spin the thread.
const ERROR_BACKOFF: Duration = Duration::from_millis(10);

/// An advertisement plus the clock reading taken when it arrived.
#[derive(Debug, Clone)]
pub struct Stamped {
    pub at: Instant,
    pub advertisement: Advertisement,
}

pub struct Sampler {
    rx: xch::Receiver<Stamped>,
    errors: Arc<AtomicU64>,
    exhausted: Arc<AtomicBool>,
    shutdown: Arc<AtomicBool>,
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl Sampler {
    pub fn spawn<S, C>(mut source: S, read_timeout: Duration, clock: C) -> Self
    where
        S: AdvertisementSource + Send + 'static,
        C: Clock + Send + Sync + 'static,
    {
        let (tx, rx) = xch::bounded::<Stamped>(CHANNEL_CAPACITY);
        let shutdown = Arc::new(AtomicBool::new(false));
        let errors = Arc::new(AtomicU64::new(0));
        let exhausted = Arc::new(AtomicBool::new(false));
        let (shutdown_t, errors_t, exhausted_t) =
            (shutdown.clone(), errors.clone(), exhausted.clone());

        let join_handle = std::thread::spawn(move || {
            'outer: loop {
                if shutdown_t.load(Ordering::Relaxed) {
                    tracing::debug!("sampler thread received shutdown signal");
                    break;
                }

                match source.next_advertisement(read_timeout) {
                    Ok(Some(advertisement)) => {
                        let mut item = Stamped {
                            at: clock.now(),
                            advertisement,
                        };
                        loop {
                            match tx.send_timeout(item, SEND_POLL) {
                                Ok(()) => break,
                                Err(xch::SendTimeoutError::Timeout(back)) => {
                                    if shutdown_t.load(Ordering::Relaxed) {
                                        break 'outer;
                                    }
                                    item = back;
                                }
                                Err(xch::SendTimeoutError::Disconnected(_)) => {
                                    tracing::debug!("sampler consumer disconnected, exiting thread");
                                    break 'outer;
                                }
                            }
                        }
                    }
                    Ok(None) => {
                        tracing::debug!("advertisement source exhausted");
                        exhausted_t.store(true, Ordering::Relaxed);
                        break;
                    }
                    Err(e) => {
                        errors_t.fetch_add(1, Ordering::Relaxed);
                        match map_source_error(e.as_ref()) {
                            ScaleError::Timeout => tracing::trace!("no advertisement within read timeout"),
                            other => tracing::debug!(error = %other, "advertisement source error"),
                        }
                        clock.sleep(ERROR_BACKOFF.min(read_timeout));
                    }
                }
            }
            tracing::trace!("sampler thread exiting cleanly");
        });

        Self {
            rx,
            errors,
            exhausted,
            shutdown,
            join_handle: Some(join_handle),
        }
    }

    /// Wait up to `timeout` for the next advertisement.
    ///
    /// `Disconnected` means the thread is gone and everything it sent has been
    /// drained.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Stamped, xch::RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    /// Next advertisement if one is already queued.
    pub fn try_next(&self) -> Option<Stamped> {
        self.rx.try_recv().ok()
    }

    /// Source errors seen so far (timeouts included).
    pub fn error_count(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }

    /// True once the source has reported the end of its stream.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted.load(Ordering::Relaxed)
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);

        // The thread exits after its current read returns (bounded by the read
        // timeout) or within one SEND_POLL if it is blocked on a full channel.
        if let Some(handle) = self.join_handle.take() {
            match handle.join() {
                Ok(()) => tracing::trace!("sampler thread joined"),
                Err(e) => tracing::warn!(?e, "sampler thread panicked during shutdown"),
            }
        }
    }
}
