//! Debounced values.
//!
//! A [`Debouncer`] holds a rapidly changing input (e.g. the text of a search
//! box) and publishes it on a [`watch`] channel only once the input has stayed
//! unchanged for the configured delay. Every change restarts the timer, so a
//! burst of keystrokes results in a single published value: the last one.
//!
//! Timers run as tokio tasks, so [`Debouncer::set`] must be called from
//! within a tokio runtime.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Delay used when none is configured.
pub const DEFAULT_DEBOUNCE_DELAY: Duration = Duration::from_millis(500);

/// Convert a configured millisecond delay; zero and negative values mean
/// "publish immediately".
pub fn delay_from_millis(millis: i64) -> Duration {
    u64::try_from(millis).map_or(Duration::ZERO, Duration::from_millis)
}

/// Publishes the latest input after it has been stable for `delay`.
pub struct Debouncer<T> {
    delay: Duration,
    input: T,
    output: Arc<watch::Sender<T>>,
    // Bumped under the channel lock; a timer only publishes if its
    // generation is still current.
    generation: Arc<AtomicU64>,
    pending: Option<JoinHandle<()>>,
}

impl<T> Debouncer<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    pub fn new(initial: T, delay: Duration) -> Self {
        let (output, _) = watch::channel(initial.clone());
        Self {
            delay,
            input: initial,
            output: Arc::new(output),
            generation: Arc::new(AtomicU64::new(0)),
            pending: None,
        }
    }

    pub fn with_default_delay(initial: T) -> Self {
        Self::new(initial, DEFAULT_DEBOUNCE_DELAY)
    }

    /// Record a new input value and restart the quiescence timer.
    ///
    /// Setting the value the input already holds is not a change and leaves
    /// any pending timer untouched.
    pub fn set(&mut self, value: T) {
        if value == self.input {
            return;
        }
        self.input = value.clone();
        let generation = self.invalidate_pending();

        if self.delay.is_zero() {
            publish(&self.output, value);
            return;
        }

        let delay = self.delay;
        let output = Arc::clone(&self.output);
        let current_generation = Arc::clone(&self.generation);
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            output.send_if_modified(|current| {
                if current_generation.load(Ordering::Acquire) != generation || *current == value {
                    return false;
                }
                *current = value;
                true
            });
        }));
        tracing::trace!("debounce timer scheduled in {:?}", delay);
    }

    /// Publish the current input now, skipping the remaining delay.
    pub fn flush(&mut self) {
        self.invalidate_pending();
        publish(&self.output, self.input.clone());
    }

    /// Cancel any pending update. The published value stays as it is and
    /// becomes the input again, so setting the cancelled value later
    /// schedules a fresh publish.
    pub fn cancel(&mut self) {
        if self.pending.is_some() {
            self.invalidate_pending();
            self.input = self.output.borrow().clone();
            tracing::trace!("debounce timer cancelled");
        }
    }

    /// The raw, undebounced input.
    pub const fn input(&self) -> &T {
        &self.input
    }

    /// The last published (debounced) value.
    pub fn current(&self) -> T {
        self.output.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.output.subscribe()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    pub const fn delay(&self) -> Duration {
        self.delay
    }

    fn invalidate_pending(&mut self) -> u64 {
        let mut next = 0;
        self.output.send_if_modified(|_| {
            next = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
            false
        });
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        next
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

fn publish<T: PartialEq>(output: &watch::Sender<T>, value: T) {
    output.send_if_modified(|current| {
        if *current == value {
            return false;
        }
        *current = value;
        true
    });
}
