//! Bounded channels between the painter workers.
//!
//! [`Channel`] is a non-blocking queue built on `critical-section` and
//! `heapless::Deque`, used for control messages polled between frames.
//! [`HandOff`] is the blocking variant that moves frame buffers between the
//! generator and the writer. Both have a fixed capacity and never allocate
//! after construction.

use core::cell::RefCell;
use std::sync::{Condvar, Mutex as StdMutex, MutexGuard, PoisonError};

use critical_section::Mutex;
use heapless::Deque;

/// Error returned when trying to send to a full channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrySendError<T>(pub T);

/// Error returned when trying to receive from an empty channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TryReceiveError;

/// A bounded, thread-safe, non-blocking channel.
pub struct Channel<T, const SIZE: usize> {
    inner: Mutex<RefCell<Deque<T, SIZE>>>,
}

impl<T, const SIZE: usize> Channel<T, SIZE> {
    /// Create a new empty channel.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Try to send a value into the channel.
    ///
    /// Returns `Err(TrySendError(value))` if the channel is full.
    pub fn try_send(&self, value: T) -> Result<(), TrySendError<T>> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.push_back(value).map_err(TrySendError)
        })
    }

    /// Try to receive a value from the channel.
    ///
    /// Returns `Err(TryReceiveError)` if the channel is empty.
    pub fn try_receive(&self) -> Result<T, TryReceiveError> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.pop_front().ok_or(TryReceiveError)
        })
    }
}

impl<T, const SIZE: usize> Default for Channel<T, SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// Error returned by [`HandOff`] operations once the queue is closed.
///
/// A rejected send gives the value back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Closed<T>(pub T);

struct HandOffState<T, const SIZE: usize> {
    queue: Deque<T, SIZE>,
    closed: bool,
}

/// A bounded blocking queue handing values from one worker to another.
///
/// `send` waits while the queue is full and `receive` waits while it is
/// empty. [`HandOff::close`] drops whatever is queued and wakes every
/// waiter; later operations fail with [`Closed`].
pub struct HandOff<T, const SIZE: usize> {
    state: StdMutex<HandOffState<T, SIZE>>,
    not_empty: Condvar,
    not_full: Condvar,
}

impl<T, const SIZE: usize> HandOff<T, SIZE> {
    pub const fn new() -> Self {
        Self {
            state: StdMutex::new(HandOffState {
                queue: Deque::new(),
                closed: false,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
        }
    }

    // Poisoned locks are recovered, no update leaves the deque half written.
    fn lock(&self) -> MutexGuard<'_, HandOffState<T, SIZE>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Send a value, waiting for room
    pub fn send(&self, value: T) -> Result<(), Closed<T>> {
        let mut state = self.lock();
        while !state.closed && state.queue.is_full() {
            state = self
                .not_full
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        if state.closed {
            return Err(Closed(value));
        }
        // Room was checked under the same lock.
        if let Err(value) = state.queue.push_back(value) {
            return Err(Closed(value));
        }
        drop(state);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Send a value without waiting; a full or closed queue gives it back
    pub fn try_send(&self, value: T) -> Result<(), TrySendError<T>> {
        let mut state = self.lock();
        if state.closed {
            return Err(TrySendError(value));
        }
        state.queue.push_back(value).map_err(TrySendError)?;
        drop(state);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Receive a value, waiting for one to arrive
    pub fn receive(&self) -> Result<T, Closed<()>> {
        let mut state = self.lock();
        loop {
            if state.closed {
                return Err(Closed(()));
            }
            if let Some(value) = state.queue.pop_front() {
                drop(state);
                self.not_full.notify_one();
                return Ok(value);
            }
            state = self
                .not_empty
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Close the queue, dropping queued values
    ///
    /// Closing twice is a no-op.
    pub fn close(&self) {
        let mut state = self.lock();
        state.closed = true;
        state.queue.clear();
        drop(state);
        self.not_empty.notify_all();
        self.not_full.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }
}

impl<T, const SIZE: usize> Default for HandOff<T, SIZE> {
    fn default() -> Self {
        Self::new()
    }
}
