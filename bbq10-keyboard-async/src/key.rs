//! Key events drained from the device FIFO.

use heapless::{String, Vec};

use crate::reg::key_state;

/// Default number of events the key log holds.
pub const DEFAULT_LOG_CAPACITY: usize = 64;

/// State of a key in a FIFO entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    /// No activity.
    Idle,
    /// The key went down.
    Pressed,
    /// The key is being held.
    Held,
    /// The key went up.
    Released,
}

impl KeyState {
    /// Maps a FIFO state code to a state. Codes above 3 are not defined.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            key_state::IDLE => Some(Self::Idle),
            key_state::PRESSED => Some(Self::Pressed),
            key_state::HELD => Some(Self::Held),
            key_state::RELEASED => Some(Self::Released),
            _ => None,
        }
    }
}

/// A single FIFO entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The character reported by the firmware.
    pub key: char,
    /// What happened to the key.
    pub state: KeyState,
}

impl KeyEvent {
    /// Builds an event from the raw FIFO record `[state, character]`.
    pub fn from_bytes(buf: [u8; 2]) -> Option<Self> {
        let state = KeyState::from_code(buf[0])?;
        Some(Self {
            key: char::from(buf[1]),
            state,
        })
    }
}

/// Append-only record of the key events drained so far.
///
/// The driver never removes entries; callers prune with
/// [`KeyLog::clear`] or by taking the log out of the driver.
#[derive(Debug, Clone, Default)]
pub struct KeyLog<const N: usize> {
    events: Vec<KeyEvent, N>,
}

impl<const N: usize> KeyLog<N> {
    /// Creates an empty log.
    pub const fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Appends an event. Gives it back if the log is full.
    pub fn push(&mut self, event: KeyEvent) -> Result<(), KeyEvent> {
        self.events.push(event)
    }

    /// Events in the order they were drained.
    pub fn events(&self) -> &[KeyEvent] {
        &self.events
    }

    /// Number of logged events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if nothing was logged.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Returns `true` once the log holds `N` events.
    pub fn is_full(&self) -> bool {
        self.events.is_full()
    }

    /// Drops every logged event.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Characters of the `Pressed` events, in log order.
    pub fn input_buffer(&self) -> String<N> {
        let mut typed = String::new();
        for event in self.events.iter().filter(|e| e.state == KeyState::Pressed) {
            // At most N pressed events fit in the log, so this cannot overflow
            // for ASCII keys. Wider characters are dropped once full.
            if typed.push(event.key).is_err() {
                break;
            }
        }
        typed
    }
}
