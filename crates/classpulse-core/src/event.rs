//! The global event lifecycle flag.

use std::sync::atomic::{AtomicBool, Ordering};

/// Whether a feedback event is currently live.
///
/// Exactly one boolean, one source of truth: no history and no queue of
/// past events. Setting the same value twice is a no-op. The flag may be
/// flipped while submissions are in flight; `submit` reads it once at
/// entry, so a submission accepted just before the event closes stands.
#[derive(Debug, Default)]
pub struct EventState {
    live: AtomicBool,
}

impl EventState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the flag unconditionally. Admin-only at the boundary.
    pub fn set_live(&self, live: bool) {
        self.live.store(live, Ordering::SeqCst);
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_closed_and_toggles() {
        let event = EventState::new();
        assert!(!event.is_live());
        event.set_live(true);
        assert!(event.is_live());
        event.set_live(true);
        assert!(event.is_live());
        event.set_live(false);
        assert!(!event.is_live());
    }
}
