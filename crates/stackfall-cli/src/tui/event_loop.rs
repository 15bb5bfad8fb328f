use std::time::{Duration, Instant};

use crossterm::event;

use super::event::TuiEvent;

/// Event loop state management.
///
/// Emits a tick every `tick_interval`, a render after every tick or terminal event, and
/// blocks on the terminal in between.
#[derive(Debug)]
pub(super) struct EventLoop {
    tick_interval: Duration,
    last_tick: Instant,
    dirty: bool,
}

impl EventLoop {
    pub(super) fn new(tick_interval: Duration) -> Self {
        Self {
            tick_interval,
            last_tick: Instant::now(),
            dirty: true, // Initial render is required on startup
        }
    }

    /// Returns the next event.
    pub(super) fn next(&mut self) -> anyhow::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if now.duration_since(self.last_tick) >= self.tick_interval {
                self.last_tick = now;
                self.dirty = true;
                return Ok(TuiEvent::Tick);
            }

            if self.dirty {
                self.dirty = false;
                return Ok(TuiEvent::Render);
            }

            if !event::poll(self.timeout(now))? {
                continue;
            }

            self.dirty = true;
            return Ok(event::read()?.into());
        }
    }

    fn timeout(&self, now: Instant) -> Duration {
        (self.last_tick + self.tick_interval).saturating_duration_since(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_event_is_render() {
        let mut events = EventLoop::new(Duration::from_secs(3600));
        assert!(events.next().unwrap().is_render());
    }

    #[test]
    fn test_timeout_counts_down_to_next_tick() {
        let events = EventLoop::new(Duration::from_millis(100));
        let later = events.last_tick + Duration::from_millis(30);
        assert_eq!(events.timeout(later), Duration::from_millis(70));
        let overdue = events.last_tick + Duration::from_millis(150);
        assert_eq!(events.timeout(overdue), Duration::ZERO);
    }
}
