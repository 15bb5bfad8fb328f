use std::time::Duration;

use super::{App, event::TuiEvent, event_loop::EventLoop};

/// Terminal runner driving an [`App`] at a fixed tick rate.
#[derive(Debug)]
pub struct Tui {
    events: EventLoop,
}

impl Tui {
    /// Creates a runner ticking `rate` times per second.
    pub fn with_tick_rate(rate: f64) -> Self {
        Self {
            events: EventLoop::new(Duration::from_secs_f64(1.0 / rate)),
        }
    }

    /// Runs `app` until it asks to exit.
    ///
    /// - `Tick`: calls `app.update()`
    /// - `Render`: calls `app.draw()`
    /// - `Crossterm`: calls `app.handle_event()`
    pub fn run<A>(mut self, app: &mut A) -> anyhow::Result<()>
    where
        A: App,
    {
        ratatui::run(|terminal| {
            while !app.should_exit() {
                match self.events.next()? {
                    TuiEvent::Tick => app.update(),
                    TuiEvent::Render => {
                        terminal.draw(|f| app.draw(f))?;
                    }
                    TuiEvent::Crossterm(event) => app.handle_event(&event),
                }
            }
            Ok(())
        })
    }
}
