use std::time::Instant;

use tracing::info;

use crate::celebration::CelebrationAnimation;
use crate::config::DEFAULT_MASK;
use crate::input::Intent;
use crate::session::{Advance, SessionController};

/// Everything the event loop drives and the UI draws
#[derive(Debug)]
pub struct App {
    pub session: SessionController,
    pub celebration: CelebrationAnimation,
    pub mask: char,
    viewport: (u16, u16),
}

impl App {
    pub fn new(session: SessionController, mask: char) -> Self {
        Self {
            session,
            celebration: CelebrationAnimation::default(),
            mask,
            viewport: (80, 24),
        }
    }

    /// Terminal size used to place celebration bursts.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.viewport = (width, height);
    }

    /// The advance control is disabled once every word is hidden,
    /// independently of the session's own guard.
    pub fn can_advance(&self) -> bool {
        !self.session.is_all_hidden()
    }

    /// Apply a user intent. Returns true when the app should exit.
    pub fn dispatch(&mut self, intent: Intent, now: Instant) -> bool {
        match intent {
            Intent::Advance => {
                if self.can_advance() {
                    self.advance(now);
                }
                false
            }
            Intent::Reset => {
                self.celebration.cancel();
                self.session.reset();
                false
            }
            Intent::Quit => {
                info!(
                    hidden = self.session.hidden_count(),
                    total = self.session.total(),
                    "quit"
                );
                true
            }
        }
    }

    fn advance(&mut self, now: Instant) {
        if let Advance::Ignored = self.session.advance() {
            return;
        }
        if self.session.take_celebration() {
            let (width, height) = self.viewport;
            self.celebration.start(width, height, now);
        }
    }

    /// Step animations. Returns whether a redraw is needed.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        let was_active = self.celebration.is_active;
        let active = self.celebration.tick(now);
        was_active || active
    }
}

impl From<SessionController> for App {
    fn from(session: SessionController) -> Self {
        Self::new(session, DEFAULT_MASK)
    }
}
