use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, info};

use crate::util::percentage;
use crate::verse::Verse;
use crate::words::{self, Phase, SessionState, WordToken};

/// Result of a single `advance()` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The token with this id was hidden; words remain visible.
    Hid(usize),
    /// The token with this id was the last visible one.
    Completed(usize),
    /// Nothing to hide, or the session is already complete.
    Ignored,
}

/// One-shot guard for the completion signal. Fires once per
/// Playing -> Completed transition and re-arms only on reset.
#[derive(Debug, Default)]
struct CelebrationSignal {
    fired: bool,
    pending: bool,
}

impl CelebrationSignal {
    fn raise(&mut self) {
        if !self.fired {
            self.fired = true;
            self.pending = true;
        }
    }

    fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    fn rearm(&mut self) {
        *self = Self::default();
    }
}

/// Read-only view handed to the presentation layer
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub words: &'a [WordToken],
    pub phase: Phase,
    pub hidden_count: usize,
    pub total: usize,
}

impl Snapshot<'_> {
    pub fn percentage(&self) -> u16 {
        percentage(self.hidden_count, self.total)
    }

    pub fn is_all_hidden(&self) -> bool {
        self.total > 0 && self.hidden_count == self.total
    }

    /// Ids still shown, in display order.
    pub fn visible_ids(&self) -> Vec<usize> {
        self.words
            .iter()
            .filter(|w| !w.hidden)
            .map(|w| w.id)
            .collect()
    }

    pub fn is_completed(&self) -> bool {
        self.phase == Phase::Completed
    }
}

/// Owns the session state for one verse; the only writer of it.
#[derive(Debug)]
pub struct SessionController {
    verse: Verse,
    state: SessionState,
    rng: StdRng,
    signal: CelebrationSignal,
}

impl SessionController {
    pub fn new(verse: Verse) -> Self {
        Self::with_rng(verse, StdRng::from_entropy())
    }

    /// Deterministic word order, for tests and `--seed`.
    pub fn with_seed(verse: Verse, seed: u64) -> Self {
        Self::with_rng(verse, StdRng::seed_from_u64(seed))
    }

    fn with_rng(verse: Verse, rng: StdRng) -> Self {
        let state = words::initialize(&verse.text);
        Self {
            verse,
            state,
            rng,
            signal: CelebrationSignal::default(),
        }
    }

    pub fn verse(&self) -> &Verse {
        &self.verse
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            words: &self.state.words,
            phase: self.state.phase,
            hidden_count: self.hidden_count(),
            total: self.total(),
        }
    }

    /// Start over with every word visible.
    pub fn reset(&mut self) {
        self.state = words::initialize(&self.verse.text);
        self.signal.rearm();
        info!(total = self.total(), "session reset");
    }

    /// Hide one visible word chosen uniformly at random.
    pub fn advance(&mut self) -> Advance {
        if self.state.phase == Phase::Completed {
            debug!("advance ignored: already completed");
            return Advance::Ignored;
        }

        let visible = words::visible_ids(&self.state);
        if visible.is_empty() {
            debug!("advance ignored: nothing visible");
            return Advance::Ignored;
        }

        let id = visible[self.rng.gen_range(0..visible.len())];
        if let Some(word) = self.state.words.iter_mut().find(|w| w.id == id) {
            word.hidden = true;
        }

        if words::is_complete(&self.state) {
            self.state.phase = Phase::Completed;
            self.signal.raise();
            info!(id, total = self.total(), "all words hidden");
            Advance::Completed(id)
        } else {
            debug!(id, hidden = self.hidden_count(), "word hidden");
            Advance::Hid(id)
        }
    }

    /// True exactly once after the transition into `Completed`.
    pub fn take_celebration(&mut self) -> bool {
        self.signal.take()
    }

    pub fn hidden_count(&self) -> usize {
        words::hidden_count(&self.state)
    }

    pub fn total(&self) -> usize {
        self.state.words.len()
    }

    pub fn percentage(&self) -> u16 {
        percentage(self.hidden_count(), self.total())
    }

    pub fn is_all_hidden(&self) -> bool {
        self.total() > 0 && self.hidden_count() == self.total()
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }
}
