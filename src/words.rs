/// One space-delimited unit of the verse. `id` is its position in the
/// source text and is the only identity used for updates, since the same
/// word can appear more than once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordToken {
    pub id: usize,
    pub text: String,
    pub hidden: bool,
}

impl WordToken {
    /// Placeholder that keeps the word's length as a hint.
    pub fn masked(&self, mask: char) -> String {
        std::iter::repeat(mask).take(self.text.chars().count()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Playing,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub words: Vec<WordToken>,
    pub phase: Phase,
}

/// Split `text` on single spaces into visible tokens with ids `0..N`.
/// Punctuation stays attached to its word. Empty text gives no tokens.
pub fn initialize(text: &str) -> SessionState {
    let words = if text.is_empty() {
        Vec::new()
    } else {
        text.split(' ')
            .enumerate()
            .map(|(id, word)| WordToken {
                id,
                text: word.to_string(),
                hidden: false,
            })
            .collect()
    };

    SessionState {
        words,
        phase: Phase::Playing,
    }
}

/// Ids of every visible token, in display order.
pub fn visible_ids(state: &SessionState) -> Vec<usize> {
    state
        .words
        .iter()
        .filter(|w| !w.hidden)
        .map(|w| w.id)
        .collect()
}

pub fn hidden_count(state: &SessionState) -> usize {
    state.words.iter().filter(|w| w.hidden).count()
}

/// A session with no words is never complete.
pub fn is_complete(state: &SessionState) -> bool {
    !state.words.is_empty() && state.words.iter().all(|w| w.hidden)
}
