const DEFAULT_REFERENCE: &str = "Psalm 119:105";
const DEFAULT_TEXT: &str = "Your word is a lamp for my feet, a light on my path.";
const DEFAULT_DECORATIONS: [&str; 3] = ["☁", "🕊", "✨"];

/// The verse being memorized. Loaded once at startup, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Verse {
    pub reference: String,
    pub text: String,
    pub decorations: Vec<String>,
}

impl Verse {
    pub fn new(reference: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            text: text.into(),
            decorations: default_decorations(),
        }
    }

    pub fn with_decorations(mut self, decorations: Vec<String>) -> Self {
        self.decorations = decorations;
        self
    }

    /// Symbols placed either side of the footer tagline.
    pub fn footer_decorations(&self) -> (&str, &str) {
        let at = |i: usize| self.decorations.get(i).map(String::as_str).unwrap_or("");
        (at(0), at(2))
    }
}

impl Default for Verse {
    fn default() -> Self {
        Self::new(DEFAULT_REFERENCE, DEFAULT_TEXT)
    }
}

pub fn default_decorations() -> Vec<String> {
    DEFAULT_DECORATIONS.iter().map(|d| d.to_string()).collect()
}
