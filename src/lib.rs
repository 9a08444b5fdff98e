// Library surface for headless/integration tests and reuse.
// The binary in main.rs only adds argument parsing and terminal setup.
pub mod app;
pub mod celebration;
pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod runtime;
pub mod session;
pub mod ui;
pub mod util;
pub mod verse;
pub mod words;

pub use app::App;
pub use session::{Advance, SessionController, Snapshot};
pub use verse::Verse;
pub use words::{Phase, SessionState, WordToken};
