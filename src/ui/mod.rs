pub mod prompt;
pub mod progress;

pub use prompt::{Confirmer, ScriptedConfirmer, TerminalConfirmer};
pub use progress::{create_probe_bar, create_spinner, tick_probe};
