//! Calculator session: a three-phase state machine driven by UI events.

pub mod controller;
/// Session events and errors.
pub mod event;
pub mod file;
pub mod snapshot;

pub use controller::{CalculatorSession, Phase, SessionState};
pub use event::{SessionError, SessionEvent};
pub use file::SessionFile;
pub use snapshot::SessionSnapshot;
