//! Core traits and types for clock-accurate hardware simulation.
//!
//! Every model advances on rising edges of a single clock. Asynchronous
//! inputs are applied by the owner between edges, never inside `tick()`.

mod clock;
mod observable;
mod tickable;
mod ticks;

pub use clock::MasterClock;
pub use observable::{Observable, Value};
pub use tickable::Tickable;
pub use ticks::Ticks;
