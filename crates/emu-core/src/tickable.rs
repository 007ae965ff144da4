//! Trait for components that advance on clock edges.

use crate::Ticks;

/// A component that advances on rising clock edges.
///
/// Synchronous state changes happen here and nowhere else. Level-sensitive
/// inputs such as an asynchronous reset are driven through the component's
/// own setters and take effect as soon as they change.
pub trait Tickable {
    /// Advance the component by one rising clock edge.
    fn tick(&mut self);

    /// Advance the component by multiple edges.
    ///
    /// Default implementation calls `tick()` in a loop. Components may
    /// override for efficiency, but must produce identical results.
    fn tick_n(&mut self, count: Ticks) {
        for _ in 0..count.get() {
            self.tick();
        }
    }
}
