mod auto_scroll;
mod engine;
mod host;
mod long_press;
mod session;
#[cfg(test)]
mod testing;

pub use auto_scroll::{edge_scroll_speed, AutoScroller};
pub use engine::{GestureEngine, GestureOutcome};
pub use host::{FrameScheduler, FrameTicket, GridSurface, HapticError, TimerTicket};
pub use long_press::{FiredPress, LongPressDetector};
pub use session::{DragPhase, DragSession, SessionError, SessionEvent, SessionResult};
