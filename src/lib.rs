pub mod config;
pub mod error;
pub mod geometry;
pub mod gesture;
#[cfg(feature = "gtk")]
pub mod gtk_grid;
pub mod logging;
pub mod photo;
pub mod selection;

pub use config::{load_gesture_config, GestureConfig};
pub use error::{AppError, AppResult};
pub use gesture::{GestureEngine, GestureOutcome};
pub use photo::{PhotoId, PhotoSequence};
