//! Terminal helpers - spinners and styled step output

pub mod progress;
pub mod styling;

pub use progress::*;
pub use styling::*;
