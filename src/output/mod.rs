//! # Output Module
//!
//! Everything the bridge drives: the virtual keyboard and the volume/halt
//! system commands.

pub mod sink;
pub mod system;

pub use sink::{EventSink, VirtualKeyboard};
pub use system::{ShellSystemControl, SystemControl};
