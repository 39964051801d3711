//! Writer implementations

pub mod channel;
#[cfg(feature = "console")]
pub mod console;
pub mod file;
pub mod json;
pub mod memory;
pub mod socket;

pub use channel::{ChannelWriter, OverflowPolicy};
#[cfg(feature = "console")]
pub use console::ConsoleWriter;
pub use file::FileWriter;
pub use json::JsonWriter;
pub use memory::{MemoryHandle, MemoryWriter};
pub use socket::SocketWriter;

pub use crate::core::LogWriter;
