mod config;
mod session;

pub use config::{ChatConfig, DEFAULT_SYSTEM_INSTRUCTION};
pub use session::ChatSession;
