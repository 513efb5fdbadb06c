//! Interactive configuration port

use std::io;

/// Source of the one-time forward swap count answer
pub trait SwapCountPrompt: Send + Sync {
    /// Ask for the swap count and return the raw answer
    fn ask(&self, default: u32, max: u32) -> io::Result<String>;
}
