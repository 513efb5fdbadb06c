//! Interactive swap count prompt on stdin

use std::io::{self, BufRead, Write};

use crate::ports::SwapCountPrompt;

#[derive(Debug, Default)]
pub struct StdinPrompt;

impl SwapCountPrompt for StdinPrompt {
    fn ask(&self, default: u32, max: u32) -> io::Result<String> {
        print!("How many swaps per wallet? (1-{}, default {}): ", max, default);
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().lock().read_line(&mut input)?;
        Ok(input)
    }
}
