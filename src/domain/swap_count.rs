//! Swap count input validation

pub const DEFAULT_SWAP_COUNT: u32 = 3;
pub const MAX_SWAP_COUNT: u32 = 50;

/// Parse a user-entered forward swap count.
///
/// Anything that is not an integer in `[1, max]` resolves to `default`.
pub fn parse_swap_count(input: &str, default: u32, max: u32) -> u32 {
    match input.trim().parse::<u32>() {
        Ok(count) if (1..=max).contains(&count) => count,
        _ => default,
    }
}
