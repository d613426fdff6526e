//! Console rendering helpers

use crate::generator::FULL_SCALE;

/// Width of the progress bar, in characters
pub const BAR_WIDTH: usize = 20;

const FILLED: char = '█';
const EMPTY: char = '░';

/// Render `value` (0-100) as a fixed-width proportional bar
///
/// Values above 100 render as a full bar.
pub fn load_bar(value: u32, width: usize) -> String {
    let value = value.min(FULL_SCALE) as usize;
    let filled = value * width / FULL_SCALE as usize;

    let mut bar = String::with_capacity(width * FILLED.len_utf8());
    bar.extend(std::iter::repeat(FILLED).take(filled));
    bar.extend(std::iter::repeat(EMPTY).take(width - filled));
    bar
}

/// One progress line for a reporter tick
pub fn tick_line(tick: u32, label: &str, value: u32) -> String {
    format!(
        "   Tick {:2}: {} [{}] {}%",
        tick,
        label,
        load_bar(value, BAR_WIDTH),
        value
    )
}
