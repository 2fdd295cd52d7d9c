// Acquisition clock of the digitizer: 125 MHz CPU clock, 25 MHz internal oscillator
pub const DEFAULT_CLOCK_HZ: f64 = 1.25e8;

// Both record layouts share this size. Checked against the field tables in layout.rs
pub const RECORD_SIZE_BYTES: usize = 20;

// Files produced from this month onward use the current layout
pub const CURRENT_LAYOUT_YEAR: i32 = 2024;
pub const CURRENT_LAYOUT_MONTH: u8 = 10;

// Default channel selection, inclusive
pub const DEFAULT_FIRST_CHANNEL: u32 = 0;
pub const DEFAULT_LAST_CHANNEL: u32 = 15;

pub const DEFAULT_OUTPUT_EXTENSION: &str = "txt";
