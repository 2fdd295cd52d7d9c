//! # caen_extract
//!
//! caen_extract turns the packed binary list-mode files written by the CAEN digitizers
//! used in the BIFROST detector tests into per-channel text files. Each record holds a
//! 64-bit timestamp split over two words, the tube/group channel and the amplitudes read
//! at both ends of the resistive wire. From these we reconstruct the event time in seconds
//! and the charge-division position `x = (a - b) / (a + b)`.
//!
//! ## Installation
//!
//! Currently the only method of install is from source. If you have not used Rust before
//! see the [Rust docs](https://www.rust-lang.org/tools/install) for installation
//! instructions. To build and install the CLI use `cargo install --path ./caen_extract_cli`
//! from the top level repository. This installs the `caen_extract` binary to your cargo
//! install location (typically `~/.cargo/bin/`).
//!
//! ## Use
//!
//! ```bash
//! caen_extract run_042.dat -c 0-7 -o ./out/
//! ```
//!
//! writes `./out/run_042_channel_00.txt` through `./out/run_042_channel_07.txt`. Channels
//! can be given as a single index (`3`), a comma separated list (`4,3,8,9`) or an
//! inclusive range (`0-15`, the default). If the output is not an existing directory its
//! last component is used as the file prefix, so `-o ./out/tubes` writes
//! `./out/tubes_channel_00.txt` and so on.
//!
//! Every line of an output file is one event:
//!
//! ```text
//! <amplitude a, 6 wide>\t<amplitude b, 6 wide>\t<x, 16 wide with 13 decimals>
//! ```
//!
//! Events are ordered by time. An event with `a + b == 0` has an undefined position and
//! is written with `NaN` (or `inf`) in the x column.
//!
//! ## Record Layouts
//!
//! There are two record layouts, both 20 bytes of little-endian unsigned integers:
//!
//! ```text
//! legacy:  time_high(u32) time_low(u32) unused(u16) group(u8) id_flags(u8) ampl_a..d(u16)
//! current: time_high(u32) time_low(u32) flags_om(u8) group(u8) unused(u16) ampl_a..d(u16)
//! ```
//!
//! Files produced before October 2024 use the legacy layout. The layout is picked from the
//! creation time of the file. Not every filesystem keeps a creation time; when it is
//! missing today's date is used, which selects the current layout. Use a `layout_pivot`
//! (or `--pivot`) to override this for old files copied onto such a filesystem.
//!
//! ## Configuration
//!
//! A configuration file can be used instead of (or along with) the command line flags.
//! Make a template with `caen_extract new -p config.yml`. The YAML format is:
//!
//! ```yml
//! clock_hz: 125000000.0
//! channels: 0-15
//! sort: true
//! layout_pivot: null
//! trailing_bytes: fail
//! output: null
//! extension: txt
//! n_threads: 1
//! ```
//!
//! - `clock_hz`: digitizer clock used to turn ticks into seconds
//! - `layout_pivot`: `YYYY-MM-DD` date (or RFC 3339 timestamp) used to pick the layout
//! - `trailing_bytes`: `fail` refuses files that are not a whole number of records,
//! `discard` drops the partial record at the end
//! - `n_threads`: number of workers the channels are divided amongst. The file is only
//! decoded once regardless.
pub mod channel_selection;
pub mod config;
pub mod constants;
pub mod dat_file;
pub mod dataset;
pub mod error;
pub mod event;
pub mod extractor;
pub mod layout;
pub mod process;
pub mod worker_status;
