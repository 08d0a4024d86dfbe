//! Small helpers shared by the KMZ tools: logging setup, JSON files on disk, and a timer that
//! narrates long-running batch work.

#[macro_use]
extern crate log;

pub mod logger;

mod io;
mod time;
mod utils;

pub use crate::io::{read_json, to_json, write_json};
pub use crate::time::{elapsed_seconds, prettyprint_time, Timer};
pub use crate::utils::{basename, prettyprint_usize};
