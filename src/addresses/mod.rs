//! Address intake: uploaded text artifact → raw address strings.

pub mod reader;

pub use reader::{parse_addresses, read_addresses, ReadOptions};
