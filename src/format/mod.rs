pub mod container;
pub mod header;

pub use container::{read_blocks, read_ezc_file, write_blocks, write_ezc_file};
pub use header::{EzcHeader, EZC_MAGIC, EZC_VERSION, HEADER_SIZE};
