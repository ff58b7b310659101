pub mod writer_raw;

pub use writer_raw::write_raw;
