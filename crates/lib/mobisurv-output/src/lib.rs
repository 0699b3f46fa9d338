#![forbid(unsafe_code)]

pub use arrow;
pub use parquet;

pub mod logger;
pub mod result;
pub mod tables;
pub mod writer;
