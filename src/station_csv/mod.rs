pub mod aggregate;
pub mod aggregator;
pub mod encoding;
pub mod error;
pub mod reader;
