pub mod axis;
pub mod client;
pub mod error;
pub mod fetcher;
pub mod records;
pub mod response;
