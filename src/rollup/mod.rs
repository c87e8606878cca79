pub mod error;
pub mod monthly;
