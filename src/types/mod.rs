pub mod data_source;
pub mod location;
pub mod record;
pub mod year_chunk;
