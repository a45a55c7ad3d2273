pub mod label;
pub mod profile;
pub mod quantize;
pub mod segment;
