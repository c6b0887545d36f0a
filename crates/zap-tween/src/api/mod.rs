pub mod info;
pub mod types;
