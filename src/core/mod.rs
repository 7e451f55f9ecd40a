pub mod canon;
pub mod converter;
pub mod engine;
pub mod sequence;
pub mod sign_table;
pub mod types;
