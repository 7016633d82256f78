pub mod ignores;
pub mod objects;
pub mod status;
