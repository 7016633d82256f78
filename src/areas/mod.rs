pub mod config;
pub mod database;
pub mod index;
pub mod repository;
pub mod workspace;
