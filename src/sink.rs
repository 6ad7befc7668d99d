pub mod file;
pub mod sqlite;
