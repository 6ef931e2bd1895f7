pub mod entity;
pub mod repo;
pub mod schema;
