pub mod catalog;
pub mod fk;
pub mod search;
