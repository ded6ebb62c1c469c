pub mod branch;
pub mod change;
pub mod merge;
pub mod preferences;
pub mod repo;
pub mod ticket;
