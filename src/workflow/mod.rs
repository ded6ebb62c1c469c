pub mod lifecycle;
pub mod merge;
pub mod preferences;
pub mod ticket;
