pub mod assembla;
pub mod git;
pub mod prefs_file;
pub mod terminal;
