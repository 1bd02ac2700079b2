pub mod env;
pub mod git;
pub mod process;
pub mod shell;
