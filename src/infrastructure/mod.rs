pub mod command;

pub use command::{check_binary, CommandRunner};
