pub mod prompt_loader;

pub use prompt_loader::{load_prompt_table, parse_prompt_table, resolve_prompt_table};
