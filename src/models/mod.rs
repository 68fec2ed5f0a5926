pub mod document;
pub mod loaders;
pub mod mode;
pub mod prompt_table;

pub use document::{Document, FileGroup};
pub use loaders::{load_prompt_table, resolve_prompt_table};
pub use mode::{parse_modes, Mode};
pub use prompt_table::PromptTable;
