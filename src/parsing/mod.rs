pub mod script_csv;

pub use script_csv::{load_script_lines, read_script_lines, EpisodeCatalog};
