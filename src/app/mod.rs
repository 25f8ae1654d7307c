// Interactive front end: the explorer loop driven by prompts.

pub mod session;

pub use session::{print_table, run_explorer};
