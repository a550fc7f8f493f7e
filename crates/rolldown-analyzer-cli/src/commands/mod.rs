//! Command implementations.
//!
//! Each command loads the layered configuration, validates it for its mode,
//! and runs the analysis on a blocking thread.

pub mod generate;
pub mod generate_data;
pub mod utils;

pub use generate::execute as generate_execute;
pub use generate_data::execute as generate_data_execute;
