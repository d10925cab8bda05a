mod args;
mod commands;
mod repl;

pub use args::CliArgs;
pub use repl::{run_repl, send_and_print};
