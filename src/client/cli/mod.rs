mod client;
mod command;
mod io;

pub use client::CliClient;
pub use command::Command;
pub use io::{Speaker, print_colored};
