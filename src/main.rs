#![allow(clippy::uninlined_format_args)]

mod args;
mod commands;
mod config;

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;

use commands::Output;

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = args::Args::parse_from(wild::args_os());

    let result = commands::execute_command(&args)
        .and_then(|output| print(output).context("could not write to stdout"));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{} {:?}", "error:".red().bold(), error);
            ExitCode::FAILURE
        }
    }
}

fn print(output: Output) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    match output {
        Output::Message(message) => {
            if message.is_empty() {
                return Ok(());
            }
            stdout.write_all(message.as_bytes())?;
            if !message.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
        }
        Output::Raw(bytes) => stdout.write_all(&bytes)?,
    }
    stdout.flush()
}
