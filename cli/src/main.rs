//! Interactive shell for the WeftDB property-graph store

mod commands;

use anyhow::Result;
use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use weftdb::graph::Graph;
use weftdb::persistence;

use commands::Outcome;

#[derive(Parser, Debug)]
#[command(name = "weftdb", version, about = "Interactive shell for the WeftDB property-graph store")]
struct Args {
    /// Load a snapshot before starting the shell
    #[arg(long, value_name = "FILE")]
    load: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut graph = match &args.load {
        Some(path) => persistence::load(path)?,
        None => Graph::new(),
    };

    println!("{}", commands::help_text());

    let mut editor = DefaultEditor::new()?;
    loop {
        match editor.readline("> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line.as_str());
                match commands::execute(&mut graph, &line) {
                    Ok(Outcome::Exit) => break,
                    Ok(Outcome::Message(message)) => println!("{message}"),
                    Err(error) => eprintln!("Error: {error}"),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(error) => return Err(error.into()),
        }
    }

    println!("Exiting.");
    Ok(())
}
