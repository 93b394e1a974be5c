//! `minijava-compiler` reads one MiniJava source file and prints its parse tree.
//!
//! ```bash
//! minijava-compiler exemplo.minijava
//! minijava-compiler --tokens exemplo.minijava
//! RUST_LOG=minijava_compiler=trace minijava-compiler exemplo.minijava
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser as _;
use tracing_subscriber::EnvFilter;

use minijava_compiler::{Parser, tokenize};

/// Parse a MiniJava program and print its syntax tree.
#[derive(clap::Parser, Debug)]
#[command(name = "minijava-compiler", version)]
struct Args {
    /// Source file to parse.
    #[arg(default_value = "exemplo.minijava")]
    file: PathBuf,

    /// Print the token stream instead of the tree.
    #[arg(long)]
    tokens: bool,
}

fn main() -> Result<()> {
    // stdout 只输出语法树，日志写到 stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let args = Args::parse();

    let source = fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    tracing::info!(file = %args.file.display(), bytes = source.len(), "read source");

    let tokens = tokenize(&source)?;

    if args.tokens {
        for token in &tokens {
            println!("{token}");
        }
        return Ok(());
    }

    let tree = Parser::new(tokens).parse_program()?;
    println!("{tree}");

    Ok(())
}
