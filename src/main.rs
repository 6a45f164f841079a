//! Command-line front end for the ibarat matching engine

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use ibarat::{
    compile_pattern, extract_snippet, highlight_html, nfc, segment, strip_tags,
    unescape_entities, Direction, DEFAULT_CONTEXT_AFTER, DEFAULT_CONTEXT_BEFORE,
};
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ibarat",
    about = "Arabic-aware search highlighting for classical texts"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Dir {
    Rtl,
    Ltr,
}

impl From<Dir> for Direction {
    fn from(dir: Dir) -> Self {
        match dir {
            Dir::Rtl => Direction::Rtl,
            Dir::Ltr => Direction::Ltr,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Highlight query matches in text or HTML from a file or stdin
    Highlight {
        /// Search query
        query: String,
        /// Input file (stdin when omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Reading direction of the content
        #[arg(long, value_enum, default_value = "rtl")]
        dir: Dir,
        /// Decode HTML entities before highlighting
        #[arg(long)]
        decode_entities: bool,
        /// Emit the segment list as JSON instead of <em>-wrapped output
        #[arg(long)]
        json: bool,
    },
    /// Print the context snippet around the first match, as JSON
    Snippet {
        /// Search query
        query: String,
        /// Input file (stdin when omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Context characters before the match
        #[arg(long, default_value_t = DEFAULT_CONTEXT_BEFORE)]
        before: usize,
        /// Context characters after the match
        #[arg(long, default_value_t = DEFAULT_CONTEXT_AFTER)]
        after: usize,
        /// Reading direction of the content
        #[arg(long, value_enum, default_value = "rtl")]
        dir: Dir,
    },
    /// Test whether the whole input is a single match for the query
    Check {
        /// Search query
        query: String,
        /// Text to test
        text: String,
        /// Reading direction of the content
        #[arg(long, value_enum, default_value = "rtl")]
        dir: Dir,
    },
}

fn read_input(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Highlight {
            query,
            file,
            dir,
            decode_entities,
            json,
        } => {
            let direction = Direction::from(dir);
            let mut input = read_input(file.as_ref())?;
            if decode_entities {
                input = unescape_entities(&input);
            }
            let pattern = compile_pattern(&query, direction);
            if json {
                let segments = segment(&input, pattern.as_ref());
                println!("{}", serde_json::to_string_pretty(&segments)?);
            } else {
                let out = highlight_html(&input, pattern.as_ref(), direction, |m| {
                    format!("<em>{}</em>", m)
                });
                println!("{}", out);
            }
        }
        Command::Snippet {
            query,
            file,
            before,
            after,
            dir,
        } => {
            let direction = Direction::from(dir);
            let input = read_input(file.as_ref())?;
            let text = strip_tags(&unescape_entities(&input));
            let pattern = compile_pattern(&query, direction);
            let snippet = extract_snippet(&text, pattern.as_ref(), before, after);
            println!("{}", serde_json::to_string_pretty(&snippet)?);
        }
        Command::Check { query, text, dir } => {
            let pattern = compile_pattern(&query, Direction::from(dir));
            let matched = pattern.is_some_and(|p| p.is_exact_match(&nfc(&text)));
            println!("{}", matched);
            if !matched {
                std::process::exit(1);
            }
        }
    }
    Ok(())
}
