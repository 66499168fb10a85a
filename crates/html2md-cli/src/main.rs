use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use html2md::{parse_document, parse_html, ConvertOptions, Converter, RenderOptions};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "html2md")]
#[command(about = "Convert HTML to Markdown")]
#[command(version)]
struct Cli {
    /// HTML file to convert; `-` or nothing reads stdin
    input: Option<PathBuf>,

    /// Write Markdown here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Bullet marker for unordered lists
    #[arg(long, default_value_t = '-', value_parser = parse_bullet)]
    bullet: char,

    /// Thematic break string, e.g. `---`, `***` or `* * *`
    #[arg(long, default_value = "---", value_parser = parse_hr, allow_hyphen_values = true)]
    hr: String,

    /// Fail on nodes nested deeper than this
    #[arg(long, value_name = "N")]
    max_depth: Option<usize>,

    /// Parse the input as a fragment instead of a full document
    #[arg(long)]
    fragment: bool,

    /// Log conversion details to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn parse_bullet(value: &str) -> std::result::Result<char, String> {
    match value {
        "-" | "*" | "+" => Ok(value.chars().next().unwrap_or('-')),
        _ => Err(format!("`{value}` is not a list marker; use -, * or +")),
    }
}

/// Accept three or more of one of `-`, `*` or `_`, optionally spaced
fn parse_hr(value: &str) -> std::result::Result<String, String> {
    let marks: Vec<char> = value.chars().filter(|c| *c != ' ' && *c != '\t').collect();
    let valid = marks.len() >= 3
        && matches!(marks[0], '-' | '*' | '_')
        && marks.iter().all(|c| *c == marks[0]);
    if valid {
        Ok(value.trim().to_string())
    } else {
        Err(format!("`{value}` is not a thematic break; use e.g. ---, *** or ___"))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let html = read_input(cli.input.as_ref())?;
    let root = if cli.fragment {
        parse_html(&html)
    } else {
        parse_document(&html)
    };

    let options = ConvertOptions {
        max_depth: cli.max_depth,
        render: RenderOptions {
            bullet_list_marker: cli.bullet,
            hr: cli.hr,
            ..RenderOptions::default()
        },
    };
    let converter = Converter::new().with_options(options);
    let mut markdown = converter
        .convert(&root)
        .context("failed to convert HTML to Markdown")?;
    markdown.push('\n');

    match cli.output {
        Some(path) => {
            fs::write(&path, &markdown)
                .with_context(|| format!("failed to write {}", path.display()))?;
            debug!(path = %path.display(), bytes = markdown.len(), "wrote markdown");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(markdown.as_bytes())
                .context("failed to write to stdout")?;
            stdout.flush()?;
        }
    }

    Ok(())
}

fn read_input(input: Option<&PathBuf>) -> Result<String> {
    match input {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut html = String::new();
            io::stdin()
                .read_to_string(&mut html)
                .context("failed to read stdin")?;
            Ok(html)
        }
    }
}
