//! pdfrag CLI - PDF fragment analysis tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;

use pdfrag::{LopdfBackend, PdfAnalyzer};

#[derive(Parser)]
#[command(name = "pdfrag")]
#[command(version)]
#[command(about = "Analyze PDF text fragments, paragraphs, and hyperlinks", long_about = None)]
struct Cli {
    /// Input PDF or extractor JSON file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Merge line-wrapped hyperlink fragments
    #[arg(long)]
    merge_links: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List fragments
    #[command(alias = "ls")]
    Fragments {
        /// Input PDF or extractor JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// First fragment index
        #[arg(long, default_value = "0")]
        start: usize,

        /// One past the last fragment index
        #[arg(long)]
        end: Option<usize>,

        /// Merge line-wrapped hyperlink fragments first
        #[arg(long)]
        merge_links: bool,

        /// Output fragments as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the paragraph starting at a fragment
    Paragraph {
        /// Input PDF or extractor JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Fragment index the paragraph starts at
        #[arg(long, default_value = "0")]
        start: usize,

        /// One past the last fragment index to consider
        #[arg(long)]
        end: Option<usize>,

        /// Merge line-wrapped hyperlink fragments first
        #[arg(long)]
        merge_links: bool,
    },

    /// Locate a span by exact text
    Find {
        /// Input PDF or extractor JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Text to match exactly against span texts
        #[arg(value_name = "TEXT")]
        text: String,

        /// First fragment index to search
        #[arg(long, default_value = "0")]
        start: usize,

        /// One past the last fragment index to search
        #[arg(long)]
        end: Option<usize>,
    },

    /// Show document information
    Info {
        /// Input PDF or extractor JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Fragments {
            input,
            start,
            end,
            merge_links,
            json,
        }) => cmd_fragments(&input, start, end, merge_links, json),
        Some(Commands::Paragraph {
            input,
            start,
            end,
            merge_links,
        }) => cmd_paragraph(&input, start, end, merge_links),
        Some(Commands::Find {
            input,
            text,
            start,
            end,
        }) => cmd_find(&input, &text, start, end),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: list fragments if input is provided
            if let Some(input) = cli.input {
                cmd_fragments(&input, 0, None, cli.merge_links, false)
            } else {
                println!("{}", "Usage: pdfrag <FILE>".yellow());
                println!("       pdfrag --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn is_json_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Load a PDF file or an extractor JSON dump, picked by extension.
fn load_analyzer(input: &Path) -> Result<PdfAnalyzer, Box<dyn std::error::Error>> {
    let analyzer = if is_json_path(input) {
        let json = fs::read_to_string(input)?;
        PdfAnalyzer::from_json(&json)?
    } else {
        PdfAnalyzer::open(input)?
    };
    log::debug!(
        "Loaded {} fragments from {}",
        analyzer.fragment_count(),
        input.display()
    );
    Ok(analyzer)
}

fn cmd_fragments(
    input: &Path,
    start: usize,
    end: Option<usize>,
    merge_links: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut analyzer = load_analyzer(input)?;

    if merge_links {
        analyzer.merge_hyperlinks(start, end);
    }

    let fragments = analyzer.fragments(start, end);

    if json {
        println!("{}", serde_json::to_string_pretty(fragments)?);
        return Ok(());
    }

    println!("{}", "Fragments".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for fragment in fragments {
        let text = fragment.plain_text();
        let text = if fragment.is_merged() {
            text.blue().underline().to_string()
        } else {
            text
        };
        println!(
            "{} {} {} {}",
            format!("[{}]", fragment.index).bold(),
            format!("{:.1}pt", fragment.font_size).dimmed(),
            fragment.font_family.dimmed(),
            text
        );
    }

    println!();
    println!(
        "{} fragments, {} spans",
        analyzer.fragment_count(),
        analyzer.span_count()
    );

    Ok(())
}

fn cmd_paragraph(
    input: &Path,
    start: usize,
    end: Option<usize>,
    merge_links: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut analyzer = load_analyzer(input)?;

    if merge_links {
        analyzer.merge_hyperlinks(start, end);
    }

    let paragraph = analyzer.paragraph(start, end)?;

    println!("{}", paragraph.text);
    println!();
    match paragraph.break_index {
        Some(index) => println!("{} fragment {}", "Breaks at".yellow(), index),
        None => println!("{}", "Runs to the end of the range".dimmed()),
    }

    Ok(())
}

fn cmd_find(
    input: &Path,
    text: &str,
    start: usize,
    end: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let analyzer = load_analyzer(input)?;

    match analyzer.find_text(text, start, end) {
        Some((fragment_index, span_index)) => {
            println!(
                "{} fragment {}, span {}",
                "Found in".green().bold(),
                fragment_index,
                span_index
            );
            let fragment = analyzer.fragment(fragment_index)?;
            println!(
                "{} {} {} {}",
                format!("[{}]", fragment.index).bold(),
                format!("{:.1}pt", fragment.font_size).dimmed(),
                fragment.font_family.dimmed(),
                fragment.plain_text()
            );
            Ok(())
        }
        None => Err(format!("text not found: {:?}", text).into()),
    }
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());

    let analyzer = if is_json_path(input) {
        println!("{}: extractor JSON", "Format".bold());
        let json = fs::read_to_string(input)?;
        PdfAnalyzer::from_json(&json)?
    } else {
        let backend = LopdfBackend::load_file(input)?;
        println!("{}: PDF {}", "Format".bold(), backend.version());
        println!(
            "{}: {}",
            "Encrypted".bold(),
            if backend.is_encrypted() { "Yes" } else { "No" }
        );
        PdfAnalyzer::from_backend(&backend)?
    };

    println!();
    println!("{}", "Fragment Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Fragments".bold(), analyzer.fragment_count());
    println!("{}: {}", "Spans".bold(), analyzer.span_count());

    let text = analyzer
        .fragments(0, None)
        .iter()
        .map(|f| f.plain_text())
        .collect::<Vec<_>>()
        .join(" ");
    println!("{}: {}", "Words".bold(), text.split_whitespace().count());
    println!("{}: {}", "Characters".bold(), text.len());

    let mut sizes: Vec<f32> = analyzer
        .fragments(0, None)
        .iter()
        .map(|f| f.font_size)
        .collect();
    sizes.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sizes.dedup();
    let sizes: Vec<String> = sizes.iter().map(|s| format!("{:.1}", s)).collect();
    println!("{}: {}", "Font sizes".bold(), sizes.join(", "));

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfrag".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF fragment analysis tool");
    println!();
    println!("Repository: {}", "https://github.com/pdfrag/pdfrag".dimmed());
    println!("License: MIT");
}
