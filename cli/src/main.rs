//! mdkit CLI - Markdown, HTML and JSON conversion tool
//!
//! A command-line front-end for the mdkit conversion engine.

mod settings;

use clap::{Parser, Subcommand};
use colored::*;
use mdkit::render::{DirectorySink, ExportSink};
use mdkit::{
    compute_scroll_sync, convert_with_options, export, ConversionKind, ExportFormat,
    PreviewRenderer, ScrollMetrics, TextStats,
};
use settings::Settings;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Convert between Markdown, HTML and a JSON document tree
#[derive(Parser)]
#[command(
    name = "mdkit",
    version,
    about = "Convert between Markdown, HTML and JSON",
    long_about = "mdkit - Markdown transcoding tool.\n\n\
                  Converts Markdown to HTML or a JSON document tree and back,\n\
                  reports text statistics and exports standalone files.\n\n\
                  Usage:\n  \
                  mdkit html notes.md            Markdown to HTML on stdout\n  \
                  mdkit convert html-to-md page.html -o page.md\n  \
                  cat notes.md | mdkit json      Read from stdin"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file layered over the defaults and ./mdkit.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log conversion details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert with a selector (md-to-html, html-to-md, md-to-json, json-to-md)
    Convert {
        /// Conversion selector
        kind: String,

        /// Input file path (default: stdin)
        input: Option<PathBuf>,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert Markdown to HTML
    Html {
        /// Input file path (default: stdin)
        input: Option<PathBuf>,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert HTML to Markdown
    #[command(visible_alias = "md")]
    Markdown {
        /// Input file path (default: stdin)
        input: Option<PathBuf>,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert Markdown to a JSON document tree
    Json {
        /// Input file path (default: stdin)
        input: Option<PathBuf>,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output compact JSON (no indentation)
        #[arg(long)]
        compact: bool,

        /// Leave the "raw" field empty
        #[arg(long)]
        no_raw: bool,
    },

    /// Convert a JSON document tree to Markdown
    FromJson {
        /// Input file path (default: stdin)
        input: Option<PathBuf>,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render a full preview (tables, task lists, diagrams) as HTML
    Preview {
        /// Input file path (default: stdin)
        input: Option<PathBuf>,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show word, character, line and paragraph counts
    Stats {
        /// Input file path (default: stdin)
        input: Option<PathBuf>,

        /// Print the statistics as JSON
        #[arg(long)]
        json: bool,

        /// Reading rate in words per minute
        #[arg(long)]
        wpm: Option<usize>,
    },

    /// Export Markdown as a standalone html, md or txt file
    Export {
        /// Export format (html, md, txt)
        format: String,

        /// Input file path (default: stdin)
        input: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// File name without extension
        #[arg(long)]
        name: Option<String>,

        /// Title of HTML exports
        #[arg(long)]
        title: Option<String>,
    },

    /// Compute the preview scroll position for an editor scroll position
    Sync {
        /// Editor scrollTop
        scroll_top: f64,

        /// Editor scrollHeight
        scroll_height: f64,

        /// Editor clientHeight
        client_height: f64,

        /// Preview scrollHeight
        target_scroll_height: f64,

        /// Preview clientHeight
        target_client_height: f64,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut loader = settings::loader(cli.config.as_deref());

    match cli.command {
        Commands::Convert {
            kind,
            input,
            output,
        } => {
            let kind: ConversionKind = kind.parse()?;
            let settings = loader.build()?;
            run_conversion(kind, &settings, input.as_deref(), output.as_deref())?;
        }

        Commands::Html { input, output } => {
            let settings = loader.build()?;
            run_conversion(
                ConversionKind::MarkdownToHtml,
                &settings,
                input.as_deref(),
                output.as_deref(),
            )?;
        }

        Commands::Markdown { input, output } => {
            let settings = loader.build()?;
            run_conversion(
                ConversionKind::HtmlToMarkdown,
                &settings,
                input.as_deref(),
                output.as_deref(),
            )?;
        }

        Commands::Json {
            input,
            output,
            compact,
            no_raw,
        } => {
            if compact {
                loader = loader.set_override("convert.pretty_json", false)?;
            }
            if no_raw {
                loader = loader.set_override("convert.keep_raw", false)?;
            }
            let settings = loader.build()?;
            run_conversion(
                ConversionKind::MarkdownToJson,
                &settings,
                input.as_deref(),
                output.as_deref(),
            )?;
        }

        Commands::FromJson { input, output } => {
            let settings = loader.build()?;
            run_conversion(
                ConversionKind::JsonToMarkdown,
                &settings,
                input.as_deref(),
                output.as_deref(),
            )?;
        }

        Commands::Preview { input, output } => {
            let markdown = read_input(input.as_deref())?;
            let preview = PreviewRenderer::new().render_preview(&markdown);
            write_output(output.as_deref(), &preview.html)?;

            if let Some(path) = output {
                println!(
                    "{} Rendered preview: {} ({} diagrams)",
                    "✓".green().bold(),
                    path.display(),
                    preview.diagrams
                );
            }
        }

        Commands::Stats { input, json, wpm } => {
            let settings = loader.build()?;
            let text = read_input(input.as_deref())?;
            let rate = wpm.unwrap_or(settings.stats.words_per_minute);
            let stats = TextStats::analyze_with_rate(&text, rate);

            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print_stats(&stats);
            }
        }

        Commands::Export {
            format,
            input,
            output,
            name,
            title,
        } => {
            let format: ExportFormat = format.parse()?;
            if let Some(name) = name {
                loader = loader.set_override("export.file_stem", name)?;
            }
            if let Some(title) = title {
                loader = loader.set_override("export.title", title)?;
            }
            let settings = loader.build()?;

            let markdown = read_input(input.as_deref())?;
            let artifact = export(&markdown, format, &settings.export);
            let mut sink = DirectorySink::new(&output);
            sink.deliver(&artifact)?;

            println!(
                "{} Exported {}: {}",
                "✓".green().bold(),
                artifact.mime_type,
                output.join(&artifact.file_name).display()
            );
        }

        Commands::Sync {
            scroll_top,
            scroll_height,
            client_height,
            target_scroll_height,
            target_client_height,
        } => {
            let settings = loader.build()?;
            if !settings.sync.enabled {
                println!("{} Scroll sync is disabled", "!".yellow().bold());
                return Ok(());
            }

            let source = ScrollMetrics::new(scroll_top, scroll_height, client_height);
            let target = ScrollMetrics::new(0.0, target_scroll_height, target_client_height);

            match compute_scroll_sync(&source, &target) {
                Some(top) => println!("{}", top),
                None => println!("{} Nothing to scroll, position unchanged", "!".yellow().bold()),
            }
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

fn run_conversion(
    kind: ConversionKind,
    settings: &Settings,
    input: Option<&Path>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = read_input(input)?;
    let converted = convert_with_options(kind, &text, &settings.convert)?;
    write_output(output, &converted)?;

    if let Some(path) = output {
        println!(
            "{} {}: {}",
            "✓".green().bold(),
            kind.label(),
            path.display()
        );
    }
    Ok(())
}

fn print_stats(stats: &TextStats) {
    println!("{}", "Text Statistics".cyan().bold());
    println!("{}", "─".repeat(40));
    println!("{}: {}", "Words".bold(), stats.words);
    println!("{}: {}", "Characters".bold(), stats.characters);
    println!("{}: {}", "Characters (no spaces)".bold(), stats.characters_no_spaces);
    println!("{}: {}", "Lines".bold(), stats.lines);
    println!("{}: {}", "Paragraphs".bold(), stats.paragraphs);
    println!("{}: {} min", "Reading time".bold(), stats.reading_time_minutes);
}

fn print_version() {
    println!("{} {}", "mdkit".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Markdown ↔ HTML ↔ JSON transcoding");
    println!();
    println!("Conversions:");
    for kind in ConversionKind::ALL {
        println!("  {:<12} {}", kind.name(), kind.label());
    }
}

fn read_input(path: Option<&Path>) -> io::Result<String> {
    match path {
        Some(p) => fs::read_to_string(p),
        None => {
            let mut buffer = String::new();
            io::stdin().lock().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn write_output(path: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", content)?;
        }
    }
    Ok(())
}
