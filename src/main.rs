use std::fs;
use std::path::PathBuf;

use clap::{CommandFactory, Parser};

use mdtranslate::{Config, TranslatorClient, translate_markdown};

#[derive(Parser)]
#[command(name = "mdtranslate")]
#[command(about = "Translate Markdown files while preserving their structure")]
struct Cli {
    /// Source Markdown file
    source: Option<PathBuf>,

    /// Destination file for the translated document
    dest: Option<PathBuf>,

    /// Configuration file with the translator settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Source language override (for example "ja")
    #[arg(long)]
    from: Option<String>,

    /// Target language override (for example "en")
    #[arg(long)]
    to: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    // Without both paths there is nothing to do; show the usage and leave
    let (source, dest) = match (cli.source, cli.dest) {
        (Some(source), Some(dest)) => (source, dest),
        _ => {
            Cli::command().print_help().ok();
            return;
        }
    };

    // Load settings, then let the flags override them
    let mut config = match cli.config {
        Some(path) => match Config::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        None => Config::discover(),
    };
    if let Some(from) = cli.from {
        config.translator.from = Some(from);
    }
    if let Some(to) = cli.to {
        config.translator.to = to;
    }

    let translator = match TranslatorClient::new(&config.translator) {
        Ok(translator) => translator,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    // Read input file
    let markdown = match fs::read_to_string(&source) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading {}: {}", source.display(), e);
            std::process::exit(1);
        }
    };

    // Translate the whole document before touching the destination
    let translated = match translate_markdown(&markdown, &translator) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = fs::write(&dest, translated) {
        eprintln!("Error writing {}: {}", dest.display(), e);
        std::process::exit(1);
    }

    println!("Translated {} to {}", source.display(), dest.display());
}
