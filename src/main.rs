use clap::Parser;
use console::style;
use std::process;

use ytfetch::cli::Cli;
use ytfetch::downloader::progress::TerminalProgress;
use ytfetch::downloader::utils::format_error;
use ytfetch::downloader::Downloader;
use ytfetch::prompt;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    println!("{}", style("ytfetch").cyan().bold());
    println!("{}\n", style("A CLI tool to download YouTube videos").dim());

    let mut url = cli.url.clone();
    let mut options = cli.to_options();

    if url.is_none() || cli.interactive {
        match prompt::prompt_for_options(url.as_deref(), &options) {
            Ok(outcome) => {
                url = Some(outcome.url);
                options = outcome.options;
            }
            Err(e) => {
                eprintln!("{}", format_error(&format!("Prompt failed: {}", e)));
                process::exit(1);
            }
        }
    }

    // The prompt always resolves a URL, so this only guards a broken
    // terminal interaction.
    let url = match url {
        Some(u) => u,
        None => {
            eprintln!("{}", format_error("No URL provided"));
            process::exit(1);
        }
    };

    let downloader = Downloader::new();
    let progress = TerminalProgress::new();

    if let Err(e) = downloader.download(&url, &options, &progress).await {
        eprintln!("{}", format_error(&e.to_string()));
        process::exit(1);
    }
}
