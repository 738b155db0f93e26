mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use mediagrab::extractor::YtDlp;
use mediagrab::pipeline::{self, ItemOutcome};
use mediagrab_av::{tools, FfmpegMuxer};
use std::path::PathBuf;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "mediagrab=trace,mediagrab_av=trace".to_string()
        } else {
            "mediagrab=info,mediagrab_av=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Download {
            url,
            dest,
            ffmpeg,
            yt_dlp,
        } => download(url, dest, ffmpeg, yt_dlp),
        Commands::CheckTools => check_tools(),
        Commands::Version => {
            println!("mediagrab {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn download(
    url: String,
    dest: PathBuf,
    ffmpeg: Option<PathBuf>,
    yt_dlp: Option<PathBuf>,
) -> Result<()> {
    let ffmpeg = tools::get_tool_path("ffmpeg", ffmpeg.as_deref())?;
    let yt_dlp = tools::get_tool_path("yt-dlp", yt_dlp.as_deref())?;

    // The pipeline runs on its own worker so a long selection + retrieval +
    // merge sequence never runs on the command thread.
    let worker = std::thread::spawn(move || {
        let backend = YtDlp::new(yt_dlp);
        let muxer = FfmpegMuxer::new(ffmpeg);
        pipeline::run(&url, &dest, &backend, &backend, &muxer)
    });
    let report = worker
        .join()
        .map_err(|_| anyhow::anyhow!("pipeline worker panicked"))??;

    for outcome in &report.outcomes {
        match outcome {
            ItemOutcome::Done { title, output } => {
                println!("done: {} -> {}", title, output.display());
            }
            ItemOutcome::Failed { title, error } => {
                println!(
                    "failed: {}: {}",
                    title.as_deref().unwrap_or("<untitled>"),
                    error
                );
            }
        }
    }
    println!(
        "{} succeeded, {} failed",
        report.succeeded(),
        report.failed()
    );

    if report.succeeded() == 0 && report.failed() > 0 {
        anyhow::bail!("all items failed");
    }
    Ok(())
}

fn check_tools() -> Result<()> {
    println!("Checking external tools...\n");
    for info in tools::check_tools() {
        if info.available {
            println!(
                "  {} - OK ({})",
                info.name,
                info.version.as_deref().unwrap_or("unknown version")
            );
        } else {
            println!("  {} - NOT FOUND", info.name);
        }
    }
    Ok(())
}
