use std::time::Duration;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use manabi_core::{
    AssembleOptions, CachedAnalyzer, ChatAnalyzer, ChatGuideGenerator, ContentAnalyzer,
    DEFAULT_RELEVANCE_THRESHOLD, GuideGenerator, KeywordAnalyzer, Level, OfflineGuideGenerator,
    Provider, SearchProvider, Video, YoutubeSearch, assemble_playlist, fallback_guide,
    format_guide_readable, format_playlist_readable, format_timestamp, related_themes,
};

mod play;

/// CLI wrapper for Level enum (needed for clap ValueEnum)
#[derive(Clone, Default, ValueEnum)]
enum CliLevel {
    #[default]
    Beginner,
    Intermediate,
    Expert,
}

impl From<CliLevel> for Level {
    fn from(cli: CliLevel) -> Self {
        match cli {
            CliLevel::Beginner => Level::Beginner,
            CliLevel::Intermediate => Level::Intermediate,
            CliLevel::Expert => Level::Expert,
        }
    }
}

/// Analysis strategy: an AI provider, or the offline keyword matcher.
#[derive(Clone, Default, ValueEnum)]
enum CliAnalyzer {
    #[default]
    Grok,
    Openai,
    Gemini,
    Keyword,
}

#[derive(Parser)]
#[command(name = "manabi")]
#[command(
    about = "Assemble a theme-driven YouTube learning playlist and step through it segment by segment"
)]
struct Cli {
    /// Learning theme, e.g. "rust ownership"
    theme: String,

    /// Experience level to target
    #[arg(short, long, default_value = "beginner")]
    level: CliLevel,

    /// Target playlist duration in minutes
    #[arg(short, long, default_value_t = 10.0)]
    minutes: f64,

    /// Maximum number of videos to analyze
    #[arg(long, default_value_t = 5)]
    max_videos: usize,

    /// Maximum number of search results to consider
    #[arg(long, default_value_t = 10)]
    max_results: u32,

    /// Analysis strategy for scoring segments
    #[arg(short, long, default_value = "grok")]
    analyzer: CliAnalyzer,

    /// Force re-analysis even if cached results exist
    #[arg(short, long)]
    force: bool,

    /// Step through the playlist interactively after assembling it
    #[arg(short, long)]
    play: bool,
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let level: Level = cli.level.clone().into();

    // Validate API keys early
    let search = match YoutubeSearch::from_env() {
        Ok(search) => search,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };

    let (analyzer, guide_generator, analyzer_name, threshold): (
        Box<dyn ContentAnalyzer>,
        Box<dyn GuideGenerator>,
        &str,
        Option<f64>,
    ) = match &cli.analyzer {
        CliAnalyzer::Keyword => (
            Box::new(KeywordAnalyzer),
            Box::new(OfflineGuideGenerator),
            "keyword",
            None,
        ),
        chat => {
            let provider = match chat {
                CliAnalyzer::Grok => Provider::Grok,
                CliAnalyzer::Openai => Provider::Openai,
                CliAnalyzer::Gemini => Provider::Gemini,
                CliAnalyzer::Keyword => unreachable!(),
            };
            if let Err(e) = provider.validate_api_key() {
                eprintln!("{} {}", style("Error:").red().bold(), e);
                std::process::exit(1);
            }
            let name = provider.name();
            (
                Box::new(CachedAnalyzer::new(ChatAnalyzer::new(provider), cli.force)),
                Box::new(ChatGuideGenerator::new(provider)),
                name,
                Some(DEFAULT_RELEVANCE_THRESHOLD),
            )
        }
    };

    println!(
        "\n{}  {}\n",
        style("manabi").cyan().bold(),
        style("Learning Playlist Builder").dim()
    );

    // Step 1: Search
    let spinner = create_spinner(&format!("Searching videos for \"{}\"...", cli.theme));
    let videos = match search.search(&cli.theme, cli.max_results).await {
        Ok(videos) => {
            spinner.finish_with_message(format!(
                "{} Found {} candidate videos",
                style("✓").green().bold(),
                videos.len()
            ));
            videos
        }
        Err(e) => {
            spinner.finish_and_clear();
            eprintln!(
                "{} Video search failed: {}",
                style("✗").red().bold(),
                e
            );
            std::process::exit(1);
        }
    };

    // Step 2: Analyze and pack
    let options = AssembleOptions {
        target_duration: cli.minutes * 60.0,
        max_videos: cli.max_videos,
        relevance_threshold: threshold,
    };
    let spinner = create_spinner(&format!("Analyzing videos with {}...", analyzer_name));
    let playlist =
        assemble_playlist(&search, analyzer.as_ref(), videos, &cli.theme, level, &options).await?;
    spinner.finish_with_message(format!(
        "{} Packed {} segments ({} of {} requested)",
        style("✓").green().bold(),
        playlist.len(),
        format_timestamp(playlist.total_duration),
        format_timestamp(playlist.target_duration)
    ));

    // "No results" is a reportable outcome, distinct from a search failure.
    if playlist.is_empty() {
        println!(
            "\n{} No relevant content found for \"{}\" at {} level. Try another theme.",
            style("∅").yellow().bold(),
            cli.theme,
            level
        );
        return Ok(());
    }

    println!("\n{}", style("─".repeat(60)).dim());
    println!("{}", format_playlist_readable(&playlist, &cli.theme));

    // Step 3: Learning guide for the assembled playlist
    let mut guide_videos: Vec<Video> = Vec::new();
    for entry in &playlist.entries {
        if !guide_videos.iter().any(|v| v.id == entry.video.id) {
            guide_videos.push(entry.video.clone());
        }
    }
    let spinner = create_spinner("Writing the learning guide...");
    let guide = match guide_generator
        .generate(&cli.theme, level, &guide_videos)
        .await
    {
        Ok(guide) => {
            spinner.finish_with_message(format!(
                "{} Learning guide ready",
                style("✓").green().bold()
            ));
            guide
        }
        Err(e) => {
            spinner.finish_and_clear();
            eprintln!(
                "{} Guide generation failed ({}), using the offline guide",
                style("!").yellow().bold(),
                e
            );
            fallback_guide(&cli.theme, level)
        }
    };
    println!("\n{}", style("─".repeat(60)).dim());
    println!(
        "{}",
        format_guide_readable(&guide, &cli.theme, &related_themes(&cli.theme))
    );

    if cli.play {
        play::run(playlist).await?;
    }

    Ok(())
}
