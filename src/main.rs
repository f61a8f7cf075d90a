use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use gitcard::models::UserStats;
use gitcard::server::{validate_username, RateLimiter};
use gitcard::{create_router, AppState, CardPipeline, CardSource, Config, GitHubClient, PipelineConfig};

#[derive(Parser, Debug)]
#[command(name = "gitcard")]
#[command(version = "0.1.0")]
#[command(about = "Turn GitHub profiles into trading cards")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server
    Serve {
        /// Address to bind (overrides BIND_ADDR)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Render cards for one or more users
    Card {
        /// GitHub usernames
        #[arg(required = true)]
        usernames: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "svg")]
        format: CardFormat,

        /// Fetch per-repository language breakdowns
        #[arg(long)]
        full: bool,

        /// Write one file per user here instead of stdout
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },
    /// Print derived statistics for a user
    Stats {
        /// GitHub username
        username: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: StatsFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CardFormat {
    Svg,
    Json,
    Badge,
}

impl CardFormat {
    fn extension(self) -> &'static str {
        match self {
            CardFormat::Svg => "svg",
            CardFormat::Json => "json",
            CardFormat::Badge => "badge.svg",
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StatsFormat {
    Text,
    Markdown,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("gitcard=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let github = GitHubClient::with_base_url(config.github_token.as_deref(), &config.github_api_url)?;
    if config.github_token.is_none() {
        tracing::warn!("GITHUB_TOKEN not set, using the unauthenticated rate limit");
    }
    let pipeline = CardPipeline::new(github, PipelineConfig::from(&config))?;

    match cli.command {
        Command::Serve { bind } => {
            let addr = bind.unwrap_or_else(|| config.bind_addr.clone());
            let rate_limiter = RateLimiter::new(config.rate_limit_per_minute)
                .trust_forwarded_for(config.trust_forwarded_for);
            serve(pipeline, &addr, rate_limiter).await?;
        }
        Command::Card {
            usernames,
            format,
            full,
            out_dir,
        } => {
            render_cards(&pipeline, &usernames, format, full, out_dir.as_deref()).await?;
        }
        Command::Stats {
            username,
            format,
            output,
        } => {
            validate_username(&username)?;
            let stats = pipeline.analyze_user(&username).await?;
            let rendered = match format {
                StatsFormat::Json => serde_json::to_string_pretty(&stats)?,
                StatsFormat::Markdown => format_markdown(&stats),
                StatsFormat::Text => format_text(&stats),
            };
            write_output(&rendered, output.as_deref())?;
        }
    }

    Ok(())
}

async fn serve(pipeline: CardPipeline, addr: &str, rate_limiter: RateLimiter) -> anyhow::Result<()> {
    let state = AppState::with_rate_limiter(Arc::new(pipeline), rate_limiter);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    tracing::info!("Shutting down...");
    Ok(())
}

async fn render_cards(
    pipeline: &CardPipeline,
    usernames: &[String],
    format: CardFormat,
    full: bool,
    out_dir: Option<&Path>,
) -> anyhow::Result<()> {
    if let Some(dir) = out_dir {
        std::fs::create_dir_all(dir)?;
    }

    let pb = ProgressBar::new(usernames.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} cards")?
            .progress_chars("#>-"),
    );

    let mut failures = 0;
    for username in usernames {
        if let Err(e) = validate_username(username) {
            pb.println(format!("skipping {}: {}", username, e));
            failures += 1;
            pb.inc(1);
            continue;
        }

        let output = match format {
            CardFormat::Json => match pipeline.card_data(username, full).await {
                Ok(data) => serde_json::to_string_pretty(&data)?,
                Err(e) => {
                    pb.println(format!("{}: {}", username, e));
                    failures += 1;
                    pb.inc(1);
                    continue;
                }
            },
            CardFormat::Svg | CardFormat::Badge => {
                let rendered = match format {
                    CardFormat::Badge => pipeline.render_badge(username).await,
                    _ => pipeline.render_card(username, full).await,
                };
                if rendered.is_error {
                    failures += 1;
                }
                rendered.svg
            }
        };

        match out_dir {
            Some(dir) => {
                let path = dir.join(format!("{}.{}", username, format.extension()));
                std::fs::write(&path, &output)?;
                tracing::info!("Wrote {}", path.display());
            }
            None => pb.suspend(|| println!("{}", output)),
        }
        pb.inc(1);
    }

    pb.finish_with_message("done");
    if failures > 0 {
        tracing::warn!("{} of {} cards fell back to an error", failures, usernames.len());
    }
    Ok(())
}

fn write_output(output: &str, path: Option<&Path>) -> anyhow::Result<()> {
    if let Some(path) = path {
        std::fs::write(path, output)?;
        tracing::info!("Output written to: {}", path.display());
    } else {
        println!("{}", output);
    }
    Ok(())
}

fn format_text(stats: &UserStats) -> String {
    let mut output = String::new();

    output.push_str(&format!("\n=== Trainer Stats: {} ===\n\n", stats.user.login));

    if let Some(ref name) = stats.user.name {
        output.push_str(&format!("Name: {}\n", name));
    }
    if let Some(ref bio) = stats.user.bio {
        output.push_str(&format!("Bio: {}\n", bio));
    }

    output.push_str(&format!(
        "Account age: {} years, {} months\n",
        stats.account_age.years, stats.account_age.months
    ));
    output.push_str(&format!(
        "Repositories: {} own, {} forked\n",
        stats.repo_profile.own_repo_count, stats.repo_profile.forked_repo_count
    ));
    output.push_str(&format!(
        "Stars: {} (forks: {})\n",
        stats.repo_profile.total_stars, stats.repo_profile.total_forks
    ));
    if let Some(ref repo) = stats.repo_profile.most_starred_repo {
        output.push_str(&format!(
            "Most starred: {} ({} stars)\n",
            repo.name, repo.stargazers_count
        ));
    }
    if let Some(year) = stats.most_active_year {
        output.push_str(&format!("Most active year: {}\n", year));
    }
    output.push_str(&format!(
        "Recently active: {}\n",
        if stats.recently_active { "yes" } else { "no" }
    ));
    output.push_str(&format!(
        "Diversity: {} ({} languages)\n\n",
        stats.diversity, stats.language_count
    ));

    output.push_str("Languages:\n");
    for lang in stats.languages.iter().take(10) {
        let markup = if lang.is_markup { " (markup)" } else { "" };
        output.push_str(&format!(
            "  - {}: {:.1}%{}\n",
            lang.language, lang.percentage, markup
        ));
    }

    if stats.devops.detected {
        output.push_str(&format!("\nDevOps: {}\n", stats.devops.signals.join(", ")));
    }

    output.push_str(&format!(
        "\nGenerated on: {}\n",
        stats.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output
}

fn format_markdown(stats: &UserStats) -> String {
    let mut output = String::new();

    output.push_str(&format!("# Trainer Stats: {}\n\n", stats.user.login));

    if let Some(ref name) = stats.user.name {
        output.push_str(&format!("**Name:** {}\n\n", name));
    }
    if let Some(ref bio) = stats.user.bio {
        output.push_str(&format!("> {}\n\n", bio));
    }

    output.push_str("## Summary\n\n");
    output.push_str("| Metric | Value |\n|--------|-------|\n");
    output.push_str(&format!(
        "| Account Age | {}y {}m |\n",
        stats.account_age.years, stats.account_age.months
    ));
    output.push_str(&format!(
        "| Own Repositories | {} |\n",
        stats.repo_profile.own_repo_count
    ));
    output.push_str(&format!("| Stars | {} |\n", stats.repo_profile.total_stars));
    output.push_str(&format!("| Followers | {} |\n", stats.user.followers));
    output.push_str(&format!("| Diversity | {} |\n", stats.diversity));
    if let Some(ref top) = stats.top_language {
        output.push_str(&format!("| Top Language | {} |\n", top));
    }

    output.push_str("\n## Languages\n\n");
    output.push_str("| Language | Share | Bytes |\n");
    output.push_str("|----------|-------|-------|\n");
    for lang in &stats.languages {
        output.push_str(&format!(
            "| {} | {:.1}% | {} |\n",
            lang.language, lang.percentage, lang.bytes
        ));
    }

    if stats.devops.detected {
        output.push_str("\n## DevOps Signals\n\n");
        for signal in &stats.devops.signals {
            output.push_str(&format!("- {}\n", signal));
        }
    }

    output.push_str(&format!(
        "\n---\n*Generated on {}*\n",
        stats.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output
}
