//! # collegebot CLI Application
//!
//! Command-line interface for the college question answering assistant.
//!
//! ## Subcommands
//!
//! - `ask`: Build the knowledge map and answer one question, or chat interactively
//! - `crawl`: Crawl from a seed page and save the cleaned text of the site
//! - `urls`: List the sitemap URLs that feed the knowledge map
//!
//! Every run appends its log to `college_bot.log` in the working directory.

mod telemetry;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use collegebot::assistant::{Answer, CollegeAssistant};
use collegebot::config::AssistantConfig;
use collegebot::crawler::{self, CRAWL_FOOTER_PATTERN, ContentCleaner};
use collegebot::knowledge::KnowledgeMap;
use collegebot::model::Client;
use rig::completion::CompletionModel;
use tracing::{info, instrument};

#[derive(Parser)]
#[command(author, version, about = "Answers questions about a college from its website", long_about = None)]
struct Cli {
    /// Log file
    #[arg(long, global = true, default_value = "college_bot.log")]
    log_file: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Answer a question, or start an interactive session when none is given
    Ask(AskArgs),

    /// Crawl the site from a seed page and save the cleaned text
    Crawl(CrawlArgs),

    /// List the sitemap URLs used for the knowledge map
    Urls(UrlsArgs),
}

#[derive(Args, Debug)]
struct AskArgs {
    /// Question to answer
    question: Option<String>,

    /// Output format (text|json)
    #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
    format: String,
}

#[derive(Args, Debug)]
struct CrawlArgs {
    /// Page to start crawling from
    #[arg(short, long)]
    seed: Option<String>,

    /// File to write the site text to
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Follow every link instead of one new link per page
    #[arg(short, long)]
    exhaustive: bool,

    /// Maximum number of pages to visit
    #[arg(short = 'p', long, default_value = "500")]
    max_pages: usize,
}

#[derive(Args, Debug)]
struct UrlsArgs {
    /// Show the pages sitemap before filtering
    #[arg(short, long)]
    unfiltered: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _otel = telemetry::init_tracing_subscriber(&cli.log_file)?;
    let config = AssistantConfig::from_env();

    match cli.command {
        Some(Commands::Ask(args)) => {
            ask_command(args, config).await?;
        }
        Some(Commands::Crawl(args)) => {
            crawl_command(args, config).await?;
        }
        Some(Commands::Urls(args)) => {
            urls_command(args, config).await?;
        }
        None => {
            // If no command is provided, show help
            let _ = Cli::parse_from(["collegebot", "--help"]);
        }
    }

    Ok(())
}

#[instrument(skip(config))]
async fn ask_command(args: AskArgs, config: AssistantConfig) -> anyhow::Result<()> {
    let client = Client::new_gemini_from_env(&config)?;

    eprintln!("Building knowledge map...");
    let knowledge = KnowledgeMap::build(&config).await?;
    eprintln!("Loaded {} pages", knowledge.len());

    let requests = client.requests();
    let assistant = CollegeAssistant::new(client, knowledge, config);

    match args.question {
        Some(question) => {
            let answer = assistant.ask(&question).await;
            print_answer(&question, &answer, &args.format)?;
        }
        None => chat_loop(&assistant, &args.format).await?,
    }

    info!("Session used {} completion requests", requests.get());
    Ok(())
}

async fn chat_loop<C>(assistant: &CollegeAssistant<C>, format: &str) -> anyhow::Result<()>
where
    C: CompletionModel + Clone,
{
    println!("Ask a question about {}.", assistant.config().institution);
    println!("Type 'exit' to end the conversation.");
    println!("-----------------------------------------");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("You: ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let input = line?;
        let input = input.trim();

        if input.eq_ignore_ascii_case("exit") {
            println!("Ending chat session.");
            break;
        }
        if input.is_empty() {
            continue;
        }

        let answer = assistant.ask(input).await;
        print_answer(input, &answer, format)?;
        println!();
    }

    Ok(())
}

fn print_answer(question: &str, answer: &Answer, format: &str) -> anyhow::Result<()> {
    match format {
        "json" => {
            let json_response = serde_json::json!({
                "question": question,
                "answer": answer.text,
                "sources": answer.sources,
            });
            println!("{}", serde_json::to_string_pretty(&json_response)?);
        }
        _ => {
            println!("{}", answer.text);
            if !answer.sources.is_empty() {
                println!("\nSources:");
                for (i, url) in answer.sources.iter().enumerate() {
                    println!("{}. {}", i + 1, url);
                }
            }
        }
    }
    Ok(())
}

#[instrument(skip(config))]
async fn crawl_command(args: CrawlArgs, config: AssistantConfig) -> anyhow::Result<()> {
    let seed = args.seed.unwrap_or(config.crawl_seed);
    let output = args.output.unwrap_or(config.output_path);

    let mut crawler_config = config.crawler;
    crawler_config.exhaustive = args.exhaustive;
    crawler_config.max_pages = args.max_pages;
    crawler_config.footer_pattern = CRAWL_FOOTER_PATTERN.to_string();

    println!("Crawling {}...", seed);
    let client = crawler::http_client(&crawler_config)?;
    let cleaner = ContentCleaner::from_config(&crawler_config)?;
    let path = crawler::save_site_text(&client, &seed, &crawler_config, &cleaner, &output).await?;

    info!("Crawl output written to {}", path.display());
    println!("Saved crawled content to {}", path.display());
    Ok(())
}

#[instrument(skip(config))]
async fn urls_command(args: UrlsArgs, config: AssistantConfig) -> anyhow::Result<()> {
    let client = crawler::http_client(&config.crawler)?;

    let pages = crawler::fetch_sitemap_urls(&client, &config.pages_sitemap).await?;
    let pages = if args.unfiltered {
        pages
    } else {
        crawler::filter_urls(pages)
    };
    let team = crawler::fetch_sitemap_urls(&client, &config.team_sitemap).await?;

    println!("Pages ({}):", pages.len());
    for url in &pages {
        println!("  {}", url);
    }
    println!("Team ({}):", team.len());
    for url in &team {
        println!("  {}", url);
    }
    Ok(())
}
