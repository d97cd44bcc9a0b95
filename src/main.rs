use std::{fmt::Debug, process::ExitCode, sync::Arc};

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use itertools::Itertools;
use serde::Serialize;
use tokio::io::AsyncReadExt;

use wikitalk_parser::{
    Section, SignaturePatterns, TalkParser, TalkParserBuilder,
    errors::ConfigError,
    mediawiki_api::{get_wikitalk_api, get_wikitalks},
    reqwest_client::WikiClient,
    topics::topic_to_section,
};

/// Split wiki talk pages into sections and posts, printed as JSON.
#[derive(Parser, Debug)]
#[command(name = "wikitalk", author, version, about, long_about = None)]
struct Cli {
    /// Pretty print the JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Regex matching a signature timestamp, for wikis not using English UTC dates
    #[arg(long, global = true, env = "WIKITALK_TIMESTAMP_PATTERN")]
    timestamp_pattern: Option<String>,

    /// Substring every timestamp contains
    #[arg(
        long,
        global = true,
        env = "WIKITALK_TIMESTAMP_HINT",
        default_value = "UTC"
    )]
    timestamp_hint: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch talk pages from Wikipedia
    Page {
        /// Page titles or page urls
        #[arg(required = true)]
        titles: Vec<String>,

        #[arg(long, env = "WIKITALK_LANGUAGE", default_value = "en")]
        language: String,

        /// Use the REST talk endpoint instead of parsing the wikitext
        #[arg(long)]
        api: bool,

        #[arg(long, env = "WIKITALK_CACHE_DIR")]
        cache_dir: Option<String>,

        #[arg(long, env = "WIKITALK_USER_AGENT")]
        user_agent: Option<String>,
    },
    /// Parse a local wikitext file (`-` reads stdin)
    File { path: String },
}

fn build_parser(cli: &Cli) -> Result<TalkParser, ConfigError> {
    let mut builder = TalkParserBuilder::default();
    if let Some(pattern) = &cli.timestamp_pattern {
        builder = builder.classifier(Arc::new(SignaturePatterns::new(
            pattern,
            cli.timestamp_hint.as_str(),
        )?));
    }
    Ok(builder.build()?)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match json {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialise output: {}", e),
    }
}

/// Log how many of `results` succeeded and every failure, returning the successes.
fn count_processed<K, E: Debug>(results: Vec<Result<K, E>>, titles: &[String]) -> Vec<K> {
    let total = results.len();
    let (passed, failed): (Vec<K>, Vec<(&String, E)>) = results
        .into_iter()
        .zip(titles)
        .partition_map(|(result, title)| match result {
            Ok(value) => itertools::Either::Left(value),
            Err(e) => itertools::Either::Right((title, e)),
        });

    for (title, e) in &failed {
        log::error!("Failed to fetch {:?}: {:?}", title, e);
    }
    log::info!(
        "Total: {}. Passed: {}. Rate: {:.2}%",
        total,
        passed.len(),
        if total == 0 {
            0.0
        } else {
            (passed.len() as f64 / total as f64) * 100.0
        }
    );
    passed
}

async fn read_input(path: &str) -> std::io::Result<String> {
    if path == "-" {
        let mut buf = String::new();
        tokio::io::stdin().read_to_string(&mut buf).await?;
        Ok(buf)
    } else {
        tokio::fs::read_to_string(path).await
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let parser = match build_parser(&cli) {
        Ok(parser) => parser,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::from(2);
        }
    };

    match &cli.command {
        Command::File { path } => match read_input(path).await {
            Ok(wikitext) => {
                print_json(&parser.parse(&wikitext).collect_vec(), cli.pretty);
                ExitCode::SUCCESS
            }
            Err(e) => {
                log::error!("Failed to read {:?}: {}", path, e);
                ExitCode::FAILURE
            }
        },
        Command::Page {
            titles,
            language,
            api,
            cache_dir,
            user_agent,
        } => {
            let client = match WikiClient::new(cache_dir.as_deref(), user_agent.as_deref()) {
                Ok(client) => client,
                Err(e) => {
                    log::error!("Failed to build client: {}", e);
                    return ExitCode::FAILURE;
                }
            };

            let pages: Vec<Vec<Section>> = if *api {
                let results = futures::future::join_all(titles.iter().map(|title| {
                    get_wikitalk_api(&client, title, language, parser.classifier())
                }))
                .await;
                count_processed(results, titles)
                    .into_iter()
                    .map(|topics| topics.into_iter().map(topic_to_section).collect_vec())
                    .collect()
            } else {
                count_processed(get_wikitalks(&client, titles, language).await, titles)
                    .iter()
                    .map(|wikitext| parser.parse(wikitext).collect_vec())
                    .collect()
            };

            let failed = pages.len() != titles.len();
            for sections in &pages {
                print_json(sections, cli.pretty);
            }
            if failed {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
    }
}
