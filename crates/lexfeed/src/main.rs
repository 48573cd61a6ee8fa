//! lexfeed - operator console for a legislative-news feed

mod cli;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use lexfeed_core::{
    ApiGateway, ArticleUpdate, BrowseState, ClientConfig, MetadataKind, NewEntry, NewsClient,
    Snapshot,
};
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "lexfeed",
    version,
    about = "Operator console for a legislative-news feed",
    long_about = "Browse, filter, and edit articles from a legislative-news API,\n\
                  and register new states and topics.\n\
                  \n\
                  Examples:\n\
                    lexfeed list --state CA --search healthcare\n\
                    lexfeed list --page 3\n\
                    lexfeed show 42\n\
                    lexfeed edit 42 --title \"Amended budget bill\"\n\
                    lexfeed states\n\
                    lexfeed add-state California --abbreviation CA\n\
                    lexfeed add-topic healthcare --description \"Coverage and policy\"\n\
                  \n\
                  Environment Variables:\n\
                    LEXFEED_API_URL                  # Base URL of the news API\n\
                    RUST_LOG                         # Log filter (e.g. lexfeed_core=debug)"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Base URL of the news API
    #[arg(long, env = "LEXFEED_API_URL")]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// List articles with optional filters
    List {
        /// Filter by state abbreviation (e.g. CA)
        #[arg(long)]
        state: Option<String>,
        /// Filter by topic
        #[arg(long)]
        topic: Option<String>,
        /// Free-text search
        #[arg(long)]
        search: Option<String>,
        /// Page to display (1-based)
        #[arg(long, default_value = "1")]
        page: u32,
        /// Articles per page
        #[arg(long, default_value = "10")]
        page_size: u32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a single article
    Show {
        /// Article id
        id: u64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update fields of an article
    Edit {
        /// Article id
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        state: Option<String>,
        #[arg(long)]
        topic: Option<String>,
    },
    /// List registered states
    States {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List registered topics
    Topics {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Register a new state
    AddState {
        /// Full state name
        name: String,
        /// Two-letter abbreviation
        #[arg(long)]
        abbreviation: String,
    },
    /// Register a new topic
    AddTopic {
        /// Topic name
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env();
    if cli.api_url.is_some() {
        config.base_url = cli.api_url;
    }
    let gateway = Arc::new(ApiGateway::new(&config));
    let client = NewsClient::new(config, gateway);

    match cli.command {
        Command::List {
            state,
            topic,
            search,
            page,
            page_size,
            json,
        } => {
            let mut browse = BrowseState::new(page_size);
            browse.set_jurisdiction(state);
            browse.set_topic(topic);
            if let Some(search) = search {
                browse.set_search(search);
            }

            let mut snapshot = client.news_page(&mut browse).await;
            if page > 1 && snapshot.page().is_some() {
                // Step the cursor toward the requested page; it clamps at
                // the page count the first fetch reported.
                for _ in 1..page {
                    browse.next_page();
                }
                if browse.page() > 1 {
                    snapshot = client.news_page(&mut browse).await;
                }
            }

            let result = expect_data(&snapshot, snapshot.page().cloned())?;
            println!("{}", cli::format_news_page(&result, json));
        }
        Command::Show { id, json } => {
            let snapshot = client.article(id).await;
            if snapshot.error.as_ref().is_some_and(|e| e.is_not_found()) {
                bail!("article {id} not found");
            }
            let article = expect_data(&snapshot, snapshot.article().cloned())?;
            println!("{}", cli::format_article(&article, json));
        }
        Command::Edit {
            id,
            title,
            description,
            content,
            state,
            topic,
        } => {
            let patch = ArticleUpdate {
                title,
                description,
                content,
                jurisdiction: state,
                topic,
            };
            let article = client.mutations().update_article(id, patch).await?;
            println!("Updated article {}: {}", article.id, article.title);
        }
        Command::States { json } => {
            let snapshot = client.metadata(MetadataKind::Jurisdictions).await;
            let names = expect_data(&snapshot, snapshot.names().map(<[String]>::to_vec))?;
            println!("{}", cli::format_names(&names, json));
        }
        Command::Topics { json } => {
            let snapshot = client.metadata(MetadataKind::Topics).await;
            let names = expect_data(&snapshot, snapshot.names().map(<[String]>::to_vec))?;
            println!("{}", cli::format_names(&names, json));
        }
        Command::AddState { name, abbreviation } => {
            client
                .mutations()
                .create_metadata(
                    MetadataKind::Jurisdictions,
                    NewEntry {
                        name: name.clone(),
                        abbreviation: Some(abbreviation),
                        description: None,
                    },
                )
                .await?;
            println!("State '{name}' created");
        }
        Command::AddTopic { name, description } => {
            client
                .mutations()
                .create_metadata(
                    MetadataKind::Topics,
                    NewEntry {
                        name: name.clone(),
                        abbreviation: None,
                        description,
                    },
                )
                .await?;
            println!("Topic '{name}' created");
        }
    }

    Ok(())
}

/// Unwrap a snapshot's data or surface its stored fetch error.
fn expect_data<T>(snapshot: &Snapshot, data: Option<T>) -> Result<T> {
    match data {
        Some(data) => Ok(data),
        None => match &snapshot.error {
            Some(error) => bail!("{error}"),
            None => bail!("no data returned"),
        },
    }
}
