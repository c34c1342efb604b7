use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;

use permasearch::client::StoreClient;
use permasearch::config::load_settings;
use permasearch::search::{run_search, ResultsView, SearchKind, SearchParams};
use permasearch::server;

#[derive(Parser)]
#[command(name = "permasearch", about = "Search UI for a permanode store", version)]
struct Cli {
    /// Path to a config file (default: ./permasearch.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Store backend URL, overriding the config file.
    #[arg(long, global = true, env = "PERMASEARCH_STORE_URL")]
    store_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the web UI.
    Serve {
        /// Bind host.
        #[arg(long)]
        host: Option<String>,
        /// Bind port.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run one search and print the matching permanodes.
    Search {
        /// Attribute value to search for.
        query: String,
        /// Search kind: tag, title, or empty for any attribute.
        #[arg(long, short = 't', default_value = "")]
        kind: String,
        /// Fuzzy flag, passed through to the index.
        #[arg(long, short = 'f', default_value = "")]
        fuzzy: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "permasearch=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(url) = cli.store_url {
        settings.store_url = url;
    }

    match cli.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                settings.host = host;
            }
            if let Some(port) = port {
                settings.port = port;
            }
            server::serve(&settings).await
        }
        Command::Search { query, kind, fuzzy } => {
            let params = SearchParams {
                query,
                kind: SearchKind::parse(&kind),
                fuzzy,
            };
            let store = StoreClient::new(&settings);
            match run_search(&store, &params).await? {
                Some(result) => {
                    let view = ResultsView::build(&params, &result);
                    if let Some(banner) = &view.banner {
                        println!("{}", style(banner).bold());
                    }
                    if view.rows.is_empty() {
                        println!("{}", style("no results").dim());
                    }
                    for row in &view.rows {
                        println!("{}  {}", style(&row.permanode).cyan(), row.title);
                    }
                }
                None => println!("{}", style("nothing to search").dim()),
            }
            Ok(())
        }
    }
}
