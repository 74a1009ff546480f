//! Dolibarr CLI - Query a Dolibarr ERP from the command line
//!
//! Reads credentials from the environment and prints API answers as JSON.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dolibarr_client::{Config, DolibarrApi, ModuleFilter};

#[derive(Parser, Debug)]
#[command(name = "dolibarr")]
#[command(about = "Query a Dolibarr ERP through its REST API")]
#[command(version)]
struct Args {
    /// API base URL, overrides DOLIBARR_URL
    #[arg(long)]
    url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List one page of a module's records
    List {
        module: String,
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        limit: u32,
        /// Dolibarr SQL filter, e.g. "(t.status:=:1)"
        #[arg(long)]
        sqlfilters: Option<String>,
    },
    /// Show one record
    Get {
        module: String,
        id: String,
        /// Related list to attach, e.g. "lines"
        #[arg(long)]
        action: Option<String>,
    },
    /// Show the field definitions of a module
    Fields {
        module: String,
        #[arg(long, default_value = "en_US")]
        lang: String,
        /// Also merge the extrafields of this element type
        #[arg(long)]
        extrafields: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays valid JSON.
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dolibarr_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let config = Config::from_env();
    let config = match args.url.as_deref() {
        Some(url) => config.with_url(url),
        None => config,
    };
    info!(url = %config.url, "Configuration loaded");

    let api = DolibarrApi::connect(&config).context("Failed to build Dolibarr client")?;

    match args.command {
        Command::List {
            module,
            page,
            limit,
            sqlfilters,
        } => {
            let mut filter = ModuleFilter::default().with_page(page).with_limit(limit);
            if let Some(sqlfilters) = sqlfilters {
                filter = filter.with_sqlfilters(sqlfilters);
            }
            let records = api
                .get_all_records(&module, Some(&filter))
                .await
                .with_context(|| format!("Failed to list {}", module))?;
            print_json(&records)?;
        }
        Command::Get { module, id, action } => {
            let record = api
                .get_record_by_id(&module, &id, action.as_deref())
                .await
                .with_context(|| format!("Failed to fetch {} {}", module, id))?;
            print_json(&record)?;
        }
        Command::Fields {
            module,
            lang,
            extrafields,
        } => {
            let fields = api
                .get_module_fields(&module, &lang, extrafields.as_deref())
                .await
                .with_context(|| format!("Failed to fetch fields of {}", module))?;
            print_json(&fields)?;
        }
    }

    let stats = api.cache().stats().await;
    debug!(
        hits = stats.hits,
        misses = stats.misses,
        entries = stats.total_entries,
        hit_rate = ?stats.hit_rate(),
        "Cache statistics"
    );

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
