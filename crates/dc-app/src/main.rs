//! `datacat`: browse a dataset catalog from the terminal

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use dc_core::events::events::{CatalogLoaded, LoadFailed, ViewRefreshed};
use dc_core::events::handler_from_fn;
use dc_core::{
    Browser, CatalogStore, EventBus, FilterAttribute, FilterSelections, ListingState, MemoryHistory, MemoryStash,
    Query, Route, SortSpec, ViewState,
};
use dc_data::{load_catalog, CatalogConfig, CatalogSource};
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod interactive;
mod render;

#[derive(Parser)]
#[command(name = "datacat", about = "Search, filter and link into a dataset catalog")]
struct Cli {
    /// JSON config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,
    /// Dataset file, overrides the config
    #[arg(long, global = true)]
    datasets: Option<PathBuf>,
    /// Publication file, overrides the config
    #[arg(long, global = true)]
    publications: Option<PathBuf>,
    /// Ignore the publication file
    #[arg(long, global = true)]
    no_publications: bool,
    /// Path prefix the catalog is served under
    #[arg(long, global = true)]
    base_path: Option<String>,
    #[arg(long, global = true)]
    delimiter: Option<char>,
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Land on a URL the way a browser would and print the resulting view
    Browse { location: String },
    /// Print the detail view of one dataset
    Show { code: String },
    /// List the distinct values of one or all filter attributes
    Facets { attribute: Option<String> },
    /// Build the URL for a listing state, or a dataset when --code is given
    Link {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        license: Option<String>,
        #[arg(long)]
        artifact: Option<String>,
        #[arg(long)]
        granularity: Option<String>,
        #[arg(long)]
        stage: Option<String>,
        #[arg(long)]
        task: Option<String>,
        #[arg(long)]
        domain: Option<String>,
        #[arg(long)]
        language: Option<String>,
        #[arg(long)]
        year: Option<String>,
        #[arg(long)]
        sort: Option<String>,
        #[arg(long)]
        sort_dir: Option<String>,
        #[arg(long)]
        code: Option<String>,
    },
    /// Read browsing commands from stdin
    Interactive {
        #[arg(long, default_value = "/")]
        start: String,
    },
}

impl Cli {
    fn config(&self) -> Result<CatalogConfig> {
        let mut config = CatalogConfig::load_or_default(self.config.as_deref()).context("failed to read config")?;
        if let Some(datasets) = &self.datasets {
            config.datasets = datasets.clone();
        }
        if let Some(publications) = &self.publications {
            config.publications = Some(publications.clone());
        }
        if self.no_publications {
            config.publications = None;
        }
        if let Some(base_path) = &self.base_path {
            config.base_path = base_path.clone();
        }
        if let Some(delimiter) = self.delimiter {
            config.delimiter = delimiter;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = cli.config()?;
    let bus = Arc::new(event_bus());

    match cli.command {
        CliCommand::Browse { location } => {
            let catalog = load(&config, &bus).await?;
            let browser = Browser::start(
                catalog,
                config.codec(),
                MemoryHistory::new(&location),
                &mut MemoryStash::new(),
                bus,
            );
            let mut out = std::io::stdout().lock();
            render::write_view(&mut out, browser.session())?;
        }
        CliCommand::Show { code } => {
            let catalog = load(&config, &bus).await?;
            catalog.require(&code)?;
            let detail = catalog.detail(&code).ok_or_else(|| anyhow!("no detail for {}", code))?;
            let mut out = std::io::stdout().lock();
            render::write_detail(&mut out, &detail, &config.codec(), &ListingState::default())?;
        }
        CliCommand::Facets { attribute } => {
            let attr = match attribute.as_deref() {
                Some(name) => match FilterAttribute::from_param_name(name) {
                    Some(attr) => Some(attr),
                    None => bail!("unknown filter attribute '{}'", name),
                },
                None => None,
            };
            let catalog = load(&config, &bus).await?;
            let mut out = std::io::stdout().lock();
            render::write_facets(&mut out, &catalog, attr)?;
        }
        CliCommand::Link {
            search,
            license,
            artifact,
            granularity,
            stage,
            task,
            domain,
            language,
            year,
            sort,
            sort_dir,
            code,
        } => {
            let mut filters = FilterSelections::new();
            let values = [license, artifact, granularity, stage, task, domain, language, year];
            for (attr, value) in FilterAttribute::ALL.into_iter().zip(values) {
                filters.set(attr, value);
            }

            let mut spec = SortSpec::default();
            if let Some(key) = sort {
                spec.key = key.parse().map_err(|e: String| anyhow!(e))?;
            }
            if let Some(direction) = sort_dir {
                spec.direction = direction.parse().map_err(|e: String| anyhow!(e))?;
            }

            let view = ViewState {
                route: code.map(Route::Detail).unwrap_or_default(),
                listing: ListingState {
                    query: Query::new(search.unwrap_or_default(), filters),
                    sort: spec,
                },
            };
            println!("{}", config.codec().encode(&view));
        }
        CliCommand::Interactive { start } => {
            let catalog = load(&config, &bus).await?;
            let browser = Browser::start(
                catalog,
                config.codec(),
                MemoryHistory::new(&start),
                &mut MemoryStash::new(),
                bus,
            );
            interactive::run(browser, config.search_debounce()).await?;
        }
    }

    Ok(())
}

fn event_bus() -> EventBus {
    let bus = EventBus::new();
    bus.subscribe::<CatalogLoaded>(handler_from_fn(|event| {
        if let Some(loaded) = event.as_any().downcast_ref::<CatalogLoaded>() {
            debug!(datasets = loaded.datasets, publications = loaded.publications, "catalog loaded");
        }
    }));
    bus.subscribe::<ViewRefreshed>(handler_from_fn(|event| {
        if let Some(view) = event.as_any().downcast_ref::<ViewRefreshed>() {
            debug!(visible = view.visible, total = view.total, href = %view.href, "view refreshed");
        }
    }));
    bus.subscribe::<LoadFailed>(handler_from_fn(|event| {
        if let Some(failed) = event.as_any().downcast_ref::<LoadFailed>() {
            error!(resource = %failed.resource, error = %failed.error, "catalog unavailable");
        }
    }));
    bus
}

/// Load both resources. Nothing is browsable until this completes.
async fn load(config: &CatalogConfig, bus: &EventBus) -> Result<CatalogStore> {
    let source = config.source().context("invalid catalog source")?;
    match load_catalog(&source).await {
        Ok(loaded) => {
            if !loaded.publications_available {
                info!("publication details are unavailable");
            }
            Ok(loaded.catalog)
        }
        Err(err) => {
            bus.publish(LoadFailed {
                resource: source.datasets_name(),
                error: err.to_string(),
            });
            Err(anyhow::Error::new(err).context("catalog could not be loaded"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "datacat",
            "--datasets",
            "rows.tsv",
            "--delimiter",
            "\t",
            "--no-publications",
            "--base-path",
            "/catalog",
            "facets",
        ]);
        let config = cli.config().unwrap();

        assert_eq!(config.datasets, PathBuf::from("rows.tsv"));
        assert_eq!(config.publications, None);
        assert_eq!(config.delimiter, '\t');
        assert_eq!(config.codec().base_path(), "/catalog/");
    }

    #[test]
    fn test_link_arguments_parse() {
        let cli = Cli::parse_from(["datacat", "link", "--domain", "NLP", "--sort-dir", "desc"]);
        match cli.command {
            CliCommand::Link { domain, sort_dir, code, .. } => {
                assert_eq!(domain.as_deref(), Some("NLP"));
                assert_eq!(sort_dir.as_deref(), Some("desc"));
                assert_eq!(code, None);
            }
            _ => panic!("expected link"),
        }
    }
}
