use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::{Attribute, Cell, Table};
use scholar_discovery::app::{App, DetailPage, Page, SearchPage};
use scholar_discovery::catalog::{Catalog, MockCatalog};
use scholar_discovery::config::{
    find_config_file, get_config, load_config, CatalogConfig, Config, ConfigFile, ENV_PREFIX,
};
use scholar_discovery::export::{
    export_resource, export_results, format_authors, format_citation, resource_file_name,
    results_file_name, CitationStyle, ExportFormat, ExportScope,
};
use scholar_discovery::models::{
    AdvancedFilters, CriteriaOperator, Resource, SearchCriteria, SearchField, SelectedFilters,
    SortBy, SortOrder, User,
};
use scholar_discovery::routes::{detail_href, Route, SearchParams};
use scholar_discovery::state::{FileStorage, SessionStorage};
use scholar_discovery::utils::{
    is_terminal, terminal_width, truncate_at_word, truncate_with_ellipsis, ResultColumns,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How long `suggest` waits for the debounced lookup to settle
const SUGGEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Scholar Discovery - Search, filter, save and export scholarly resources
#[derive(Parser, Debug)]
#[command(name = "scholar-discovery")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search, filter, save and export scholarly resources", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Session file holding the signed-in user and saved resources
    #[arg(long, global = true)]
    session_file: Option<PathBuf>,

    /// Answer instantly and never simulate failures
    #[arg(long, global = true)]
    instant: bool,

    /// Show all environment variables
    #[arg(long, global = true)]
    env: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
    /// Plain text format
    Plain,
}

/// Search options shared by `search` and `export`
#[derive(clap::Args, Debug, Clone)]
struct SearchArgs {
    /// Free-text query
    #[arg(default_value = "")]
    query: String,

    /// Advanced criterion as `[and|or|not] field:value` (e.g. "author:Chen")
    #[arg(long = "where", value_parser = parse_criterion)]
    criteria: Vec<SearchCriteria>,

    /// Facet selection as `group=option` (e.g. "type=article"); repeatable
    #[arg(long, short, value_parser = parse_facet)]
    facet: Vec<(String, String)>,

    /// Earliest publication year
    #[arg(long)]
    year_from: Option<String>,

    /// Latest publication year
    #[arg(long)]
    year_to: Option<String>,

    /// Resource type (article, book, thesis)
    #[arg(long = "type")]
    resource_type: Option<String>,

    /// Language code
    #[arg(long)]
    language: Option<String>,

    /// Sort key (relevance, popularity, recent, oldest, title-asc, title-desc, date, citations, downloads)
    #[arg(long, short)]
    sort: Option<SortBy>,

    /// Sort direction (asc, desc)
    #[arg(long)]
    order: Option<SortOrder>,

    /// Page number (1-based)
    #[arg(long, short, default_value_t = 1)]
    page: usize,

    /// Results per page (default from configuration)
    #[arg(long)]
    page_size: Option<usize>,
}

impl SearchArgs {
    fn advanced_filters(&self) -> Option<AdvancedFilters> {
        let given = self.year_from.is_some()
            || self.year_to.is_some()
            || self.resource_type.is_some()
            || self.language.is_some();
        if !given {
            return None;
        }

        let mut filters = AdvancedFilters::default();
        if let Some(year) = &self.year_from {
            filters = filters.year_from(year);
        }
        if let Some(year) = &self.year_to {
            filters = filters.year_to(year);
        }
        if let Some(kind) = &self.resource_type {
            filters = filters.format(kind);
        }
        if let Some(language) = &self.language {
            filters = filters.language(language);
        }
        Some(filters)
    }

    fn params(&self) -> SearchParams {
        SearchParams {
            q: self.query.trim().to_string(),
            criteria: self.criteria.clone(),
            filters: self.advanced_filters(),
            facets: self
                .facet
                .iter()
                .map(|(group, option)| (group.as_str(), option.as_str()))
                .collect::<SelectedFilters>(),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search the catalog
    #[command(alias = "s")]
    Search {
        #[command(flatten)]
        search: SearchArgs,
    },

    /// Show the full record of a resource
    #[command(alias = "d")]
    Detail {
        /// Resource ID
        id: String,

        /// Search query the back link returns to
        #[arg(long, default_value = "")]
        query: String,

        /// Print only a citation in this style (apa, mla, chicago)
        #[arg(long)]
        cite: Option<CitationStyle>,

        /// Also request the generated summary
        #[arg(long)]
        summary: bool,
    },

    /// Type-ahead suggestions for partial input
    Suggest {
        /// Text typed so far
        text: String,

        /// Accept the n-th suggestion (1-based) and print its detail link
        #[arg(long)]
        pick: Option<usize>,
    },

    /// List the facet groups
    Filters {
        /// Show every option instead of the first few per group
        #[arg(long, short)]
        all: bool,
    },

    /// Open an application URL such as "/search?q=ml"
    Open {
        /// Path with optional query
        url: String,
    },

    /// Saved resources and collections
    Saved {
        #[command(subcommand)]
        command: SavedCommands,
    },

    /// Sign in, sign up and session management
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },

    /// Export search results or a single resource
    #[command(alias = "e")]
    Export {
        /// Export this resource instead of search results
        #[arg(long)]
        id: Option<String>,

        /// Export format
        #[arg(long, short = 'F', default_value = "csv")]
        format: ExportFormat,

        /// Which results to export
        #[arg(long, default_value = "page")]
        scope: ExportScope,

        /// Output file or directory (default: stdout)
        #[arg(long = "to")]
        destination: Option<PathBuf>,

        #[command(flatten)]
        search: SearchArgs,
    },

    /// Show or create the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum SavedCommands {
    /// List collections and saved resources
    List,

    /// Save a resource, or remove it if already saved
    Toggle {
        /// Resource ID
        id: String,
    },

    /// Create a collection
    Create {
        /// Collection name
        name: String,

        /// Optional description
        #[arg(long)]
        description: Option<String>,

        /// Make the collection public
        #[arg(long)]
        public: bool,
    },

    /// Add a resource to a specific collection
    Add {
        /// Resource ID
        id: String,

        /// Collection ID
        #[arg(long, short)]
        collection: String,
    },

    /// Replace collections with the account's starter set
    Seed,
}

#[derive(Subcommand, Debug)]
enum AuthCommands {
    /// Sign in with email and password
    SignIn {
        email: String,
        password: String,
    },

    /// Create an account
    SignUp {
        name: String,
        email: String,
        password: String,
    },

    /// Forget the signed-in user
    SignOut,

    /// Show the signed-in user
    Whoami,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,

    /// Write a configuration file with default values
    Init {
        /// Where to write the file
        #[arg(default_value = "scholar-discovery.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Parse `group=option`
fn parse_facet(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((group, option)) if !group.trim().is_empty() && !option.trim().is_empty() => {
            Ok((group.trim().to_string(), option.trim().to_string()))
        }
        _ => Err(format!("expected group=option, got {:?}", value)),
    }
}

/// Parse `[and|or|not] field:value`
fn parse_criterion(value: &str) -> Result<SearchCriteria, String> {
    let value = value.trim();
    let (operator, rest) = match value.split_once(' ') {
        Some((word, rest)) if word.parse::<CriteriaOperator>().is_ok() => {
            (word.parse::<CriteriaOperator>()?, rest.trim_start())
        }
        _ => (CriteriaOperator::And, value),
    };
    let (field, text) = rest
        .split_once(':')
        .ok_or_else(|| format!("expected field:value, got {:?}", value))?;
    Ok(SearchCriteria::new(field.parse::<SearchField>()?, text.trim()).operator(operator))
}

/// Print all available environment variables
fn print_env_vars() {
    println!("Scholar Discovery - Environment Variables");
    println!();
    println!("Catalog:");
    println!("  {}_CATALOG__BASE_URL          Base URL shown in request logs", ENV_PREFIX);
    println!("  {}_CATALOG__MIN_LATENCY_MS    Lower bound of simulated delay (default: 200)", ENV_PREFIX);
    println!("  {}_CATALOG__MAX_LATENCY_MS    Upper bound of simulated delay (default: 800)", ENV_PREFIX);
    println!("  {}_CATALOG__FAILURE_RATE      Fraction of requests that fail (default: 0.05)", ENV_PREFIX);
    println!();
    println!("Search:");
    println!("  {}_SEARCH__PAGE_SIZE          Results per page (default: 10)", ENV_PREFIX);
    println!("  {}_SEARCH__SUGGESTION_LIMIT   Maximum suggestions (default: 5)", ENV_PREFIX);
    println!("  {}_SEARCH__DEBOUNCE_MS        Suggestion debounce in ms (default: 300)", ENV_PREFIX);
    println!();
    println!("Storage:");
    println!("  {}_STORAGE__SESSION_FILE      Session file for user and saved resources", ENV_PREFIX);
    println!();
    println!("Logging:");
    println!("  {}_LOGGING__LEVEL             Log level (default: info)", ENV_PREFIX);
    println!("  {}_LOGGING__FORMAT            \"json\" for structured logs", ENV_PREFIX);
    println!("  RUST_LOG                                 Overrides the log filter entirely");
    println!();
    println!("Example:");
    println!("  export {}_CATALOG__FAILURE_RATE=0", ENV_PREFIX);
    println!("  export {}_SEARCH__PAGE_SIZE=20", ENV_PREFIX);
}

fn init_tracing(cli: &Cli, config: &Config) {
    let level = match cli.verbose {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let level = if cli.quiet { "error" } else { level };

    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("scholar_discovery={}", level)),
    );
    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so JSON results on stdout stay parseable
    if config.logging.is_json() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(path) = &cli.config {
        load_config(path).with_context(|| format!("Failed to load {}", path.display()))?
    } else if let Some(path) = find_config_file() {
        load_config(&path).with_context(|| format!("Failed to load {}", path.display()))?
    } else {
        get_config()
    };

    if let Some(session_file) = &cli.session_file {
        config.storage.session_file = session_file.clone();
    }
    if cli.instant {
        config.catalog = CatalogConfig {
            base_url: config.catalog.base_url.clone(),
            ..CatalogConfig::instant()
        };
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Show environment variables and exit if requested
    if cli.env {
        print_env_vars();
        return Ok(());
    }

    let config = resolve_config(&cli)?;
    init_tracing(&cli, &config);

    let Some(command) = cli.command else {
        println!("No command provided. Use --help for usage information.");
        println!("Common commands:");
        println!("  search <query>     - Search for resources");
        println!("  detail <id>        - Show a resource");
        println!("  open <url>         - Open an application URL");
        println!("  saved list         - List saved resources");
        println!("  export <query>     - Export results");
        return Ok(());
    };

    if let Commands::Config { command } = &command {
        return run_config(command, &config);
    }

    tracing::debug!("Using session file {}", config.storage.session_file.display());
    let storage: Arc<dyn SessionStorage> =
        Arc::new(FileStorage::new(config.storage.session_file.clone()));
    let catalog = Arc::new(MockCatalog::new(config.catalog.clone()));
    let mut app = App::new(config, catalog, storage);
    let format = resolve_format(cli.output);

    match command {
        Commands::Search { search } => {
            let page = run_search(&mut app, &search).await;
            match page {
                Page::Search(page) => output_search_page(&app, &page, format)?,
                other => output_page(&other, format)?,
            }
        }

        Commands::Detail {
            id,
            query,
            cite,
            summary,
        } => {
            let route = Route::Detail {
                id: id.clone(),
                params: SearchParams::query(query),
            };
            let page = app.open(&route).await;
            let Page::Detail(DetailPage::Found { resource, .. }) = &page else {
                output_page(&page, format)?;
                anyhow::bail!("Resource {} could not be shown", id);
            };

            if let Some(style) = cite {
                println!("{}", format_citation(&resource.resource, style));
                return Ok(());
            }
            output_page(&page, format)?;
            if summary {
                match app.summary(&id).await {
                    Some(text) => println!("\nAI Summary:\n{}", text),
                    None => eprintln!("Summary unavailable, please try again."),
                }
            }
        }

        Commands::Suggest { text, pick } => {
            let mut input = app.suggestion_box();
            let mut updates = input.subscribe();
            input.input(&text);

            let settled = tokio::time::timeout(
                SUGGEST_TIMEOUT,
                updates.wait_for(|state| state.query == text && !state.loading),
            )
            .await
            .context("Timed out waiting for suggestions")?
            .map(|state| state.clone())
            .context("Suggestion updates stopped")?;

            if let Some(error) = &settled.error {
                anyhow::bail!("Suggestions failed: {}", error);
            }

            if let Some(n) = pick {
                for _ in 0..n.max(1) {
                    input.select_next();
                }
                let chosen = input
                    .accept()
                    .with_context(|| format!("No suggestion number {}", n))?;
                println!("{}", detail_href(&chosen.id, &text));
                return Ok(());
            }

            match format {
                OutputFormat::Json => print_json(&settled.suggestions)?,
                _ if settled.suggestions.is_empty() => {
                    println!("No matching results found. Press Enter to search all databases.")
                }
                _ => {
                    for (i, suggestion) in settled.suggestions.iter().enumerate() {
                        println!(
                            "{}. {} ({}, {}) - {}",
                            i + 1,
                            suggestion.title,
                            suggestion.resource_type.label(),
                            suggestion.year,
                            format_authors(&suggestion.authors)
                        );
                    }
                }
            }
        }

        Commands::Filters { all } => {
            let groups = app.load_filter_groups().await.to_vec();
            if groups.is_empty() {
                anyhow::bail!("Failed to load filters");
            }
            if format == OutputFormat::Json {
                return print_json(&groups);
            }

            let layout = app.layout_mut();
            if all {
                for group in &groups {
                    if layout.visible_options(group).len() < group.options.len() {
                        layout.toggle_show_more(&group.id);
                    }
                }
            }
            let layout = app.layout();

            let mut table = new_table();
            table.set_header(vec!["Group", "Option", "Label", "Count"]);
            for group in &groups {
                for option in layout.visible_options(group) {
                    table.add_row(vec![
                        Cell::new(&group.title).add_attribute(Attribute::Bold),
                        Cell::new(&option.id),
                        Cell::new(&option.label),
                        Cell::new(option.count),
                    ]);
                }
                if let Some(label) = layout.show_more_label(group).filter(|_| !all) {
                    table.add_row(vec![
                        Cell::new(&group.title),
                        Cell::new(""),
                        Cell::new(format!("({})", label)),
                        Cell::new(""),
                    ]);
                }
            }
            println!("{table}");
        }

        Commands::Open { url } => {
            let page = app.open_url(&url).await?;
            match &page {
                Page::Search(search) => output_search_page(&app, search, format)?,
                other => output_page(other, format)?,
            }
        }

        Commands::Saved { command } => run_saved(&mut app, command, format, cli.quiet).await?,

        Commands::Auth { command } => run_auth(&mut app, command, format)?,

        Commands::Export {
            id,
            format: export_format,
            scope,
            destination,
            search,
        } => {
            let (content, file_name) = match id {
                Some(id) => {
                    let resource = app
                        .catalog()
                        .detail(&id)
                        .await
                        .with_context(|| format!("Failed to load resource {}", id))?;
                    (
                        export_resource(&resource, export_format)?,
                        resource_file_name(&id, export_format),
                    )
                }
                None => {
                    let page = run_search(&mut app, &search).await;
                    let Page::Search(page) = page else {
                        anyhow::bail!("Nothing to export: enter a search term");
                    };
                    if let Some(error) = &page.error {
                        anyhow::bail!("{}", error);
                    }
                    let items = match scope {
                        ExportScope::Page => page.view.page(),
                        ExportScope::All => page.view.results.as_slice(),
                    };
                    (
                        export_results(items, export_format)?,
                        results_file_name(scope, export_format),
                    )
                }
            };

            match destination {
                Some(path) => {
                    let path = if path.is_dir() { path.join(&file_name) } else { path };
                    write_export(&path, &content)?;
                    if !cli.quiet {
                        eprintln!("Exported to {} ({})", path.display(), export_format.mime_type());
                    }
                }
                None => println!("{}", content),
            }
        }

        Commands::Config { .. } => unreachable!("handled before the app is built"),
    }

    Ok(())
}

/// Open the search route for `args`, then apply sort and paging
async fn run_search(app: &mut App, args: &SearchArgs) -> Page {
    let page = app.open(&Route::Search(args.params())).await;
    if !matches!(page, Page::Search(_)) {
        return page;
    }

    let store = app.search_mut();
    if let Some(size) = args.page_size {
        store.set_page_size(size);
    }
    if let Some(key) = args.sort.filter(|key| *key != store.sort_by()) {
        store.set_sort(key);
    }
    if let Some(order) = args.order {
        store.set_sort_order(order);
    }
    store.set_page(args.page);
    Page::Search(Box::new(app.search_page()))
}

async fn run_saved(app: &mut App, command: SavedCommands, format: OutputFormat, quiet: bool) -> Result<()> {
    match command {
        SavedCommands::List => {
            let page = app.open(&Route::Saved).await;
            output_page(&page, format)?;
        }
        SavedCommands::Toggle { id } => {
            let resource = app
                .find_resource(&id)
                .await
                .with_context(|| format!("Failed to find resource {}", id))?;
            let outcome = app.toggle_save(&resource);
            if !quiet {
                let verb = if outcome.is_saved() { "Saved" } else { "Removed" };
                println!("{} \"{}\"", verb, resource.title);
            }
        }
        SavedCommands::Create {
            name,
            description,
            public,
        } => {
            let collection = app.create_collection(&name, description.as_deref(), public);
            println!("{}", collection.id);
        }
        SavedCommands::Add { id, collection } => {
            let resource = app
                .find_resource(&id)
                .await
                .with_context(|| format!("Failed to find resource {}", id))?;
            let saved = app.save_to_collection(&resource, &collection)?;
            if !quiet {
                println!("Saved \"{}\" to {}", saved.resource.title, saved.collection_id);
            }
        }
        SavedCommands::Seed => {
            app.load_collections();
            if !quiet {
                println!("Loaded {} collections", app.collections().collections().len());
            }
        }
    }
    Ok(())
}

fn run_auth(app: &mut App, command: AuthCommands, format: OutputFormat) -> Result<()> {
    let signed_in = match command {
        AuthCommands::SignIn { email, password } => app.auth_mut().sign_in(&email, &password),
        AuthCommands::SignUp {
            name,
            email,
            password,
        } => app.auth_mut().sign_up(&name, &email, &password),
        AuthCommands::SignOut => {
            app.auth_mut().sign_out();
            println!("Signed out");
            return Ok(());
        }
        AuthCommands::Whoami => {
            match app.auth().user() {
                Some(user) => output_user(user, format)?,
                None => println!("Not signed in"),
            }
            return Ok(());
        }
    };

    if !signed_in {
        let auth = app.auth();
        let mut messages: Vec<&str> = auth.form_errors().messages().collect();
        messages.extend(auth.error());
        anyhow::bail!("{}", messages.join("; "));
    }
    match app.auth().user() {
        Some(user) => output_user(user, format),
        None => Ok(()),
    }
}

fn run_config(command: &ConfigCommands, config: &Config) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            print!("{}", toml::to_string_pretty(&ConfigFile::from(config))?);
        }
        ConfigCommands::Init { path, force } => {
            if path.exists() && !force {
                anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
            }
            ConfigFile::from(&Config::default()).save(path)?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}

fn write_export(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

fn resolve_format(format: OutputFormat) -> OutputFormat {
    if format == OutputFormat::Auto {
        if is_terminal() {
            OutputFormat::Table
        } else {
            OutputFormat::Json
        }
    } else {
        format
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table
}

fn results_table(results: &[Resource], first: usize) -> Table {
    let cols = ResultColumns::for_width(terminal_width());
    let mut table = new_table();
    table.set_header(vec!["#", "Title", "Authors", "Venue", "Year", "Citations"]);

    for (i, resource) in results.iter().enumerate() {
        table.add_row(vec![
            Cell::new(first + i),
            Cell::new(truncate_at_word(&resource.title, cols.title)).add_attribute(Attribute::Bold),
            Cell::new(truncate_with_ellipsis(&format_authors(&resource.authors), cols.authors)),
            Cell::new(truncate_with_ellipsis(resource.venue().unwrap_or(""), cols.venue)),
            Cell::new(resource.year),
            Cell::new(resource.citation_count),
        ]);
    }
    table
}

fn output_search_page(app: &App, page: &SearchPage, format: OutputFormat) -> Result<()> {
    let info = page.view.page_info;
    let results = page.view.page();

    if format == OutputFormat::Json {
        return print_json(&serde_json::json!({
            "query": page.query,
            "criteria": page.criteria_summary,
            "summary": page.summary,
            "sortBy": app.search().sort_by(),
            "sortOrder": app.search().sort_order(),
            "pageInfo": info,
            "activeFilters": page.active_filters,
            "results": results,
            "error": page.error,
        }));
    }

    if let Some(error) = &page.error {
        eprintln!("{}", error);
    }
    if let Some(criteria) = &page.criteria_summary {
        println!("Advanced search: {}", criteria);
    }
    println!("{}", page.summary);
    if !page.active_filters.is_empty() {
        let chips: Vec<&str> = page.active_filters.iter().map(|f| f.label.as_str()).collect();
        println!("Filters: {}", chips.join(", "));
    }
    if results.is_empty() {
        return Ok(());
    }

    match format {
        OutputFormat::Plain => {
            for (i, resource) in results.iter().enumerate() {
                println!(
                    "{}. {} ({}, {})",
                    info.start() + i,
                    resource.title,
                    resource.resource_type.label(),
                    resource.year
                );
                println!("   {}", format_authors(&resource.authors));
                if let Some(venue) = resource.venue() {
                    println!("   {}", venue);
                }
                println!("   {}", detail_href(&resource.id, &page.query));
            }
        }
        _ => println!("{}", results_table(results, info.start())),
    }

    if info.is_paginated() {
        println!("Page {} of {}", info.page, info.total_pages);
    }
    Ok(())
}

fn output_user(user: &User, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(user);
    }
    println!("{} <{}>", user.name, user.email);
    println!("Role: {:?}", user.role);
    println!("Member since: {}", user.created_at.format("%Y-%m-%d"));
    Ok(())
}

/// Render any page other than search results
fn output_page(page: &Page, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return match page {
            Page::Home(home) => print_json(home),
            Page::StartSearch => print_json(&serde_json::json!({ "title": page.title() })),
            Page::Search(search) => print_json(&search.view.results),
            Page::Detail(DetailPage::Found {
                resource, citation, saved, ..
            }) => print_json(&serde_json::json!({
                "resource": resource,
                "citation": citation,
                "saved": saved,
            })),
            Page::Detail(DetailPage::NotFound { id, back_href }) => print_json(&serde_json::json!({
                "error": page.title(),
                "id": id,
                "back": back_href,
            })),
            Page::Detail(DetailPage::Failed { message, back_href }) => {
                print_json(&serde_json::json!({ "error": message, "back": back_href }))
            }
            Page::Saved(saved) => print_json(saved),
            Page::SignIn(auth) | Page::SignUp(auth) | Page::TestAuth(auth) => print_json(auth),
        };
    }

    match page {
        Page::Home(home) => {
            println!("{}", page.title());
            println!(
                "Access library catalogs, institutional repositories, subscription databases, \
                 and open-access archives in one intelligent search interface."
            );
            println!("Try: {}", home.quick_search.join(", "));
            if let Some(user) = &home.user {
                println!("Signed in as {}", user.name);
            }
            println!("Saved resources: {}", home.saved_count);
        }
        Page::StartSearch => {
            println!("{}", page.title());
            println!("Enter a search term above to find scholarly resources");
        }
        Page::Search(search) => {
            println!("{}", search.summary);
            println!("{}", results_table(search.view.page(), search.view.page_info.start()));
        }
        Page::Detail(DetailPage::Found {
            resource,
            citation,
            saved,
            back_href,
        }) => {
            println!("{}", resource.title);
            println!("{}", resource.authors.join(", "));
            println!(
                "{} | {} | {} citations | {} downloads",
                resource.resource_type.label(),
                resource.year,
                resource.citation_count,
                resource.download_count
            );
            if let Some(venue) = resource.venue() {
                println!("{}", venue);
            }
            if let Some(doi) = &resource.doi {
                println!("DOI: {}", doi);
            }
            println!();
            println!("{}", resource.r#abstract.as_deref().unwrap_or(&resource.description));
            if !resource.keywords.is_empty() {
                println!("\nKeywords: {}", resource.keywords.join(", "));
            }
            if !resource.related_resources.is_empty() {
                println!("\nRelated:");
                for related in &resource.related_resources {
                    println!("  - {} ({})", related.title, related.relationship);
                }
            }
            println!("\nCite: {}", citation);
            println!("{}", if *saved { "Saved" } else { "Not saved" });
            println!("Back: {}", back_href);
        }
        Page::Detail(DetailPage::NotFound { back_href, .. }) => {
            println!("{}", page.title());
            println!("The resource you're looking for doesn't exist or may have been removed.");
            println!("Back: {}", back_href);
        }
        Page::Detail(DetailPage::Failed { message, back_href }) => {
            println!("{}: {}", page.title(), message);
            println!("Back: {}", back_href);
        }
        Page::Saved(saved) => {
            let mut table = new_table();
            table.set_header(vec!["Collection", "Name", "Public", "Resources"]);
            for collection in &saved.collections {
                table.add_row(vec![
                    Cell::new(&collection.id),
                    Cell::new(&collection.name).add_attribute(Attribute::Bold),
                    Cell::new(if collection.is_public { "yes" } else { "no" }),
                    Cell::new(collection.resource_count),
                ]);
            }
            println!("{table}");

            if saved.saved_resources.is_empty() {
                println!("No saved resources yet");
                return Ok(());
            }
            let mut table = new_table();
            table.set_header(vec!["ID", "Title", "Collection", "Saved"]);
            for entry in &saved.saved_resources {
                table.add_row(vec![
                    Cell::new(&entry.resource_id),
                    Cell::new(truncate_at_word(&entry.resource.title, 60)),
                    Cell::new(&entry.collection_id),
                    Cell::new(entry.saved_at.format("%Y-%m-%d %H:%M")),
                ]);
            }
            println!("{table}");
        }
        Page::SignIn(auth) | Page::SignUp(auth) | Page::TestAuth(auth) => {
            println!("{}", page.title());
            if let Some(redirect) = &auth.redirect {
                println!("Already signed in, redirecting to {}", redirect);
            }
            println!("Is Authenticated: {}", auth.is_authenticated);
            if let Some(user) = &auth.user {
                println!("Name: {}", user.name);
                println!("Email: {}", user.email);
                println!("Role: {:?}", user.role);
                println!("Created: {}", user.created_at.to_rfc3339());
            }
            if let Some(error) = &auth.error {
                println!("Error: {}", error);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_version() {
        let version = env!("CARGO_PKG_VERSION");
        assert!(!version.is_empty());
        let parts: Vec<&str> = version.split('.').collect();
        assert!(parts.len() >= 2);
        assert!(parts[0].parse::<u32>().is_ok());
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["scholar-discovery"]);
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
        assert!(!cli.instant);
        assert_eq!(cli.output, OutputFormat::Auto);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_verbose_and_output() {
        let cli = Cli::parse_from(["scholar-discovery", "-vv", "-o", "json"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.output, OutputFormat::Json);
    }

    #[test]
    fn test_cli_search_command() {
        let cli = Cli::parse_from([
            "scholar-discovery",
            "search",
            "machine learning",
            "--facet",
            "type=article",
            "--sort",
            "citations",
            "--order",
            "asc",
            "--page",
            "2",
            "--where",
            "not author:Chen",
        ]);
        let Some(Commands::Search { search }) = cli.command else {
            panic!("Expected Search command");
        };
        assert_eq!(search.sort, Some(SortBy::Citations));
        assert_eq!(search.order, Some(SortOrder::Ascending));
        assert_eq!(search.page, 2);

        let params = search.params();
        assert_eq!(params.q, "machine learning");
        assert!(params.facets.is_selected("type", "article"));
        assert_eq!(params.criteria[0].field, SearchField::Author);
        assert_eq!(params.criteria[0].operator, CriteriaOperator::Not);
        assert_eq!(params.filters, None);
    }

    #[test]
    fn test_search_advanced_filters() {
        let cli = Cli::parse_from(["scholar-discovery", "s", "--year-from", "2022", "--type", "book"]);
        let Some(Commands::Search { search }) = cli.command else {
            panic!("Expected Search command");
        };
        let filters = search.advanced_filters().unwrap();
        assert!(filters.is_active());
        assert_eq!(search.params().q, "");
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(
            parse_facet("year=2023").unwrap(),
            ("year".to_string(), "2023".to_string())
        );
        assert!(parse_facet("year").is_err());
        assert!(parse_facet("=2023").is_err());

        let criterion = parse_criterion("title: deep learning").unwrap();
        assert_eq!(criterion.field, SearchField::Title);
        assert_eq!(criterion.value, "deep learning");
        assert_eq!(criterion.operator, CriteriaOperator::And);
        assert!(parse_criterion("venue:Nature").is_err());
        assert!(parse_criterion("author").is_err());
    }

    #[test]
    fn test_cli_export_command() {
        let cli = Cli::parse_from([
            "scholar-discovery",
            "export",
            "learning",
            "-F",
            "bib",
            "--scope",
            "all",
            "--to",
            "out",
        ]);
        match cli.command {
            Some(Commands::Export {
                id,
                format,
                scope,
                destination,
                search,
            }) => {
                assert_eq!(id, None);
                assert_eq!(format, ExportFormat::Bibtex);
                assert_eq!(scope, ExportScope::All);
                assert_eq!(destination, Some(PathBuf::from("out")));
                assert_eq!(search.query, "learning");
            }
            _ => panic!("Expected Export command"),
        }
    }

    #[test]
    fn test_cli_nested_commands() {
        let cli = Cli::parse_from(["scholar-discovery", "saved", "toggle", "3"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Saved {
                command: SavedCommands::Toggle { .. }
            })
        ));

        let cli = Cli::parse_from(["scholar-discovery", "auth", "sign-in", "a@b.co", "secret"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Auth {
                command: AuthCommands::SignIn { .. }
            })
        ));

        let cli = Cli::parse_from(["scholar-discovery", "detail", "1", "--cite", "mla"]);
        match cli.command {
            Some(Commands::Detail { id, cite, .. }) => {
                assert_eq!(id, "1");
                assert_eq!(cite, Some(CitationStyle::Mla));
            }
            _ => panic!("Expected Detail command"),
        }
    }
}
