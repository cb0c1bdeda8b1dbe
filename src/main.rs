use anyhow::{bail, Context, Result};
use chrono::{Datelike, Local};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use comeback_calendar::calendar::{
    build_calendar, schedules_for_day, shift_month, CalendarDay, CalendarFilter, ALL_LABEL,
};
use comeback_calendar::config::{AppConfig, CliConfig, FileConfig, DEFAULT_FEED_TIMEOUT_SEC};
use comeback_calendar::debounce::{Debouncer, DEFAULT_DEBOUNCE_MS};
use comeback_calendar::feed::{self, FeedClient};
use comeback_calendar::schedule::{AnnotatedSchedule, ScheduleItem};
use comeback_calendar::search::{search, SearchResult};
use comeback_calendar::storage::{LocalStore, Record, SqliteKeyValueStore};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    if path_buf.is_absolute() {
        return Ok(path_buf);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(path_buf))
}

#[derive(Parser, Debug)]
#[command(
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), "-", env!("GIT_HASH")),
    about = "K-pop comeback, concert and fansign calendar"
)]
struct CliArgs {
    /// Path to the SQLite file holding favorites, records and history.
    #[clap(long, value_parser = parse_path)]
    pub db_path: Option<PathBuf>,

    /// Base URL of the remote schedule feed.
    #[clap(long)]
    pub feed_url: Option<String>,

    /// Timeout in seconds for the feed request.
    #[clap(long, default_value_t = DEFAULT_FEED_TIMEOUT_SEC)]
    pub feed_timeout_sec: u64,

    /// Quiet period before an interactive query is searched.
    #[clap(long, default_value_t = DEFAULT_DEBOUNCE_MS)]
    pub search_debounce_ms: u64,

    /// Load schedules from a local JSON file instead of the feed.
    #[clap(long, value_parser = parse_path)]
    pub schedules_file: Option<PathBuf>,

    /// Path to a TOML config file. Values in it override the flags above.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Print JSON instead of text.
    #[clap(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show a month grid. Defaults to the current month.
    Calendar {
        #[clap(long)]
        year: Option<i32>,
        #[clap(long)]
        month: Option<u32>,
        /// Months to move from the selected month (negative for earlier).
        #[clap(long, default_value_t = 0, allow_hyphen_values = true)]
        shift: i32,
        #[clap(long, default_value = ALL_LABEL)]
        filter: CalendarFilter,
    },
    /// List the schedules of a day (YYYY-MM-DD).
    Day {
        date_key: String,
        #[clap(long, default_value = ALL_LABEL)]
        filter: CalendarFilter,
    },
    /// Search artists and details.
    Search { query: String },
    /// Toggle a schedule in the favorites.
    Favorite { id: i64 },
    /// Save a note for a schedule.
    Record { id: i64, note: String },
    /// Show a schedule and add it to the history.
    View { id: i64 },
    Favorites,
    Records,
    History,
    /// Read queries from stdin and search as you type.
    Interactive,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let cli_config = CliConfig {
        db_path: cli_args.db_path.clone(),
        feed_url: cli_args.feed_url.clone(),
        feed_timeout_sec: cli_args.feed_timeout_sec,
        search_debounce_ms: cli_args.search_debounce_ms,
        schedules_file: cli_args.schedules_file.clone(),
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    let schedules = load_schedules(&config).await?;

    info!("Opening SQLite store at {:?}...", config.db_path);
    let store = LocalStore::new(SqliteKeyValueStore::new(&config.db_path)?);

    let out = Output {
        json: cli_args.json,
    };
    match cli_args.command {
        Command::Calendar {
            year,
            month,
            shift,
            filter,
        } => {
            let today = Local::now().date_naive();
            let (mut year, mut month) =
                (year.unwrap_or(today.year()), month.unwrap_or(today.month()));
            if shift != 0 {
                (year, month) = shift_month(year, month, shift)
                    .with_context(|| format!("Cannot shift {}-{} by {} months", year, month, shift))?;
            }
            let days = build_calendar(year, month, &schedules, &filter);
            if days.is_empty() {
                bail!("Invalid month: {}-{}", year, month);
            }
            out.calendar(year, month, &days)?;
        }
        Command::Day { date_key, filter } => {
            let items = schedules_for_day(&schedules, &date_key, &filter);
            out.schedules(&store.annotate(&items))?;
        }
        Command::Search { query } => {
            out.search_results(&search(&query, &schedules))?;
        }
        Command::Favorite { id } => {
            let item = find_schedule(&schedules, id)?;
            let added = store.toggle_favorite(item);
            out.message(if added {
                format!("Added #{} {} to favorites", item.id, item.artist)
            } else {
                format!("Removed #{} {} from favorites", item.id, item.artist)
            });
        }
        Command::Record { id, note } => {
            let item = find_schedule(&schedules, id)?;
            store.add_record(item, note.trim());
            out.message(format!("Saved note for #{} {}", item.id, item.artist));
        }
        Command::View { id } => {
            let item = find_schedule(&schedules, id)?;
            store.add_to_history(item);
            let entry = AnnotatedSchedule {
                item: item.clone(),
                is_favorite: store.is_favorite(item),
                is_recorded: store.is_recorded(item),
            };
            out.detail(&entry, &store.get_record_note(item))?;
        }
        Command::Favorites => out.schedules(&store.annotate(&store.get_favorites()))?,
        Command::Records => out.records(&store.get_records())?,
        Command::History => out.schedules(&store.annotate(&store.get_history()))?,
        Command::Interactive => {
            run_interactive(schedules, config.search_debounce(), out).await?;
        }
    }

    Ok(())
}

async fn load_schedules(config: &AppConfig) -> Result<Vec<ScheduleItem>> {
    if let Some(path) = &config.schedules_file {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read schedules file: {:?}", path))?;
        let document: serde_json::Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse schedules file: {:?}", path))?;
        let schedules = feed::parse_schedule_document(&document);
        info!("Loaded {} schedules from {:?}", schedules.len(), path);
        return Ok(schedules);
    }

    let client = remote_feed_client(config)?;
    Ok(feed::load_schedules(client.as_ref()).await)
}

#[cfg(not(feature = "no_remote_feed"))]
fn remote_feed_client(config: &AppConfig) -> Result<Option<FeedClient>> {
    match &config.feed.url {
        Some(url) => {
            info!("Using schedule feed at {}", url);
            Ok(Some(FeedClient::new(url, config.feed.timeout_sec)?))
        }
        None => Ok(None),
    }
}

#[cfg(feature = "no_remote_feed")]
fn remote_feed_client(_config: &AppConfig) -> Result<Option<FeedClient>> {
    info!("Remote feed disabled at build time");
    Ok(None)
}

fn find_schedule(schedules: &[ScheduleItem], id: i64) -> Result<&ScheduleItem> {
    match schedules.iter().find(|s| s.id == id) {
        Some(item) => Ok(item),
        None => bail!("No schedule with id {}", id),
    }
}

async fn run_interactive(schedules: Vec<ScheduleItem>, delay: Duration, out: Output) -> Result<()> {
    let (debouncer, mut queries) = Debouncer::<String>::new(delay);

    let printer = tokio::spawn(async move {
        while let Some(query) = queries.recv().await {
            if let Err(e) = out.search_results(&search(&query, &schedules)) {
                error!("Failed to print results for {:?}: {:#}", query, e);
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read query")? {
        debouncer.push(line);
    }
    debouncer.finish().await;
    printer.await.context("Search printer task failed")?;
    Ok(())
}

#[derive(Debug, Clone, Copy)]
struct Output {
    json: bool,
}

impl Output {
    fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    fn message(&self, text: String) {
        if self.json {
            println!("{}", serde_json::json!({ "message": text }));
        } else {
            println!("{}", text);
        }
    }

    fn calendar(&self, year: i32, month: u32, days: &[CalendarDay]) -> Result<()> {
        if self.json {
            return Self::print_json(days);
        }
        println!("{:^28}", format!("{}-{:02}", year, month));
        println!(" Su  Mo  Tu  We  Th  Fr  Sa");
        for week in days.chunks(7) {
            let line: String = week.iter().map(day_cell).collect();
            println!("{}", line.trim_end());
        }
        Ok(())
    }

    fn schedules(&self, items: &[AnnotatedSchedule]) -> Result<()> {
        if self.json {
            return Self::print_json(items);
        }
        if items.is_empty() {
            println!("(none)");
        }
        for entry in items {
            println!("{}", schedule_line(entry));
        }
        Ok(())
    }

    fn detail(&self, entry: &AnnotatedSchedule, note: &str) -> Result<()> {
        if self.json {
            return Self::print_json(&serde_json::json!({ "schedule": entry, "note": note }));
        }
        let item = &entry.item;
        println!("{}", schedule_line(entry));
        let extras = [
            ("Ticket platform", &item.ticket_platform),
            ("Ticket time", &item.ticket_time),
            ("Show time", &item.show_time),
            ("Location", &item.location_text),
            ("Link", &item.detail_url),
        ];
        for (label, value) in extras {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                println!("  {}: {}", label, value);
            }
        }
        if !note.is_empty() {
            println!("  Note: {}", note);
        }
        Ok(())
    }

    fn records(&self, records: &[Record]) -> Result<()> {
        if self.json {
            return Self::print_json(records);
        }
        if records.is_empty() {
            println!("(none)");
        }
        for record in records {
            let item = &record.item;
            println!(
                "#{} {} [{}] {} · {}",
                item.id, item.date_key, item.schedule_type, item.artist, item.detail
            );
            println!("  {} {}", record.recorded_at, record.note);
        }
        Ok(())
    }

    fn search_results(&self, results: &[SearchResult]) -> Result<()> {
        if self.json {
            return Self::print_json(results);
        }
        if results.is_empty() {
            println!("No results");
        }
        for result in results {
            let item = &result.item;
            println!(
                "#{} {} [{}] {} · {}{}",
                item.id,
                item.date_key,
                item.schedule_type,
                item.artist,
                result.display_detail,
                if result.is_exact { " (exact)" } else { "" }
            );
        }
        Ok(())
    }
}

/// Four columns: today marker, day number, event marker.
fn day_cell(day: &CalendarDay) -> String {
    if !day.is_current_month {
        return "  . ".to_string();
    }
    format!(
        "{}{:>2}{}",
        if day.is_today { '>' } else { ' ' },
        day.day,
        if day.has_event { '*' } else { ' ' }
    )
}

fn schedule_line(entry: &AnnotatedSchedule) -> String {
    let item = &entry.item;
    let mut line = format!(
        "#{} {} [{}] {} · {}",
        item.id, item.date_key, item.schedule_type, item.artist, item.detail
    );
    if entry.is_favorite {
        line.push_str(" ★");
    }
    if entry.is_recorded {
        line.push_str(" ✎");
    }
    line
}
