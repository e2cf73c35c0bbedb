//! uSched CLI
//!
//! Local entry point for the schedule builder client.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use usched::{
    cache::{LocalCache, ScheduleCache},
    error::{AppError, Result},
    models::{Config, CourseSelection, CourseSelectionSet, FilterConfig, SortBy, TimePreference},
    pipeline::{self, times::format_minutes},
    services::SchedulerApi,
};

/// uSched - University Schedule Builder Client
#[derive(Parser, Debug)]
#[command(name = "uSched", version, about = "Conflict-free schedule builder client")]
struct Cli {
    /// Path to storage directory containing config and cache files
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List terms the backend offers schedules for
    Terms {
        /// Include terms without published events
        #[arg(long)]
        include_empty: bool,
    },

    /// Browse the catalog: subjects, then codes, then sections
    Catalog {
        /// Term to browse
        term: String,

        /// Subject code (lists catalog numbers when given)
        course_type: Option<String>,

        /// Catalog number (lists section numbers when given)
        course_code: Option<String>,
    },

    /// Generate conflict-free schedules for a course selection
    Generate {
        /// Term to generate for
        term: String,

        /// Courses as TYPE*CODE or TYPE*CODE*SECTION
        #[arg(required = true)]
        courses: Vec<String>,

        /// Sort order: none, fewest_days, most_days, earliest, latest,
        /// clustered, spread
        #[arg(long, default_value = "none")]
        sort_by: String,

        /// Time preference: any, morning, afternoon, evening
        #[arg(long, default_value = "any")]
        time_preference: String,

        /// Maximum days on campus (2-5)
        #[arg(long, default_value_t = 5)]
        max_days: u8,

        /// Minimum average gap between classes, in hours
        #[arg(long, default_value_t = 0.0)]
        min_gap: f64,

        /// Bypass the schedule cache
        #[arg(long)]
        no_cache: bool,

        /// How many schedules to display
        #[arg(long, default_value_t = 10)]
        show: usize,
    },

    /// Download the .ics calendar export for one generated schedule
    Export {
        /// Term the schedule was generated for
        term: String,

        /// Courses as TYPE*CODE or TYPE*CODE*SECTION
        #[arg(required = true)]
        courses: Vec<String>,

        /// Which schedule to export: its `#` position in the `generate`
        /// output, starting at 1
        #[arg(long, default_value_t = 1)]
        index: usize,

        /// Output file
        #[arg(long, default_value = "schedule.ics")]
        output: PathBuf,
    },

    /// Send a free-text suggestion to the platform team
    Suggest {
        /// Suggestion text
        text: String,
    },

    /// Drop the cached schedules for a term
    Invalidate {
        /// Term whose cache entry should be removed
        term: String,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Parse CLI course keys into a selection set.
fn parse_selection(courses: &[String]) -> Result<CourseSelectionSet> {
    let mut set = CourseSelectionSet::new();
    for key in courses {
        set.add(CourseSelection::parse(key)?)?;
    }
    Ok(set)
}

/// Build a filter configuration from CLI flags.
fn parse_filter(sort_by: &str, time_preference: &str, max_days: u8, min_gap: f64) -> Result<FilterConfig> {
    let filter = FilterConfig {
        sort_by: sort_by.parse::<SortBy>()?,
        time_preference: time_preference.parse::<TimePreference>()?,
        max_days,
        min_gap_hours: min_gap,
    };
    filter.validate()?;
    Ok(filter)
}

/// Map a 1-based display position onto a slot in the generated list.
fn export_slot(index: usize, total: usize) -> Result<usize> {
    if index == 0 || index > total {
        return Err(AppError::validation(format!(
            "No schedule #{index}: {total} generated, positions start at #1"
        )));
    }
    Ok(index - 1)
}

/// Print one visible schedule with its derived statistics.
fn print_schedule(position: usize, schedule: &usched::models::Schedule, stats: &pipeline::ScheduleStats) {
    let days: Vec<&str> = stats.days.iter().map(String::as_str).collect();
    println!(
        "#{position}: {} day(s) [{}], {} - {}, avg gap {:.0} min",
        stats.days_count,
        days.join(""),
        format_minutes(stats.earliest_time),
        format_minutes(stats.latest_time),
        stats.avg_gap,
    );
    for (key, events) in schedule {
        for event in events {
            println!(
                "    {key} {} {} {} {}",
                event.event_type, event.days, event.times, event.location
            );
        }
    }
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("uSched client starting...");

    let config_path = cli.storage_dir.join("config.toml");
    let mut config = Config::load_or_default(&config_path);

    let api = SchedulerApi::new(&config.api)?;
    let cache = LocalCache::with_ttl(&cli.storage_dir, config.cache.ttl_secs);

    match cli.command {
        Command::Terms { include_empty } => {
            let terms = api.offered_terms(!include_empty).await?;
            log::info!("{} term(s) offered", terms.len());
            for term in terms {
                println!("{term}");
            }
        }

        Command::Catalog {
            term,
            course_type,
            course_code,
        } => {
            let listing = match (&course_type, &course_code) {
                (None, _) => api.course_types(&term, true).await?,
                (Some(course_type), None) => api.course_codes(&term, course_type, true).await?,
                (Some(course_type), Some(course_code)) => {
                    api.section_numbers(&term, course_type, course_code, true).await?
                }
            };
            for item in listing {
                println!("{item}");
            }
        }

        Command::Generate {
            term,
            courses,
            sort_by,
            time_preference,
            max_days,
            min_gap,
            no_cache,
            show,
        } => {
            if no_cache {
                config.cache.enabled = false;
            }
            let selection = parse_selection(&courses)?;
            let filter = parse_filter(&sort_by, &time_preference, max_days, min_gap)?;

            let mut pager =
                pipeline::run_generate(&api, &cache, &config, &term, &selection, filter).await?;

            if let Some(message) = pager.error() {
                log::error!("Schedule stream stopped early: {message}");
            }

            while pager.visible_count() < show && pager.visible_count() < pager.filtered_count() {
                pager.reveal_more();
            }

            let window = pager.window();
            log::info!(
                "Showing {} of {} filtered schedule(s) ({} fetched)",
                window.visible.min(show),
                window.filtered,
                window.total
            );

            for (position, (schedule, stats)) in pager
                .visible()
                .into_iter()
                .zip(pager.visible_stats())
                .take(show)
                .enumerate()
            {
                // Positions are 1-based, matching `export --index`.
                print_schedule(position + 1, schedule, stats);
            }
        }

        Command::Export {
            term,
            courses,
            index,
            output,
        } => {
            let selection = parse_selection(&courses)?;
            let pager = pipeline::run_generate(
                &api,
                &cache,
                &config,
                &term,
                &selection,
                FilterConfig::default(),
            )
            .await?;

            let slot = export_slot(index, pager.total_count())?;
            let schedule = &pager.all_schedules()[slot];

            let bytes = api.export_events(schedule).await?;
            std::fs::write(&output, &bytes)?;
            log::info!("Calendar written to {}", output.display());
        }

        Command::Suggest { text } => {
            let message = api.submit_suggestion(&text).await?;
            log::info!("Backend says: {message}");
        }

        Command::Invalidate { term } => {
            cache.invalidate(&term).await?;
            log::info!("Cache entry for term '{term}' removed");
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
        }
    }

    log::info!("Done!");

    Ok(())
}
