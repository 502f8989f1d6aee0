//! Postflux CLI - Command-line interface for Postflux
//!
//! Commands:
//! - classify: Classify a feed of posts into records (batch mode)
//! - render: Render a feed as numbered listing rows
//! - summary: Aggregate a feed into category and activity counts
//! - validate: Report posts whose timestamps do not parse

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use postflux::feed::{FeedIssue, PostFeed};
use postflux::timestamp::sort_chronologically;
use postflux::types::{ClassifiedPost, Post};
use postflux::{BatchSummary, PostProcessor, RowFormat, POSTFLUX_VERSION, PRODUCER_NAME};

/// Postflux - Classify activity-tracker posts
#[derive(Parser)]
#[command(name = "postflux")]
#[command(version = POSTFLUX_VERSION)]
#[command(about = "Classify activity-tracker social posts", long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify posts into records
    Classify {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output format
        #[arg(long, default_value = "ndjson")]
        output_format: OutputFormat,

        /// Sort records oldest first (unparseable times last)
        #[arg(long)]
        sort: bool,
    },

    /// Render posts as numbered listing rows
    Render {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Row format
        #[arg(long, default_value = "markdown")]
        row_format: RowFormatArg,

        /// Sort rows oldest first (unparseable times last)
        #[arg(long)]
        sort: bool,
    },

    /// Summarize categories, activities and distance
    Summary {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report posts whose created_at does not parse
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Newline-delimited JSON (one post per line)
    Ndjson,
    /// JSON array of posts
    Json,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Newline-delimited JSON (one record per line)
    Ndjson,
    /// JSON array of records
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

#[derive(Clone, ValueEnum)]
enum RowFormatArg {
    Markdown,
    Html,
}

impl From<RowFormatArg> for RowFormat {
    fn from(arg: RowFormatArg) -> Self {
        match arg {
            RowFormatArg::Markdown => RowFormat::Markdown,
            RowFormatArg::Html => RowFormat::Html,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose { "postflux=debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), PostfluxCliError> {
    match cli.command {
        Commands::Classify {
            input,
            output,
            input_format,
            output_format,
            sort,
        } => cmd_classify(&input, &output, input_format, output_format, sort),

        Commands::Render {
            input,
            output,
            input_format,
            row_format,
            sort,
        } => cmd_render(&input, &output, input_format, row_format.into(), sort),

        Commands::Summary {
            input,
            input_format,
            json,
        } => cmd_summary(&input, input_format, json),

        Commands::Validate {
            input,
            input_format,
            json,
        } => cmd_validate(&input, input_format, json),
    }
}

fn cmd_classify(
    input: &Path,
    output: &Path,
    input_format: InputFormat,
    output_format: OutputFormat,
    sort: bool,
) -> Result<(), PostfluxCliError> {
    let posts = read_posts(input, &input_format)?;
    let records = classify(&PostProcessor::new(), &posts, sort);

    let output_data = format_output(&records, &output_format)?;
    write_output(output, &output_data)
}

fn cmd_render(
    input: &Path,
    output: &Path,
    input_format: InputFormat,
    row_format: RowFormat,
    sort: bool,
) -> Result<(), PostfluxCliError> {
    let posts = read_posts(input, &input_format)?;
    let processor = PostProcessor::with_row_format(row_format);
    let records = classify(&processor, &posts, sort);

    let rows = processor.render_rows(&records);
    let output_data = match row_format {
        RowFormat::Markdown => rows.join("\n") + "\n",
        RowFormat::Html => format!("<ol>\n{}\n</ol>\n", rows.join("\n")),
    };
    write_output(output, &output_data)
}

fn cmd_summary(input: &Path, input_format: InputFormat, json: bool) -> Result<(), PostfluxCliError> {
    let posts = read_posts(input, &input_format)?;
    let processor = PostProcessor::new();
    let summary = processor.summarize(&processor.classify(&posts));

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    Ok(())
}

fn print_summary(summary: &BatchSummary) {
    println!("{} Summary", PRODUCER_NAME);
    println!("================");
    println!("Total posts:    {}", summary.total_posts);
    println!("User-written:   {}", summary.user_written);
    println!("Total distance: {:.2} mi", summary.total_distance_miles);

    println!("\nCategories:");
    for (category, count) in &summary.categories {
        println!("  {:<16} {}", category.as_str(), count);
    }

    let activities = summary.ranked_activities();
    if !activities.is_empty() {
        println!("\nActivities:");
        for (label, count) in activities {
            println!("  {:<16} {}", label, count);
        }
    }

    match (summary.earliest, summary.latest) {
        (Some(earliest), Some(latest)) => {
            println!("\nSpan: {} .. {}", earliest.to_rfc3339(), latest.to_rfc3339());
        }
        _ => println!("\nSpan: no valid timestamps"),
    }
    if summary.invalid_timestamps > 0 {
        println!("Unparseable timestamps: {}", summary.invalid_timestamps);
    }
}

fn cmd_validate(input: &Path, input_format: InputFormat, json: bool) -> Result<(), PostfluxCliError> {
    let posts = read_posts(input, &input_format)?;
    let issues = PostFeed::validate(&posts);

    let report = ValidationReport {
        total_posts: posts.len(),
        valid_posts: posts.len() - issues.len(),
        invalid_posts: issues.len(),
        errors: issues,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total posts:   {}", report.total_posts);
        println!("Valid posts:   {}", report.valid_posts);
        println!("Invalid posts: {}", report.invalid_posts);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for issue in &report.errors {
                println!(
                    "  - Post {}: unparseable created_at {:?}",
                    issue.index, issue.created_at
                );
            }
        }
    }

    match validation_failure(&report.errors) {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

// Helper functions

/// Failure carrying the first unparseable timestamp, if any post has one
fn validation_failure(issues: &[FeedIssue]) -> Option<PostfluxCliError> {
    let first = issues.first()?.clone().into_error();
    Some(PostfluxCliError::ValidationFailed {
        count: issues.len(),
        first,
    })
}

fn classify(processor: &PostProcessor, posts: &[Post], sort: bool) -> Vec<ClassifiedPost> {
    let mut records = processor.classify(posts);
    if sort {
        sort_chronologically(&mut records);
    }
    records
}

fn read_posts(input: &Path, input_format: &InputFormat) -> Result<Vec<Post>, PostfluxCliError> {
    let input_data = if input.to_string_lossy() == "-" {
        if atty::is(atty::Stream::Stdin) {
            tracing::warn!("reading posts from an interactive terminal; end input with Ctrl-D");
        }
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(input)?
    };

    let posts = match input_format {
        InputFormat::Ndjson => PostFeed::parse_ndjson(&input_data)?,
        InputFormat::Json => PostFeed::parse_array(&input_data)?,
    };

    if posts.is_empty() {
        return Err(PostfluxCliError::NoPosts);
    }

    tracing::debug!(posts = posts.len(), input = %input.display(), "read post feed");
    Ok(posts)
}

fn write_output(output: &Path, data: &str) -> Result<(), PostfluxCliError> {
    if output.to_string_lossy() == "-" {
        print!("{}", data);
    } else {
        fs::write(output, data)?;
    }
    Ok(())
}

fn format_output(
    records: &[ClassifiedPost],
    format: &OutputFormat,
) -> Result<String, PostfluxCliError> {
    match format {
        OutputFormat::Ndjson => {
            let mut lines: Vec<String> = Vec::new();
            for record in records {
                lines.push(serde_json::to_string(record)?);
            }
            Ok(lines.join("\n") + "\n")
        }
        OutputFormat::Json => Ok(serde_json::to_string(records)?),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(records)?),
    }
}

// Error types

#[derive(Debug)]
enum PostfluxCliError {
    Io(io::Error),
    Feed(postflux::PostError),
    Json(serde_json::Error),
    NoPosts,
    ValidationFailed {
        count: usize,
        first: postflux::PostError,
    },
}

impl From<io::Error> for PostfluxCliError {
    fn from(e: io::Error) -> Self {
        PostfluxCliError::Io(e)
    }
}

impl From<postflux::PostError> for PostfluxCliError {
    fn from(e: postflux::PostError) -> Self {
        PostfluxCliError::Feed(e)
    }
}

impl From<serde_json::Error> for PostfluxCliError {
    fn from(e: serde_json::Error) -> Self {
        PostfluxCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<PostfluxCliError> for CliError {
    fn from(e: PostfluxCliError) -> Self {
        match e {
            PostfluxCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            PostfluxCliError::Feed(e) => CliError {
                code: "PARSE_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Each post needs string fields text and created_at".to_string()),
            },
            PostfluxCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            PostfluxCliError::NoPosts => CliError {
                code: "NO_POSTS".to_string(),
                message: "No posts found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            PostfluxCliError::ValidationFailed { count, first } => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} posts have unparseable timestamps; first: {}", count, first),
                hint: Some("Fix created_at values or sort without them".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    total_posts: usize,
    valid_posts: usize,
    invalid_posts: usize,
    errors: Vec<FeedIssue>,
}
