use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use versions_checker::commands::{
    UnusedOptions, UpdatesOptions, create_index_client, execute_unused, execute_updates,
};
use versions_checker::config::{
    CheckerConfig, DEFAULT_EGGS_DIR, DEFAULT_SERVICE_URL, DEFAULT_SOURCE, DEFAULT_THREADS,
    FETCH_TIMEOUT_MS,
};
use versions_checker::manifest::{Sorting, WriteOptions};

#[derive(Parser)]
#[command(name = "versions-checker")]
#[command(version, about = "Checks the pinned versions of a buildout versions file")]
struct Cli {
    /// Increase verbosity (specify multiple times for more)
    #[arg(short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Decrease verbosity (specify multiple times for more)
    #[arg(short, action = clap::ArgAction::Count, global = true)]
    quiet: u8,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH", global = true)]
    log_file: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check available updates of the pinned versions
    Updates(UpdatesArgs),
    /// Find pinned versions without an installed egg
    Unused(UnusedArgs),
}

#[derive(Args)]
struct LayoutArgs {
    /// Spaces used when indenting "key = value" (default: auto)
    #[arg(long = "indent", value_name = "SPACES")]
    indentation: Option<usize>,

    /// Sorting algorithm used on the keys when writing the source file
    #[arg(long, value_enum)]
    sorting: Option<Sorting>,
}

impl LayoutArgs {
    fn write_options(&self) -> WriteOptions {
        WriteOptions {
            indentation: self.indentation,
            sorting: self.sorting.unwrap_or_default(),
        }
    }
}

#[derive(Args)]
struct UpdatesArgs {
    /// The file where versions are pinned
    #[arg(default_value = DEFAULT_SOURCE)]
    source: PathBuf,

    /// Include package when checking updates (can be used multiple times)
    #[arg(short, long = "include", value_name = "PACKAGE")]
    includes: Vec<String>,

    /// Exclude package when checking updates (can be used multiple times)
    #[arg(short, long = "exclude", value_name = "PACKAGE")]
    excludes: Vec<String>,

    /// Write the updates in the source file
    #[arg(short, long)]
    write: bool,

    /// Number of packages checked in parallel
    #[arg(short, long, default_value_t = DEFAULT_THREADS)]
    threads: usize,

    /// The service to use for checking the packages
    #[arg(long, default_value = DEFAULT_SERVICE_URL)]
    service_url: String,

    /// Timeout of a single request in milliseconds
    #[arg(long, value_name = "MS", default_value_t = FETCH_TIMEOUT_MS)]
    timeout: u64,

    /// Fail as soon as one package cannot be checked
    #[arg(long)]
    strict: bool,

    #[command(flatten)]
    layout: LayoutArgs,
}

#[derive(Args)]
struct UnusedArgs {
    /// The file where versions are pinned
    #[arg(default_value = DEFAULT_SOURCE)]
    source: PathBuf,

    /// The directory where the eggs are located
    #[arg(long, default_value = DEFAULT_EGGS_DIR)]
    eggs: PathBuf,

    /// Exclude package when checking unused pins (can be used multiple times)
    #[arg(short, long = "exclude", value_name = "PACKAGE")]
    excludes: Vec<String>,

    /// Remove the unused pins from the source file
    #[arg(short, long)]
    write: bool,

    #[command(flatten)]
    layout: LayoutArgs,
}

/// Level for the `-v`/`-q` counters, warnings being shown by default
fn level_filter(verbose: u8, quiet: u8) -> LevelFilter {
    match (1 + i16::from(verbose) - i16::from(quiet)).clamp(0, 3) {
        0 => LevelFilter::OFF,
        1 => LevelFilter::WARN,
        2 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    }
}

fn init_tracing(cli: &Cli) -> anyhow::Result<WorkerGuard> {
    let filter = EnvFilter::builder()
        .with_default_directive(level_filter(cli.verbose, cli.quiet).into())
        .from_env_lossy();

    let (writer, guard) = match &cli.log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Cannot open log file {}", path.display()))?;
            tracing_appender::non_blocking(file)
        }
        None => tracing_appender::non_blocking(io::stderr()),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(false)
        .with_ansi(cli.log_file.is_none());

    if cli.log_json {
        builder.json().init();
    } else {
        builder.without_time().init();
    }

    Ok(guard)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();

    match cli.command {
        Command::Updates(args) => {
            let options = UpdatesOptions {
                source: args.source,
                includes: args.includes,
                excludes: args.excludes,
                write: args.write,
                layout: args.layout.write_options(),
                config: CheckerConfig {
                    service_url: args.service_url,
                    threads: args.threads,
                    timeout_ms: args.timeout,
                    strict: args.strict,
                },
            };
            let client = create_index_client(&options.config)?;
            execute_updates(&options, client, &mut stdout).await?;
        }
        Command::Unused(args) => {
            let options = UnusedOptions {
                source: args.source,
                eggs: args.eggs,
                excludes: args.excludes,
                write: args.write,
                layout: args.layout.write_options(),
            };
            execute_unused(&options, &mut stdout)?;
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_tracing(&cli)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rstest::rstest;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[rstest]
    #[case(0, 0, LevelFilter::WARN)]
    #[case(1, 0, LevelFilter::INFO)]
    #[case(2, 0, LevelFilter::DEBUG)]
    #[case(5, 0, LevelFilter::DEBUG)]
    #[case(0, 1, LevelFilter::OFF)]
    #[case(0, 3, LevelFilter::OFF)]
    #[case(2, 1, LevelFilter::INFO)]
    fn level_filter_follows_verbosity_counters(
        #[case] verbose: u8,
        #[case] quiet: u8,
        #[case] expected: LevelFilter,
    ) {
        assert_eq!(level_filter(verbose, quiet), expected);
    }

    #[test]
    fn updates_arguments_are_parsed() {
        let cli = Cli::try_parse_from([
            "versions-checker",
            "-vv",
            "updates",
            "buildout.cfg",
            "-i",
            "Django",
            "-e",
            "egg",
            "-e",
            "lxml",
            "-w",
            "-t",
            "1",
            "--indent",
            "30",
            "--sorting",
            "length",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        let Command::Updates(args) = cli.command else {
            panic!("expected the updates command");
        };
        assert_eq!(args.source, PathBuf::from("buildout.cfg"));
        assert_eq!(args.includes, vec!["Django"]);
        assert_eq!(args.excludes, vec!["egg", "lxml"]);
        assert!(args.write);
        assert_eq!(args.threads, 1);
        assert_eq!(
            args.layout.write_options(),
            WriteOptions {
                indentation: Some(30),
                sorting: Sorting::Length,
            }
        );
    }

    #[test]
    fn unused_arguments_use_defaults() {
        let cli = Cli::try_parse_from(["versions-checker", "unused"]).unwrap();

        let Command::Unused(args) = cli.command else {
            panic!("expected the unused command");
        };
        assert_eq!(args.source, PathBuf::from(DEFAULT_SOURCE));
        assert_eq!(args.eggs, PathBuf::from(DEFAULT_EGGS_DIR));
        assert!(!args.write);
        assert_eq!(args.layout.write_options(), WriteOptions::default());
    }

    #[test]
    fn sorting_rejects_unknown_values() {
        assert!(
            Cli::try_parse_from(["versions-checker", "updates", "--sorting", "none"]).is_err()
        );
    }
}
