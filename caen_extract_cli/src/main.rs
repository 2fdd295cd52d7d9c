use clap::{Arg, ArgAction, Command};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use indicatif_log_bridge::LogWrapper;
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use libcaen_extract::channel_selection::ChannelSelection;
use libcaen_extract::config::Config;
use libcaen_extract::dat_file::TrailingBytes;
use libcaen_extract::process::process;
use libcaen_extract::worker_status::WorkerStatus;

fn make_template_config(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    let yaml_str = serde_yaml::to_string(&config)?;
    let mut file = File::create(path)?;
    file.write_all(yaml_str.as_bytes())?;
    Ok(())
}

/// The input must exist, be a regular file and be readable
fn check_input(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Err(format!("{} does not exist", path.to_string_lossy()));
    }
    if !path.is_file() {
        return Err(format!("{} is not a file", path.to_string_lossy()));
    }
    File::open(path)
        .map(|_| ())
        .map_err(|e| format!("{} is not readable: {e}", path.to_string_lossy()))
}

fn main() {
    // Create a cli
    let matches = Command::new("caen_extract")
        .about("Extract one or more channels from a binary CAEN .dat file")
        .arg_required_else_help(true)
        .subcommand_negates_reqs(true)
        .args_conflicts_with_subcommands(true)
        .subcommand(
            Command::new("new")
                .about("Make a template configuration yaml file")
                .arg(
                    Arg::new("path")
                        .short('p')
                        .long("path")
                        .required(true)
                        .help("Path to the file"),
                ),
        )
        .arg(
            Arg::new("file")
                .required(true)
                .help("The filename to extract from"),
        )
        .arg(
            Arg::new("channels")
                .short('c')
                .long("channels")
                .value_parser(|s: &str| s.parse::<ChannelSelection>())
                .help("The zero-based channel indexes to extract, e.g., 0-5 or 4,3,8,9"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Output directory or file prefix; the calling directory if not given"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Path to a configuration yaml file"),
        )
        .arg(
            Arg::new("pivot")
                .long("pivot")
                .help("Date (YYYY-MM-DD) used to pick the record layout instead of the file creation time"),
        )
        .arg(
            Arg::new("clock")
                .long("clock")
                .value_parser(clap::value_parser!(f64))
                .help("Digitizer clock frequency in Hz"),
        )
        .arg(
            Arg::new("no-sort")
                .long("no-sort")
                .action(ArgAction::SetTrue)
                .help("Keep events in file order instead of sorting by time"),
        )
        .arg(
            Arg::new("allow-partial")
                .long("allow-partial")
                .action(ArgAction::SetTrue)
                .help("Drop a partial record at the end of the file instead of failing"),
        )
        .arg(
            Arg::new("threads")
                .short('j')
                .long("threads")
                .value_parser(clap::value_parser!(i32))
                .help("Number of workers to divide the channels amongst"),
        )
        .get_matches();

    // Initialize feedback
    let logger = simplelog::TermLogger::new(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );

    let pb_manager = MultiProgress::new();

    LogWrapper::new(pb_manager.clone(), logger)
        .try_init()
        .expect("Could not create logging/progress!");

    if let Some(("new", sub_matches)) = matches.subcommand() {
        let config_path = PathBuf::from(
            sub_matches
                .get_one::<String>("path")
                .expect("We require args"),
        );
        log::info!(
            "Making a template config at {}...",
            config_path.to_string_lossy()
        );
        match make_template_config(&config_path) {
            Ok(()) => log::info!("Done."),
            Err(e) => {
                log::error!("Could not write template config: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    let input = PathBuf::from(matches.get_one::<String>("file").expect("We require args"));
    if let Err(e) = check_input(&input) {
        log::error!("{e}");
        std::process::exit(1);
    }

    // Load our config, then apply the command line on top of it
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => {
            log::info!("Loading config from {path}...");
            match Config::read_config_file(Path::new(path)) {
                Ok(c) => c,
                Err(e) => {
                    log::error!("{e}");
                    std::process::exit(1);
                }
            }
        }
        None => Config::default(),
    };
    if let Some(channels) = matches.get_one::<ChannelSelection>("channels") {
        config.channels = channels.clone();
    }
    if let Some(output) = matches.get_one::<String>("output") {
        config.output = Some(PathBuf::from(output));
    }
    if let Some(pivot) = matches.get_one::<String>("pivot") {
        config.layout_pivot = Some(pivot.clone());
    }
    if let Some(clock) = matches.get_one::<f64>("clock") {
        config.clock_hz = *clock;
    }
    if let Some(threads) = matches.get_one::<i32>("threads") {
        config.n_threads = *threads;
    }
    if matches.get_flag("no-sort") {
        config.sort = false;
    }
    if matches.get_flag("allow-partial") {
        config.trailing_bytes = TrailingBytes::Discard;
    }
    if let Err(e) = config.validate() {
        log::error!("{e}");
        std::process::exit(1);
    }

    log::info!("Input: {}", input.to_string_lossy());
    log::info!("Channels: {}", config.channels);
    log::info!("Clock: {} Hz", config.clock_hz);
    log::info!(
        "Layout pivot: {}",
        config.layout_pivot.as_deref().unwrap_or("file creation time")
    );
    log::info!("Number of workers: {}", config.n_threads);

    // Spawn the task!
    let (tx, rx) = std::sync::mpsc::channel::<WorkerStatus>();
    let handle = std::thread::spawn(move || process(&input, &config, tx));

    let bar_style = ProgressStyle::with_template("[worker] {bar:40.cyan/blue} {pos:>3}% {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    // One bar per worker, created on the first message we get from it
    let mut bars: HashMap<usize, ProgressBar> = HashMap::new();
    for status in rx {
        let pb = bars
            .entry(status.worker_id)
            .or_insert_with(|| pb_manager.add(ProgressBar::new(100).with_style(bar_style.clone())));
        pb.set_message(format!("channel {:02}", status.channel));
        pb.set_position((status.progress * 100.0) as u64);
    }

    let succeeded = match handle.join() {
        Ok(result) => match result {
            Ok(summaries) => {
                let n_events: usize = summaries.iter().map(|s| s.n_events).sum();
                log::info!(
                    "Successfully extracted {} channels ({n_events} events)!",
                    summaries.len()
                );
                true
            }
            Err(e) => {
                log::error!("Extraction failed with error: {e}");
                false
            }
        },
        Err(_) => {
            log::error!("Failed to join extraction task!");
            false
        }
    };

    for pb in bars.values() {
        pb.finish();
    }

    if !succeeded {
        std::process::exit(1);
    }
    log::info!("Done.");
}
