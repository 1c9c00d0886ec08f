use clap::Parser;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use log::{error, info};
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode, WriteLogger};

use jkfplayer::config::AppConfig;
use jkfplayer::format::FormatRegistry;
use jkfplayer::readable::KifuExporter;
use jkfplayer::Player;

/// Shogi record player
///
/// Reads a game record, walks to the requested ply and prints the selected
/// line as readable kifu.
///
/// ## Usage Examples:
/// ```bash
/// # List the main line
/// ./jkfplayer game.jkf
///
/// # Show the position after ply 24, with forks and comments
/// ./jkfplayer --ply 24 --state --forks --comments game.jkf
///
/// # Write the listing to a file
/// ./jkfplayer -o game.kif game.jkf
/// ```
#[derive(Parser)]
#[command(name = "jkfplayer")]
#[command(about = "Replay and inspect shogi game records")]
#[command(version = "0.1.0")]
struct Args {
    /// Game record (JSON Kifu Format)
    #[arg(value_name = "FILE")]
    record: PathBuf,

    /// Write the listing to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Force overwrite existing output file
    #[arg(long)]
    force: bool,

    /// Ply to go to before printing the position
    #[arg(short, long)]
    ply: Option<usize>,

    /// Include forks in the listing
    #[arg(short, long)]
    forks: bool,

    /// Include comments in the listing
    #[arg(short, long)]
    comments: bool,

    /// Maximum number of plies to list (0 = all)
    #[arg(long, default_value = "0")]
    max_plies: usize,

    /// Print the board at the selected ply
    #[arg(short, long)]
    state: bool,

    /// Print the record as JKF
    #[arg(long)]
    json: bool,

    /// TOML config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the log to this file instead of stderr
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(args: &Args, config: &AppConfig) {
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        config.log_level().parse().unwrap_or(LevelFilter::Warn)
    };
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    let log_file = args
        .log_file
        .clone()
        .or_else(|| config.logging.file.as_ref().map(PathBuf::from));

    let result = match log_file {
        Some(path) => match File::create(&path) {
            Ok(file) => WriteLogger::init(level, log_config, file),
            Err(e) => {
                eprintln!("Error: cannot open log file '{}': {}", path.display(), e);
                process::exit(1);
            }
        },
        None => TermLogger::init(level, log_config, TerminalMode::Stderr, ColorChoice::Auto),
    };
    if let Err(e) = result {
        eprintln!("Warning: logger already initialized: {}", e);
    }
}

fn load_player(path: &Path, config: &AppConfig) -> Result<Player, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("cannot read '{}': {}", path.display(), e))?;
    let outcome = FormatRegistry::default().parse(&text).map_err(|e| e.to_string())?;
    info!("Loaded {} record with {} nodes", outcome.format, outcome.kifu.node_count());
    Player::with_config(outcome.kifu, config.player).map_err(|e| e.to_string())
}

fn main() {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match AppConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        None => AppConfig::default(),
    };
    init_logging(&args, &config);

    if let Some(output) = &args.output {
        if output.exists() && !args.force {
            eprintln!(
                "Error: Output file '{}' already exists. Use --force to overwrite.",
                output.display()
            );
            process::exit(1);
        }
    }

    let mut player = match load_player(&args.record, &config) {
        Ok(player) => player,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error loading record: {}", e);
            process::exit(1);
        }
    };

    if let Some(ply) = args.ply {
        if let Err(e) = player.goto(ply) {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }

    let mut exporter = KifuExporter::new()
        .with_forks(args.forks || config.output.forks.unwrap_or(false))
        .with_comments(args.comments || config.output.comments.unwrap_or(false));
    if args.max_plies > 0 {
        exporter = exporter.with_max_plies(args.max_plies);
    }

    let exported = match &args.output {
        Some(path) => exporter.export(&player, path),
        None => exporter.write_to(&player, &mut io::stdout().lock()),
    };
    if let Err(e) = exported {
        eprintln!("Error during export: {}", e);
        process::exit(1);
    }

    if args.state {
        println!();
        println!("{}手目", player.tesuu());
        println!("{}", player.get_state().display_board());
    }

    if args.json {
        match player.to_jkf() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing record: {}", e);
                process::exit(1);
            }
        }
    }
}
