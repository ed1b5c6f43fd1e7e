use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use log::{LevelFilter, error};

use te::config::Config;
use te::game::GameDir;
use te::{engine, logging};

#[derive(Parser, Debug)]
#[command(author, version, about = "Run character-cell games written in Lua")]
struct Cli {
    /// Increase log verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Decrease log verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    quiet: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the game in a directory containing main.lua
    Run {
        path: PathBuf,
        /// Do not watch main.lua for changes
        #[arg(long)]
        no_reload: bool,
    },
    /// Create a starter game in a new or empty directory
    Init { path: PathBuf },
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        const LEVELS: [LevelFilter; 6] = [
            LevelFilter::Off,
            LevelFilter::Error,
            LevelFilter::Warn,
            LevelFilter::Info,
            LevelFilter::Debug,
            LevelFilter::Trace,
        ];
        let index = (3 + self.verbose as i32 - self.quiet as i32).clamp(0, 5);
        LEVELS[index as usize]
    }
}

fn execute(command: Commands) -> te::Result<i32> {
    match command {
        Commands::Run { path, no_reload } => {
            let game = GameDir::open(&path)?;
            let mut config = Config::load(game.root())?;
            if no_reload {
                config.hot_reload = false;
            }
            engine::run(game, config)
        }
        Commands::Init { path } => {
            GameDir::init(&path)?;
            Ok(0)
        }
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = logging::initialize(cli.log_level()) {
        eprintln!("failed to install logger: {err}");
    }

    let code = match execute(cli.command) {
        Ok(code) => code,
        Err(err) => {
            error!("{err}");
            1
        }
    };
    std::process::exit(code);
}
