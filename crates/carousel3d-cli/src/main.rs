use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use carousel3d_core::{AppConfig, Axis, ScrollDirection};

mod commands;

#[derive(Parser)]
#[command(name = "carousel3d")]
#[command(author, version, about = "A 3D rotating carousel for the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive carousel
    Run {
        /// Card labels; defaults to numbered cards
        labels: Vec<String>,
        /// Number of numbered cards when no labels are given
        #[arg(short = 'n', long)]
        count: Option<usize>,
        /// Wrap around at either end
        #[arg(long = "loop")]
        loop_enabled: bool,
        /// Which axes respond to drags
        #[arg(short, long, value_enum)]
        direction: Option<DirectionArg>,
    },
    /// Print every item's transform for a given live offset
    Inspect {
        /// Number of items
        #[arg(short = 'n', long, default_value_t = 3)]
        items: usize,
        #[arg(short = 'x', long, default_value_t = 0.0, allow_hyphen_values = true)]
        offset_x: f64,
        #[arg(short = 'y', long, default_value_t = 0.0, allow_hyphen_values = true)]
        offset_y: f64,
        /// Axis whose descriptor shape to use
        #[arg(short, long, value_enum, default_value_t = AxisArg::Horizontal)]
        axis: AxisArg,
        #[arg(long = "loop")]
        loop_enabled: bool,
        /// Cell width; defaults to the configured custom width or 400
        #[arg(long)]
        width: Option<f64>,
        /// Cell height; defaults to the configured custom height or 600
        #[arg(long)]
        height: Option<f64>,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Replay one drag and report where it settles
    Simulate {
        /// Number of items
        #[arg(short = 'n', long, default_value_t = 3)]
        items: usize,
        /// Final horizontal delta of the drag
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        dx: f64,
        /// Final vertical delta of the drag
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        dy: f64,
        #[arg(long = "loop")]
        loop_enabled: bool,
        #[arg(short, long, value_enum)]
        direction: Option<DirectionArg>,
        /// Index the carousel starts on
        #[arg(short, long, default_value_t = 0)]
        current: usize,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show or initialize the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DirectionArg {
    Horizontal,
    Vertical,
    All,
}

impl From<DirectionArg> for ScrollDirection {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Horizontal => ScrollDirection::Horizontal,
            DirectionArg::Vertical => ScrollDirection::Vertical,
            DirectionArg::All => ScrollDirection::All,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
enum AxisArg {
    Horizontal,
    Vertical,
}

impl From<AxisArg> for Axis {
    fn from(arg: AxisArg) -> Self {
        match arg {
            AxisArg::Horizontal => Axis::Horizontal,
            AxisArg::Vertical => Axis::Vertical,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load()?;

    // The terminal UI owns stdout, so the viewer logs to a file
    let interactive = matches!(cli.command, Some(Commands::Run { .. }) | None);
    if interactive {
        init_file_logging(&config, &config.log_path())?;
    } else {
        init_logging(&config);
    }

    match cli.command {
        Some(Commands::Run {
            labels,
            count,
            loop_enabled,
            direction,
        }) => commands::run::run(
            &config,
            commands::run::RunOptions {
                labels,
                count,
                loop_enabled,
                direction: direction.map(Into::into),
            },
        ),
        None => commands::run::run(&config, commands::run::RunOptions::default()),
        Some(Commands::Inspect {
            items,
            offset_x,
            offset_y,
            axis,
            loop_enabled,
            width,
            height,
            json,
        }) => commands::inspect::run(
            &config,
            commands::inspect::InspectOptions {
                items,
                offset_x,
                offset_y,
                axis: axis.into(),
                loop_enabled,
                width,
                height,
                json,
            },
        ),
        Some(Commands::Simulate {
            items,
            dx,
            dy,
            loop_enabled,
            direction,
            current,
            json,
        }) => commands::simulate::run(
            &config,
            commands::simulate::SimulateOptions {
                items,
                dx,
                dy,
                loop_enabled,
                direction: direction.map(Into::into),
                current,
                json,
            },
        ),
        Some(Commands::Config { action }) => match action {
            ConfigAction::Show => commands::config::show(&config),
            ConfigAction::Init { force } => commands::config::init(force),
        },
    }
}

fn env_filter(config: &AppConfig) -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
    )
}

/// Log to stderr for the one-shot commands
fn init_logging(config: &AppConfig) {
    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Log to a file while the terminal UI is up
fn init_file_logging(config: &AppConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_inspect_with_negative_offset() {
        let cli = Cli::try_parse_from([
            "carousel3d", "inspect", "-n", "4", "--offset-x", "-200", "--loop", "--json",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Inspect {
                items,
                offset_x,
                loop_enabled,
                json,
                axis,
                ..
            }) => {
                assert_eq!(items, 4);
                assert_eq!(offset_x, -200.0);
                assert!(loop_enabled);
                assert!(json);
                assert_eq!(axis, AxisArg::Horizontal);
            }
            _ => panic!("expected inspect"),
        }
    }

    #[test]
    fn test_parse_simulate() {
        let cli = Cli::try_parse_from([
            "carousel3d", "simulate", "--dx", "-80", "--direction", "all", "-c", "2",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Simulate { dx, direction, current, .. }) => {
                assert_eq!(dx, -80.0);
                assert!(matches!(direction, Some(DirectionArg::All)));
                assert_eq!(current, 2);
            }
            _ => panic!("expected simulate"),
        }
    }

    #[test]
    fn test_no_subcommand_runs_viewer() {
        let cli = Cli::try_parse_from(["carousel3d"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
