use clap::Parser;
use displayres::command::{Command, USAGE};
use displayres::{run_informational, DisplayManager};
use log::{error, info, LevelFilter};
use std::{env, error::Error, io, process};

#[cfg(target_os = "macos")]
use displayres::quartz::QuartzDisplays;
#[cfg(not(target_os = "macos"))]
use displayres::sway::SwayDisplays;

/// Query and change display resolution, depth and refresh rate.
#[derive(Debug, Parser)]
#[command(name = "displayres", disable_help_flag = true, disable_version_flag = true)]
struct Cli {
    /// get, getMax, list, set, -version or help
    #[arg(allow_hyphen_values = true)]
    command: Option<String>,
    /// Command arguments, e.g. one mode per display for `set`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn init_logger() {
    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(LevelFilter::Warn);
    if let Ok(filters) = env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

#[cfg(target_os = "macos")]
async fn connect() -> Result<QuartzDisplays, Box<dyn Error>> {
    Ok(QuartzDisplays::new())
}

#[cfg(not(target_os = "macos"))]
async fn connect() -> Result<SwayDisplays, Box<dyn Error>> {
    Ok(SwayDisplays::connect().await?)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    init_logger();
    info!(
        "starting displayres argv={}",
        env::args().collect::<Vec<_>>().join(" ")
    );
    let cli = Cli::parse();
    let Some(name) = cli.command else {
        error!("Incorrect command line");
        eprintln!("{USAGE}");
        process::exit(1);
    };

    let command = Command::from_args(&name, &cli.args);
    let mut stdout = io::stdout().lock();
    let failures = if command.needs_displays() {
        let mut manager = DisplayManager::new(connect().await?);
        manager.run(&command, &mut stdout).await?;
        manager.failures()
    } else {
        run_informational(&command, &mut stdout)?
    };

    if failures > 0 {
        process::exit(1);
    }
    Ok(())
}
