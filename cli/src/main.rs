mod terminal;

use clap::Parser;
use lanserve_common::config::{Config, DEFAULT_PORT};
use lanserve_core::{detect, server};
use terminal::{logging, print};

/// No flags and no subcommands; the clap surface only provides
/// `--help`/`--version`. Port and served root are fixed by design.
#[derive(Parser)]
#[command(name = "lanserve")]
#[command(about = "Serve the current directory over HTTP on the local network.")]
#[command(version)]
struct CommandLine {}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _: CommandLine = CommandLine::parse();

    logging::init();

    let cfg = Config {
        port: DEFAULT_PORT,
        root: std::env::current_dir()?,
    };

    let selected: Option<String> = detect::detect_private_ipv4();
    print::report(selected.as_deref(), cfg.port);

    tokio::select! {
        result = server::serve(cfg.root, cfg.port) => result,
        _ = tokio::signal::ctrl_c() => {
            print::stopped();
            Ok(())
        }
    }
}
