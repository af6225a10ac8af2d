use clap::{Arg, Command};
use std::path::Path;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("blade-fatigue")
        .version("0.1.0")
        .about("Rainflow counting and Miner's rule fatigue life for wind-turbine blades")
        .arg(
            Arg::new("run")
                .short('r')
                .long("run")
                .value_name("CONFIG")
                .help("Run the assessment described by a YAML or TOML configuration")
                .required(true),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Write the JSON report to FILE instead of stdout"),
        )
        .after_help("Set RUST_LOG=debug to log cycle counts and damage per segment.")
        .get_matches();

    let output = matches.get_one::<String>("output").map(Path::new);
    if let Some(r) = matches.get_one::<String>("run") {
        blade_fatigue::app_logic::run(r, output)?;
    }
    Ok(())
}
