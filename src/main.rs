use clap::Parser;

mod cli;
mod commands;
mod config;
mod explorer;
mod session_file;
mod terminal_map;

const DEFAULT_LOG_FILTER: &str = "info";

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_LOG_FILTER))
        .init();
    let cli = cli::Cli::parse();
    commands::run(cli).inspect_err(|err| {
        if let Some(route) = commands::redirect_of(err) {
            eprintln!("{}", commands::hint(route));
        }
    })
}
