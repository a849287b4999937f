// src/main.rs

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use logbook::config::Config;
use logbook::logging;
use logbook::Result;

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    logging::init_logging(&config.logging, cli.verbose, cli.quiet);

    let db_path = match cli.db {
        Some(path) => path,
        None => config.db_path()?,
    };
    log::debug!("using database {}", db_path.display());

    match cli.command {
        Commands::Init => commands::handle_init(&db_path),
        Commands::Log { message, level } => commands::handle_log(&db_path, message, &level),
        Commands::Get {
            page,
            page_size,
            level,
        } => {
            let page_size = page_size.unwrap_or(config.view.page_size);
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(commands::handle_get(&db_path, page, page_size, level))
        }
        Commands::Clear { yes } => commands::handle_clear(&db_path, yes),
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
