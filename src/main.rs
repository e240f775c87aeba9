// Entrypoint for the examples.
// - Keeps `main` small: set up logging, build the API client and hand it
//   to the UI loop.
// - Logs go to stderr; stdout belongs to the menus.

use blueink_examples::{api::ApiClient, config::Config, prompt::Console, ui};
use std::io;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    // Key and URL come from BLUEINK_PRIVATE_API_KEY / BLUEINK_API_URL or
    // the config file. See `config::Config::load`.
    let config = Config::load()?;
    let api = ApiClient::new(&config)?;

    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout());

    match ui::main_menu(&api, &mut console) {
        Err(e) if ui::is_input_closed(&e) => {
            println!();
            println!("Input closed, exiting.");
            Ok(())
        }
        other => other,
    }
}
