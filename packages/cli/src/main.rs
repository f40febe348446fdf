use clap::Parser;

use tabrest_cli::{logging, Cli};

fn main() {
    let cli = Cli::parse();

    logging::init(cli.debug);

    if let Err(e) = tabrest_cli::run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
