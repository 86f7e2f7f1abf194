use clap::Parser;
use tidy_cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    tidy_cli::init_logging(cli.verbose);

    if let Err(e) = tidy_cli::run(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
