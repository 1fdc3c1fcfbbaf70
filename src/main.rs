use clap::Parser;
use tracing_subscriber::EnvFilter;

use defensis::cli;
use defensis::errors::DefensisError;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        let class = e.classify();
        eprintln!("Error: {}", e);
        if class.programming_error {
            tracing::error!(error_type = class.error_type, "Unexpected error");
        }
        std::process::exit(class.exit_code);
    }
}

async fn run(cli: cli::Cli) -> Result<(), DefensisError> {
    let config = cli::load_config(cli.config.as_deref()).await?;
    let color = !cli.no_color && config.output.as_ref().and_then(|o| o.color).unwrap_or(true);
    if !color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }
    let session_dir = cli::resolve_session_dir(cli.session_dir.as_deref(), &config);

    match cli.command {
        cli::Commands::Scan(args) => cli::scan::handle_scan(args, &config, cli.quiet).await,
        cli::Commands::Validate(args) => cli::validate::handle_validate(args).await,
        cli::Commands::Login(args) => cli::session::handle_login(args, session_dir).await,
        cli::Commands::Signup(args) => cli::session::handle_signup(args, session_dir).await,
        cli::Commands::Logout => cli::session::handle_logout(session_dir).await,
        cli::Commands::Whoami => cli::session::handle_whoami(session_dir).await,
    }
}
