use toolgate::cli::commands::{CliArgs, Commands};
use toolgate::cli::handlers::{handle_invoke, handle_serve, handle_tools};
use toolgate::util::logging::{self, LoggingConfig};
use toolgate::VERSION;

use clap::Parser;
use tracing::{debug, Level};

#[tokio::main]
async fn main() {
    // A missing .env is fine; real environment variables still apply.
    let dotenv = dotenvy::dotenv();

    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("toolgate v{} starting", VERSION);
    match dotenv {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => eprintln!("Warning: failed to load .env: {}", e),
    }
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Serve(serve_args) => handle_serve(serve_args).await,
        Commands::Invoke(invoke_args) => handle_invoke(invoke_args).await,
        Commands::Tools(tools_args) => handle_tools(tools_args).await,
    };

    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    let mut config = LoggingConfig::from_env();

    if let Some(level_str) = &args.log_level {
        config.level = logging::parse_level(level_str);
    } else if args.verbose {
        config.level = Level::DEBUG;
    } else if args.quiet {
        config.level = Level::ERROR;
    }

    logging::init_logging(config);
}
