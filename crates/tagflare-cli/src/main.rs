//! `tagflare` binary entry point

use std::process::ExitCode;
use tagflare_cli::{command, execute, exit_code, init_logging, load_dotenv, CliOptions};

#[tokio::main]
async fn main() -> ExitCode {
    let matches = command().get_matches();
    let options = CliOptions::from_matches(&matches);
    init_logging(options.verbose, options.log_json);
    if let Some(path) = load_dotenv() {
        tracing::debug!(path = %path.display(), "loaded environment file");
    }

    match execute(&options).await {
        Ok(output) => {
            print!("{output}");
            if !output.ends_with('\n') {
                println!();
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "tagflare failed");
            eprintln!("error: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}
