#![forbid(unsafe_code)]

use clap::Parser;

fn main() {
    let cli = dashgrid_cli::Cli::parse();
    let json = cli.global.json;
    dashgrid_cli::logging::init(cli.global.log_json);

    if let Err(error) = dashgrid_cli::run(cli) {
        if json {
            eprintln!(
                "{}",
                serde_json::json!({
                    "status": "error",
                    "error": error.to_string(),
                    "exit_code": error.exit_code(),
                })
            );
        } else {
            eprintln!("{error}");
        }
        std::process::exit(error.exit_code());
    }
}
