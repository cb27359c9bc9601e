/// polyview - compare legacy VTK polydata meshes side by side
use std::process::ExitCode;

use env_logger::Env;
use polyview_term::config::{Config, USAGE};

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = match Config::parse(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            eprintln!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };
    if config.help {
        print!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    match polyview_term::app::run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
