use std::process;

mod cli;
mod config;

fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();
    if let Err(err) = cli::run() {
        log::error!("{err:#}");
        eprintln!("{}", cli::alert(&err));
        process::exit(1);
    }
}
