mod cli;
mod config;
mod error;
mod repair;
mod utils;

fn main() {
    cli::run();
}
