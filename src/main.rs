use bf_tree::commands::run::{self, RunArgs};
use clap::Parser;
use std::env;

#[derive(Parser, Debug)]
#[command(name = "bf", version, disable_help_flag = true)]
struct Cli {
    #[command(flatten)]
    args: RunArgs,
}

fn main() {
    // We still pull the program name for help rendering consistency
    let program = env::args().next().unwrap_or_else(|| String::from("bf"));

    let cli = Cli::parse();
    let code = run::run(&program, cli.args);

    std::process::exit(code);
}
