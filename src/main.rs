// src/main.rs

use playbook_runner::{cli, run};

fn main() {
    let args = cli::parse();
    std::process::exit(run(args));
}
