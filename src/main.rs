use FSBL::cli::cli_main::run_cli;

pub fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let status = run_cli(&args);
    std::process::exit(status);
}
