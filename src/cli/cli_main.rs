use super::cli_args::{
    CliOptions, Command, DEFAULT_BETA, DEFAULT_BLOWOFF_ETA_MAX, DEFAULT_BLOWOFF_F0_1,
    DEFAULT_BLOWOFF_F0_2, DEFAULT_BLOWOFF_N, DEFAULT_ETA_MAX, DEFAULT_F0, DEFAULT_N, USAGE,
    parse_args,
};
use super::cli_commands::{EXIT_ERROR, run_command};
use log::LevelFilter;
use simplelog::{Config, SimpleLogger};
use std::io::{self, Write};

fn init_logger(level: LevelFilter) {
    // a second init (tests, repeated menu runs) is harmless
    let _ = SimpleLogger::init(level, Config::default());
}

/// Entry of the `fsbl` binary; `args` excludes the program name.
pub fn run_cli(args: &[String]) -> i32 {
    if args.is_empty() {
        init_logger(LevelFilter::Info);
        run_interactive_menu();
        return 0;
    }
    match parse_args(args) {
        Ok((command, options)) => {
            init_logger(options.log_level);
            run_command(&command, &options)
        }
        Err(e) => {
            eprintln!("\x1b[31m{}\x1b[0m\n\n{}", e, USAGE);
            EXIT_ERROR
        }
    }
}

pub fn run_interactive_menu() {
    let options = CliOptions::default();
    loop {
        show_main_menu();
        let Some(choice) = get_user_input() else {
            break;
        };

        let command = match choice.trim() {
            "1" => Command::Wall {
                beta: DEFAULT_BETA,
                f0: DEFAULT_F0,
                n: DEFAULT_N,
                eta_max: DEFAULT_ETA_MAX,
                h0_range: None,
            },
            "2" => Command::Separation {
                f0: DEFAULT_F0,
                n: DEFAULT_N,
                eta_max: DEFAULT_ETA_MAX,
                beta_bounds: None,
            },
            "3" => Command::Blowoff {
                beta: DEFAULT_BETA,
                n: DEFAULT_BLOWOFF_N,
                eta_max: DEFAULT_BLOWOFF_ETA_MAX,
                f0_1: DEFAULT_BLOWOFF_F0_1,
                f0_2: DEFAULT_BLOWOFF_F0_2,
            },
            "4" => Command::Sweep,
            "5" => Command::Help,
            "0" => {
                println!("Goodbye!");
                break;
            }
            _ => {
                println!("Invalid choice. Please try again.");
                continue;
            }
        };
        let status = run_command(&command, &options);
        println!("\x1b[36mexit status: {}\x1b[0m", status);
    }
}

fn show_main_menu() {
    println!(
        "\x1b[34m\n FSBL: Falkner-Skan boundary layer shooting solver \n \x1b[0m"
    );
    println!("\x1b[33m1. Wall curvature (beta = 0, n = 1024, eta_max = 10)\x1b[0m");
    println!("\x1b[33m2. Separation (h0 = 0, beta in [-0.20, -0.19])\x1b[0m");
    println!("\x1b[33m3. Blowoff (n = 65536, eta_max = 40, f0 seeds -0.80, -0.85)\x1b[0m");
    println!("\x1b[33m4. Parameter sweep\x1b[0m");
    println!("\x1b[33m5. Usage\x1b[0m");
    println!("\x1b[33m0. Exit\x1b[0m");
    print!("\x1b[36mEnter your choice: \x1b[0m");
    let _ = io::stdout().flush();
}

/// `None` on end of input
fn get_user_input() -> Option<String> {
    let mut input = String::new();
    match io::stdin().read_line(&mut input) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(input),
    }
}
