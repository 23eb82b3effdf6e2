use super::cli_args::{CliOptions, Command, USAGE};
use super::cli_sweep::run_sweep;
use crate::BoundaryLayer::bl_config::SolverConfig;
use crate::BoundaryLayer::bl_error::ShootingError;
use crate::BoundaryLayer::fsbl_api::{solve_blowoff, solve_separation, solve_wall_curvature};
use crate::BoundaryLayer::profile_export::{print_summary, save_profiles};
use crate::BoundaryLayer::secant_blowoff::BlowoffSolution;
use crate::BoundaryLayer::shooting_bvp::ShootingSolution;
use log::error;
use prettytable::{Table, row};
use std::path::Path;

pub const EXIT_CONVERGED: i32 = 0;
pub const EXIT_NOT_CONVERGED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

pub fn load_config(options: &CliOptions) -> Result<SolverConfig, ShootingError> {
    match &options.config_path {
        Some(path) => SolverConfig::from_json_file(path),
        None => Ok(SolverConfig::default()),
    }
}

fn print_solution(solution: &ShootingSolution) {
    println!(
        "beta = {:+.16e}, f0 = {:+.16e}, h0 = {:+.16e}",
        solution.beta(),
        solution.f0,
        solution.h0
    );
    println!("ginf = {:+.16e}", solution.g_end());
    print_summary(solution);
}

fn save_converged(solution: &ShootingSolution, out_dir: &Path) -> Result<i32, ShootingError> {
    let path = save_profiles(out_dir, solution)?;
    println!("\x1b[32mProfiles saved to {}\x1b[0m", path.display());
    Ok(EXIT_CONVERGED)
}

/// Prints a shooting solution and saves it when converged, returns the exit status.
pub fn report_solution(solution: &ShootingSolution, out_dir: &Path) -> Result<i32, ShootingError> {
    print_solution(solution);
    if !solution.converged() {
        println!("\x1b[31mNot converged: {}\x1b[0m", solution.termination);
        return Ok(EXIT_NOT_CONVERGED);
    }
    save_converged(solution, out_dir)
}

/// The profile file is written only when the secant loop reached `h0^2 < h0_tol^2`.
fn report_blowoff(result: &BlowoffSolution, out_dir: &Path) -> Result<i32, ShootingError> {
    let mut table = Table::new();
    table.add_row(row!["iteration", "f0", "h0"]);
    for (i, point) in result.trace.iter().enumerate() {
        table.add_row(row![i, format!("{:+.16e}", point.f0), format!("{:+.16e}", point.h0)]);
    }
    table.printstd();
    if !result.inner_converged {
        println!("\x1b[33mlast inner shooting did not converge\x1b[0m");
    }
    print_solution(&result.solution);
    if !result.converged() {
        println!("\x1b[31mBlowoff not reached: {}\x1b[0m", result.termination);
        return Ok(EXIT_NOT_CONVERGED);
    }
    save_converged(&result.solution, out_dir)
}

pub fn execute(
    command: &Command,
    options: &CliOptions,
    config: &SolverConfig,
) -> Result<i32, ShootingError> {
    match *command {
        Command::Wall {
            beta,
            f0,
            n,
            eta_max,
            h0_range,
        } => {
            let solution = solve_wall_curvature(beta, f0, n, eta_max, h0_range, config)?;
            report_solution(&solution, &options.out_dir)
        }
        Command::Separation {
            f0,
            n,
            eta_max,
            beta_bounds,
        } => {
            let solution = solve_separation(f0, n, eta_max, beta_bounds, config)?;
            report_solution(&solution, &options.out_dir)
        }
        Command::Blowoff {
            beta,
            n,
            eta_max,
            f0_1,
            f0_2,
        } => {
            let result = solve_blowoff(beta, n, eta_max, f0_1, f0_2, config)?;
            report_blowoff(&result, &options.out_dir)
        }
        Command::Sweep => {
            let report = run_sweep(&options.out_dir, config);
            report.print();
            Ok(if report.all_passed() {
                EXIT_CONVERGED
            } else {
                EXIT_NOT_CONVERGED
            })
        }
        Command::Help => {
            println!("{}", USAGE);
            Ok(EXIT_CONVERGED)
        }
    }
}

/// Runs a parsed command, mapping errors to the error exit status.
pub fn run_command(command: &Command, options: &CliOptions) -> i32 {
    let result = load_config(options).and_then(|config| execute(command, options, &config));
    match result {
        Ok(status) => status,
        Err(e) => {
            error!("{}", e);
            eprintln!("\x1b[31mError: {}\x1b[0m", e);
            EXIT_ERROR
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BoundaryLayer::profile_export::ProfileTable;
    use approx::assert_relative_eq;
    use std::fs;

    fn options_in(dir: &Path) -> CliOptions {
        CliOptions {
            out_dir: dir.to_path_buf(),
            ..CliOptions::default()
        }
    }

    #[test]
    fn test_converged_wall_run_saves_profile() {
        let dir = tempfile::tempdir().unwrap();
        let command = Command::Wall {
            beta: 0.0,
            f0: 0.0,
            n: 500,
            eta_max: 10.0,
            h0_range: None,
        };
        assert_eq!(run_command(&command, &options_in(dir.path())), EXIT_CONVERGED);

        let files: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
        let table = ProfileTable::read(files[0].as_ref().unwrap().path()).unwrap();
        assert_eq!(table.len(), 500);
        assert_relative_eq!(table.h0, 0.4696, epsilon = 1e-4);
    }

    #[test]
    fn test_non_converged_run_exits_with_one() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        let mut config = SolverConfig::default();
        config.n_iter_max = 3;
        config.save_to_json_file(&config_path).unwrap();

        let out = dir.path().join("out");
        let options = CliOptions {
            config_path: Some(config_path),
            out_dir: out.clone(),
            ..CliOptions::default()
        };
        let command = Command::Wall {
            beta: 0.0,
            f0: 0.0,
            n: 300,
            eta_max: 10.0,
            h0_range: None,
        };
        assert_eq!(run_command(&command, &options), EXIT_NOT_CONVERGED);
        assert!(!out.exists());
    }

    fn blowoff_options(dir: &Path, config: &SolverConfig) -> CliOptions {
        let config_path = dir.join("config.json");
        config.save_to_json_file(&config_path).unwrap();
        CliOptions {
            config_path: Some(config_path),
            out_dir: dir.join("out"),
            ..CliOptions::default()
        }
    }

    fn blowoff_command() -> Command {
        Command::Blowoff {
            beta: 0.0,
            n: 1000,
            eta_max: 20.0,
            f0_1: -0.80,
            f0_2: -0.85,
        }
    }

    #[test]
    fn test_unfinished_blowoff_saves_nothing() {
        // the inner solves converge, the secant loop does not
        let dir = tempfile::tempdir().unwrap();
        let mut config = SolverConfig::default();
        config.n_outer_max = 1;
        let options = blowoff_options(dir.path(), &config);
        assert_eq!(run_command(&blowoff_command(), &options), EXIT_NOT_CONVERGED);
        assert!(!options.out_dir.exists());
    }

    #[test]
    fn test_converged_blowoff_saves_profile() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = SolverConfig::default();
        config.h0_tol = 1e-5;
        let options = blowoff_options(dir.path(), &config);
        assert_eq!(run_command(&blowoff_command(), &options), EXIT_CONVERGED);

        let files: Vec<_> = fs::read_dir(&options.out_dir).unwrap().collect();
        assert_eq!(files.len(), 1);
        let table = ProfileTable::read(files[0].as_ref().unwrap().path()).unwrap();
        assert!(table.h0.abs() < 1e-5);
        assert_relative_eq!(table.f0, -0.8757, epsilon = 1e-3);
    }

    #[test]
    fn test_errors_exit_with_two() {
        let dir = tempfile::tempdir().unwrap();
        let bad_grid = Command::Wall {
            beta: 0.0,
            f0: 0.0,
            n: 1,
            eta_max: 10.0,
            h0_range: None,
        };
        assert_eq!(run_command(&bad_grid, &options_in(dir.path())), EXIT_ERROR);

        let missing_config = CliOptions {
            config_path: Some(dir.path().join("missing.json")),
            ..options_in(dir.path())
        };
        assert_eq!(run_command(&Command::Help, &missing_config), EXIT_ERROR);
    }
}
