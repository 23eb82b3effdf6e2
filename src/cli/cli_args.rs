use crate::BoundaryLayer::bl_error::ShootingError;
use log::LevelFilter;
use std::path::PathBuf;

pub const DEFAULT_BETA: f64 = 0.0;
pub const DEFAULT_F0: f64 = 0.0;
pub const DEFAULT_N: usize = 1024;
pub const DEFAULT_ETA_MAX: f64 = 10.0;
pub const DEFAULT_BLOWOFF_N: usize = 65536;
pub const DEFAULT_BLOWOFF_ETA_MAX: f64 = 40.0;
pub const DEFAULT_BLOWOFF_F0_1: f64 = -0.80;
pub const DEFAULT_BLOWOFF_F0_2: f64 = -0.85;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Wall {
        beta: f64,
        f0: f64,
        n: usize,
        eta_max: f64,
        h0_range: Option<(f64, f64)>,
    },
    Separation {
        f0: f64,
        n: usize,
        eta_max: f64,
        beta_bounds: Option<(f64, f64)>,
    },
    Blowoff {
        beta: f64,
        n: usize,
        eta_max: f64,
        f0_1: f64,
        f0_2: f64,
    },
    Sweep,
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CliOptions {
    pub config_path: Option<PathBuf>,
    pub out_dir: PathBuf,
    pub log_level: LevelFilter,
}

impl Default for CliOptions {
    fn default() -> Self {
        Self {
            config_path: None,
            out_dir: PathBuf::from("."),
            log_level: LevelFilter::Info,
        }
    }
}

pub const USAGE: &str = "\
Usage: fsbl <command> [arguments] [options]

Commands:
  wall       [beta] [f0] [n] [eta_max] [h0_min] [h0_max]
  separation [f0] [n] [eta_max] [beta_min] [beta_max]
  blowoff    [beta] [n] [eta_max] [f0_1] [f0_2]
  sweep      [out_dir]
  help

Options:
  --config <file.json>   solver configuration
  --out <dir>            directory for profile files (default .)
  -v, --verbose          debug logging
  -q, --quiet            warnings only

Without arguments an interactive menu is started.";

fn parse_positional<T: std::str::FromStr>(
    positional: &[String],
    index: usize,
    name: &str,
    default: T,
) -> Result<T, ShootingError> {
    match positional.get(index) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| ShootingError::ParseError(format!("invalid {}: '{}'", name, raw))),
        None => Ok(default),
    }
}

/// Both ends of an optional range, or neither
fn parse_range(
    positional: &[String],
    index: usize,
    names: (&str, &str),
) -> Result<Option<(f64, f64)>, ShootingError> {
    match (positional.get(index), positional.get(index + 1)) {
        (None, None) => Ok(None),
        (Some(_), Some(_)) => Ok(Some((
            parse_positional(positional, index, names.0, 0.0)?,
            parse_positional(positional, index + 1, names.1, 0.0)?,
        ))),
        _ => Err(ShootingError::ParseError(format!(
            "{} and {} must be given together",
            names.0, names.1
        ))),
    }
}

fn check_arity(command: &str, positional: &[String], max: usize) -> Result<(), ShootingError> {
    if positional.len() > max {
        return Err(ShootingError::ParseError(format!(
            "{} takes at most {} arguments, got {}",
            command,
            max,
            positional.len()
        )));
    }
    Ok(())
}

/// Parses the arguments after the program name.
pub fn parse_args(args: &[String]) -> Result<(Command, CliOptions), ShootingError> {
    let mut options = CliOptions::default();
    let mut words: Vec<String> = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().ok_or_else(|| {
                    ShootingError::ParseError("--config needs a file path".to_string())
                })?;
                options.config_path = Some(PathBuf::from(path));
            }
            "--out" => {
                let dir = iter.next().ok_or_else(|| {
                    ShootingError::ParseError("--out needs a directory".to_string())
                })?;
                options.out_dir = PathBuf::from(dir);
            }
            "-v" | "--verbose" => options.log_level = LevelFilter::Debug,
            "-q" | "--quiet" => options.log_level = LevelFilter::Warn,
            // negative numbers are positional values, not flags
            flag if flag.starts_with("--") => {
                return Err(ShootingError::ParseError(format!("unknown option {}", flag)));
            }
            _ => words.push(arg.clone()),
        }
    }

    let Some((name, positional)) = words.split_first() else {
        return Ok((Command::Help, options));
    };
    let command = match name.as_str() {
        "wall" => {
            check_arity(name, positional, 6)?;
            Command::Wall {
                beta: parse_positional(positional, 0, "beta", DEFAULT_BETA)?,
                f0: parse_positional(positional, 1, "f0", DEFAULT_F0)?,
                n: parse_positional(positional, 2, "n", DEFAULT_N)?,
                eta_max: parse_positional(positional, 3, "eta_max", DEFAULT_ETA_MAX)?,
                h0_range: parse_range(positional, 4, ("h0_min", "h0_max"))?,
            }
        }
        "separation" => {
            check_arity(name, positional, 5)?;
            Command::Separation {
                f0: parse_positional(positional, 0, "f0", DEFAULT_F0)?,
                n: parse_positional(positional, 1, "n", DEFAULT_N)?,
                eta_max: parse_positional(positional, 2, "eta_max", DEFAULT_ETA_MAX)?,
                beta_bounds: parse_range(positional, 3, ("beta_min", "beta_max"))?,
            }
        }
        "blowoff" => {
            check_arity(name, positional, 5)?;
            Command::Blowoff {
                beta: parse_positional(positional, 0, "beta", DEFAULT_BETA)?,
                n: parse_positional(positional, 1, "n", DEFAULT_BLOWOFF_N)?,
                eta_max: parse_positional(positional, 2, "eta_max", DEFAULT_BLOWOFF_ETA_MAX)?,
                f0_1: parse_positional(positional, 3, "f0_1", DEFAULT_BLOWOFF_F0_1)?,
                f0_2: parse_positional(positional, 4, "f0_2", DEFAULT_BLOWOFF_F0_2)?,
            }
        }
        "sweep" => {
            check_arity(name, positional, 1)?;
            if let Some(dir) = positional.first() {
                options.out_dir = PathBuf::from(dir);
            }
            Command::Sweep
        }
        "help" | "-h" => Command::Help,
        other => {
            return Err(ShootingError::ParseError(format!(
                "unknown command '{}'",
                other
            )));
        }
    };
    Ok((command, options))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_wall_defaults() {
        let (command, options) = parse_args(&args(&["wall"])).unwrap();
        assert_eq!(
            command,
            Command::Wall {
                beta: 0.0,
                f0: 0.0,
                n: 1024,
                eta_max: 10.0,
                h0_range: None
            }
        );
        assert_eq!(options, CliOptions::default());
    }

    #[test]
    fn test_wall_with_negative_values_and_flags() {
        let (command, options) = parse_args(&args(&[
            "-v", "wall", "-0.18", "-0.5", "2048", "20", "0.1", "1.5", "--out", "profiles",
        ]))
        .unwrap();
        assert_eq!(
            command,
            Command::Wall {
                beta: -0.18,
                f0: -0.5,
                n: 2048,
                eta_max: 20.0,
                h0_range: Some((0.1, 1.5))
            }
        );
        assert_eq!(options.log_level, LevelFilter::Debug);
        assert_eq!(options.out_dir, PathBuf::from("profiles"));
    }

    #[test]
    fn test_separation_and_blowoff_defaults() {
        let (command, _) = parse_args(&args(&["separation", "0.0", "2000"])).unwrap();
        assert_eq!(
            command,
            Command::Separation {
                f0: 0.0,
                n: 2000,
                eta_max: 10.0,
                beta_bounds: None
            }
        );
        let (command, options) =
            parse_args(&args(&["blowoff", "--config", "cfg.json", "-q"])).unwrap();
        assert_eq!(
            command,
            Command::Blowoff {
                beta: 0.0,
                n: 65536,
                eta_max: 40.0,
                f0_1: -0.80,
                f0_2: -0.85
            }
        );
        assert_eq!(options.config_path, Some(PathBuf::from("cfg.json")));
        assert_eq!(options.log_level, LevelFilter::Warn);
    }

    #[test]
    fn test_sweep_out_dir() {
        let (command, options) = parse_args(&args(&["sweep", "sweep_out"])).unwrap();
        assert_eq!(command, Command::Sweep);
        assert_eq!(options.out_dir, PathBuf::from("sweep_out"));
    }

    #[test]
    fn test_parse_errors() {
        for bad in [
            vec!["wall", "abc"],
            vec!["wall", "0", "0", "12.5"],
            vec!["wall", "0", "0", "100", "10", "0.1"],
            vec!["separation", "0", "100", "10", "-0.2", "-0.19", "7"],
            vec!["frobnicate"],
            vec!["wall", "--config"],
            vec!["wall", "--unknown"],
        ] {
            match parse_args(&args(&bad)) {
                Err(ShootingError::ParseError(_)) => {}
                other => panic!("expected ParseError for {:?}, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_empty_is_help() {
        let (command, _) = parse_args(&[]).unwrap();
        assert_eq!(command, Command::Help);
    }
}
