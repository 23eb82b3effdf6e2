//! # Profile files
//!
//! A converged solution is saved as a comma-separated table:
//!
//! ```text
//! # beta = +0.0000000000000000e0, f0 = +0.0000000000000000e0, h0 = +4.6959998836609884e-1
//! # index, eta, f, g, h, hp
//! 0, +0.0000000000000000e0, ...
//! ```
//!
//! `hp = h'` is not stored by the integrator; it is recomputed from the
//! equation at export time. The file name encodes `beta`, `f0`, `n` and
//! `eta_max`.
use super::bl_error::ShootingError;
use super::falkner_skan_ode::{FlowParameters, first_derivatives};
use super::shooting_bvp::ShootingSolution;
use nalgebra::Vector3;
use prettytable::{Table, row};
use regex::Regex;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const PROFILE_COLUMNS: [&str; 6] = ["index", "eta", "f", "g", "h", "hp"];

pub fn profile_file_name(beta: f64, f0: f64, n: usize, eta_max: f64) -> String {
    format!(
        "fsbl_beta{:+.6e}_f0{:+.6e}_n{}_etamax{:.4e}.dat",
        beta, f0, n, eta_max
    )
}

/// Writes the profiles of `solution` into `dir` and returns the file path.
pub fn save_profiles<P: AsRef<Path>>(
    dir: P,
    solution: &ShootingSolution,
) -> Result<PathBuf, ShootingError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let path = dir.join(profile_file_name(
        solution.beta(),
        solution.f0,
        solution.grid.len(),
        solution.grid.eta_max(),
    ));

    let profiles = &solution.profiles;
    let hp = profiles.curvature_derivative(&solution.flow);
    let eta = solution.grid.points();

    let mut writer = BufWriter::new(File::create(&path)?);
    writeln!(
        writer,
        "# beta = {:+.16e}, f0 = {:+.16e}, h0 = {:+.16e}",
        solution.beta(),
        solution.f0,
        solution.h0
    )?;
    writeln!(writer, "# {}", PROFILE_COLUMNS.join(", "))?;
    for i in 0..profiles.len() {
        writeln!(
            writer,
            "{}, {:+.16e}, {:+.16e}, {:+.16e}, {:+.16e}, {:+.16e}",
            i, eta[i], profiles.f[i], profiles.g[i], profiles.h[i], hp[i]
        )?;
    }
    writer.flush()?;
    Ok(path)
}

/// Profile file read back into columns
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileTable {
    pub beta: f64,
    pub f0: f64,
    pub h0: f64,
    pub eta: Vec<f64>,
    pub f: Vec<f64>,
    pub g: Vec<f64>,
    pub h: Vec<f64>,
    pub hp: Vec<f64>,
}

impl ProfileTable {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, ShootingError> {
        let content = fs::read_to_string(path)?;
        let mut lines = content.lines();

        let header = lines
            .next()
            .ok_or_else(|| ShootingError::ParseError("empty profile file".to_string()))?;
        let header_re = Regex::new(
            r"^#\s*beta\s*=\s*(\S+),\s*f0\s*=\s*(\S+),\s*h0\s*=\s*(\S+)\s*$",
        )
        .map_err(|e| ShootingError::ParseError(e.to_string()))?;
        let caps = header_re.captures(header).ok_or_else(|| {
            ShootingError::ParseError(format!("unrecognized profile header: {}", header))
        })?;
        let beta = parse_value(&caps[1])?;
        let f0 = parse_value(&caps[2])?;
        let h0 = parse_value(&caps[3])?;

        let mut table = Self {
            beta,
            f0,
            h0,
            eta: Vec::new(),
            f: Vec::new(),
            g: Vec::new(),
            h: Vec::new(),
            hp: Vec::new(),
        };
        for line in lines {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if fields.len() != PROFILE_COLUMNS.len() {
                return Err(ShootingError::ParseError(format!(
                    "expected {} columns, got {}: {}",
                    PROFILE_COLUMNS.len(),
                    fields.len(),
                    line
                )));
            }
            table.eta.push(parse_value(fields[1])?);
            table.f.push(parse_value(fields[2])?);
            table.g.push(parse_value(fields[3])?);
            table.h.push(parse_value(fields[4])?);
            table.hp.push(parse_value(fields[5])?);
        }
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.eta.len()
    }

    pub fn is_empty(&self) -> bool {
        self.eta.is_empty()
    }
}

fn parse_value(s: &str) -> Result<f64, ShootingError> {
    s.parse::<f64>()
        .map_err(|e| ShootingError::ParseError(format!("'{}': {}", s, e)))
}

/// Console summary of a shooting solution
pub fn summary_table(solution: &ShootingSolution) -> Table {
    let mut table = Table::new();
    table.add_row(row!["Quantity", "Value"]);
    table.add_row(row!["unknown", format!("{:?}", solution.unknown)]);
    table.add_row(row!["beta", format!("{:+20.16}", solution.beta())]);
    table.add_row(row!["f0", format!("{:+20.16}", solution.f0)]);
    table.add_row(row!["h0", format!("{:+20.16}", solution.h0)]);
    table.add_row(row!["g(eta_max)", format!("{:+20.16}", solution.g_end())]);
    table.add_row(row!["residual", format!("{:?}", solution.residual)]);
    table.add_row(row!["n", solution.grid.len()]);
    table.add_row(row!["eta_max", solution.grid.eta_max()]);
    table.add_row(row!["iterations", solution.iterations]);
    table.add_row(row!["termination", solution.termination.to_string()]);
    table
}

pub fn print_summary(solution: &ShootingSolution) {
    summary_table(solution).printstd();
}

/// `h'` column of an exported table, recomputed for checking
pub fn recompute_hp(table: &ProfileTable, flow: &FlowParameters) -> Vec<f64> {
    (0..table.len())
        .map(|i| first_derivatives(&Vector3::new(table.f[i], table.g[i], table.h[i]), flow)[2])
        .collect()
}
