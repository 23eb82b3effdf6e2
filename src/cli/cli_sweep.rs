use super::cli_commands::{EXIT_CONVERGED, EXIT_ERROR, EXIT_NOT_CONVERGED};
use crate::BoundaryLayer::bl_config::SolverConfig;
use crate::BoundaryLayer::fsbl_api::solve_wall_curvature;
use crate::BoundaryLayer::profile_export::save_profiles;
use log::{info, warn};
use prettytable::{Table, row};
use std::path::Path;

pub const SWEEP_ETA_MAX: [f64; 3] = [5.0, 10.0, 20.0];
pub const SWEEP_BETA: [f64; 4] = [-0.18, 0.0, 0.3, 1.0];
/// grid sizes 2^5 ..= 2^14
pub const SWEEP_LOG2_N: std::ops::RangeInclusive<u32> = 5..=14;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepCase {
    pub beta: f64,
    pub f0: f64,
    pub n: usize,
    pub eta_max: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SweepOutcome {
    pub case: SweepCase,
    pub status: i32,
    pub h0: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct SweepReport {
    pub outcomes: Vec<SweepOutcome>,
}

impl SweepReport {
    pub fn passed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status == EXIT_CONVERGED)
            .count()
    }

    pub fn all_passed(&self) -> bool {
        self.passed() == self.outcomes.len()
    }

    pub fn table(&self) -> Table {
        let mut table = Table::new();
        table.add_row(row!["eta_max", "n", "beta", "h0", "status"]);
        for o in &self.outcomes {
            let status = match o.status {
                EXIT_CONVERGED => "pass",
                EXIT_NOT_CONVERGED => "FAIL",
                _ => "ERROR",
            };
            let h0 = o.h0.map_or("-".to_string(), |h0| format!("{:.10}", h0));
            table.add_row(row![o.case.eta_max, o.case.n, o.case.beta, h0, status]);
        }
        table
    }

    pub fn print(&self) {
        self.table().printstd();
        println!("{} of {} cases passed", self.passed(), self.outcomes.len());
    }
}

pub fn sweep_cases() -> Vec<SweepCase> {
    let mut cases = Vec::new();
    for eta_max in SWEEP_ETA_MAX {
        for log2_n in SWEEP_LOG2_N {
            for beta in SWEEP_BETA {
                cases.push(SweepCase {
                    beta,
                    f0: 0.0,
                    n: 1usize << log2_n,
                    eta_max,
                });
            }
        }
    }
    cases
}

pub fn run_case(case: &SweepCase, out_dir: &Path, config: &SolverConfig) -> SweepOutcome {
    let result = solve_wall_curvature(case.beta, case.f0, case.n, case.eta_max, None, config)
        .and_then(|solution| {
            if solution.converged() {
                save_profiles(out_dir, &solution)?;
                Ok((EXIT_CONVERGED, Some(solution.h0)))
            } else {
                Ok((EXIT_NOT_CONVERGED, Some(solution.h0)))
            }
        });
    let (status, h0) = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!("sweep case {:?} failed: {}", case, e);
            (EXIT_ERROR, None)
        }
    };
    SweepOutcome {
        case: *case,
        status,
        h0,
    }
}

pub fn run_cases(cases: &[SweepCase], out_dir: &Path, config: &SolverConfig) -> SweepReport {
    let mut report = SweepReport::default();
    for (i, case) in cases.iter().enumerate() {
        info!(
            "sweep case {}/{}: eta_max = {}, n = {}, beta = {}",
            i + 1,
            cases.len(),
            case.eta_max,
            case.n,
            case.beta
        );
        report.outcomes.push(run_case(case, out_dir, config));
    }
    report
}

pub fn run_sweep(out_dir: &Path, config: &SolverConfig) -> SweepReport {
    run_cases(&sweep_cases(), out_dir, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_sweep_grid() {
        let cases = sweep_cases();
        assert_eq!(cases.len(), 3 * 10 * 4);
        assert_eq!(cases[0].n, 32);
        assert_eq!(cases[cases.len() - 1].n, 16384);
        assert!(cases.iter().all(|c| c.f0 == 0.0));
    }

    #[test]
    fn test_small_sweep_records_pass_and_fail() {
        let dir = tempfile::tempdir().unwrap();
        let cases = [
            SweepCase {
                beta: 0.0,
                f0: 0.0,
                n: 256,
                eta_max: 10.0,
            },
            // too coarse for the far field at eta_max = 20
            SweepCase {
                beta: 0.0,
                f0: 0.0,
                n: 32,
                eta_max: 20.0,
            },
        ];
        let report = run_cases(&cases, dir.path(), &SolverConfig::default());
        assert_eq!(report.outcomes.len(), 2);
        assert_eq!(report.outcomes[0].status, EXIT_CONVERGED);
        assert_ne!(report.outcomes[1].status, EXIT_CONVERGED);
        assert_eq!(report.passed(), 1);
        assert!(!report.all_passed());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
