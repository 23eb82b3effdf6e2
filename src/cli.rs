//! # Command-line shell
//!
//! ```text
//! fsbl wall       [beta] [f0] [n] [eta_max] [h0_min] [h0_max]
//! fsbl separation [f0] [n] [eta_max] [beta_min] [beta_max]
//! fsbl blowoff    [beta] [n] [eta_max] [f0_1] [f0_2]
//! fsbl sweep      [out_dir]
//! ```
//! Exit status is 0 for a converged run with its profile saved, 1 for a run
//! that did not converge and 2 for argument, configuration or solver errors.
//! Without arguments an interactive menu is shown.

pub mod cli_args;
pub mod cli_commands;
pub mod cli_main;
pub mod cli_sweep;
