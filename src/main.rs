use std::{env, process::ExitCode};

use bpnnet::{config::TrainingConfig, session};
use log::error;

fn main() -> ExitCode {
    env_logger::init();

    let Some(path) = env::args().nth(1) else {
        eprintln!("usage: bp_nnet <config.json>");
        return ExitCode::from(2);
    };

    let config = match TrainingConfig::from_file(&path) {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let outcome = match session::run(&config) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    for (i, report) in outcome.reports.iter().enumerate() {
        println!(
            "run {}: {} epoch(s), {:?}; accuracy {:.2}% / {:.2}% / {:.2}%, MSE {:.5} / {:.5} / {:.5} (training / generalization / validation)",
            i + 1,
            report.epochs,
            report.termination,
            report.training.accuracy,
            report.generalization.accuracy,
            report.validation.accuracy,
            report.training.mse,
            report.generalization.mse,
            report.validation.mse,
        );
    }

    ExitCode::SUCCESS
}
