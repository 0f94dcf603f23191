// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap, hands a config to the matching
// use case in Layer 2, and prints the result. Logs go through
// tracing; results go to stdout.

pub mod commands;
pub mod display;

use anyhow::Result;
use clap::Parser;
use commands::{AmbiguityArgs, Commands, EvaluateArgs, PredictArgs};

#[derive(Parser, Debug)]
#[command(
    name = "ntc-ensemble",
    version = "0.1.0",
    about = "Run an RNN + CNN text-classifier ensemble over a tokenized test file."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Route to the use case. No computation happens here.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Predict(args)   => run_predict(args),
            Commands::Evaluate(args)  => run_evaluate(args),
            Commands::Ambiguity(args) => run_ambiguity(args),
        }
    }
}

fn run_predict(args: PredictArgs) -> Result<()> {
    use crate::application::predict_use_case::PredictUseCase;

    tracing::info!("Predicting '{}' with '{}'", args.infer.test_fn, args.infer.model_fn);

    let with_probs = args.with_probs;
    let ranked = PredictUseCase::new(args.infer.into(), args.limit).execute()?;
    for r in &ranked {
        println!("{}", display::prediction_line(r, with_probs));
    }
    Ok(())
}

fn run_evaluate(args: EvaluateArgs) -> Result<()> {
    use crate::application::evaluate_use_case::EvaluateUseCase;

    tracing::info!("Evaluating '{}' with '{}'", args.infer.test_fn, args.infer.model_fn);

    let metrics = EvaluateUseCase::new(args.into()).execute()?;
    println!("{}", display::accuracy_line(&metrics));
    Ok(())
}

fn run_ambiguity(args: AmbiguityArgs) -> Result<()> {
    use crate::application::ambiguity_use_case::AmbiguityUseCase;

    let margin = args.margin;
    let report = AmbiguityUseCase::new(args.into()).execute()?;
    for line in display::ambiguity_lines(&report, margin) {
        println!("{line}");
    }
    Ok(())
}
