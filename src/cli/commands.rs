// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Three subcommands share one set of inference flags:
//
//   predict    top-k classes for each sentence
//   evaluate   top-1 accuracy, optionally with pair disambiguation
//   ambiguity  close-call counter over the top-2 classes
//
// clap's derive macros generate --help, error messages for
// missing args, and string → number conversion.

use clap::{Args, Subcommand};

use crate::application::{
    ambiguity_use_case::{AmbiguityConfig, DEFAULT_MARGIN},
    config::InferConfig,
    evaluate_use_case::{EvaluateConfig, PairConfig},
};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the top-k classes of every sentence in the test file
    Predict(PredictArgs),

    /// Report top-1 accuracy against the labels in the test file
    Evaluate(EvaluateArgs),

    /// Count records whose two best classes are close
    Ambiguity(AmbiguityArgs),
}

/// Flags shared by every subcommand.
#[derive(Args, Debug)]
pub struct InferArgs {
    /// Checkpoint directory (train_config.json, vocab.json, classes.json, weights)
    #[arg(long)]
    pub model_fn: String,

    /// Tab-separated test file: label<TAB>tokenized sentence
    #[arg(long, default_value = "data/test_token.tsv")]
    pub test_fn: String,

    /// GPU index; negative runs on the CPU
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    pub gpu_id: i32,

    /// Records per forward pass
    #[arg(long, default_value_t = 256)]
    pub batch_size: usize,

    /// Number of ranked classes per record
    #[arg(long, default_value_t = 2)]
    pub top_k: usize,

    /// Tokens kept per sentence
    #[arg(long, default_value_t = 256)]
    pub max_length: usize,

    /// Leave the RNN out of the ensemble
    #[arg(long)]
    pub drop_rnn: bool,

    /// Leave the CNN out of the ensemble
    #[arg(long)]
    pub drop_cnn: bool,
}

/// The application layer never sees clap types.
impl From<InferArgs> for InferConfig {
    fn from(a: InferArgs) -> Self {
        InferConfig {
            model_fn:   a.model_fn,
            test_fn:    a.test_fn,
            gpu_id:     a.gpu_id,
            batch_size: a.batch_size,
            top_k:      a.top_k,
            max_length: a.max_length,
            drop_rnn:   a.drop_rnn,
            drop_cnn:   a.drop_cnn,
        }
    }
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    #[command(flatten)]
    pub infer: InferArgs,

    /// Only classify the first N records
    #[arg(long)]
    pub limit: Option<usize>,

    /// Print each class with its probability
    #[arg(long)]
    pub with_probs: bool,
}

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    #[command(flatten)]
    pub infer: InferArgs,

    /// Two-class checkpoint that re-judges records whose top-2 is --pair
    #[arg(long, requires = "pair")]
    pub pair_model: Option<String>,

    /// The two class names the pair model separates
    #[arg(long, num_args = 2, value_names = ["A", "B"], requires = "pair_model")]
    pub pair: Option<Vec<String>>,

    /// Append the result as a row to this CSV file
    #[arg(long)]
    pub metrics_csv: Option<String>,
}

impl From<EvaluateArgs> for EvaluateConfig {
    fn from(a: EvaluateArgs) -> Self {
        let pair = match (a.pair_model, a.pair) {
            (Some(model_fn), Some(mut names)) if names.len() == 2 => {
                let second = names.pop().unwrap_or_default();
                let first = names.pop().unwrap_or_default();
                Some(PairConfig { model_fn, first, second })
            }
            _ => None,
        };
        EvaluateConfig {
            infer: a.infer.into(),
            pair,
            metrics_csv: a.metrics_csv,
        }
    }
}

#[derive(Args, Debug)]
pub struct AmbiguityArgs {
    #[command(flatten)]
    pub infer: InferArgs,

    /// Largest top-1/top-2 probability gap counted as a close call
    #[arg(long, default_value_t = DEFAULT_MARGIN)]
    pub margin: f32,
}

impl From<AmbiguityArgs> for AmbiguityConfig {
    fn from(a: AmbiguityArgs) -> Self {
        AmbiguityConfig {
            infer:  a.infer.into(),
            margin: a.margin,
        }
    }
}
