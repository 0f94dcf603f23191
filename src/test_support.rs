// Shared fixtures for unit tests: tiny randomly-initialised
// checkpoints written to temporary directories.

use std::path::Path;

use crate::data::vocab::{Classes, Vocab};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::config::TrainConfig;

pub type TestBackend = burn::backend::NdArray;

pub const TOKENS: [&str; 8] = ["<unk>", "<pad>", "the", "model", "data", "method", "we", "propose"];

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn tiny_config() -> TrainConfig {
    TrainConfig {
        word_vec_size:  4,
        hidden_size:    3,
        n_layers:       1,
        dropout:        0.0,
        use_batch_norm: false,
        window_sizes:   vec![2, 3],
        n_filters:      vec![2, 2],
    }
}

/// Write a checkpoint with the given classes and members.
pub fn write_checkpoint(dir: &Path, classes: &[&str], rnn: bool, cnn: bool) -> CheckpointManager {
    let ckpt = CheckpointManager::new(dir);
    let cfg = tiny_config();
    let vocab = Vocab::from_itos(strings(&TOKENS)).unwrap();
    let classes = Classes::new(strings(classes)).unwrap();
    let device = Default::default();

    ckpt.save_config(&cfg).unwrap();
    ckpt.save_vocab(&vocab).unwrap();
    ckpt.save_classes(&classes).unwrap();

    if rnn {
        let model = cfg.rnn_config(vocab.len(), classes.len()).unwrap().init::<TestBackend>(&device);
        ckpt.save_rnn(&model).unwrap();
    }
    if cnn {
        let model = cfg.cnn_config(vocab.len(), classes.len()).unwrap().init::<TestBackend>(&device);
        ckpt.save_cnn(&model).unwrap();
    }
    ckpt
}

/// A small tab-separated test file.
pub fn write_test_file(path: &Path) {
    std::fs::write(
        path,
        "A\tthe model\nB\twe propose a method\n\nC\tdata\nA\tthe data model method we\n",
    )
    .unwrap();
}
