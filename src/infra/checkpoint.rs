// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Reads (and writes) an ensemble checkpoint directory using
// Burn's CompactRecorder for weights and JSON for everything
// else.
//
// Directory layout:
//   checkpoint/
//     train_config.json   ← hyperparameters used to rebuild shapes
//     vocab.json          ← ["<unk>", "<pad>", token, ...]
//     classes.json        ← [class_0, class_1, ...]
//     rnn.mpk.gz          ← BiLSTM weights   (optional)
//     cnn.mpk.gz          ← CNN weights      (optional)
//
// CompactRecorder:
//   - Serialises module records to MessagePack, gzip-compressed
//   - Appends the .mpk.gz extension itself, so paths are given
//     without it
//   - Records carry no expected shape, so every float parameter
//     is compared against the freshly built model after loading
//
// Reference: Burn Book §5 (Records and Checkpointing)
//            Rust Book §9 (Error Handling)

use anyhow::{bail, Context, Result};
use std::{fs, path::{Path, PathBuf}};
use burn::{
    module::{ModuleVisitor, ParamId},
    prelude::*,
    record::{CompactRecorder, Recorder},
};
use serde::de::DeserializeOwned;

use crate::data::vocab::{Classes, Vocab};
use crate::ml::cnn::CnnClassifier;
use crate::ml::config::TrainConfig;
use crate::ml::rnn::RnnClassifier;

const CONFIG_FILE:  &str = "train_config.json";
const VOCAB_FILE:   &str = "vocab.json";
const CLASSES_FILE: &str = "classes.json";
const RNN_STEM:     &str = "rnn";
const CNN_STEM:     &str = "cnn";
const RECORD_EXT:   &str = "mpk.gz";

/// Loads and saves the files of one checkpoint directory.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn has_rnn(&self) -> bool {
        self.record_path(RNN_STEM).exists()
    }

    pub fn has_cnn(&self) -> bool {
        self.record_path(CNN_STEM).exists()
    }

    // ─── Loading ──────────────────────────────────────────────────────────────

    pub fn load_config(&self) -> Result<TrainConfig> {
        self.read_json(CONFIG_FILE)
    }

    pub fn load_vocab(&self) -> Result<Vocab> {
        let itos: Vec<String> = self.read_json(VOCAB_FILE)?;
        Vocab::from_itos(itos)
            .with_context(|| format!("Invalid vocabulary in '{}'", self.dir.display()))
    }

    pub fn load_classes(&self) -> Result<Classes> {
        let itos: Vec<String> = self.read_json(CLASSES_FILE)?;
        Classes::new(itos)
            .with_context(|| format!("Invalid class list in '{}'", self.dir.display()))
    }

    /// Restore RNN weights into `model`. `None` when the checkpoint has no RNN.
    pub fn load_rnn<B: Backend>(
        &self,
        model:  RnnClassifier<B>,
        device: &B::Device,
    ) -> Result<Option<RnnClassifier<B>>> {
        self.load_member(RNN_STEM, model, device)
    }

    /// Restore CNN weights into `model`. `None` when the checkpoint has no CNN.
    pub fn load_cnn<B: Backend>(
        &self,
        model:  CnnClassifier<B>,
        device: &B::Device,
    ) -> Result<Option<CnnClassifier<B>>> {
        self.load_member(CNN_STEM, model, device)
    }

    fn load_member<B: Backend, M: Module<B>>(
        &self,
        stem:   &str,
        model:  M,
        device: &B::Device,
    ) -> Result<Option<M>> {
        if !self.record_path(stem).exists() {
            tracing::info!("No '{}' weights in '{}'", stem, self.dir.display());
            return Ok(None);
        }

        let path = self.dir.join(stem);
        let record: M::Record = Recorder::<B>::load(&CompactRecorder::new(), path.clone(), device)
            .with_context(|| {
                format!(
                    "Cannot load '{}' weights from '{}'. Does train_config.json match them?",
                    stem,
                    path.display()
                )
            })?;

        let expected = param_shapes(&model);
        let loaded = model.load_record(record);
        let found = param_shapes(&loaded);
        if let Some((got, want)) = first_mismatch(&found, &expected) {
            bail!(
                "'{}' weights in '{}' do not fit the model built from train_config.json: \
                 parameter shape {:?}, expected {:?}",
                stem,
                self.dir.display(),
                got,
                want
            );
        }

        tracing::info!("Loaded '{}' weights", stem);
        Ok(Some(loaded))
    }

    // ─── Helpers ──────────────────────────────────────────────────────────────

    fn record_path(&self, stem: &str) -> PathBuf {
        self.dir.join(format!("{stem}.{RECORD_EXT}"))
    }

    fn read_json<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let path = self.dir.join(name);
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read '{}'", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Malformed JSON in '{}'", path.display()))
    }
}

/// Dims of every float parameter, in visit order.
struct ParamShapes(Vec<Vec<usize>>);

impl<B: Backend> ModuleVisitor<B> for ParamShapes {
    fn visit_float<const D: usize>(&mut self, _id: ParamId, tensor: &Tensor<B, D>) {
        self.0.push(tensor.dims().to_vec());
    }
}

fn param_shapes<B: Backend, M: Module<B>>(model: &M) -> Vec<Vec<usize>> {
    let mut shapes = ParamShapes(Vec::new());
    model.visit(&mut shapes);
    shapes.0
}

/// A missing parameter on either side shows up as an empty shape.
fn first_mismatch(found: &[Vec<usize>], expected: &[Vec<usize>]) -> Option<(Vec<usize>, Vec<usize>)> {
    (0..found.len().max(expected.len()))
        .map(|i| {
            (
                found.get(i).cloned().unwrap_or_default(),
                expected.get(i).cloned().unwrap_or_default(),
            )
        })
        .find(|(f, e)| f != e)
}

// ─── Saving ───────────────────────────────────────────────────────────────────
// Only test fixtures write checkpoints; training happens elsewhere.
#[cfg(test)]
impl CheckpointManager {
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        self.write_json(CONFIG_FILE, cfg)
    }

    pub fn save_vocab(&self, vocab: &Vocab) -> Result<()> {
        self.write_json(VOCAB_FILE, &vocab.itos())
    }

    pub fn save_classes(&self, classes: &Classes) -> Result<()> {
        self.write_json(CLASSES_FILE, &classes.names())
    }

    pub fn save_rnn<B: Backend>(&self, model: &RnnClassifier<B>) -> Result<()> {
        self.save_member(RNN_STEM, model)
    }

    pub fn save_cnn<B: Backend>(&self, model: &CnnClassifier<B>) -> Result<()> {
        self.save_member(CNN_STEM, model)
    }

    fn save_member<B: Backend, M: Module<B>>(&self, stem: &str, model: &M) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        let path = self.dir.join(stem);
        Recorder::<B>::record(&CompactRecorder::new(), model.clone().into_record(), path.clone())
            .with_context(|| format!("Failed to save '{}' weights to '{}'", stem, path.display()))?;

        tracing::debug!("Saved '{}' weights", stem);
        Ok(())
    }

    fn write_json<T: serde::Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;
        let path = self.dir.join(name);
        fs::write(&path, serde_json::to_string_pretty(value)?)
            .with_context(|| format!("Cannot write '{}'", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = burn::backend::NdArray;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_tables_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path());

        let cfg = TrainConfig { hidden_size: 16, ..TrainConfig::default() };
        ckpt.save_config(&cfg).unwrap();
        ckpt.save_vocab(&Vocab::from_itos(strings(&["<unk>", "<pad>", "a"])).unwrap()).unwrap();
        ckpt.save_classes(&Classes::new(strings(&["x", "y"])).unwrap()).unwrap();

        assert_eq!(ckpt.load_config().unwrap(), cfg);
        assert_eq!(ckpt.load_vocab().unwrap().index_of("a"), 2);
        assert_eq!(ckpt.load_classes().unwrap().names(), &strings(&["x", "y"])[..]);
    }

    #[test]
    fn test_missing_member_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path());
        let device = Default::default();

        let cfg = TrainConfig { word_vec_size: 4, hidden_size: 3, n_layers: 1, ..TrainConfig::default() };
        let model = cfg.rnn_config(5, 2).unwrap().init::<TestBackend>(&device);

        assert!(!ckpt.has_rnn());
        assert!(ckpt.load_rnn(model, &device).unwrap().is_none());
    }

    #[test]
    fn test_weights_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path());
        let device = Default::default();

        let cfg = TrainConfig {
            word_vec_size: 4,
            window_sizes:  vec![2],
            n_filters:     vec![3],
            ..TrainConfig::default()
        };
        let saved = cfg.cnn_config(6, 2).unwrap().init::<TestBackend>(&device);
        ckpt.save_cnn(&saved).unwrap();
        assert!(ckpt.has_cnn());

        let fresh = cfg.cnn_config(6, 2).unwrap().init::<TestBackend>(&device);
        let loaded = ckpt.load_cnn(fresh, &device).unwrap().unwrap();

        let tokens = Tensor::<TestBackend, 1, Int>::from_ints([1, 2, 3, 4], &device)
            .reshape([1, 4]);
        let a = saved.forward(tokens.clone()).into_data().convert::<f32>().to_vec::<f32>().unwrap();
        let b = loaded.forward(tokens).into_data().convert::<f32>().to_vec::<f32>().unwrap();
        for (x, y) in a.iter().zip(&b) {
            // CompactRecorder stores half precision
            assert!((x - y).abs() < 1e-2);
        }
    }

    #[test]
    fn test_weights_of_another_shape_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path());
        let device = Default::default();

        let saved_cfg = TrainConfig {
            word_vec_size: 4,
            window_sizes:  vec![2],
            n_filters:     vec![3],
            ..TrainConfig::default()
        };
        let saved = saved_cfg.cnn_config(6, 2).unwrap().init::<TestBackend>(&device);
        ckpt.save_cnn(&saved).unwrap();

        let other_cfg = TrainConfig { n_filters: vec![4], ..saved_cfg };
        let fresh = other_cfg.cnn_config(6, 2).unwrap().init::<TestBackend>(&device);
        let err = ckpt.load_cnn(fresh, &device).unwrap_err();
        assert!(format!("{err:#}").contains("do not fit"));
    }

    #[test]
    fn test_missing_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CheckpointManager::new(dir.path()).load_config().unwrap_err();
        assert!(format!("{err:#}").contains(CONFIG_FILE));
    }
}
