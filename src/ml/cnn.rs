// ============================================================
// Layer 5 — Convolutional Classifier
// ============================================================
//   tokens [batch, seq]
//     → embedding                       [batch, seq, word_vec_size]
//     → zero-pad seq up to max(window)  (short sentences only)
//     → for each window size w:
//         conv1d(word_vec_size → n_filters, kernel w)
//         → ReLU → batch-norm | dropout
//         → max over time               [batch, n_filters]
//     → concat                          [batch, Σ n_filters]
//     → linear                          [batch, n_classes]
//     → log-softmax

use burn::{
    nn::{
        conv::{Conv1d, Conv1dConfig},
        BatchNorm, BatchNormConfig,
        Dropout, DropoutConfig,
        Embedding, EmbeddingConfig,
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation::{log_softmax, relu},
};

#[derive(Config, Debug)]
pub struct CnnClassifierConfig {
    pub input_size:     usize,
    pub word_vec_size:  usize,
    pub n_classes:      usize,
    pub window_sizes:   Vec<usize>,
    pub n_filters:      Vec<usize>,
    #[config(default = false)]
    pub use_batch_norm: bool,
    #[config(default = 0.5)]
    pub dropout_p:      f64,
}

impl CnnClassifierConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> CnnClassifier<B> {
        let embedding = EmbeddingConfig::new(self.input_size, self.word_vec_size).init(device);

        let convs = self.window_sizes
            .iter()
            .zip(&self.n_filters)
            .map(|(&window, &filters)| {
                Conv1dConfig::new(self.word_vec_size, filters, window).init(device)
            })
            .collect();

        let norms = if self.use_batch_norm {
            self.n_filters
                .iter()
                .map(|&filters| BatchNormConfig::new(filters).init(device))
                .collect()
        } else {
            Vec::new()
        };

        let total_filters: usize = self.n_filters.iter().sum();
        let generator = LinearConfig::new(total_filters, self.n_classes).init(device);
        let dropout   = DropoutConfig::new(self.dropout_p).init();
        let min_length = self.window_sizes.iter().copied().max().unwrap_or(1);

        CnnClassifier { embedding, convs, norms, dropout, generator, min_length }
    }
}

#[derive(Module, Debug)]
pub struct CnnClassifier<B: Backend> {
    pub embedding:  Embedding<B>,
    pub convs:      Vec<Conv1d<B>>,
    /// Empty when the model was trained without batch-norm
    pub norms:      Vec<BatchNorm<B, 1>>,
    pub dropout:    Dropout,
    pub generator:  Linear<B>,
    pub min_length: usize,
}

impl<B: Backend> CnnClassifier<B> {
    /// tokens: [batch, seq_len] → log-probabilities: [batch, n_classes]
    pub fn forward(&self, tokens: Tensor<B, 2, Int>) -> Tensor<B, 2> {
        let x = self.embedding.forward(tokens);
        let [batch_size, seq_len, word_vec_size] = x.dims();

        // The widest kernel needs at least min_length steps
        let x = if seq_len < self.min_length {
            let pad = Tensor::<B, 3>::zeros(
                [batch_size, self.min_length - seq_len, word_vec_size],
                &x.device(),
            );
            Tensor::cat(vec![x, pad], 1)
        } else {
            x
        };

        // Conv1d expects [batch, channels, length]
        let x = x.swap_dims(1, 2);

        let features: Vec<Tensor<B, 2>> = self.convs
            .iter()
            .enumerate()
            .map(|(i, conv)| {
                let h = relu(conv.forward(x.clone()));
                let h = match self.norms.get(i) {
                    Some(norm) => norm.forward(h),
                    None => self.dropout.forward(h),
                };
                let [batch_size, filters, _] = h.dims();
                h.max_dim(2).reshape([batch_size, filters])
            })
            .collect();

        log_softmax(self.generator.forward(Tensor::cat(features, 1)), 1)
    }
}
