// ============================================================
// Layer 5 — Bidirectional LSTM Classifier
// ============================================================
//   tokens [batch, seq]
//     → embedding                [batch, seq, word_vec_size]
//     → n_layers × BiLSTM        [batch, seq, 2 * hidden_size]
//     → last time step           [batch, 2 * hidden_size]
//     → linear                   [batch, n_classes]
//     → log-softmax
//
// Dropout sits between stacked LSTM layers. It only acts on
// autodiff backends, so inference is deterministic.

use burn::{
    nn::{
        BiLstm, BiLstmConfig,
        Dropout, DropoutConfig,
        Embedding, EmbeddingConfig,
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation::log_softmax,
};

#[derive(Config, Debug)]
pub struct RnnClassifierConfig {
    pub input_size:    usize,
    pub word_vec_size: usize,
    pub hidden_size:   usize,
    pub n_classes:     usize,
    #[config(default = 4)]
    pub n_layers:      usize,
    #[config(default = 0.3)]
    pub dropout_p:     f64,
}

impl RnnClassifierConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> RnnClassifier<B> {
        let embedding = EmbeddingConfig::new(self.input_size, self.word_vec_size).init(device);
        let layers = (0..self.n_layers)
            .map(|i| {
                let d_input = if i == 0 { self.word_vec_size } else { self.hidden_size * 2 };
                BiLstmConfig::new(d_input, self.hidden_size, true).init(device)
            })
            .collect();
        let generator = LinearConfig::new(self.hidden_size * 2, self.n_classes).init(device);
        let dropout   = DropoutConfig::new(self.dropout_p).init();
        RnnClassifier { embedding, layers, generator, dropout }
    }
}

#[derive(Module, Debug)]
pub struct RnnClassifier<B: Backend> {
    pub embedding: Embedding<B>,
    pub layers:    Vec<BiLstm<B>>,
    pub generator: Linear<B>,
    pub dropout:   Dropout,
}

impl<B: Backend> RnnClassifier<B> {
    /// tokens: [batch, seq_len] → log-probabilities: [batch, n_classes]
    pub fn forward(&self, tokens: Tensor<B, 2, Int>) -> Tensor<B, 2> {
        let mut x = self.embedding.forward(tokens);
        for (i, layer) in self.layers.iter().enumerate() {
            if i > 0 {
                x = self.dropout.forward(x);
            }
            let (output, _state) = layer.forward(x, None);
            x = output;
        }

        let [batch_size, seq_len, width] = x.dims();
        let last = x
            .slice([0..batch_size, seq_len - 1..seq_len, 0..width])
            .reshape([batch_size, width]);

        log_softmax(self.generator.forward(last), 1)
    }
}
