use burn::{
    nn::{
        loss::CrossEntropyLossConfig,
        Embedding, EmbeddingConfig,
        Initializer,
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation::{sigmoid, tanh},
    tensor::backend::AutodiffBackend,
};

use crate::infra::vocab_store::PAD_ID;

#[derive(Config, Debug)]
pub struct BiLmConfig {
    pub vocab_size: usize,
    pub emb_dim:    usize,
    pub units:      usize,
    pub n_layers:   usize,
}

impl BiLmConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> BiLmModel<B> {
        assert!(self.n_layers >= 1, "n_layers must be at least 1");

        let word_embed = EmbeddingConfig::new(self.vocab_size, self.emb_dim)
            .with_initializer(Initializer::Normal { mean: 0.0, std: 0.01 })
            .init(device);
        let forward_lstm  = self.build_stack(device);
        let backward_lstm = self.build_stack(device);
        // Both directions are seen at once, so the head reads 2*units
        let word_pred = LinearConfig::new(2 * self.units, self.vocab_size).init(device);

        BiLmModel {
            word_embed,
            forward_lstm,
            backward_lstm,
            word_pred,
            units:      self.units,
            vocab_size: self.vocab_size,
        }
    }

    fn build_stack<B: Backend>(&self, device: &B::Device) -> StackedLstm<B> {
        let cells = (0..self.n_layers)
            .map(|layer| {
                // Layer 0 reads the embedding; deeper layers read the
                // hidden state of the layer below at the same step
                let d_input = if layer == 0 { self.emb_dim } else { self.units };
                LstmCell {
                    input_proj:  LinearConfig::new(d_input, 4 * self.units).init(device),
                    hidden_proj: LinearConfig::new(self.units, 4 * self.units).init(device),
                    units: self.units,
                }
            })
            .collect();
        StackedLstm { cells, units: self.units }
    }
}

// ─── LstmCell ─────────────────────────────────────────────────────────────────
/// One LSTM cell: the four gates are computed in a single fused
/// projection of the input and the previous hidden state.
///
///   i = σ(gates[0..u])      input gate
///   f = σ(gates[u..2u])     forget gate
///   g = tanh(gates[2u..3u]) cell candidate
///   o = σ(gates[3u..4u])    output gate
///   c' = f ⊙ c + i ⊙ g
///   h' = o ⊙ tanh(c')
#[derive(Module, Debug)]
pub struct LstmCell<B: Backend> {
    pub input_proj:  Linear<B>,
    pub hidden_proj: Linear<B>,
    pub units:       usize,
}

impl<B: Backend> LstmCell<B> {
    /// x: [batch, d_input], h/c: [batch, units] → (h', c')
    pub fn forward(
        &self,
        x: Tensor<B, 2>,
        h: Tensor<B, 2>,
        c: Tensor<B, 2>,
    ) -> (Tensor<B, 2>, Tensor<B, 2>) {
        let [batch, _] = x.dims();
        let u = self.units;

        let gates = self.input_proj.forward(x) + self.hidden_proj.forward(h); // [batch, 4u]

        let i = sigmoid(gates.clone().slice([0..batch, 0..u]));
        let f = sigmoid(gates.clone().slice([0..batch, u..2 * u]));
        let g = tanh(gates.clone().slice([0..batch, 2 * u..3 * u]));
        let o = sigmoid(gates.slice([0..batch, 3 * u..4 * u]));

        let c_next = f * c + i * g;
        let h_next = o * tanh(c_next.clone());
        (h_next, c_next)
    }
}

// ─── StackedLstm ──────────────────────────────────────────────────────────────
/// Recurrent cells composed depth-wise and unrolled over time.
/// Initial hidden and cell state is all-zero for every layer.
#[derive(Module, Debug)]
pub struct StackedLstm<B: Backend> {
    pub cells: Vec<LstmCell<B>>,
    pub units: usize,
}

impl<B: Backend> StackedLstm<B> {
    /// Run the stack over a sequence.
    ///
    /// embedded: [batch, steps, d_input]
    /// mask:     [batch, steps] — 1.0 at real tokens, 0.0 at padding.
    ///           A padding step leaves every layer's h/c exactly as it
    ///           was after the previous step.
    /// reverse:  process time steps last-to-first; the output is
    ///           re-ordered back into natural time order, so entry t
    ///           always describes input position t.
    ///
    /// Returns the top layer's hidden state per step: [batch, steps, units]
    pub fn forward(
        &self,
        embedded: Tensor<B, 3>,
        mask:     Tensor<B, 2>,
        reverse:  bool,
    ) -> Tensor<B, 3> {
        let [batch, steps, d_input] = embedded.dims();
        let device = embedded.device();

        let mut h: Vec<Tensor<B, 2>> = self
            .cells
            .iter()
            .map(|_| Tensor::zeros([batch, self.units], &device))
            .collect();
        let mut c = h.clone();

        let order: Vec<usize> = if reverse {
            (0..steps).rev().collect()
        } else {
            (0..steps).collect()
        };

        let mut outputs: Vec<Tensor<B, 2>> = Vec::with_capacity(steps);

        for s in order {
            let x = embedded
                .clone()
                .slice([0..batch, s..s + 1, 0..d_input])
                .reshape([batch, d_input]); // [batch, d_input]

            // keep = 1 at real tokens, drop = 1 at padding
            let keep = mask.clone().slice([0..batch, s..s + 1]); // [batch, 1]
            let drop = keep.clone().neg().add_scalar(1.0);

            let mut layer_in = x;
            for (l, cell) in self.cells.iter().enumerate() {
                let (h_new, c_new) = cell.forward(layer_in, h[l].clone(), c[l].clone());
                // State freeze: a masked step keeps the previous state
                h[l] = h_new * keep.clone() + h[l].clone() * drop.clone();
                c[l] = c_new * keep.clone() + c[l].clone() * drop.clone();
                layer_in = h[l].clone();
            }
            outputs.push(layer_in);
        }

        if reverse {
            outputs.reverse();
        }
        Tensor::stack(outputs, 1)
    }
}

// ─── BiLmModel ────────────────────────────────────────────────────────────────
#[derive(Module, Debug)]
pub struct BiLmModel<B: Backend> {
    pub word_embed:    Embedding<B>,
    pub forward_lstm:  StackedLstm<B>,
    pub backward_lstm: StackedLstm<B>,
    pub word_pred:     Linear<B>,
    pub units:         usize,
    pub vocab_size:    usize,
}

impl<B: Backend> BiLmModel<B> {
    /// seqs: [batch, steps] token ids → logits [batch, steps-2, vocab]
    ///
    /// Alignment over a sequence 0..T:
    ///   forward stack reads tokens 0..T-2; its entry p has consumed
    ///   tokens 0..=p and predicts token p+1.
    ///   backward stack reads tokens 1..T-1 reversed; its entry at
    ///   position p has consumed tokens p..T-1 and predicts token p-1.
    ///   Concatenating forward entries 0..T-3 with backward entries at
    ///   positions 2..T-1 gives, for each interior token, a view of
    ///   both contexts that excludes the token itself.
    pub fn forward(&self, seqs: Tensor<B, 2, Int>) -> Tensor<B, 3> {
        let [batch, steps] = seqs.dims();
        assert!(steps >= 3, "sequence length must be at least 3, got {steps}");

        let embedded = self.word_embed.forward(seqs.clone()); // [batch, steps, emb]
        let [_, _, emb_dim] = embedded.dims();

        // 1.0 at real tokens, 0.0 at the padding id
        let mask = seqs.not_equal_elem(PAD_ID as i32).float(); // [batch, steps]

        let f = self.forward_lstm.forward(
            embedded.clone().slice([0..batch, 0..steps - 1, 0..emb_dim]),
            mask.clone().slice([0..batch, 0..steps - 1]),
            false,
        ); // [batch, steps-1, units]

        let b = self.backward_lstm.forward(
            embedded.slice([0..batch, 1..steps, 0..emb_dim]),
            mask.slice([0..batch, 1..steps]),
            true,
        ); // [batch, steps-1, units], natural time order

        let joint = Tensor::cat(
            vec![
                f.slice([0..batch, 0..steps - 2, 0..self.units]),
                b.slice([0..batch, 1..steps - 1, 0..self.units]),
            ],
            2,
        ); // [batch, steps-2, 2*units]

        self.word_pred.forward(joint) // [batch, steps-2, vocab]
    }

    /// Masked cross-entropy against the interior tokens.
    /// Returns the scalar loss plus the logits for diagnostic logging.
    pub fn forward_loss(&self, seqs: Tensor<B, 2, Int>) -> (Tensor<B, 1>, Tensor<B, 3>)
    where
        B: AutodiffBackend,
    {
        let [batch, steps] = seqs.dims();
        let logits = self.forward(seqs.clone());

        // Targets are tokens 1..T-2 — the positions with context on
        // both sides. Padding targets are excluded from the average.
        let targets = seqs.slice([0..batch, 1..steps - 1]); // [batch, steps-2]

        let ce = CrossEntropyLossConfig::new()
            .with_pad_tokens(Some(vec![PAD_ID]))
            .init(&logits.device());

        let loss = ce.forward(
            logits.clone().reshape([batch * (steps - 2), self.vocab_size]),
            targets.reshape([batch * (steps - 2)]),
        );
        (loss, logits)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::grad_clipping::GradientClippingConfig;
    use burn::optim::{AdamConfig, GradientsParams, Optimizer};
    use burn::tensor::Distribution;

    type TestBackend = burn::backend::NdArray;
    type AutoBackend = burn::backend::Autodiff<burn::backend::NdArray>;

    /// vocab {0..=4}, two rows of length 5, one with a padding tail
    fn toy_batch<B: Backend>(device: &B::Device) -> Tensor<B, 2, Int> {
        Tensor::<B, 1, Int>::from_ints(
            [2, 1, 3, 4, 3, 2, 4, 3, 0, 0].as_slice(),
            device,
        )
        .reshape([2, 5])
    }

    #[test]
    fn test_logits_shape_is_batch_by_interior_by_vocab() {
        let device = Default::default();
        let model = BiLmConfig::new(5, 8, 6, 2).init::<TestBackend>(&device);

        let logits = model.forward(toy_batch(&device));
        assert_eq!(logits.dims(), [2, 3, 5]);
    }

    #[test]
    fn test_masked_step_freezes_state() {
        let device = Default::default();
        let model = BiLmConfig::new(5, 8, 6, 2).init::<TestBackend>(&device);

        let embedded =
            Tensor::<TestBackend, 3>::random([1, 4, 8], Distribution::Default, &device);
        let mask = Tensor::<TestBackend, 2>::from_floats([[1.0, 1.0, 0.0, 1.0]], &device);

        let out = model.forward_lstm.forward(embedded, mask, false);

        // The masked step's output must equal the state carried over
        // from the step before it
        out.clone()
            .slice([0..1, 2..3, 0..6])
            .into_data()
            .assert_approx_eq(&out.slice([0..1, 1..2, 0..6]).into_data(), 5);
    }

    #[test]
    fn test_trailing_padding_does_not_change_interior_logits() {
        let device = Default::default();
        let model = BiLmConfig::new(5, 8, 6, 2).init::<TestBackend>(&device);

        let short = Tensor::<TestBackend, 1, Int>::from_ints(
            [2, 1, 3, 4, 3].as_slice(), &device,
        ).reshape([1, 5]);
        let long = Tensor::<TestBackend, 1, Int>::from_ints(
            [2, 1, 3, 4, 3, 0, 0].as_slice(), &device,
        ).reshape([1, 7]);

        let logits_short = model.forward(short); // [1, 3, 5]
        let logits_long  = model.forward(long);  // [1, 5, 5]

        // Padding beyond the sentence must be invisible to the
        // positions inside it — in both directions
        logits_long
            .slice([0..1, 0..3, 0..5])
            .into_data()
            .assert_approx_eq(&logits_short.into_data(), 4);
    }

    #[test]
    fn test_loss_is_finite_and_non_negative() {
        let device = Default::default();
        let model = BiLmConfig::new(5, 8, 6, 2).init::<AutoBackend>(&device);

        let (loss, logits) = model.forward_loss(toy_batch(&device));
        let v: f64 = loss.into_scalar().elem();

        assert!(v.is_finite());
        assert!(v >= 0.0);
        assert_eq!(logits.dims(), [2, 3, 5]);
    }

    #[test]
    fn test_repeated_steps_reduce_loss_on_fixed_batch() {
        let device = Default::default();
        AutoBackend::seed(7);
        let mut model = BiLmConfig::new(5, 8, 6, 2).init::<AutoBackend>(&device);

        let mut optim = AdamConfig::new()
            .with_epsilon(1e-8)
            .with_grad_clipping(Some(GradientClippingConfig::Norm(0.01)))
            .init();
        let batch = toy_batch::<AutoBackend>(&device);

        let mut first = f64::NAN;
        let mut last  = f64::NAN;
        for step in 0..80 {
            let (loss, _) = model.forward_loss(batch.clone());
            let v: f64 = loss.clone().into_scalar().elem();
            if step == 0 {
                first = v;
            }
            last = v;

            let grads = GradientsParams::from_grads(loss.backward(), &model);
            model = optim.step(1e-2, model, grads);
        }

        assert!(
            last < first,
            "loss did not fall on a fixed batch: first={first:.4} last={last:.4}"
        );
    }
}
