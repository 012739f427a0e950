// ============================================================
// Layer 5 — Training Driver
// ============================================================
// The sample → step → log loop plus the terminal checkpoint save.
//
// Key Burn insight:
//   - Training uses TrainBackend (Autodiff<NdArray>) for gradients
//   - loss.backward() walks the graph, GradientsParams pairs each
//     gradient with its parameter, optim.step applies the update
//   - Gradient norms are clipped at 0.01 before the Adam update —
//     stacked recurrent cells blow up without a tight clip
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam
//            Pascanu et al. (2013) on exploding gradients

use anyhow::Result;
use std::time::Instant;
use burn::{
    grad_clipping::GradientClippingConfig,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::LmBatcher, dataset::SentenceDataset};
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::metrics::{MetricsLogger, StepMetrics};
use crate::infra::vocab_store::{Vocab, PAD_ID};
use crate::ml::model::{BiLmConfig, BiLmModel};

type TrainBackend = burn::backend::Autodiff<burn::backend::NdArray>;

pub fn run_training(
    cfg:          &TrainConfig,
    dataset:      SentenceDataset,
    vocab:        &Vocab,
    ckpt_manager: CheckpointManager,
    metrics:      MetricsLogger,
) -> Result<()> {
    let device = burn::backend::ndarray::NdArrayDevice::default();
    tracing::info!("Using NdArray device: {:?}", device);
    train_loop(cfg, dataset, vocab, ckpt_manager, metrics, device)?;
    Ok(())
}

fn train_loop(
    cfg:          &TrainConfig,
    dataset:      SentenceDataset,
    vocab:        &Vocab,
    ckpt_manager: CheckpointManager,
    metrics:      MetricsLogger,
    device:       burn::backend::ndarray::NdArrayDevice,
) -> Result<BiLmModel<TrainBackend>> {

    // ── Build model ───────────────────────────────────────────────────────────
    let model_cfg = BiLmConfig::new(cfg.vocab_size, cfg.emb_dim, cfg.units, cfg.n_layers);
    let mut model: BiLmModel<TrainBackend> = model_cfg.init(&device);
    tracing::info!(
        "Model ready: {} layers, units={}, vocab={}",
        cfg.n_layers, cfg.units, cfg.vocab_size,
    );

    // ── Adam optimiser with gradient-norm clipping ────────────────────────────
    // m = β1*m + (1-β1)*g        (mean)
    // v = β2*v + (1-β2)*g²       (variance)
    // θ = θ - lr * m / (√v + ε)  (update)
    let optim_cfg = AdamConfig::new()
        .with_epsilon(1e-8)
        .with_grad_clipping(Some(GradientClippingConfig::Norm(0.01)));
    let mut optim = optim_cfg.init();

    let batcher = LmBatcher::<TrainBackend>::new(device.clone());

    // ── Driver loop ───────────────────────────────────────────────────────────
    let mut t0 = Instant::now();

    for step in 0..cfg.steps {
        let batch = batcher.batch(dataset.sample(cfg.batch_size));

        let (loss, logits) = model.forward_loss(batch.tokens.clone());
        let loss_val: f64 = loss.clone().into_scalar().elem();

        // Backward pass + clipped Adam update
        let grads = GradientsParams::from_grads(loss.backward(), &model);
        model = optim.step(cfg.lr, model, grads);

        if step % cfg.log_every == 0 {
            let elapsed = t0.elapsed().as_secs_f64();
            t0 = Instant::now();

            let (tgt, prd) = decode_first_example(&batch.tokens, &logits, vocab);
            println!(
                "\n\nstep: {} | time: {:.2} | loss: {:.3}\n| tgt: {}\n| prd: {}",
                step, elapsed, loss_val, tgt, prd,
            );
            metrics.log(&StepMetrics::new(step, loss_val, elapsed))?;
        }
    }

    // ── Terminal save ─────────────────────────────────────────────────────────
    ckpt_manager.save_model(&model)?;
    tracing::info!("Training complete, checkpoint saved");
    Ok(model)
}

/// Decode the first example of a batch into display lines:
/// ground-truth words from position 1 onward, and the top-1
/// predicted word for every interior position. Both lines stop at
/// the padding tail so short sentences stay readable.
fn decode_first_example<B: Backend>(
    tokens: &Tensor<B, 2, Int>,
    logits: &Tensor<B, 3>,
    vocab:  &Vocab,
) -> (String, String) {
    let [_, steps] = tokens.dims();
    let [_, positions, vocab_size] = logits.dims();

    let tgt_ids: Vec<i64> = tokens
        .clone()
        .slice([0..1, 1..steps])
        .reshape([steps - 1])
        .into_data()
        .convert::<i64>()
        .to_vec()
        .unwrap_or_default();

    let prd_ids: Vec<i64> = logits
        .clone()
        .slice([0..1, 0..positions, 0..vocab_size])
        .argmax(2)
        .reshape([positions])
        .into_data()
        .convert::<i64>()
        .to_vec()
        .unwrap_or_default();

    let content = tgt_ids
        .iter()
        .position(|&id| id as usize == PAD_ID)
        .unwrap_or(tgt_ids.len());

    let tgt = tgt_ids[..content]
        .iter()
        .map(|&id| vocab.word(id as usize))
        .collect::<Vec<_>>()
        .join(" ");
    let prd = prd_ids[..content.min(positions)]
        .iter()
        .map(|&id| vocab.word(id as usize))
        .collect::<Vec<_>>()
        .join(" ");

    (tgt, prd)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::LmSample;
    use crate::infra::vocab_store::{VocabStore, BOS_ID, EOS_ID};

    fn temp_dir(name: &str) -> String {
        let dir = std::env::temp_dir().join(format!("bilm-trainer-{}-{}", name, std::process::id()));
        std::fs::remove_dir_all(&dir).ok();
        dir.to_string_lossy().into_owned()
    }

    /// End-to-end smoke run on a tiny vocabulary: after a short run on
    /// a fixed repeating pattern, the last logged loss must sit below
    /// the first, and a loadable checkpoint must exist.
    #[test]
    fn test_short_run_reduces_logged_loss() {
        let dir = temp_dir("e2e");
        let sentences: Vec<String> = (0..8).map(|_| "a b c d".to_string()).collect();

        let vocab = VocabStore::new(dir.clone())
            .load_or_build(&sentences, 100)
            .unwrap();

        let rows: Vec<LmSample> = sentences
            .iter()
            .map(|s| {
                let mut ids = vec![BOS_ID as u32];
                ids.extend(vocab.encode(s).unwrap());
                ids.push(EOS_ID as u32);
                LmSample::new(ids)
            })
            .collect();
        let dataset = SentenceDataset::new(rows);

        let cfg = TrainConfig {
            checkpoint_dir: dir.clone(),
            vocab_size: vocab.vocab_size(),
            units:      8,
            emb_dim:    8,
            n_layers:   1,
            batch_size: 4,
            steps:      50,
            log_every:  1,
            lr:         1e-2,
            ..TrainConfig::default()
        };

        TrainBackend::seed(3);
        let device = Default::default();
        train_loop(
            &cfg,
            dataset,
            &vocab,
            CheckpointManager::new(dir.clone()),
            MetricsLogger::new(dir.clone()).unwrap(),
            device,
        )
        .unwrap();

        let body = std::fs::read_to_string(format!("{}/metrics.csv", dir)).unwrap();
        let losses: Vec<f64> = body
            .lines()
            .skip(1)
            .map(|l| l.split(',').nth(1).unwrap().parse().unwrap())
            .collect();

        assert_eq!(losses.len(), 50);
        assert!(
            losses.last().unwrap() < losses.first().unwrap(),
            "loss did not fall: first={:.4} last={:.4}",
            losses.first().unwrap(),
            losses.last().unwrap()
        );
    }
}
