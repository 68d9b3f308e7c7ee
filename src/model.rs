// 🤖 Logistic Regression
// L2-penalized binary classifier trained by full-batch gradient descent

use crate::config::ModelConfig;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct LogisticRegression {
    pub weights: Vec<f64>,
    pub intercept: f64,
    /// Iterations actually run by the last `fit`
    pub iterations: usize,
    config: ModelConfig,
}

/// Stable for large |z|
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl LogisticRegression {
    pub fn new(config: ModelConfig) -> Self {
        LogisticRegression {
            weights: Vec::new(),
            intercept: 0.0,
            iterations: 0,
            config,
        }
    }

    /// Minimizes mean log-loss + ||w||² / (2·C·n), the per-sample form of
    /// `C·Σloss + ||w||²/2`. The intercept is not penalized.
    pub fn fit(&mut self, rows: &[Vec<f64>], labels: &[u8]) {
        let width = rows.first().map_or(0, |r| r.len());
        let n = rows.len();
        self.weights = vec![0.0; width];
        self.intercept = 0.0;
        self.iterations = 0;

        if n == 0 {
            return;
        }

        let penalty = 1.0 / (self.config.c * n as f64);
        let mut grad = vec![0.0; width];

        for iter in 0..self.config.max_iter {
            grad.iter_mut().for_each(|g| *g = 0.0);
            let mut grad_b = 0.0;

            for (row, &y) in rows.iter().zip(labels) {
                let err = sigmoid(self.decision(row)) - f64::from(y);
                for (g, x) in grad.iter_mut().zip(row) {
                    *g += err * x;
                }
                grad_b += err;
            }

            let mut largest = (grad_b / n as f64).abs();
            for (g, w) in grad.iter_mut().zip(&self.weights) {
                *g = *g / n as f64 + penalty * w;
                largest = largest.max(g.abs());
            }

            for (w, g) in self.weights.iter_mut().zip(&grad) {
                *w -= self.config.learning_rate * g;
            }
            self.intercept -= self.config.learning_rate * grad_b / n as f64;
            self.iterations = iter + 1;

            if largest < self.config.tolerance {
                debug!(iterations = self.iterations, "converged");
                break;
            }
        }
    }

    pub fn decision(&self, row: &[f64]) -> f64 {
        self.intercept
            + self
                .weights
                .iter()
                .zip(row)
                .map(|(w, x)| w * x)
                .sum::<f64>()
    }

    pub fn predict_proba(&self, row: &[f64]) -> f64 {
        sigmoid(self.decision(row))
    }

    pub fn predict(&self, row: &[f64]) -> u8 {
        u8::from(self.decision(row) > 0.0)
    }

    pub fn predict_all(&self, rows: &[Vec<f64>]) -> Vec<u8> {
        rows.iter().map(|r| self.predict(r)).collect()
    }
}
