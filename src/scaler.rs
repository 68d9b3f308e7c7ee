// 📏 Standard Scaler
// Zero mean, unit variance per column, fitted on training rows only

#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    /// Population standard deviation, 1.0 for constant columns
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Fit on `rows`; all rows must have the same width
    pub fn fit(rows: &[Vec<f64>]) -> Self {
        let width = rows.first().map_or(0, |r| r.len());
        let n = rows.len() as f64;

        let mut mean = vec![0.0; width];
        for row in rows {
            for (m, x) in mean.iter_mut().zip(row) {
                *m += x;
            }
        }
        if n > 0.0 {
            mean.iter_mut().for_each(|m| *m /= n);
        }

        let mut var = vec![0.0; width];
        for row in rows {
            for ((v, x), m) in var.iter_mut().zip(row).zip(&mean) {
                *v += (x - m) * (x - m);
            }
        }

        let scale = var
            .into_iter()
            .map(|v| {
                let std = if n > 0.0 { (v / n).sqrt() } else { 0.0 };
                if std > f64::EPSILON {
                    std
                } else {
                    1.0
                }
            })
            .collect();

        StandardScaler { mean, scale }
    }

    pub fn transform_row(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(&self.mean)
            .zip(&self.scale)
            .map(|((x, m), s)| (x - m) / s)
            .collect()
    }

    pub fn transform(&self, rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
        rows.iter().map(|r| self.transform_row(r)).collect()
    }
}
