use std::path::PathBuf;

use anyhow::{Context, Result};

const COMPARISON: &str = "Case vs Control";

/// Seeded splitmix64 stream, so the example files are reproducible.
struct Rng(u64);

impl Rng {
    /// Uniform in `[0, 1)`.
    fn uniform(&mut self) -> f64 {
        self.0 = self.0.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        ((z ^ (z >> 31)) >> 11) as f64 / (1u64 << 53) as f64
    }

    fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.uniform().max(f64::MIN_POSITIVE);
        let u2 = self.uniform();
        mean + std_dev * (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
    }
}

/// Gene symbols used for the synthetic table; the first few form the example list.
const KNOWN_GENES: &[&str] = &[
    "IL17A", "IL23A", "TNF", "IL36G", "DEFB4A", "S100A7", "S100A8", "S100A9", "KRT16", "KRT6A",
    "SERPINB4", "PI3", "LCN2", "CXCL8", "CCL20", "IL1B", "STAT3", "NFKBIZ", "IL22", "IFNG",
    "WIF1", "CCL27", "BTC", "KRT77", "AQP9", "IL37", "CXCL14", "GJB2", "SPRR1B", "LTF",
];

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("Examples"));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = Rng(42);

    let table_path = out_dir.join(format!("{COMPARISON}.tsv"));
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(&table_path)
        .with_context(|| format!("creating {}", table_path.display()))?;

    writer.write_record([
        "ID".to_string(),
        "Symbol".to_string(),
        format!("log2(fold change)({COMPARISON})"),
        format!("-log10(Pvalue)({COMPARISON})"),
        "baseMean".to_string(),
    ])?;

    let n_background = 2000;
    let mut n_rows = 0usize;
    let symbols = KNOWN_GENES
        .iter()
        .map(|s| s.to_string())
        .chain((1..=n_background).map(|i| format!("GENE{i:04}")));

    for (i, symbol) in symbols.enumerate() {
        // Listed genes get a real effect; background genes are mostly noise.
        let effect = if i < KNOWN_GENES.len() {
            let sign = if i % 3 == 2 { -1.0 } else { 1.0 };
            sign * (1.0 + 4.0 * rng.uniform())
        } else {
            rng.normal(0.0, 0.6)
        };
        let z = effect.abs() * 2.5 + rng.normal(0.0, 1.0).abs();
        let neg_log10_p = (z * z / 2.0 / std::f64::consts::LN_10).min(300.0);
        let base_mean = (rng.normal(6.0, 2.0)).exp2().max(1.0);

        writer.write_record([
            format!("ENSG{:011}", 1000 + i),
            symbol,
            format!("{effect:.6}"),
            format!("{neg_log10_p:.6}"),
            format!("{base_mean:.2}"),
        ])?;
        n_rows += 1;
    }
    writer.flush()?;

    let list_path = out_dir.join("GeneList.txt");
    let mut list: Vec<String> = KNOWN_GENES[..20].iter().map(|s| s.to_lowercase()).collect();
    list.push("  NOT_A_GENE ".to_string());
    std::fs::write(&list_path, list.join("\n") + "\n")
        .with_context(|| format!("writing {}", list_path.display()))?;

    println!(
        "Wrote {n_rows} genes to {} and {} list entries to {}",
        table_path.display(),
        list.len(),
        list_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_gives_same_stream_in_unit_interval() {
        let mut a = Rng(42);
        let mut b = Rng(42);
        for _ in 0..1000 {
            let x = a.uniform();
            assert_eq!(x, b.uniform());
            assert!((0.0..1.0).contains(&x));
        }
        assert!(Rng(42).normal(0.0, 1.0).is_finite());
    }
}
