use std::{
    fs::File,
    io::{
        BufWriter,
        Write,
    },
    path::Path,
};

use anyhow::{
    Context,
    Result,
};
use kuhn::{
    eval::Evaluation,
    history::HistoryRecord,
};
use serde::Serialize;

/// Summary written next to a trained strategy.
#[derive(Serialize)]
pub struct TrainingReport {
    pub cfr_vs_baseline: Evaluation,
    pub training_seconds: f64,
    pub exploitability: f64,
    pub average_game_value: f64,
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let f = File::create(path)
        .with_context(|| format!("Failed to create a file: {}", path.display()))?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, value)?;
    w.flush()?;
    Ok(())
}

/// One row per tracked information set per snapshot, as read back by `explot`.
pub fn write_csv(path: &Path, records: &[HistoryRecord]) -> Result<()> {
    let mut w = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create a file: {}", path.display()))?;
    for r in records {
        w.serialize(r)?;
    }
    w.flush()?;
    Ok(())
}
