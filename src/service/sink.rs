use crate::error::Result;
use crate::labels::LabelManifest;
use crate::models::ReconciledBatch;
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// 对账结果的下游 (标签端接口)
pub trait BatchSink: Send + Sync {
    /// 日志里使用的下游名称
    fn name(&self) -> &'static str;

    fn deliver(&self, batch: &ReconciledBatch) -> Result<()>;
}

/// 先写同目录临时文件再改名, 读方不会看到写了一半的文件
fn write_atomically<F>(dir: &Path, path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut File) -> Result<()>,
{
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    write(tmp.as_file_mut())?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// 把对账后的批次 JSON 写到指定目录: `batch_<发票号>.json`
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    dir: PathBuf,
}

impl JsonFileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, invoice_number: i64) -> PathBuf {
        self.dir.join(format!("batch_{}.json", invoice_number))
    }
}

impl BatchSink for JsonFileSink {
    fn name(&self) -> &'static str {
        "json"
    }

    fn deliver(&self, batch: &ReconciledBatch) -> Result<()> {
        let path = self.path_for(batch.batch.invoice_number);
        let json = batch.to_json()?;
        write_atomically(&self.dir, &path, |file| Ok(file.write_all(json.as_bytes())?))?;
        tracing::info!("Batch {} written to {}", batch.batch.invoice_number, path.display());
        Ok(())
    }
}

/// 把标签清单以 CSV 写到指定目录: `labels_<发票号>.csv`
#[derive(Debug, Clone)]
pub struct LabelManifestSink {
    dir: PathBuf,
}

impl LabelManifestSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, invoice_number: i64) -> PathBuf {
        self.dir.join(format!("labels_{}.csv", invoice_number))
    }
}

impl BatchSink for LabelManifestSink {
    fn name(&self) -> &'static str {
        "label_manifest"
    }

    fn deliver(&self, batch: &ReconciledBatch) -> Result<()> {
        let manifest = LabelManifest::from_batch(&batch.batch);
        let path = self.path_for(batch.batch.invoice_number);

        if manifest.is_empty() {
            // 同一发票之前的清单已过期
            match fs::remove_file(&path) {
                Ok(()) => tracing::info!(
                    "Batch {} has no labels, removed stale {}",
                    batch.batch.invoice_number,
                    path.display()
                ),
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    tracing::info!("Batch {} has no labels, skipping manifest", batch.batch.invoice_number)
                }
                Err(e) => return Err(e.into()),
            }
            return Ok(());
        }

        write_atomically(&self.dir, &path, |file| manifest.write_csv(BufWriter::new(file)))?;
        tracing::info!(
            "Batch {}: {} 个标签 ({} 页) 写入 {}",
            batch.batch.invoice_number,
            manifest.entries.len(),
            manifest.page_count(),
            path.display()
        );
        Ok(())
    }
}

/// 按顺序交给所有下游，遇错即停；失败时记录已经交付的下游
pub fn deliver_all(batch: &ReconciledBatch, sinks: &[Box<dyn BatchSink>]) -> Result<()> {
    let mut delivered: Vec<&'static str> = Vec::with_capacity(sinks.len());
    for sink in sinks {
        if let Err(e) = sink.deliver(batch) {
            tracing::error!(
                "Batch {}: 下游 {} 交付失败: {}; 已交付: {:?}",
                batch.batch.invoice_number,
                sink.name(),
                e,
                delivered
            );
            return Err(e);
        }
        delivered.push(sink.name());
    }
    Ok(())
}

/// 按输出配置组装下游
pub fn sinks_for(dir: &Path, write_json: bool, write_manifest: bool) -> Vec<Box<dyn BatchSink>> {
    let mut sinks: Vec<Box<dyn BatchSink>> = Vec::new();
    if write_json {
        sinks.push(Box::new(JsonFileSink::new(dir)));
    }
    if write_manifest {
        sinks.push(Box::new(LabelManifestSink::new(dir)));
    }
    sinks
}
