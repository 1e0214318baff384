use crate::output::model::ReportModel;
use anyhow::Context;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    Ok(())
}

pub fn write_json(path: &Path, model: &ReportModel) -> anyhow::Result<()> {
    ensure_parent(path)?;
    let json = serde_json::to_string_pretty(model).context("serializing report")?;
    fs::write(path, json).with_context(|| format!("writing report {}", path.display()))?;
    Ok(())
}

pub fn append_log(path: &Path, model: &ReportModel) -> anyhow::Result<()> {
    ensure_parent(path)?;
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening run log {}", path.display()))?;
    file.write_all(model.log_line().as_bytes())?;
    Ok(())
}
