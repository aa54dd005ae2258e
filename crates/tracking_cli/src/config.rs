use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracking_core::SweepSettings;

/// On-disk sweep configuration:
///
/// ```toml
/// [sweep]
/// conditions = 20
/// max_amplitude = 1.0471975511965976
/// p0 = 0.0
/// k = -0.5
/// steps = 10000
/// parallel = true
/// ```
///
/// Missing keys fall back to [`SweepSettings::default`].
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    sweep: SweepSettings,
}

pub fn load_sweep_settings(path: &Path) -> Result<SweepSettings> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Read sweep config {}", path.display()))?;
    parse_sweep_settings(&text).with_context(|| format!("Parse sweep config {}", path.display()))
}

fn parse_sweep_settings(text: &str) -> Result<SweepSettings> {
    let file: ConfigFile = toml::from_str(text)?;
    Ok(file.sweep)
}
