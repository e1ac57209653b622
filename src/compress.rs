//! Size-tiered compression through Ghostscript.
//!
//! Compression is best-effort: whatever goes wrong, the caller gets a
//! usable path back (the merged input when no smaller output exists).

use serde::Serialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::config::{CompressionTier, TierPolicy};
use crate::utils::format_file_size;

/// What a compression attempt did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompressionOutcome {
    /// Tier selected from the input size.
    pub tier: CompressionTier,
    /// Whether the compressed candidate replaced the input.
    pub adopted: bool,
    /// Path to use from now on.
    #[serde(skip)]
    pub output: PathBuf,
}

/// Ghostscript-backed compressor.
#[derive(Debug, Clone)]
pub struct Compressor {
    executable: PathBuf,
    policy: TierPolicy,
}

impl Compressor {
    /// Create a compressor running `executable` under `policy`.
    pub fn new(executable: impl Into<PathBuf>, policy: TierPolicy) -> Self {
        Self {
            executable: executable.into(),
            policy,
        }
    }

    /// Compress `merged` into `candidate` and return the path to keep.
    pub async fn compress(&self, merged: &Path, candidate: &Path, size_bytes: u64) -> PathBuf {
        self.compress_with_outcome(merged, candidate, size_bytes)
            .await
            .output
    }

    /// Like [`Self::compress`], also reporting the tier and decision.
    pub async fn compress_with_outcome(
        &self,
        merged: &Path,
        candidate: &Path,
        size_bytes: u64,
    ) -> CompressionOutcome {
        let tier = self.policy.tier_for(size_bytes);
        let keep_input = CompressionOutcome {
            tier,
            adopted: false,
            output: merged.to_path_buf(),
        };

        let Some(setting) = tier.pdf_setting() else {
            log::info!(
                "Merged PDF is {}; skipping compression",
                format_file_size(size_bytes)
            );
            return keep_input;
        };

        log::info!(
            "Compressing {} PDF with {} preset",
            format_file_size(size_bytes),
            setting
        );

        if let Err(message) = self.run(setting, merged, candidate).await {
            log::warn!("Compression failed, keeping uncompressed PDF: {message}");
            discard(candidate).await;
            return keep_input;
        }

        let original = tokio::fs::metadata(merged)
            .await
            .map(|m| m.len())
            .unwrap_or(size_bytes);
        let compressed = match tokio::fs::metadata(candidate).await {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                log::warn!(
                    "Compressor produced no output at {}: {e}",
                    candidate.display()
                );
                return keep_input;
            }
        };

        if compressed < original {
            log::info!(
                "Compression adopted: {} -> {}",
                format_file_size(original),
                format_file_size(compressed)
            );
            CompressionOutcome {
                tier,
                adopted: true,
                output: candidate.to_path_buf(),
            }
        } else {
            log::info!(
                "Compressed output is not smaller ({} >= {}); keeping original",
                format_file_size(compressed),
                format_file_size(original)
            );
            discard(candidate).await;
            keep_input
        }
    }

    async fn run(&self, setting: &str, input: &Path, output: &Path) -> Result<(), String> {
        let result = Command::new(&self.executable)
            .args(arguments(setting, input, output))
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| format!("cannot run {}: {e}", self.executable.display()))?;

        if result.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&result.stderr);
        Err(format!(
            "{} exited with {}: {}",
            self.executable.display(),
            result.status,
            stderr.trim()
        ))
    }
}

/// Ghostscript arguments for `-dPDFSETTINGS=<setting>`.
pub fn arguments(setting: &str, input: &Path, output: &Path) -> Vec<OsString> {
    let mut out_flag = OsString::from("-sOutputFile=");
    out_flag.push(output);

    vec![
        "-sDEVICE=pdfwrite".into(),
        "-dCompatibilityLevel=1.4".into(),
        format!("-dPDFSETTINGS={setting}").into(),
        "-dNOPAUSE".into(),
        "-dQUIET".into(),
        "-dBATCH".into(),
        out_flag,
        input.into(),
    ]
}

async fn discard(candidate: &Path) {
    if let Err(e) = tokio::fs::remove_file(candidate).await
        && e.kind() != std::io::ErrorKind::NotFound
    {
        log::warn!("Failed to remove {}: {e}", candidate.display());
    }
}
