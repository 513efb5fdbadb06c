//! Credential and proxy list loading
//!
//! Both files are plain text, one entry per line. Blank lines and lines
//! starting with `#` are ignored.

use alloy::signers::local::PrivateKeySigner;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Failed to read key file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("No private keys found in {0}")]
    Empty(String),
    #[error("Invalid private key on line {line}: {reason}")]
    InvalidKey { line: usize, reason: String },
}

fn entries(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

/// Load signing keys in file order. A missing or empty file is fatal.
pub fn load_private_keys<P: AsRef<Path>>(path: P) -> Result<Vec<PrivateKeySigner>, CredentialError> {
    let shown = path.as_ref().display().to_string();
    let content = fs::read_to_string(path.as_ref()).map_err(|source| CredentialError::Io {
        path: shown.clone(),
        source,
    })?;

    let signers = entries(&content)
        .map(|(line, key)| {
            key.trim_start_matches("0x")
                .parse::<PrivateKeySigner>()
                .map_err(|e| CredentialError::InvalidKey {
                    line,
                    reason: e.to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if signers.is_empty() {
        return Err(CredentialError::Empty(shown));
    }
    Ok(signers)
}

/// Load proxies in file order. A missing file means no proxies.
pub fn load_proxies<P: AsRef<Path>>(path: P) -> Vec<String> {
    match fs::read_to_string(path) {
        Ok(content) => entries(&content).map(|(_, p)| p.to_string()).collect(),
        Err(_) => Vec::new(),
    }
}
