//! Passthrough download of the published precomputed update payload.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::constants::reference::REFERENCE_SOURCE_ID;
use crate::errors::ConvertError;
use crate::transport::http::{default_agent, fetch_bytes};

/// Fetch the reference payload bytes without transformation.
pub fn fetch_reference(url: &str) -> Result<Vec<u8>, ConvertError> {
    fetch_bytes(&default_agent(), REFERENCE_SOURCE_ID, url)
}

/// Fetch the reference payload and write it verbatim to `dest`.
///
/// Returns the number of bytes written.
pub fn download_reference(url: &str, dest: &Path) -> Result<u64, ConvertError> {
    let bytes = fetch_reference(url)?;
    if let Some(parent) = dest.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(dest, &bytes)?;
    info!(
        "[cubostats:reference] saved {} bytes from {} -> {}",
        bytes.len(),
        url,
        dest.display()
    );
    Ok(bytes.len() as u64)
}
