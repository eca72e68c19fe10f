// src/recipe/kitchen/archive.rs

//! Archive download and extraction for the Kitchen

use crate::error::{Error, Result};
use flate2::read::GzDecoder;
use reqwest::blocking::Client;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::Path;
use std::time::Duration;
use tar::Archive;
use tracing::{debug, info};

/// Connect timeout for the source download. The transfer itself is not
/// bounded; the archive is large and mirrors can be slow.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Download a URL to `dest`, streaming to disk
pub fn download_file(url: &str, dest: &Path) -> Result<u64> {
    let client = Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(None)
        .build()
        .map_err(|e| Error::Download(format!("failed to create HTTP client: {e}")))?;

    info!("Downloading {}", url);
    let mut response = client
        .get(url)
        .send()
        .map_err(|e| Error::Download(format!("failed to fetch {url}: {e}")))?;

    if !response.status().is_success() {
        return Err(Error::Download(format!(
            "HTTP {} from {}",
            response.status(),
            url
        )));
    }

    let mut file = File::create(dest).map_err(Error::io_at("failed to create", dest))?;
    let written = io::copy(&mut response, &mut file)
        .map_err(|e| Error::Download(format!("failed to read response from {url}: {e}")))?;

    debug!("Downloaded {} bytes to {}", written, dest.display());
    Ok(written)
}

/// Extract a `.tar.gz` / `.tgz` archive into `dest`
pub fn extract_archive(archive: &Path, dest: &Path) -> Result<()> {
    let filename = archive
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");

    if !(filename.ends_with(".tar.gz") || filename.ends_with(".tgz")) {
        return Err(Error::Extract {
            archive: archive.to_path_buf(),
            message: "unsupported archive format (expected .tar.gz)".to_string(),
        });
    }

    fs::create_dir_all(dest).map_err(Error::io_at("failed to create", dest))?;

    let file = File::open(archive).map_err(Error::io_at("failed to open", archive))?;
    let mut tarball = Archive::new(GzDecoder::new(BufReader::new(file)));
    tarball.set_preserve_permissions(true);
    tarball.unpack(dest).map_err(|e| Error::Extract {
        archive: archive.to_path_buf(),
        message: e.to_string(),
    })?;

    debug!("Extracted {} into {}", archive.display(), dest.display());
    Ok(())
}
