//! ZIP snapshots of code-hosting repositories.
//!
//! `owner/repo` is turned into the default branch snapshot URL, downloaded with
//! a blocking client into an anonymous temp file, then extracted with the
//! single top-level folder these exports add stripped off.

use crate::constants::USER_AGENT;
use crate::error::{Error, Result};
use crate::loader::interface::TemplateLoader;
use crate::tree::TemplateTree;
use log::{debug, info};
use regex::Regex;
use std::fs::{self, File};
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use url::Url;
use zip::ZipArchive;

/// Returns true for the bare `owner/repo` short form.
pub fn is_owner_repo(s: &str) -> bool {
    static OWNER_REPO: OnceLock<Regex> = OnceLock::new();
    OWNER_REPO
        .get_or_init(|| {
            Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]*/[A-Za-z0-9_.-]+$").expect("valid owner/repo regex")
        })
        .is_match(s)
}

/// Download URL for an archive source.
///
/// Full `http(s)` URLs are used verbatim; `owner/repo` becomes
/// `<host>/<owner>/<repo>/archive/HEAD.zip`.
///
/// # Errors
/// * `Error::InvalidRemote` if `source` is neither form
pub fn archive_url(source: &str, host: &str) -> Result<String> {
    if let Ok(url) = Url::parse(source) {
        if matches!(url.scheme(), "http" | "https") {
            return Ok(source.to_string());
        }
    }

    let short = source.trim_end_matches(".git");
    if !is_owner_repo(short) {
        return Err(Error::InvalidRemote { input: source.to_string() });
    }
    Ok(format!("{}/{}/archive/HEAD.zip", host.trim_end_matches('/'), short))
}

/// Loader for templates published as ZIP archives.
pub struct ArchiveLoader<S: AsRef<str>> {
    source: S,
    host: String,
}

impl<S: AsRef<str>> ArchiveLoader<S> {
    pub fn new<H: Into<String>>(source: S, host: H) -> Self {
        Self { source, host: host.into() }
    }
}

impl<S: AsRef<str>> TemplateLoader for ArchiveLoader<S> {
    /// Downloads and extracts the archive into a fresh staging directory.
    fn load(&self) -> Result<TemplateTree> {
        let staging = tempfile::Builder::new().prefix("gecko-").tempdir()?;
        let extract_path = staging.path().join("template");

        fetch_archive(self.source.as_ref(), &extract_path, &self.host)?;
        Ok(TemplateTree::staged(extract_path, staging))
    }
}

/// Downloads the archive for `source` and extracts it into `dest_dir`.
///
/// # Errors
/// * `Error::DestinationExists` if `dest_dir` already exists
/// * `Error::InvalidRemote` if `source` is not a URL or `owner/repo`
/// * `Error::DownloadFailed` on transport errors or a non-2xx status
/// * `Error::ExtractFailed` if the archive cannot be unpacked
pub fn fetch_archive<P: AsRef<Path>>(source: &str, dest_dir: P, host: &str) -> Result<()> {
    let dest_dir = dest_dir.as_ref();
    if dest_dir.exists() {
        return Err(Error::DestinationExists { path: dest_dir.display().to_string() });
    }

    let url = archive_url(source, host)?;
    info!("Downloading template archive '{url}'.");

    let download_failed =
        |reason: String| Error::DownloadFailed { url: url.clone(), reason };

    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| download_failed(e.to_string()))?;
    let mut response = client.get(&url).send().map_err(|e| download_failed(e.to_string()))?;

    if !response.status().is_success() {
        return Err(download_failed(format!("HTTP {}", response.status())));
    }

    let mut file = tempfile::tempfile()?;
    let size = response.copy_to(&mut file).map_err(|e| download_failed(e.to_string()))?;
    debug!("Downloaded {size} bytes.");
    file.seek(SeekFrom::Start(0))?;

    let extracted = extract_archive(file, dest_dir)?;
    debug!("Extracted {} entries to '{}'.", extracted.len(), dest_dir.display());
    Ok(())
}

/// Extracts a ZIP archive into `dest_dir`, dropping the first path segment of every entry.
///
/// Entries with nothing left after stripping (the archive root itself) are
/// skipped. Returns the extracted paths relative to `dest_dir`.
///
/// # Errors
/// * `Error::ExtractFailed` if the archive is unreadable, an entry name would
///   escape `dest_dir`, or an entry cannot be written
pub fn extract_archive<R: Read + Seek, P: AsRef<Path>>(
    reader: R,
    dest_dir: P,
) -> Result<Vec<PathBuf>> {
    let dest_dir = dest_dir.as_ref();
    let extract_failed = |reason: String| Error::ExtractFailed { reason };
    let write_failed =
        |path: &Path, e: io::Error| extract_failed(format!("'{}': {e}", path.display()));

    let mut archive =
        ZipArchive::new(reader).map_err(|e| extract_failed(format!("unreadable archive: {e}")))?;
    fs::create_dir_all(dest_dir).map_err(|e| write_failed(dest_dir, e))?;

    let mut extracted = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(|e| extract_failed(e.to_string()))?;

        let relative: PathBuf = match entry.enclosed_name() {
            Some(name) => name.components().skip(1).collect(),
            None => return Err(extract_failed(format!("unsafe entry name '{}'", entry.name()))),
        };
        if relative.as_os_str().is_empty() {
            continue;
        }

        let target = dest_dir.join(&relative);
        if entry.is_dir() {
            fs::create_dir_all(&target).map_err(|e| write_failed(&target, e))?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| write_failed(parent, e))?;
            }
            let mut out = File::create(&target).map_err(|e| write_failed(&target, e))?;
            io::copy(&mut entry, &mut out).map_err(|e| write_failed(&target, e))?;
        }
        extracted.push(relative);
    }

    Ok(extracted)
}
