//! Tree materializer.
//! Writes a resolved [`TemplateTree`] into the project directory, rendering
//! every path and file through a [`TemplateRenderer`].

use log::{debug, warn};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::{
    bindings::VariableBinding,
    constants::{FILE_MODE, VCS_DIR},
    error::{Error, Result},
    renderer::TemplateRenderer,
    tree::TemplateTree,
};

/// Checks that `dest_dir` is absent or an empty directory without touching it.
///
/// # Errors
/// * `Error::DestinationExists` if `dest_dir` is a file or a non-empty directory
pub fn check_destination<P: AsRef<Path>>(dest_dir: P) -> Result<()> {
    let dest_dir = dest_dir.as_ref();
    if dest_dir.exists() && (!dest_dir.is_dir() || fs::read_dir(dest_dir)?.next().is_some()) {
        return Err(Error::DestinationExists { path: dest_dir.display().to_string() });
    }
    Ok(())
}

/// Checks that `dest_dir` is absent or an empty directory, then creates it.
pub fn ensure_destination<P: AsRef<Path>>(dest_dir: P) -> Result<()> {
    let dest_dir = dest_dir.as_ref();
    check_destination(dest_dir)?;
    if dest_dir.is_dir() {
        debug!("Using empty directory '{}'.", dest_dir.display());
        return Ok(());
    }
    fs::create_dir_all(dest_dir).map_err(Error::IoError)
}

fn write_file(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(Error::IoError)?;
    }

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(FILE_MODE);
    }

    let mut file = options.open(path).map_err(Error::IoError)?;
    file.write_all(content).map_err(Error::IoError)?;

    // The creation mode is filtered by the umask; pin the final bits.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(FILE_MODE))
            .map_err(Error::IoError)?;
    }
    Ok(())
}

/// Renders and writes a single template file under `dest_dir`.
fn write_rendered(
    renderer: &dyn TemplateRenderer,
    bindings: &VariableBinding,
    dest_dir: &Path,
    relative_path: &str,
    content: &[u8],
) -> Result<PathBuf> {
    let target = PathBuf::from(renderer.render_path(relative_path, bindings)?);
    let rendered = renderer.render(relative_path, content, bindings)?;

    debug!("Writing file: {}", target.display());
    write_file(&dest_dir.join(&target), &rendered)?;
    Ok(target)
}

fn walk_directory(
    root: &Path,
    dest_dir: &Path,
    bindings: &VariableBinding,
    renderer: &dyn TemplateRenderer,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.file_name() != VCS_DIR);

    for entry in walker {
        let entry = entry.map_err(|e| Error::IoError(e.into()))?;
        let path = entry.path();
        let relative_path = path
            .strip_prefix(root)
            .ok()
            .and_then(Path::to_str)
            .ok_or_else(|| Error::UnsafePath { path: path.display().to_string() })?;

        let file_type = entry.file_type();
        if file_type.is_dir() {
            let target = renderer.render_path(relative_path, bindings)?;
            fs::create_dir_all(dest_dir.join(target)).map_err(Error::IoError)?;
        } else if file_type.is_file() {
            let content = fs::read(path).map_err(Error::IoError)?;
            written.push(write_rendered(renderer, bindings, dest_dir, relative_path, &content)?);
        } else {
            warn!("Skipping '{}', not a regular file.", path.display());
        }
    }

    Ok(written)
}

/// Materializes `tree` into `dest_dir`.
///
/// The destination check runs once before anything is written. The first
/// failing file aborts the walk; files written before it are left in place.
/// Any staging directory owned by `tree` is removed when this returns.
///
/// # Returns
/// * `Result<Vec<PathBuf>>` - Written files, relative to `dest_dir`
///
/// # Errors
/// * `Error::DestinationExists` if `dest_dir` already has content
/// * `Error::TemplateSyntaxError` if a file fails to render
/// * `Error::UnsafePath` or `Error::IoError` for path and write failures
pub fn materialize<P: AsRef<Path>>(
    tree: TemplateTree,
    dest_dir: P,
    bindings: &VariableBinding,
    renderer: &dyn TemplateRenderer,
) -> Result<Vec<PathBuf>> {
    let dest_dir = dest_dir.as_ref();
    debug!("Materializing {} into '{}'.", tree, dest_dir.display());
    ensure_destination(dest_dir)?;

    let written = match &tree {
        TemplateTree::Embedded(files) => files
            .iter()
            .map(|file| {
                write_rendered(renderer, bindings, dest_dir, file.relative_path(), file.content())
            })
            .collect::<Result<Vec<_>>>()?,
        TemplateTree::Directory { root, .. } => walk_directory(root, dest_dir, bindings, renderer)?,
    };

    debug!("Wrote {} files.", written.len());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_destination_rejects_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("taken");
        fs::write(&file, "x").unwrap();

        assert!(matches!(ensure_destination(&file), Err(Error::DestinationExists { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_written_files_have_fixed_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a/b.txt");
        write_file(&path, b"content").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }
}
