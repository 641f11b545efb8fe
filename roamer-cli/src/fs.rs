//! Filesystem access through `cap-std` and `camino`.

use std::io::{self, BufReader};

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8};
use roamer_core::Waypoint;

use crate::CliError;

/// Open a UTF-8 file path using ambient authority.
fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Whether `path` names an existing regular file.
fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let parent = path.parent().filter(|p| !p.as_str().is_empty());
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "path has no file name"))?;
    let dir = fs_utf8::Dir::open_ambient_dir(
        parent.unwrap_or_else(|| Utf8Path::new(".")),
        ambient_authority(),
    )?;
    dir.metadata(name).map(|meta| meta.is_file())
}

/// Fail with [`CliError::MissingSourceFile`] unless `path` is a readable file.
pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) | Err(_) => Err(CliError::MissingSourceFile {
            field,
            path: path.to_path_buf(),
        }),
    }
}

/// Load a JSON array of waypoints from disk.
pub(crate) fn load_waypoints(path: &Utf8Path) -> Result<Vec<Waypoint>, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenWaypoints {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| CliError::ParseWaypoints {
        path: path.to_path_buf(),
        source,
    })
}
