//! Writing the profile without ever leaving a truncated document behind

use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::{Builder, NamedTempFile};
use tracing::debug;

use crate::error::{ConvertError, Result};
use crate::profile::ScalingProfile;

/// Write `profile` to `destination` through a sibling temporary file that is
/// persisted over the destination once fully written and synced.
///
/// The parent directory must already exist. On failure the temporary file is
/// removed and an existing destination is left as it was.
pub fn write_profile_atomic(
    profile: &ScalingProfile,
    destination: &Path,
    pretty: bool,
) -> Result<()> {
    write_profile_checked(profile, destination, pretty, |_| Ok(()))
}

/// Like [`write_profile_atomic`], but runs `check` against the fully written
/// temporary file first. The destination is only replaced when `check`
/// succeeds.
pub fn write_profile_checked<F>(
    profile: &ScalingProfile,
    destination: &Path,
    pretty: bool,
    check: F,
) -> Result<()>
where
    F: FnOnce(&Path) -> Result<()>,
{
    let json = profile.to_json(pretty)?;
    let mut tmp = temp_file_for(destination)?;
    debug!(tmp = %tmp.path().display(), bytes = json.len(), "Writing temporary profile");

    if let Err(e) = write_synced(&mut tmp, json.as_bytes()) {
        return Err(write_error(destination, e));
    }

    // dropping `tmp` on the error path deletes it
    check(tmp.path())?;

    match tmp.persist(destination) {
        Ok(_) => Ok(()),
        Err(e) => Err(write_error(destination, e.error)),
    }
}

/// Read a written profile back from disk.
pub fn read_profile(path: &Path) -> Result<ScalingProfile> {
    let json = fs::read_to_string(path).map_err(|e| ConvertError::ReadBack {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    ScalingProfile::from_json(&json)
}

fn write_synced(tmp: &mut NamedTempFile, bytes: &[u8]) -> io::Result<()> {
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.as_file().sync_all()
}

/// Hidden `.<file name>.XXXXXX.tmp` next to the destination, so the final
/// rename never crosses filesystems.
fn temp_file_for(destination: &Path) -> Result<NamedTempFile> {
    let file_name = match destination.file_name() {
        Some(name) => name,
        None => {
            return Err(write_error(
                destination,
                io::Error::new(io::ErrorKind::InvalidInput, "destination has no file name"),
            ))
        }
    };

    let parent = match destination.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if !parent.is_dir() {
        return Err(write_error(
            destination,
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("directory {} does not exist", parent.display()),
            ),
        ));
    }

    let mut prefix = OsString::from(".");
    prefix.push(file_name);
    prefix.push(".");
    let tmp = Builder::new()
        .prefix(&prefix)
        .suffix(".tmp")
        .tempfile_in(&parent)
        .map_err(|e| write_error(destination, e))?;
    Ok(tmp)
}

fn write_error(path: &Path, source: io::Error) -> ConvertError {
    ConvertError::DestinationWrite {
        path: path.to_path_buf(),
        source,
    }
}
