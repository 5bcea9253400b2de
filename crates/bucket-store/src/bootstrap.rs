use std::io;
use std::path::Path;

use tracing::info;

/// Make sure the storage root exists, creating it and any parents.
///
/// Returns `true` if the directory had to be created.
pub fn ensure_root(root: &Path) -> io::Result<bool> {
    if root.is_dir() {
        return Ok(false);
    }
    info!("directory {} does not exist, attempting to create it", root.display());
    std::fs::create_dir_all(root)?;
    info!("directory {} created successfully", root.display());
    Ok(true)
}
