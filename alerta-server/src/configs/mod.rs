mod schema;
mod settings;
mod storage;

use std::io;
use std::path::{Path, PathBuf};

pub use schema::SchemaManager;
pub use settings::{Database, Logger, Push, Schedule, Server, Settings};
pub use storage::Storage;

/// Resolves `path` against the working directory and canonicalises it.
pub fn normalize_path<P: AsRef<Path>>(path: P) -> io::Result<PathBuf> {
    let path = path.as_ref();

    if path.is_absolute() {
        path.canonicalize()
    } else {
        std::env::current_dir()?.join(path).canonicalize()
    }
}
