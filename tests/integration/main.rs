//! Integration tests for the env cascade and the HTTP services.
//!
//! Fixtures are written to temporary directories laid out like a real
//! installation root:
//!
//! ```text
//! <root>/.env.base
//! <root>/apps/<service>/.env
//! ```

mod cascade;
mod http;

use std::fs;
use std::path::Path;

/// Write `content` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: impl AsRef<[u8]>) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create fixture dir");
    }
    fs::write(path, content).expect("write fixture");
}
