//! Fixtures shared by unit tests.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub const BLOGSTACK: &str = include_str!("../fixtures/projects/blogstack-k8s.md");
pub const LLMCOMPILER: &str = include_str!("../fixtures/projects/llmcompiler-pro.md");

pub const LEGACY_POST_NAME: &str = "2021-08-03-Gradient descent-basic.md";
pub const LEGACY_POST: &str = include_str!("../fixtures/posts/2021-08-03-Gradient descent-basic.md");
pub const POSTS_README: &str = include_str!("../fixtures/posts/README.md");

/// Write `content` to `dir/rel`, creating parent directories.
pub fn write(dir: &Path, rel: &str, content: &str) -> PathBuf {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}

/// A temporary projects directory holding both sample records and a README.
pub fn projects_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "blogstack-k8s.md", BLOGSTACK);
    write(dir.path(), "llmcompiler-pro.md", LLMCOMPILER);
    write(dir.path(), "README.md", "# Projects\n");
    dir
}
