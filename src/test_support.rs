//! Scratch directories for unit tests that build a synthetic proc tree.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_TREE: AtomicUsize = AtomicUsize::new(0);

/// A directory under the temp dir, removed when dropped.
pub struct TempTree {
    root: PathBuf,
}

impl TempTree {
    pub fn new(name: &str) -> Self {
        let n = NEXT_TREE.fetch_add(1, Ordering::Relaxed);
        let root = std::env::temp_dir().join(format!(
            "proctop_{name}_{}_{n}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(&root).unwrap();
        TempTree { root }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn join(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.root.join(rel)
    }

    /// Writes raw bytes so tests can lay down non-UTF-8 kernel records.
    pub fn write(&self, rel: &str, contents: impl AsRef<[u8]>) {
        let path = self.root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }
}

impl Drop for TempTree {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

#[test]
fn tree_is_removed_on_drop() {
    let tree = TempTree::new("support_drop");
    tree.write("a/b", "x");
    let root = tree.path().to_path_buf();
    assert!(root.join("a/b").exists());
    drop(tree);
    assert!(!root.exists());
}
