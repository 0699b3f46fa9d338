use std::fs;
use std::path::PathBuf;
use std::process;

/// Fresh directory under the system temp dir, unique per test process and name.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("mobisurv-{}-{}", name, process::id()));
    if dir.exists() {
        let _ = fs::remove_dir_all(&dir);
    }
    fs::create_dir_all(&dir).expect("failed to create scratch directory");
    dir
}
