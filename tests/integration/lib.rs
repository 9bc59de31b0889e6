//! Shared helpers for Careline integration tests.

use std::path::{Path, PathBuf};
use std::process::Command;

/// Locate the compiled `careline` binary in the workspace target directory.
pub fn careline_bin() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    // tests/integration -> workspace root
    let workspace_root = manifest_dir
        .parent()
        .expect("tests/ parent")
        .parent()
        .expect("workspace root");
    let bin = workspace_root.join("target").join("debug").join("careline");
    assert!(
        bin.exists(),
        "careline binary not found at {}; run `cargo build -p careline-cli` first",
        bin.display()
    );
    bin
}

/// A `careline` command isolated from the caller's environment.
///
/// Runs in `workdir` (so no stray `.env` is read), with credentials removed
/// and the config file pointed at `workdir/careline.json5`.
pub fn careline_cmd(workdir: &Path) -> Command {
    let mut cmd = Command::new(careline_bin());
    cmd.current_dir(workdir)
        .env("CARELINE_CONFIG", workdir.join("careline.json5"))
        .env_remove("GROQ_API_KEY")
        .env_remove("HF_TOKEN")
        .env_remove("CARELINE_CHAT_MODEL")
        .env_remove("CARELINE_EMBEDDING_MODEL")
        .env_remove("CARELINE_LOG")
        .env_remove("RUST_LOG");
    cmd
}

/// Read a credential for live tests; `None` skips the test body.
pub fn live_credential(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
