#![allow(dead_code)]

use assert_cmd::Command;
use std::io::Write;

/// `bf` with the user's config and color settings kept out of the way.
pub fn cargo_bin(config_dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("bf").unwrap();
    cmd.env("BF_CONFIG", config_dir.path().join("bf.toml"))
        .env_remove("BF_MAX_DEPTH")
        .env_remove("RUST_LOG");
    cmd
}

pub fn source_file(content: &str) -> tempfile::NamedTempFile {
    let mut tf = tempfile::NamedTempFile::new().expect("tempfile");
    write!(tf, "{}", content).unwrap();
    tf
}

/// `+` followed by `depth` nested loops around `inner`.
pub fn nested(depth: usize, inner: &str) -> String {
    format!("+{}{}{}", "[".repeat(depth), inner, "]".repeat(depth))
}
