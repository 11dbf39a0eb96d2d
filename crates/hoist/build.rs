//! Embeds build metadata shown by `hoist version`

use std::process::Command;

fn git_short_sha() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn main() {
    let date = chrono::Utc::now().format("%Y-%m-%d");
    println!("cargo:rustc-env=BUILD_DATE={}", date);

    if let Some(sha) = git_short_sha() {
        println!("cargo:rustc-env=GIT_SHA={}", sha);
    }
    if let Ok(target) = std::env::var("TARGET") {
        println!("cargo:rustc-env=TARGET={}", target);
    }

    println!("cargo:rerun-if-changed=.git/HEAD");
}
