use std::env;
use std::process::Command;

/// Embeds `AGENT_DEPLOY_VERSION`.
///
/// Release builds use the package version. Other profiles append the build
/// commit: `COMMIT_SHA` when CI provides it, else the local git HEAD.
fn main() {
    let version = env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "0.0.0".to_string());
    let release = env::var("PROFILE").is_ok_and(|p| p == "release");

    let full_version = if release {
        version
    } else {
        match build_commit() {
            Some(sha) => format!("{}-dev+{}", version, sha),
            None => format!("{}-dev", version),
        }
    };

    println!("cargo:rustc-env=AGENT_DEPLOY_VERSION={}", full_version);
    println!("cargo:rerun-if-env-changed=COMMIT_SHA");
    println!("cargo:rerun-if-changed=.git/HEAD");
}

fn build_commit() -> Option<String> {
    if let Some(sha) = env::var("COMMIT_SHA").ok().filter(|s| !s.trim().is_empty()) {
        return Some(short(sha.trim()));
    }

    let output = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())?;
    let sha = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!sha.is_empty()).then(|| short(&sha))
}

fn short(sha: &str) -> String {
    sha.chars().take(8).collect()
}
