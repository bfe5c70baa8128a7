use std::process::Command;

fn main() {
    let version = match Command::new("git")
        .args(["describe", "--tags", "--always"])
        .output()
    {
        Ok(out) if out.status.success() => {
            let raw = String::from_utf8_lossy(&out.stdout).trim().to_string();
            raw.strip_prefix('v').map(str::to_string).unwrap_or(raw)
        }
        _ => env!("CARGO_PKG_VERSION").to_string(),
    };

    println!("cargo:rustc-env=GIT_VERSION={version}");
}
