use anyhow::{bail, Result};
use std::env;
use std::process::Command;

/// Cargo features understood by the `kodct` crate.
pub const KNOWN_FEATURES: &[&str] = &["std", "slow", "verbose-logging", "internal-tests"];

/// Options derived from the environment used to configure cargo commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    pub features: Vec<String>,
    pub rustflags: Option<String>,
}

impl BuildConfig {
    /// Join features into a single string suitable for passing to cargo.
    pub fn features_arg(&self) -> Option<String> {
        if self.features.is_empty() {
            None
        } else {
            Some(self.features.join(" "))
        }
    }

    fn apply_rustflags(&self, cmd: &mut Command) {
        if let Some(rf) = &self.rustflags {
            cmd.env("RUSTFLAGS", rf);
        }
    }

    fn apply_features(&self, cmd: &mut Command) {
        if let Some(f) = self.features_arg() {
            cmd.arg("--features").arg(f);
        }
    }
}

/// Read `KODCT_FEATURES` and `KODCT_RUSTFLAGS` from the environment.
pub fn detect_config() -> Result<BuildConfig> {
    let extra = env::var("KODCT_FEATURES").unwrap_or_default();
    let rustflags = env::var("KODCT_RUSTFLAGS").unwrap_or_default();
    compute_config(&extra, &rustflags)
}

/// Compute a [`BuildConfig`] from supplied inputs. This is separated for testing.
///
/// Features may be separated by whitespace or commas; duplicates are dropped
/// and unknown names are rejected.
pub fn compute_config(extra: &str, rustflags: &str) -> Result<BuildConfig> {
    let mut features: Vec<String> = Vec::new();
    for feat in extra
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|f| !f.is_empty())
    {
        if !KNOWN_FEATURES.contains(&feat) {
            bail!(
                "unknown feature `{}` (expected one of: {})",
                feat,
                KNOWN_FEATURES.join(", ")
            );
        }
        if !features.iter().any(|f| f == feat) {
            features.push(feat.to_string());
        }
    }
    let rustflags = Some(rustflags.trim())
        .filter(|r| !r.is_empty())
        .map(str::to_string);
    Ok(BuildConfig {
        features,
        rustflags,
    })
}

pub fn build_command(cfg: &BuildConfig) -> Command {
    let mut cmd = Command::new("cargo");
    cmd.arg("build");
    cfg.apply_features(&mut cmd);
    cmd
}

/// Build the library without `std` to keep the `no_std` path compiling.
pub fn no_std_command() -> Command {
    let mut cmd = Command::new("cargo");
    cmd.args(["build", "--lib", "--no-default-features"]);
    cmd
}

pub fn test_command(cfg: &BuildConfig) -> Command {
    let mut cmd = Command::new("cargo");
    cmd.args(["test", "--workspace"]);
    cfg.apply_features(&mut cmd);
    cmd
}

pub fn clippy_command() -> Command {
    let mut cmd = Command::new("cargo");
    cmd.args(["clippy", "--all-targets", "--all-features"]);
    cmd
}

pub fn fmt_command() -> Command {
    let mut cmd = Command::new("cargo");
    cmd.args(["fmt", "--all"]);
    cmd
}

pub fn bench_command(cfg: &BuildConfig) -> Command {
    let mut cmd = Command::new("cargo");
    cfg.apply_rustflags(&mut cmd);
    cmd.args(["bench", "--manifest-path", "kodct-bench/Cargo.toml"]);
    if cfg.features.iter().any(|f| f == "verbose-logging") {
        cmd.arg("--features").arg("verbose-logging");
    }
    cmd
}

pub fn update_bench_readme_command() -> Command {
    let mut cmd = Command::new("cargo");
    cmd.args([
        "run",
        "--manifest-path",
        "kodct-bench/Cargo.toml",
        "--example",
        "update_bench_readme",
        "--release",
    ]);
    cmd
}

/// Run the `dct_timing` demo in release mode, optionally with a custom length.
pub fn timing_command(cfg: &BuildConfig, len: Option<usize>) -> Command {
    let mut cmd = Command::new("cargo");
    cfg.apply_rustflags(&mut cmd);
    cmd.args(["run", "--release", "--example", "dct_timing"]);
    cfg.apply_features(&mut cmd);
    if let Some(n) = len {
        cmd.arg("--").arg(n.to_string());
    }
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_of(cmd: &Command) -> Vec<String> {
        cmd.get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_compute_splits_and_dedups() {
        let cfg = compute_config("slow, verbose-logging slow", "").unwrap();
        assert_eq!(cfg.features, vec!["slow", "verbose-logging"]);
        assert!(cfg.rustflags.is_none());
    }

    #[test]
    fn test_compute_rejects_unknown() {
        let err = compute_config("simd", "").unwrap_err();
        assert!(err.to_string().contains("unknown feature `simd`"));
    }

    #[test]
    fn test_compute_rustflags() {
        let cfg = compute_config("", "  -C target-cpu=native ").unwrap();
        assert_eq!(cfg.rustflags.as_deref(), Some("-C target-cpu=native"));
        assert_eq!(cfg.features_arg(), None);
    }

    #[test]
    fn test_commands_include_features() {
        let cfg = compute_config("slow", "").unwrap();
        let args = args_of(&build_command(&cfg));
        assert!(args.contains(&"build".to_string()));
        assert!(args.contains(&"--features".to_string()));
        assert!(args.contains(&"slow".to_string()));
        let args = args_of(&test_command(&cfg));
        assert!(args.contains(&"--workspace".to_string()));
    }

    #[test]
    fn test_timing_env_and_len() {
        let cfg = compute_config("", "-C target-cpu=native").unwrap();
        let cmd = timing_command(&cfg, Some(4096));
        let envs: Vec<_> = cmd
            .get_envs()
            .map(|(k, v)| {
                (
                    k.to_string_lossy().into_owned(),
                    v.map(|v| v.to_string_lossy().into_owned()),
                )
            })
            .collect();
        assert!(envs
            .iter()
            .any(|(k, v)| k == "RUSTFLAGS" && v.as_deref() == Some("-C target-cpu=native")));
        let args = args_of(&cmd);
        assert!(args.contains(&"dct_timing".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("4096"));
        let args = args_of(&timing_command(&cfg, None));
        assert!(!args.contains(&"--".to_string()));
    }

    #[test]
    fn test_other_commands() {
        let cfg = compute_config("verbose-logging", "").unwrap();
        assert!(clippy_command().get_args().any(|a| a == "clippy"));
        assert!(fmt_command().get_args().any(|a| a == "fmt"));
        assert!(no_std_command()
            .get_args()
            .any(|a| a == "--no-default-features"));
        let bargs = args_of(&bench_command(&cfg));
        assert!(bargs.contains(&"kodct-bench/Cargo.toml".to_string()));
        assert!(bargs.contains(&"verbose-logging".to_string()));
        assert!(update_bench_readme_command()
            .get_args()
            .any(|a| a == "update_bench_readme"));
    }
}
