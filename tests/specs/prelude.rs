//! Shared helpers for CLI specs

use assert_cmd::Command;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

/// Upper bound for a single `sg` invocation
pub const SPEC_TIMEOUT: Duration = Duration::from_secs(20);

/// Two deployments, one with an artifact
pub const TWO_DEPLOYMENTS: &str = r#"
[deployment.alpha]
start_delay = "20ms"
artifact = { location = "file:/bundles/alpha.jar", symbolic_name = "org.alpha", version = "1.0.0" }

[deployment.beta]
start_delay = "5ms"
"#;

/// Temporary project directory holding config files
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file relative to the project root
    pub fn file(&self, rel: &str, content: &str) {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    pub fn sg(&self) -> CliBuilder {
        CliBuilder::new(self.dir.path())
    }
}

/// Builder for one `sg` invocation
pub struct CliBuilder {
    cmd: Command,
}

impl CliBuilder {
    fn new(dir: &Path) -> Self {
        let mut cmd = Command::cargo_bin("sg").unwrap();
        cmd.current_dir(dir)
            .env_remove("RUST_LOG")
            .timeout(SPEC_TIMEOUT);
        Self { cmd }
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn passes(mut self) -> RunAssert {
        let output = self.cmd.assert().success().get_output().clone();
        RunAssert::new(output)
    }

    pub fn fails(mut self) -> RunAssert {
        let output = self.cmd.assert().failure().get_output().clone();
        RunAssert::new(output)
    }
}

/// Captured output of a finished invocation
pub struct RunAssert {
    stdout: String,
    stderr: String,
}

impl RunAssert {
    fn new(output: std::process::Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    pub fn stdout_json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout)
            .unwrap_or_else(|e| panic!("stdout is not JSON ({}):\n{}", e, self.stdout))
    }

    pub fn stdout_has(self, expected: &str) -> Self {
        assert!(
            self.stdout.contains(expected),
            "stdout missing {:?}:\n{}",
            expected,
            self.stdout
        );
        self
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        assert!(
            self.stderr.contains(expected),
            "stderr missing {:?}:\n{}",
            expected,
            self.stderr
        );
        self
    }
}
