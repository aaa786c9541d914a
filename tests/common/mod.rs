#![allow(dead_code)]

pub mod mock_data;

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use serde_json::Value;
use tempfile::TempDir;

/// Helper struct to run nyimbo commands in an isolated temp directory
pub struct NyimboTest {
    pub temp_dir: TempDir,
    binary_path: String,
}

impl NyimboTest {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        NyimboTest {
            temp_dir,
            binary_path: env!("CARGO_BIN_EXE_nyimbo").to_string(),
        }
    }

    fn command(&self, args: &[&str], user: Option<&str>) -> Command {
        let mut command = Command::new(&self.binary_path);
        command
            .args(args)
            .current_dir(self.temp_dir.path())
            .env_remove("NYIMBO_USER")
            .env_remove("NYIMBO_STORE_URL")
            .env_remove("NYIMBO_LOG");
        if let Some(user) = user {
            command.env("NYIMBO_USER", user);
        }
        command
    }

    pub fn run(&self, args: &[&str]) -> Output {
        self.command(args, None)
            .output()
            .expect("Failed to execute nyimbo command")
    }

    pub fn run_as(&self, user: &str, args: &[&str]) -> Output {
        self.command(args, Some(user))
            .output()
            .expect("Failed to execute nyimbo command")
    }

    pub fn run_with_stdin(&self, args: &[&str], stdin: &str) -> Output {
        let mut child = self
            .command(args, None)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to spawn nyimbo command");
        child
            .stdin
            .take()
            .expect("stdin should be piped")
            .write_all(stdin.as_bytes())
            .expect("Failed to write stdin");
        child
            .wait_with_output()
            .expect("Failed to wait for nyimbo command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        check_success(args, self.run(args))
    }

    pub fn run_success_as(&self, user: &str, args: &[&str]) -> String {
        check_success(args, self.run_as(user, args))
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        check_failure(args, self.run(args))
    }

    pub fn run_failure_as(&self, user: &str, args: &[&str]) -> String {
        check_failure(args, self.run_as(user, args))
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let stdout = self.run_success(args);
        serde_json::from_str(&stdout).expect("Command output should be valid JSON")
    }

    pub fn run_json_as(&self, user: &str, args: &[&str]) -> Value {
        let stdout = self.run_success_as(user, args);
        serde_json::from_str(&stdout).expect("Command output should be valid JSON")
    }

    pub fn data_dir(&self) -> PathBuf {
        self.temp_dir.path().join(".nyimbo").join("data")
    }

    /// Write raw catalog documents to the local store file
    pub fn write_catalog(&self, documents: &Value) {
        let dir = self.data_dir();
        fs::create_dir_all(&dir).expect("Failed to create data directory");
        fs::write(
            dir.join("music_sheets.json"),
            serde_json::to_string_pretty(documents).expect("documents should serialize"),
        )
        .expect("Failed to write catalog file");
    }

    pub fn read_catalog(&self) -> Value {
        let content = fs::read_to_string(self.data_dir().join("music_sheets.json"))
            .expect("Failed to read catalog file");
        serde_json::from_str(&content).expect("catalog file should be valid JSON")
    }

    pub fn write_config(&self, content: &str) {
        let dir = self.temp_dir.path().join(".nyimbo");
        fs::create_dir_all(&dir).expect("Failed to create .nyimbo directory");
        fs::write(dir.join("config.yaml"), content).expect("Failed to write config file");
    }

    /// Create a small PDF-looking file in the temp dir and return its path
    pub fn write_pdf(&self, name: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, b"%PDF-1.4\n%test\n").expect("Failed to write PDF");
        path
    }
}

fn check_success(args: &[&str], output: Output) -> String {
    if !output.status.success() {
        panic!(
            "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
            args,
            output.status,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn check_failure(args: &[&str], output: Output) -> String {
    assert!(
        !output.status.success(),
        "Expected command {:?} to fail, but it succeeded",
        args
    );
    String::from_utf8_lossy(&output.stderr).to_string()
}
