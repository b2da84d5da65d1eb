#![allow(dead_code)]

use assert_cmd::Command;
use predicates::prelude::*;

/// Test helper for running sunpos commands with less boilerplate
pub struct SunposTest {
    cmd: Command,
}

pub fn sunpos_command() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("sunpos"))
}

impl SunposTest {
    pub fn new() -> Self {
        Self {
            cmd: sunpos_command(),
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        self.cmd.args(args);
        self
    }

    pub fn arg<S: AsRef<std::ffi::OsStr>>(mut self, arg: S) -> Self {
        self.cmd.arg(arg);
        self
    }

    pub fn assert_success(mut self) -> assert_cmd::assert::Assert {
        self.cmd.assert().success()
    }

    /// Assert the command succeeds and contains text in stdout
    pub fn assert_success_contains(mut self, text: &str) -> assert_cmd::assert::Assert {
        self.cmd
            .assert()
            .success()
            .stdout(predicate::str::contains(text))
    }

    pub fn assert_success_contains_all(mut self, texts: &[&str]) -> assert_cmd::assert::Assert {
        let mut assertion = self.cmd.assert().success();
        for text in texts {
            assertion = assertion.stdout(predicate::str::contains(*text));
        }
        assertion
    }

    /// Assert the command fails with `Error: ...` containing text on stderr
    pub fn assert_error_contains(mut self, text: &str) -> assert_cmd::assert::Assert {
        self.cmd
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::starts_with("Error: "))
            .stderr(predicate::str::contains(text))
    }

    pub fn assert_failure(mut self) -> assert_cmd::assert::Assert {
        self.cmd.assert().failure()
    }

    /// Run and return stdout as a string, asserting success
    pub fn stdout(mut self) -> String {
        let output = self.cmd.assert().success().get_output().stdout.clone();
        String::from_utf8(output).unwrap()
    }
}

/// Greenwich at 00:00 UTC on the June 2024 solstice
pub fn greenwich_midnight() -> SunposTest {
    SunposTest::new().args(["51.477928", "0.0", "2024-06-21T00:00:00Z", "position"])
}

pub fn position_with_format(format: &str, lat: &str, lon: &str, datetime: &str) -> SunposTest {
    SunposTest::new().args([
        &format!("--format={}", format),
        lat,
        lon,
        datetime,
        "position",
    ])
}

/// Small, quiet and reproducible validation run
pub fn quick_check(samples: usize, seed: u64) -> SunposTest {
    SunposTest::new().args([
        "check",
        &format!("--samples={}", samples),
        &format!("--seed={}", seed),
        "--no-progress",
    ])
}

/// Parse a CSV field as f64
pub fn csv_f64(line: &str, index: usize) -> f64 {
    line.split(',').nth(index).unwrap().parse().unwrap()
}
