//! Integration tests for requisite

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn requisite() -> Command {
        cargo_bin_cmd!("requisite")
    }

    /// Write a config rooted in `temp` and return its path
    fn write_config(temp: &Path, installer: &str) -> PathBuf {
        let path = temp.join("config.toml");
        let content = format!(
            "[general]\nconfig_dir = {:?}\n\n[installer]\n{}\n\n[components]\ndir = {:?}\n",
            temp.join("state"),
            installer,
            temp.join("components"),
        );
        std::fs::write(&path, content).unwrap();
        path
    }

    fn write_manifest(temp: &Path, domain: &str, body: &str) {
        let dir = temp.join("components");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join(format!("{}.toml", domain)),
            format!("[component]\ndomain = {:?}\n{}\n", domain, body),
        )
        .unwrap();
    }

    #[test]
    fn help_displays() {
        requisite()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("install component package requirements"));
    }

    #[test]
    fn version_displays() {
        requisite()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("requisite"));
    }

    #[test]
    fn config_path_uses_flag() {
        let temp = TempDir::new().unwrap();
        let config = write_config(temp.path(), "skip = true");

        requisite()
            .arg("--config")
            .arg(&config)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let temp = TempDir::new().unwrap();
        let config = write_config(temp.path(), "skip = true");

        requisite()
            .arg("--config")
            .arg(&config)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[installer]"))
            .stdout(predicate::str::contains("skip = true"));
    }

    #[test]
    fn config_init_creates_file() {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("nested").join("config.toml");

        requisite()
            .arg("--config")
            .arg(&config)
            .args(["config", "init"])
            .assert()
            .success();

        assert!(config.exists());
    }

    #[test]
    fn invalid_config_reports_hint() {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("config.toml");
        std::fs::write(&config, "[installer\n").unwrap();

        requisite()
            .arg("--config")
            .arg(&config)
            .arg("status")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid configuration"))
            .stderr(predicate::str::contains("config init --force"));
    }

    #[test]
    fn status_json() {
        let temp = TempDir::new().unwrap();
        let config = write_config(temp.path(), "skip = true");

        requisite()
            .arg("--config")
            .arg(&config)
            .args(["status", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"install_in_progress\": false"));
    }

    #[test]
    fn install_skipped_when_disabled() {
        let temp = TempDir::new().unwrap();
        let config = write_config(temp.path(), "skip = true");

        requisite()
            .arg("--config")
            .arg(&config)
            .args(["install", "comp", "hello==1.0.0"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Nothing installed"));

        assert!(!temp.path().join("state").join(".pip_progress").exists());
    }

    #[test]
    fn install_failure_names_requirement() {
        let temp = TempDir::new().unwrap();
        let config = write_config(
            temp.path(),
            "python = \"/nonexistent/requisite-python\"",
        );

        requisite()
            .arg("--config")
            .arg(&config)
            .args(["install", "--yes", "comp", "hello==1.0.0", "world"])
            .assert()
            .failure()
            .stderr(predicate::str::contains(
                "Requirements for comp not found: hello==1.0.0",
            ));

        assert!(!temp.path().join("state").join(".pip_progress").exists());
    }

    #[test]
    fn check_reports_missing_without_installing() {
        let temp = TempDir::new().unwrap();
        let config = write_config(
            temp.path(),
            "python = \"/nonexistent/requisite-python\"",
        );

        requisite()
            .arg("--config")
            .arg(&config)
            .args(["check", "--format", "plain", "hello==1.0.0"])
            .assert()
            .success()
            .stdout(predicate::str::contains("hello==1.0.0\tmissing"));

        assert!(!temp.path().join("state").exists());
    }

    #[test]
    fn install_rejects_empty_specifier() {
        let temp = TempDir::new().unwrap();
        let config = write_config(temp.path(), "skip = true");

        requisite()
            .arg("--config")
            .arg(&config)
            .args(["install", "comp", ""])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid requirement"));
    }

    #[test]
    fn component_missing_manifest() {
        let temp = TempDir::new().unwrap();
        let config = write_config(temp.path(), "skip = true");

        requisite()
            .arg("--config")
            .arg(&config)
            .args(["component", "wled"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Component not found: wled"));
    }

    #[test]
    fn component_with_dependencies() {
        let temp = TempDir::new().unwrap();
        let config = write_config(temp.path(), "skip = true");
        write_manifest(temp.path(), "http", "requirements = [\"aiohttp==3.9.0\"]");
        write_manifest(
            temp.path(),
            "wled",
            "name = \"WLED\"\nrequirements = [\"wled==0.4.4\"]\ndependencies = [\"http\"]",
        );

        requisite()
            .arg("--config")
            .arg(&config)
            .args(["component", "wled"])
            .assert()
            .success()
            .stdout(predicate::str::contains("http"))
            .stdout(predicate::str::contains("WLED is ready"));
    }

    #[test]
    fn component_cycle_fails() {
        let temp = TempDir::new().unwrap();
        let config = write_config(temp.path(), "skip = true");
        write_manifest(temp.path(), "a", "dependencies = [\"b\"]");
        write_manifest(temp.path(), "b", "dependencies = [\"a\"]");

        requisite()
            .arg("--config")
            .arg(&config)
            .args(["component", "a"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("a -> b -> a"));
    }
}
