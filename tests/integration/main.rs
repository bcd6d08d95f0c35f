//! Integration tests for pkgstash

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Isolated workspace: a config file, a cache root and a mirror
    struct Workspace {
        dir: TempDir,
    }

    impl Workspace {
        fn new() -> Self {
            let ws = Self {
                dir: TempDir::new().unwrap(),
            };
            fs::create_dir_all(ws.mirror()).unwrap();
            fs::write(
                ws.config(),
                format!("[source]\ndir = {:?}\n", ws.mirror().to_str().unwrap()),
            )
            .unwrap();
            ws
        }

        fn config(&self) -> PathBuf {
            self.dir.path().join("config.toml")
        }

        fn cache(&self) -> PathBuf {
            self.dir.path().join("cache")
        }

        fn mirror(&self) -> PathBuf {
            self.dir.path().join("mirror")
        }

        fn cmd(&self) -> Command {
            let mut cmd = cargo_bin_cmd!("pkgstash");
            cmd.env("PKGSTASH_CONFIG", self.config())
                .env_remove("PKGSTASH_CACHE_DIR")
                .arg("--cache-dir")
                .arg(self.cache());
            cmd
        }

        fn seed_cache(&self, names: &[&str]) {
            fs::create_dir_all(self.cache()).unwrap();
            for name in names {
                fs::write(self.cache().join(name), name.as_bytes()).unwrap();
            }
        }

        fn cache_names(&self) -> Vec<String> {
            let mut names: Vec<String> = fs::read_dir(self.cache())
                .unwrap()
                .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                .collect();
            names.sort();
            names
        }
    }

    fn pkgstash() -> Command {
        let mut cmd = cargo_bin_cmd!("pkgstash");
        cmd.env_remove("PKGSTASH_CACHE_DIR")
            .env_remove("PKGSTASH_CONFIG");
        cmd
    }

    fn stdout_path(output: &[u8]) -> PathBuf {
        PathBuf::from(String::from_utf8_lossy(output).trim())
    }

    #[test]
    fn help_displays() {
        pkgstash()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("bounded on-disk cache"));
    }

    #[test]
    fn version_displays() {
        pkgstash()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("pkgstash"));
    }

    #[test]
    fn config_path() {
        let ws = Workspace::new();
        ws.cmd()
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let ws = Workspace::new();
        ws.cmd()
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[cache]"))
            .stdout(predicate::str::contains("retention_limit = 10"));
    }

    #[test]
    fn config_set_rejects_unknown_key() {
        let ws = Workspace::new();
        ws.cmd()
            .args(["config", "set", "vm.name", "x"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown config key"));
    }

    #[test]
    fn download_then_hit_cache() {
        let ws = Workspace::new();
        fs::write(ws.mirror().join("publisher.tool-1.4.0"), b"artifact").unwrap();

        let output = ws
            .cmd()
            .args(["download", "Publisher.Tool", "1.4.0"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        let location = stdout_path(&output);
        assert_eq!(location, ws.cache().join("publisher.tool-1.4.0"));
        assert_eq!(fs::read(&location).unwrap(), b"artifact");

        // Served from the cache once the mirror is gone
        fs::remove_file(ws.mirror().join("publisher.tool-1.4.0")).unwrap();
        ws.cmd()
            .args(["download", "publisher.tool", "1.4.0"])
            .assert()
            .success()
            .stdout(predicate::str::contains("publisher.tool-1.4.0"));
    }

    #[test]
    fn download_missing_artifact_fails() {
        let ws = Workspace::new();
        ws.cmd()
            .args(["download", "publisher.tool", "9.9.9"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Artifact not found"));
    }

    #[test]
    fn download_rejects_bad_version() {
        let ws = Workspace::new();
        ws.cmd()
            .args(["download", "publisher.tool", "1.4"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid package identity"));
    }

    #[test]
    fn download_prunes_before_fetching() {
        let ws = Workspace::new();
        ws.seed_cache(&["junk.tmp", "tool-1.0.0", "tool-1.1.0"]);
        fs::write(ws.mirror().join("other-2.0.0"), b"other").unwrap();

        ws.cmd()
            .args(["download", "other", "2.0.0"])
            .assert()
            .success();

        assert_eq!(ws.cache_names(), vec!["other-2.0.0", "tool-1.1.0"]);
    }

    #[test]
    fn list_reports_verdicts_without_pruning() {
        let ws = Workspace::new();
        ws.seed_cache(&["junk.tmp", "tool-1.0.0", "tool-1.1.0"]);

        ws.cmd()
            .args(["list", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"unrecognized\""))
            .stdout(predicate::str::contains("\"outdated\""))
            .stdout(predicate::str::contains("\"keep\""));

        assert_eq!(ws.cache_names().len(), 3);
    }

    #[test]
    fn prune_applies_retention() {
        let ws = Workspace::new();
        ws.seed_cache(&["junk.tmp", "a-1.0.0", "a-2.0.0", "b-1.0.0"]);
        fs::write(ws.config(), "[cache]\nretention_limit = 2\n").unwrap();

        ws.cmd()
            .args(["prune", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"deleted\": 2"));

        assert_eq!(ws.cache_names(), vec!["a-2.0.0", "b-1.0.0"]);
    }

    #[test]
    fn prune_missing_root_is_quiet() {
        let ws = Workspace::new();
        ws.cmd()
            .args(["prune", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("0"));
        assert!(!ws.cache().exists());
    }

    #[test]
    fn clear_with_yes_empties_cache() {
        let ws = Workspace::new();
        ws.seed_cache(&["tool-1.0.0", "other-2.0.0"]);

        ws.cmd().args(["clear", "--yes"]).assert().success();

        assert!(ws.cache_names().is_empty());
    }

    #[test]
    fn delete_keeps_cached_entry() {
        let ws = Workspace::new();
        ws.seed_cache(&["tool-1.0.0"]);
        let location = ws.cache().join("tool-1.0.0");

        ws.cmd()
            .arg("delete")
            .arg(&location)
            .assert()
            .success();

        assert!(location.exists());
    }

    #[test]
    fn delete_rejects_paths_outside_cache_root() {
        let ws = Workspace::new();
        let project = ws.dir.path().join("project");
        fs::create_dir_all(&project).unwrap();
        fs::write(project.join("main.rs"), b"fn main() {}").unwrap();

        ws.cmd()
            .arg("--no-cache")
            .arg("delete")
            .arg(&project)
            .assert()
            .failure()
            .stderr(predicate::str::contains("not an entry of the cache root"));

        assert!(project.join("main.rs").exists());
    }

    #[test]
    fn no_cache_download_is_one_shot() {
        let ws = Workspace::new();
        fs::write(ws.mirror().join("tool-1.0.0"), b"artifact").unwrap();

        let output = ws
            .cmd()
            .args(["--no-cache", "download", "tool", "1.0.0"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        let location = stdout_path(&output);
        assert!(!location.starts_with(ws.cache()));
        assert_eq!(fs::read(&location).unwrap(), b"artifact");

        ws.cmd()
            .arg("--no-cache")
            .arg("delete")
            .arg(&location)
            .assert()
            .success();
        assert!(!location.exists());
    }
}
