//! Integration tests for Chanko

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const SOURCES: &str = "deb http://deb.debian.org/debian bookworm main contrib\n";

    /// A temp tree holding an empty arena, a sources.list and an isolated config
    struct Sandbox {
        temp: TempDir,
    }

    impl Sandbox {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            fs::create_dir(temp.path().join("arena.union")).unwrap();
            fs::write(temp.path().join("sources.list"), SOURCES).unwrap();
            fs::write(
                temp.path().join("config.toml"),
                format!(
                    "[cache]\ndir = \"{}\"\n",
                    temp.path().join("cache").display()
                ),
            )
            .unwrap();
            Self { temp }
        }

        fn base(&self) -> PathBuf {
            self.temp.path().join("arena.union")
        }

        fn sources(&self) -> PathBuf {
            self.temp.path().join("sources.list")
        }

        fn chanko(&self) -> Command {
            let mut cmd = cargo_bin_cmd!("chanko");
            cmd.env("CHANKO_CONFIG", self.temp.path().join("config.toml"))
                .env("CHANKO_BASE", self.base())
                .env("CI", "1");
            cmd
        }

        fn init(&self) {
            self.chanko()
                .arg("init")
                .arg(self.sources())
                .assert()
                .success();
        }
    }

    fn chanko() -> Command {
        let mut cmd = cargo_bin_cmd!("chanko");
        cmd.env_remove("CHANKO_BASE").env_remove("CHANKO_CONFIG");
        cmd
    }

    #[test]
    fn help_displays() {
        chanko()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("package arena manager"));
    }

    #[test]
    fn version_displays() {
        chanko()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("chanko"));
    }

    #[test]
    fn init_creates_arena() {
        let sandbox = Sandbox::new();
        sandbox
            .chanko()
            .arg("init")
            .arg(sandbox.sources())
            .assert()
            .success()
            .stdout(predicate::str::contains("Arena initialized"));

        let config = sandbox.base().join("config");
        assert_eq!(fs::read_to_string(config.join("sources.list")).unwrap(), SOURCES);
        assert!(config.join("sources.list.md5").is_file());
        assert_eq!(
            fs::read_to_string(config.join("cache_id")).unwrap().len(),
            32
        );
        assert!(sandbox.base().join("archives").join("partial").is_dir());
    }

    #[test]
    fn init_twice_fails() {
        let sandbox = Sandbox::new();
        sandbox.init();

        sandbox
            .chanko()
            .arg("init")
            .arg(sandbox.sources())
            .assert()
            .failure()
            .stderr(predicate::str::contains("already initialized"));
    }

    #[test]
    fn init_missing_sources_list() {
        let sandbox = Sandbox::new();
        sandbox
            .chanko()
            .args(["init", "/nonexistent/sources.list"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("No such sources.list"));
    }

    #[test]
    fn init_outside_arena_fails() {
        let sandbox = Sandbox::new();
        sandbox
            .chanko()
            .arg("--base")
            .arg(sandbox.temp.path())
            .arg("init")
            .arg(sandbox.sources())
            .assert()
            .failure()
            .stderr(predicate::str::contains("Not inside a sumo arena"))
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn status_reports_uninitialized() {
        let sandbox = Sandbox::new();
        sandbox
            .chanko()
            .args(["status", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("initialized=false"));
    }

    #[test]
    fn status_json_after_edit_is_stale() {
        let sandbox = Sandbox::new();
        sandbox.init();
        fs::write(
            sandbox.base().join("config").join("sources.list"),
            "deb http://deb.debian.org/debian trixie main\n",
        )
        .unwrap();

        let output = sandbox
            .chanko()
            .args(["status", "--format", "json"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let status: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(status["initialized"], true);
        assert_eq!(status["stale"], true);
    }

    #[test]
    fn refresh_before_init_fails() {
        let sandbox = Sandbox::new();
        sandbox
            .chanko()
            .arg("refresh")
            .assert()
            .failure()
            .stderr(predicate::str::contains("not initialized"))
            .stderr(predicate::str::contains("chanko init"));
    }

    #[test]
    fn refresh_after_edit_rebuilds_remote_cache() {
        let sandbox = Sandbox::new();
        sandbox.init();
        fs::write(
            sandbox.base().join("config").join("sources.list"),
            "deb http://deb.debian.org/debian trixie main\n",
        )
        .unwrap();

        sandbox
            .chanko()
            .arg("refresh")
            .assert()
            .success()
            .stdout(predicate::str::contains("remote cache refreshed"));

        sandbox
            .chanko()
            .arg("refresh")
            .assert()
            .success()
            .stdout(predicate::str::contains("sources.list unchanged"));
    }

    #[test]
    fn refresh_local_only() {
        let sandbox = Sandbox::new();
        sandbox.init();

        sandbox
            .chanko()
            .args(["refresh", "--local"])
            .assert()
            .success()
            .stdout(predicate::str::contains("local cache refreshed"))
            .stdout(predicate::str::contains("remote cache refreshed").not())
            .stdout(predicate::str::contains("remote refreshed: never"));

        let id = fs::read_to_string(sandbox.base().join("config").join("cache_id")).unwrap();
        let cache = sandbox.temp.path().join("cache").join(id.trim());
        assert!(cache.join("local").join("index.json").is_file());
        assert!(!cache.join("remote").join("index.json").exists());
    }

    #[test]
    fn refresh_all_with_lock() {
        let sandbox = Sandbox::new();
        sandbox.init();

        sandbox
            .chanko()
            .args(["refresh", "--all", "--lock"])
            .assert()
            .success()
            .stdout(predicate::str::contains("local cache refreshed"))
            .stdout(predicate::str::contains("remote refreshed: never").not());

        assert!(sandbox.temp.path().join("cache").is_dir());
        assert!(sandbox.base().join(".chanko.lock").is_file());
    }

    #[test]
    fn config_path() {
        let sandbox = Sandbox::new();
        sandbox
            .chanko()
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_set_then_show() {
        let sandbox = Sandbox::new();
        sandbox
            .chanko()
            .args(["config", "set", "arena.lock", "true"])
            .assert()
            .success();

        sandbox
            .chanko()
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("lock = true"));
    }

    #[test]
    fn config_set_unknown_key() {
        let sandbox = Sandbox::new();
        sandbox
            .chanko()
            .args(["config", "set", "vm.name", "x"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown config key"));
    }
}
