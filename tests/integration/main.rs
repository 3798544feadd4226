//! Integration tests for dcdump

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    const TRAILER: [u8; 10] = [0xD8, 0x41, 0x0D, 0x97, 0x45, 0x6F, 0xFA, 0xF4, 0x01, 0x00];
    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];
    const JPEG: &[u8] = &[
        0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01, 0x01, 0x00,
    ];

    /// dcdump isolated from the caller's config and sudo environment
    fn dcdump(temp: &TempDir) -> Command {
        let mut cmd = cargo_bin_cmd!("dcdump");
        cmd.env("DCDUMP_CONFIG", temp.path().join("config.toml"))
            .env("USER", "tester")
            .env_remove("SUDO_USER")
            .env_remove("SUDO_UID")
            .env_remove("SUDO_GID")
            .env_remove("DCDUMP_HOME");
        cmd
    }

    /// A cache entry holding `payload` behind a key header, followed by the trailer
    fn framed(payload: &[u8]) -> Vec<u8> {
        let key = b"https://media.discordapp.net/attachments/1/2/image";
        let mut entry = vec![0u8; 24];
        entry[12] = key.len() as u8;
        entry.extend_from_slice(key);
        entry.extend_from_slice(payload);
        entry.extend_from_slice(&TRAILER);
        entry.extend_from_slice(b"metadata");
        entry
    }

    fn fake_home(temp: &TempDir) -> PathBuf {
        let home = temp.path().join("home");
        let cache = home.join(".config/discord/Cache/Cache_Data");
        fs::create_dir_all(&cache).unwrap();

        let mut jpeg_entry = b"jpeg entry header".to_vec();
        jpeg_entry.extend_from_slice(JPEG);
        fs::write(cache.join("f_000001"), jpeg_entry).unwrap();
        fs::write(cache.join("f_000002"), framed(PNG)).unwrap();
        fs::write(cache.join("index"), b"index data").unwrap();

        // An empty canary install is skipped
        fs::create_dir_all(home.join(".config/discordcanary/Cache/Cache_Data")).unwrap();
        home
    }

    fn single_dir(path: &Path) -> PathBuf {
        let mut dirs: Vec<_> = fs::read_dir(path)
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(dirs.len(), 1);
        dirs.remove(0)
    }

    #[test]
    fn help_displays() {
        let temp = TempDir::new().unwrap();
        dcdump(&temp)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Discord"));
    }

    #[test]
    fn version_displays() {
        let temp = TempDir::new().unwrap();
        dcdump(&temp)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("dcdump"));
    }

    #[test]
    fn config_path() {
        let temp = TempDir::new().unwrap();
        dcdump(&temp)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_init_and_show() {
        let temp = TempDir::new().unwrap();
        dcdump(&temp).args(["config", "init"]).assert().success();
        assert!(temp.path().join("config.toml").exists());

        dcdump(&temp)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[dump]"))
            .stdout(predicate::str::contains("tag_files = true"));
    }

    #[test]
    fn invalid_config_fails() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("config.toml"), "[dump]\nextract = 3\n").unwrap();
        dcdump(&temp)
            .args(["config", "show"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Error:"));
    }

    #[test]
    fn bad_config_values_fail() {
        for content in ["[general]\nlog_format = \"jsno\"\n", "[dump]\njobs = 0\n"] {
            let temp = TempDir::new().unwrap();
            fs::write(temp.path().join("config.toml"), content).unwrap();
            dcdump(&temp)
                .args(["config", "path"])
                .assert()
                .failure()
                .stderr(predicate::str::contains("Invalid configuration"))
                .stderr(predicate::str::contains("config init --force"));
        }
    }

    #[test]
    fn extract_strips_key_header() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("f_000002");
        fs::write(&input, framed(PNG)).unwrap();

        dcdump(&temp)
            .args(["extract", "-f", "plain"])
            .arg(&input)
            .assert()
            .success()
            .stdout(predicate::str::contains("f_000002.out.png"));

        assert_eq!(fs::read(temp.path().join("f_000002.out.png")).unwrap(), PNG);
    }

    #[test]
    fn extract_reports_json() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("f_000003");
        let output = temp.path().join("image");
        let mut entry = b"header".to_vec();
        entry.extend_from_slice(JPEG);
        fs::write(&input, entry).unwrap();

        let assert = dcdump(&temp)
            .args(["extract", "--no-tag", "-f", "json", "-o"])
            .arg(&output)
            .arg(&input)
            .assert()
            .success();

        let report: serde_json::Value =
            serde_json::from_slice(&assert.get_output().stdout).unwrap();
        assert_eq!(report["stage"], "jpeg_recovered");
        assert_eq!(report["file_type"], "jpg");
        assert_eq!(fs::read(&output).unwrap(), JPEG);
    }

    #[test]
    fn extract_missing_input_fails() {
        let temp = TempDir::new().unwrap();
        dcdump(&temp)
            .args(["extract"])
            .arg(temp.path().join("missing"))
            .assert()
            .failure()
            .stderr(predicate::str::contains("Error:"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn locate_lists_caches() {
        let temp = TempDir::new().unwrap();
        let home = fake_home(&temp);

        dcdump(&temp)
            .args(["locate", "-f", "plain", "--home"])
            .arg(&home)
            .assert()
            .success()
            .stdout(predicate::str::contains("discord/Cache/Cache_Data"))
            .stdout(predicate::str::contains("discordcanary"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn dump_recovers_payloads() {
        let temp = TempDir::new().unwrap();
        let home = fake_home(&temp);
        let out = temp.path().join("out");

        let assert = dcdump(&temp)
            .args(["dump", "-n", "-f", "json", "--home"])
            .arg(&home)
            .arg("--output")
            .arg(&out)
            .assert()
            .success();

        let summary: serde_json::Value =
            serde_json::from_slice(&assert.get_output().stdout).unwrap();
        let builds = summary["builds"].as_array().unwrap();
        assert_eq!(builds.len(), 1);
        assert_eq!(builds[0]["build"], "stable");
        assert_eq!(builds[0]["found"], 3);
        assert_eq!(builds[0]["copied"], 3);
        assert_eq!(builds[0]["recovered"], 2);
        assert_eq!(builds[0]["identified"], 2);

        let stable = single_dir(&out).join("Stable");
        assert_eq!(fs::read(stable.join("f_000001.jpg")).unwrap(), JPEG);
        assert_eq!(fs::read(stable.join("f_000002.png")).unwrap(), PNG);
        assert_eq!(fs::read(stable.join("index")).unwrap(), b"index data");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn dump_table_prints_saved_path() {
        let temp = TempDir::new().unwrap();
        let home = fake_home(&temp);
        let out = temp.path().join("out");

        dcdump(&temp)
            .args(["dump", "--noninteractive", "--extract", "never", "--no-tag", "--home"])
            .arg(&home)
            .arg("--output")
            .arg(&out)
            .assert()
            .success()
            .stdout(predicate::str::contains("Saved:"))
            .stdout(predicate::str::contains("cache empty, skipping"));

        let stable = single_dir(&out).join("Stable");
        let mut raw = b"jpeg entry header".to_vec();
        raw.extend_from_slice(JPEG);
        assert_eq!(fs::read(stable.join("f_000001")).unwrap(), raw);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn dump_without_cache_succeeds() {
        let temp = TempDir::new().unwrap();
        let home = temp.path().join("empty-home");
        fs::create_dir_all(&home).unwrap();
        let out = temp.path().join("out");

        dcdump(&temp)
            .args(["dump", "-n", "--home"])
            .arg(&home)
            .arg("--output")
            .arg(&out)
            .assert()
            .success()
            .stdout(predicate::str::contains("No cache found"));
        assert!(!out.exists());
    }
}
