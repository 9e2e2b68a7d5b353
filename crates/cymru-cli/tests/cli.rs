//! End-to-end tests of the `ipasn` binary that need no network access.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// The binary with its config file redirected into `dir`.
fn ipasn(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ipasn").unwrap();
    cmd.env("IPASN_CONFIG", dir.path().join("config.toml"))
        .env_remove("IPASN_SERVER")
        .env_remove("IPASN_DOH")
        .env_remove("RUST_LOG")
        .arg("--no-color");
    cmd
}

#[test]
fn help_lists_commands() {
    let dir = TempDir::new().unwrap();
    ipasn(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("origin"))
        .stdout(predicate::str::contains("peer"))
        .stdout(predicate::str::contains("ipset"));
}

#[test]
fn private_address_is_refused() {
    let dir = TempDir::new().unwrap();
    ipasn(&dir)
        .args(["origin", "192.168.1.1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("192.168.1.1: IP is a private address"));
}

#[test]
fn every_input_is_reported() {
    let dir = TempDir::new().unwrap();
    ipasn(&dir)
        .args(["--output", "raw", "peer", "not-an-ip,127.0.0.1", "0.0.0.0", "ff02::1"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("not an IP address"))
        .stderr(predicate::str::contains("127.0.0.1: IP is a loopback address"))
        .stderr(predicate::str::contains("0.0.0.0: IP is unspecified"))
        .stderr(predicate::str::contains("ff02::1: IP is a multicast address"));
}

#[test]
fn excluded_networks_are_refused() {
    let dir = TempDir::new().unwrap();
    ipasn(&dir)
        .args(["origin", "--exclude", "216.90.108.0/24", "216.90.108.7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("IP is a private address"));
}

#[test]
fn bad_exclude_network_aborts() {
    let dir = TempDir::new().unwrap();
    ipasn(&dir)
        .args(["origin", "--exclude", "nonsense", "1.1.1.1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid --exclude network"));
}

#[test]
fn bad_asn_is_reported() {
    let dir = TempDir::new().unwrap();
    ipasn(&dir)
        .args(["asn", "ASX"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not an AS number"));
}

#[test]
fn ipset_explains_which_lookup_failed() {
    let dir = TempDir::new().unwrap();
    ipasn(&dir)
        .args(["ipset", "10.1.2.3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Error looking up the origin: IP is a private address",
        ));
}

#[test]
fn config_path_follows_env() {
    let dir = TempDir::new().unwrap();
    let expected = dir.path().join("config.toml");
    ipasn(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(expected.display().to_string()));
}

#[test]
fn config_set_then_show() {
    let dir = TempDir::new().unwrap();

    ipasn(&dir)
        .args(["config", "set", "exclude", "216.90.108.0/24, 2001:db8::/32"])
        .assert()
        .success();
    ipasn(&dir)
        .args(["config", "set", "output_format", "json"])
        .assert()
        .success();

    let saved = std::fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(saved.contains("output_format = \"json\""));
    assert!(saved.contains("2001:db8::/32"));

    ipasn(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"output_format\": \"json\""));

    // Configured exclusions apply to lookups.
    ipasn(&dir)
        .args(["origin", "216.90.108.7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("IP is a private address"));
}

#[test]
fn config_rejects_bad_values() {
    let dir = TempDir::new().unwrap();

    ipasn(&dir)
        .args(["config", "set", "timeout", "soon"])
        .assert()
        .failure();
    ipasn(&dir)
        .args(["config", "set", "server", "dns.google"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a nameserver address"));
    ipasn(&dir)
        .args(["config", "set", "colour", "blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"));

    assert!(!dir.path().join("config.toml").exists());
}
