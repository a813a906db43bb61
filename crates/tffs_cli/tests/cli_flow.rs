use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::{tempdir, TempDir};
use tffs_core::builder::SnapshotBuilder;

fn cli_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("tffs"))
}

fn write_image(dir: &TempDir, img: &[u8]) -> String {
    let path: PathBuf = dir.path().join("tffs.bin");
    std::fs::write(&path, img).expect("write image");
    path.to_str().unwrap().to_string()
}

fn fritz_image(size: usize) -> Vec<u8> {
    SnapshotBuilder::new(size)
        .record(0x0100, b"185\0")
        .record(0x0188, b"00:04:0E:FF:FF:01")
        .record(0x4711, b"unknown record")
        .record(0x01A3, b"0x3006")
        .record(0x01B8, &[0xDE, 0xAD, 0x00, 0x01])
        .sentinel()
        .build()
}

#[test]
fn list_supported_keys() {
    cli_cmd()
        .arg("-l")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("hw_revision\nproductid\n"))
        .stdout(predicate::str::contains("usb_device_id\nusb_revision_id\n"))
        .stdout(predicate::str::ends_with("urlader_version\n"));
}

#[test]
fn show_all_in_registry_order() {
    let tmp = tempdir().expect("tempdir");
    let input = write_image(&tmp, &fritz_image(4096));

    cli_cmd()
        .args(["-i", &input, "-s", "0x1000", "-a"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "hw_revision=185\nmaca=00:04:0E:FF:FF:01\nusb_device_id=0x3006\nusb_revision_id=0x3006\n",
        ))
        .stdout(predicate::str::contains("unknown").not());
}

#[test]
fn show_single_key() {
    let tmp = tempdir().expect("tempdir");
    let input = write_image(&tmp, &fritz_image(4096));

    cli_cmd()
        .args(["-i", &input, "-s", "4096", "-n", "maca"])
        .assert()
        .success()
        .stdout("00:04:0E:FF:FF:01\n");

    cli_cmd()
        .args(["-i", &input, "-s", "4096", "-n", "wlan_cal", "--hex"])
        .assert()
        .success()
        .stdout("dead0001\n");
}

#[test]
fn json_output() {
    let tmp = tempdir().expect("tempdir");
    let input = write_image(&tmp, &fritz_image(4096));

    let out = cli_cmd()
        .args(["-i", &input, "-s", "4096", "-a", "--json"])
        .output()
        .expect("run");
    assert!(out.status.success());
    let items: serde_json::Value = serde_json::from_slice(&out.stdout).expect("json");
    let items = items.as_array().expect("array");
    assert_eq!(items.len(), 5);
    assert_eq!(items[0]["name"], "hw_revision");
    assert_eq!(items[0]["id"], 0x0100);
    assert_eq!(items[0]["value"], "185");
    assert_eq!(items[0]["hex"], "31383500");
}

#[test]
fn missing_key_fails() {
    let tmp = tempdir().expect("tempdir");
    let input = write_image(&tmp, &fritz_image(4096));

    cli_cmd()
        .args(["-i", &input, "-s", "4096", "-n", "serialnumber"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Key 'serialnumber' was not found"));

    cli_cmd()
        .args(["-i", &input, "-s", "4096", "-n", "no_such_key"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown key name 'no_such_key'"));
}

#[test]
fn argument_errors() {
    cli_cmd()
        .arg("-a")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No input file (-i <file>) given!"));

    let tmp = tempdir().expect("tempdir");
    let missing = tmp.path().join("absent.bin");
    cli_cmd()
        .args(["-a", "-i", missing.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));

    let input = write_image(&tmp, &fritz_image(4096));
    cli_cmd()
        .args(["-i", &input, "-s", "4096"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("either -a or -n <key name> is required!"));
}

#[test]
fn short_file_and_empty_partition_fail() {
    let tmp = tempdir().expect("tempdir");
    let input = write_image(&tmp, &fritz_image(4096));
    cli_cmd()
        .args(["-i", &input, "-a"]) // default size is 256 KiB
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed read tffs file"));

    cli_cmd()
        .args(["-i", &input, "-s", "0x10000000000", "-a"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("short read"));

    let erased = write_image(&tmp, &SnapshotBuilder::new(1024).sentinel().build());
    cli_cmd()
        .args(["-i", &erased, "-s", "1024", "-a"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No values found in tffs file"));
}

#[test]
fn custom_key_table() {
    let tmp = tempdir().expect("tempdir");
    let img = SnapshotBuilder::new(64)
        .record(0x0064, b"MAC1")
        .record(0x0065, b"xyz")
        .sentinel()
        .build();
    let input = write_image(&tmp, &img);
    let keys = tmp.path().join("keys.json");
    std::fs::write(&keys, r#"[{"id": 100, "name": "keyA"}, {"id": 101, "name": "keyB"}]"#)
        .expect("write keys");

    cli_cmd()
        .args(["-i", &input, "-s", "64", "-a", "--keys", keys.to_str().unwrap()])
        .assert()
        .success()
        .stdout("keyA=MAC1\nkeyB=xyz\n");

    cli_cmd()
        .args(["-l", "--keys", keys.to_str().unwrap()])
        .assert()
        .success()
        .stdout("keyA\nkeyB\n");
}
