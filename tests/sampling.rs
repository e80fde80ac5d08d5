//! End-to-end sampling tests: the binary writes sample files that decode
//! back to the requested shape, reproducibly for a fixed seed.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use genmodel::output::load_record;
use predicates::prelude::*;

fn cmd() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("genmodel");
    cmd.env("GENMODEL_CONFIG", "/nonexistent/genmodel/config.toml").env_remove("GENMODEL_SEED");
    cmd
}

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn sample(out: &Path, extra: &[&str]) {
    cmd()
        .args(["--output", out.to_str().unwrap()])
        .args(extra)
        .assert()
        .success()
        .stderr(predicate::str::contains("Saved:"));
}

#[test]
fn writes_count_by_z_size_noise() {
    let dir = scratch("genmodel_test_shape");
    let out = dir.join("z.yaml");

    sample(&out, &["--z-type", "normal", "--z-size", "16", "--count", "10", "--batch-size", "4"]);

    let record = load_record(&out).unwrap();
    assert_eq!(record.z_type, "normal");
    assert_eq!(record.count, 10);
    assert_eq!(record.z_size, 16);
    assert_eq!(record.noise().unwrap().dim(), (10, 16));
    assert!(record.labels.is_none());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn same_seed_same_noise() {
    let dir = scratch("genmodel_test_seed");
    let a = dir.join("a.json");
    let b = dir.join("b.json");
    let c = dir.join("c.json");

    let args = ["--z-size", "8", "--count", "5"];
    sample(&a, &[&args[..], &["--seed", "1234"][..]].concat());
    sample(&b, &[&args[..], &["--seed", "1234"][..]].concat());
    sample(&c, &[&args[..], &["--seed", "4321"][..]].concat());

    let (a, b, c) = (load_record(&a).unwrap(), load_record(&b).unwrap(), load_record(&c).unwrap());
    assert_eq!(a.seed, Some(1234));
    assert_eq!(a.z, b.z);
    assert_ne!(a.z, c.z);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn seed_from_environment() {
    let dir = scratch("genmodel_test_seed_env");
    let a = dir.join("a.yaml");
    let b = dir.join("b.yaml");

    for out in [&a, &b] {
        cmd()
            .env("GENMODEL_SEED", "77")
            .args(["--z-size", "4", "--count", "3", "--output", out.to_str().unwrap()])
            .assert()
            .success();
    }

    let (a, b) = (load_record(&a).unwrap(), load_record(&b).unwrap());
    assert_eq!(a.seed, Some(77));
    assert_eq!(a.z, b.z);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn conditional_model_writes_labels() {
    let dir = scratch("genmodel_test_labels");
    let out = dir.join("z.yaml");

    sample(&out, &["--z-size", "4", "--num-classes", "10", "--count", "20", "--seed", "3"]);

    let record = load_record(&out).unwrap();
    assert_eq!(record.num_classes, 10);
    let labels = record.labels.unwrap();
    assert_eq!(labels.len(), 20);
    assert!(labels.iter().all(|&y| y < 10));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn unit_noise_rows_are_normalized() {
    let dir = scratch("genmodel_test_unit");
    let out = dir.join("z.yaml");

    sample(&out, &["--z-type", "unit", "--z-size", "32", "--count", "6"]);

    let z = load_record(&out).unwrap().noise().unwrap();
    for row in z.rows() {
        assert!((row.dot(&row).sqrt() - 1.0).abs() < 1e-5);
    }

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn config_file_describes_model() {
    let dir = scratch("genmodel_test_config");
    let config = dir.join("config.toml");
    std::fs::write(
        &config,
        "[model]\nz_size = 3\nz_type = \"uniform_0_1\"\n\n[defaults]\ncount = 7\nseed = 9\n",
    )
    .unwrap();
    let out = dir.join("z.yaml");

    cmd()
        .args(["--config", config.to_str().unwrap(), "--output", out.to_str().unwrap()])
        .assert()
        .success();

    let record = load_record(&out).unwrap();
    assert_eq!(record.z_type, "uniform_0_1");
    assert_eq!((record.count, record.z_size), (7, 3));
    assert_eq!(record.seed, Some(9));
    assert!(record.z.iter().all(|&v| (0.0..1.0).contains(&v)));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn auto_filename_uses_noise_type_and_size() {
    let dir = scratch("genmodel_test_autofile");

    cmd()
        .args(["--z-type", "uniform_0_1", "--z-size", "4", "--count", "2", "--format", "json"])
        .current_dir(&dir)
        .assert()
        .success();

    let files: Vec<_> = std::fs::read_dir(&dir).unwrap().flatten().collect();
    assert_eq!(files.len(), 1, "Exactly one file should be created");
    let name = files[0].file_name();
    let name = name.to_string_lossy();
    assert!(name.starts_with("uniform-0-1-4-"), "unexpected filename: {name}");
    assert!(name.ends_with(".json"), "unexpected filename: {name}");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn preview_writes_png() {
    let dir = scratch("genmodel_test_preview");
    let out = dir.join("z.yaml");
    let preview = dir.join("z.png");

    sample(&out, &["--z-size", "8", "--count", "4", "--preview", preview.to_str().unwrap()]);

    let data = std::fs::read(&preview).unwrap();
    assert_eq!(&data[..8], &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]);

    let _ = std::fs::remove_dir_all(&dir);
}
