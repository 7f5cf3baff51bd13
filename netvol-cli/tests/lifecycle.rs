use predicates::prelude::*;

mod common;

#[test]
fn test_mount_path_unmount_rm() {
    let mut ctx = common::netvol();
    let data_dir = ctx.data_dir("db");
    let data_dir = data_dir.to_str().unwrap();

    ctx.cmd
        .args(["create", "-o", "purgeAfterDelete=true", "db"])
        .assert()
        .success();

    ctx.new_cmd()
        .args(["mount", "--id", "c1", "db"])
        .assert()
        .success()
        .stdout(predicate::str::contains(data_dir));

    ctx.new_cmd()
        .args(["mount", "--id", "c2", "db"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already mounted"));

    ctx.new_cmd()
        .args(["path", "db"])
        .assert()
        .success()
        .stdout(predicate::str::contains(data_dir));

    ctx.new_cmd()
        .args(["rm", "db"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("in use"));

    ctx.new_cmd()
        .args(["unmount", "--id", "c1", "db"])
        .assert()
        .success();

    ctx.new_cmd()
        .args(["rm", "db"])
        .assert()
        .success()
        .stdout(predicate::str::contains("db"));

    assert!(!ctx.root().join("db").exists());
}

#[test]
fn test_inspect_unknown() {
    let mut ctx = common::netvol();
    ctx.cmd
        .args(["inspect", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_list_alias_and_quiet() {
    let mut ctx = common::netvol();
    ctx.cmd.args(["create", "a"]).assert().success();
    ctx.new_cmd().args(["create", "b"]).assert().success();

    ctx.new_cmd()
        .args(["list", "-q"])
        .assert()
        .success()
        .stdout("a\nb\n");
}

#[test]
fn test_drivers() {
    let mut ctx = common::netvol();
    ctx.cmd
        .arg("drivers")
        .assert()
        .success()
        .stdout("mock\nnfs\n");
}

#[test]
fn test_unknown_driver() {
    let ctx = common::netvol();
    common::bare_cmd()
        .arg("--root")
        .arg(ctx.root())
        .args(["--driver", "ceph", "ls"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown driver"));
}

#[test]
fn test_invalid_log_level_rejected() {
    let ctx = common::netvol();
    ctx.new_cmd()
        .args(["--log-level", "verbose", "ls"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("verbose"));
}

#[test]
fn test_environment_configuration() {
    let ctx = common::netvol();

    common::bare_cmd()
        .env("NETVOL_ROOT", ctx.root())
        .env("DRIVER", "nfs")
        .env("DRIVER_OPTIONS", common::MOCK_NFS_OPTIONS)
        .env("LOG_LEVEL", "debug")
        .args(["create", "from-env"])
        .assert()
        .success();

    ctx.new_cmd()
        .args(["ls", "-q"])
        .assert()
        .success()
        .stdout("from-env\n");
}
