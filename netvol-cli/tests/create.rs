use predicates::prelude::*;

mod common;

#[test]
fn test_create_and_list() {
    let mut ctx = common::netvol();

    ctx.cmd
        .args(["create", "web"])
        .assert()
        .success()
        .stdout(predicate::str::contains("web"));
    assert!(ctx.data_dir("web").is_dir());

    ctx.new_cmd()
        .arg("ls")
        .assert()
        .success()
        .stdout(predicate::str::contains("NAME"))
        .stdout(predicate::str::contains("MOUNTPOINT"))
        .stdout(predicate::str::contains("web"));
}

#[test]
fn test_create_duplicate_fails() {
    let mut ctx = common::netvol();
    ctx.cmd.args(["create", "web"]).assert().success();

    ctx.new_cmd()
        .args(["create", "web"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_create_with_options() {
    let mut ctx = common::netvol();
    ctx.cmd
        .args(["create", "-o", "allowMultipleMount=true", "shared"])
        .assert()
        .success();

    ctx.new_cmd()
        .args(["inspect", "shared"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""allowMultipleMount": true"#))
        .stdout(predicate::str::contains(r#""purgeAfterDelete": false"#));
}

#[test]
fn test_create_rejects_unknown_option() {
    let mut ctx = common::netvol();
    ctx.cmd
        .args(["create", "-o", "size=10G", "web"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown option size"));

    ctx.new_cmd()
        .args(["ls", "-q"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_create_rejects_reserved_name() {
    let mut ctx = common::netvol();
    ctx.cmd
        .args(["create", "metadata.db"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid argument"));
}
