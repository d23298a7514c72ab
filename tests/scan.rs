use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

fn command() -> Command {
    Command::cargo_bin("vuesweep").expect("binary exists")
}

fn make_vue_project(temp: &assert_fs::TempDir, name: &str) -> assert_fs::fixture::ChildPath {
    let project = temp.child(name);
    project.create_dir_all().unwrap();
    project
        .child("package.json")
        .write_str(r#"{"dependencies": {"vue": "^3.0"}}"#)
        .unwrap();
    project
}

#[test]
fn scan_reports_vue_projects_and_ignores_react() {
    let temp = assert_fs::TempDir::new().unwrap();
    let vue = make_vue_project(&temp, "dev/shop");
    vue.child("node_modules/vue/vue.js").write_str("export default {}").unwrap();
    vue.child("dist/index.html").write_str("<html></html>").unwrap();

    let react = temp.child("dev/dashboard");
    react.create_dir_all().unwrap();
    react
        .child("package.json")
        .write_str(r#"{"dependencies": {"react": "^18"}}"#)
        .unwrap();

    let mut cmd = command();
    cmd.env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.child("config").path())
        .arg("scan")
        .arg("--days")
        .arg("0")
        .arg(temp.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("~/dev/shop"))
        .stdout(predicate::str::contains("Total reclaimable:"))
        .stdout(predicate::str::contains("dashboard").not());
}

#[test]
fn scan_does_not_report_projects_vendored_under_node_modules() {
    let temp = assert_fs::TempDir::new().unwrap();
    let outer = make_vue_project(&temp, "dev/shop");
    let vendored = outer.child("node_modules/some-lib");
    vendored.create_dir_all().unwrap();
    vendored
        .child("package.json")
        .write_str(r#"{"dependencies": {"vue": "^3.0"}}"#)
        .unwrap();

    let mut cmd = command();
    cmd.env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.child("config").path())
        .arg("scan")
        .arg("--days")
        .arg("0")
        .arg(temp.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("~/dev/shop"))
        .stdout(predicate::str::contains("some-lib").not());
}

#[test]
fn scan_with_default_threshold_hides_recently_active_projects() {
    let temp = assert_fs::TempDir::new().unwrap();
    let vue = make_vue_project(&temp, "dev/shop");
    vue.child("src/main.js").write_str("console.log('fresh')").unwrap();

    let mut cmd = command();
    cmd.env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.child("config").path())
        .arg("scan")
        .arg(temp.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("No Vue projects inactive for 30 day(s) or more"));
}

#[test]
fn scan_all_lists_recently_active_projects() {
    let temp = assert_fs::TempDir::new().unwrap();
    make_vue_project(&temp, "dev/shop");

    let mut cmd = command();
    cmd.env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.child("config").path())
        .arg("scan")
        .arg("--all")
        .arg(temp.path());

    cmd.assert().success().stdout(predicate::str::contains("~/dev/shop"));
}

#[test]
fn scan_rejects_missing_root() {
    let temp = assert_fs::TempDir::new().unwrap();

    let mut cmd = command();
    cmd.env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.child("config").path())
        .arg("scan")
        .arg(temp.child("does-not-exist").path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid root path"));
}

#[test]
fn scan_sort_by_path_orders_lexicographically() {
    let temp = assert_fs::TempDir::new().unwrap();
    make_vue_project(&temp, "dev/bravo");
    make_vue_project(&temp, "dev/alpha");

    let mut cmd = command();
    cmd.env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.child("config").path())
        .arg("scan")
        .arg("--all")
        .arg("--sort")
        .arg("path")
        .arg(temp.path());

    let assert = cmd.assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let alpha = stdout.find("~/dev/alpha").expect("alpha listed");
    let bravo = stdout.find("~/dev/bravo").expect("bravo listed");
    assert!(alpha < bravo, "expected alpha before bravo:\n{stdout}");
}

#[test]
fn version_flag_works() {
    let mut cmd = command();
    cmd.arg("--version");

    cmd.assert().success();
}
