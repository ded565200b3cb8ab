use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// A directory with two media files and one text file. Commands run inside it
/// so relative paths land in `data-src` verbatim.
fn workdir() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("a.jpg"), b"jpeg").unwrap();
    fs::write(tmp.path().join("b.mp4"), b"mp4").unwrap();
    fs::write(tmp.path().join("notes.txt"), b"text").unwrap();
    fs::create_dir_all(tmp.path().join("nested")).unwrap();
    fs::write(tmp.path().join("nested/c.png"), b"png").unwrap();
    tmp
}

fn stdout_of(cmd: &mut assert_cmd::Command) -> String {
    let out = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(out).unwrap()
}

#[test]
fn static_prints_page_with_host_paths() {
    let tmp = workdir();
    let mut cmd = cargo_bin_cmd!("quick-gallery");
    cmd.current_dir(tmp.path())
        .env_remove("RUST_LOG")
        .args(["static", "a.jpg", "notes.txt", "b.mp4"]);
    let html = stdout_of(&mut cmd);

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains(r#"data-src="a.jpg" data-mimetype="image/jpeg""#));
    assert!(html.contains(r#"data-src="b.mp4" data-mimetype="video/mp4""#));
    assert!(!html.contains("notes.txt"));
}

#[test]
fn static_summary_goes_to_stderr() {
    let tmp = workdir();
    cargo_bin_cmd!("quick-gallery")
        .current_dir(tmp.path())
        .env_remove("RUST_LOG")
        .args(["static", "a.jpg", "notes.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SimpleGallery: 1 of 2").not())
        .stderr(predicate::str::contains(
            "SimpleGallery: 1 of 2 files rendered (1 skipped)",
        ));
}

#[test]
fn static_writes_output_file() {
    let tmp = workdir();
    cargo_bin_cmd!("quick-gallery")
        .current_dir(tmp.path())
        .args(["static", "--output", "gallery.html", "a.jpg"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let html = fs::read_to_string(tmp.path().join("gallery.html")).unwrap();
    assert!(html.contains(r#"data-src="a.jpg""#));
}

#[test]
fn static_reads_paths_from_stdin() {
    let tmp = workdir();
    let mut cmd = cargo_bin_cmd!("quick-gallery");
    cmd.current_dir(tmp.path())
        .args(["static", "-"])
        .write_stdin("b.mp4\n\na.jpg\n");
    let html = stdout_of(&mut cmd);

    let b = html.find(r#"data-src="b.mp4""#).unwrap();
    let a = html.find(r#"data-src="a.jpg""#).unwrap();
    assert!(b < a);
}

#[test]
fn directories_need_recursive() {
    let tmp = workdir();
    let mut flat = cargo_bin_cmd!("quick-gallery");
    flat.current_dir(tmp.path()).args(["static", "nested"]);
    assert!(!stdout_of(&mut flat).contains("c.png"));

    let mut deep = cargo_bin_cmd!("quick-gallery");
    deep.current_dir(tmp.path())
        .args(["static", "--recursive", "nested"]);
    assert!(stdout_of(&mut deep).contains("c.png"));
}

#[test]
fn tag_gallery_by_name() {
    let tmp = workdir();
    fs::write(tmp.path().join("a-x.tags"), "Sunset\n").unwrap();
    let mut cmd = cargo_bin_cmd!("quick-gallery");
    cmd.current_dir(tmp.path())
        .args(["static", "--gallery", "taggallery", "a.jpg"]);
    let html = stdout_of(&mut cmd);
    assert!(html.contains(r#"data-tags="image,sunset""#));
}

#[test]
fn unknown_gallery_is_rejected() {
    let tmp = workdir();
    cargo_bin_cmd!("quick-gallery")
        .current_dir(tmp.path())
        .args(["static", "--gallery", "Carousel", "a.jpg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown gallery"));
}

#[test]
fn debug_and_silent_conflict() {
    let tmp = workdir();
    cargo_bin_cmd!("quick-gallery")
        .current_dir(tmp.path())
        .args(["--debug", "--silent", "static", "a.jpg"])
        .assert()
        .failure();
}

#[test]
fn silent_keeps_stderr_quiet() {
    let tmp = workdir();
    cargo_bin_cmd!("quick-gallery")
        .current_dir(tmp.path())
        .env_remove("RUST_LOG")
        .args(["--silent", "static", "a.jpg", "notes.txt"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn config_file_in_working_dir_applies() {
    let tmp = workdir();
    fs::write(
        tmp.path().join("quick-gallery.toml"),
        "[gallery]\ntitle = \"Holiday\"\nslideshow_delay = 9\n",
    )
    .unwrap();
    let mut cmd = cargo_bin_cmd!("quick-gallery");
    cmd.current_dir(tmp.path()).args(["static", "a.jpg"]);
    let html = stdout_of(&mut cmd);
    assert!(html.contains("<title>Holiday</title>"));
    assert!(html.contains(r#"value="9""#));
}

#[test]
fn cli_gallery_flag_beats_config_file() {
    let tmp = workdir();
    fs::write(
        tmp.path().join("quick-gallery.toml"),
        "[gallery]\nvariant = \"TagGallery\"\n",
    )
    .unwrap();
    let mut cmd = cargo_bin_cmd!("quick-gallery");
    cmd.current_dir(tmp.path())
        .args(["static", "--gallery", "SimpleGallery", "a.jpg"]);
    assert!(!stdout_of(&mut cmd).contains("tag-filter"));
}

#[test]
fn invalid_config_fails() {
    let tmp = workdir();
    fs::write(tmp.path().join("quick-gallery.toml"), "[gallery]\nfoo = 1\n").unwrap();
    cargo_bin_cmd!("quick-gallery")
        .current_dir(tmp.path())
        .args(["static", "a.jpg"])
        .assert()
        .failure();
}

#[test]
fn gen_config_prints_stock_config() {
    cargo_bin_cmd!("quick-gallery")
        .arg("gen-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("[gallery]"))
        .stdout(predicate::str::contains("[server]"))
        .stdout(predicate::str::contains("workers = 4"));
}

#[test]
fn help_lists_commands() {
    cargo_bin_cmd!("quick-gallery")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("static"))
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("gen-config"));
}

#[test]
fn gallery_from_environment() {
    let tmp = workdir();
    let mut cmd = cargo_bin_cmd!("quick-gallery");
    cmd.current_dir(tmp.path())
        .env("QUICK_GALLERY_GALLERY", "TagGallery")
        .args(["static", "a.jpg"]);
    assert!(stdout_of(&mut cmd).contains(r#"id="tag-filter""#));
}

#[test]
fn gallery_flag_beats_environment() {
    let tmp = workdir();
    let mut cmd = cargo_bin_cmd!("quick-gallery");
    cmd.current_dir(tmp.path())
        .env("QUICK_GALLERY_GALLERY", "TagGallery")
        .args(["static", "--gallery", "SimpleGallery", "a.jpg"]);
    assert!(!stdout_of(&mut cmd).contains("tag-filter"));
}

#[test]
fn environment_beats_config_file() {
    let tmp = workdir();
    fs::write(
        tmp.path().join("quick-gallery.toml"),
        "[gallery]\nvariant = \"SimpleGallery\"\n",
    )
    .unwrap();
    let mut cmd = cargo_bin_cmd!("quick-gallery");
    cmd.current_dir(tmp.path())
        .env("QUICK_GALLERY_GALLERY", "taggallery")
        .args(["static", "a.jpg"]);
    assert!(stdout_of(&mut cmd).contains("tag-filter"));
}

#[test]
fn recursive_from_environment() {
    let tmp = workdir();
    let mut on = cargo_bin_cmd!("quick-gallery");
    on.current_dir(tmp.path())
        .env("QUICK_GALLERY_RECURSIVE", "true")
        .args(["static", "nested"]);
    assert!(stdout_of(&mut on).contains("c.png"));

    let mut off = cargo_bin_cmd!("quick-gallery");
    off.current_dir(tmp.path())
        .env("QUICK_GALLERY_RECURSIVE", "0")
        .args(["static", "nested"]);
    assert!(!stdout_of(&mut off).contains("c.png"));
}

#[test]
fn static_paths_are_percent_encoded() {
    let tmp = workdir();
    fs::create_dir_all(tmp.path().join("my photos")).unwrap();
    fs::write(tmp.path().join("my photos/#1 100%.jpg"), b"jpeg").unwrap();
    let mut cmd = cargo_bin_cmd!("quick-gallery");
    cmd.current_dir(tmp.path())
        .args(["static", "my photos/#1 100%.jpg"]);
    let html = stdout_of(&mut cmd);
    assert!(html.contains(r#"data-src="my%20photos/%231%20100%25.jpg""#));
}
