//! E2E tests for the edit → persist → regenerate flow of the `cameko` CLI.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn state_dir(dir: &Path) -> PathBuf {
    dir.join("state")
}

fn cameko_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("cameko"));
    cmd.current_dir(dir);
    cmd.env("CAMEKO_STATE_DIR", state_dir(dir));
    cmd.env("CAMEKO_CONFIG", dir.join("config.toml"));
    cmd.env("CAMEKO_LOG", "error");
    cmd.env_remove("FORMAT");
    cmd.env_remove("RUST_BACKTRACE");
    cmd.env_remove("RUST_LIB_BACKTRACE");
    cmd
}

fn run_ok(dir: &Path, args: &[&str]) {
    let output = cameko_cmd(dir).args(args).output().expect("cameko should not crash");
    assert!(
        output.status.success(),
        "{args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

fn show_text(dir: &Path) -> String {
    let output = cameko_cmd(dir)
        .args(["show", "--format", "text"])
        .output()
        .expect("show should not crash");
    assert!(output.status.success());
    String::from_utf8(output.stdout).expect("utf8")
}

fn show_json(dir: &Path) -> Value {
    let output = cameko_cmd(dir)
        .args(["show", "--json"])
        .output()
        .expect("show should not crash");
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).expect("valid JSON")
}

/// The first JSON value in `bytes`; anything printed after it is ignored.
fn first_json(bytes: &[u8]) -> Value {
    serde_json::Deserializer::from_slice(bytes)
        .into_iter::<Value>()
        .next()
        .expect("a JSON value")
        .expect("valid JSON")
}

#[test]
fn fresh_form_renders_defaults() {
    let dir = TempDir::new().expect("tempdir");
    assert_eq!(show_text(dir.path()), "@ \n\n\n\n#イコラブ #イコラブ_カメコ\n");

    let json = show_json(dir.path());
    assert_eq!(json["state"]["selectedGroup"], "イコラブ");
    assert_eq!(json["state"]["dateFormat"], "YYYY/MM/DD");
    assert_eq!(json["state"]["useParenthesesForAccount"], true);
}

#[test]
fn basic_post_flow() {
    let dir = TempDir::new().expect("tempdir");
    let d = dir.path();
    run_ok(d, &["set", "date", "2025-07-10"]);
    run_ok(d, &["set", "title", "定期公演"]);
    run_ok(d, &["set", "venue", "銀河劇場"]);
    run_ok(d, &["member", "大谷 映美里", "佐々木 舞香"]);

    assert_eq!(
        show_text(d),
        "2025/07/10\n定期公演\n@ 銀河劇場\n\n\
         大谷 映美里 (@otani_emiri)さん\n\
         佐々木 舞香 (@sasaki_maika)さん\n\n\
         #イコラブ #イコラブ_カメコ\n"
    );
}

#[test]
fn mutating_commands_print_the_post() {
    let dir = TempDir::new().expect("tempdir");
    cameko_cmd(dir.path())
        .args(["set", "venue", "武道館"])
        .assert()
        .success()
        .stdout("@ 武道館\n\n\n\n#イコラブ #イコラブ_カメコ\n");
}

#[test]
fn member_hashtag_and_reverse_order() {
    let dir = TempDir::new().expect("tempdir");
    let d = dir.path();
    run_ok(d, &["group", "ノイミー"]);
    run_ok(d, &["member", "冨田 菜々風"]);
    run_ok(d, &["flag", "member-hashtag", "on"]);
    run_ok(d, &["flag", "reverse", "on"]);
    run_ok(d, &["set", "honorific", "ちゃん"]);
    run_ok(d, &["set", "hashtags", "かわいい 超絶イケメン"]);

    let text = show_text(d);
    assert!(text.contains("#冨田菜々風 ちゃん (@tomita_nanaka)\n"), "{text}");
    assert!(
        text.ends_with("\n#ノイミー #ノイミー_カメコ #かわいい #超絶イケメン\n"),
        "{text}"
    );
}

#[test]
fn flag_toggle_without_mode() {
    let dir = TempDir::new().expect("tempdir");
    let d = dir.path();
    run_ok(d, &["flag", "parentheses"]);
    assert_eq!(show_json(d)["state"]["useParenthesesForAccount"], false);
    run_ok(d, &["flag", "parentheses"]);
    assert_eq!(show_json(d)["state"]["useParenthesesForAccount"], true);
}

#[test]
fn switching_group_clears_members() {
    let dir = TempDir::new().expect("tempdir");
    let d = dir.path();
    run_ok(d, &["member", "大谷 映美里"]);
    assert_eq!(show_json(d)["state"]["selectedMembers"][0], "大谷 映美里");

    run_ok(d, &["group", "ニアジョイ"]);
    let json = show_json(d);
    assert_eq!(json["state"]["selectedGroup"], "ニアジョイ");
    assert_eq!(json["state"]["selectedMembers"], serde_json::json!([]));
    assert!(!json["text"].as_str().expect("text").contains("otani_emiri"));
}

#[test]
fn unknown_group_is_rejected_with_choices() {
    let dir = TempDir::new().expect("tempdir");
    cameko_cmd(dir.path())
        .args(["group", "存在しない"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("存在しない"))
        .stderr(predicate::str::contains("known groups: イコラブ, ノイミー"));

    assert_eq!(show_json(dir.path())["state"]["selectedGroup"], "イコラブ");
}

#[test]
fn unknown_member_is_rejected_with_json_error() {
    let dir = TempDir::new().expect("tempdir");
    let output = cameko_cmd(dir.path())
        .args(["member", "冨田 菜々風", "--json"])
        .output()
        .expect("member should not crash");
    assert!(!output.status.success());

    let err = first_json(&output.stderr);
    assert_eq!(err["error"]["error_code"], "E2002");
    assert!(
        err["error"]["suggestion"]
            .as_str()
            .expect("suggestion")
            .starts_with("members of イコラブ: ")
    );
}

#[test]
fn json_error_parses_with_backtraces_enabled() {
    let dir = TempDir::new().expect("tempdir");
    let output = cameko_cmd(dir.path())
        .env("RUST_BACKTRACE", "1")
        .args(["group", "存在しない", "--json"])
        .output()
        .expect("group should not crash");
    assert!(!output.status.success());

    let err = first_json(&output.stderr);
    assert_eq!(err["error"]["error_code"], "E2001");
}

#[test]
fn state_is_saved_as_camel_case_json() {
    let dir = TempDir::new().expect("tempdir");
    run_ok(dir.path(), &["set", "title", "定期公演"]);

    let path = state_dir(dir.path()).join("idolPostGenerator.json");
    let saved: Value = serde_json::from_str(&fs::read_to_string(path).expect("state file"))
        .expect("valid state JSON");
    assert_eq!(saved["eventTitle"], "定期公演");
    assert_eq!(saved["selectedGroup"], "イコラブ");
}

#[test]
fn malformed_state_falls_back_to_defaults() {
    let dir = TempDir::new().expect("tempdir");
    let state = state_dir(dir.path());
    fs::create_dir_all(&state).expect("mkdir");
    fs::write(state.join("idolPostGenerator.json"), "{not json").expect("write");

    let json = show_json(dir.path());
    assert_eq!(json["state"]["selectedGroup"], "イコラブ");
    assert_eq!(json["state"]["eventTitle"], "");
}

#[test]
fn legacy_field_names_are_read() {
    let dir = TempDir::new().expect("tempdir");
    let state = state_dir(dir.path());
    fs::create_dir_all(&state).expect("mkdir");
    fs::write(
        state.join("idolPostGenerator.json"),
        r#"{"liveTitle": "旧公演", "group": "ルトミ"}"#,
    )
    .expect("write");

    let json = show_json(dir.path());
    assert_eq!(json["state"]["eventTitle"], "旧公演");
    assert_eq!(json["state"]["honorific"], "さん");
    // ルトミ has no photographer tag.
    assert!(json["text"].as_str().expect("text").ends_with("\n#ルトミ"));
}

#[test]
fn reset_deletes_saved_form() {
    let dir = TempDir::new().expect("tempdir");
    run_ok(dir.path(), &["set", "title", "x"]);
    let path = state_dir(dir.path()).join("idolPostGenerator.json");
    assert!(path.is_file());

    run_ok(dir.path(), &["reset"]);
    assert!(!path.exists());
    assert_eq!(show_json(dir.path())["state"]["eventTitle"], "");
}

#[test]
fn post_print_url_encodes_text() {
    let dir = TempDir::new().expect("tempdir");
    run_ok(dir.path(), &["set", "venue", "Budokan"]);

    cameko_cmd(dir.path())
        .args(["post", "--print-url"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "https://x.com/intent/post?text=%40%20Budokan%0A%0A%0A%0A%23",
        ));
}

#[test]
fn print_url_sends_no_analytics_event() {
    let dir = TempDir::new().expect("tempdir");
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    listener.set_nonblocking(true).expect("nonblocking");
    let port = listener.local_addr().expect("addr").port();
    fs::write(
        dir.path().join("config.toml"),
        format!("[analytics]\nenabled = true\nendpoint = \"http://127.0.0.1:{port}/collect\"\n"),
    )
    .expect("write config");

    run_ok(dir.path(), &["post", "--print-url"]);
    let err = listener.accept().expect_err("no beacon for --print-url");
    assert_eq!(err.kind(), ErrorKind::WouldBlock);

    // A real edit does reach the endpoint.
    run_ok(dir.path(), &["group", "ノイミー"]);
    assert!(listener.accept().is_ok());
}

#[test]
fn compose_base_url_comes_from_config() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(
        dir.path().join("config.toml"),
        "[compose]\nbase_url = \"https://twitter.com/intent/tweet?lang=ja\"\n",
    )
    .expect("write config");

    cameko_cmd(dir.path())
        .args(["post", "--print-url"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "https://twitter.com/intent/tweet?lang=ja&text=",
        ));
}

#[test]
fn custom_roster_from_config() {
    let dir = TempDir::new().expect("tempdir");
    let roster = dir.path().join("roster.toml");
    fs::write(
        &roster,
        "[[groups]]\nname = \"テスト\"\ncameko_hashtag = false\n\n\
         [[groups.members]]\nname = \"山田 花子\"\naccount = \"hanako\"\n",
    )
    .expect("write roster");
    fs::write(
        dir.path().join("config.toml"),
        format!("[directory]\npath = {:?}\n", roster.display().to_string()),
    )
    .expect("write config");

    cameko_cmd(dir.path())
        .args(["groups"])
        .assert()
        .success()
        .stdout("テスト\n");

    run_ok(dir.path(), &["group", "テスト"]);
    cameko_cmd(dir.path())
        .args(["member", "山田 花子"])
        .assert()
        .success()
        .stdout(predicate::str::contains("山田 花子 (@hanako)さん\n\n#テスト\n"));
}

#[test]
fn broken_config_is_reported() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("config.toml"), "[compose\n").expect("write config");

    cameko_cmd(dir.path())
        .args(["show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn members_lists_accounts() {
    let dir = TempDir::new().expect("tempdir");
    cameko_cmd(dir.path())
        .args(["members", "ノイミー"])
        .assert()
        .success()
        .stdout(predicate::str::contains("冨田 菜々風\t@tomita_nanaka\n"));
}

#[test]
fn config_show_reports_state_dir() {
    let dir = TempDir::new().expect("tempdir");
    let output = cameko_cmd(dir.path())
        .args(["config", "show", "--json"])
        .output()
        .expect("config show should not crash");
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(
        json["state_dir"],
        state_dir(dir.path()).display().to_string()
    );
    assert_eq!(json["user"]["compose"]["base_url"], "https://x.com/intent/post");
}

#[test]
fn completions_generate() {
    let dir = TempDir::new().expect("tempdir");
    cameko_cmd(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cameko"));
}
