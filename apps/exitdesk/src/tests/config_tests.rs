use super::{load_settings_with, normalize_api_base, Settings};

use std::{
    collections::HashMap,
    env, fs,
    path::Path,
    time::{SystemTime, UNIX_EPOCH},
};

fn no_env(_: &str) -> Option<String> {
    None
}

fn temp_file(name: &str, contents: &str) -> std::path::PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = env::temp_dir().join(format!("exitdesk_config_test_{name}_{suffix}"));
    fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join("exitdesk.toml");
    fs::write(&path, contents).expect("write config");
    path
}

#[test]
fn missing_file_yields_defaults() {
    let settings = load_settings_with(Path::new("/definitely/not/here.toml"), no_env);
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.api_base, "http://127.0.0.1:8000/api");
    assert_eq!(settings.default_actor_role, "SRC");
}

#[test]
fn file_values_override_defaults() {
    let path = temp_file(
        "file",
        "api_base = \"https://exits.example.edu/api\"\nrequest_timeout_secs = 4\ndefault_actor_role = \"Dean\"\n",
    );
    let settings = load_settings_with(&path, no_env);
    assert_eq!(settings.api_base, "https://exits.example.edu/api");
    assert_eq!(settings.request_timeout_secs, 4);
    assert_eq!(settings.default_actor_role, "Dean");
    assert!(settings.admin_token.is_none());
    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn environment_overrides_file() {
    let path = temp_file("env", "api_base = \"https://file.example/api\"\n");
    let env: HashMap<&str, &str> = HashMap::from([
        ("EXITDESK_API_BASE", "https://legacy.example/api"),
        ("APP__API_BASE", "https://env.example/api"),
        ("APP__REQUEST_TIMEOUT_SECS", "30"),
        ("EXITDESK_ADMIN_TOKEN", "issued"),
    ]);
    let settings = load_settings_with(&path, |key| env.get(key).map(|v| v.to_string()));
    assert_eq!(settings.api_base, "https://env.example/api");
    assert_eq!(settings.request_timeout_secs, 30);
    assert_eq!(settings.admin_token.as_deref(), Some("issued"));
    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn malformed_values_are_ignored() {
    let path = temp_file("bad", "api_base = [1, 2\n");
    let settings = load_settings_with(&path, |key| {
        (key == "APP__REQUEST_TIMEOUT_SECS").then(|| "soon".to_string())
    });
    assert_eq!(settings, Settings::default());
    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn normalizes_api_base() {
    assert_eq!(
        normalize_api_base(" http://127.0.0.1:8000/api/ ").expect("valid"),
        "http://127.0.0.1:8000/api"
    );
    assert!(normalize_api_base("ftp://files.example/api").is_err());
    assert!(normalize_api_base("127.0.0.1:8000").is_err());
}

#[test]
fn timeout_never_zero() {
    let settings = Settings {
        request_timeout_secs: 0,
        ..Settings::default()
    };
    assert_eq!(settings.request_timeout().as_secs(), 1);
}
