use super::*;
use serial_test::serial;
use std::net::Ipv4Addr;

const ALL_VARS: [&str; 7] = [
    ENV_STORAGE_TYPE,
    ENV_STORAGE_ADDR,
    ENV_STORAGE_USER,
    ENV_STORAGE_PASSWORD,
    ENV_HOST,
    ENV_PORT,
    ENV_TIMEOUT_SECS,
];

fn clear_env() {
    for var in ALL_VARS {
        unsafe {
            env::remove_var(var);
        }
    }
}

#[test]
fn test_config_defaults() {
    let config = Config::default();
    assert_eq!(config.storage.kind, "sqlite");
    assert_eq!(config.storage.addr, "./db.sqlite");
    assert_eq!(config.host, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    assert_eq!(config.port, 8443);
    assert_eq!(config.timeout, Duration::from_secs(10));
    assert_eq!(config.bind_addr(), "0.0.0.0:8443");
}

#[test]
#[serial]
fn test_config_new_without_env_matches_defaults() {
    clear_env();
    assert_eq!(Config::new(), Config::default());
}

#[test]
#[serial]
fn test_config_new_respects_env_vars() {
    clear_env();
    unsafe {
        env::set_var(ENV_STORAGE_TYPE, "surrealdb");
        env::set_var(ENV_STORAGE_ADDR, "ws://db.internal:8000");
        env::set_var(ENV_STORAGE_USER, "root");
        env::set_var(ENV_STORAGE_PASSWORD, "secret");
        env::set_var(ENV_HOST, "127.0.0.1");
        env::set_var(ENV_PORT, "9000");
        env::set_var(ENV_TIMEOUT_SECS, "3");
    }

    let config = Config::new();
    assert_eq!(config.storage.kind, "surrealdb");
    assert_eq!(config.storage.addr, "ws://db.internal:8000");
    assert_eq!(config.storage.username.as_deref(), Some("root"));
    assert_eq!(config.storage.password.as_deref(), Some("secret"));
    assert_eq!(config.host, IpAddr::V4(Ipv4Addr::LOCALHOST));
    assert_eq!(config.port, 9000);
    assert_eq!(config.timeout, Duration::from_secs(3));

    let options = config.connect_options();
    assert_eq!(options.timeout, Duration::from_secs(3));
    assert_eq!(options.username.as_deref(), Some("root"));
    assert_eq!(options.password.as_deref(), Some("secret"));

    clear_env();
}

#[test]
#[serial]
fn test_config_unparseable_env_falls_back_to_defaults() {
    clear_env();
    unsafe {
        env::set_var(ENV_HOST, "not-an-ip");
        env::set_var(ENV_PORT, "99999");
        env::set_var(ENV_TIMEOUT_SECS, "soon");
    }

    let config = Config::new();
    assert_eq!(config.host, Config::default().host);
    assert_eq!(config.port, 8443);
    assert_eq!(config.timeout, Duration::from_secs(10));

    clear_env();
}

#[test]
#[serial]
fn test_config_precedence_cli_over_env() {
    clear_env();
    unsafe {
        env::set_var(ENV_PORT, "9000");
        env::set_var(ENV_STORAGE_ADDR, "/tmp/from-env.sqlite");
    }

    let config = Config::new()
        .with_port(7000)
        .with_storage_addr(":memory:")
        .with_timeout(Duration::from_secs(1));

    assert_eq!(config.port, 7000, "CLI flag should override env var");
    assert_eq!(config.storage.addr, ":memory:");
    assert_eq!(config.timeout, Duration::from_secs(1));

    clear_env();
}

#[test]
fn test_connect_options_need_both_credentials() {
    let mut config = Config::default();
    config.storage.username = Some("root".into());

    let options = config.connect_options();
    assert_eq!(options.username, None);
    assert_eq!(options.password, None);
    assert_eq!(options.timeout, config.timeout);
}
