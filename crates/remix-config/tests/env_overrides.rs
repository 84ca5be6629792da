//! Environment variable handling.
//!
//! Every test runs inside a `figment::Jail`, which serializes access to the
//! process environment and working directory.

use figment::Jail;
use remix_config::{load_config, resolve_root};
use std::path::PathBuf;

#[test]
fn env_overrides_file_values() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "remix.config.toml",
            r#"
devServerPort = 3000
publicPath = "/static/"
"#,
        )?;
        jail.set_env("REMIX_DEV_SERVER_PORT", "9000");

        let config = load_config(jail.directory()).unwrap();
        assert_eq!(config.dev_server_port, 9000);
        assert_eq!(config.public_path, "/static/");
        Ok(())
    });
}

#[test]
fn env_sets_directories() {
    Jail::expect_with(|jail| {
        jail.create_file("remix.config.toml", "")?;
        jail.set_env("REMIX_SERVER_BUILD_DIRECTORY", "dist/server");

        let config = load_config(jail.directory()).unwrap();
        assert_eq!(config.server_build_directory, PathBuf::from("dist/server"));
        Ok(())
    });
}

#[test]
fn root_comes_from_env_when_not_overridden() {
    Jail::expect_with(|jail| {
        let project = jail.directory().join("project");
        std::fs::create_dir_all(&project).unwrap();
        jail.set_env("REMIX_ROOT", project.display());

        assert_eq!(resolve_root(None).unwrap(), project);
        Ok(())
    });
}

#[test]
fn root_defaults_to_current_directory() {
    Jail::expect_with(|_jail| {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(resolve_root(None).unwrap(), cwd);
        assert_eq!(resolve_root(Some("nested".as_ref())).unwrap(), cwd.join("nested"));
        Ok(())
    });
}
