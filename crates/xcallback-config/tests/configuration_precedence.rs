//! Precedence of configuration layers: defaults, file, environment and flags.

use std::cell::RefCell;
use std::ffi::OsString;
use std::fs;
use std::sync::{Mutex, MutexGuard, PoisonError};

use ortho_config::OrthoConfig;
use once_cell::sync::Lazy;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

use xcallback_config::{
    Config, ReturnLaunchPolicy, SchemeQueryPolicy, default_log_filter, default_log_format,
};

/// Environment variables the scenarios read or write.
const OVERRIDDEN_KEYS: &[&str] = &[
    "XCALLBACK_CONFIG_PATH",
    "XCALLBACK_SOURCE_APP",
    "XCALLBACK_SOURCE_APP_POLICY",
];

static ENV_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

struct Harness {
    temp_dir: TempDir,
    cli_args: RefCell<Vec<OsString>>,
    env_overrides: RefCell<Vec<(&'static str, Option<OsString>)>>,
    loaded: RefCell<Option<Config>>,
    error: RefCell<Option<String>>,
    _env_guard: MutexGuard<'static, ()>,
}

impl Harness {
    fn new() -> Self {
        let env_guard = ENV_MUTEX.lock().unwrap_or_else(PoisonError::into_inner);
        let temp_dir = match TempDir::new() {
            Ok(dir) => dir,
            Err(error) => panic!("failed to create temporary directory: {error}"),
        };
        let harness = Self {
            temp_dir,
            cli_args: RefCell::new(vec![OsString::from("xcallback")]),
            env_overrides: RefCell::new(Vec::new()),
            loaded: RefCell::new(None),
            error: RefCell::new(None),
            _env_guard: env_guard,
        };
        for key in OVERRIDDEN_KEYS {
            harness.override_env(key, None);
        }
        harness
    }

    fn write_config(&self, contents: &str) {
        let path = self.temp_dir.path().join("xcallback.toml");
        if let Err(error) = fs::write(&path, contents) {
            panic!("failed to write configuration: {error}");
        }

        let mut args = self.cli_args.borrow_mut();
        args.push(OsString::from("--config-path"));
        args.push(path.into_os_string());
    }

    fn override_env(&self, key: &'static str, value: Option<&str>) {
        let previous = std::env::var_os(key);
        // Environment mutation is `unsafe` in the 2024 edition. `ENV_MUTEX`
        // serialises the scenarios and `Drop` restores the previous values.
        match value {
            Some(text) => unsafe { std::env::set_var(key, text) },
            None => unsafe { std::env::remove_var(key) },
        }
        self.env_overrides.borrow_mut().push((key, previous));
    }

    fn push_cli_arg(&self, arg: impl Into<OsString>) {
        self.cli_args.borrow_mut().push(arg.into());
    }

    fn load(&self) {
        if self.loaded.borrow().is_some() || self.error.borrow().is_some() {
            return;
        }

        let args = self.cli_args.borrow().clone();
        match Config::load_from_iter(args) {
            Ok(config) => {
                *self.loaded.borrow_mut() = Some(config);
            }
            Err(error) => {
                *self.error.borrow_mut() = Some(error.to_string());
            }
        }
    }

    fn loaded_config(&self) -> Config {
        self.load();

        if let Some(error) = self.error.borrow().as_ref() {
            panic!("configuration failed to load: {error}");
        }

        match self.loaded.borrow().as_ref() {
            Some(config) => config.clone(),
            None => panic!("configuration was not loaded"),
        }
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        let overrides = self.env_overrides.get_mut();
        while let Some((key, value)) = overrides.pop() {
            match value {
                Some(os_value) => unsafe { std::env::set_var(key, os_value) },
                None => unsafe { std::env::remove_var(key) },
            }
        }
    }
}

#[fixture]
fn harness() -> Harness {
    Harness::new()
}

#[given("a configuration file setting the source application to \"{name}\"")]
fn given_configuration_file(harness: &Harness, name: String) {
    harness.write_config(&format!("source_app = \"{name}\"\nlog_format = \"compact\"\n"));
}

#[given("the environment overrides the source application to \"{name}\"")]
fn given_environment_override(harness: &Harness, name: String) {
    harness.override_env("XCALLBACK_SOURCE_APP", Some(&name));
}

#[given("the environment sets the source application policy to \"{policy}\"")]
fn given_environment_policy(harness: &Harness, policy: String) {
    harness.override_env("XCALLBACK_SOURCE_APP_POLICY", Some(&policy));
}

#[when("the CLI sets the source application to \"{name}\"")]
fn when_cli_override(harness: &Harness, name: String) {
    harness.push_cli_arg("--source-app");
    harness.push_cli_arg(name);
}

#[when("the configuration loads without overrides")]
fn when_load_without_overrides(harness: &Harness) {
    harness.load();
}

#[then("loading the configuration resolves the source application to \"{name}\"")]
fn then_resolved_source_app(harness: &Harness, name: String) {
    let config = harness.loaded_config();
    assert_eq!(config.source_app(), Some(name.as_str()));
    // Keys the winning layer leaves unset still come from the file.
    assert_eq!(config.log_format().to_string(), "compact");
}

#[then("loading the configuration applies the built-in defaults")]
fn then_defaults_applied(harness: &Harness) {
    let config = harness.loaded_config();
    assert_eq!(config.source_app(), None);
    assert_eq!(config.scheme_query(), SchemeQueryPolicy::Enabled);
    assert_eq!(config.return_launch(), ReturnLaunchPolicy::FireAndForget);
    assert!(!config.require_source_app());
    assert_eq!(config.log_filter(), default_log_filter());
    assert_eq!(config.log_format(), default_log_format());
}

#[then("loading the configuration requires a source application")]
fn then_source_app_required(harness: &Harness) {
    let config = harness.loaded_config();
    assert!(config.require_source_app());
    assert!(config.validate().is_ok());
}

#[scenario(
    path = "tests/features/configuration_precedence.feature",
    name = "Built-in defaults apply without overrides"
)]
fn defaults_without_overrides(#[from(harness)] harness: Harness) {
    drop(harness);
}

#[scenario(
    path = "tests/features/configuration_precedence.feature",
    name = "A configuration file sets the source application"
)]
fn file_sets_source_app(#[from(harness)] harness: Harness) {
    drop(harness);
}

#[scenario(
    path = "tests/features/configuration_precedence.feature",
    name = "The environment overrides the configuration file"
)]
fn environment_overrides_file(#[from(harness)] harness: Harness) {
    drop(harness);
}

#[scenario(
    path = "tests/features/configuration_precedence.feature",
    name = "Command-line flags override the environment and the file"
)]
fn flags_override_environment(#[from(harness)] harness: Harness) {
    drop(harness);
}

#[scenario(
    path = "tests/features/configuration_precedence.feature",
    name = "The environment can require inbound callers to identify themselves"
)]
fn environment_requires_source_app(#[from(harness)] harness: Harness) {
    drop(harness);
}
