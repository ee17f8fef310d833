//! Shared test utilities for integration tests

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use winring::platform::SimulatedBrowser;
use winring::store::MemoryKeyValueStore;
use winring::types::{WindowId, WindowKind};
use winring::WindowRing;

/// Global mutex to serialize XDG environment variable access across all tests
static XDG_ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Environment variable state to restore after test
struct EnvState {
    home: Option<String>,
    xdg_config_home: Option<String>,
    xdg_data_home: Option<String>,
}

impl EnvState {
    fn capture() -> Self {
        Self {
            home: std::env::var("HOME").ok(),
            xdg_config_home: std::env::var("XDG_CONFIG_HOME").ok(),
            xdg_data_home: std::env::var("XDG_DATA_HOME").ok(),
        }
    }

    fn restore(self) {
        for (name, value) in [
            ("HOME", self.home),
            ("XDG_CONFIG_HOME", self.xdg_config_home),
            ("XDG_DATA_HOME", self.xdg_data_home),
        ] {
            match value {
                Some(orig) => std::env::set_var(name, orig),
                None => std::env::remove_var(name),
            }
        }
    }
}

/// Run `f` with HOME, XDG_CONFIG_HOME and XDG_DATA_HOME pointed into
/// `test_dir`, restoring the original environment afterwards.
///
/// XDG_CONFIG_HOME is `test_dir` itself, so the global config file lives at
/// `test_dir/winring/config.toml`.
pub fn with_xdg_env<F, R>(test_dir: &TempDir, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = XDG_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let env_state = EnvState::capture();

    let test_config_home = test_dir.path().to_path_buf();
    let test_data_home = test_dir.path().join("data");
    let test_home = test_dir.path().join("home");

    std::fs::create_dir_all(&test_data_home).unwrap();
    std::fs::create_dir_all(&test_home).unwrap();

    std::env::set_var("HOME", test_home.to_str().unwrap());
    std::env::set_var("XDG_CONFIG_HOME", test_config_home.to_str().unwrap());
    std::env::set_var("XDG_DATA_HOME", test_data_home.to_str().unwrap());

    let result = f();

    env_state.restore();

    result
}

/// A simulated browser with one normal window per entry of `windows`, and a
/// ring over it backed by an in-memory store
pub fn simulated_ring(
    windows: &[&[&str]],
    settle_delay: Duration,
) -> (Arc<SimulatedBrowser>, WindowRing, Vec<WindowId>) {
    let browser = Arc::new(SimulatedBrowser::new());
    let ids = windows
        .iter()
        .map(|titles| browser.open_window(WindowKind::Normal, titles))
        .collect();
    let ring = WindowRing::new(
        browser.clone(),
        Arc::new(MemoryKeyValueStore::new()),
        settle_delay,
    );
    (browser, ring, ids)
}
