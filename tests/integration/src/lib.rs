//! Shared fixtures for end-to-end binding scenarios.

use std::{path::PathBuf, sync::Arc};

use tempfile::TempDir;
use vrc_bind_api::{VrcApiClient, VrcApiConfig};
use vrc_bind_runtime::{BindingRuntime, UserStore};

/// A runtime wired to a real HTTP client and a store inside a temp dir.
pub struct IsolatedRuntime {
    pub runtime: BindingRuntime,
    pub store_path: PathBuf,
    _root: TempDir,
}

impl IsolatedRuntime {
    pub fn new(api_base: &str) -> Self {
        let root = tempfile::tempdir().expect("tempdir");
        let store_path = root.path().join("usr_data.json");
        Self {
            runtime: Self::runtime_for(api_base, &store_path),
            store_path,
            _root: root,
        }
    }

    /// Builds a second runtime over the same store file, as after a restart.
    pub fn restart(&self, api_base: &str) -> BindingRuntime {
        Self::runtime_for(api_base, &self.store_path)
    }

    fn runtime_for(api_base: &str, store_path: &std::path::Path) -> BindingRuntime {
        let client = VrcApiClient::new(VrcApiConfig {
            api_base: api_base.to_string(),
            user_agent: "vrc-bind-integration/1.0".to_string(),
            request_timeout_ms: 5_000,
        })
        .expect("vrchat client");
        let store = UserStore::load(store_path.to_path_buf()).expect("user store");
        BindingRuntime::new(Arc::new(client), store)
    }

    pub fn persisted_json(&self) -> serde_json::Value {
        let raw = std::fs::read_to_string(&self.store_path).expect("store file");
        serde_json::from_str(&raw).expect("store json")
    }
}
