//! Durable key/value storage for client state.
//!
//! - Web: `localStorage`
//! - Desktop: one JSON file per key in the platform config directory
//!   (`~/.config/storefront/` on Linux, `~/Library/Application Support/storefront/`
//!   on macOS, `%APPDATA%\storefront\` on Windows)

use serde::{de::DeserializeOwned, Serialize};

/// Serialize `value` under `key`. Returns `true` on success.
pub fn save<T: Serialize>(key: &str, value: &T) -> bool {
    match serde_json::to_string(value) {
        Ok(json) => save_raw(key, &json),
        Err(_) => false,
    }
}

/// Load `key`, or `None` if it is missing or no longer deserializes.
pub fn load<T: DeserializeOwned>(key: &str) -> Option<T> {
    let json = load_raw(key)?;
    serde_json::from_str(&json).ok()
}

pub fn remove(key: &str) {
    remove_raw(key);
}

// =========================================
// Web (WASM)
// =========================================

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

#[cfg(target_arch = "wasm32")]
fn save_raw(key: &str, value: &str) -> bool {
    local_storage().is_some_and(|storage| storage.set_item(key, value).is_ok())
}

#[cfg(target_arch = "wasm32")]
fn load_raw(key: &str) -> Option<String> {
    local_storage()?.get_item(key).ok()?
}

#[cfg(target_arch = "wasm32")]
fn remove_raw(key: &str) {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(key);
    }
}

// =========================================
// Desktop (native)
// =========================================

#[cfg(not(target_arch = "wasm32"))]
fn file_path(key: &str) -> Option<std::path::PathBuf> {
    let dir = dirs::config_dir()?.join("storefront");
    if !dir.exists() {
        std::fs::create_dir_all(&dir).ok()?;
    }
    let safe_key = key.replace(['/', '\\', ':', '*', '?', '"', '<', '>', '|'], "_");
    Some(dir.join(format!("{safe_key}.json")))
}

#[cfg(not(target_arch = "wasm32"))]
fn save_raw(key: &str, value: &str) -> bool {
    file_path(key).is_some_and(|path| std::fs::write(path, value).is_ok())
}

#[cfg(not(target_arch = "wasm32"))]
fn load_raw(key: &str) -> Option<String> {
    std::fs::read_to_string(file_path(key)?).ok()
}

#[cfg(not(target_arch = "wasm32"))]
fn remove_raw(key: &str) {
    if let Some(path) = file_path(key) {
        let _ = std::fs::remove_file(path);
    }
}
