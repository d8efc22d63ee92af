//! Runtime Configuration
//!
//! Reads backend credentials from the page. Sources, highest priority first:
//! the `window.__CAPITAL_TRACKER_CONFIG__` object, the `SUPABASE_URL` /
//! `SUPABASE_ANON_KEY` / `GEMINI_API_KEY` window globals, then values baked
//! in at build time.

use capital_core::BackendConfig;
use wasm_bindgen::JsValue;

const CONFIG_GLOBAL: &str = "__CAPITAL_TRACKER_CONFIG__";

pub fn load_backend_config() -> BackendConfig {
    let config = config_object()
        .unwrap_or_default()
        .or(window_globals())
        .or(build_time());
    log::info!("Backend configuration: {:?}", config);
    config
}

fn config_object() -> Option<BackendConfig> {
    let value = window_value(CONFIG_GLOBAL)?;
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| log::warn!("Ignoring malformed {}: {}", CONFIG_GLOBAL, e))
        .ok()
}

fn window_globals() -> BackendConfig {
    let string = |name| window_value(name).and_then(|v| v.as_string());
    BackendConfig {
        supabase_url: string("SUPABASE_URL"),
        supabase_anon_key: string("SUPABASE_ANON_KEY"),
        gemini_api_key: string("GEMINI_API_KEY"),
    }
}

fn build_time() -> BackendConfig {
    BackendConfig {
        supabase_url: option_env!("SUPABASE_URL").map(String::from),
        supabase_anon_key: option_env!("SUPABASE_ANON_KEY").map(String::from),
        gemini_api_key: option_env!("GEMINI_API_KEY").map(String::from),
    }
}

fn window_value(name: &str) -> Option<JsValue> {
    let window = web_sys::window()?;
    js_sys::Reflect::get(&window, &JsValue::from_str(name))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}
