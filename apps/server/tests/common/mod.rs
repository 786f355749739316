#![allow(dead_code)]

use std::path::Path;

use ysws_notifier_server::config::Config;

pub const TEST_PUBLIC_KEY: &str =
    "BHovjLR8gdp0daLCT6Ab0NoN-119msmoDviGtRudvNly4KWQE0fm3O2fhc55ZrMwhrkZQEOC344344iAfDjQ37I";
pub const TEST_PRIVATE_KEY: &str = "Hy49TFtqeYgBI0VniavN7_7cuph2VDIQChssPU5fYHE";

pub fn test_config(data_dir: &Path) -> Config {
    let data_path = data_dir.join("store.json");
    let data_path = data_path.to_string_lossy().to_string();
    Config::from_lookup(|key| {
        match key {
            "VAPID_PUBLIC_KEY" => Some(TEST_PUBLIC_KEY),
            "VAPID_PRIVATE_KEY" => Some(TEST_PRIVATE_KEY),
            "VAPID_SUBJECT" => Some("mailto:notifications@example.com"),
            "CATALOG_URL" => Some("http://127.0.0.1:9/programs"),
            "NOTIFIER_DATA_PATH" => Some(data_path.as_str()),
            _ => None,
        }
        .map(str::to_string)
    })
    .unwrap()
}

pub fn subscription_json(endpoint: &str) -> serde_json::Value {
    serde_json::json!({
        "endpoint": endpoint,
        "expirationTime": null,
        "keys": {
            "p256dh": "BNcRdreALRFXTkOOUHK1EtK2wtaz5Ry4YfYCA_0QTpQtUbVlUls0VJXg7A8u-Ts1XbjhazAkj7I99e8QcYP7DkM",
            "auth": "tBHItJI5svbpez7KI4CCXg"
        }
    })
}
