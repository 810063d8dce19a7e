//! Shared utilities for integration tests.

use std::path::PathBuf;

/// Read a captured response from `tests/testdata`.
pub fn fixture(name: &str) -> Vec<u8> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("testdata")
        .join(name);
    std::fs::read(&path).unwrap_or_else(|e| panic!("failed to load fixture {:?}: {}", path, e))
}

/// The unicorn API used across tests, one route per operation.
#[allow(dead_code)]
pub fn unicorn_routes() -> Vec<raw_mock::Route> {
    use raw_mock::Route;

    vec![
        Route::new("POST", "/unicorns", fixture("post_unicorn.txt")),
        Route::new("GET", "/unicorns", fixture("get_unicorns.txt")),
        Route::new("GET", "/unicorns/{id}", fixture("get_unicorn.txt")),
        Route::new("PUT", "/unicorns/{id}", fixture("put_unicorn.txt")),
        Route::new("DELETE", "/unicorns/{id}", fixture("delete_unicorn.txt")),
    ]
}

/// Client that never goes through a system proxy and never reuses connections.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .pool_max_idle_per_host(0)
        .build()
        .unwrap()
}
