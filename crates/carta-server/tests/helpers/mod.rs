//! Test helpers para carta-server.

#![allow(dead_code, unused_imports)]

pub mod client;

pub use client::{TestClient, TestResponse, catalog_app, client, prometheus_handle};
