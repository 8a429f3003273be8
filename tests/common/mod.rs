#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

use gripe::auth::create_jwt;
use gripe::identity::inmem::InMemIdentityProvider;
use gripe::routes::AppState;
use gripe::storage::{ObjectStore, ObjectStoreError};
use gripe::store::inmem::InMemStore;
use gripe::store::RecordStore;

/// Guarantees a sufficiently long secret for token issuance in tests.
pub fn setup_env() {
    std::env::set_var("JWT_SECRET", "test-secret-must-be-32-bytes-long!!");
}

// ---------------- in-memory mock object store ----------------

pub const MOCK_URL_BASE: &str = "https://cdn.test/complaints/";

#[derive(Default)]
pub struct MockObjects {
    pub inner: Mutex<HashMap<String, (Vec<u8>, String)>>,
}

#[async_trait]
impl ObjectStore for MockObjects {
    async fn put(&self, name: &str, mime: &str, bytes: &[u8]) -> Result<String, ObjectStoreError> {
        let mut map = self.inner.lock().unwrap();
        if map.contains_key(name) {
            return Err(ObjectStoreError::Collision);
        }
        map.insert(name.to_string(), (bytes.to_vec(), mime.to_string()));
        Ok(format!("{MOCK_URL_BASE}{name}"))
    }

    async fn delete(&self, name: &str) -> Result<(), ObjectStoreError> {
        self.inner.lock().unwrap().remove(name);
        Ok(())
    }

    fn name_from_url(&self, url: &str) -> Option<String> {
        url.strip_prefix(MOCK_URL_BASE).map(str::to_owned)
    }
}

impl MockObjects {
    pub fn object_count(&self) -> usize {
        self.inner.lock().unwrap().len()
    }
}

// ---------------- application state wiring ----------------

pub struct TestBackend {
    pub store: Arc<InMemStore>,
    pub identity: Arc<InMemIdentityProvider>,
    pub objects: Arc<MockObjects>,
}

pub fn backend() -> (TestBackend, AppState) {
    setup_env();
    let store = Arc::new(InMemStore::new());
    let identity = Arc::new(InMemIdentityProvider::new());
    let objects = Arc::new(MockObjects::default());
    let state = AppState {
        store: store.clone() as Arc<dyn RecordStore>,
        identity: identity.clone() as Arc<dyn gripe::identity::IdentityProvider>,
        objects: objects.clone() as Arc<dyn ObjectStore>,
        rate_limiter: None,
    };
    (TestBackend { store, identity, objects }, state)
}

pub fn user_token(id: &str) -> String {
    create_jwt(id, "user@example.com", "User", false).unwrap()
}

pub fn admin_token(id: &str) -> String {
    create_jwt(id, "admin@example.com", "Admin", true).unwrap()
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

// ---------------- multipart body builder ----------------

pub struct MultipartBuilder {
    boundary: &'static str,
    body: Vec<u8>,
}

impl MultipartBuilder {
    pub fn new() -> Self {
        Self { boundary: "BOUNDARY123", body: Vec::new() }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                self.boundary, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                self.boundary, name, filename
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn build(mut self) -> (String, Vec<u8>) {
        self.body.extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        (format!("multipart/form-data; boundary={}", self.boundary), self.body)
    }
}

/// Solid-color PNG of the given dimensions.
pub fn png_bytes(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(w, h, image::Rgb([40, 90, 160]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}
