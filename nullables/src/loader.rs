//! Nullable payload loader — payload bytes are the reference itself.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;
use witness_gateway::{GatewayError, Payload, PayloadLoader};
use witness_types::PendingPhoto;

pub struct NullLoader {
    missing: Mutex<HashSet<String>>,
    loaded: Mutex<Vec<String>>,
}

impl NullLoader {
    pub fn new() -> Self {
        Self {
            missing: Mutex::new(HashSet::new()),
            loaded: Mutex::new(Vec::new()),
        }
    }

    /// Make loading `reference` fail as if the file had vanished.
    pub fn mark_missing(&self, reference: &str) {
        self.missing.lock().unwrap().insert(reference.to_string());
    }

    /// References loaded successfully, in order.
    pub fn loaded(&self) -> Vec<String> {
        self.loaded.lock().unwrap().clone()
    }
}

impl Default for NullLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PayloadLoader for NullLoader {
    async fn load(&self, photo: &PendingPhoto) -> Result<Payload, GatewayError> {
        if self.missing.lock().unwrap().contains(&photo.reference) {
            return Err(GatewayError::Payload {
                reference: photo.reference.clone(),
                reason: "no such file".into(),
            });
        }
        self.loaded.lock().unwrap().push(photo.reference.clone());
        Ok(Payload {
            bytes: photo.reference.as_bytes().to_vec(),
            mime_type: photo.content_type.clone(),
            file_name: photo.reference.clone(),
        })
    }
}
