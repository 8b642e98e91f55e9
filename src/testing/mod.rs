//! In-memory stand-ins for the database and image host.
//!
//! Both record every call so tests can assert not only the response but
//! also how many statements ran and which images were touched.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::auth::{AuthKeys, Claims};
use crate::database::{Database, DatabaseError, Row};
use crate::images::{ImageError, ImageHost, UploadFile, UploadedImage};
use crate::state::AppState;

pub const TEST_SECRET: &str = "golf-classic-test-secret";

/// One statement received by [`MockDatabase`]
#[derive(Debug, Clone)]
pub struct ExecutedStatement {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Answers statements from a scripted queue, in order.
///
/// A statement arriving after the script is exhausted fails with a
/// query error, so an unexpected extra round trip surfaces as a 500.
#[derive(Default)]
pub struct MockDatabase {
    responses: Mutex<VecDeque<Result<Vec<Row>, DatabaseError>>>,
    executed: Mutex<Vec<ExecutedStatement>>,
}

impl MockDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next statement returns these rows. Non-object values are dropped.
    pub fn returning(self, rows: Vec<Value>) -> Self {
        let rows = rows
            .into_iter()
            .filter_map(|row| match row {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect();
        self.push(Ok(rows))
    }

    /// Next statement returns no rows
    pub fn empty(self) -> Self {
        self.push(Ok(Vec::new()))
    }

    /// Next statement fails with `error`
    pub fn failing(self, error: DatabaseError) -> Self {
        self.push(Err(error))
    }

    fn push(self, response: Result<Vec<Row>, DatabaseError>) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    pub fn executed(&self) -> Vec<ExecutedStatement> {
        self.executed.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.executed.lock().unwrap().len()
    }

    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl Database for MockDatabase {
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, DatabaseError> {
        self.executed.lock().unwrap().push(ExecutedStatement {
            sql: sql.to_string(),
            params: params.to_vec(),
        });

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(DatabaseError::QueryError(format!("no scripted response for: {}", sql))))
    }
}

/// Image host that never leaves the process
#[derive(Default)]
pub struct MockImageHost {
    fail_uploads: bool,
    fail_deletes: bool,
    uploads: Mutex<Vec<UploadFile>>,
    deleted: Mutex<Vec<String>>,
}

impl MockImageHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_uploads(mut self) -> Self {
        self.fail_uploads = true;
        self
    }

    pub fn failing_deletes(mut self) -> Self {
        self.fail_deletes = true;
        self
    }

    pub fn uploads(&self) -> Vec<UploadFile> {
        self.uploads.lock().unwrap().clone()
    }

    /// Public ids passed to `delete`, including failed attempts
    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl ImageHost for MockImageHost {
    async fn upload(&self, file: UploadFile) -> Result<UploadedImage, ImageError> {
        let stem = file.file_name.rsplit_once('.').map(|(s, _)| s).unwrap_or(&file.file_name).to_string();
        self.uploads.lock().unwrap().push(file);

        if self.fail_uploads {
            return Err(ImageError::Rejected { status: 500, message: "upload failed".to_string() });
        }

        Ok(UploadedImage {
            url: format!("https://images.test/golf-classic/{}.png", stem),
            public_id: format!("golf-classic/{}", stem),
        })
    }

    async fn delete(&self, public_id: &str) -> Result<(), ImageError> {
        self.deleted.lock().unwrap().push(public_id.to_string());

        if self.fail_deletes {
            return Err(ImageError::Rejected { status: 500, message: "destroy failed".to_string() });
        }
        Ok(())
    }
}

pub fn test_keys() -> AuthKeys {
    AuthKeys::new(TEST_SECRET)
}

/// `Authorization` header value for an admin signed with [`TEST_SECRET`]
pub fn bearer(sub: &str) -> String {
    let token = test_keys()
        .generate_jwt(&Claims::new(sub, None, 1))
        .unwrap_or_default();
    format!("Bearer {}", token)
}

pub fn test_state(db: Arc<MockDatabase>, images: Arc<MockImageHost>) -> AppState {
    AppState::new(db, images, test_keys())
}
