use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use gallery::{GalleryManager, Notice, NoticeSink, PublicUrlResolver, Severity};
use identity_provider::{IdentityError, IdentityProvider, IdentityResult, Session};
use mime::Mime;
use object_storage::{
    ListOptions, ObjectStorage, ObjectStorageError, SortOrder, StorageResult, StoredObject,
};

/// Project URL every test resolver is built against
pub const TEST_PROJECT_URL: &str = "https://project.example.com";

/// In-memory identity provider with scriptable failures
#[derive(Clone, Default)]
pub struct FakeIdentityProvider {
    pub reject_links: Arc<AtomicBool>,
    pub fail_sign_out: Arc<AtomicBool>,
    pub link_requests: Arc<Mutex<Vec<String>>>,
    pub sign_outs: Arc<AtomicUsize>,
}

#[async_trait]
impl IdentityProvider for FakeIdentityProvider {
    async fn request_magic_link(&self, email: &str) -> IdentityResult<()> {
        self.link_requests
            .lock()
            .unwrap()
            .push(email.to_string());

        if self.reject_links.load(Ordering::SeqCst) {
            return Err(IdentityError::Rejected {
                status: 422,
                message: "invalid email address".to_string(),
            });
        }
        Ok(())
    }

    async fn sign_out(&self, _session: &Session) -> IdentityResult<()> {
        self.sign_outs.fetch_add(1, Ordering::SeqCst);

        if self.fail_sign_out.load(Ordering::SeqCst) {
            return Err(IdentityError::Rejected {
                status: 401,
                message: "session already expired".to_string(),
            });
        }
        Ok(())
    }
}

/// In-memory object store with scriptable failures and call counters
#[derive(Clone, Default)]
pub struct InMemoryObjectStorage {
    pub objects: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
    pub fail_list: Arc<AtomicBool>,
    pub fail_upload: Arc<AtomicBool>,
    pub fail_remove: Arc<AtomicBool>,
    pub list_calls: Arc<AtomicUsize>,
    pub upload_calls: Arc<AtomicUsize>,
    pub remove_calls: Arc<AtomicUsize>,
}

fn storage_offline() -> ObjectStorageError {
    ObjectStorageError::Api {
        status: 500,
        message: "storage offline".to_string(),
    }
}

#[async_trait]
impl ObjectStorage for InMemoryObjectStorage {
    async fn list(
        &self,
        _access_token: &str,
        prefix: &str,
        options: &ListOptions,
    ) -> StorageResult<Vec<StoredObject>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_list.load(Ordering::SeqCst) {
            return Err(storage_offline());
        }

        // BTreeMap iteration is already name-ascending
        let mut names: Vec<StoredObject> = self
            .objects
            .lock()
            .unwrap()
            .keys()
            .filter_map(|key| key.strip_prefix(prefix))
            .map(|name| StoredObject::named(name.to_string()))
            .collect();

        if options.sort.order == SortOrder::Desc {
            names.reverse();
        }

        Ok(names
            .into_iter()
            .skip(options.offset as usize)
            .take(options.limit as usize)
            .collect())
    }

    async fn upload(
        &self,
        _access_token: &str,
        path: &str,
        content: Vec<u8>,
        _content_type: &Mime,
    ) -> StorageResult<()> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_upload.load(Ordering::SeqCst) {
            return Err(storage_offline());
        }

        self.objects.lock().unwrap().insert(path.to_string(), content);
        Ok(())
    }

    async fn remove(&self, _access_token: &str, paths: &[String]) -> StorageResult<()> {
        self.remove_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(storage_offline());
        }

        let mut objects = self.objects.lock().unwrap();
        for path in paths {
            objects.remove(path);
        }
        Ok(())
    }
}

/// Notice sink that records everything pushed to it
#[derive(Clone, Default)]
pub struct RecordingNoticeSink {
    pub notices: Arc<Mutex<Vec<Notice>>>,
}

impl NoticeSink for RecordingNoticeSink {
    fn push(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

impl RecordingNoticeSink {
    pub fn messages(&self) -> Vec<String> {
        self.notices
            .lock()
            .unwrap()
            .iter()
            .map(|notice| notice.message.clone())
            .collect()
    }

    pub fn last_error(&self) -> Option<Notice> {
        self.notices
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|notice| notice.severity == Severity::Error)
            .cloned()
    }
}

/// A manager wired to fakes, with handles kept for assertions
pub struct TestContext {
    pub manager: GalleryManager<FakeIdentityProvider, InMemoryObjectStorage>,
    pub identity: FakeIdentityProvider,
    pub storage: InMemoryObjectStorage,
    pub notices: RecordingNoticeSink,
}

impl TestContext {
    pub fn new() -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let identity = FakeIdentityProvider::default();
        let storage = InMemoryObjectStorage::default();
        let notices = RecordingNoticeSink::default();
        let manager = GalleryManager::new(
            identity.clone(),
            storage.clone(),
            PublicUrlResolver::new(TEST_PROJECT_URL, "images"),
            Box::new(notices.clone()),
        );

        Self {
            manager,
            identity,
            storage,
            notices,
        }
    }

    /// A context that has already completed a magic link login as `user_id`
    pub async fn signed_in(user_id: &str) -> Self {
        let mut context = Self::new();
        context
            .manager
            .handle_auth_change(Some(test_session(user_id)))
            .await;
        context
    }
}

pub fn test_session(user_id: &str) -> Session {
    Session {
        user_id: user_id.to_string(),
        email: format!("{user_id}@example.com"),
        access_token: format!("token-{user_id}"),
    }
}

/// Deterministic pseudo-image payload of the given size
pub fn image_blob(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 256) as u8).collect()
}
