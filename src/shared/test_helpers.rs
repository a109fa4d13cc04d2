use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
    Router,
};
use chrono::{DateTime, Utc};
use fake::faker::internet::en::SafeEmail;
use fake::Fake;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::capture::camera::{CameraDevice, FacingMode, Frame, MediaStream, MediaTrack};
use crate::features::capture::encoder::encode_jpeg;
use crate::features::events::models::{Event, NewEvent};
use crate::features::events::repositories::EventRepository;
use crate::features::events::services::EventService;
use crate::features::photos::models::{NewPhoto, Photo};
use crate::features::photos::repositories::PhotoRepository;
use crate::features::photos::services::PhotoService;
use crate::modules::storage::ObjectStore;
use crate::shared::notification::{Notification, Notifier};

pub const TEST_PUBLIC_BASE_URL: &str = "https://eventsnap.test";
pub const TEST_STORAGE_URL: &str = "https://storage.test/public";

pub fn host() -> AuthenticatedUser {
    AuthenticatedUser {
        id: Uuid::new_v4(),
        email: Some(SafeEmail().fake()),
    }
}

async fn inject_host_middleware(
    State(user): State<AuthenticatedUser>,
    mut request: Request,
    next: Next,
) -> Response {
    request.extensions_mut().insert(user);
    next.run(request).await
}

/// Run `router` as if `user` had passed token verification
pub fn with_host_auth(router: Router, user: AuthenticatedUser) -> Router {
    router.layer(axum::middleware::from_fn_with_state(
        user,
        inject_host_middleware,
    ))
}

/// Small real JPEG
pub fn sample_jpeg() -> Vec<u8> {
    encode_jpeg(FakeCamera::frame(), 80).unwrap()
}

/// Monotonic clock so records inserted back to back keep their order
#[derive(Default)]
struct TestClock {
    ticks: AtomicUsize,
}

impl TestClock {
    fn now(&self) -> DateTime<Utc> {
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst) as i64;
        DateTime::from_timestamp_millis(1_700_000_000_000 + tick).unwrap()
    }
}

// =============================================================================
// RECORD STORE
// =============================================================================

#[derive(Default)]
pub struct InMemoryEventRepository {
    rows: Mutex<Vec<Event>>,
    calls: AtomicUsize,
    clock: TestClock,
}

impl InMemoryEventRepository {
    /// Number of repository calls made so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn get(&self, id: Uuid) -> Option<Event> {
        self.rows.lock().unwrap().iter().find(|e| e.id == id).cloned()
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn insert(&self, event: NewEvent) -> Result<Event> {
        self.record_call();
        let event = Event {
            id: Uuid::new_v4(),
            name: event.name,
            description: event.description,
            owner_id: event.owner_id,
            is_public: event.is_public,
            created_at: self.clock.now(),
        };
        self.rows.lock().unwrap().push(event.clone());
        Ok(event)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>> {
        self.record_call();
        Ok(self.get(id))
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Event>> {
        self.record_call();
        let mut events: Vec<Event> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.owner_id == owner_id)
            .cloned()
            .collect();
        events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(events)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.record_call();
        self.rows.lock().unwrap().retain(|e| e.id != id);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryPhotoRepository {
    rows: Mutex<Vec<Photo>>,
    clock: TestClock,
    fail_insert: AtomicBool,
    fail_delete: AtomicBool,
    fail_list: AtomicBool,
}

impl InMemoryPhotoRepository {
    pub fn fail_insert(&self, fail: bool) {
        self.fail_insert.store(fail, Ordering::SeqCst);
    }

    /// Make both single and per-event deletes fail
    pub fn fail_delete(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }

    pub fn fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    pub fn by_event(&self, event_id: Uuid) -> Vec<Photo> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.event_id == event_id)
            .cloned()
            .collect()
    }

    fn check(flag: &AtomicBool, action: &str) -> Result<()> {
        if flag.load(Ordering::SeqCst) {
            Err(AppError::Database(sqlx::Error::Protocol(format!(
                "{} rejected",
                action
            ))))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PhotoRepository for InMemoryPhotoRepository {
    async fn insert(&self, photo: NewPhoto) -> Result<Photo> {
        Self::check(&self.fail_insert, "insert")?;
        let photo = Photo {
            id: Uuid::new_v4(),
            event_id: photo.event_id,
            storage_path: photo.storage_path,
            taken_by: photo.taken_by,
            created_at: self.clock.now(),
        };
        self.rows.lock().unwrap().push(photo.clone());
        Ok(photo)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Photo>> {
        Ok(self.rows.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn list_by_event(&self, event_id: Uuid) -> Result<Vec<Photo>> {
        Self::check(&self.fail_list, "list")?;
        let mut photos = self.by_event(event_id);
        photos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(photos)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        Self::check(&self.fail_delete, "delete")?;
        self.rows.lock().unwrap().retain(|p| p.id != id);
        Ok(())
    }

    async fn delete_by_event(&self, event_id: Uuid) -> Result<u64> {
        Self::check(&self.fail_delete, "delete")?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|p| p.event_id != event_id);
        Ok((before - rows.len()) as u64)
    }
}

// =============================================================================
// OBJECT STORE
// =============================================================================

#[derive(Default)]
pub struct InMemoryObjectStore {
    objects: Mutex<HashMap<String, (Vec<u8>, String)>>,
    fail_put: AtomicBool,
    fail_remove: AtomicBool,
    denied_keys: Mutex<HashSet<String>>,
    fetches: AtomicUsize,
}

impl InMemoryObjectStore {
    pub fn fail_put(&self, fail: bool) {
        self.fail_put.store(fail, Ordering::SeqCst);
    }

    /// Failing removes leave every object in place
    pub fn fail_remove(&self, fail: bool) {
        self.fail_remove.store(fail, Ordering::SeqCst);
    }

    /// Refuse to delete one key inside an otherwise successful batch, the
    /// way a multi-object delete reports a per-key `<Error>`
    pub fn deny_remove_of(&self, path: &str) {
        self.denied_keys.lock().unwrap().insert(path.to_string());
    }

    /// Drop an object behind the service's back
    pub fn forget(&self, path: &str) {
        self.objects.lock().unwrap().remove(path);
    }

    pub fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(path)
            .map(|(bytes, _)| bytes.clone())
    }

    pub fn content_type(&self, path: &str) -> Option<String> {
        self.objects
            .lock()
            .unwrap()
            .get(path)
            .map(|(_, content_type)| content_type.clone())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.objects.lock().unwrap().contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn put(&self, path: &str, data: Vec<u8>, content_type: &str) -> Result<()> {
        if self.fail_put.load(Ordering::SeqCst) {
            return Err(AppError::Storage("The bucket is not reachable".to_string()));
        }
        self.objects
            .lock()
            .unwrap()
            .insert(path.to_string(), (data, content_type.to_string()));
        Ok(())
    }

    async fn fetch(&self, path: &str) -> Result<Vec<u8>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.get(path)
            .ok_or_else(|| AppError::Storage(format!("Object not found: {}", path)))
    }

    async fn remove(&self, paths: &[String]) -> Result<()> {
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(AppError::Storage("Access denied".to_string()));
        }
        let denied = self.denied_keys.lock().unwrap();
        let mut objects = self.objects.lock().unwrap();
        let mut failed = Vec::new();
        for path in paths {
            if denied.contains(path) {
                failed.push(path.as_str());
            } else {
                objects.remove(path);
            }
        }
        match failed.first() {
            Some(key) => Err(AppError::Storage(format!(
                "Failed to delete '{}': AccessDenied ({} of {} objects failed)",
                key,
                failed.len(),
                paths.len()
            ))),
            None => Ok(()),
        }
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", TEST_STORAGE_URL, path)
    }
}

// =============================================================================
// BACKEND
// =============================================================================

/// In-memory collaborators shared by the services under test
pub struct TestBackend {
    pub events: Arc<InMemoryEventRepository>,
    pub photos: Arc<InMemoryPhotoRepository>,
    pub store: Arc<InMemoryObjectStore>,
    seeded: AtomicUsize,
}

impl TestBackend {
    pub fn new() -> Self {
        Self {
            events: Arc::new(InMemoryEventRepository::default()),
            photos: Arc::new(InMemoryPhotoRepository::default()),
            store: Arc::new(InMemoryObjectStore::default()),
            seeded: AtomicUsize::new(0),
        }
    }

    pub fn event_service(&self) -> EventService {
        EventService::new(
            self.events.clone(),
            self.photos.clone(),
            self.store.clone(),
            TEST_PUBLIC_BASE_URL.to_string(),
        )
    }

    pub fn photo_service(&self) -> PhotoService {
        PhotoService::new(self.events.clone(), self.photos.clone(), self.store.clone())
    }

    /// Insert an event directly. Does not count as a service call.
    pub async fn seed_event(&self, owner_id: Uuid, name: &str) -> Event {
        let event = self
            .events
            .insert(NewEvent {
                name: name.to_string(),
                description: None,
                owner_id,
                is_public: true,
            })
            .await
            .unwrap();
        self.events.calls.store(0, Ordering::SeqCst);
        event
    }

    /// Store an object and its photo record under a unique path
    pub async fn seed_photo(&self, event_id: Uuid, bytes: &[u8]) -> Photo {
        let n = self.seeded.fetch_add(1, Ordering::SeqCst);
        let storage_path = format!("{}/{}.jpg", event_id, 1_700_000_000_000u64 + n as u64);

        self.store
            .put(&storage_path, bytes.to_vec(), "image/jpeg")
            .await
            .unwrap();
        self.photos
            .insert(NewPhoto {
                event_id,
                storage_path,
                taken_by: Some("guest".to_string()),
            })
            .await
            .unwrap()
    }
}

// =============================================================================
// NOTIFICATIONS
// =============================================================================

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn all(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Notification> {
        self.sent.lock().unwrap().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.sent.lock().unwrap().push(notification);
    }
}

// =============================================================================
// CAMERA
// =============================================================================

/// Shared view of the tracks handed out by fake streams
#[derive(Clone, Default)]
pub struct TrackMonitor {
    live: Arc<Mutex<Vec<bool>>>,
    stops: Arc<AtomicUsize>,
    lost: Arc<AtomicBool>,
}

impl TrackMonitor {
    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    pub fn all_stopped(&self) -> bool {
        self.live.lock().unwrap().iter().all(|live| !live)
    }
}

struct FakeTrack {
    index: usize,
    monitor: TrackMonitor,
}

impl MediaTrack for FakeTrack {
    fn stop(&mut self) {
        self.monitor.live.lock().unwrap()[self.index] = false;
        self.monitor.stops.fetch_add(1, Ordering::SeqCst);
    }

    fn is_live(&self) -> bool {
        self.monitor.live.lock().unwrap()[self.index]
    }
}

pub struct FakeStream {
    tracks: Vec<Box<dyn MediaTrack>>,
    monitor: TrackMonitor,
}

impl FakeStream {
    pub fn new(track_count: usize) -> (Self, TrackMonitor) {
        let monitor = TrackMonitor::default();
        let stream = Self::with_monitor(track_count, monitor.clone());
        (stream, monitor)
    }

    fn with_monitor(track_count: usize, monitor: TrackMonitor) -> Self {
        let mut live = monitor.live.lock().unwrap();
        let first = live.len();
        live.extend(std::iter::repeat(true).take(track_count));
        drop(live);

        let tracks = (first..first + track_count)
            .map(|index| {
                Box::new(FakeTrack {
                    index,
                    monitor: monitor.clone(),
                }) as Box<dyn MediaTrack>
            })
            .collect();

        Self { tracks, monitor }
    }
}

impl MediaStream for FakeStream {
    fn tracks_mut(&mut self) -> &mut [Box<dyn MediaTrack>] {
        &mut self.tracks
    }

    fn current_frame(&mut self) -> Result<Frame> {
        if self.monitor.lost.load(Ordering::SeqCst) {
            return Err(AppError::Device("Camera disconnected".to_string()));
        }
        Ok(FakeCamera::frame())
    }
}

pub struct FakeCamera {
    track_count: usize,
    monitor: TrackMonitor,
    denied: AtomicBool,
    requested: Mutex<Vec<FacingMode>>,
}

impl FakeCamera {
    pub fn new(track_count: usize) -> Self {
        Self {
            track_count,
            monitor: TrackMonitor::default(),
            denied: AtomicBool::new(false),
            requested: Mutex::new(Vec::new()),
        }
    }

    /// The deterministic preview frame every fake stream returns
    pub fn frame() -> Frame {
        let (width, height) = (8u32, 6u32);
        let rgba = (0..width * height)
            .flat_map(|i| [(i * 5) as u8, (i * 3) as u8, (255 - i) as u8, 255])
            .collect();
        Frame {
            width,
            height,
            rgba,
        }
    }

    pub fn deny(&self, denied: bool) {
        self.denied.store(denied, Ordering::SeqCst);
    }

    /// Make every open stream fail its next frame grab
    pub fn lose_stream(&self) {
        self.monitor.lost.store(true, Ordering::SeqCst);
    }

    pub fn requested(&self) -> Vec<FacingMode> {
        self.requested.lock().unwrap().clone()
    }

    pub fn stops(&self) -> usize {
        self.monitor.stops()
    }

    pub fn all_stopped(&self) -> bool {
        self.monitor.all_stopped()
    }
}

#[async_trait]
impl CameraDevice for FakeCamera {
    async fn open(&self, facing: FacingMode) -> Result<Box<dyn MediaStream>> {
        self.requested.lock().unwrap().push(facing);
        if self.denied.load(Ordering::SeqCst) {
            return Err(AppError::Device("Permission denied".to_string()));
        }
        Ok(Box::new(FakeStream::with_monitor(
            self.track_count,
            self.monitor.clone(),
        )))
    }
}
