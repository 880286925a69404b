//! The in-memory data store behind the mock backend.
//!
//! `LinkStore` owns every collection (links, folders, tags, clicks, users,
//! and so on), seeds them once at construction, and serves async operations
//! that sleep a configurable latency before touching state. Mutations take a
//! short-lived write lock, so they serialize at the lock while their delay
//! windows still overlap — callers see the same loading-state behavior a
//! real backend would produce.

mod seed;
mod stats;

pub use seed::SeedConfig;
pub use stats::{device_class, ClickStats, StatsSummary, TopLink};

use chrono::Utc;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::models::{
    AbVariant, ApiKey, Click, Folder, Link, LinkPatch, LinkTag, NewLink, QrCode, Subscription,
    Tag, User, UserRole,
};

/// Every collection the store owns. Constructed by the seeder or handed in
/// directly by tests that want a hand-built fixture.
#[derive(Debug, Default)]
pub struct Collections {
    pub links: Vec<Link>,
    pub folders: Vec<Folder>,
    pub tags: Vec<Tag>,
    pub link_tags: Vec<LinkTag>,
    pub clicks: Vec<Click>,
    pub qr_codes: Vec<QrCode>,
    pub users: Vec<User>,
    pub subscriptions: Vec<Subscription>,
    pub api_keys: Vec<ApiKey>,
    pub ab_variants: Vec<AbVariant>,
}

/// Simulated network delay per operation class.
#[derive(Debug, Clone, Copy)]
pub struct Latency {
    pub read: Duration,
    pub write: Duration,
    pub aggregate: Duration,
}

impl Latency {
    /// Delays in the range a dashboard would see from a real backend.
    pub fn realistic() -> Self {
        Self {
            read: Duration::from_millis(250),
            write: Duration::from_millis(400),
            aggregate: Duration::from_millis(700),
        }
    }

    /// No delay at all, for tests.
    pub fn none() -> Self {
        Self {
            read: Duration::ZERO,
            write: Duration::ZERO,
            aggregate: Duration::ZERO,
        }
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

/// Filter parameters for the link listing. Matches the dashboard's query
/// string: exact folder id and/or case-insensitive substring search over
/// short code or destination URL.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LinkQuery {
    pub folder: Option<String>,
    pub search: Option<String>,
}

fn qr_image_url(short_code: &str) -> String {
    format!(
        "https://api.qrserver.com/v1/create-qr-code/?size=150x150&data=https://short.url/{short_code}"
    )
}

fn new_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4())
}

/// Handle to the shared in-memory state. Cheap to clone; all clones see the
/// same collections.
#[derive(Clone)]
pub struct LinkStore {
    inner: Arc<RwLock<Collections>>,
    latency: Latency,
}

impl LinkStore {
    pub fn new(data: Collections, latency: Latency) -> Self {
        Self {
            inner: Arc::new(RwLock::new(data)),
            latency,
        }
    }

    /// Build a store from freshly generated fixtures. A fixed `seed` makes
    /// the fixtures reproducible.
    pub fn seeded(seed: Option<u64>, latency: Latency) -> Self {
        Self::new(seed::generate(&SeedConfig::default(), seed), latency)
    }

    pub fn seeded_with(config: &SeedConfig, seed: Option<u64>, latency: Latency) -> Self {
        Self::new(seed::generate(config, seed), latency)
    }

    // ── Links ──────────────────────────────────────────────────────────────

    /// All links, optionally filtered. No pagination; the dashboard slices
    /// client-side.
    pub async fn all_links(&self, query: &LinkQuery) -> Vec<Link> {
        pause(self.latency.read).await;
        let data = self.inner.read().await;
        data.links
            .iter()
            .filter(|link| match &query.folder {
                Some(folder) => link.folder_id.as_deref() == Some(folder.as_str()),
                None => true,
            })
            .filter(|link| match &query.search {
                Some(search) => {
                    let needle = search.to_lowercase();
                    link.short_code.to_lowercase().contains(&needle)
                        || link.original_url.to_lowercase().contains(&needle)
                }
                None => true,
            })
            .cloned()
            .collect()
    }

    pub async fn link_by_id(&self, id: &str) -> StoreResult<Link> {
        pause(self.latency.read).await;
        let data = self.inner.read().await;
        data.links
            .iter()
            .find(|link| link.id == id)
            .cloned()
            .ok_or(StoreError::NotFound("Link"))
    }

    /// Create a link. The counter starts at zero and the link starts active
    /// no matter what the caller supplied; short-code uniqueness is NOT
    /// checked (the 62^6 space makes collisions negligible for a mock).
    pub async fn create_link(&self, new: NewLink) -> Link {
        pause(self.latency.write).await;
        let mut data = self.inner.write().await;
        let short_code = new.short_code.unwrap_or_else(|| {
            seed::random_code(&mut rand::thread_rng(), seed::SHORT_CODE_LEN)
        });
        let link = Link {
            id: new_id("link"),
            user_id: new.user_id.unwrap_or_else(|| "user-1".to_owned()),
            folder_id: new.folder_id,
            original_url: new
                .original_url
                .unwrap_or_else(|| "https://example.com".to_owned()),
            short_code,
            password_hash: new.password_hash,
            expire_at: new.expire_at,
            click_limit: new.click_limit,
            total_clicks: 0,
            is_active: true,
            created_at: Utc::now(),
            utm_params: new.utm_params,
            smart_redirect: new.smart_redirect,
            link_type: new.link_type.unwrap_or_default(),
        };
        data.links.push(link.clone());
        link
    }

    /// Shallow-merge the patch onto the stored link. Absent patch fields are
    /// left as they were; a present-but-null nullable field clears the
    /// stored value.
    pub async fn update_link(&self, id: &str, patch: LinkPatch) -> StoreResult<Link> {
        pause(self.latency.write).await;
        let mut data = self.inner.write().await;
        let link = data
            .links
            .iter_mut()
            .find(|link| link.id == id)
            .ok_or(StoreError::NotFound("Link"))?;

        if let Some(folder_id) = patch.folder_id {
            link.folder_id = folder_id;
        }
        if let Some(original_url) = patch.original_url {
            link.original_url = original_url;
        }
        if let Some(short_code) = patch.short_code {
            link.short_code = short_code;
        }
        if let Some(password_hash) = patch.password_hash {
            link.password_hash = password_hash;
        }
        if let Some(expire_at) = patch.expire_at {
            link.expire_at = expire_at;
        }
        if let Some(click_limit) = patch.click_limit {
            link.click_limit = click_limit;
        }
        if let Some(is_active) = patch.is_active {
            link.is_active = is_active;
        }
        if let Some(utm_params) = patch.utm_params {
            link.utm_params = utm_params;
        }
        if let Some(smart_redirect) = patch.smart_redirect {
            link.smart_redirect = smart_redirect;
        }
        if let Some(link_type) = patch.link_type {
            link.link_type = link_type;
        }
        Ok(link.clone())
    }

    /// Remove a link. Click rows, QR codes, and tag associations are left
    /// behind as orphans; the mock layer does not cascade link deletion.
    pub async fn delete_link(&self, id: &str) -> StoreResult<()> {
        pause(self.latency.write).await;
        let mut data = self.inner.write().await;
        let index = data
            .links
            .iter()
            .position(|link| link.id == id)
            .ok_or(StoreError::NotFound("Link"))?;
        data.links.remove(index);
        Ok(())
    }

    // ── Folders ────────────────────────────────────────────────────────────

    pub async fn all_folders(&self) -> Vec<Folder> {
        pause(self.latency.read).await;
        self.inner.read().await.folders.clone()
    }

    pub async fn create_folder(&self, name: &str, user_id: &str) -> Folder {
        pause(self.latency.write).await;
        let mut data = self.inner.write().await;
        let folder = Folder {
            id: new_id("folder"),
            user_id: user_id.to_owned(),
            name: name.to_owned(),
            created_at: Utc::now(),
        };
        data.folders.push(folder.clone());
        folder
    }

    pub async fn rename_folder(&self, id: &str, name: &str) -> StoreResult<Folder> {
        pause(self.latency.write).await;
        let mut data = self.inner.write().await;
        let folder = data
            .folders
            .iter_mut()
            .find(|folder| folder.id == id)
            .ok_or(StoreError::NotFound("Folder"))?;
        folder.name = name.to_owned();
        Ok(folder.clone())
    }

    /// Remove a folder and re-home its links to "no folder" in the same
    /// critical section, so no caller ever observes a link pointing at a
    /// deleted folder.
    pub async fn delete_folder(&self, id: &str) -> StoreResult<()> {
        pause(self.latency.write).await;
        let mut data = self.inner.write().await;
        let index = data
            .folders
            .iter()
            .position(|folder| folder.id == id)
            .ok_or(StoreError::NotFound("Folder"))?;
        for link in data
            .links
            .iter_mut()
            .filter(|link| link.folder_id.as_deref() == Some(id))
        {
            link.folder_id = None;
        }
        data.folders.remove(index);
        Ok(())
    }

    // ── Tags ───────────────────────────────────────────────────────────────

    pub async fn all_tags(&self) -> Vec<Tag> {
        pause(self.latency.read).await;
        self.inner.read().await.tags.clone()
    }

    pub async fn create_tag(&self, name: &str) -> Tag {
        pause(self.latency.write).await;
        let mut data = self.inner.write().await;
        let tag = Tag {
            id: new_id("tag"),
            name: name.to_owned(),
        };
        data.tags.push(tag.clone());
        tag
    }

    /// Remove a tag, cascading away every link association that references
    /// it first.
    pub async fn delete_tag(&self, id: &str) -> StoreResult<()> {
        pause(self.latency.write).await;
        let mut data = self.inner.write().await;
        let index = data
            .tags
            .iter()
            .position(|tag| tag.id == id)
            .ok_or(StoreError::NotFound("Tag"))?;
        data.link_tags.retain(|lt| lt.tag_id != id);
        data.tags.remove(index);
        Ok(())
    }

    /// Resolved tags for one link, via the join rows.
    pub async fn tags_for_link(&self, link_id: &str) -> Vec<Tag> {
        pause(self.latency.read).await;
        let data = self.inner.read().await;
        let tag_ids: Vec<&str> = data
            .link_tags
            .iter()
            .filter(|lt| lt.link_id == link_id)
            .map(|lt| lt.tag_id.as_str())
            .collect();
        data.tags
            .iter()
            .filter(|tag| tag_ids.contains(&tag.id.as_str()))
            .cloned()
            .collect()
    }

    // ── A/B variants ───────────────────────────────────────────────────────

    pub async fn variants_for_link(&self, link_id: &str) -> Vec<AbVariant> {
        pause(self.latency.read).await;
        let data = self.inner.read().await;
        data.ab_variants
            .iter()
            .filter(|v| v.link_id == link_id)
            .cloned()
            .collect()
    }

    // ── QR codes ───────────────────────────────────────────────────────────

    pub async fn qr_code_for_link(&self, link_id: &str) -> StoreResult<QrCode> {
        pause(self.latency.read).await;
        let data = self.inner.read().await;
        data.qr_codes
            .iter()
            .find(|qr| qr.link_id == link_id)
            .cloned()
            .ok_or(StoreError::NotFound("QR code"))
    }

    /// Get-or-create: a second call for the same link returns the QR code
    /// created by the first, image URL included.
    pub async fn generate_qr_code(&self, link_id: &str) -> StoreResult<QrCode> {
        pause(self.latency.write).await;
        let mut data = self.inner.write().await;
        let short_code = data
            .links
            .iter()
            .find(|link| link.id == link_id)
            .map(|link| link.short_code.clone())
            .ok_or(StoreError::NotFound("Link"))?;

        if let Some(existing) = data.qr_codes.iter().find(|qr| qr.link_id == link_id) {
            return Ok(existing.clone());
        }

        let mut style = HashMap::new();
        style.insert("foreground".to_owned(), "#000000".to_owned());
        style.insert("background".to_owned(), "#ffffff".to_owned());
        style.insert("shape".to_owned(), "square".to_owned());
        let qr = QrCode {
            link_id: link_id.to_owned(),
            image_url: qr_image_url(&short_code),
            style,
            created_at: Utc::now(),
        };
        data.qr_codes.push(qr.clone());
        Ok(qr)
    }

    // ── Stats ──────────────────────────────────────────────────────────────

    /// Four-way breakdown of one link's materialized click rows. An unknown
    /// id yields empty breakdowns rather than an error; use [`link_stats`]
    /// when existence matters.
    ///
    /// [`link_stats`]: LinkStore::link_stats
    pub async fn click_stats(&self, link_id: &str) -> ClickStats {
        pause(self.latency.aggregate).await;
        let data = self.inner.read().await;
        stats::click_breakdown(data.clicks.iter().filter(|c| c.link_id == link_id))
    }

    pub async fn link_stats(&self, id: &str) -> StoreResult<ClickStats> {
        pause(self.latency.aggregate).await;
        let data = self.inner.read().await;
        if !data.links.iter().any(|link| link.id == id) {
            return Err(StoreError::NotFound("Link"));
        }
        Ok(stats::click_breakdown(
            data.clicks.iter().filter(|c| c.link_id == id),
        ))
    }

    pub async fn stats_summary(&self) -> StatsSummary {
        pause(self.latency.aggregate).await;
        let data = self.inner.read().await;
        stats::summary(&data.links, &data.clicks, Utc::now())
    }

    // ── Users / auth support ───────────────────────────────────────────────

    pub async fn user_by_id(&self, id: &str) -> StoreResult<User> {
        pause(self.latency.read).await;
        let data = self.inner.read().await;
        data.users
            .iter()
            .find(|user| user.id == id)
            .cloned()
            .ok_or(StoreError::NotFound("User"))
    }

    /// Look up an active user by email and stamp their last login. Returns
    /// `None` for unknown emails and deactivated accounts.
    pub async fn record_login(&self, email: &str) -> Option<User> {
        pause(self.latency.write).await;
        let mut data = self.inner.write().await;
        let user = data
            .users
            .iter_mut()
            .find(|user| user.is_active && user.email.eq_ignore_ascii_case(email))?;
        user.last_login_at = Some(Utc::now());
        Some(user.clone())
    }

    pub async fn user_by_email(&self, email: &str) -> Option<User> {
        pause(self.latency.read).await;
        let data = self.inner.read().await;
        data.users
            .iter()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned()
    }

    pub async fn create_user(&self, name: &str, email: &str) -> User {
        pause(self.latency.write).await;
        let mut data = self.inner.write().await;
        let now = Utc::now();
        let user = User {
            id: new_id("user"),
            email: email.to_owned(),
            name: name.to_owned(),
            role: UserRole::User,
            created_at: now,
            last_login_at: Some(now),
            is_active: true,
        };
        data.users.push(user.clone());
        user
    }

    pub async fn all_users(&self) -> Vec<User> {
        pause(self.latency.read).await;
        self.inner.read().await.users.clone()
    }

    pub async fn subscription_for_user(&self, user_id: &str) -> Option<Subscription> {
        pause(self.latency.read).await;
        let data = self.inner.read().await;
        data.subscriptions
            .iter()
            .find(|sub| sub.user_id == user_id)
            .cloned()
    }

    // ── API keys ───────────────────────────────────────────────────────────

    pub async fn api_keys_for_user(&self, user_id: &str) -> Vec<ApiKey> {
        pause(self.latency.read).await;
        let data = self.inner.read().await;
        data.api_keys
            .iter()
            .filter(|key| key.user_id == user_id)
            .cloned()
            .collect()
    }

    pub async fn create_api_key(&self, user_id: &str, name: &str) -> ApiKey {
        pause(self.latency.write).await;
        let mut data = self.inner.write().await;
        let key = ApiKey {
            id: new_id("api-key"),
            user_id: user_id.to_owned(),
            name: name.to_owned(),
            key: seed::random_api_key(&mut rand::thread_rng()),
            is_active: true,
            created_at: Utc::now(),
        };
        data.api_keys.push(key.clone());
        key
    }

    pub async fn delete_api_key(&self, id: &str) -> StoreResult<()> {
        pause(self.latency.write).await;
        let mut data = self.inner.write().await;
        let index = data
            .api_keys
            .iter()
            .position(|key| key.id == id)
            .ok_or(StoreError::NotFound("API key"))?;
        data.api_keys.remove(index);
        Ok(())
    }
}
