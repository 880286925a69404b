use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Distinguish "field absent" (outer `None`) from "field explicitly null"
/// (`Some(None)`) when deserializing patch bodies. Plain `Option<Option<T>>`
/// collapses null to the outer `None`, so nullable fields could never be
/// cleared through a patch.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Destination behavior of a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    Normal,
    AbTest,
    BioPage,
}

impl Default for LinkType {
    fn default() -> Self {
        LinkType::Normal
    }
}

/// A shortened link record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: String,
    pub user_id: String,
    pub folder_id: Option<String>,
    pub original_url: String,
    pub short_code: String,
    pub password_hash: Option<String>,
    pub expire_at: Option<DateTime<Utc>>,
    pub click_limit: Option<u32>,
    pub total_clicks: u64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub utm_params: Option<HashMap<String, String>>,
    pub smart_redirect: Option<serde_json::Value>,
    #[serde(rename = "type")]
    pub link_type: LinkType,
}

/// Fields a caller may supply when creating a link. Everything except the
/// destination URL is optional; the store fills in the rest.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLink {
    pub user_id: Option<String>,
    pub folder_id: Option<String>,
    pub original_url: Option<String>,
    pub short_code: Option<String>,
    pub password_hash: Option<String>,
    pub expire_at: Option<DateTime<Utc>>,
    pub click_limit: Option<u32>,
    pub utm_params: Option<HashMap<String, String>>,
    pub smart_redirect: Option<serde_json::Value>,
    #[serde(rename = "type")]
    pub link_type: Option<LinkType>,
}

/// Shallow-merge patch for a link. Absent fields are left untouched; for
/// the nullable fields an explicit JSON null clears the stored value, which
/// is why those carry the double-`Option` (absent vs. null vs. value).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkPatch {
    #[serde(default, deserialize_with = "double_option")]
    pub folder_id: Option<Option<String>>,
    pub original_url: Option<String>,
    pub short_code: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub password_hash: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub expire_at: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub click_limit: Option<Option<u32>>,
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub utm_params: Option<Option<HashMap<String, String>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub smart_redirect: Option<Option<serde_json::Value>>,
    #[serde(rename = "type")]
    pub link_type: Option<LinkType>,
}

/// A user-defined grouping of links.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A label attachable to many links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
}

/// Join row between a link and a tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkTag {
    pub id: String,
    pub link_id: String,
    pub tag_id: String,
}

/// One recorded visit event against a link.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Click {
    pub id: String,
    pub link_id: String,
    pub timestamp: DateTime<Utc>,
    pub ip_address: String,
    pub country: String,
    pub city: String,
    pub user_agent: String,
    pub referrer: Option<String>,
}

/// QR code image for a link. `link_id` is the key; a link has at most one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrCode {
    pub link_id: String,
    pub image_url: String,
    pub style: HashMap<String, String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    User,
    Admin,
}

/// An account that owns links, folders, subscriptions, and API keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanName {
    Free,
    Pro,
    Business,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,
    pub user_id: String,
    pub plan_name: PlanName,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKey {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub key: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Alternate destination for an A/B-test link, weighted relative to its
/// siblings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbVariant {
    pub id: String,
    pub link_id: String,
    pub variant_url: String,
    pub weight: u32,
}
