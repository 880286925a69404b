use linkstub::error::StoreError;
use linkstub::models::{LinkPatch, LinkType, NewLink, UserRole};
use linkstub::store::{Latency, LinkQuery, LinkStore};

fn test_store() -> LinkStore {
    LinkStore::seeded(Some(42), Latency::none())
}

#[tokio::test]
async fn seeded_fixture_shape() {
    let store = test_store();

    let users = store.all_users().await;
    assert_eq!(users.len(), 10);
    assert_eq!(users[0].email, "admin@example.com");
    assert_eq!(users[0].role, UserRole::Admin);
    assert!(users[1..].iter().all(|u| u.role == UserRole::User));

    assert_eq!(store.all_folders().await.len(), 15);
    assert_eq!(store.all_tags().await.len(), 12);

    let links = store.all_links(&LinkQuery::default()).await;
    assert_eq!(links.len(), 50);
    for link in &links {
        assert_eq!(link.short_code.len(), 6);
        assert!(link.total_clicks < 5000);
        assert!(users.iter().any(|u| u.id == link.user_id));
    }

    // Every user has a subscription.
    for user in &users {
        assert!(store.subscription_for_user(&user.id).await.is_some());
    }

    // Every A/B-test link has 1-2 variants.
    for link in links.iter().filter(|l| l.link_type == LinkType::AbTest) {
        let variants = store.variants_for_link(&link.id).await;
        assert!(
            (1..=2).contains(&variants.len()),
            "link {} has {} variants",
            link.id,
            variants.len()
        );
        assert!(variants.iter().all(|v| (10..60).contains(&v.weight)));
    }
}

#[tokio::test]
async fn identical_seeds_yield_identical_fixtures() {
    let a = LinkStore::seeded(Some(7), Latency::none());
    let b = LinkStore::seeded(Some(7), Latency::none());

    let links_a = a.all_links(&LinkQuery::default()).await;
    let links_b = b.all_links(&LinkQuery::default()).await;
    let codes_a: Vec<&str> = links_a.iter().map(|l| l.short_code.as_str()).collect();
    let codes_b: Vec<&str> = links_b.iter().map(|l| l.short_code.as_str()).collect();
    assert_eq!(codes_a, codes_b);

    let clicks_a: Vec<u64> = links_a.iter().map(|l| l.total_clicks).collect();
    let clicks_b: Vec<u64> = links_b.iter().map(|l| l.total_clicks).collect();
    assert_eq!(clicks_a, clicks_b);
}

#[tokio::test]
async fn create_link_forces_fresh_counters() {
    let store = test_store();
    let link = store
        .create_link(NewLink {
            original_url: Some("https://example.org/landing".into()),
            short_code: Some("abc123".into()),
            ..Default::default()
        })
        .await;

    assert_eq!(link.total_clicks, 0);
    assert!(link.is_active);
    assert_eq!(link.short_code, "abc123");
    assert_eq!(link.folder_id, None);
    assert_eq!(link.link_type, LinkType::Normal);

    // And it is actually in the collection.
    let fetched = store.link_by_id(&link.id).await.unwrap();
    assert_eq!(fetched.original_url, "https://example.org/landing");
}

#[tokio::test]
async fn create_link_generates_a_short_code_when_missing() {
    let store = test_store();
    let link = store.create_link(NewLink::default()).await;
    assert_eq!(link.short_code.len(), 6);
    assert!(link.short_code.chars().all(|c| c.is_ascii_alphanumeric()));
}

#[tokio::test]
async fn update_patches_only_named_fields() {
    let store = test_store();
    let before = store.link_by_id("link-1").await.unwrap();

    let updated = store
        .update_link(
            "link-1",
            LinkPatch {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(!updated.is_active);

    let after = store.link_by_id("link-1").await.unwrap();
    assert!(!after.is_active);
    assert_eq!(after.short_code, before.short_code);
    assert_eq!(after.original_url, before.original_url);
    assert_eq!(after.total_clicks, before.total_clicks);
    assert_eq!(after.folder_id, before.folder_id);
    assert_eq!(after.created_at, before.created_at);
}

#[tokio::test]
async fn explicit_null_patch_clears_nullable_fields() {
    let store = test_store();
    let folder = store.create_folder("Inbox", "user-1").await;
    let link = store
        .create_link(NewLink {
            folder_id: Some(folder.id.clone()),
            click_limit: Some(500),
            password_hash: Some("hashed_password".into()),
            ..Default::default()
        })
        .await;

    // A JSON body with explicit nulls, as the dashboard sends when a field
    // is cleared in the edit form.
    let patch: LinkPatch = serde_json::from_str(
        r#"{ "folderId": null, "clickLimit": null, "passwordHash": null }"#,
    )
    .unwrap();
    let updated = store.update_link(&link.id, patch).await.unwrap();
    assert_eq!(updated.folder_id, None);
    assert_eq!(updated.click_limit, None);
    assert_eq!(updated.password_hash, None);

    // Absent fields still mean "leave untouched": a patch that only names
    // the URL must not disturb the re-set folder.
    store
        .update_link(
            &link.id,
            LinkPatch {
                folder_id: Some(Some(folder.id.clone())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let patch: LinkPatch =
        serde_json::from_str(r#"{ "originalUrl": "https://example.org/moved" }"#).unwrap();
    let updated = store.update_link(&link.id, patch).await.unwrap();
    assert_eq!(updated.original_url, "https://example.org/moved");
    assert_eq!(updated.folder_id.as_deref(), Some(folder.id.as_str()));
}

#[tokio::test]
async fn unknown_ids_reject_with_not_found() {
    let store = test_store();

    assert_eq!(
        store.link_by_id("nonexistent").await.unwrap_err(),
        StoreError::NotFound("Link")
    );
    assert_eq!(
        store.update_link("nonexistent", LinkPatch::default()).await.unwrap_err(),
        StoreError::NotFound("Link")
    );
    assert_eq!(
        store.delete_link("nonexistent").await.unwrap_err(),
        StoreError::NotFound("Link")
    );
    assert_eq!(
        store.rename_folder("nonexistent", "x").await.unwrap_err(),
        StoreError::NotFound("Folder")
    );
    assert_eq!(
        store.delete_folder("nonexistent").await.unwrap_err(),
        StoreError::NotFound("Folder")
    );
    assert_eq!(
        store.delete_tag("nonexistent").await.unwrap_err(),
        StoreError::NotFound("Tag")
    );
    assert_eq!(
        store.generate_qr_code("nonexistent").await.unwrap_err(),
        StoreError::NotFound("Link")
    );
    assert_eq!(
        store.link_stats("nonexistent").await.unwrap_err(),
        StoreError::NotFound("Link")
    );

    assert_eq!(
        StoreError::NotFound("Link").to_string(),
        "Link not found"
    );
}

#[tokio::test]
async fn link_listing_filters() {
    let store = test_store();
    let all = store.all_links(&LinkQuery::default()).await;

    // Folder filter: pick a folder some seeded link belongs to.
    let folder_id = all
        .iter()
        .find_map(|l| l.folder_id.clone())
        .expect("seeded data always has foldered links");
    let in_folder = store
        .all_links(&LinkQuery {
            folder: Some(folder_id.clone()),
            search: None,
        })
        .await;
    assert!(!in_folder.is_empty());
    assert!(in_folder
        .iter()
        .all(|l| l.folder_id.as_deref() == Some(folder_id.as_str())));

    // Search is a case-insensitive substring over code or URL.
    let code = all[0].short_code.clone();
    let hits = store
        .all_links(&LinkQuery {
            folder: None,
            search: Some(code.to_uppercase()),
        })
        .await;
    assert!(hits.iter().any(|l| l.short_code == code));

    let url_hits = store
        .all_links(&LinkQuery {
            folder: None,
            search: Some("EXAMPLE.COM".into()),
        })
        .await;
    assert_eq!(url_hits.len(), all.len());
}

#[tokio::test]
async fn deleting_a_folder_rehomes_its_links() {
    let store = test_store();

    let folder = store.create_folder("Test", "user-1").await;
    let link = store
        .create_link(NewLink {
            folder_id: Some(folder.id.clone()),
            original_url: Some("https://example.org".into()),
            ..Default::default()
        })
        .await;
    assert_eq!(link.folder_id.as_deref(), Some(folder.id.as_str()));

    store.delete_folder(&folder.id).await.unwrap();

    let fetched = store.link_by_id(&link.id).await.unwrap();
    assert_eq!(fetched.folder_id, None);

    // No link anywhere still references the deleted folder.
    let all = store.all_links(&LinkQuery::default()).await;
    assert!(all
        .iter()
        .all(|l| l.folder_id.as_deref() != Some(folder.id.as_str())));
}

#[tokio::test]
async fn deleting_a_tag_cascades_its_associations() {
    let store = test_store();
    let links = store.all_links(&LinkQuery::default()).await;

    // Find a tag that is actually associated with some link.
    let mut tagged = None;
    for link in &links {
        if let Some(tag) = store.tags_for_link(&link.id).await.into_iter().next() {
            tagged = Some(tag);
            break;
        }
    }
    let tag = tagged.expect("seeded data always has tagged links");

    store.delete_tag(&tag.id).await.unwrap();

    assert!(store.all_tags().await.iter().all(|t| t.id != tag.id));
    for link in &links {
        let remaining = store.tags_for_link(&link.id).await;
        assert!(remaining.iter().all(|t| t.id != tag.id));
    }
}

#[tokio::test]
async fn qr_generation_is_idempotent() {
    let store = test_store();
    let first = store.generate_qr_code("link-1").await.unwrap();
    let second = store.generate_qr_code("link-1").await.unwrap();
    assert_eq!(first.image_url, second.image_url);
    assert_eq!(first.created_at, second.created_at);

    let link = store.link_by_id("link-1").await.unwrap();
    assert!(first.image_url.contains(&link.short_code));

    // GET-style lookup now succeeds too.
    let fetched = store.qr_code_for_link("link-1").await.unwrap();
    assert_eq!(fetched.image_url, first.image_url);
}

#[tokio::test]
async fn deleting_a_link_leaves_its_qr_code_behind() {
    let store = test_store();
    let qr = store.generate_qr_code("link-2").await.unwrap();
    store.delete_link("link-2").await.unwrap();

    // Orphaned on purpose: link deletion does not cascade in the mock layer.
    let orphan = store.qr_code_for_link("link-2").await.unwrap();
    assert_eq!(orphan.image_url, qr.image_url);
}

#[tokio::test]
async fn click_stats_groupings_agree() {
    let store = test_store();
    let links = store.all_links(&LinkQuery::default()).await;

    // The seeder caps click rows, so check the first few links that got any.
    let mut checked = 0;
    for link in &links {
        let stats = store.click_stats(&link.id).await;
        if stats.total == 0 {
            continue;
        }
        let by_country: u64 = stats.by_country.values().sum();
        let by_day: u64 = stats.by_day.values().sum();
        let by_referrer: u64 = stats.by_referrer.values().sum();
        let by_device: u64 = stats.by_device.values().sum();
        assert_eq!(by_country, stats.total);
        assert_eq!(by_day, stats.total);
        assert_eq!(by_referrer, stats.total);
        assert_eq!(by_device, stats.total);
        assert!(stats
            .by_device
            .keys()
            .all(|d| matches!(d.as_str(), "Mobile" | "Tablet" | "Desktop")));
        checked += 1;
        if checked == 5 {
            break;
        }
    }
    assert!(checked > 0, "expected at least one link with click rows");
}

#[tokio::test]
async fn link_stats_checks_existence_first() {
    let store = test_store();
    let stats = store.link_stats("link-1").await.unwrap();
    let direct = store.click_stats("link-1").await;
    assert_eq!(stats.total, direct.total);
}

#[tokio::test]
async fn summary_invariants() {
    let store = test_store();
    let links = store.all_links(&LinkQuery::default()).await;
    let summary = store.stats_summary().await;

    assert_eq!(summary.total_links, links.len() as u64);
    assert_eq!(
        summary.total_clicks,
        links.iter().map(|l| l.total_clicks).sum::<u64>()
    );
    assert_eq!(
        summary.active_links,
        links.iter().filter(|l| l.is_active).count() as u64
    );

    // Exactly 30 day keys, pre-seeded to zero before accumulation.
    assert_eq!(summary.clicks_by_day.len(), 30);
    let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
    assert!(summary.clicks_by_day.contains_key(&today));

    // Top links: 5 rows, sorted by counter descending.
    assert_eq!(summary.top_links.len(), 5);
    for pair in summary.top_links.windows(2) {
        assert!(pair[0].total_clicks >= pair[1].total_clicks);
    }
    let max = links.iter().map(|l| l.total_clicks).max().unwrap();
    assert_eq!(summary.top_links[0].total_clicks, max);
}

#[tokio::test]
async fn api_key_lifecycle() {
    let store = test_store();
    let key = store.create_api_key("user-3", "CI key").await;
    assert_eq!(key.key.len(), 32);
    assert!(key.is_active);

    let keys = store.api_keys_for_user("user-3").await;
    assert!(keys.iter().any(|k| k.id == key.id));

    store.delete_api_key(&key.id).await.unwrap();
    let keys = store.api_keys_for_user("user-3").await;
    assert!(keys.iter().all(|k| k.id != key.id));

    assert_eq!(
        store.delete_api_key(&key.id).await.unwrap_err(),
        StoreError::NotFound("API key")
    );
}

#[tokio::test]
async fn login_updates_last_seen_and_rejects_unknown_emails() {
    let store = test_store();

    let user = store.record_login("admin@example.com").await.unwrap();
    assert_eq!(user.id, "user-1");
    assert!(user.last_login_at.is_some());

    assert!(store.record_login("nobody@example.com").await.is_none());

    let created = store.create_user("New User", "new@example.com").await;
    assert_eq!(created.role, UserRole::User);
    assert!(store.record_login("NEW@example.com").await.is_some());
}
