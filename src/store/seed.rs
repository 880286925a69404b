use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeSet, HashMap};

use super::Collections;
use crate::models::{
    AbVariant, ApiKey, Click, Folder, Link, LinkTag, LinkType, PlanName, QrCode, Subscription,
    Tag, User, UserRole,
};

pub(crate) const SHORT_CODE_ALPHABET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
pub(crate) const SHORT_CODE_LEN: usize = 6;

const FOLDER_LABELS: [&str; 5] = ["Work", "Personal", "Social Media", "Projects", "Marketing"];

const TAG_NAMES: [&str; 12] = [
    "Marketing", "Social", "Work", "Personal", "Important", "Archive", "Project", "Campaign",
    "Event", "Blog", "Product", "News",
];

const COUNTRIES: [&str; 10] = ["US", "UK", "CA", "DE", "FR", "JP", "AU", "BR", "IN", "RU"];

const CITIES: [&str; 10] = [
    "New York", "London", "Toronto", "Berlin", "Paris", "Tokyo", "Sydney", "São Paulo", "Mumbai",
    "Moscow",
];

const USER_AGENTS: [&str; 4] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 15_0 like Mac OS X) AppleWebKit/605.1.15",
    "Mozilla/5.0 (Linux; Android 12) AppleWebKit/537.36",
];

const REFERRERS: [&str; 5] = [
    "https://google.com",
    "https://facebook.com",
    "https://twitter.com",
    "https://linkedin.com",
    "https://instagram.com",
];

const UTM_SOURCES: [&str; 5] = ["google", "facebook", "twitter", "email", "direct"];
const UTM_MEDIUMS: [&str; 4] = ["cpc", "social", "email", "organic"];

/// How much fixture data to generate.
#[derive(Debug, Clone, Copy)]
pub struct SeedConfig {
    pub users: usize,
    pub folders: usize,
    pub links: usize,
    /// Hard cap on click rows across ALL links. Links are filled in
    /// generation order, so later links may materialize fewer rows than
    /// their `total_clicks` counter states.
    pub click_cap: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            users: 10,
            folders: 15,
            links: 50,
            click_cap: 1000,
        }
    }
}

/// Generate a random alphanumeric short code.
pub(crate) fn random_code(rng: &mut impl Rng, len: usize) -> String {
    (0..len)
        .map(|_| SHORT_CODE_ALPHABET[rng.gen_range(0..SHORT_CODE_ALPHABET.len())] as char)
        .collect()
}

/// Generate a random 32-character lowercase hex API key.
pub(crate) fn random_api_key(rng: &mut impl Rng) -> String {
    (0..32)
        .map(|_| char::from_digit(rng.gen_range(0..16), 16).unwrap_or('0'))
        .collect()
}

fn random_date(rng: &mut impl Rng, start: DateTime<Utc>, end: DateTime<Utc>) -> DateTime<Utc> {
    let span = (end - start).num_seconds().max(1);
    start + Duration::seconds(rng.gen_range(0..span))
}

/// Build a complete fixture set. A fixed `seed` reproduces the exact same
/// collections on every run; `None` seeds from the OS.
pub fn generate(config: &SeedConfig, seed: Option<u64>) -> Collections {
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    let now = Utc::now();
    let epoch = now - Duration::days(1000);

    // Users: the first one is always the admin account.
    let users: Vec<User> = (0..config.users)
        .map(|i| {
            let created_at = random_date(&mut rng, epoch, now);
            User {
                id: format!("user-{}", i + 1),
                email: if i == 0 {
                    "admin@example.com".to_owned()
                } else {
                    format!("user{i}@example.com")
                },
                name: if i == 0 {
                    "Admin User".to_owned()
                } else {
                    format!("User {i}")
                },
                role: if i == 0 { UserRole::Admin } else { UserRole::User },
                created_at,
                last_login_at: rng
                    .gen_bool(0.8)
                    .then(|| random_date(&mut rng, created_at, now)),
                // The admin demo account must always be able to log in.
                is_active: rng.gen_bool(0.9) || i == 0,
            }
        })
        .collect();

    let folders: Vec<Folder> = (0..config.folders)
        .map(|i| Folder {
            id: format!("folder-{}", i + 1),
            user_id: users[rng.gen_range(0..users.len())].id.clone(),
            name: format!(
                "{} {}",
                FOLDER_LABELS[rng.gen_range(0..FOLDER_LABELS.len())],
                i + 1
            ),
            created_at: random_date(&mut rng, epoch, now),
        })
        .collect();

    let tags: Vec<Tag> = TAG_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| Tag {
            id: format!("tag-{}", i + 1),
            name: (*name).to_owned(),
        })
        .collect();

    let year_ago = now - Duration::days(365);
    let links: Vec<Link> = (0..config.links)
        .map(|i| {
            let created_at = random_date(&mut rng, year_ago, now);
            let folder_id = rng
                .gen_bool(0.7)
                .then(|| folders[rng.gen_range(0..folders.len())].id.clone());
            let expire_at = rng
                .gen_bool(0.3)
                .then(|| created_at + Duration::days(rng.gen_range(30..120)));
            let utm_params = rng.gen_bool(0.4).then(|| {
                let mut utm = HashMap::new();
                utm.insert(
                    "source".to_owned(),
                    UTM_SOURCES[rng.gen_range(0..UTM_SOURCES.len())].to_owned(),
                );
                utm.insert(
                    "medium".to_owned(),
                    UTM_MEDIUMS[rng.gen_range(0..UTM_MEDIUMS.len())].to_owned(),
                );
                utm.insert(
                    "campaign".to_owned(),
                    format!("campaign-{}", rng.gen_range(1..=10)),
                );
                utm
            });
            let smart_redirect = rng.gen_bool(0.2).then(|| {
                serde_json::json!({
                    "rules": [{
                        "condition": "country",
                        "value": ["US", "CA"],
                        "redirectUrl": "https://example.com/us-ca",
                    }],
                })
            });
            let link_type = match rng.gen::<f64>() {
                r if r < 0.10 => LinkType::AbTest,
                r if r < 0.15 => LinkType::BioPage,
                _ => LinkType::Normal,
            };

            Link {
                id: format!("link-{}", i + 1),
                user_id: users[rng.gen_range(0..users.len())].id.clone(),
                folder_id,
                original_url: format!(
                    "https://example.com/very/long/path/to/some/page?param={i}&source=campaign"
                ),
                short_code: random_code(&mut rng, SHORT_CODE_LEN),
                password_hash: rng.gen_bool(0.2).then(|| "hashed_password".to_owned()),
                expire_at,
                click_limit: rng.gen_bool(0.2).then(|| rng.gen_range(100..1100)),
                total_clicks: rng.gen_range(0..5000),
                is_active: rng.gen_bool(0.9),
                created_at,
                utm_params,
                smart_redirect,
                link_type,
            }
        })
        .collect();

    // 0-2 distinct tags per link.
    let mut link_tags: Vec<LinkTag> = Vec::new();
    for link in &links {
        let count = rng.gen_range(0..3);
        let mut picked = BTreeSet::new();
        while picked.len() < count {
            picked.insert(rng.gen_range(0..tags.len()));
        }
        for tag_index in picked {
            link_tags.push(LinkTag {
                id: format!("link-tag-{}", link_tags.len() + 1),
                link_id: link.id.clone(),
                tag_id: tags[tag_index].id.clone(),
            });
        }
    }

    // Click rows, first-filled-first-served up to the global cap. Later
    // links may end up with fewer rows than their total_clicks counter.
    let mut clicks: Vec<Click> = Vec::new();
    'fill: for link in &links {
        for _ in 0..link.total_clicks {
            if clicks.len() >= config.click_cap {
                break 'fill;
            }
            let which = rng.gen_range(0..COUNTRIES.len());
            let referrer = if rng.gen_bool(0.7) {
                // One extra slot past the list yields a missing referrer.
                match rng.gen_range(0..=REFERRERS.len()) {
                    i if i < REFERRERS.len() => Some(REFERRERS[i].to_owned()),
                    _ => None,
                }
            } else {
                None
            };
            clicks.push(Click {
                id: format!("click-{}", clicks.len() + 1),
                link_id: link.id.clone(),
                timestamp: random_date(&mut rng, link.created_at, now),
                ip_address: format!(
                    "192.168.{}.{}",
                    rng.gen_range(0..255u16),
                    rng.gen_range(0..255u16)
                ),
                country: COUNTRIES[which].to_owned(),
                city: CITIES[which].to_owned(),
                user_agent: USER_AGENTS[rng.gen_range(0..USER_AGENTS.len())].to_owned(),
                referrer,
            });
        }
    }

    let mut qr_codes: Vec<QrCode> = Vec::new();
    for link in &links {
        if rng.gen_bool(0.4) {
            let mut style = HashMap::new();
            style.insert(
                "foreground".to_owned(),
                ["#000000", "#0066cc", "#cc3300"][rng.gen_range(0..3)].to_owned(),
            );
            style.insert("background".to_owned(), "#ffffff".to_owned());
            style.insert(
                "shape".to_owned(),
                ["square", "rounded"][rng.gen_range(0..2)].to_owned(),
            );
            if rng.gen_bool(0.5) {
                style.insert("logo".to_owned(), "logo.png".to_owned());
            }
            qr_codes.push(QrCode {
                link_id: link.id.clone(),
                image_url: super::qr_image_url(&link.short_code),
                style,
                created_at: random_date(&mut rng, link.created_at, now),
            });
        }
    }

    let subscriptions: Vec<Subscription> = users
        .iter()
        .enumerate()
        .map(|(i, user)| Subscription {
            id: format!("subscription-{}", i + 1),
            user_id: user.id.clone(),
            plan_name: [PlanName::Free, PlanName::Pro, PlanName::Business][rng.gen_range(0..3)],
            expires_at: random_date(&mut rng, now, now + Duration::days(365)),
            is_active: rng.gen_bool(0.9),
        })
        .collect();

    let mut api_keys: Vec<ApiKey> = Vec::new();
    for user in &users {
        if rng.gen_bool(0.4) {
            api_keys.push(ApiKey {
                id: format!("api-key-{}", api_keys.len() + 1),
                user_id: user.id.clone(),
                name: format!("API Key {}", api_keys.len() + 1),
                key: random_api_key(&mut rng),
                is_active: rng.gen_bool(0.9),
                created_at: random_date(&mut rng, year_ago, now),
            });
        }
    }

    let mut ab_variants: Vec<AbVariant> = Vec::new();
    for link in &links {
        if link.link_type != LinkType::AbTest {
            continue;
        }
        for j in 0..rng.gen_range(1..=2) {
            ab_variants.push(AbVariant {
                id: format!("variant-{}-{}", link.id, j + 1),
                link_id: link.id.clone(),
                variant_url: format!("https://example.com/variant/{}?source=abtest", j + 1),
                weight: rng.gen_range(10..60),
            });
        }
    }

    Collections {
        links,
        folders,
        tags,
        link_tags,
        clicks,
        qr_codes,
        users,
        subscriptions,
        api_keys,
        ab_variants,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_seed_is_reproducible() {
        let a = generate(&SeedConfig::default(), Some(1));
        let b = generate(&SeedConfig::default(), Some(1));
        let codes_a: Vec<&str> = a.links.iter().map(|l| l.short_code.as_str()).collect();
        let codes_b: Vec<&str> = b.links.iter().map(|l| l.short_code.as_str()).collect();
        assert_eq!(codes_a, codes_b);
        assert_eq!(a.clicks.len(), b.clicks.len());
        assert_eq!(a.link_tags.len(), b.link_tags.len());
    }

    #[test]
    fn click_cap_is_respected() {
        let data = generate(&SeedConfig::default(), Some(2));
        assert!(data.clicks.len() <= 1000);
        // 50 links averaging ~2500 counted clicks always saturate the cap.
        assert_eq!(data.clicks.len(), 1000);
    }

    #[test]
    fn every_ab_test_link_has_variants() {
        let data = generate(&SeedConfig::default(), Some(3));
        for link in data.links.iter().filter(|l| l.link_type == LinkType::AbTest) {
            let n = data
                .ab_variants
                .iter()
                .filter(|v| v.link_id == link.id)
                .count();
            assert!((1..=2).contains(&n), "link {} has {} variants", link.id, n);
        }
    }
}
