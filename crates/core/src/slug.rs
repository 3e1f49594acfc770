//! Public listing identifiers.
//!
//! Every item gets a stable share URL of the form `/i/{short_id}/{slug}`.
//! Both parts are derived once at creation and never regenerated, so a
//! title edit does not break links that are already out in the world.

use uuid::Uuid;

/// First 8 hex characters of the item's UUID. Collisions across items
/// are possible in principle; lookups always verify against the full id
/// column, the short form is only a URL convenience.
pub fn short_id(id: &Uuid) -> String {
    id.simple().to_string()[..8].to_string()
}

/// Lowercase ASCII slug of a listing title. Croatian diacritics fold to
/// their base letters, everything else non-alphanumeric becomes a
/// hyphen, runs collapse. Titles with no usable characters fall back to
/// `"oglas"` so the URL segment is never empty.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_was_hyphen = true;

    for c in title.chars() {
        let folded: Option<char> = match c {
            'č' | 'ć' | 'Č' | 'Ć' => Some('c'),
            'đ' | 'Đ' => Some('d'),
            'š' | 'Š' => Some('s'),
            'ž' | 'Ž' => Some('z'),
            _ if c.is_ascii_alphanumeric() => Some(c.to_ascii_lowercase()),
            _ => None,
        };
        match folded {
            Some(c) => {
                slug.push(c);
                last_was_hyphen = false;
            }
            None if !last_was_hyphen => {
                slug.push('-');
                last_was_hyphen = true;
            }
            None => {}
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }

    if slug.is_empty() {
        "oglas".to_string()
    } else {
        slug
    }
}
