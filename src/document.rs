//! Wire types for the user document and the entry/tag ingestion rules.
//!
//! The document arrives as loosely-typed JSON (`user.json`). Ingestion
//! normalizes it into strict shapes exactly once: each raw list entry is
//! classified into the [`Entry`] sum type, and the three accepted shapes of
//! the `tags` field (array, single object, comma-separated string) collapse
//! into one ordered `Vec<Tag>`. Downstream render code matches on the
//! normalized types and never re-derives a classification.

use serde::Deserialize;

/// Fallback color for spacer dividers without an explicit color.
pub const DEFAULT_SPACER_COLOR: &str = "#ffffff";

/// A user profile document, immutable per fetch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserDocument {
    /// Ordered list of link/spacer entries, in display order
    #[serde(default)]
    pub links: Vec<RawEntry>,
    /// Optional bio blurb
    #[serde(default)]
    pub bio: Option<String>,
    /// Optional tags; tolerates three legacy input shapes
    #[serde(default)]
    pub tags: Option<TagsField>,
    /// Optional GitHub username used to request the external profile
    #[serde(default, rename = "githubUsername")]
    pub github_username: Option<String>,
}

/// One raw list entry as it appears on the wire.
///
/// Entries are duck-typed in the source format: a spacer is marked either
/// by an explicit `type`/`item` field or by a bare `"spacer"` name with no
/// url. [`Entry::classify`] resolves this once at ingestion.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEntry {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub item: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// The three accepted wire shapes of the `tags` field.
///
/// A legacy input surface kept for compatibility: all three normalize to
/// the same ordered tag sequence via [`UserDocument::tags`].
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TagsField {
    Many(Vec<RawTag>),
    One(RawTag),
    Csv(String),
}

/// One raw tag object; `title` and `name` are interchangeable on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTag {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// A normalized tag: non-empty trimmed title plus an optional CSS color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub title: String,
    pub color: Option<String>,
}

/// The external account record fetched by username, opaque once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExternalProfile {
    pub login: String,
    pub avatar_url: String,
}

/// A classified list entry: either a navigational link or a visual spacer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Link {
        /// Display text; empty renders an empty label, not an error
        name: String,
        /// Absolute or bare-domain link; `#` when absent
        url: String,
    },
    Spacer {
        /// Divider tint
        color: String,
        /// Present and non-blank renders a labeled divider
        title: Option<String>,
    },
}

impl Entry {
    /// Classify one raw entry. Deterministic and total: the same raw entry
    /// maps to the same variant on every render pass.
    pub fn classify(raw: &RawEntry) -> Self {
        let marked_spacer = [raw.kind.as_deref(), raw.item.as_deref()]
            .into_iter()
            .flatten()
            .any(|marker| marker.eq_ignore_ascii_case("spacer"));
        let named_spacer = raw.url.is_none()
            && raw
                .name
                .as_deref()
                .is_some_and(|name| name.trim().eq_ignore_ascii_case("spacer"));

        if marked_spacer || named_spacer {
            Entry::Spacer {
                color: raw
                    .color
                    .clone()
                    .unwrap_or_else(|| DEFAULT_SPACER_COLOR.to_string()),
                title: raw
                    .title
                    .as_deref()
                    .map(str::trim)
                    .filter(|title| !title.is_empty())
                    .map(str::to_string),
            }
        } else {
            Entry::Link {
                name: raw.name.clone().unwrap_or_default(),
                url: raw.url.clone().unwrap_or_else(|| "#".to_string()),
            }
        }
    }

    /// True for a spacer carrying a non-blank title.
    pub fn has_title(&self) -> bool {
        matches!(self, Entry::Spacer { title: Some(_), .. })
    }
}

impl UserDocument {
    /// Classified entries in document order.
    pub fn entries(&self) -> Vec<Entry> {
        self.links.iter().map(Entry::classify).collect()
    }

    /// Normalized tag sequence; empty titles are dropped silently.
    pub fn tags(&self) -> Vec<Tag> {
        match &self.tags {
            None => Vec::new(),
            Some(TagsField::Many(raw)) => raw.iter().filter_map(normalize_tag).collect(),
            Some(TagsField::One(raw)) => normalize_tag(raw).into_iter().collect(),
            Some(TagsField::Csv(csv)) => csv
                .split(',')
                .map(str::trim)
                .filter(|title| !title.is_empty())
                .map(|title| Tag {
                    title: title.to_string(),
                    color: None,
                })
                .collect(),
        }
    }

    /// The trimmed GitHub username, if one is set and non-blank.
    pub fn github_username(&self) -> Option<&str> {
        self.github_username
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

fn normalize_tag(raw: &RawTag) -> Option<Tag> {
    let title = raw
        .title
        .as_deref()
        .or(raw.name.as_deref())
        .unwrap_or("")
        .trim();
    if title.is_empty() {
        return None;
    }
    Some(Tag {
        title: title.to_string(),
        color: raw.color.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(json: &str) -> UserDocument {
        serde_json::from_str(json).expect("valid document")
    }

    #[test]
    fn classify_link_defaults() {
        let raw = RawEntry {
            name: Some("Blog".into()),
            ..Default::default()
        };
        assert_eq!(
            Entry::classify(&raw),
            Entry::Link {
                name: "Blog".into(),
                url: "#".into()
            }
        );

        let bare = RawEntry::default();
        assert_eq!(
            Entry::classify(&bare),
            Entry::Link {
                name: String::new(),
                url: "#".into()
            }
        );
    }

    #[test]
    fn classify_spacer_via_type_or_item_marker() {
        let by_type = RawEntry {
            kind: Some("SPACER".into()),
            color: Some("#ff0000".into()),
            ..Default::default()
        };
        assert_eq!(
            Entry::classify(&by_type),
            Entry::Spacer {
                color: "#ff0000".into(),
                title: None
            }
        );

        let by_item = RawEntry {
            item: Some("Spacer".into()),
            title: Some("  Socials  ".into()),
            ..Default::default()
        };
        assert_eq!(
            Entry::classify(&by_item),
            Entry::Spacer {
                color: DEFAULT_SPACER_COLOR.into(),
                title: Some("Socials".into())
            }
        );
    }

    #[test]
    fn classify_spacer_by_name_requires_missing_url() {
        let named = RawEntry {
            name: Some("spacer".into()),
            ..Default::default()
        };
        assert!(matches!(Entry::classify(&named), Entry::Spacer { .. }));

        // a url makes it a real link even if it is called "spacer"
        let linked = RawEntry {
            name: Some("spacer".into()),
            url: Some("https://example.com".into()),
            ..Default::default()
        };
        assert!(matches!(Entry::classify(&linked), Entry::Link { .. }));
    }

    #[test]
    fn classification_is_idempotent() {
        let raw = RawEntry {
            kind: Some("spacer".into()),
            title: Some("Hello".into()),
            ..Default::default()
        };
        assert_eq!(Entry::classify(&raw), Entry::classify(&raw));
    }

    #[test]
    fn blank_spacer_title_is_dropped() {
        let raw = RawEntry {
            kind: Some("spacer".into()),
            title: Some("   ".into()),
            ..Default::default()
        };
        let entry = Entry::classify(&raw);
        assert!(!entry.has_title());
    }

    #[test]
    fn tags_accept_all_three_shapes() {
        let many = doc(r##"{"links":[],"tags":[{"title":"rust","color":"#000"},{"name":"web"}]}"##);
        assert_eq!(
            many.tags(),
            vec![
                Tag {
                    title: "rust".into(),
                    color: Some("#000".into())
                },
                Tag {
                    title: "web".into(),
                    color: None
                },
            ]
        );

        let one = doc(r#"{"links":[],"tags":{"title":"solo"}}"#);
        assert_eq!(one.tags().len(), 1);
        assert_eq!(one.tags()[0].title, "solo");

        let csv = doc(r#"{"links":[],"tags":"a, b ,, c "}"#);
        let titles: Vec<_> = csv.tags().into_iter().map(|tag| tag.title).collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
    }

    #[test]
    fn empty_tags_are_dropped_silently() {
        let empties = doc(r##"{"links":[],"tags":[{"title":"  "},{"name":""},{"color":"#fff"}]}"##);
        assert!(empties.tags().is_empty());

        let absent = doc(r#"{"links":[]}"#);
        assert!(absent.tags().is_empty());
    }

    #[test]
    fn github_username_is_trimmed_and_blank_filtered() {
        let set = doc(r#"{"links":[],"githubUsername":" octocat "}"#);
        assert_eq!(set.github_username(), Some("octocat"));

        let blank = doc(r#"{"links":[],"githubUsername":"   "}"#);
        assert_eq!(blank.github_username(), None);
    }
}
