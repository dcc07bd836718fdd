//! The render pipeline: user document + size tier to a visual tree.
//!
//! [`PageTree`] holds one slot per visual region (profile badge, tag pills,
//! bio blurb, link list). Each render operation recomputes its region from
//! scratch and replaces the slot wholesale, so every operation is idempotent
//! and safe to re-invoke in any order. Serialization emits the regions in
//! the fixed page order profile, tags, bio, links, which realizes the
//! insertion rules (tags sit immediately after the profile badge; the bio
//! follows the tags when present, the profile otherwise).

use crate::document::{Entry, ExternalProfile, UserDocument};
use crate::favicon::favicon_node;
use crate::markup::{Element, Node};
use crate::sanitize::sanitize_inline_text;
use crate::sizing::SizeTier;

/// Maximum number of characters of bio shown before truncation.
pub const BIO_DISPLAY_LIMIT: usize = 240;

/// Ellipsis marker appended to a truncated bio.
const ELLIPSIS: char = '\u{2026}';

/// Pill label color used when the tag color is not a parsable hex value.
const DEFAULT_TAG_TEXT: &str = "#ffffff";

/// The assembled page: one replaceable slot per visual region.
#[derive(Debug, Clone, Default)]
pub struct PageTree {
    profile: Option<Node>,
    tags: Option<Node>,
    bio: Option<Node>,
    links: Option<Node>,
}

impl PageTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the tag pill region. Empty tag sequences clear it.
    pub fn render_tags(&mut self, document: &UserDocument, tier: &SizeTier) {
        self.tags = tags_region(document, tier);
        log::debug!("rendered tags region (present: {})", self.tags.is_some());
    }

    /// Recompute the bio region. Absent or blank bios clear it.
    pub fn render_bio(&mut self, document: &UserDocument, tier: &SizeTier) {
        self.bio = bio_region(document, tier);
        log::debug!("rendered bio region (present: {})", self.bio.is_some());
    }

    /// Clear and rebuild the link list in document order.
    pub fn render_links(
        &mut self,
        document: &UserDocument,
        tier: &SizeTier,
        favicon_service: &str,
    ) {
        self.links = Some(links_region(document, tier, favicon_service));
        log::debug!("rendered {} link entries", document.links.len());
    }

    /// Replace the profile badge; `None` clears it.
    pub fn render_profile(&mut self, profile: Option<&ExternalProfile>) {
        self.profile = profile.map(profile_region);
        log::debug!("rendered profile region (present: {})", self.profile.is_some());
    }

    /// Serialize the current regions in page order.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for region in [&self.profile, &self.tags, &self.bio, &self.links]
            .into_iter()
            .flatten()
        {
            region.write_html(&mut out);
            out.push('\n');
        }
        out
    }

    /// Wrap the regions in a minimal standalone HTML document.
    pub fn to_document(&self, title: &str) -> String {
        let mut out = String::from("<!DOCTYPE html>\n<html>\n<head>\n");
        out.push_str("<meta charset=\"utf-8\">\n");
        out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
        let title_node: Node = Element::new("title").text(title).into();
        title_node.write_html(&mut out);
        out.push_str("\n<link rel=\"stylesheet\" href=\"style.css\">\n</head>\n<body>\n");
        out.push_str(&self.to_html());
        out.push_str("</body>\n</html>\n");
        out
    }
}

fn tags_region(document: &UserDocument, tier: &SizeTier) -> Option<Node> {
    let tags = document.tags();
    if tags.is_empty() {
        return None;
    }

    let mut container = Element::new("div").class("tags");
    for tag in tags {
        let mut style = format!("font-size:{}px;", tier.text_px);
        match tag.color.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            Some(color) => {
                // invalid CSS values are discarded by the browser, which
                // leaves the stylesheet's default pill background in place
                style.push_str(&format!("background-color:{color};"));
                style.push_str(&format!("color:{};", readable_text_color(color)));
            }
            None => style.push_str(&format!("color:{DEFAULT_TAG_TEXT};")),
        }
        container = container.child(
            Element::new("span")
                .class("tag")
                .attr("style", style)
                .text(sanitize_inline_text(&tag.title)),
        );
    }
    Some(container.into())
}

fn bio_region(document: &UserDocument, tier: &SizeTier) -> Option<Node> {
    let bio = document.bio.as_deref().map(str::trim).filter(|b| !b.is_empty())?;
    let full = sanitize_inline_text(bio);

    let mut display: String = full.chars().take(BIO_DISPLAY_LIMIT).collect();
    if full.chars().count() > BIO_DISPLAY_LIMIT {
        display.push(ELLIPSIS);
    }

    Some(
        Element::new("div")
            .class("bio")
            .attr("style", format!("font-size:{}px;", tier.text_px))
            .attr("title", full)
            .text(display)
            .into(),
    )
}

fn links_region(document: &UserDocument, tier: &SizeTier, favicon_service: &str) -> Node {
    let mut container = Element::new("div")
        .attr("id", "linkContainer")
        .class("links")
        .attr("style", format!("gap:{}px;", tier.gap_px));
    for entry in document.entries() {
        let node = match entry {
            Entry::Link { name, url } => link_row(&name, &url, tier, favicon_service),
            Entry::Spacer { color, title } => spacer_row(&color, title.as_deref(), tier),
        };
        container = container.child(node);
    }
    container.into()
}

fn link_row(name: &str, url: &str, tier: &SizeTier, favicon_service: &str) -> Node {
    let row_style = format!(
        "max-width:{}px;margin:0 auto;padding:{}px {}px;font-size:{}px;",
        tier.button_max_width, tier.row_padding_y, tier.row_padding_x, tier.text_px
    );
    let name_style = format!(
        "padding-left:{}px;overflow:hidden;text-overflow:ellipsis;white-space:nowrap;",
        tier.favicon_px + tier.gap_px
    );
    Element::new("a")
        .class("link")
        .attr("href", url)
        .attr("target", "_blank")
        .attr("rel", "noopener")
        .attr("style", row_style)
        .child(favicon_node(url, tier.favicon_px, favicon_service))
        .child(
            Element::new("span")
                .class("link-name")
                .attr("style", name_style)
                .text(sanitize_inline_text(name)),
        )
        .into()
}

fn spacer_row(color: &str, title: Option<&str>, tier: &SizeTier) -> Node {
    let row_style = format!("max-width:{}px;margin:0 auto;", tier.button_max_width);
    let line_style = format!("background-color:{color};");
    match title {
        Some(title) => Element::new("div")
            .class("spacer")
            .class("spacer-titled")
            .attr("style", row_style)
            .child(Element::new("span").class("spacer-line").attr("style", line_style.clone()))
            .child(
                Element::new("span")
                    .class("spacer-title")
                    .attr("style", format!("font-size:{}px;", tier.text_px))
                    .text(sanitize_inline_text(title)),
            )
            .child(Element::new("span").class("spacer-line").attr("style", line_style))
            .into(),
        None => Element::new("div")
            .class("spacer")
            .attr("style", row_style)
            .child(Element::new("hr").class("spacer-line").attr("style", line_style))
            .into(),
    }
}

fn profile_region(profile: &ExternalProfile) -> Node {
    Element::new("div")
        .attr("id", "githubProfileContainer")
        .class("profile")
        .child(
            Element::new("img")
                .class("github-profile-image")
                .attr("src", profile.avatar_url.clone())
                .attr("alt", "GitHub Profile"),
        )
        .child(
            Element::new("p")
                .class("profile-login")
                .text(sanitize_inline_text(&profile.login)),
        )
        .into()
}

/// Parse a `#rgb` or `#rrggbb` hex color.
fn parse_hex_color(color: &str) -> Option<(u8, u8, u8)> {
    let digits = color.trim().strip_prefix('#')?;
    match digits.len() {
        3 => {
            let mut channels = digits.chars().map(|ch| ch.to_digit(16));
            let r = channels.next()?? as u8;
            let g = channels.next()?? as u8;
            let b = channels.next()?? as u8;
            Some((r * 17, g * 17, b * 17))
        }
        6 => {
            let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
            let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
            let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
            Some((r, g, b))
        }
        _ => None,
    }
}

/// Pick a readable label color for a pill background.
///
/// Valid hex backgrounds get the luminance heuristic (weighted RGB sum at
/// or above the midpoint reads as light, so the label goes dark); anything
/// else keeps the fixed light default.
fn readable_text_color(background: &str) -> &'static str {
    match parse_hex_color(background) {
        Some((r, g, b)) => {
            let luminance =
                (299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b)) / 1000;
            if luminance >= 128 {
                "#000000"
            } else {
                "#ffffff"
            }
        }
        None => DEFAULT_TAG_TEXT,
    }
}
