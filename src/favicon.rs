//! Hostname canonicalization and favicon reference construction.

use base64::Engine as Base64Engine;
use url::Url;

use crate::markup::{Element, Node};

/// Scheme assumed for scheme-relative (`//host/...`) and bare-domain links.
const PAGE_SCHEME: &str = "https";

/// Neutral circular placeholder shown when no hostname can be derived.
const PLACEHOLDER_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 16 16"><circle cx="8" cy="8" r="8" fill="#c4c4c4"/></svg>"##;

/// Derive a canonical hostname from an arbitrary link string.
///
/// Absolute URIs are parsed as-is; `//host` gets the page scheme; anything
/// else is treated as a bare domain. Never fails: when parsing breaks down
/// the hostname is recovered textually, and empty input yields an empty
/// string.
pub fn extract_hostname(link: &str) -> String {
    let trimmed = link.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let candidate = if has_scheme(trimmed) {
        trimmed.to_string()
    } else if let Some(rest) = trimmed.strip_prefix("//") {
        format!("{PAGE_SCHEME}://{rest}")
    } else {
        format!("{PAGE_SCHEME}://{trimmed}")
    };

    match Url::parse(&candidate) {
        Ok(parsed) => parsed
            .host_str()
            .map(str::to_string)
            .unwrap_or_else(|| fallback_hostname(trimmed)),
        Err(_) => fallback_hostname(trimmed),
    }
}

fn has_scheme(link: &str) -> bool {
    match link.find("://") {
        Some(pos) if pos > 0 => {
            let scheme = &link[..pos];
            let mut chars = scheme.chars();
            chars
                .next()
                .is_some_and(|first| first.is_ascii_alphabetic())
                && chars.all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '+' | '-' | '.'))
        }
        _ => false,
    }
}

/// Textual recovery path: strip any `scheme://`, keep the authority up to
/// the first path/query/fragment separator, drop credentials and port.
fn fallback_hostname(link: &str) -> String {
    let rest = match link.find("://") {
        Some(pos) => &link[pos + 3..],
        None => link,
    };
    let rest = rest.strip_prefix("//").unwrap_or(rest);
    let authority = rest
        .split(['/', '?', '#'])
        .next()
        .unwrap_or("");
    let host = authority.rsplit('@').next().unwrap_or(authority);
    host.split(':').next().unwrap_or(host).to_string()
}

/// Build the favicon node for a link at the given display size.
///
/// Resolves the hostname and points an `<img>` at the favicon service,
/// requesting 64px for 1x and 128px for high-density displays. An
/// unresolvable hostname gets the neutral circular placeholder instead.
pub fn favicon_node(link: &str, display_px: u32, service_base: &str) -> Node {
    let size_style = format!(
        "width:{display_px}px;height:{display_px}px;border-radius:50%;"
    );
    let hostname = extract_hostname(link);
    if hostname.is_empty() {
        let data_uri = format!(
            "data:image/svg+xml;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(PLACEHOLDER_SVG)
        );
        return Element::new("img")
            .class("favicon")
            .class("favicon-placeholder")
            .attr("src", data_uri)
            .attr("alt", "")
            .attr("style", size_style)
            .into();
    }

    let domain: String = url::form_urlencoded::byte_serialize(hostname.as_bytes()).collect();
    Element::new("img")
        .class("favicon")
        .attr("src", format!("{service_base}?domain={domain}&sz=64"))
        .attr(
            "srcset",
            format!("{service_base}?domain={domain}&sz=128 2x"),
        )
        .attr("alt", "Favicon")
        .attr("style", size_style)
        .into()
}
