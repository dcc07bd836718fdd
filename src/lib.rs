//! Linkpage Engine
//!
//! A headless rendering engine for personal "link-in-bio" pages: given a
//! user profile document (display links, optional bio, optional tags,
//! optional GitHub username) and viewport metrics, it builds a structured
//! markup tree with the link buttons, bio blurb, colored tag pills and a
//! GitHub profile badge, and keeps the layout responsive to viewport size
//! changes.
//!
//! # Features
//!
//! - **Pure pipeline**: document + size tier in, markup tree out; escaping
//!   is centralized in the serializer and every render pass replaces its
//!   region wholesale
//! - **Swappable sources**: the user document and the external profile come
//!   through small source traits; HTTP implementations live behind the
//!   `remote` feature (default)
//!
//! # Example
//!
//! ```no_run
//! use linkpage::{PageConfig, RefreshController, Viewport};
//! use linkpage::fetch::{HttpDocumentSource, HttpProfileSource};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PageConfig {
//!     viewport: Viewport { width: 800, height: 600 },
//!     ..Default::default()
//! };
//!
//! let documents = HttpDocumentSource::new(&config, "https://example.com/user.json")?;
//! let profiles = HttpProfileSource::new(&config)?;
//! let mut controller = RefreshController::new(config, documents, profiles);
//! controller.load()?;
//! println!("{}", controller.html());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod controller;
pub mod document;
pub mod favicon;
pub mod fetch;
pub mod markup;
pub mod render;
pub mod sanitize;
pub mod sizing;

pub use controller::{RefreshController, SessionState};
pub use document::{Entry, ExternalProfile, Tag, UserDocument};
pub use render::PageTree;
pub use sizing::{compute_size_tier, SizeTier};

/// Configuration for a page rendering session
///
/// The defaults are chosen to match the public services the original page
/// talks to: GitHub's users API for the profile badge and Google's favicon
/// service for link icons.
///
/// # Examples
///
/// ```
/// let config = linkpage::PageConfig::default();
/// assert!(config.profile_api_base.contains("api.github.com"));
/// ```
#[derive(Debug, Clone)]
pub struct PageConfig {
    /// User agent string to send with requests
    pub user_agent: String,
    /// Viewport dimensions driving the responsive size policy
    pub viewport: Viewport,
    /// Timeout for fetches in milliseconds
    pub timeout_ms: u64,
    /// Base URL of the profile API; the username is appended as a path segment
    pub profile_api_base: String,
    /// Base URL of the favicon service, parameterized by hostname and size
    pub favicon_service: String,
    /// Quiet period before a resize burst triggers a re-render
    pub resize_debounce_ms: u64,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (compatible) linkpage/0.1".to_string(),
            viewport: Viewport::default(),
            timeout_ms: 10000,
            profile_api_base: "https://api.github.com/users".to_string(),
            favicon_service: "https://www.google.com/s2/favicons".to_string(),
            resize_debounce_ms: 150,
        }
    }
}

/// Viewport dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}
