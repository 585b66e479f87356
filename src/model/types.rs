//! Core catalog and queue data types

use serde::{Deserialize, Serialize};

/// What kind of catalog entry an item is
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Song,
    Album,
    Artist,
    Playlist,
}

impl ItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Song => "song",
            ItemKind::Album => "album",
            ItemKind::Artist => "artist",
            ItemKind::Playlist => "playlist",
        }
    }
}

/// A single entry fetched from the remote catalog; immutable once fetched
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub kind: ItemKind,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub artwork_url: Option<String>,
    #[serde(default)]
    pub explicit: bool,
}

/// Opaque paging cursor issued by the catalog service; never parsed,
/// only handed back on the next request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContinuationToken(pub String);

/// One page of catalog results
///
/// An empty page with no token terminates pagination; a page with items and
/// no token is the last page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub items: Vec<CatalogItem>,
    #[serde(default)]
    pub continuation: Option<ContinuationToken>,
}

impl Page {
    pub fn is_final(&self) -> bool {
        self.continuation.is_none()
    }
}

/// What a browse session is rooted at: the seed for its first page
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BrowseEndpoint {
    Album(String),
    Artist(String),
    Playlist(String),
    Home,
    Search(String),
}

impl BrowseEndpoint {
    /// Remote browse id for this endpoint, if it has one (search uses a query instead)
    pub fn browse_id(&self) -> Option<String> {
        match self {
            BrowseEndpoint::Album(id) => Some(format!("album/{}", id)),
            BrowseEndpoint::Artist(id) => Some(format!("artist/{}", id)),
            BrowseEndpoint::Playlist(id) => Some(format!("playlist/{}", id)),
            BrowseEndpoint::Home => Some("home".to_string()),
            BrowseEndpoint::Search(_) => None,
        }
    }
}

impl std::fmt::Display for BrowseEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BrowseEndpoint::Album(id) => write!(f, "album/{}", id),
            BrowseEndpoint::Artist(id) => write!(f, "artist/{}", id),
            BrowseEndpoint::Playlist(id) => write!(f, "playlist/{}", id),
            BrowseEndpoint::Home => write!(f, "home"),
            BrowseEndpoint::Search(query) => write!(f, "search?q={}", query),
        }
    }
}

/// Playback-scoped analogue of a browse endpoint: the seed song whose
/// "continue playback" listing feeds a lazy queue
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaybackEndpoint {
    pub seed_id: String,
}

/// A single fetch request against the catalog service
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PageRequest {
    Browse(BrowseEndpoint),
    Playback(PlaybackEndpoint),
    Continuation(ContinuationToken),
}

/// A catalog item resolved to playable form, with its position in the
/// presented queue order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueueItem {
    pub catalog: CatalogItem,
    pub media_uri: String,
    pub position: usize,
}

impl QueueItem {
    /// Resolve a catalog item to its stream-resolvable media reference
    pub fn resolve(catalog: CatalogItem, position: usize) -> Self {
        let media_uri = format!("tune:{}:{}", catalog.kind.as_str(), catalog.id);
        Self {
            catalog,
            media_uri,
            position,
        }
    }

    pub fn id(&self) -> &str {
        &self.catalog.id
    }
}
