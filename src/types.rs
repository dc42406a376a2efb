use serde::Deserialize;
use std::fmt;

/// A playlist entry reduced to what duplicate detection compares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackEntry {
    pub title: String,
    /// Artist names joined with ", " in API order.
    pub artists: String,
}

impl TrackEntry {
    pub fn new(title: impl Into<String>, artists: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artists: artists.into(),
        }
    }
}

impl fmt::Display for TrackEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.title, self.artists)
    }
}

/// One page of entries plus the cursor for the next page, if any.
#[derive(Debug, Default)]
pub struct PlaylistPage {
    pub items: Vec<TrackEntry>,
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistItemsResponse {
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
    pub next: Option<String>,
}

// Newer API responses carry the playable object under `item`, older ones under `track`.
#[derive(Debug, Deserialize)]
pub struct PlaylistItem {
    item: Option<PlayableObject>,
    track: Option<PlayableObject>,
}

impl PlaylistItem {
    pub fn playable(&self) -> Option<&PlayableObject> {
        self.item.as_ref().or(self.track.as_ref())
    }
}

#[derive(Debug, Deserialize)]
pub struct PlayableObject {
    #[serde(rename = "type")]
    pub object_type: Option<String>,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
}

#[derive(Debug, Deserialize)]
pub struct ArtistRef {
    pub name: String,
}

impl PlayableObject {
    pub fn is_track(&self) -> bool {
        // Missing type is treated as a track; only explicit non-track objects are dropped
        self.object_type.as_deref().map_or(true, |t| t == "track")
    }

    pub fn to_entry(&self) -> TrackEntry {
        let artists = self
            .artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        TrackEntry::new(self.name.clone(), artists)
    }
}

impl PlaylistItemsResponse {
    /// Converts a raw page, skipping items with no track data or non-track objects.
    pub fn into_page(self) -> PlaylistPage {
        let items = self
            .items
            .iter()
            .filter_map(|item| match item.playable() {
                Some(obj) if obj.is_track() => Some(obj.to_entry()),
                Some(obj) => {
                    tracing::debug!("Skipping non-track item: {}", obj.name);
                    None
                }
                None => {
                    tracing::debug!("Skipping item without track data");
                    None
                }
            })
            .collect();

        PlaylistPage {
            items,
            next: self.next,
        }
    }
}
