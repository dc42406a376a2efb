use regex::Regex;
use std::sync::LazyLock;

static PLAYLIST_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"playlist/([a-zA-Z0-9]+)").expect("Invalid playlist regex")
});

/// The reference did not contain a `playlist/<id>` segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidReference;

impl std::fmt::Display for InvalidReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid Spotify playlist URL.")
    }
}

impl std::error::Error for InvalidReference {}

/// Extracts the playlist ID from a playlist URL such as
/// `https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M?si=...`.
pub fn parse_playlist_id(reference: &str) -> Result<String, InvalidReference> {
    PLAYLIST_REGEX
        .captures(reference)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or(InvalidReference)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_playlist_id_extracts_id() {
        assert_eq!(
            parse_playlist_id("https://open.example.com/playlist/37i9dQZF1"),
            Ok("37i9dQZF1".to_string())
        );
        assert_eq!(
            parse_playlist_id("https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M?si=abc123"),
            Ok("37i9dQZF1DXcBWIGoYBM5M".to_string())
        );
    }

    #[test]
    fn parse_playlist_id_takes_first_match() {
        assert_eq!(
            parse_playlist_id("see playlist/first and playlist/second"),
            Ok("first".to_string())
        );
        assert_eq!(
            parse_playlist_id("https://open.spotify.com/user/x/playlist/-/playlist/abc123"),
            Ok("abc123".to_string())
        );
    }

    #[test]
    fn parse_playlist_id_rejects_other_references() {
        for input in [
            "",
            "https://open.spotify.com/track/3n3Ppam7vgaVa1iaRUc9Lp",
            "spotify:playlist:37i9dQZF1DXcBWIGoYBM5M",
            "https://open.spotify.com/playlist/",
            "playlist/-_-",
        ] {
            assert_eq!(parse_playlist_id(input), Err(InvalidReference), "{input}");
        }
    }

    #[test]
    fn invalid_reference_message() {
        assert_eq!(InvalidReference.to_string(), "Invalid Spotify playlist URL.");
    }
}
