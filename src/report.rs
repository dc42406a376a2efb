use crate::duplicates::find_duplicates;
use crate::resolve::{parse_playlist_id, InvalidReference};
use crate::spotify::{fetch_playlist_tracks, PlaylistSource, SpotifyError};
use crate::types::TrackEntry;
use std::fmt::Write;
use tracing::info;

#[derive(Debug)]
pub struct Report {
    pub duplicates: Vec<TrackEntry>,
    pub tracks_scanned: usize,
}

#[derive(Debug)]
pub enum ReportError {
    InvalidReference(InvalidReference),
    Spotify(SpotifyError),
}

impl std::fmt::Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportError::InvalidReference(e) => write!(f, "{}", e),
            ReportError::Spotify(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ReportError {}

impl From<InvalidReference> for ReportError {
    fn from(e: InvalidReference) -> Self {
        ReportError::InvalidReference(e)
    }
}

impl From<SpotifyError> for ReportError {
    fn from(e: SpotifyError) -> Self {
        ReportError::Spotify(e)
    }
}

/// Parses the reference, fetches the playlist and finds duplicate tracks.
/// An invalid reference fails before any request is made.
pub async fn run<S: PlaylistSource>(source: &S, reference: &str) -> Result<Report, ReportError> {
    let playlist_id = parse_playlist_id(reference.trim())?;
    info!("Scanning playlist {}", playlist_id);

    let tracks = fetch_playlist_tracks(source, &playlist_id).await?;
    let duplicates = find_duplicates(&tracks);
    info!("Found {} duplicate(s)", duplicates.len());

    Ok(Report {
        duplicates,
        tracks_scanned: tracks.len(),
    })
}

/// Renders the outcome of a run as the text printed to stdout.
pub fn render(outcome: &Result<Report, ReportError>) -> String {
    let mut out = String::new();
    match outcome {
        Ok(report) if report.duplicates.is_empty() => {
            out.push_str("\n No duplicate tracks found!\n");
        }
        Ok(report) => {
            out.push_str("\n Duplicate Tracks:\n");
            for track in &report.duplicates {
                let _ = writeln!(out, "{}", track);
            }
            let _ = writeln!(out, "\n Total duplicate tracks: {}", report.duplicates.len());
        }
        Err(e) => {
            let _ = writeln!(out, "Error: {}", e);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PlaylistPage;
    use std::cell::Cell;

    struct StaticSource {
        tracks: Vec<TrackEntry>,
        fail: bool,
        calls: Cell<usize>,
    }

    impl StaticSource {
        fn new(tracks: Vec<TrackEntry>) -> Self {
            Self {
                tracks,
                fail: false,
                calls: Cell::new(0),
            }
        }
    }

    impl PlaylistSource for StaticSource {
        async fn fetch_page(
            &self,
            playlist_id: &str,
            _cursor: Option<&str>,
        ) -> Result<PlaylistPage, SpotifyError> {
            self.calls.set(self.calls.get() + 1);
            assert_eq!(playlist_id, "37i9dQZF1");
            if self.fail {
                return Err(SpotifyError::Auth("401 Unauthorized - Invalid access token".into()));
            }
            Ok(PlaylistPage {
                items: self.tracks.clone(),
                next: None,
            })
        }
    }

    fn t(title: &str, artists: &str) -> TrackEntry {
        TrackEntry::new(title, artists)
    }

    const URL: &str = "  https://open.example.com/playlist/37i9dQZF1?si=x  ";

    #[tokio::test]
    async fn reports_duplicates() {
        let source = StaticSource::new(vec![
            t("Foo", "A"),
            t("Bar", "B"),
            t("Foo", "a"),
            t("Foo", "A"),
        ]);

        let report = run(&source, URL).await.unwrap();
        assert_eq!(report.duplicates, vec![t("Foo", "A")]);
        assert_eq!(report.tracks_scanned, 4);
    }

    #[tokio::test]
    async fn invalid_reference_makes_no_requests() {
        let source = StaticSource::new(vec![]);
        let err = run(&source, "https://open.spotify.com/album/xyz").await.unwrap_err();
        assert!(matches!(err, ReportError::InvalidReference(_)));
        assert_eq!(source.calls.get(), 0);
    }

    #[tokio::test]
    async fn fetch_failure_is_reported() {
        let mut source = StaticSource::new(vec![]);
        source.fail = true;
        let outcome = run(&source, URL).await;
        assert_eq!(
            render(&outcome),
            "Error: Auth error: 401 Unauthorized - Invalid access token\n"
        );
    }

    #[test]
    fn render_duplicates() {
        let outcome = Ok(Report {
            duplicates: vec![t("Foo", "A"), t("Duet", "X, Y")],
            tracks_scanned: 10,
        });
        assert_eq!(
            render(&outcome),
            "\n Duplicate Tracks:\nFoo - A\nDuet - X, Y\n\n Total duplicate tracks: 2\n"
        );
    }

    #[test]
    fn render_no_duplicates() {
        let outcome = Ok(Report {
            duplicates: vec![],
            tracks_scanned: 3,
        });
        assert_eq!(render(&outcome), "\n No duplicate tracks found!\n");
    }

    #[test]
    fn render_invalid_reference() {
        let outcome = Err(ReportError::InvalidReference(InvalidReference));
        assert_eq!(render(&outcome), "Error: Invalid Spotify playlist URL.\n");
    }
}
