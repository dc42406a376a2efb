use crate::types::TrackEntry;
use std::collections::HashMap;

/// Count at which an entry is reported.
const DUPLICATE_THRESHOLD: u32 = 2;

/// Returns the first-seen entry of every (title, artist) pair that occurs at
/// least twice, compared case-insensitively, in the order each pair first
/// reached its second occurrence.
pub fn find_duplicates(tracks: &[TrackEntry]) -> Vec<TrackEntry> {
    let mut counts: HashMap<(String, String), (u32, usize)> = HashMap::new();
    let mut duplicates = Vec::new();

    for (idx, track) in tracks.iter().enumerate() {
        let key = (track.title.to_lowercase(), track.artists.to_lowercase());
        let (count, first_idx) = counts.entry(key).or_insert((0, idx));
        *count += 1;
        if *count == DUPLICATE_THRESHOLD {
            duplicates.push(tracks[*first_idx].clone());
        }
    }

    duplicates
}
