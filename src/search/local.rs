use crate::library::Track;

/// Library tracks whose title or artist contains `query`, ignoring case.
pub fn local_matches(library: &[Track], query: &str) -> Vec<Track> {
    let needle = query.to_lowercase();
    library
        .iter()
        .filter(|t| {
            t.title.to_lowercase().contains(&needle) || t.artist.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::TrackId;

    fn t(id: &str, title: &str, artist: &str) -> Track {
        Track {
            id: TrackId::from(id),
            title: title.into(),
            artist: artist.into(),
            genre: String::new(),
            duration_label: None,
            image_url: String::new(),
            audio_url: String::new(),
        }
    }

    #[test]
    fn matches_title_case_insensitively() {
        let library = vec![t("1", "Sunrise", "A"), t("2", "Night", "B")];
        let found = local_matches(&library, "sun");
        assert_eq!(found, vec![library[0].clone()]);
    }

    #[test]
    fn matches_artist_and_keeps_library_order() {
        let library = vec![
            t("1", "One", "Ilaiyaraaja"),
            t("2", "Two", "Someone"),
            t("3", "Raja Raja", "X"),
        ];
        let found = local_matches(&library, "RAJA");
        let ids: Vec<_> = found.iter().map(|t| t.id.to_string()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn no_match_is_empty() {
        let library = vec![t("1", "Sunrise", "A")];
        assert!(local_matches(&library, "zzz").is_empty());
    }
}
