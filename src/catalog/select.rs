//! Candidate filtering, ranking and choosing.

use dialoguer::theme::ColorfulTheme;
use dialoguer::Select;
use strsim::levenshtein;

use crate::error::{PreviewError, Result};

use super::{Album, Chooser, ReleaseType};

/// The artist half of an `Artist - Title` query.
fn artist_part(query: &str) -> &str {
    query.split(" - ").next().unwrap_or(query).trim()
}

/// Keep releases by the queried artist, optionally of one type only.
pub fn filter_candidates(
    query: &str,
    albums: Vec<Album>,
    release_type: Option<ReleaseType>,
) -> Vec<Album> {
    let artist = artist_part(query).to_lowercase();
    albums
        .into_iter()
        .filter(|a| release_type.map_or(true, |t| a.album_type == t))
        .filter(|a| a.artist.to_lowercase() == artist)
        .collect()
}

/// Order candidates best first: closest to the query by edit distance, then newest, then
/// singles before albums before compilations.
pub fn rank(query: &str, candidates: Vec<Album>) -> Vec<Album> {
    let mut scored: Vec<(usize, Album)> = candidates
        .into_iter()
        .map(|a| (levenshtein(query, &a.display_name()), a))
        .collect();
    scored.sort_by(|(da, a), (db, b)| {
        da.cmp(db)
            .then_with(|| b.release_date.cmp(&a.release_date))
            .then_with(|| a.album_type.preference().cmp(&b.album_type.preference()))
    });
    scored.into_iter().map(|(_, album)| album).collect()
}

/// Picks the best ranked candidate without asking.
#[derive(Debug, Clone, Copy, Default)]
pub struct RankedChooser;

impl Chooser for RankedChooser {
    fn choose(&self, query: &str, candidates: Vec<Album>) -> Result<Album> {
        rank(query, candidates)
            .into_iter()
            .next()
            .ok_or_else(|| PreviewError::catalog("no candidates to choose from"))
    }
}

/// Asks on the terminal when more than one candidate remains.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptChooser;

impl Chooser for PromptChooser {
    fn choose(&self, query: &str, candidates: Vec<Album>) -> Result<Album> {
        let mut ranked = rank(query, candidates);
        if ranked.len() <= 1 {
            return ranked
                .pop()
                .ok_or_else(|| PreviewError::catalog("no candidates to choose from"));
        }

        let items: Vec<String> = ranked.iter().map(describe).collect();
        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Which release is '{}'?", query))
            .default(0)
            .items(&items)
            .interact()
            .map_err(|e| PreviewError::catalog(format!("selection aborted: {}", e)))?;

        Ok(ranked.swap_remove(selection))
    }
}

fn describe(album: &Album) -> String {
    format!(
        "{} ({}, {})",
        album.display_name(),
        album.album_type,
        album.release_date
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::album;
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rank_counts_characters_not_bytes() {
        // one Cyrillic letter differs; a byte count would see two edits
        let ranked = rank(
            "Океан Ельзи - Обійми",
            vec![
                album("Океан Ельзи", "Обійми!!", ReleaseType::Single, "2020"),
                album("Океан Ельзи", "Обiйми", ReleaseType::Single, "2010"),
            ],
        );
        assert_eq!(ranked[0].name, "Обiйми");
    }

    #[test]
    fn test_filter_by_artist_and_type() {
        let albums = vec![
            album("Okean Elzy", "Zemlya", ReleaseType::Album, "2013-03-01"),
            album("OKEAN ELZY", "Obijmy", ReleaseType::Single, "2021-01-01"),
            album("Okean Elzy Tribute", "Covers", ReleaseType::Compilation, "2015-01-01"),
        ];

        let all = filter_candidates("okean elzy - zemlya", albums.clone(), None);
        assert_eq!(all.len(), 2);

        let singles = filter_candidates("Okean Elzy - Zemlya", albums, Some(ReleaseType::Single));
        assert_eq!(singles.len(), 1);
        assert_eq!(singles[0].name, "Obijmy");
    }

    #[test]
    fn test_query_without_separator_is_all_artist() {
        let albums = vec![album("Nirvana", "Nevermind", ReleaseType::Album, "1991")];
        assert_eq!(filter_candidates("Nirvana", albums.clone(), None).len(), 1);
        assert_eq!(filter_candidates("Nirv", albums, None).len(), 0);
    }

    #[test]
    fn test_rank_prefers_closest_then_newest_then_single() {
        let query = "Band - Song";
        let ranked = rank(
            query,
            vec![
                album("Band", "Song", ReleaseType::Album, "2020-01-01"),
                album("Band", "Something Else", ReleaseType::Single, "2024-01-01"),
                album("Band", "Song", ReleaseType::Single, "2020-01-01"),
                album("Band", "Song", ReleaseType::Compilation, "2022-05-05"),
            ],
        );

        let order: Vec<String> = ranked
            .iter()
            .map(|a| format!("{} {} {}", a.name, a.album_type, a.release_date))
            .collect();
        assert_snapshot!(order.join("\n"), @r###"
        Song compilation 2022-05-05
        Song single 2020-01-01
        Song album 2020-01-01
        Something Else single 2024-01-01
        "###);
    }

    #[test]
    fn test_ranked_chooser_takes_first() {
        let chosen = RankedChooser
            .choose(
                "Band - Song",
                vec![
                    album("Band", "Songs", ReleaseType::Album, "2020"),
                    album("Band", "Song", ReleaseType::Album, "2019"),
                ],
            )
            .unwrap();
        assert_eq!(chosen.name, "Song");
        assert!(RankedChooser.choose("x", vec![]).is_err());
    }

    #[test]
    fn test_prompt_chooser_skips_prompt_for_single_candidate() {
        let only = album("Band", "Song", ReleaseType::Single, "2020");
        let chosen = PromptChooser.choose("Band - Song", vec![only.clone()]).unwrap();
        assert_eq!(chosen, only);
    }
}
