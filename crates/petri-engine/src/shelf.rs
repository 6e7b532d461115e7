//! Startup wiring for the pattern library.

use petri_core::config::LibraryConfig;
use petri_patterns::{
    Cursor, LibraryError, MemoryStore, Pattern, PatternLibrary, seed_pattern, seed_patterns,
};
use tracing::{debug, info};

/// Build the in-memory library, saving the seed shelf if configured.
pub fn build_library(config: &LibraryConfig) -> Result<PatternLibrary, LibraryError> {
    let mut library = PatternLibrary::new(MemoryStore::new(), config.page_size);
    if config.load_seed_patterns {
        let mut shelf = seed_patterns();
        let saved = library.insert_all(&mut shelf)?;
        info!(saved, page_size = library.page_size(), "Seed shelf loaded");
    }

    let tags = library.tags("")?;
    debug!(
        patterns = tags.first().map_or(0, |all| all.count),
        "Pattern library ready"
    );
    Ok(library)
}

/// Find a pattern by exact name (ignoring case), walking the library's
/// name index page by page, then falling back to the seed shelf.
pub fn find_pattern(library: &PatternLibrary, name: &str) -> Result<Option<Pattern>, LibraryError> {
    let wanted = name.trim();
    let mut cursor: Option<Cursor> = None;
    loop {
        let page = library.patterns(cursor.as_ref(), wanted)?;
        if let Some(found) = page
            .patterns
            .into_iter()
            .find(|pattern| pattern.name().eq_ignore_ascii_case(wanted))
        {
            return Ok(Some(found));
        }
        match page.continuation {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }
    Ok(seed_pattern(wanted))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config(page_size: usize, load_seed_patterns: bool) -> LibraryConfig {
        LibraryConfig {
            page_size,
            load_seed_patterns,
        }
    }

    #[test]
    fn seed_shelf_is_saved() {
        let library = build_library(&config(6, true)).unwrap();
        let page = library.patterns(None, "").unwrap();
        assert_eq!(page.patterns.len(), 6);
        assert!(page.continuation.is_none());
        assert!(page.patterns.iter().all(|pattern| pattern.id().is_some()));
    }

    #[test]
    fn finds_saved_pattern_across_pages() {
        let library = build_library(&config(1, true)).unwrap();
        let found = find_pattern(&library, "unix").unwrap().unwrap();
        assert_eq!(found.name(), "unix");
        assert!(found.id().is_some());
    }

    #[test]
    fn falls_back_to_seed_shelf() {
        let library = build_library(&config(6, false)).unwrap();
        let found = find_pattern(&library, "canoe").unwrap().unwrap();
        assert!(found.id().is_none());
        assert!(find_pattern(&library, "no such pattern").unwrap().is_none());
    }
}
