//! The pattern library: saved patterns, a search index and paged listings.
//!
//! # Index
//!
//! Every saved pattern emits one index row per search key: the empty key
//! `""`, its name, its founder, and each of its tags. Rows sort by
//! `(key, id)`. A blank search walks the `""` rows, which list every pattern
//! exactly once; any other search walks the rows whose key starts with the
//! trimmed search text.
//!
//! # Paging
//!
//! A page asks the store for `page_size + 1` rows. If the extra row exists it
//! is dropped from the page and its `(key, id)` becomes the continuation
//! cursor, from which the next page starts (inclusive).

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;

use petri_types::{PatternDocument, PatternId, TagCount};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{LibraryError, PatternError};
use crate::pattern::Pattern;

/// Default number of patterns per page.
pub const DEFAULT_PAGE_SIZE: usize = 6;

/// Position of an index row; a page resumes from here, inclusive.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cursor {
    /// The index key of the row.
    pub key: String,
    /// The pattern the row points at.
    pub id: PatternId,
}

/// One row of the search index, with the document it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRow {
    /// The index key.
    pub key: String,
    /// The pattern identity.
    pub id: PatternId,
    /// The stored document.
    pub document: PatternDocument,
}

impl IndexRow {
    /// The cursor pointing at this row.
    pub fn cursor(&self) -> Cursor {
        Cursor {
            key: self.key.clone(),
            id: self.id,
        }
    }
}

/// One page of library results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternPage {
    /// The patterns on this page, in index order.
    pub patterns: Vec<Pattern>,
    /// Where the next page starts, if there is one.
    pub continuation: Option<Cursor>,
}

/// Storage backend for saved patterns.
///
/// The in-process [`MemoryStore`] is the reference implementation; a
/// document-store client implements the same trait out of process.
pub trait PatternStore {
    /// Save a document and return the identity it is stored under.
    ///
    /// A document without an identity gets a fresh one.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError`] if the document cannot be stored.
    fn save(&mut self, document: PatternDocument) -> Result<PatternId, LibraryError>;

    /// Fetch a stored document by identity.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError`] if the store cannot be read.
    fn fetch(&self, id: PatternId) -> Result<Option<PatternDocument>, LibraryError>;

    /// Read up to `limit` index rows matching `search`, starting at `from`.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError`] if the store cannot be read.
    fn rows(
        &self,
        search: &str,
        from: Option<&Cursor>,
        limit: usize,
    ) -> Result<Vec<IndexRow>, LibraryError>;

    /// Count index rows per key for keys matching `search`.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError`] if the store cannot be read.
    fn key_counts(&self, search: &str) -> Result<Vec<TagCount>, LibraryError>;
}

/// The search keys a document is indexed under.
pub fn index_keys(document: &PatternDocument) -> BTreeSet<String> {
    let mut keys = BTreeSet::new();
    keys.insert(String::new());
    if !document.name.is_empty() {
        keys.insert(document.name.clone());
    }
    if !document.founder.is_empty() {
        keys.insert(document.founder.clone());
    }
    keys.extend(document.tags.iter().cloned());
    keys
}

/// Whether an index key falls in the range searched by `search`.
pub fn key_matches(key: &str, search: &str) -> bool {
    if search.is_empty() {
        key.is_empty()
    } else {
        key.starts_with(search)
    }
}

/// In-memory pattern store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// Stored documents by identity.
    documents: BTreeMap<PatternId, PatternDocument>,
    /// The search index, ordered by `(key, id)`.
    index: BTreeSet<(String, PatternId)>,
}

impl MemoryStore {
    /// Create an empty store.
    pub const fn new() -> Self {
        Self {
            documents: BTreeMap::new(),
            index: BTreeSet::new(),
        }
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the store holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Index entries from the first one at or after `start` that match `search`.
    fn matching_from<'a>(
        &'a self,
        search: &'a str,
        start: (String, PatternId),
    ) -> impl Iterator<Item = &'a (String, PatternId)> + 'a {
        self.index
            .range((Bound::Included(start), Bound::Unbounded))
            .take_while(move |(key, _)| key_matches(key, search))
    }
}

impl PatternStore for MemoryStore {
    fn save(&mut self, mut document: PatternDocument) -> Result<PatternId, LibraryError> {
        let id = match document.id {
            Some(id) if self.documents.contains_key(&id) => {
                return Err(LibraryError::DuplicatePattern(id));
            }
            Some(id) => id,
            None => PatternId::new(),
        };
        document.id = Some(id);

        for key in index_keys(&document) {
            self.index.insert((key, id));
        }
        self.documents.insert(id, document);
        Ok(id)
    }

    fn fetch(&self, id: PatternId) -> Result<Option<PatternDocument>, LibraryError> {
        Ok(self.documents.get(&id).cloned())
    }

    fn rows(
        &self,
        search: &str,
        from: Option<&Cursor>,
        limit: usize,
    ) -> Result<Vec<IndexRow>, LibraryError> {
        let start = from.map_or_else(
            || (search.to_owned(), PatternId::from(Uuid::nil())),
            |cursor| (cursor.key.clone(), cursor.id),
        );

        let mut rows = Vec::new();
        for (key, id) in self.matching_from(search, start).take(limit) {
            let document = self
                .documents
                .get(id)
                .cloned()
                .ok_or_else(|| LibraryError::Store {
                    message: format!("index row {key:?} points at missing pattern {id}"),
                })?;
            rows.push(IndexRow {
                key: key.clone(),
                id: *id,
                document,
            });
        }
        Ok(rows)
    }

    fn key_counts(&self, search: &str) -> Result<Vec<TagCount>, LibraryError> {
        let start = (search.to_owned(), PatternId::from(Uuid::nil()));
        let mut counts: Vec<TagCount> = Vec::new();
        for (key, _) in self.matching_from(search, start) {
            match counts.last_mut() {
                Some(last) if last.tag == *key => last.count = last.count.saturating_add(1),
                _ => counts.push(TagCount {
                    tag: key.clone(),
                    count: 1,
                }),
            }
        }
        Ok(counts)
    }
}

/// Saved patterns with search and paging on top of a [`PatternStore`].
#[derive(Debug, Clone)]
pub struct PatternLibrary<S = MemoryStore> {
    /// The backing store.
    store: S,
    /// Patterns per page, at least 1.
    page_size: usize,
}

impl Default for PatternLibrary<MemoryStore> {
    fn default() -> Self {
        Self::new(MemoryStore::new(), DEFAULT_PAGE_SIZE)
    }
}

impl<S: PatternStore> PatternLibrary<S> {
    /// Create a library over `store`. A page size of 0 is raised to 1.
    pub fn new(store: S, page_size: usize) -> Self {
        Self {
            store,
            page_size: page_size.max(1),
        }
    }

    /// Patterns per page.
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// The backing store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Save a pattern that has not been saved before and record its identity.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::IdentityAlreadyAssigned`] (wrapped) if the
    /// pattern already carries an identity, or the store's error if saving
    /// fails.
    pub fn insert(&mut self, pattern: &mut Pattern) -> Result<PatternId, LibraryError> {
        if let Some(existing) = pattern.id() {
            return Err(PatternError::IdentityAlreadyAssigned { existing }.into());
        }
        let id = self.store.save(pattern.document())?;
        pattern.assign_identity(id)?;
        info!(%id, name = pattern.name(), side = pattern.side(), "Pattern saved");
        Ok(id)
    }

    /// Save every pattern in `patterns`, returning how many were saved.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first insert error.
    pub fn insert_all(&mut self, patterns: &mut [Pattern]) -> Result<usize, LibraryError> {
        let mut saved: usize = 0;
        for pattern in patterns.iter_mut() {
            self.insert(pattern)?;
            saved = saved.saturating_add(1);
        }
        Ok(saved)
    }

    /// Fetch a saved pattern by identity.
    ///
    /// # Errors
    ///
    /// Returns the store's error if it cannot be read.
    pub fn get(&self, id: PatternId) -> Result<Option<Pattern>, LibraryError> {
        Ok(self
            .store
            .fetch(id)?
            .map(|document| Pattern::from_document(&document)))
    }

    /// One page of patterns matching `tag`, starting at `continuation`.
    ///
    /// # Errors
    ///
    /// Returns the store's error if it cannot be read.
    pub fn patterns(
        &self,
        continuation: Option<&Cursor>,
        tag: &str,
    ) -> Result<PatternPage, LibraryError> {
        let search = tag.trim();
        let mut rows = self
            .store
            .rows(search, continuation, self.page_size.saturating_add(1))?;

        let next = if rows.len() > self.page_size {
            rows.pop().as_ref().map(IndexRow::cursor)
        } else {
            None
        };

        debug!(
            search,
            returned = rows.len(),
            has_next = next.is_some(),
            "Pattern page read"
        );

        Ok(PatternPage {
            patterns: rows
                .iter()
                .map(|row| Pattern::from_document(&row.document))
                .collect(),
            continuation: next,
        })
    }

    /// Search keys matching `tag`, with how many patterns carry each.
    ///
    /// # Errors
    ///
    /// Returns the store's error if it cannot be read.
    pub fn tags(&self, tag: &str) -> Result<Vec<TagCount>, LibraryError> {
        self.store.key_counts(tag.trim())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::pattern::PatternInfo;
    use crate::tags::parse_tags;

    fn tagged(name: &str, founder: &str, tags: &str) -> Pattern {
        let info = PatternInfo::named(name)
            .with_founder(founder)
            .with_tags(parse_tags(tags));
        Pattern::new("OO\nOO", info)
    }

    fn library_with(count: usize, page_size: usize) -> PatternLibrary {
        let mut library = PatternLibrary::new(MemoryStore::new(), page_size);
        for n in 0..count {
            let mut pattern = tagged(&format!("p{n:02}"), "Conway", "still");
            library.insert(&mut pattern).unwrap();
        }
        library
    }

    #[test]
    fn insert_assigns_identity_once() {
        let mut library = PatternLibrary::default();
        let mut pattern = tagged("block", "Conway", "still, common");
        let id = library.insert(&mut pattern).unwrap();
        assert_eq!(pattern.identify().unwrap(), id);

        let again = library.insert(&mut pattern);
        assert!(matches!(
            again,
            Err(LibraryError::Pattern {
                source: PatternError::IdentityAlreadyAssigned { .. }
            })
        ));
        assert_eq!(library.store().len(), 1);
    }

    #[test]
    fn get_returns_saved_pattern() {
        let mut library = PatternLibrary::default();
        let mut pattern = tagged("block", "Conway", "still");
        let id = library.insert(&mut pattern).unwrap();
        let fetched = library.get(id).unwrap().unwrap();
        assert_eq!(fetched, pattern);
        assert!(library.get(PatternId::new()).unwrap().is_none());
    }

    #[test]
    fn index_keys_cover_name_founder_tags() {
        let document = tagged("glider", "Guy", "spaceship, glider").document();
        let keys: Vec<String> = index_keys(&document).into_iter().collect();
        assert_eq!(keys, vec!["", "Guy", "glider", "spaceship"]);
    }

    #[test]
    fn blank_search_pages_every_pattern_once() {
        let library = library_with(13, 6);

        let first = library.patterns(None, "  ").unwrap();
        assert_eq!(first.patterns.len(), 6);
        let cursor = first.continuation.clone().unwrap();

        let second = library.patterns(Some(&cursor), "").unwrap();
        assert_eq!(second.patterns.len(), 6);
        let cursor = second.continuation.clone().unwrap();

        let third = library.patterns(Some(&cursor), "").unwrap();
        assert_eq!(third.patterns.len(), 1);
        assert!(third.continuation.is_none());

        let mut seen: BTreeSet<PatternId> = BTreeSet::new();
        for page in [&first, &second, &third] {
            for pattern in &page.patterns {
                assert!(seen.insert(pattern.identify().unwrap()));
            }
        }
        assert_eq!(seen.len(), 13);
    }

    #[test]
    fn exact_page_has_no_continuation() {
        let library = library_with(6, 6);
        let page = library.patterns(None, "").unwrap();
        assert_eq!(page.patterns.len(), 6);
        assert!(page.continuation.is_none());
    }

    #[test]
    fn search_matches_key_prefix() {
        let mut library = PatternLibrary::default();
        library.insert(&mut tagged("glider", "Guy", "spaceship")).unwrap();
        library.insert(&mut tagged("blinker", "Conway", "oscillator")).unwrap();
        library.insert(&mut tagged("lwss", "Conway", "spaceship")).unwrap();

        let page = library.patterns(None, "space").unwrap();
        let names: BTreeSet<&str> = page.patterns.iter().map(Pattern::name).collect();
        assert_eq!(names, BTreeSet::from(["glider", "lwss"]));

        let none = library.patterns(None, "zzz").unwrap();
        assert!(none.patterns.is_empty());
        assert!(none.continuation.is_none());
    }

    #[test]
    fn tag_counts_group_keys() {
        let mut library = PatternLibrary::default();
        library.insert(&mut tagged("glider", "Guy", "spaceship")).unwrap();
        library.insert(&mut tagged("lwss", "Conway", "spaceship")).unwrap();
        library.insert(&mut tagged("blinker", "Conway", "oscillator")).unwrap();

        let counts = library.tags("s").unwrap();
        assert_eq!(
            counts,
            vec![TagCount {
                tag: String::from("spaceship"),
                count: 2
            }]
        );

        let conway = library.tags("Con").unwrap();
        assert_eq!(conway.first().map(|c| c.count), Some(2));

        let all = library.tags("").unwrap();
        assert_eq!(
            all,
            vec![TagCount {
                tag: String::new(),
                count: 3
            }]
        );
    }

    #[test]
    fn store_rejects_duplicate_identity() {
        let mut store = MemoryStore::new();
        let document = tagged("block", "Conway", "").document();
        let id = store.save(document.clone()).unwrap();
        let duplicate = PatternDocument {
            id: Some(id),
            ..document
        };
        assert!(matches!(
            store.save(duplicate),
            Err(LibraryError::DuplicatePattern(dup)) if dup == id
        ));
    }

    #[test]
    fn cursor_serializes() {
        let cursor = Cursor {
            key: String::from("still"),
            id: PatternId::new(),
        };
        let json = serde_json::to_string(&cursor).unwrap();
        let back: Cursor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cursor);
    }
}
