//! Named square patterns of live and dead cells.
//!
//! A [`Pattern`] stores its cells as text rows over `O` (alive) and `.`
//! (dead); any other character reads as dead. Text is normalized once, at
//! construction, into a square block so that a pattern can be rotated in
//! place and stamped onto a grid without further shape checks.
//!
//! # Normalization
//!
//! Given `n` lines whose longest is `w` characters, the block becomes
//! `target = max(n, w)` on each side. Every line is padded on the right with
//! `.` to `target`, and blank lines are added above and below to reach
//! `target` rows. When the number of blank lines is odd, the extra one goes
//! on top.

use std::collections::BTreeSet;

use petri_grid::{GridError, ToroidalGrid};
use petri_types::{PatternDocument, PatternId, Region};

use crate::error::PatternError;

/// Character for a live cell.
pub const ALIVE_CHAR: char = 'O';

/// Character for a dead cell.
pub const DEAD_CHAR: char = '.';

/// Value given to descriptive fields that were not supplied.
pub const UNKNOWN: &str = "Unknown";

/// Optional descriptive fields supplied when a pattern is created.
///
/// Absent or empty fields resolve to [`UNKNOWN`] when the pattern is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternInfo {
    /// Display name.
    pub name: Option<String>,
    /// Where the pattern was found.
    pub source: Option<String>,
    /// Who found it.
    pub founder: Option<String>,
    /// When it was found, free text.
    pub found_date: Option<String>,
    /// Search tags.
    pub tags: BTreeSet<String>,
}

impl PatternInfo {
    /// Info carrying only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Set the source.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Set the founder.
    #[must_use]
    pub fn with_founder(mut self, founder: impl Into<String>) -> Self {
        self.founder = Some(founder.into());
        self
    }

    /// Set the discovery date.
    #[must_use]
    pub fn with_found_date(mut self, found_date: impl Into<String>) -> Self {
        self.found_date = Some(found_date.into());
        self
    }

    /// Replace the tags.
    #[must_use]
    pub fn with_tags(mut self, tags: BTreeSet<String>) -> Self {
        self.tags = tags;
        self
    }
}

/// A named, normalized square block of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    /// Store-assigned identity; set at most once.
    id: Option<PatternId>,
    /// Display name.
    name: String,
    /// Where the pattern was found.
    source: String,
    /// Who found it.
    founder: String,
    /// When it was found.
    found_date: String,
    /// Search tags.
    tags: BTreeSet<String>,
    /// Square rows of equal length.
    rows: Vec<String>,
}

impl Pattern {
    /// Build a pattern from raw text, normalizing it into a square block.
    pub fn new(text: &str, info: PatternInfo) -> Self {
        Self {
            id: None,
            name: resolve(info.name),
            source: resolve(info.source),
            founder: resolve(info.founder),
            found_date: resolve(info.found_date),
            tags: info.tags,
            rows: normalize(text),
        }
    }

    /// Build an anonymous pattern from raw text.
    pub fn from_text(text: &str) -> Self {
        Self::new(text, PatternInfo::default())
    }

    /// Rebuild a pattern from its stored document, keeping any identity.
    pub fn from_document(document: &PatternDocument) -> Self {
        let info = PatternInfo {
            name: Some(document.name.clone()),
            source: Some(document.source.clone()),
            founder: Some(document.founder.clone()),
            found_date: Some(document.found_date.clone()),
            tags: document.tags.iter().cloned().collect(),
        };
        let mut pattern = Self::new(&document.pattern, info);
        pattern.id = document.id;
        pattern
    }

    /// Read a square region of `grid` into an anonymous pattern.
    ///
    /// The region is read as-is, without wrapping: cells past the grid edge
    /// read as dead. Callers clip the region first (see
    /// [`Region::clip_to`]). A region of size 0 yields a single dead cell.
    pub fn from_region(grid: &ToroidalGrid, region: Region) -> Self {
        let size = grid.size();
        let rows: Vec<String> = (0..region.size)
            .map(|dy| {
                let y = region.y.saturating_add(dy);
                (0..region.size)
                    .map(|dx| {
                        let x = region.x.saturating_add(dx);
                        let alive = x < size
                            && y < size
                            && y.checked_mul(size)
                                .and_then(|row| row.checked_add(x))
                                .is_some_and(|index| grid.alive_at(index));
                        if alive { ALIVE_CHAR } else { DEAD_CHAR }
                    })
                    .collect()
            })
            .collect();
        Self::from_text(&rows.join("\n"))
    }

    /// The persistence document for this pattern.
    pub fn document(&self) -> PatternDocument {
        PatternDocument {
            id: self.id,
            name: self.name.clone(),
            pattern: self.text(),
            source: self.source.clone(),
            founder: self.founder.clone(),
            found_date: self.found_date.clone(),
            tags: self.tags.iter().cloned().collect(),
        }
    }

    /// The identity, if one has been assigned.
    pub const fn id(&self) -> Option<PatternId> {
        self.id
    }

    /// The identity assigned by the pattern store.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::NoIdentifierAssigned`] if the pattern has not
    /// been saved yet.
    pub const fn identify(&self) -> Result<PatternId, PatternError> {
        match self.id {
            Some(id) => Ok(id),
            None => Err(PatternError::NoIdentifierAssigned),
        }
    }

    /// Record the identity handed out by the pattern store.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::IdentityAlreadyAssigned`] if the pattern
    /// already carries an identity; it is left unchanged.
    pub const fn assign_identity(&mut self, id: PatternId) -> Result<(), PatternError> {
        if let Some(existing) = self.id {
            return Err(PatternError::IdentityAlreadyAssigned { existing });
        }
        self.id = Some(id);
        Ok(())
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Where the pattern was found.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Who found it.
    pub fn founder(&self) -> &str {
        &self.founder
    }

    /// When it was found.
    pub fn found_date(&self) -> &str {
        &self.found_date
    }

    /// Search tags.
    pub const fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// The normalized rows.
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Side length of the square block.
    pub fn side(&self) -> usize {
        self.rows.len()
    }

    /// The rows joined with newlines.
    pub fn text(&self) -> String {
        self.rows.join("\n")
    }

    /// Number of live cells.
    pub fn population(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.chars().filter(|&c| c == ALIVE_CHAR).count())
            .fold(0, usize::saturating_add)
    }

    /// Rotate the block a quarter turn in place.
    ///
    /// Output row `r` (counting from 1) is read down the column at distance
    /// `r` from the right edge, so four rotations restore the original rows.
    pub fn rotate(&mut self) {
        let cells: Vec<Vec<char>> = self.rows.iter().map(|row| row.chars().collect()).collect();
        let width = cells.first().map_or(0, Vec::len);

        self.rows = (1..=width)
            .map(|distance| {
                cells
                    .iter()
                    .map(|row| {
                        row.len()
                            .checked_sub(distance)
                            .and_then(|col| row.get(col))
                            .copied()
                            .unwrap_or(DEAD_CHAR)
                    })
                    .collect()
            })
            .collect();
    }

    /// Convert the block into a grid whose side equals the row count.
    ///
    /// # Errors
    ///
    /// Returns a [`GridError`] if the rows are not square. Patterns built
    /// through the constructors always are.
    pub fn to_grid(&self) -> Result<ToroidalGrid, GridError> {
        let cells: Vec<u8> = self
            .rows
            .iter()
            .flat_map(|row| row.chars().map(|c| u8::from(c == ALIVE_CHAR)))
            .collect();
        ToroidalGrid::from_cells(self.rows.len(), cells)
    }
}

/// Normalize raw pattern text into square rows.
///
/// Lines are split on `\n` (a trailing `\r` is dropped). The result always
/// holds at least one row, and applying it to its own joined output changes
/// nothing.
pub fn normalize(text: &str) -> Vec<String> {
    let lines: Vec<&str> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    let widest = lines
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);
    let target = lines.len().max(widest);

    let padding = target.saturating_sub(lines.len());
    let above = padding.div_ceil(2);
    let below = padding.saturating_sub(above);
    let blank: String = std::iter::repeat_n(DEAD_CHAR, target).collect();

    let mut rows = Vec::with_capacity(target);
    rows.extend(std::iter::repeat_n(blank.clone(), above));
    rows.extend(lines.iter().map(|line| pad_row(line, target)));
    rows.extend(std::iter::repeat_n(blank, below));
    rows
}

/// Pad `line` on the right with dead cells up to `width` characters.
fn pad_row(line: &str, width: usize) -> String {
    let missing = width.saturating_sub(line.chars().count());
    let mut row = String::with_capacity(line.len().saturating_add(missing));
    row.push_str(line);
    row.extend(std::iter::repeat_n(DEAD_CHAR, missing));
    row
}

/// Resolve an optional free-text field, treating empty as absent.
fn resolve(field: Option<String>) -> String {
    field
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_owned())
}
