//! The built-in seed shelf.
//!
//! Six patterns from the Life Lexicon, loaded into the library at startup
//! when `library.load_seed_patterns` is set.

use crate::pattern::{Pattern, PatternInfo};
use crate::tags::parse_tags;

const LEX_C: &str = "http://www.argentum.freeserve.co.uk/lex_c.htm";
const LEX_I: &str = "http://www.argentum.freeserve.co.uk/lex_i.htm";
const LEX_S: &str = "http://www.argentum.freeserve.co.uk/lex_s.htm";
const LEX_U: &str = "http://www.argentum.freeserve.co.uk/lex_u.htm";

const I_HEPTOMINO: &str = "\
O..
.O..
.OO.
..OO";

const CALLAHAN: &str = "\
......O.
....O.OO
....O.O.
....O...
..O.....
O.O.....";

const CANADA_GOOSE: &str = "\
OOO..........
O.........OO.
.O......OOO.O
...OO..OO....
....O........
........O....
....OO...O...
...O.O.OO....
...O.O..O.OO.
..O....OO....
..OO.........
..OO.........";

const CANOE: &str = "\
...OO
....O
...O.
O.O..
OO...";

const SAILBOAT: &str = "\
........O...........O........
.......O.O.........O.O.......
........O...........O........
.............................
......OOOOO.......OOOOO......
.....O....O.......O....O.....
....O..O.............O..O....
.O..O.OO.............OO.O..O.
O.O.O.....O.......O.....O.O.O
.O..O....O.O.....O.O....O..O.
....OO..O..O.....O..O..OO....
.........OO.......OO.........
.............OO..............
.............O.O.............
........O..O..O..............
.......O.....................
.....OO..........OOO.........
..O......OO.O....OOO.........
.....O...O..O....OOO.........
.....OOO.O...O......OOO......
..O...........O.....OOO......
...O...O.OOO........OOO......
....O..O...O.................
....O.OO......O..............
..........OO.................
.........O...................
.....O..O....................";

const UNIX: &str = "\
.OO.....
.OO.....
........
.O......
O.O.....
O..O..OO
....O.OO
..OO....";

/// Build the seed shelf, in shelf order. None of the patterns has an identity yet.
pub fn seed_patterns() -> Vec<Pattern> {
    vec![
        Pattern::new(
            I_HEPTOMINO,
            PatternInfo::named("I-heptomino")
                .with_source(LEX_I)
                .with_founder("Conway")
                .with_tags(parse_tags("methuselah, heptomino")),
        ),
        Pattern::new(
            CALLAHAN,
            PatternInfo {
                source: Some(LEX_I.to_owned()),
                founder: Some("Paul Callahan".to_owned()),
                found_date: Some("December 1997".to_owned()),
                tags: parse_tags("infinite growth"),
                ..PatternInfo::default()
            },
        ),
        Pattern::new(
            CANADA_GOOSE,
            PatternInfo::named("Canada goose")
                .with_source(LEX_C)
                .with_founder("Jason Summers")
                .with_found_date("January 1999")
                .with_tags(parse_tags("spaceship, c/4")),
        ),
        Pattern::new(
            CANOE,
            PatternInfo::named("canoe")
                .with_source(LEX_C)
                .with_tags(parse_tags("still life")),
        ),
        Pattern::new(
            SAILBOAT,
            PatternInfo::named("sailboat")
                .with_source(LEX_S)
                .with_tags(parse_tags("oscillator")),
        ),
        Pattern::new(
            UNIX,
            PatternInfo::named("unix")
                .with_source(LEX_U)
                .with_tags(parse_tags("oscillator, p6")),
        ),
    ]
}

/// Find a seed pattern by name, ignoring case.
pub fn seed_pattern(name: &str) -> Option<Pattern> {
    seed_patterns()
        .into_iter()
        .find(|pattern| pattern.name().eq_ignore_ascii_case(name.trim()))
}
