//! Filename and date parsing for post slugs.
//!
//! Post files follow a `NN-NN-NN-title-words` convention: the first three
//! dash-separated segments are a numeric or date prefix imposed by the content
//! source, and everything after them is the title part of the URL.
//!
//! - `01-02-03-hello-world` → `hello-world`
//! - `2019-05-10-my-post` → `my-post`
//! - `01-02-03` → `` (degenerate, nothing left after the prefix)

/// Number of leading dash-separated segments that make up the filename prefix.
pub const PREFIX_SEGMENTS: usize = 3;

/// Result of splitting a post filename into its prefix and title parts.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFilename {
    /// The dropped prefix segments, in order. May hold fewer than three
    /// entries for short filenames.
    pub prefix: Vec<String>,
    /// Remaining segments rejoined with `-`. Empty when the filename has
    /// fewer than four segments.
    pub title_slugged: String,
}

impl ParsedFilename {
    /// True when no title survives the prefix drop.
    pub fn is_degenerate(&self) -> bool {
        self.title_slugged.is_empty()
    }
}

/// Split a filename stem on `-` and drop the first three segments.
///
/// Never fails: short filenames yield an empty `title_slugged`.
pub fn parse_filename(filename: &str) -> ParsedFilename {
    let mut segments = filename.split('-');
    let prefix: Vec<String> = segments
        .by_ref()
        .take(PREFIX_SEGMENTS)
        .map(str::to_string)
        .collect();
    let rest: Vec<&str> = segments.collect();
    ParsedFilename {
        prefix,
        title_slugged: rest.join("-"),
    }
}

/// Title part of a filename stem, see [`parse_filename`].
pub fn title_slugged(filename: &str) -> String {
    parse_filename(filename).title_slugged
}

/// Date portion of a frontmatter date: everything before the first space or `T`.
///
/// - `2019-05-10T00:00:00` → `2019-05-10`
/// - `2019-05-10 08:30` → `2019-05-10`
/// - `2019-05-10` → `2019-05-10`
pub fn date_portion(date: &str) -> &str {
    match date.find([' ', 'T']) {
        Some(pos) => &date[..pos],
        None => date,
    }
}

/// A date split into its date portion and the time after the separator,
/// so `2020-06-15 09:00` and `2020-06-15T09:00` compare equal.
///
/// `2020-06-15T09:00` → `("2020-06-15", "09:00")`
pub fn date_parts(date: &str) -> (&str, &str) {
    let day = date_portion(date);
    let time = date.get(day.len() + 1..).unwrap_or("");
    (day, time)
}

/// Date portion with `-` separators turned into path separators.
///
/// `2019-05-10T00:00:00` → `2019/05/10`
pub fn date_path(date: &str) -> String {
    date_portion(date).replace('-', "/")
}
