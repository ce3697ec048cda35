//! dotted path parsing
//!
//! A path addresses one location inside a nested configuration tree, for
//! example `tags.Name` or `root_block_device[0].volume_size`. The dot-index
//! spelling `root_block_device.0.volume_size` is accepted as equivalent: a
//! pure-digit piece attaches as the index of the preceding segment.
//!
//! Pieces that do not match the segment grammar are skipped with a warning
//! instead of aborting the row. A path that yields zero segments must not be
//! applied at all; callers check for that.
use once_cell::sync::Lazy;
use regex::Regex;

/// word-token with an optional bracketed numeric index, e.g. `device[2]`
static SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\w+)(?:\[(\d+)\])?$").expect("segment pattern must compile"));

/// One step of a path: a name plus an optional list index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub name: String,
    pub index: Option<usize>,
}

impl Segment {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            index: None,
        }
    }

    pub fn indexed(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index: Some(index),
        }
    }
}

/// Parse a dotted path string into segments.
pub fn parse(path: &str) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();

    for piece in path.split('.') {
        let piece = piece.trim();

        if !piece.is_empty() && piece.bytes().all(|byte| byte.is_ascii_digit()) {
            let Ok(index) = piece.parse::<usize>() else {
                tracing::warn!(path, piece, "index out of range, skipping piece");
                continue;
            };
            match segments.last_mut() {
                Some(last) if last.index.is_none() => last.index = Some(index),
                _ => tracing::warn!(path, piece, "index has no segment to attach to, skipping"),
            }
            continue;
        }

        let Some(captures) = SEGMENT.captures(piece) else {
            tracing::warn!(path, piece, "piece fails the segment grammar, skipping");
            continue;
        };

        let index = match captures.get(2) {
            Some(digits) => match digits.as_str().parse::<usize>() {
                Ok(index) => Some(index),
                Err(_) => {
                    tracing::warn!(path, piece, "index out of range, skipping piece");
                    continue;
                }
            },
            None => None,
        };

        segments.push(Segment {
            name: captures[1].to_string(),
            index,
        });
    }

    segments
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn plain_names() {
        assert_eq!(
            parse("tags.Name"),
            vec![Segment::name("tags"), Segment::name("Name")]
        );
    }

    #[test]
    fn bracket_index() {
        assert_eq!(
            parse("root_block_device[0].volume_size"),
            vec![
                Segment::indexed("root_block_device", 0),
                Segment::name("volume_size"),
            ]
        );
    }

    #[test]
    fn dot_index_is_equivalent_to_brackets() {
        assert_eq!(
            parse("root_block_device.0.volume_size"),
            parse("root_block_device[0].volume_size")
        );
    }

    #[test]
    fn malformed_pieces_are_skipped() {
        // the policy is deterministic skip, never abort
        assert_eq!(
            parse("a.!!.b"),
            vec![Segment::name("a"), Segment::name("b")]
        );
        assert_eq!(parse("a..b"), vec![Segment::name("a"), Segment::name("b")]);
    }

    #[test]
    fn dangling_index_is_skipped() {
        // nothing before the digit piece to attach it to
        assert_eq!(parse("0.a"), vec![Segment::name("a")]);
        // the previous segment already carries an index
        assert_eq!(parse("a.0.1"), vec![Segment::indexed("a", 0)]);
    }

    #[test]
    fn unparsable_path_yields_no_segments() {
        assert_eq!(parse(""), vec![]);
        assert_eq!(parse("..."), vec![]);
        assert_eq!(parse("?!"), vec![]);
    }
}
