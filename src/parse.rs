use crate::types::{JsonSubstError, KeyPath, ReplacementMap};
use nom::{
    branch::alt,
    bytes::complete::take_till,
    character::complete::{anychar, char, none_of},
    combinator::{all_consuming, map, opt, rest},
    multi::{many1, separated_list1},
    sequence::preceded,
    IResult, Parser,
};
use nom_language::error::VerboseError;

type Res<T, U> = IResult<T, U, VerboseError<T>>;

/// Parses a dotted key path into its unescaped segments.
///
/// ## Arguments
///
/// * `input` - The key path, e.g. `"key2.0.name"` or `"key1\.key2"`
///
/// ## Returns
///
/// Returns a `KeyPath` if successful, or a `JsonSubstError` if the path is empty or has an
/// empty segment.
pub fn parse_key_path(input: &str) -> Result<KeyPath, JsonSubstError> {
    match all_consuming(key_path).parse(input) {
        Ok((_, segments)) => Ok(KeyPath::from_segments(segments)),
        Err(err) => Err(JsonSubstError::NomError(format!("{}", err))),
    }
}

fn key_path(input: &str) -> Res<&str, Vec<String>> {
    separated_list1(char('.'), segment).parse(input)
}

fn segment(input: &str) -> Res<&str, String> {
    map(many1(alt((escaped_char, none_of(".")))), |chars: Vec<char>| {
        chars.into_iter().collect()
    })
    .parse(input)
}

// A trailing lone backslash falls through to `none_of` and is kept literally.
fn escaped_char(input: &str) -> Res<&str, char> {
    preceded(char('\\'), anychar).parse(input)
}

/// Parses newline separated `key=value` lines into a `ReplacementMap`.
///
/// Keys and values are trimmed. Only the first `=` splits a line, so values may contain `=`.
/// Lines without a key are skipped and a key without `=` maps to an empty value. A repeated
/// key overwrites the earlier value.
pub fn parse_replacements(input: &str) -> ReplacementMap {
    let mut replacements = ReplacementMap::new();
    for line in input.split('\n') {
        let Ok((_, (key, value))) = replacement_line(line.trim()) else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        replacements.insert(key, value.unwrap_or_default().trim());
    }
    replacements
}

fn replacement_line(input: &str) -> Res<&str, (&str, Option<&str>)> {
    (take_till(|c: char| c == '='), opt(preceded(char('='), rest))).parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replacement_line_splits_on_first_equals() {
        let (remaining, (key, value)) = replacement_line("a=b=c").unwrap();
        assert_eq!(remaining, "");
        assert_eq!(key, "a");
        assert_eq!(value, Some("b=c"));
    }

    #[test]
    fn test_replacement_line_without_equals() {
        let (_, (key, value)) = replacement_line("lonely").unwrap();
        assert_eq!(key, "lonely");
        assert_eq!(value, None);
    }

    #[test]
    fn test_segment_keeps_trailing_backslash() {
        let (_, segment) = segment("key\\").unwrap();
        assert_eq!(segment, "key\\");
    }
}
