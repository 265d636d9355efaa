//! Surface-syntax parser: turns a pattern string into a [`Regex`] tree.
//!
//! Two delimiter dialects are accepted at the top level — a quoted literal
//! (`"foo\n"`, no metacharacters) and a slash-delimited regex (`/a*b+/`,
//! full grammar below) — chosen by the caller's rule source, not sniffed
//! from the string itself. Everything between the delimiters is handled by
//! a small `nom` grammar, the same combinator style `dandy`'s original regex
//! parser used.
//!
//! Grammar (slash dialect, after delimiter stripping):
//!
//! ```text
//! alt        := concat ('|' concat)*
//! concat     := quantified*
//! quantified := atom ('*' | '+' | '?')?
//! atom       := group | char_class | wildcard | escape | plain_char
//! group      := '(' alt ')'
//! char_class := '[' '^'? class_item+ ']'
//! class_item := class_atom ('-' class_atom)?
//! escape     := '\' (predefined_class | hex_escape | octal_escape | simple_escape | fallback_escape)
//! ```
//!
//! Character classes may contain the predefined escapes (`\d`, `\w`, `\s`
//! and their negations) alongside literal ranges, e.g. `[\da-f]`.

use crate::charset::CharSet;
use crate::error::RegexSyntaxError;
use crate::regex::Regex;
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{anychar, char as nchar, none_of, one_of};
use nom::combinator::{map, map_opt, opt, recognize, value};
use nom::multi::{many0, many1, many_m_n};
use nom::sequence::{delimited, pair, preceded, tuple};
use nom::IResult;

/// Parses a full rule pattern, choosing the delimiter dialect from the
/// pattern's own leading character: `"..."` is a quoted literal, `/.../` is
/// a slash-delimited regex. This is the entry point [`crate::compile`] uses
/// for each rule's pattern source.
pub fn parse_pattern(source: &str) -> Result<Regex, RegexSyntaxError> {
    let mut chars = source.chars();
    match chars.next() {
        Some('"') => {
            let rest = chars.as_str();
            let body = rest
                .strip_suffix('"')
                .ok_or(RegexSyntaxError::UnterminatedGroup { offset: source.len() })?;
            parse_quoted_literal(body)
        }
        Some('/') => {
            let rest = chars.as_str();
            let end = find_slash_delimiter(rest)
                .ok_or(RegexSyntaxError::UnterminatedGroup { offset: source.len() })?;
            parse_slash_regex(&rest[..end])
        }
        Some(_) => Err(RegexSyntaxError::UnexpectedToken { offset: 0 }),
        None => Err(RegexSyntaxError::UnexpectedEnd),
    }
}

/// Parses `source` as a quoted literal: no metacharacters, only the escape
/// sequences listed in [`simple_escape`]/[`hex_escape`]/[`octal_escape`]. The
/// surrounding quote characters must already be stripped by the caller.
pub fn parse_quoted_literal(source: &str) -> Result<Regex, RegexSyntaxError> {
    let mut bytes = Vec::with_capacity(source.len());
    let mut chars = source.char_indices().peekable();
    while let Some((idx, c)) = chars.next() {
        if c == '\\' {
            let (consumed, byte) = parse_escape_body(&source[idx + 1..])
                .map_err(|e| e.at_offset(idx))?;
            bytes.push(byte);
            for _ in 0..consumed {
                chars.next();
            }
        } else if c.is_ascii() {
            bytes.push(c as u8);
        } else {
            return Err(RegexSyntaxError::NonAsciiCharacter { offset: idx });
        }
    }
    Ok(Regex::literal(bytes))
}

/// Parses `source` as the body of a slash-delimited regex (delimiters
/// already stripped by [`find_slash_delimiter`]).
pub fn parse_slash_regex(source: &str) -> Result<Regex, RegexSyntaxError> {
    check_balance(source)?;
    match alt_expr(source) {
        Ok((rest, regex)) if rest.is_empty() => Ok(regex),
        Ok((rest, _)) => Err(positional_error(source, rest)),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            Err(positional_error(source, e.input))
        }
        Err(nom::Err::Incomplete(_)) => Err(RegexSyntaxError::UnexpectedEnd),
    }
}

/// Scans `source` (a slash-delimited rule body, delimiters already removed
/// by the caller) for the top-level `/` that ends it. Tracks backslash
/// escapes and `[...]` class nesting so an unescaped `/` inside a character
/// class does not end the pattern early. Returns the byte offset of the
/// terminating `/`, or `None` if the pattern runs off the end of `source`
/// unterminated.
pub fn find_slash_delimiter(source: &str) -> Option<usize> {
    let bytes = source.as_bytes();
    let mut i = 0;
    let mut class_depth = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'[' if class_depth == 0 => {
                class_depth = 1;
                i += 1;
            }
            b']' if class_depth > 0 => {
                class_depth = 0;
                i += 1;
            }
            b'/' if class_depth == 0 => return Some(i),
            _ => i += 1,
        }
    }
    None
}

/// Prepass that reports unterminated groups/classes precisely, before the
/// generic nom grammar below (which would otherwise just fail to match and
/// report a less specific position).
fn check_balance(source: &str) -> Result<(), RegexSyntaxError> {
    let bytes = source.as_bytes();
    let mut paren_depth = 0i32;
    let mut class_depth = 0i32;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                if i + 1 >= bytes.len() {
                    return Err(RegexSyntaxError::UnexpectedEnd);
                }
                i += 2;
                continue;
            }
            b'[' if class_depth == 0 => class_depth += 1,
            b']' if class_depth > 0 => class_depth -= 1,
            b'(' if class_depth == 0 => paren_depth += 1,
            b')' if class_depth == 0 => {
                paren_depth -= 1;
                if paren_depth < 0 {
                    return Err(RegexSyntaxError::UnmatchedCloseParen { offset: i });
                }
            }
            _ => {}
        }
        i += 1;
    }
    if class_depth > 0 {
        return Err(RegexSyntaxError::UnterminatedClass { offset: source.len() });
    }
    if paren_depth > 0 {
        return Err(RegexSyntaxError::UnterminatedGroup { offset: source.len() });
    }
    Ok(())
}

fn positional_error(source: &str, remaining: &str) -> RegexSyntaxError {
    let offset = source.len() - remaining.len();
    RegexSyntaxError::UnexpectedToken { offset }
}

type PResult<'a, O> = IResult<&'a str, O>;

fn alt_expr(input: &str) -> PResult<Regex> {
    map(
        pair(concat_expr, many0(preceded(nchar('|'), concat_expr))),
        |(first, rest)| rest.into_iter().fold(first, Regex::alt),
    )(input)
}

fn concat_expr(input: &str) -> PResult<Regex> {
    map(many1(quantified_atom), |parts| {
        let mut iter = parts.into_iter();
        let first = iter.next().expect("many1 yields at least one element");
        iter.fold(first, Regex::concat)
    })(input)
}

fn quantified_atom(input: &str) -> PResult<Regex> {
    map(
        pair(atom, opt(one_of("*+?"))),
        |(base, quant)| match quant {
            Some('*') => base.star(),
            Some('+') => base.plus(),
            Some('?') => base.optional(),
            _ => base,
        },
    )(input)
}

fn atom(input: &str) -> PResult<Regex> {
    alt((group, char_class, wildcard, escape, plain_char_atom))(input)
}

fn group(input: &str) -> PResult<Regex> {
    delimited(nchar('('), alt_expr, nchar(')'))(input)
}

fn wildcard(input: &str) -> PResult<Regex> {
    value(Regex::wildcard(), nchar('.'))(input)
}

fn plain_char_atom(input: &str) -> PResult<Regex> {
    map(none_of("|*+?()[].\\"), |c| {
        Regex::char_set(CharSet::singleton(c as u8))
    })(input)
}

fn escape(input: &str) -> PResult<Regex> {
    preceded(nchar('\\'), map_opt(escape_body, |b| Some(class_or_byte(b))))(input)
}

/// What a backslash escape denotes: either a single byte, or (for `\d`,
/// `\w`, `\s` and their negations) a whole predefined class.
enum EscapeBody {
    Byte(u8),
    Class(CharSet),
}

fn class_or_byte(body: EscapeBody) -> Regex {
    match body {
        EscapeBody::Byte(b) => Regex::char_set(CharSet::singleton(b)),
        EscapeBody::Class(set) => Regex::char_set(set),
    }
}

fn escape_body(input: &str) -> PResult<EscapeBody> {
    alt((
        map(predefined_class, EscapeBody::Class),
        map(hex_escape, EscapeBody::Byte),
        map(octal_escape, EscapeBody::Byte),
        map(simple_escape, EscapeBody::Byte),
        map(fallback_escape, EscapeBody::Byte),
    ))(input)
}

fn predefined_class(input: &str) -> PResult<CharSet> {
    alt((
        value(CharSet::digit(), tag("d")),
        value(CharSet::digit().complement(), tag("D")),
        value(CharSet::alnum_underscore(), tag("w")),
        value(CharSet::alnum_underscore().complement(), tag("W")),
        value(CharSet::whitespace(), tag("s")),
        value(CharSet::whitespace().complement(), tag("S")),
    ))(input)
}

fn simple_escape(input: &str) -> PResult<u8> {
    alt((
        value(b'\n', nchar('n')),
        value(b'\r', nchar('r')),
        value(b'\t', nchar('t')),
        value(0x0b, nchar('v')),
        value(0x08, nchar('b')),
        value(0x07, nchar('a')),
        value(0x0c, nchar('f')),
        value(b'\\', nchar('\\')),
        value(b'"', nchar('"')),
        value(b'/', nchar('/')),
    ))(input)
}

fn hex_escape(input: &str) -> PResult<u8> {
    preceded(
        nchar('x'),
        map_opt(
            recognize(tuple((
                one_of("0123456789abcdefABCDEF"),
                one_of("0123456789abcdefABCDEF"),
            ))),
            |s: &str| u8::from_str_radix(s, 16).ok(),
        ),
    )(input)
}

fn octal_escape(input: &str) -> PResult<u8> {
    // Leading digit 0-7, up to three digits total; `many_m_n` naturally
    // truncates at the first non-octal byte instead of requiring all three.
    map(recognize(many_m_n(1, 3, one_of("01234567"))), |s: &str| {
        u32::from_str_radix(s, 8).unwrap_or(0) as u8
    })(input)
}

fn fallback_escape(input: &str) -> PResult<u8> {
    // Any other `\X` escapes to the literal byte X: consume exactly the one
    // escaped character, not the rest of the input.
    map_opt(anychar, |c: char| c.is_ascii().then(|| c as u8))(input)
}

/// Used by [`parse_quoted_literal`], which walks the string by hand instead
/// of going through the nom grammar (quoted literals have no metacharacters
/// to combine, only escapes). Returns the number of source chars consumed
/// by the escape body (not counting the leading backslash) and the byte it
/// denotes. Predefined classes (`\d` etc.) are rejected here — a quoted
/// literal names bytes, not classes.
fn parse_escape_body(rest: &str) -> Result<(usize, u8), RegexSyntaxError> {
    let mut chars = rest.chars();
    let c = chars.next().ok_or(RegexSyntaxError::UnexpectedEnd)?;
    match c {
        'n' => Ok((1, b'\n')),
        'r' => Ok((1, b'\r')),
        't' => Ok((1, b'\t')),
        'v' => Ok((1, 0x0b)),
        'b' => Ok((1, 0x08)),
        'a' => Ok((1, 0x07)),
        'f' => Ok((1, 0x0c)),
        '\\' => Ok((1, b'\\')),
        '"' => Ok((1, b'"')),
        '/' => Ok((1, b'/')),
        'x' => {
            let hex: String = chars.by_ref().take(2).collect();
            if hex.len() == 2 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
                Ok((3, u8::from_str_radix(&hex, 16).unwrap()))
            } else {
                Err(RegexSyntaxError::InvalidHexEscape)
            }
        }
        '0'..='7' => {
            // Leading digit 0-7, up to three digits total; truncate at the
            // first non-octal byte rather than requiring all three.
            let mut digits = String::new();
            digits.push(c);
            let mut consumed = 1usize;
            for extra in chars.clone().take(2) {
                if ('0'..='7').contains(&extra) {
                    digits.push(extra);
                    consumed += 1;
                } else {
                    break;
                }
            }
            Ok((consumed, (u32::from_str_radix(&digits, 8).unwrap_or(0)) as u8))
        }
        c if c.is_ascii() => Ok((1, c as u8)),
        c => Err(RegexSyntaxError::NonAsciiEscape { character: c }),
    }
}

fn char_class(input: &str) -> PResult<Regex> {
    map(
        delimited(nchar('['), pair(opt(nchar('^')), many1(class_item)), nchar(']')),
        |(negate, items)| {
            let set = items
                .into_iter()
                .fold(CharSet::EMPTY, |acc, item| acc.union(item));
            Regex::char_set(if negate.is_some() { set.complement() } else { set })
        },
    )(input)
}

fn class_item(input: &str) -> PResult<CharSet> {
    alt((
        map(predefined_class_item, |set| set),
        map(
            pair(class_atom, opt(preceded(nchar('-'), class_atom))),
            |(lo, hi)| match hi {
                Some(hi) => {
                    // Descending ranges like [z-a] are normalized by
                    // swapping endpoints rather than rejected.
                    if lo <= hi {
                        CharSet::range(lo, hi)
                    } else {
                        CharSet::range(hi, lo)
                    }
                }
                None => CharSet::singleton(lo),
            },
        ),
    ))(input)
}

fn predefined_class_item(input: &str) -> PResult<CharSet> {
    preceded(nchar('\\'), predefined_class)(input)
}

fn class_atom(input: &str) -> PResult<u8> {
    alt((
        preceded(nchar('\\'), class_escape_byte),
        map(none_of("]"), |c| c as u8),
    ))(input)
}

fn class_escape_byte(input: &str) -> PResult<u8> {
    alt((hex_escape, octal_escape, simple_escape, fallback_escape))(input)
}

impl RegexSyntaxError {
    fn at_offset(self, base: usize) -> RegexSyntaxError {
        match self {
            RegexSyntaxError::UnexpectedEnd => RegexSyntaxError::UnexpectedEnd,
            other => other.with_offset(base),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_unescaped_slash() {
        assert_eq!(find_slash_delimiter("ab/"), Some(2));
    }

    #[test]
    fn slash_inside_class_does_not_terminate() {
        assert_eq!(find_slash_delimiter("[a/b]/"), Some(5));
    }

    #[test]
    fn escaped_slash_does_not_terminate() {
        assert_eq!(find_slash_delimiter(r"a\/b/"), Some(4));
    }

    #[test]
    fn parses_plain_concat() {
        let regex = parse_slash_regex("ab").unwrap();
        assert_eq!(regex, Regex::literal(*b"a").concat(Regex::literal(*b"b")));
    }

    #[test]
    fn parses_star_and_alt() {
        let regex = parse_slash_regex("a*|b").unwrap();
        let expected = Regex::char_set(CharSet::singleton(b'a'))
            .star()
            .alt(Regex::char_set(CharSet::singleton(b'b')));
        assert_eq!(regex, expected);
    }

    #[test]
    fn rejects_unterminated_group() {
        assert!(matches!(
            parse_slash_regex("(ab"),
            Err(RegexSyntaxError::UnterminatedGroup { .. })
        ));
    }

    #[test]
    fn rejects_unterminated_class() {
        assert!(matches!(
            parse_slash_regex("[abc"),
            Err(RegexSyntaxError::UnterminatedClass { .. })
        ));
    }

    #[test]
    fn descending_range_is_normalized() {
        let regex = parse_slash_regex("[z-a]").unwrap();
        assert_eq!(regex, Regex::char_set(CharSet::range(b'a', b'z')));
    }

    #[test]
    fn quoted_literal_handles_escapes() {
        let regex = parse_quoted_literal(r"a\nb").unwrap();
        assert_eq!(regex, Regex::literal(vec![b'a', b'\n', b'b']));
    }

    #[test]
    fn parse_pattern_dispatches_on_delimiter() {
        assert_eq!(parse_pattern("\"ab\"").unwrap(), Regex::literal(*b"ab"));
        assert_eq!(
            parse_pattern("/a*/").unwrap(),
            Regex::char_set(CharSet::singleton(b'a')).star()
        );
    }

    fn byte(b: u8) -> Regex {
        Regex::char_set(CharSet::singleton(b))
    }

    #[test]
    fn fallback_escape_consumes_only_the_escaped_char() {
        let regex = parse_slash_regex(r"a\zbc").unwrap();
        let expected = byte(b'a').concat(byte(b'z')).concat(byte(b'b')).concat(byte(b'c'));
        assert_eq!(regex, expected);
    }

    #[test]
    fn fallback_escape_inside_class_leaves_closing_bracket_intact() {
        let regex = parse_slash_regex(r"[\zabc]").unwrap();
        let set = [b'z', b'a', b'b', b'c']
            .into_iter()
            .fold(CharSet::EMPTY, |acc, b| acc.union(CharSet::singleton(b)));
        assert_eq!(regex, Regex::char_set(set));
    }

    #[test]
    fn single_digit_octal_escape_is_recognized() {
        let regex = parse_slash_regex(r"\7").unwrap();
        assert_eq!(regex, byte(0o7));
    }

    #[test]
    fn octal_escape_truncates_at_first_non_octal_digit() {
        let regex = parse_slash_regex(r"\12x").unwrap();
        assert_eq!(regex, byte(0o12).concat(byte(b'x')));
    }

    #[test]
    fn quoted_literal_single_digit_octal_escape() {
        let regex = parse_quoted_literal(r"\7").unwrap();
        assert_eq!(regex, Regex::literal(vec![0o7u8]));
    }

    #[test]
    fn quoted_literal_octal_escape_truncates() {
        let regex = parse_quoted_literal(r"\01a").unwrap();
        assert_eq!(regex, Regex::literal(vec![0o01u8, b'a']));
    }
}
