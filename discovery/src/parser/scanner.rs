//! Delimiter-balance and quote-state scanning shared by the parsers.
//!
//! The scanner walks script text one character at a time and classifies each
//! position as code, quoted literal or comment, together with the paren and
//! bracket depth in effect before that character. Balanced-close search,
//! top-level splitting and bracket-group extraction are all built on the same
//! walk so quote and comment handling cannot drift between them.
//!
//! Literal rules:
//!
//! - `'` or `"` outside a literal opens one; the matching character closes it.
//! - A doubled quote (`''` inside `'...'`, `""` inside `"..."`) is an escaped
//!   quote and keeps the literal open.
//! - Inside `"..."` a backtick escapes the following character.
//!
//! Outside literals, `<# ... #>` and `# ...` (to end of line) are comments
//! and never affect depth or splitting.

use std::iter::Peekable;
use std::str::CharIndices;

/// What a scanned character belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Code,
    Literal,
    Comment,
}

/// One scanned character.
///
/// `paren` and `bracket` are the nesting depths in effect *before* the
/// character is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanToken {
    pub index: usize,
    pub ch: char,
    pub region: Region,
    pub paren: usize,
    pub bracket: usize,
}

impl ScanToken {
    pub fn is_code(&self) -> bool {
        self.region == Region::Code
    }

    /// Returns `true` for code outside any paren or bracket group.
    pub fn is_top_level(&self) -> bool {
        self.is_code() && self.paren == 0 && self.bracket == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    Literal(char),
    LineComment,
    BlockComment,
}

/// Character-level scanner over script text.
pub struct Scanner<'a> {
    chars: Peekable<CharIndices<'a>>,
    state: State,
    paren: usize,
    bracket: usize,
    // Second half of a two-character escape or comment delimiter.
    pending: Option<(usize, char, Region)>,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            chars: text.char_indices().peekable(),
            state: State::Code,
            paren: 0,
            bracket: 0,
            pending: None,
        }
    }

    fn token(&self, index: usize, ch: char, region: Region) -> ScanToken {
        ScanToken {
            index,
            ch,
            region,
            paren: self.paren,
            bracket: self.bracket,
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, ch)| *ch)
    }
}

impl Iterator for Scanner<'_> {
    type Item = ScanToken;

    fn next(&mut self) -> Option<ScanToken> {
        if let Some((index, ch, region)) = self.pending.take() {
            return Some(self.token(index, ch, region));
        }

        let (index, ch) = self.chars.next()?;
        let state = self.state;
        let token = match state {
            State::Literal(quote) => {
                if quote == '"' && ch == '`' {
                    if let Some((next_idx, next_ch)) = self.chars.next() {
                        self.pending = Some((next_idx, next_ch, Region::Literal));
                    }
                } else if ch == quote {
                    if self.peek_char() == Some(quote) {
                        if let Some((next_idx, next_ch)) = self.chars.next() {
                            self.pending = Some((next_idx, next_ch, Region::Literal));
                        }
                    } else {
                        self.state = State::Code;
                    }
                }
                self.token(index, ch, Region::Literal)
            }
            State::LineComment => {
                if ch == '\n' {
                    self.state = State::Code;
                    self.token(index, ch, Region::Code)
                } else {
                    self.token(index, ch, Region::Comment)
                }
            }
            State::BlockComment => {
                if ch == '#' && self.peek_char() == Some('>') {
                    if let Some((next_idx, next_ch)) = self.chars.next() {
                        self.pending = Some((next_idx, next_ch, Region::Comment));
                    }
                    self.state = State::Code;
                }
                self.token(index, ch, Region::Comment)
            }
            State::Code => match ch {
                '\'' | '"' => {
                    self.state = State::Literal(ch);
                    self.token(index, ch, Region::Literal)
                }
                '<' if self.peek_char() == Some('#') => {
                    self.state = State::BlockComment;
                    if let Some((next_idx, next_ch)) = self.chars.next() {
                        self.pending = Some((next_idx, next_ch, Region::Comment));
                    }
                    self.token(index, ch, Region::Comment)
                }
                '#' => {
                    self.state = State::LineComment;
                    self.token(index, ch, Region::Comment)
                }
                '(' => {
                    let token = self.token(index, ch, Region::Code);
                    self.paren += 1;
                    token
                }
                ')' => {
                    let token = self.token(index, ch, Region::Code);
                    self.paren = self.paren.saturating_sub(1);
                    token
                }
                '[' => {
                    let token = self.token(index, ch, Region::Code);
                    self.bracket += 1;
                    token
                }
                ']' => {
                    let token = self.token(index, ch, Region::Code);
                    self.bracket = self.bracket.saturating_sub(1);
                    token
                }
                _ => self.token(index, ch, Region::Code),
            },
        };

        Some(token)
    }
}

/// Returns the byte index of the `)` closing the `(` at `open_index`.
///
/// Returns `None` when `open_index` does not hold `(` or the text ends
/// before the group is closed.
pub fn find_balanced_close(text: &str, open_index: usize) -> Option<usize> {
    let tail = text.get(open_index..)?;
    if !tail.starts_with('(') {
        return None;
    }

    Scanner::new(tail)
        .find(|token| token.is_code() && token.ch == ')' && token.paren == 1)
        .map(|token| open_index + token.index)
}

/// Splits `text` on `separator` where it appears outside parens, brackets,
/// quoted literals and comments.
///
/// Segments are trimmed; empty or whitespace-only segments are dropped.
pub fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;

    for token in Scanner::new(text) {
        if token.ch == separator && token.is_top_level() {
            segments.push(&text[start..token.index]);
            start = token.index + token.ch.len_utf8();
        }
    }
    segments.push(&text[start..]);

    segments
        .into_iter()
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Returns the inner text of every outermost `[...]` group in `text`.
///
/// Nested brackets stay inside their group, so `[string[]]` yields
/// `string[]`. An unterminated group is ignored.
pub fn bracket_groups(text: &str) -> Vec<&str> {
    let mut groups = Vec::new();
    let mut open: Option<usize> = None;

    for token in Scanner::new(text) {
        if !token.is_code() {
            continue;
        }
        match token.ch {
            '[' if token.bracket == 0 => open = Some(token.index + 1),
            ']' if token.bracket == 1 => {
                if let Some(start) = open.take() {
                    groups.push(&text[start..token.index]);
                }
            }
            _ => {}
        }
    }

    groups
}

/// Returns `text` with comment characters removed.
pub fn strip_comments(text: &str) -> String {
    Scanner::new(text)
        .filter(|token| token.region != Region::Comment)
        .map(|token| token.ch)
        .collect()
}

/// Returns `true` when the byte at `index` is code (not inside a literal or
/// comment).
pub fn is_code_at(text: &str, index: usize) -> bool {
    Scanner::new(text)
        .take_while(|token| token.index <= index)
        .find(|token| token.index == index)
        .is_some_and(|token| token.is_code())
}
