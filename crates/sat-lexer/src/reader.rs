//! Character cursor over source text with row/column tracking.

use sat_types::Location;
use std::fmt;

/// Walks source text one code point at a time.
///
/// Rows and columns are 1-based. Advancing past a `\n` moves to column 1 of
/// the next row.
#[derive(Debug, Clone)]
pub struct Reader {
    file: String,
    chars: Vec<char>,
    cursor: usize,
    row: u32,
    col: u32,
}

impl Reader {
    pub fn new(file: impl Into<String>, contents: &str) -> Self {
        Self {
            file: file.into(),
            chars: contents.chars().collect(),
            cursor: 0,
            row: 1,
            col: 1,
        }
    }

    /// The character under the cursor, or `None` at end of input.
    pub fn current(&self) -> Option<char> {
        self.chars.get(self.cursor).copied()
    }

    /// One character of lookahead.
    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.cursor + 1).copied()
    }

    /// Move past the current character and return the new current one.
    pub fn advance(&mut self) -> Option<char> {
        match self.current() {
            Some('\n') => {
                self.row += 1;
                self.col = 1;
            }
            Some(_) => self.col += 1,
            None => return None,
        }
        self.cursor += 1;
        self.current()
    }

    /// Location of the character under the cursor.
    pub fn location(&self) -> Location {
        Location::new(self.file.clone(), self.row, self.col)
    }

    /// Lazily rendered view of the input with the cursor bracketed, for
    /// trace output.
    pub fn debug(&self) -> ReaderDebug<'_> {
        ReaderDebug(self)
    }
}

pub struct ReaderDebug<'a>(&'a Reader);

impl fmt::Display for ReaderDebug<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reader = self.0;
        write!(f, "{}:{}:{}: ", reader.file, reader.row, reader.col)?;
        for (i, c) in reader.chars.iter().enumerate() {
            let escaped = match c {
                '\n' => "\\n".to_string(),
                '\t' => "\\t".to_string(),
                '\r' => "\\r".to_string(),
                other => other.to_string(),
            };
            if i == reader.cursor {
                write!(f, "({escaped})")?;
            } else {
                f.write_str(&escaped)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_one_one() {
        let reader = Reader::new("f", "ab");
        assert_eq!(reader.location(), Location::new("f", 1, 1));
        assert_eq!(reader.current(), Some('a'));
        assert_eq!(reader.peek(), Some('b'));
    }

    #[test]
    fn test_newline_moves_to_next_row() {
        let mut reader = Reader::new("f", "a\nb");
        reader.advance();
        assert_eq!(reader.location(), Location::new("f", 1, 2));
        reader.advance();
        assert_eq!(reader.location(), Location::new("f", 2, 1));
        assert_eq!(reader.current(), Some('b'));
    }

    #[test]
    fn test_advance_past_end_is_noop() {
        let mut reader = Reader::new("f", "a");
        assert_eq!(reader.advance(), None);
        assert_eq!(reader.current(), None);
        assert_eq!(reader.advance(), None);
        assert_eq!(reader.location(), Location::new("f", 1, 2));
    }

    #[test]
    fn test_multibyte_is_one_column() {
        let mut reader = Reader::new("f", "é=");
        reader.advance();
        assert_eq!(reader.current(), Some('='));
        assert_eq!(reader.location().col, 2);
    }

    #[test]
    fn test_debug_marks_cursor() {
        let mut reader = Reader::new("f", "a\nb");
        reader.advance();
        assert_eq!(reader.debug().to_string(), "f:1:2: a(\\n)b");
    }
}
