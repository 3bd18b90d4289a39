use std::fs;
use std::path::{Path, PathBuf};

use ropey::Rope;
use thiserror::Error;

/// Failures reading or writing the source file.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Cursor position in the editor buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based column, in characters.
    pub col: usize,
    /// Column to return to when moving vertically through shorter lines.
    sticky_col: usize,
}

impl Cursor {
    pub const fn at(line: usize, col: usize) -> Self {
        Self {
            line,
            col,
            sticky_col: col,
        }
    }
}

/// Direction for cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Rope-backed text of the source pane with a single cursor.
#[derive(Default)]
pub struct EditorBuffer {
    rope: Rope,
    cursor: Cursor,
    dirty: bool,
}

impl EditorBuffer {
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: Cursor::default(),
            dirty: false,
        }
    }

    /// Load `path`, or start empty if it does not exist yet.
    ///
    /// # Errors
    /// Returns [`EditorError::Read`] if the file exists but cannot be read.
    pub fn load(path: &Path) -> Result<Self, EditorError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path).map_err(|source| EditorError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_text(&text))
    }

    /// Write the buffer to `path` and mark it clean.
    ///
    /// # Errors
    /// Returns [`EditorError::Write`] on any IO failure; the buffer stays dirty.
    pub fn save(&mut self, path: &Path) -> Result<(), EditorError> {
        let write_err = |source| EditorError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(path, self.text()).map_err(write_err)?;
        self.dirty = false;
        Ok(())
    }

    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Number of lines; an empty buffer has one.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Line content without its line ending.
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let line = self.rope.line(line_idx).to_string();
        Some(line.trim_end_matches(['\n', '\r']).to_string())
    }

    /// Length of a line in characters, without its line ending.
    pub fn line_len(&self, line_idx: usize) -> usize {
        self.line_at(line_idx).map_or(0, |s| s.chars().count())
    }

    pub fn insert_char(&mut self, ch: char) {
        let idx = self.cursor_char_idx();
        self.rope.insert_char(idx, ch);
        if ch == '\n' {
            self.cursor = Cursor::at(self.cursor.line + 1, 0);
        } else {
            self.cursor = Cursor::at(self.cursor.line, self.cursor.col + 1);
        }
        self.dirty = true;
    }

    /// Insert pasted text at the cursor, leaving the cursor after it.
    pub fn insert_str(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let idx = self.cursor_char_idx();
        self.rope.insert(idx, text);
        let end = idx + text.chars().count();
        let line = self.rope.char_to_line(end);
        let col = end - self.rope.line_to_char(line);
        self.cursor = Cursor::at(line, col);
        self.dirty = true;
    }

    pub fn split_line(&mut self) {
        self.insert_char('\n');
    }

    /// Backspace. Joins with the previous line at column 0.
    pub fn delete_back(&mut self) -> bool {
        let idx = self.cursor_char_idx();
        if idx == 0 {
            return false;
        }
        let (line, col) = if self.cursor.col == 0 {
            let prev = self.cursor.line - 1;
            (prev, self.line_len(prev))
        } else {
            (self.cursor.line, self.cursor.col - 1)
        };
        let start = if idx >= 2 && self.is_crlf_at(idx - 2) {
            idx - 2
        } else {
            idx - 1
        };
        self.rope.remove(start..idx);
        self.cursor = Cursor::at(line, col);
        self.dirty = true;
        true
    }

    /// Delete under the cursor. Joins with the next line at line end.
    pub fn delete_forward(&mut self) -> bool {
        let idx = self.cursor_char_idx();
        if idx >= self.rope.len_chars() {
            return false;
        }
        let end = if self.is_crlf_at(idx) { idx + 2 } else { idx + 1 };
        self.rope.remove(idx..end);
        self.dirty = true;
        true
    }

    /// Whether a `\r\n` pair starts at char `idx`; it is one line break.
    fn is_crlf_at(&self, idx: usize) -> bool {
        idx + 1 < self.rope.len_chars()
            && self.rope.char(idx) == '\r'
            && self.rope.char(idx + 1) == '\n'
    }

    pub fn move_cursor(&mut self, direction: Direction) {
        let Cursor {
            line,
            col,
            sticky_col,
        } = self.cursor;
        match direction {
            Direction::Left if col > 0 => self.cursor = Cursor::at(line, col - 1),
            Direction::Left if line > 0 => {
                self.cursor = Cursor::at(line - 1, self.line_len(line - 1));
            }
            Direction::Right if col < self.line_len(line) => {
                self.cursor = Cursor::at(line, col + 1);
            }
            Direction::Right if line + 1 < self.line_count() => {
                self.cursor = Cursor::at(line + 1, 0);
            }
            Direction::Up if line > 0 => self.move_vertically(line - 1, sticky_col),
            Direction::Down if line + 1 < self.line_count() => {
                self.move_vertically(line + 1, sticky_col);
            }
            _ => {}
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = Cursor::at(self.cursor.line, 0);
    }

    pub fn move_end(&mut self) {
        self.cursor = Cursor::at(self.cursor.line, self.line_len(self.cursor.line));
    }

    /// Jump to `line`/`col`, clamped into the buffer.
    pub fn move_to(&mut self, line: usize, col: usize) {
        let line = line.min(self.line_count().saturating_sub(1));
        self.cursor = Cursor::at(line, col.min(self.line_len(line)));
    }

    fn move_vertically(&mut self, line: usize, sticky_col: usize) {
        self.cursor = Cursor {
            line,
            col: sticky_col.min(self.line_len(line)),
            sticky_col,
        };
    }

    fn cursor_char_idx(&self) -> usize {
        let line = self.cursor.line.min(self.rope.len_lines().saturating_sub(1));
        let start = self.rope.line_to_char(line);
        start + self.cursor.col.min(self.line_len(line))
    }
}

impl std::fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBuffer")
            .field("lines", &self.line_count())
            .field("cursor", &self.cursor)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}
