//! Single-line input editor
//!
//! Every text field in the app (questions, theme filter, admin form fields,
//! endpoint URLs) is a `LineEditor`. The cursor is a byte offset that is
//! always kept on a UTF-8 character boundary.

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineEditor {
    content: String,
    cursor: usize,
}

impl LineEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an editor with the cursor placed at the end
    pub fn with_content(content: impl Into<String>) -> Self {
        let content = content.into();
        let cursor = content.len();
        Self { content, cursor }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// Set content (replaces all existing content)
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.cursor = self.content.len();
    }

    /// Insert text, flattening newlines and normalizing smart quotes
    pub fn insert_str(&mut self, s: &str) {
        let normalized: String = s
            .chars()
            .map(|c| match c {
                '\u{201C}' | '\u{201D}' => '"',
                '\u{2018}' | '\u{2019}' => '\'',
                '\n' | '\r' | '\t' => ' ',
                other => other,
            })
            .collect();
        self.content.insert_str(self.cursor, &normalized);
        self.cursor += normalized.len();
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.content[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.content[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
    }

    /// Delete the character before the cursor (backspace)
    pub fn delete_char_before_cursor(&mut self) -> bool {
        match self.prev_boundary() {
            Some(prev) => {
                self.content.replace_range(prev..self.cursor, "");
                self.cursor = prev;
                true
            }
            None => false,
        }
    }

    /// Delete the character under the cursor (delete key)
    pub fn delete_char_after_cursor(&mut self) -> bool {
        match self.next_boundary() {
            Some(next) => {
                self.content.replace_range(self.cursor..next, "");
                true
            }
            None => false,
        }
    }

    /// Delete back to the previous word boundary (Ctrl+W)
    pub fn delete_word_before_cursor(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }

        let before = &self.content[..self.cursor];
        let trimmed = before.trim_end();
        let start = trimmed
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace() || *c == '/' || *c == ',')
            .map(|(pos, c)| pos + c.len_utf8())
            .unwrap_or(0);

        self.content.replace_range(start..self.cursor, "");
        self.cursor = start;
        true
    }

    pub fn move_cursor_left(&mut self) -> bool {
        match self.prev_boundary() {
            Some(prev) => {
                self.cursor = prev;
                true
            }
            None => false,
        }
    }

    pub fn move_cursor_right(&mut self) -> bool {
        match self.next_boundary() {
            Some(next) => {
                self.cursor = next;
                true
            }
            None => false,
        }
    }

    pub fn move_cursor_to_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_cursor_to_end(&mut self) {
        self.cursor = self.content.len();
    }

    /// Content split at the cursor, for rendering a cursor marker
    pub fn split_at_cursor(&self) -> (&str, &str) {
        self.content.split_at(self.cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_editor() {
        let editor = LineEditor::new();
        assert_eq!(editor.content(), "");
        assert_eq!(editor.cursor(), 0);
        assert!(editor.is_empty());
    }

    #[test]
    fn test_with_content() {
        let editor = LineEditor::with_content("hello");
        assert_eq!(editor.cursor(), 5);
    }

    #[test]
    fn test_insert_in_middle() {
        let mut editor = LineEditor::with_content("hllo");
        editor.move_cursor_to_start();
        editor.move_cursor_right();
        editor.insert_str("e");
        assert_eq!(editor.content(), "hello");
        assert_eq!(editor.cursor(), 2);
    }

    #[test]
    fn test_multibyte_backspace() {
        let mut editor = LineEditor::with_content("año ñ");
        assert!(editor.delete_char_before_cursor());
        assert_eq!(editor.content(), "año ");
        editor.move_cursor_left(); // before ' '
        editor.move_cursor_left(); // before 'o'
        assert!(editor.delete_char_before_cursor());
        assert_eq!(editor.content(), "ao ");
        assert_eq!(editor.cursor(), 1);
    }

    #[test]
    fn test_delete_at_start() {
        let mut editor = LineEditor::with_content("hello");
        editor.move_cursor_to_start();
        assert!(!editor.delete_char_before_cursor());
        assert!(editor.delete_char_after_cursor());
        assert_eq!(editor.content(), "ello");
    }

    #[test]
    fn test_move_cursor_bounds() {
        let mut editor = LineEditor::with_content("ab");
        assert!(!editor.move_cursor_right());
        assert!(editor.move_cursor_left());
        assert!(editor.move_cursor_left());
        assert!(!editor.move_cursor_left());
    }

    #[test]
    fn test_delete_word() {
        let mut editor = LineEditor::with_content("sets de Star Wars  ");
        editor.delete_word_before_cursor();
        assert_eq!(editor.content(), "sets de Star ");
        editor.delete_word_before_cursor();
        assert_eq!(editor.content(), "sets de ");
        editor.move_cursor_to_start();
        assert!(!editor.delete_word_before_cursor());
    }

    #[test]
    fn test_delete_word_url() {
        let mut editor = LineEditor::with_content("https://example.com/search");
        editor.delete_word_before_cursor();
        assert_eq!(editor.content(), "https://example.com/");
    }

    #[test]
    fn test_delete_word_after_multibyte_space() {
        let mut editor = LineEditor::with_content("Millennium\u{00A0}Falcon");
        assert!(editor.delete_word_before_cursor());
        assert_eq!(editor.content(), "Millennium\u{00A0}");
        assert_eq!(editor.cursor(), "Millennium\u{00A0}".len());

        let mut editor = LineEditor::with_content("城\u{3000}castillo");
        editor.delete_word_before_cursor();
        assert_eq!(editor.content(), "城\u{3000}");
    }

    #[test]
    fn test_insert_str_normalizes() {
        let mut editor = LineEditor::new();
        editor.insert_str("\u{201C}hola\u{201D}\nmundo");
        assert_eq!(editor.content(), "\"hola\" mundo");
    }

    #[test]
    fn test_split_at_cursor() {
        let mut editor = LineEditor::with_content("abc");
        editor.move_cursor_left();
        assert_eq!(editor.split_at_cursor(), ("ab", "c"));
    }
}
