//! Word and character tokens
//!
//! A [`TokenList`] is the immutable view-model produced by splitting a block
//! of text. It is rebuilt from scratch on every split and shared by
//! reference; nothing mutates it afterwards.
//!
//! Characters are split per Unicode scalar value. Combining marks and
//! multi-scalar glyphs (flags, ZWJ emoji) therefore land in separate
//! tokens; this is a known limitation kept for compatibility.

/// Rendered text of a separator token (non-breaking space)
pub const SEPARATOR: char = '\u{00A0}';

/// Token kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Word,
    Separator,
    Char,
}

/// A single token
///
/// `order` is the 0-based position among tokens of the same kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub order: usize,
}

impl Token {
    /// CSS-style class used when rendering markup
    fn class(&self) -> &'static str {
        match self.kind {
            TokenKind::Word => "word",
            TokenKind::Separator | TokenKind::Char => "char",
        }
    }
}

/// A word token and the characters it contains
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordToken {
    pub token: Token,
    pub chars: Vec<Token>,
}

/// One entry of a token list in reading order
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    Word(WordToken),
    Separator(Token),
}

/// Tokenized text in reading order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenList {
    segments: Vec<Segment>,
    char_count: usize,
}

impl TokenList {
    /// Split text on single spaces
    ///
    /// Repeated spaces produce empty words rather than being collapsed, so
    /// `"a  b"` yields three words (`"a"`, `""`, `"b"`) and two separators.
    pub fn from_text(text: &str) -> Self {
        let mut segments = Vec::new();
        let mut char_order = 0;

        for (index, word) in text.split(' ').enumerate() {
            if index > 0 {
                segments.push(Segment::Separator(Token {
                    kind: TokenKind::Separator,
                    text: SEPARATOR.to_string(),
                    order: index - 1,
                }));
            }

            let chars = word
                .chars()
                .map(|c| {
                    let token = Token {
                        kind: TokenKind::Char,
                        text: c.to_string(),
                        order: char_order,
                    };
                    char_order += 1;
                    token
                })
                .collect();

            segments.push(Segment::Word(WordToken {
                token: Token {
                    kind: TokenKind::Word,
                    text: word.to_string(),
                    order: index,
                },
                chars,
            }));
        }

        Self {
            segments,
            char_count: char_order,
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Word tokens in reading order
    pub fn words(&self) -> impl Iterator<Item = &WordToken> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Word(word) => Some(word),
            Segment::Separator(_) => None,
        })
    }

    /// Separator tokens in reading order
    pub fn separators(&self) -> impl Iterator<Item = &Token> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Separator(token) => Some(token),
            Segment::Word(_) => None,
        })
    }

    /// Character tokens inside words, excluding separators
    pub fn chars(&self) -> impl Iterator<Item = &Token> {
        self.words().flat_map(|word| word.chars.iter())
    }

    /// Every individually targetable character in reading order:
    /// word characters and separators interleaved
    pub fn glyphs(&self) -> impl Iterator<Item = &Token> {
        self.segments.iter().flat_map(|segment| match segment {
            Segment::Word(word) => word.chars.iter(),
            Segment::Separator(token) => std::slice::from_ref(token).iter(),
        })
    }

    pub fn word_count(&self) -> usize {
        self.separator_count() + 1
    }

    pub fn separator_count(&self) -> usize {
        self.segments.len() / 2
    }

    pub fn char_count(&self) -> usize {
        self.char_count
    }

    /// Number of glyph targets (`char_count + separator_count`)
    pub fn glyph_count(&self) -> usize {
        self.char_count + self.separator_count()
    }

    /// Words re-joined with single spaces; equals the split input
    pub fn logical_text(&self) -> String {
        self.words()
            .map(|word| word.token.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Text as rendered, with separators as non-breaking spaces
    pub fn rendered_text(&self) -> String {
        self.glyphs().map(|token| token.text.as_str()).collect()
    }

    /// Render as nested spans
    ///
    /// Words become `<span class="word">` wrappers around one
    /// `<span class="char">` per character; separators are bare char spans.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Word(word) => {
                    out.push_str(&format!(r#"<span class="{}">"#, word.token.class()));
                    for c in &word.chars {
                        push_char_span(&mut out, c);
                    }
                    out.push_str("</span>");
                }
                Segment::Separator(token) => push_char_span(&mut out, token),
            }
        }
        out
    }
}

fn push_char_span(out: &mut String, token: &Token) {
    out.push_str(&format!(r#"<span class="{}">"#, token.class()));
    if token.kind == TokenKind::Separator {
        out.push_str("&nbsp;");
    } else {
        out.push_str(&escape_markup(&token.text));
    }
    out.push_str("</span>");
}

/// Escape text for inclusion in markup
pub fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word_texts(list: &TokenList) -> Vec<&str> {
        list.words().map(|w| w.token.text.as_str()).collect()
    }

    #[test]
    fn test_go_green_now() {
        let list = TokenList::from_text("go green now");

        assert_eq!(word_texts(&list), vec!["go", "green", "now"]);
        assert_eq!(list.word_count(), 3);
        assert_eq!(list.separator_count(), 2);
        assert_eq!(list.char_count(), 11);
        assert_eq!(list.glyph_count(), 13);

        let green = list.words().nth(1).unwrap();
        let chars: Vec<&str> = green.chars.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(chars, vec!["g", "r", "e", "e", "n"]);

        // Separators sit between words, never after the last one
        assert!(matches!(list.segments().last(), Some(Segment::Word(_))));
        assert!(matches!(list.segments()[1], Segment::Separator(_)));
        assert!(matches!(list.segments()[3], Segment::Separator(_)));
    }

    #[test]
    fn test_repeated_spaces_keep_empty_words() {
        let list = TokenList::from_text("a  b");
        assert_eq!(word_texts(&list), vec!["a", "", "b"]);
        assert_eq!(list.separator_count(), 2);
        assert_eq!(list.char_count(), 2);
        assert_eq!(list.logical_text(), "a  b");
    }

    #[test]
    fn test_empty_text_is_one_empty_word() {
        let list = TokenList::from_text("");
        assert_eq!(list.word_count(), 1);
        assert_eq!(list.separator_count(), 0);
        assert_eq!(list.char_count(), 0);
        assert_eq!(list.logical_text(), "");
    }

    #[test]
    fn test_orders_are_stable_per_kind() {
        let list = TokenList::from_text("ab cd");
        let char_orders: Vec<usize> = list.chars().map(|c| c.order).collect();
        assert_eq!(char_orders, vec![0, 1, 2, 3]);

        let word_orders: Vec<usize> = list.words().map(|w| w.token.order).collect();
        assert_eq!(word_orders, vec![0, 1]);

        let sep_orders: Vec<usize> = list.separators().map(|s| s.order).collect();
        assert_eq!(sep_orders, vec![0]);
    }

    #[test]
    fn test_glyphs_interleave_separators() {
        let list = TokenList::from_text("go now");
        let glyphs: Vec<&str> = list.glyphs().map(|g| g.text.as_str()).collect();
        assert_eq!(glyphs, vec!["g", "o", "\u{a0}", "n", "o", "w"]);
        assert_eq!(list.rendered_text(), "go\u{a0}now");
    }

    #[test]
    fn test_combining_marks_split_per_scalar() {
        // "e" + COMBINING ACUTE ACCENT renders as one glyph but is two scalars
        let list = TokenList::from_text("e\u{301}");
        assert_eq!(list.char_count(), 2);
        assert_eq!(list.logical_text(), "e\u{301}");
    }

    #[test]
    fn test_markup() {
        let list = TokenList::from_text("a <b");
        assert_eq!(
            list.to_markup(),
            concat!(
                r#"<span class="word"><span class="char">a</span></span>"#,
                r#"<span class="char">&nbsp;</span>"#,
                r#"<span class="word"><span class="char">&lt;</span><span class="char">b</span></span>"#,
            )
        );
    }
}
