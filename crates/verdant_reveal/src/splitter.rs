//! Token splitting
//!
//! Replaces an element's text with addressable word and character tokens so
//! reveal effects can animate them one by one. Splitting reads the logical
//! text back from the element, so splitting an already-split element yields
//! the same tokens as splitting the original text once.

use verdant_core::{Document, Element, TokenList};

/// Split `element`'s text into word and character tokens
///
/// Does nothing when the element is absent or the document is not
/// interactive. Tweens bound to the element's previous tokens stop
/// affecting it.
pub fn split(document: &Document, element: Option<&Element>) {
    if !document.is_interactive() {
        tracing::trace!("skipping split outside an interactive document");
        return;
    }
    if let Some(element) = element {
        split_element(element);
    }
}

/// Split unconditionally; returns the new token generation
pub(crate) fn split_element(element: &Element) -> u64 {
    let list = TokenList::from_text(&element.text_content());
    tracing::trace!(
        element = ?element.id(),
        words = list.word_count(),
        chars = list.char_count(),
        "text split"
    );
    element.replace_tokens(list)
}

#[cfg(test)]
mod tests {
    use super::*;
    use verdant_core::{Size, TokenKind, SEPARATOR};

    fn interactive() -> Document {
        Document::interactive(Size::new(1280.0, 800.0))
    }

    #[test]
    fn test_split_go_green_now() {
        let document = interactive();
        let element = document.create_element();
        element.set_text("go green now");

        split(&document, Some(&element));

        let tokens = element.tokens().unwrap();
        assert_eq!(tokens.word_count(), 3);
        assert_eq!(tokens.separator_count(), 2);
        assert_eq!(tokens.char_count(), 10);

        let words: Vec<String> = tokens.words().map(|w| w.token.text.clone()).collect();
        assert_eq!(words, ["go", "green", "now"]);
        assert!(tokens
            .separators()
            .all(|s| s.kind == TokenKind::Separator && s.text == SEPARATOR.to_string()));
        assert_eq!(element.text_content(), "go green now");
    }

    #[test]
    fn test_split_twice_matches_single_split() {
        let document = interactive();
        let once = document.create_element();
        once.set_text("a  b c");
        split(&document, Some(&once));

        let twice = document.create_element();
        twice.set_text("a  b c");
        split(&document, Some(&twice));
        split(&document, Some(&twice));

        assert_eq!(once.tokens(), twice.tokens());
        assert_eq!(once.markup(), twice.markup());
    }

    #[test]
    fn test_split_is_noop_when_not_interactive() {
        let document = Document::headless();
        let element = document.create_element();
        element.set_text("go green now");

        split(&document, Some(&element));
        assert!(element.tokens().is_none());
        assert_eq!(element.text_content(), "go green now");
    }

    #[test]
    fn test_split_absent_element() {
        split(&interactive(), None);
    }

    #[test]
    fn test_split_bumps_generation() {
        let document = interactive();
        let element = document.create_element();
        element.set_text("go");

        let first = split_element(&element);
        let second = split_element(&element);
        assert!(second > first);
        assert_eq!(element.token_generation(), second);
    }
}
