//! Pull-based token stream over [`html5gum`].
//!
//! [`Tokenizer::next_token`] hands out one [`Token`] at a time and finishes
//! with [`Token::EndOfStream`]. Character references are decoded by
//! html5gum; this layer adds the raw-text state switches a tree builder
//! would normally make, merges adjacent character runs into one text token,
//! and checks every payload for valid UTF-8.
//!
//! Comments, doctypes and parse errors produce no token.

use html5gum::{DefaultEmitter, Readable, State, Token as RawToken};
use thiserror::Error;

type Source<'a> = <&'a [u8] as Readable<'a>>::Reader;

/// One attribute on a start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Lower-cased attribute name.
    pub key: String,
    /// Decoded value; empty for bare attributes like `disabled`.
    pub value: String,
}

/// One lexical unit of an HTML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    StartTag {
        name: String,
        /// Sorted by name. A repeated attribute keeps its first value.
        attributes: Vec<Attribute>,
        self_closing: bool,
    },
    EndTag {
        name: String,
    },
    Text(String),
    /// Input exhausted. Returned again on every later call.
    EndOfStream,
}

/// Structural failure while tokenizing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    #[error("invalid UTF-8 in {token}")]
    InvalidUtf8 { token: &'static str },
}

/// Single-pass cursor over an HTML document.
pub struct Tokenizer<'a> {
    inner: html5gum::Tokenizer<Source<'a>, DefaultEmitter>,
    /// Token read ahead while merging character runs.
    pending: Option<RawToken>,
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            inner: html5gum::Tokenizer::new_with_emitter(input, DefaultEmitter::default()),
            pending: None,
            finished: false,
        }
    }

    /// Pull the next token.
    pub fn next_token(&mut self) -> Result<Token, TokenizeError> {
        while let Some(raw) = self.pull() {
            match raw {
                RawToken::StartTag(tag) => {
                    if !tag.self_closing {
                        if let Some(state) = content_state(&tag.name.0) {
                            self.inner.set_state(state);
                        }
                    }
                    let attributes = tag
                        .attributes
                        .into_iter()
                        .map(|(key, value)| {
                            Ok(Attribute {
                                key: utf8(key.0, "attribute name")?,
                                value: utf8(value.0, "attribute value")?,
                            })
                        })
                        .collect::<Result<Vec<_>, TokenizeError>>()?;
                    return Ok(Token::StartTag {
                        name: utf8(tag.name.0, "tag name")?,
                        attributes,
                        self_closing: tag.self_closing,
                    });
                }
                RawToken::EndTag(tag) => {
                    return Ok(Token::EndTag {
                        name: utf8(tag.name.0, "tag name")?,
                    });
                }
                RawToken::String(run) => {
                    let mut bytes = run.0;
                    loop {
                        match self.pull() {
                            Some(RawToken::String(more)) => bytes.extend_from_slice(&more.0),
                            // Recoverable parse errors split a run but end nothing.
                            Some(RawToken::Error(_)) => {}
                            other => {
                                self.pending = other;
                                break;
                            }
                        }
                    }
                    return Ok(Token::Text(utf8(bytes, "text")?));
                }
                _ => {}
            }
        }
        Ok(Token::EndOfStream)
    }

    fn pull(&mut self) -> Option<RawToken> {
        if let Some(token) = self.pending.take() {
            return Some(token);
        }
        if self.finished {
            return None;
        }
        // Slice input cannot fail to read.
        let token = self.inner.next().and_then(Result::ok);
        self.finished = token.is_none();
        token
    }
}

/// Tokenizer state for the content of an element, for elements whose
/// content is not markup.
fn content_state(name: &[u8]) -> Option<State> {
    match name {
        b"title" | b"textarea" => Some(State::RcData),
        b"iframe" | b"noembed" | b"noframes" | b"noscript" | b"style" | b"xmp" => {
            Some(State::RawText)
        }
        b"script" => Some(State::ScriptData),
        b"plaintext" => Some(State::PlainText),
        _ => None,
    }
}

fn utf8(bytes: Vec<u8>, token: &'static str) -> Result<String, TokenizeError> {
    String::from_utf8(bytes).map_err(|_| TokenizeError::InvalidUtf8 { token })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        let mut tokenizer = Tokenizer::new(input.as_bytes());
        let mut out = Vec::new();
        loop {
            match tokenizer.next_token().unwrap() {
                Token::EndOfStream => return out,
                token => out.push(token),
            }
        }
    }

    fn start(name: &str) -> Token {
        Token::StartTag {
            name: name.to_string(),
            attributes: Vec::new(),
            self_closing: false,
        }
    }

    fn end(name: &str) -> Token {
        Token::EndTag {
            name: name.to_string(),
        }
    }

    fn text(s: &str) -> Token {
        Token::Text(s.to_string())
    }

    fn attr(key: &str, value: &str) -> Attribute {
        Attribute {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_simple_document() {
        assert_eq!(
            tokens("<p>Hello</p>"),
            vec![start("p"), text("Hello"), end("p")]
        );
    }

    #[test]
    fn test_empty_input_is_end_of_stream() {
        let mut tokenizer = Tokenizer::new(b"");
        assert_eq!(tokenizer.next_token(), Ok(Token::EndOfStream));
        assert_eq!(tokenizer.next_token(), Ok(Token::EndOfStream));
    }

    #[test]
    fn test_tag_names_are_lowercased() {
        assert_eq!(
            tokens("<DIV>x</Div>"),
            vec![start("div"), text("x"), end("div")]
        );
    }

    #[test]
    fn test_attributes_are_collected() {
        let toks = tokens(r#"<img width=300 SRC="//a.example/x" data-x='y' hidden>"#);
        assert_eq!(
            toks,
            vec![Token::StartTag {
                name: "img".to_string(),
                attributes: vec![
                    attr("data-x", "y"),
                    attr("hidden", ""),
                    attr("src", "//a.example/x"),
                    attr("width", "300"),
                ],
                self_closing: false,
            }]
        );
    }

    #[test]
    fn test_repeated_attribute_keeps_first_value() {
        let toks = tokens(r#"<img src="/first" src="/second">"#);
        assert_eq!(
            toks,
            vec![Token::StartTag {
                name: "img".to_string(),
                attributes: vec![attr("src", "/first")],
                self_closing: false,
            }]
        );
    }

    #[test]
    fn test_attribute_values_are_decoded() {
        let toks = tokens(r#"<a title="Tom &amp; Jerry" href=/q?a=1&amp;b=2>"#);
        assert_eq!(
            toks,
            vec![Token::StartTag {
                name: "a".to_string(),
                attributes: vec![attr("href", "/q?a=1&b=2"), attr("title", "Tom & Jerry")],
                self_closing: false,
            }]
        );
    }

    #[test]
    fn test_self_closing_tag() {
        assert_eq!(
            tokens("a<br/>b"),
            vec![
                text("a"),
                Token::StartTag {
                    name: "br".to_string(),
                    attributes: Vec::new(),
                    self_closing: true,
                },
                text("b"),
            ]
        );
    }

    #[test]
    fn test_literal_angle_brackets_stay_in_text() {
        assert_eq!(tokens("1 < 2 and 3 <= 4"), vec![text("1 < 2 and 3 <= 4")]);
        assert_eq!(tokens("<<p>"), vec![text("<"), start("p")]);
        assert_eq!(tokens("ends with </"), vec![text("ends with </")]);
    }

    #[test]
    fn test_named_and_numeric_references_are_decoded() {
        assert_eq!(
            tokens("caf&eacute; na&iuml;ve &amp co &#65;&#x42;"),
            vec![text("caf\u{e9} na\u{ef}ve & co AB")]
        );
    }

    #[test]
    fn test_unknown_reference_is_kept() {
        assert_eq!(tokens("&nosuchthing; ok"), vec![text("&nosuchthing; ok")]);
    }

    #[test]
    fn test_comments_and_doctype_produce_nothing() {
        assert_eq!(
            tokens("<!DOCTYPE html><!-- <p>hidden</p> --><p>shown</p>"),
            vec![start("p"), text("shown"), end("p")]
        );
    }

    #[test]
    fn test_script_body_is_raw_text() {
        assert_eq!(
            tokens("<script>if (a < b && c) { x = '<p>'; }</script><p>ok</p>"),
            vec![
                start("script"),
                text("if (a < b && c) { x = '<p>'; }"),
                end("script"),
                start("p"),
                text("ok"),
                end("p"),
            ]
        );
    }

    #[test]
    fn test_raw_text_end_tag_is_case_insensitive() {
        assert_eq!(
            tokens("<style>p{}</STYLE >"),
            vec![start("style"), text("p{}"), end("style")]
        );
    }

    #[test]
    fn test_noscript_body_is_raw_text() {
        assert_eq!(
            tokens("<noscript><p>no js</p></noscript>"),
            vec![start("noscript"), text("<p>no js</p>"), end("noscript")]
        );
    }

    #[test]
    fn test_plaintext_runs_to_end_of_input() {
        assert_eq!(
            tokens("<plaintext><b>bold</b></plaintext>"),
            vec![start("plaintext"), text("<b>bold</b></plaintext>")]
        );
    }

    #[test]
    fn test_title_is_decoded_but_script_is_not() {
        assert_eq!(
            tokens("<title>A &amp; B</title><script>'&amp;'</script>"),
            vec![
                start("title"),
                text("A & B"),
                end("title"),
                start("script"),
                text("'&amp;'"),
                end("script"),
            ]
        );
    }

    #[test]
    fn test_self_closing_iframe_does_not_open_raw_text() {
        assert_eq!(
            tokens("<iframe/><p>after</p>"),
            vec![
                Token::StartTag {
                    name: "iframe".to_string(),
                    attributes: Vec::new(),
                    self_closing: true,
                },
                start("p"),
                text("after"),
                end("p"),
            ]
        );
    }

    #[test]
    fn test_truncated_tag_is_dropped() {
        assert_eq!(tokens("<p>a</p><div class=\"x"), vec![start("p"), text("a"), end("p")]);
        assert_eq!(tokens("x<span"), vec![text("x")]);
    }

    #[test]
    fn test_utf8_text_is_preserved() {
        assert_eq!(
            tokens("\u{a1}Hola <b>caf\u{e9}</b> \u{1f600}"),
            vec![
                text("\u{a1}Hola "),
                start("b"),
                text("caf\u{e9}"),
                end("b"),
                text(" \u{1f600}"),
            ]
        );
    }

    #[test]
    fn test_invalid_utf8_fails_after_earlier_tokens() {
        let mut input = b"<p>Hello</p><p>caf".to_vec();
        input.push(0xC3);
        let mut tokenizer = Tokenizer::new(&input);

        assert_eq!(tokenizer.next_token(), Ok(start("p")));
        assert_eq!(tokenizer.next_token(), Ok(text("Hello")));
        assert_eq!(tokenizer.next_token(), Ok(end("p")));
        assert_eq!(tokenizer.next_token(), Ok(start("p")));
        assert_eq!(
            tokenizer.next_token(),
            Err(TokenizeError::InvalidUtf8 { token: "text" })
        );
    }
}
