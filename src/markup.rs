/*!
 * Markup event stream.
 *
 * Pages are consumed as an ordered stream of tag-open, tag-close and text
 * events rather than as a tree. The events come from html5ever's tokenizer,
 * which is tolerant of invalid HTML and decodes character references.
 */

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
    TokenizerResult,
};
use log::trace;

/// Elements that never have a closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// A single markup event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupEvent {
    /// An element was opened
    Open {
        /// Lower-case tag name
        tag: String,
        /// Attribute `(name, value)` pairs, in source order
        attrs: Vec<(String, String)>,
    },
    /// An element was closed
    Close {
        /// Lower-case tag name
        tag: String,
    },
    /// Text content, with character references decoded
    Data(String),
}

impl MarkupEvent {
    /// Build an open event from borrowed parts.
    pub fn open(tag: &str, attrs: &[(&str, &str)]) -> Self {
        MarkupEvent::Open {
            tag: tag.to_string(),
            attrs: attrs
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        }
    }

    /// Build a close event.
    pub fn close(tag: &str) -> Self {
        MarkupEvent::Close { tag: tag.to_string() }
    }

    /// Build a text event.
    pub fn data(text: &str) -> Self {
        MarkupEvent::Data(text.to_string())
    }
}

/// Look up an attribute value by name.
pub fn attr<'a>(attrs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(attr_name, _)| attr_name == name)
        .map(|(_, value)| value.as_str())
}

/// Whether `tag` names a void element.
pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Check whether the attribute list carries `name="value"`.
pub fn has_attr(attrs: &[(String, String)], name: &str, value: &str) -> bool {
    attrs.iter().any(|(n, v)| n == name && v == value)
}

/// Tokenize a page into markup events.
pub fn tokenize(html: &str) -> Vec<MarkupEvent> {
    let mut queue = BufferQueue::new();
    queue.push_back(StrTendril::from_slice(html));

    let mut tokenizer = Tokenizer::new(EventCollector::default(), TokenizerOpts::default());
    match tokenizer.feed(&mut queue) {
        TokenizerResult::Done => {}
        // the sink never asks to pause, so there is no script to run
        TokenizerResult::Script(_) => trace!("Ignoring script pause from tokenizer"),
    }
    tokenizer.end();

    tokenizer.sink.events
}

/// Token sink that flattens tokens into `MarkupEvent`s.
#[derive(Default)]
struct EventCollector {
    events: Vec<MarkupEvent>,
}

impl EventCollector {
    fn push_tag(&mut self, tag: Tag) {
        let name = tag.name.to_string();
        match tag.kind {
            TagKind::StartTag => {
                let attrs = tag
                    .attrs
                    .iter()
                    .map(|a| (a.name.local.to_string(), a.value.to_string()))
                    .collect();
                self.events.push(MarkupEvent::Open { tag: name.clone(), attrs });
                // `<div/>` still opens a div; only void elements close themselves
                if tag.self_closing && is_void_element(&name) {
                    self.events.push(MarkupEvent::Close { tag: name });
                }
            }
            TagKind::EndTag => self.events.push(MarkupEvent::Close { tag: name }),
        }
    }

    fn push_data(&mut self, text: &str) {
        // the tokenizer may split one run of text into several tokens
        if let Some(MarkupEvent::Data(last)) = self.events.last_mut() {
            last.push_str(text);
        } else {
            self.events.push(MarkupEvent::Data(text.to_string()));
        }
    }
}

impl TokenSink for EventCollector {
    type Handle = ();

    fn process_token(&mut self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::TagToken(tag) => self.push_tag(tag),
            Token::CharacterTokens(text) => self.push_data(&text),
            Token::ParseError(message) => trace!("Tolerated markup error: {}", message),
            Token::NullCharacterToken
            | Token::CommentToken(_)
            | Token::DoctypeToken(_)
            | Token::EOFToken => {}
        }
        TokenSinkResult::Continue
    }
}
