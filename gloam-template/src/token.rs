use crate::attrs::parse_attrs;
use crate::template_ast::TemplateAttr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    OpenElement,
    SelfClosingElement,
    OpenComponent,
    SelfClosingComponent,
    SlotOpen,
    SlotSelfClosing,
    EndTag,
    Text,
    HtmlComment,
    EngineComment,
}

impl TokenKind {
    /// Tokens that push a new level onto the tree builder's stack.
    pub fn is_open(self) -> bool {
        matches!(
            self,
            TokenKind::OpenElement | TokenKind::OpenComponent | TokenKind::SlotOpen
        )
    }

    pub fn is_component(self) -> bool {
        matches!(
            self,
            TokenKind::OpenComponent | TokenKind::SelfClosingComponent
        )
    }

    pub fn is_slot(self) -> bool {
        matches!(self, TokenKind::SlotOpen | TokenKind::SlotSelfClosing)
    }

    pub fn is_self_closing(self) -> bool {
        matches!(
            self,
            TokenKind::SelfClosingElement
                | TokenKind::SelfClosingComponent
                | TokenKind::SlotSelfClosing
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub name: Option<String>,
    /// Exact source text the token was read from.
    pub raw: String,
    pub attrs: Vec<TemplateAttr>,
}

impl Token {
    fn leaf(kind: TokenKind, raw: &str) -> Self {
        Self {
            kind,
            name: None,
            raw: raw.to_string(),
            attrs: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

/// Split template source into tokens.
///
/// Never fails: a position no pattern matches is skipped one character at a
/// time, so malformed markup degrades instead of aborting.
pub fn tokenize(source: &str) -> Vec<Token> {
    let tokens = Scanner::new(source.trim()).run();
    tracing::debug!(count = tokens.len(), "tokenized template");
    tokens
}

struct Scanner<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    /// Set while inside a script/style body: the lowercase end tag that closes it.
    raw_until: Option<String>,
    tokens: Vec<Token>,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            raw_until: None,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Token> {
        while self.pos < self.bytes.len() {
            if let Some(end_tag) = self.raw_until.take() {
                self.scan_raw(&end_tag);
                continue;
            }
            if !self.match_token() {
                let step = self.input[self.pos..]
                    .chars()
                    .next()
                    .map_or(1, char::len_utf8);
                self.pos += step;
            }
        }
        self.tokens
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Patterns in priority order; the first one that matches consumes input.
    fn match_token(&mut self) -> bool {
        self.scan_doctype()
            || self.scan_tag()
            || self.scan_end_tag()
            || self.scan_delimited("<!--", "-->", TokenKind::HtmlComment)
            || self.scan_delimited("{#", "#}", TokenKind::EngineComment)
            || self.scan_text()
    }

    fn scan_doctype(&mut self) -> bool {
        let rest = self.rest();
        if !rest.starts_with("<!") || rest.starts_with("<!--") {
            return false;
        }
        let Some(end) = rest.find('>') else {
            return false;
        };
        let raw = &rest[..=end];
        self.tokens.push(Token::leaf(TokenKind::Text, raw));
        self.pos += raw.len();
        true
    }

    fn scan_tag(&mut self) -> bool {
        let rest = self.rest().as_bytes();
        if rest.len() < 2 || rest[0] != b'<' || !rest[1].is_ascii_alphabetic() {
            return false;
        }
        let is_component = rest[1].is_ascii_uppercase();

        let mut i = 1;
        while i < rest.len() && is_name_byte(rest[i], is_component) {
            i += 1;
        }
        let name = &self.rest()[1..i];

        let Some(close) = find_tag_end(rest, i) else {
            return false;
        };
        let region = &self.rest()[i..close];
        let (region, self_closing) = match region.trim_end().strip_suffix('/') {
            Some(inner) => (inner, true),
            None => (region, false),
        };

        let kind = match (is_component, self_closing) {
            _ if name == "Slot" && self_closing => TokenKind::SlotSelfClosing,
            _ if name == "Slot" => TokenKind::SlotOpen,
            (true, true) => TokenKind::SelfClosingComponent,
            (true, false) => TokenKind::OpenComponent,
            (false, true) => TokenKind::SelfClosingElement,
            (false, false) => TokenKind::OpenElement,
        };

        let raw = &self.rest()[..=close];
        self.tokens.push(Token {
            kind,
            name: Some(name.to_string()),
            raw: raw.to_string(),
            attrs: parse_attrs(region),
        });
        self.pos += raw.len();

        if !self_closing && is_raw_text_tag(name) {
            self.raw_until = Some(format!("</{}", name.to_ascii_lowercase()));
        }
        true
    }

    fn scan_end_tag(&mut self) -> bool {
        let rest = self.rest().as_bytes();
        if !rest.starts_with(b"</") {
            return false;
        }
        let mut i = 2;
        while i < rest.len() && is_name_byte(rest[i], true) {
            i += 1;
        }
        if i == 2 {
            return false;
        }
        let name_end = i;
        while i < rest.len() && rest[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= rest.len() || rest[i] != b'>' {
            return false;
        }

        let raw = &self.rest()[..=i];
        self.tokens.push(Token {
            kind: TokenKind::EndTag,
            name: Some(self.rest()[2..name_end].to_string()),
            raw: raw.to_string(),
            attrs: Vec::new(),
        });
        self.pos += raw.len();
        true
    }

    fn scan_delimited(&mut self, open: &str, close: &str, kind: TokenKind) -> bool {
        let rest = self.rest();
        if !rest.starts_with(open) {
            return false;
        }
        let Some(end) = rest[open.len()..].find(close) else {
            return false;
        };
        let raw = &rest[..open.len() + end + close.len()];
        self.tokens.push(Token::leaf(kind, raw));
        self.pos += raw.len();
        true
    }

    fn scan_text(&mut self) -> bool {
        let rest = self.rest();
        let end = rest.find('<').unwrap_or(rest.len());
        if end == 0 {
            return false;
        }
        self.push_text(&rest[..end]);
        self.pos += end;
        true
    }

    /// Script/style body: everything up to the matching end tag is one text token.
    fn scan_raw(&mut self, end_tag: &str) {
        let rest = self.rest();
        let end = find_ignore_ascii_case(rest.as_bytes(), end_tag.as_bytes()).unwrap_or(rest.len());
        self.push_text(&rest[..end]);
        self.pos += end;
    }

    fn push_text(&mut self, text: &str) {
        // Whitespace between tags carries no meaning in the output.
        if !text.trim().is_empty() {
            self.tokens.push(Token::leaf(TokenKind::Text, text));
        }
    }
}

fn is_name_byte(b: u8, allow_dot: bool) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || (allow_dot && b == b'.')
}

fn is_raw_text_tag(name: &str) -> bool {
    matches!(name, "Script" | "Style" | "script" | "style")
}

/// Index of the `>` closing a tag whose attribute region starts at `from`,
/// skipping `>` inside quotes or braces.
fn find_tag_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate().skip(from) {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => match b {
                b'"' | b'\'' => quote = Some(b),
                b'{' => depth += 1,
                b'}' => depth = depth.saturating_sub(1),
                b'>' if depth == 0 => return Some(i),
                _ => {}
            },
        }
    }
    None
}

fn find_ignore_ascii_case(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    (0..=haystack.len() - needle.len()).find(|&i| haystack[i..i + needle.len()].eq_ignore_ascii_case(needle))
}
