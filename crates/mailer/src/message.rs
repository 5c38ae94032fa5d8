//! The message handed to a transport.

/// Every message goes out with this charset.
pub const UTF_8: &str = "UTF-8";

/// Body content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Plain,
    Html,
}

impl ContentKind {
    pub fn from_html_flag(html: bool) -> Self {
        if html {
            ContentKind::Html
        } else {
            ContentKind::Plain
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ContentKind::Plain => "text/plain",
            ContentKind::Html => "text/html",
        }
    }
}

/// A fully rendered message, ready to post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
    pub content: ContentKind,
    pub charset: &'static str,
}

impl OutgoingMail {
    /// Build a single-recipient message.
    pub fn single(
        from: impl Into<String>,
        to: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
        content: ContentKind,
    ) -> Self {
        Self {
            from: from.into(),
            to: vec![to.into()],
            subject: subject.into(),
            body: body.into(),
            content,
            charset: UTF_8,
        }
    }
}
