//! Parameter state model: credentials and per-comment submission fields.
//!
//! # Design
//! Every wire field is named by the closed `Field` enum, and values move
//! through one generic `get` / `set` pair instead of a hand-written accessor
//! per field. `None` means "not set"; an empty string is a real value and is
//! sent on the wire as such. Credentials and submission fields are stored
//! separately so clearing one never touches the other.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A named parameter sent to the Akismet endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Blog,
    UserIp,
    UserAgent,
    Referrer,
    Permalink,
    CommentType,
    CommentAuthor,
    CommentAuthorEmail,
    CommentAuthorUrl,
    CommentContent,
    CommentDateGmt,
    CommentPostModifiedGmt,
    BlogLang,
    BlogCharset,
    UserRole,
    IsTest,
}

impl Field {
    /// All fields in wire order.
    pub const ALL: [Field; 16] = [
        Field::Blog,
        Field::UserIp,
        Field::UserAgent,
        Field::Referrer,
        Field::Permalink,
        Field::CommentType,
        Field::CommentAuthor,
        Field::CommentAuthorEmail,
        Field::CommentAuthorUrl,
        Field::CommentContent,
        Field::CommentDateGmt,
        Field::CommentPostModifiedGmt,
        Field::BlogLang,
        Field::BlogCharset,
        Field::UserRole,
        Field::IsTest,
    ];

    /// The snake_case name used in form bodies and configuration maps.
    pub fn name(self) -> &'static str {
        match self {
            Field::Blog => "blog",
            Field::UserIp => "user_ip",
            Field::UserAgent => "user_agent",
            Field::Referrer => "referrer",
            Field::Permalink => "permalink",
            Field::CommentType => "comment_type",
            Field::CommentAuthor => "comment_author",
            Field::CommentAuthorEmail => "comment_author_email",
            Field::CommentAuthorUrl => "comment_author_url",
            Field::CommentContent => "comment_content",
            Field::CommentDateGmt => "comment_date_gmt",
            Field::CommentPostModifiedGmt => "comment_post_modified_gmt",
            Field::BlogLang => "blog_lang",
            Field::BlogCharset => "blog_charset",
            Field::UserRole => "user_role",
            Field::IsTest => "is_test",
        }
    }

    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|field| field.name() == name)
    }

    /// False only for `Blog`, which belongs to the credentials.
    pub fn is_submission(self) -> bool {
        self != Field::Blog
    }
}

/// A stored field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
}

impl FieldValue {
    /// Render for a form body. Flags follow the `1` / `0` convention.
    pub fn encode(&self) -> String {
        match self {
            FieldValue::Text(text) => text.clone(),
            FieldValue::Flag(true) => "1".to_string(),
            FieldValue::Flag(false) => "0".to_string(),
        }
    }

    /// Interpret as a flag. Text is false when empty, `"0"` or `"false"`
    /// (any case) and true otherwise.
    pub fn as_flag(&self) -> bool {
        match self {
            FieldValue::Flag(flag) => *flag,
            FieldValue::Text(text) => {
                !(text.is_empty() || text == "0" || text.eq_ignore_ascii_case("false"))
            }
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::Flag(_) => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

/// API key and site URL. Set once, reused by every operation.
///
/// `Debug` shows whether a key is present but never its value.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub key: Option<String>,
    pub blog: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key.as_ref().map(|_| "<redacted>"))
            .field("blog", &self.blog)
            .finish()
    }
}

impl Credentials {
    /// The key, unless absent or empty.
    pub fn usable_key(&self) -> Option<&str> {
        self.key.as_deref().filter(|key| !key.is_empty())
    }

    /// The blog URL, unless absent or empty.
    pub fn usable_blog(&self) -> Option<&str> {
        self.blog.as_deref().filter(|blog| !blog.is_empty())
    }
}

/// Per-comment fields, set before an operation and cleared by `clear`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Submission {
    pub user_ip: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub permalink: Option<String>,
    pub comment_type: Option<String>,
    pub comment_author: Option<String>,
    pub comment_author_email: Option<String>,
    pub comment_author_url: Option<String>,
    pub comment_content: Option<String>,
    pub comment_date_gmt: Option<String>,
    pub comment_post_modified_gmt: Option<String>,
    pub blog_lang: Option<String>,
    pub blog_charset: Option<String>,
    pub user_role: Option<String>,
    pub is_test: Option<bool>,
}

impl Submission {
    /// Read a field. `Blog` is not a submission field and always yields `None`.
    pub fn get(&self, field: Field) -> Option<FieldValue> {
        match field {
            Field::IsTest => self.is_test.map(FieldValue::Flag),
            _ => self
                .text_slot(field)
                .and_then(|slot| slot.clone())
                .map(FieldValue::Text),
        }
    }

    /// Write a field, coercing the value to the slot's type. `None` clears.
    /// Writes to `Blog` are ignored; it lives in `Credentials`.
    pub fn set(&mut self, field: Field, value: Option<FieldValue>) {
        if field == Field::IsTest {
            self.is_test = value.map(|value| value.as_flag());
            return;
        }
        if let Some(slot) = self.text_slot_mut(field) {
            *slot = value.map(|value| value.encode());
        }
    }

    /// Unset every field.
    pub fn clear(&mut self) {
        *self = Submission::default();
    }

    /// Number of fields currently set.
    pub fn len(&self) -> usize {
        Field::ALL
            .into_iter()
            .filter(|field| field.is_submission() && self.get(*field).is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn text_slot(&self, field: Field) -> Option<&Option<String>> {
        let slot = match field {
            Field::UserIp => &self.user_ip,
            Field::UserAgent => &self.user_agent,
            Field::Referrer => &self.referrer,
            Field::Permalink => &self.permalink,
            Field::CommentType => &self.comment_type,
            Field::CommentAuthor => &self.comment_author,
            Field::CommentAuthorEmail => &self.comment_author_email,
            Field::CommentAuthorUrl => &self.comment_author_url,
            Field::CommentContent => &self.comment_content,
            Field::CommentDateGmt => &self.comment_date_gmt,
            Field::CommentPostModifiedGmt => &self.comment_post_modified_gmt,
            Field::BlogLang => &self.blog_lang,
            Field::BlogCharset => &self.blog_charset,
            Field::UserRole => &self.user_role,
            Field::Blog | Field::IsTest => return None,
        };
        Some(slot)
    }

    fn text_slot_mut(&mut self, field: Field) -> Option<&mut Option<String>> {
        let slot = match field {
            Field::UserIp => &mut self.user_ip,
            Field::UserAgent => &mut self.user_agent,
            Field::Referrer => &mut self.referrer,
            Field::Permalink => &mut self.permalink,
            Field::CommentType => &mut self.comment_type,
            Field::CommentAuthor => &mut self.comment_author,
            Field::CommentAuthorEmail => &mut self.comment_author_email,
            Field::CommentAuthorUrl => &mut self.comment_author_url,
            Field::CommentContent => &mut self.comment_content,
            Field::CommentDateGmt => &mut self.comment_date_gmt,
            Field::CommentPostModifiedGmt => &mut self.comment_post_modified_gmt,
            Field::BlogLang => &mut self.blog_lang,
            Field::BlogCharset => &mut self.blog_charset,
            Field::UserRole => &mut self.user_role,
            Field::Blog | Field::IsTest => return None,
        };
        Some(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_roundtrip_through_from_name() {
        for field in Field::ALL {
            assert_eq!(Field::from_name(field.name()), Some(field));
        }
        assert_eq!(Field::from_name("key"), None);
        assert_eq!(Field::from_name("UserIp"), None);
    }

    #[test]
    fn only_blog_is_not_a_submission_field() {
        let non_submission: Vec<Field> = Field::ALL
            .into_iter()
            .filter(|field| !field.is_submission())
            .collect();
        assert_eq!(non_submission, vec![Field::Blog]);
    }

    #[test]
    fn flag_encoding() {
        assert_eq!(FieldValue::Flag(true).encode(), "1");
        assert_eq!(FieldValue::Flag(false).encode(), "0");
        assert_eq!(FieldValue::from("x").encode(), "x");
    }

    #[test]
    fn text_coerces_to_flag() {
        assert!(FieldValue::from("1").as_flag());
        assert!(FieldValue::from("true").as_flag());
        assert!(FieldValue::from("yes").as_flag());
        assert!(!FieldValue::from("0").as_flag());
        assert!(!FieldValue::from("FALSE").as_flag());
        assert!(!FieldValue::from("").as_flag());
    }

    #[test]
    fn set_and_get_text_field() {
        let mut submission = Submission::default();
        submission.set(Field::UserIp, Some("1.2.3.4".into()));
        assert_eq!(submission.get(Field::UserIp), Some(FieldValue::from("1.2.3.4")));
        assert_eq!(submission.user_ip.as_deref(), Some("1.2.3.4"));
    }

    #[test]
    fn empty_string_is_distinct_from_unset() {
        let mut submission = Submission::default();
        submission.set(Field::Referrer, Some("".into()));
        assert_eq!(submission.get(Field::Referrer), Some(FieldValue::from("")));
        assert_eq!(submission.get(Field::Permalink), None);
    }

    #[test]
    fn is_test_slot_coerces_text() {
        let mut submission = Submission::default();
        submission.set(Field::IsTest, Some("true".into()));
        assert_eq!(submission.is_test, Some(true));
        submission.set(Field::IsTest, Some(false.into()));
        assert_eq!(submission.get(Field::IsTest), Some(FieldValue::Flag(false)));
    }

    #[test]
    fn text_slot_coerces_flag() {
        let mut submission = Submission::default();
        submission.set(Field::CommentType, Some(true.into()));
        assert_eq!(submission.comment_type.as_deref(), Some("1"));
    }

    #[test]
    fn blog_is_ignored_by_submission() {
        let mut submission = Submission::default();
        submission.set(Field::Blog, Some("http://example.com".into()));
        assert_eq!(submission.get(Field::Blog), None);
        assert!(submission.is_empty());
    }

    #[test]
    fn clear_unsets_everything() {
        let mut submission = Submission::default();
        submission.set(Field::CommentAuthor, Some("Eric Smith".into()));
        submission.set(Field::IsTest, Some(true.into()));
        assert_eq!(submission.len(), 2);
        submission.clear();
        assert!(submission.is_empty());
        assert_eq!(submission, Submission::default());
    }

    #[test]
    fn credentials_debug_hides_key() {
        let credentials = Credentials {
            key: Some("secret-key-123".to_string()),
            blog: Some("http://example.com".to_string()),
        };
        let debug = format!("{credentials:?}");
        assert!(!debug.contains("secret-key-123"));
        assert!(debug.contains("<redacted>"));
        assert!(debug.contains("http://example.com"));
        assert!(format!("{:?}", Credentials::default()).contains("key: None"));
    }

    #[test]
    fn credentials_treat_empty_as_unset() {
        let credentials = Credentials {
            key: Some(String::new()),
            blog: Some("http://example.com".to_string()),
        };
        assert_eq!(credentials.usable_key(), None);
        assert_eq!(credentials.usable_blog(), Some("http://example.com"));
    }
}
