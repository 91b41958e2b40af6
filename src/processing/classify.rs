//! Status type classification.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::config::StatusColumns;
use crate::error::AnalysisResult;
use crate::types::{Schema, Value};

/// What kind of post a status is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusType {
    /// A post written from scratch.
    Original,
    /// A re-share of another post (text starts with `RT`).
    Repost,
    /// A post answering another post.
    Reply,
}

impl StatusType {
    pub const ALL: [StatusType; 3] = [StatusType::Original, StatusType::Repost, StatusType::Reply];

    pub fn as_str(self) -> &'static str {
        match self {
            StatusType::Original => "original",
            StatusType::Repost => "repost",
            StatusType::Reply => "reply",
        }
    }
}

impl fmt::Display for StatusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "original" | "tweet" | "tweets" => Ok(StatusType::Original),
            "repost" | "retweet" | "retweets" => Ok(StatusType::Repost),
            "reply" | "replies" => Ok(StatusType::Reply),
            _ => Err(format!(
                "unknown status type '{s}' (expected original, repost or reply)"
            )),
        }
    }
}

/// Classify one status.
///
/// A present reply target always wins; otherwise a text starting with the literal `RT`
/// (case-sensitive, no leading whitespace) is a repost; everything else is original.
pub fn classify(reply_target: Option<&str>, text: &str) -> StatusType {
    if reply_target.is_some() {
        StatusType::Reply
    } else if text.starts_with("RT") {
        StatusType::Repost
    } else {
        StatusType::Original
    }
}

/// Row classifier with the reply-target and text columns resolved once.
#[derive(Debug, Clone, Copy)]
pub struct Classifier {
    reply_idx: usize,
    text_idx: usize,
}

impl Classifier {
    pub fn new(schema: &Schema, columns: &StatusColumns) -> AnalysisResult<Self> {
        Ok(Self {
            reply_idx: schema.require(&columns.reply_target)?,
            text_idx: schema.require(&columns.text)?,
        })
    }

    /// Classify a row of the schema this classifier was built for.
    ///
    /// Any non-null reply-target value counts as present; a null text is empty text.
    pub fn classify_row(&self, row: &[Value]) -> StatusType {
        let reply_target = row[self.reply_idx].to_label();
        let text = row[self.text_idx].as_str().unwrap_or("");
        classify(reply_target.as_deref(), text)
    }
}
