use crate::core::constants::TAG_LENGTH;
use crate::error::{Result, TernaryError};
use crate::trinary::{is_valid_trytes, pad_trytes};
use serde::{Deserialize, Serialize};

/// Free-form tag of at most 27 trytes, kept without its `9` padding
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    tag: String,
}

impl Tag {
    pub fn new(tag: &str) -> Result<Tag> {
        if tag.len() > TAG_LENGTH {
            return Err(TernaryError::InvalidTag(format!(
                "{} trytes, at most {TAG_LENGTH} allowed",
                tag.len()
            )));
        }
        if !is_valid_trytes(tag) {
            return Err(TernaryError::InvalidTag(format!(
                "'{tag}' is not a tryte string"
            )));
        }
        Ok(Tag {
            tag: tag.trim_end_matches('9').to_string(),
        })
    }

    pub fn get_trytes(&self) -> &str {
        &self.tag
    }

    /// The tag as it sits in a transaction
    pub fn get_padded(&self) -> String {
        pad_trytes(&self.tag, TAG_LENGTH)
    }

    pub fn is_empty(&self) -> bool {
        self.tag.is_empty()
    }
}
