use alloc::string::String;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("incorrect tag format: {tag}")]
pub struct TagParseError {
    pub tag: String,
}

impl TagParseError {
    #[inline]
    #[must_use]
    pub(crate) fn new(tag: &str) -> Self {
        Self { tag: tag.into() }
    }
}
