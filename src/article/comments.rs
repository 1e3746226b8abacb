use thiserror::Error;

/// Why a comment-count label could not be turned into a number
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommentCountError {
    #[error("comment label is empty")]
    Missing,

    #[error("invalid comment count '{token}' in label '{label}'")]
    Invalid { label: String, token: String },
}

/// Parses a localized comment label such as `"1,890 Comments"`
///
/// Grouping commas are stripped, the label is split on whitespace and the
/// first token is parsed as a base-10 integer.
///
/// # Examples
///
/// ```
/// use doc_harvest::article::parse_comment_count;
///
/// assert_eq!(parse_comment_count("1,890 Comments"), Ok(1890));
/// assert_eq!(parse_comment_count("0 Comments"), Ok(0));
/// assert!(parse_comment_count("Leave a comment").is_err());
/// ```
pub fn parse_comment_count(label: &str) -> Result<u32, CommentCountError> {
    let stripped = label.replace(',', "");
    let token = stripped
        .split_whitespace()
        .next()
        .ok_or(CommentCountError::Missing)?;

    token.parse::<u32>().map_err(|_| CommentCountError::Invalid {
        label: label.to_string(),
        token: token.to_string(),
    })
}
