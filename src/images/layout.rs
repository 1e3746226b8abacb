/// Splits `text` into lines of at most `max_chars_per_line` bytes
///
/// Words are separated by single spaces. A word is appended to the current
/// line while `line.len() + word.len() + 1 <= max_chars_per_line`; otherwise the
/// current line is closed and the word starts a new one. Every line keeps its
/// trailing space and the final line is always emitted.
///
/// # Examples
///
/// ```
/// use doc_harvest::images::split_text;
///
/// let lines = split_text("Best bank bonuses this week", 12);
/// assert_eq!(lines, vec!["Best bank ", "bonuses ", "this week "]);
/// ```
pub fn split_text(text: &str, max_chars_per_line: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split(' ') {
        if current.len() + word.len() + 1 <= max_chars_per_line {
            current.push_str(word);
            current.push(' ');
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current.push(' ');
        }
    }
    lines.push(current);

    lines
}
