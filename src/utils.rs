//! # Utility Functions Module
//!
//! Small helpers shared across the codebase.

/// Converts an iterable of string-like items to `Vec<String>`.
///
/// External tool invocations build their argument lists from a mix of
/// literals and formatted values; this removes the repeated `.to_string()`
/// noise at every call site.
///
/// # Example
/// ```rust
/// use web_media_converter::utils::to_string_vec;
///
/// let quality = 80;
/// let args = to_string_vec(["-q", &quality.to_string(), "-mt"]);
/// ```
pub fn to_string_vec<T, I>(items: I) -> Vec<String>
where
    T: ToString,
    I: IntoIterator<Item = T>,
{
    items.into_iter().map(|item| item.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_string_vec_string_literals() {
        let result = to_string_vec(["hello", "world"]);
        assert_eq!(result, vec!["hello".to_string(), "world".to_string()]);
    }

    #[test]
    fn test_to_string_vec_mixed_types() {
        let num = 42;
        let result = to_string_vec(["-q", &num.to_string(), "-mt"]);
        assert_eq!(result, vec!["-q".to_string(), "42".to_string(), "-mt".to_string()]);
    }

    #[test]
    fn test_to_string_vec_empty() {
        let result: Vec<String> = to_string_vec(Vec::<&str>::new());
        assert_eq!(result, Vec::<String>::new());
    }
}
