/// Tokens starting with one of these attach to the previous token
const ATTACHING: [char; 5] = ['.', '?', ',', ':', ' '];

/// Join tokens into readable text.
///
/// A single space goes before every token except the one at index 0,
/// empty tokens (skipped entirely) and tokens starting with punctuation
/// that attaches to the preceding word.
pub fn join_tokens<S: AsRef<str>>(tokens: &[S]) -> String {
    let mut text = String::new();

    for (i, token) in tokens.iter().enumerate() {
        let token = token.as_ref();
        let Some(first) = token.chars().next() else {
            continue;
        };

        if i > 0 && !ATTACHING.contains(&first) {
            text.push(' ');
        }
        text.push_str(token);
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let tokens: [&str; 0] = [];
        assert_eq!(join_tokens(&tokens), "");
        assert_eq!(join_tokens(&["", ""]), "");
    }

    #[test]
    fn test_plain_words() {
        assert_eq!(join_tokens(&["a", "b"]), "a b");
    }

    #[test]
    fn test_punctuation_attaches() {
        let tokens = ["My", "name", "is", "Bond", ",", "James", "Bond", "."];
        assert_eq!(join_tokens(&tokens), "My name is Bond, James Bond.");
    }

    #[test]
    fn test_leading_space_token() {
        assert_eq!(join_tokens(&["Does", "Jamy", "read", " ?"]), "Does Jamy read ?");
    }

    #[test]
    fn test_empty_tokens_are_skipped() {
        assert_eq!(join_tokens(&["a", "", "b"]), "a b");
        assert_eq!(join_tokens(&["", "a"]), " a");
    }

    #[test]
    fn test_exclamation_does_not_attach() {
        assert_eq!(join_tokens(&["Have a", "nice", "day", "!"]), "Have a nice day !");
    }

    #[test]
    fn test_accepts_owned_strings() {
        let tokens = vec!["Hello".to_string(), ":".to_string(), "world".to_string()];
        assert_eq!(join_tokens(&tokens), "Hello: world");
    }
}
