use crate::error::{DocError, Result};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Quote {
    None,
    Single,
    Double,
}

/// Splits a command line into words following POSIX shell quoting.
///
/// Single quotes are literal, double quotes only honor `\\`, `\"`, `\$`,
/// `` \` `` and backslash-newline, and an unquoted backslash escapes
/// whatever follows it. Quoted and unquoted pieces of one word concatenate.
pub fn split_words(input: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut word = String::new();
    // `''` is a word even though nothing gets pushed into it
    let mut in_word = false;
    let mut quote = Quote::None;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match quote {
            Quote::Single => {
                if c == '\'' {
                    quote = Quote::None;
                } else {
                    word.push(c);
                }
            }
            Quote::Double => match c {
                '"' => quote = Quote::None,
                '\\' => match chars.next() {
                    Some('\n') => {}
                    Some(next @ ('\\' | '"' | '$' | '`')) => word.push(next),
                    Some(next) => {
                        word.push('\\');
                        word.push(next);
                    }
                    None => return Err(DocError::malformed_command("no closing quotation")),
                },
                _ => word.push(c),
            },
            Quote::None => match c {
                '\'' => {
                    quote = Quote::Single;
                    in_word = true;
                }
                '"' => {
                    quote = Quote::Double;
                    in_word = true;
                }
                '\\' => match chars.next() {
                    Some('\n') => {}
                    Some(next) => {
                        word.push(next);
                        in_word = true;
                    }
                    None => {
                        return Err(DocError::malformed_command(
                            "no escaped character after trailing backslash",
                        ));
                    }
                },
                c if c.is_whitespace() => {
                    if in_word {
                        words.push(std::mem::take(&mut word));
                        in_word = false;
                    }
                }
                _ => {
                    word.push(c);
                    in_word = true;
                }
            },
        }
    }

    if quote != Quote::None {
        return Err(DocError::malformed_command("no closing quotation"));
    }
    if in_word {
        words.push(word);
    }

    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_whitespace() {
        let words = split_words("curl  -X\tPOST\nexample.com").unwrap();
        assert_eq!(words, vec!["curl", "-X", "POST", "example.com"]);
    }

    #[test]
    fn single_quotes_keep_spaces_and_backslashes() {
        let words = split_words(r"curl -H 'Accept: a\b c'").unwrap();
        assert_eq!(words, vec!["curl", "-H", r"Accept: a\b c"]);
    }

    #[test]
    fn double_quotes_honor_shell_escapes() {
        let words = split_words(r#"curl -d "{\"a\": \"x\\y\", \"b\": \"\n\"}""#).unwrap();
        assert_eq!(words[2], r#"{"a": "x\y", "b": "\n"}"#);
    }

    #[test]
    fn adjacent_pieces_join_into_one_word() {
        let words = split_words(r#"curl 'a b'"c d"e\ f"#).unwrap();
        assert_eq!(words, vec!["curl", "a bc de f"]);
    }

    #[test]
    fn empty_quotes_produce_an_empty_word() {
        let words = split_words("curl '' x").unwrap();
        assert_eq!(words, vec!["curl", "", "x"]);
    }

    #[test]
    fn quoted_json_with_newlines_stays_one_word() {
        let words = split_words("curl --data '{\n\t\"text\": \"保收益\"\n}'").unwrap();
        assert_eq!(words[2], "{\n\t\"text\": \"保收益\"\n}");
    }

    #[test]
    fn unterminated_quote_is_rejected() {
        let err = split_words("curl 'example.com").unwrap_err();
        assert!(matches!(err, DocError::MalformedCommand(_)));
    }

    #[test]
    fn trailing_backslash_is_rejected() {
        let err = split_words("curl example.com \\").unwrap_err();
        assert!(matches!(err, DocError::MalformedCommand(_)));
    }

    #[test]
    fn blank_input_has_no_words() {
        assert!(split_words("   ").unwrap().is_empty());
    }
}
