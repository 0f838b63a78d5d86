//! Wildcard pattern matching
//!
//! Supports `*` (any run of characters, including none), `?` (exactly one
//! character) and `|` separated alternatives.

/// Check whether `text` matches any alternative of `pattern`
pub fn matches(pattern: &str, text: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    pattern.split('|').any(|alternative| {
        let alternative: Vec<char> = alternative.chars().collect();
        glob(&alternative, &text)
    })
}

/// Iterative glob with single-star backtracking
fn glob(pattern: &[char], text: &[char]) -> bool {
    let (mut p, mut t) = (0, 0);
    // Position of the last `*` seen and the text index it currently absorbs up to
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some('*') => {
                backtrack = Some((p, t));
                p += 1;
            }
            Some(&c) if c == '?' || c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match backtrack {
                Some((star, absorbed)) => {
                    p = star + 1;
                    t = absorbed + 1;
                    backtrack = Some((star, absorbed + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal() {
        assert!(matches("/index.html", "/index.html"));
        assert!(!matches("/index.html", "/index.htm"));
        assert!(!matches("/index.htm", "/index.html"));
    }

    #[test]
    fn test_star() {
        assert!(matches("/img/*", "/img/logo.png"));
        assert!(matches("/img/*", "/img/"));
        assert!(matches("/img/*", "/img/a/b/c.gif"));
        assert!(!matches("/img/*", "/images/logo.png"));
        assert!(matches("*.mp4", "/video/clip.mp4"));
        assert!(matches("/a*b*c", "/aXXbYYc"));
        assert!(!matches("/a*b*c", "/aXXbYY"));
        assert!(matches("*", ""));
    }

    #[test]
    fn test_question_mark() {
        assert!(matches("/v?/data", "/v1/data"));
        assert!(!matches("/v?/data", "/v10/data"));
        assert!(matches("/caf?", "/café"));
    }

    #[test]
    fn test_alternatives() {
        assert!(matches("*.mp4|*.webm", "/clip.webm"));
        assert!(matches("*.mp4|*.webm", "/clip.mp4"));
        assert!(!matches("*.mp4|*.webm", "/clip.ogg"));
    }

    #[test]
    fn test_pattern_matches_itself() {
        assert!(matches("/img/*", "/img/*"));
    }
}
