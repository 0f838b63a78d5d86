//! Throttle file parser

use super::{ThrottleError, ThrottleRule};

/// Parse a throttle source into rules, in file order
///
/// `#` starts a comment, blank lines are skipped and every other line must
/// be exactly `pattern rate` with a positive rate in bytes per second.
pub fn parse_throttles(source: &str) -> Result<Vec<ThrottleRule>, ThrottleError> {
    let mut rules = Vec::new();

    for (index, raw) in source.lines().enumerate() {
        let line = raw.split_once('#').map_or(raw, |(before, _)| before).trim();
        if line.is_empty() {
            continue;
        }

        let words: Vec<&str> = line.split_whitespace().collect();
        let [pattern, rate] = words.as_slice() else {
            return Err(ThrottleError::Malformed {
                line: index + 1,
                text: line.to_string(),
            });
        };

        let max_bytes_per_sec = match rate.parse::<u64>() {
            Ok(rate) if rate > 0 => rate,
            _ => {
                return Err(ThrottleError::InvalidRate {
                    line: index + 1,
                    text: line.to_string(),
                })
            }
        };

        rules.push(ThrottleRule {
            pattern: (*pattern).to_string(),
            max_bytes_per_sec,
        });
    }

    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rules() {
        let source = "\
# static assets
/img/*      20000
*.mp4|*.webm   100000   # video

/slow.bin 1
";
        let rules = parse_throttles(source).unwrap();
        assert_eq!(rules.len(), 3);
        assert_eq!(rules[0].pattern, "/img/*");
        assert_eq!(rules[0].max_bytes_per_sec, 20000);
        assert_eq!(rules[1].pattern, "*.mp4|*.webm");
        assert_eq!(rules[1].max_bytes_per_sec, 100_000);
        assert_eq!(rules[2].pattern, "/slow.bin");
        assert_eq!(rules[2].max_bytes_per_sec, 1);
    }

    #[test]
    fn test_empty_source() {
        assert!(parse_throttles("").unwrap().is_empty());
        assert!(parse_throttles("# only comments\n\n   \n").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_line() {
        let err = parse_throttles("/img/* 100\n/video/*\n").unwrap_err();
        assert!(matches!(err, ThrottleError::Malformed { line: 2, .. }));

        let err = parse_throttles("/img/* 100 extra").unwrap_err();
        assert!(matches!(err, ThrottleError::Malformed { line: 1, .. }));
    }

    #[test]
    fn test_invalid_rate() {
        let err = parse_throttles("/img/* fast").unwrap_err();
        assert!(matches!(err, ThrottleError::InvalidRate { line: 1, .. }));

        let err = parse_throttles("/img/* 0").unwrap_err();
        assert!(matches!(err, ThrottleError::InvalidRate { line: 1, .. }));

        let err = parse_throttles("/img/* -5").unwrap_err();
        assert!(matches!(err, ThrottleError::InvalidRate { .. }));
    }
}
