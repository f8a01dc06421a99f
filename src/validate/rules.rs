//! Path, port and pattern predicates shared by the collector rules.

use crate::spec::PortValue;
use crate::validate::{ValidationError, ValidationResult};
use regex::Regex;

/// Container paths are POSIX: absolute means rooted at `/`.
pub fn is_absolute_path(path: &str) -> bool {
    path.starts_with('/')
}

/// Port number for a numeric port (or a string holding one) in 1..=65535.
/// Named ports are not resolvable at admission time and yield `None`.
pub fn port_number(port: &PortValue) -> Option<u16> {
    let n = match port {
        PortValue::Int(n) => *n,
        PortValue::Str(s) => s.trim().parse::<i64>().ok()?,
    };
    u16::try_from(n).ok().filter(|p| *p != 0)
}

/// Request path of an HTTP endpoint: rooted, no whitespace or control chars.
pub fn is_valid_url_path(path: &str) -> bool {
    path.starts_with('/') && !path.chars().any(|c| c.is_whitespace() || c.is_control())
}

/// Compile a metrics-format pattern and require exactly one capture group.
///
/// Every capturing group counts, named or positional, nested or not.
/// Non-capturing groups `(?:...)` do not.
pub fn compile_metrics_format(pattern: &str) -> ValidationResult<Regex> {
    let re = Regex::new(&literal_braces(pattern)).map_err(|source| ValidationError::InvalidRegex {
        pattern: pattern.to_string(),
        source,
    })?;

    let count = capture_group_count(&re);
    if count != 1 {
        return Err(ValidationError::InvalidRegexCaptureCount {
            pattern: pattern.to_string(),
            count,
        });
    }
    Ok(re)
}

pub fn capture_group_count(re: &Regex) -> usize {
    // captures_len includes the implicit whole-match group.
    re.captures_len().saturating_sub(1)
}

/// Metrics formats are written in the RE2 dialect, where a brace that does not
/// open a counted repetition (`x{2}`, `x{2,}`, `x{2,5}`) is a literal. The
/// `regex` crate rejects such braces, so escape them before compiling.
fn literal_braces(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() + 4);

    // Whether the previous token can take a repetition operator.
    let mut repeatable = false;
    let mut in_class = false;
    let mut class_start = 0usize;

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];

        if c == '\\' {
            out.push(c);
            if let Some(&next) = chars.get(i + 1) {
                out.push(next);
                i += 1;
                // `\p{..}`, `\P{..}` and `\x{..}` carry their own braces.
                if matches!(next, 'p' | 'P' | 'x') && chars.get(i + 1) == Some(&'{') {
                    if let Some(len) = chars[i + 1..].iter().position(|&c| c == '}') {
                        out.extend(&chars[i + 1..=i + 1 + len]);
                        i += 1 + len;
                    }
                }
            }
            repeatable = true;
            i += 1;
            continue;
        }

        if in_class {
            out.push(c);
            // A `]` right after `[` or `[^` is a member, not the end.
            let first = i == class_start || (i == class_start + 1 && chars[class_start] == '^');
            if c == ']' && !first {
                in_class = false;
                repeatable = true;
            }
            i += 1;
            continue;
        }

        match c {
            '[' => {
                out.push(c);
                in_class = true;
                class_start = i + 1;
            }
            '{' => match counted_repetition_end(&chars, i) {
                Some(end) if repeatable => {
                    out.extend(&chars[i..=end]);
                    repeatable = false;
                    i = end;
                }
                _ => {
                    out.push_str("\\{");
                    repeatable = true;
                }
            },
            '}' => {
                out.push_str("\\}");
                repeatable = true;
            }
            '(' | '|' | '*' | '+' | '?' | '^' => {
                out.push(c);
                repeatable = false;
            }
            _ => {
                out.push(c);
                repeatable = true;
            }
        }
        i += 1;
    }

    out
}

/// Index of the closing brace when `chars[start..]` reads `{n}`, `{n,}` or
/// `{n,m}`.
fn counted_repetition_end(chars: &[char], start: usize) -> Option<usize> {
    let close = start + chars[start..].iter().position(|&c| c == '}')?;
    let inner: String = chars[start + 1..close].iter().collect();
    let (min, max) = match inner.split_once(',') {
        Some((min, max)) => (min, Some(max)),
        None => (inner.as_str(), None),
    };
    let digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    let ok = digits(min) && max.is_none_or(|m| m.is_empty() || digits(m));
    ok.then_some(close)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn absolute_paths() {
        assert!(is_absolute_path("/absolute/path"));
        assert!(is_absolute_path("/"));
        assert!(!is_absolute_path("not/absolute/path"));
        assert!(!is_absolute_path("./relative"));
        assert!(!is_absolute_path(""));
    }

    #[test]
    fn ports() {
        assert_eq!(port_number(&PortValue::Int(8888)), Some(8888));
        assert_eq!(port_number(&PortValue::Str("8080".to_string())), Some(8080));
        assert_eq!(port_number(&PortValue::Int(65535)), Some(65535));
        for bad in [
            PortValue::Str("Port".to_string()),
            PortValue::Int(0),
            PortValue::Int(-1),
            PortValue::Int(65536),
        ] {
            assert_eq!(port_number(&bad), None, "{}", bad);
        }
    }

    #[test]
    fn url_paths() {
        assert!(is_valid_url_path("/metrics"));
        assert!(is_valid_url_path("/a/b?format=text"));
        assert!(!is_valid_url_path("not/valid/path"));
        assert!(!is_valid_url_path("/with space"));
        assert!(!is_valid_url_path(""));
    }

    #[test]
    fn malformed_pattern_is_invalid_regex() {
        let err = compile_metrics_format("[").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidRegex { .. }), "{err}");
    }

    #[test]
    fn exactly_one_group_required() {
        assert!(compile_metrics_format(r"{metricName: ([\w|-]+)}").is_ok());
        assert!(compile_metrics_format(r"accuracy=(\d+\.\d+)").is_ok());
        assert!(compile_metrics_format(r"(?:loss|acc)=(?P<value>\d+)").is_ok());
        assert!(compile_metrics_format(r"accuracy=(\p{N}+)").is_ok());
        assert!(compile_metrics_format(r"loss\p{Zs}*=\s*(\d+)").is_ok());
        assert!(compile_metrics_format(r"(\x{1F600}+)").is_ok());

        for (pattern, want) in [("abc", 0), (r"(\w+)=(\d+)", 2), (r"((a)b)", 2)] {
            match compile_metrics_format(pattern) {
                Err(ValidationError::InvalidRegexCaptureCount { count, .. }) => {
                    assert_eq!(count, want, "pattern {}", pattern)
                }
                other => panic!("pattern {}: unexpected {:?}", pattern, other),
            }
        }
    }

    #[test]
    fn braces_follow_re2() {
        assert_eq!(literal_braces(r"{metricName: (\w+)}"), r"\{metricName: (\w+)\}");
        assert_eq!(literal_braces(r"a{2,3}(b)"), r"a{2,3}(b)");
        assert_eq!(literal_braces(r"a{2,}"), r"a{2,}");
        assert_eq!(literal_braces(r"({3})"), r"(\{3\})");
        assert_eq!(literal_braces(r"[{}]"), r"[{}]");
        assert_eq!(literal_braces(r"[]{]"), r"[]{]");
        assert_eq!(literal_braces(r"\{x\}"), r"\{x\}");
        assert_eq!(literal_braces(r"accuracy=(\p{N}+)"), r"accuracy=(\p{N}+)");
        assert_eq!(literal_braces(r"\P{L}{2}"), r"\P{L}{2}");
        assert_eq!(literal_braces(r"(\x{1F600}+)"), r"(\x{1F600}+)");
        assert_eq!(literal_braces(r"\x{41}{3}"), r"\x{41}{3}");

        let re = compile_metrics_format(r"{metricName: ([\w|-]+)}").unwrap();
        let caps = re.captures("{metricName: accuracy}").unwrap();
        assert_eq!(&caps[1], "accuracy");
    }
}
