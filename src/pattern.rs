use regex::{Regex, RegexBuilder};
use std::fmt;

/// One compiled gitignore-style rule.
///
/// Rules keep their position in the source file (`source_order`) because the
/// verdict over a rule list is order sensitive: the last matching rule wins.
#[derive(Debug)]
pub struct IgnoreRule {
    matcher: Regex,
    pub negated: bool,
    pub directory_only: bool,
    pub anchored: bool,
    pub source_order: usize,
}

impl IgnoreRule {
    pub fn matches(&self, rel_path: &str) -> bool {
        self.matcher.is_match(rel_path)
    }
}

impl fmt::Display for IgnoreRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rule#{}{}{}{}",
            self.source_order,
            if self.negated { " negated" } else { "" },
            if self.directory_only { " dir-only" } else { "" },
            if self.anchored { " anchored" } else { "" },
        )
    }
}

/// An ordered list of ignore rules, as read from a `.gitignore`.
#[derive(Debug, Default)]
pub struct IgnoreRules {
    rules: Vec<IgnoreRule>,
}

impl IgnoreRules {
    /// Parse the text of an ignore file. Never fails: malformed patterns
    /// degrade to literal matching instead of erroring out.
    pub fn parse(text: &str) -> Self {
        let mut rules = Vec::new();
        for (source_order, raw) in text.lines().enumerate() {
            let line = raw.replace('\t', " ");
            let line = line.trim_end();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut line = line.to_string();
            let negated = line.starts_with('!');
            if negated {
                line.remove(0);
            }
            // `\#` and `\!` denote literal leading characters.
            if line.starts_with("\\#") || line.starts_with("\\!") {
                line.remove(0);
            }

            let directory_only = line.ends_with('/');
            if directory_only {
                line = line.trim_end_matches('/').to_string();
            }

            let anchored = line.starts_with('/');
            if anchored {
                line.remove(0);
            }
            if line.is_empty() {
                continue;
            }

            rules.push(IgnoreRule {
                matcher: compile_glob(&line, anchored),
                negated,
                directory_only,
                anchored,
                source_order,
            });
        }
        Self { rules }
    }

    /// Last-match-wins verdict over the rule list. Directory-only rules are
    /// skipped for non-directories; no matching rule means "not ignored".
    pub fn is_ignored(&self, rel_path: &str, is_dir: bool) -> bool {
        let mut verdict: Option<bool> = None;
        for rule in &self.rules {
            if rule.directory_only && !is_dir {
                continue;
            }
            if rule.matches(rel_path) {
                verdict = Some(!rule.negated);
            }
        }
        verdict == Some(true)
    }
}

/// A set of ad-hoc globs (`--match` / `--ignore`), applied as a post-filter
/// on top of the ignore-file verdict.
#[derive(Debug, Default)]
pub struct GlobSet {
    patterns: Vec<Regex>,
}

impl GlobSet {
    pub fn compile(globs: &[String]) -> Self {
        let patterns = globs
            .iter()
            .map(|glob| {
                let anchored = glob.starts_with('/');
                let pattern = if anchored { &glob[1..] } else { glob.as_str() };
                compile_glob(pattern, anchored)
            })
            .collect();
        Self { patterns }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn matches(&self, rel_path: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(rel_path))
    }
}

/// Translate one gitignore-style pattern into a compiled regex.
///
/// `**/` matches zero or more whole path segments, a bare `**` crosses
/// slashes, `*` and `?` stop at `/`, and `[...]` becomes a character class
/// with `!` negation. An unanchored pattern may match at any nesting depth.
fn compile_glob(pattern: &str, anchored: bool) -> Regex {
    let prefix = if anchored { "^" } else { "(^|.*/)" };
    let translated = format!("{prefix}{}(/.*)?$", glob_regex_source(pattern));
    // Fail open: a translation the regex engine rejects (e.g. an empty
    // bracket class) degrades to literal matching of the whole pattern.
    let literal = format!("{prefix}{}(/.*)?$", regex::escape(pattern));
    build_case_insensitive(&translated)
        .or_else(|| build_case_insensitive(&literal))
        .expect("escaped literal pattern always compiles")
}

fn build_case_insensitive(source: &str) -> Option<Regex> {
    RegexBuilder::new(source).case_insensitive(true).build().ok()
}

fn glob_regex_source(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2);

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            '*' => {
                if i + 1 < chars.len() && chars[i + 1] == '*' {
                    if i + 2 < chars.len() && chars[i + 2] == '/' {
                        out.push_str("(.*/)?"); // `**/`: zero or more segments
                        i += 3;
                        continue;
                    }
                    out.push_str(".*"); // bare `**` crosses slashes
                    i += 2;
                    continue;
                }
                out.push_str("[^/]*");
            }
            '?' => out.push_str("[^/]"),
            '/' => out.push('/'),
            '[' => {
                match chars[i + 1..].iter().position(|&ch| ch == ']') {
                    None => out.push_str("\\["), // unterminated class: literal `[`
                    Some(offset) => {
                        let class = &chars[i + 1..i + 1 + offset];
                        let negate = class.first() == Some(&'!');
                        let body = if negate { &class[1..] } else { class };
                        out.push('[');
                        if negate {
                            out.push('^');
                        }
                        for &cc in body {
                            if matches!(cc, '\\' | '^' | ']') {
                                out.push('\\');
                            }
                            out.push(cc);
                        }
                        out.push(']');
                        i += offset + 2;
                        continue;
                    }
                }
            }
            other => out.push_str(&regex::escape(&other.to_string())),
        }
        i += 1;
    }

    out
}
