//! URL navigation rules.
//!
//! Rules are glob patterns (`*` only, ASCII case-insensitive). A rule
//! starting with `^` blocks instead of allowing. Every rule is checked and
//! the last one that matches decides; if none match, the default applies.

/// Match `text` against a `*`-only glob, ignoring ASCII case.
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let p = pattern.as_bytes();
    let t = text.as_bytes();
    let (mut pi, mut ti) = (0usize, 0usize);
    let mut star: Option<usize> = None;
    let mut star_t = 0usize;

    while ti < t.len() {
        if pi < p.len() && p[pi] != b'*' && p[pi].eq_ignore_ascii_case(&t[ti]) {
            pi += 1;
            ti += 1;
        } else if pi < p.len() && p[pi] == b'*' {
            star = Some(pi);
            pi += 1;
            star_t = ti;
        } else if let Some(s) = star {
            pi = s + 1;
            star_t += 1;
            ti = star_t;
        } else {
            return false;
        }
    }
    while pi < p.len() && p[pi] == b'*' {
        pi += 1;
    }
    pi == p.len()
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Rule {
    pattern: String,
    block: bool,
}

impl Rule {
    fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }
        Some(match raw.strip_prefix('^') {
            Some(rest) => Rule {
                pattern: rest.to_string(),
                block: true,
            },
            None => Rule {
                pattern: raw.to_string(),
                block: false,
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRules {
    rules: Vec<Rule>,
    default_allow: bool,
}

impl Default for NavigationRules {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            default_allow: true,
        }
    }
}

impl NavigationRules {
    pub fn new<I, S>(rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            rules: rules
                .into_iter()
                .filter_map(|r| Rule::parse(r.as_ref()))
                .collect(),
            default_allow: true,
        }
    }

    /// Parse a comma-separated rule string. Entries are trimmed of spaces
    /// and tabs; empty entries are dropped.
    pub fn parse_list(rules: &str) -> Self {
        Self::new(rules.split(',').map(|r| r.trim_matches([' ', '\t'])))
    }

    pub fn with_default(mut self, allow: bool) -> Self {
        self.default_allow = allow;
        self
    }

    /// Append `later` after the existing rules, so its rules take
    /// precedence. The default of `self` is kept.
    pub fn append(&mut self, later: NavigationRules) {
        self.rules.extend(later.rules);
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn allows(&self, url: &str) -> bool {
        self.rules
            .iter()
            .rev()
            .find(|r| glob_match(&r.pattern, url))
            .map_or(self.default_allow, |r| !r.block)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // -- glob --

    #[test]
    fn glob_exact_and_wildcards() {
        assert!(glob_match("exact.match.com", "exact.match.com"));
        assert!(glob_match("*.example.com", "www.example.com"));
        assert!(glob_match(
            "https://*.wikipedia.org/*",
            "https://en.wikipedia.org/wiki/Test"
        ));
        assert!(!glob_match("*.google.com", "www.bing.com"));
    }

    #[test]
    fn glob_is_case_insensitive() {
        assert!(glob_match("HTTPS://Example.COM/*", "https://example.com/a"));
    }

    #[test]
    fn glob_star_matches_empty_and_trailing() {
        assert!(glob_match("*", ""));
        assert!(glob_match("abc*", "abc"));
        assert!(glob_match("a**c", "abc"));
        assert!(!glob_match("", "a"));
        assert!(!glob_match("abc", "abcd"));
    }

    #[test]
    fn glob_backtracks() {
        assert!(glob_match("*ab*ab", "xxabyyabab"));
        assert!(!glob_match("*ab*ab", "xxabyyaba"));
    }

    // -- rules --

    #[test]
    fn no_rules_allows_by_default() {
        assert!(NavigationRules::default().allows("https://anything.test"));
        assert!(!NavigationRules::default()
            .with_default(false)
            .allows("https://anything.test"));
    }

    #[test]
    fn last_match_wins() {
        let rules = NavigationRules::new(["^*", "https://*.example.com/*"]);
        assert!(rules.allows("https://docs.example.com/page"));
        assert!(!rules.allows("https://evil.test/"));

        let reversed = NavigationRules::new(["https://*.example.com/*", "^*"]);
        assert!(!reversed.allows("https://docs.example.com/page"));
    }

    #[test]
    fn block_rule_only_affects_matches() {
        let rules = NavigationRules::new(["^https://ads.*"]);
        assert!(!rules.allows("https://ads.tracker.test/x"));
        assert!(rules.allows("https://news.test/"));
    }

    #[test]
    fn comma_separated_list_is_trimmed() {
        let rules = NavigationRules::parse_list(" ^* ,\thttps://ok.test/*\t, ,");
        assert!(rules.allows("https://ok.test/path"));
        assert!(!rules.allows("https://other.test/"));
    }

    #[test]
    fn append_adds_higher_priority_rules() {
        let mut rules = NavigationRules::new(["^*"]).with_default(false);
        rules.append(NavigationRules::parse_list("views://*"));
        assert!(!rules.allows("https://other.test/"));
        assert!(rules.allows("views://main/index.html"));
        assert!(!rules.is_empty());
    }
}
