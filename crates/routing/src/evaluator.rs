//! MatcherEvaluator - Pure predicate evaluation over a routing context

use fancy_regex::{Regex, RegexBuilder};
use shared::{ComplexityLevel, KeywordMode, Matcher, RoutingContext};

/// Keywords that each add one point to the complexity score
pub const TECHNICAL_KEYWORDS: &[&str] = &[
    "architecture",
    "performance",
    "async",
    "security",
    "concurrency",
    "database",
    "algorithm",
    "optimization",
    "scalability",
    "refactor",
    "distributed",
    "microservice",
    "infrastructure",
    "authentication",
    "encryption",
    "migration",
];

/// Lines per complexity point
const LINES_PER_POINT: usize = 10;

/// Upper bound on compiled program size; larger patterns fail closed
const REGEX_SIZE_LIMIT: usize = 1 << 20;

/// Backtracking steps allowed per match before the matcher gives up
const BACKTRACK_LIMIT: usize = 100_000;

/// Evaluates a single matcher against a routing context
#[derive(Debug, Clone, Copy, Default)]
pub struct MatcherEvaluator;

impl MatcherEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate a matcher. Never fails: an unusable regex is simply false.
    pub fn evaluate(&self, matcher: &Matcher, context: &RoutingContext) -> bool {
        match matcher {
            Matcher::Keyword { keywords, mode } => {
                let prompt = context.prompt.to_lowercase();
                let mut hits = keywords
                    .iter()
                    .map(|k| prompt.contains(k.to_lowercase().as_str()));
                match mode {
                    KeywordMode::Any => hits.any(|hit| hit),
                    KeywordMode::All => hits.all(|hit| hit),
                }
            }
            Matcher::Complexity { threshold } => {
                complexity_score(&context.prompt) >= threshold.threshold()
            }
            Matcher::Regex { pattern, flags } => compile_pattern(pattern, flags.as_deref())
                .map(|re| bounded_match(&re, &context.prompt))
                .unwrap_or(false),
            Matcher::ProjectContext { has_files, has_deps } => {
                contains_all(has_files.as_deref(), context.project_files.as_deref())
                    && contains_all(has_deps.as_deref(), context.project_deps.as_deref())
            }
            Matcher::Always => true,
        }
    }

    /// Human-readable description of what a matcher saw in the context
    pub fn summarize(&self, matcher: &Matcher, context: &RoutingContext) -> String {
        match matcher {
            Matcher::Keyword { keywords, mode } => {
                let found = matched_keywords(keywords, &context.prompt);
                let mode = match mode {
                    KeywordMode::Any => "any",
                    KeywordMode::All => "all",
                };
                format!("keywords ({}): {}", mode, found.join(", "))
            }
            Matcher::Complexity { threshold } => describe_complexity(&context.prompt, *threshold),
            Matcher::Regex { pattern, flags } => {
                let found = compile_pattern(pattern, flags.as_deref())
                    .and_then(|re| re.find(&context.prompt).ok().flatten())
                    .map(|m| m.as_str().to_string());
                match found {
                    Some(text) => format!("pattern /{}/ matched \"{}\"", pattern, text),
                    None => format!("pattern /{}/", pattern),
                }
            }
            Matcher::ProjectContext { has_files, has_deps } => format!(
                "files: [{}], deps: [{}]",
                has_files.as_deref().unwrap_or_default().join(", "),
                has_deps.as_deref().unwrap_or_default().join(", ")
            ),
            Matcher::Always => "always".to_string(),
        }
    }
}

/// Keywords present in the prompt, lower-cased
fn matched_keywords(keywords: &[String], prompt: &str) -> Vec<String> {
    let prompt = prompt.to_lowercase();
    keywords
        .iter()
        .map(|k| k.to_lowercase())
        .filter(|k| prompt.contains(k.as_str()))
        .collect()
}

/// `ceil(lines / 10) + technical keyword hits`
pub fn complexity_score(prompt: &str) -> u32 {
    let lines = prompt.split('\n').count();
    let length_points = lines.div_ceil(LINES_PER_POINT);
    (length_points + technical_keyword_hits(prompt)) as u32
}

fn technical_keyword_hits(prompt: &str) -> usize {
    let prompt = prompt.to_lowercase();
    TECHNICAL_KEYWORDS
        .iter()
        .filter(|k| prompt.contains(*k))
        .count()
}

fn describe_complexity(prompt: &str, level: ComplexityLevel) -> String {
    format!(
        "complexity score {} (threshold {} = {})",
        complexity_score(prompt),
        level.as_str(),
        level.threshold()
    )
}

/// Compile a pattern with JS-style flags. Absent flags mean case-insensitive.
///
/// Lookaround and backreferences are supported. Returns `None` for malformed
/// patterns, unknown flags and oversized programs.
pub fn compile_pattern(pattern: &str, flags: Option<&str>) -> Option<Regex> {
    let mut inline = String::new();
    for flag in flags.unwrap_or("i").chars() {
        match flag {
            'i' | 'm' | 's' | 'x' => {
                if !inline.contains(flag) {
                    inline.push(flag);
                }
            }
            // unicode is always on; global / sticky have no meaning for a boolean test
            'u' | 'g' | 'y' => {}
            other => {
                tracing::debug!(pattern, flag = %other, "unsupported regex flag");
                return None;
            }
        }
    }

    let source = if inline.is_empty() {
        pattern.to_string()
    } else {
        format!("(?{}){}", inline, pattern)
    };

    let built = RegexBuilder::new(&source)
        .backtrack_limit(BACKTRACK_LIMIT)
        .delegate_size_limit(REGEX_SIZE_LIMIT)
        .build();

    match built {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::debug!(pattern, error = %e, "regex matcher failed to compile");
            None
        }
    }
}

/// Test `re` against `text`; exceeding the backtrack budget counts as no match
fn bounded_match(re: &Regex, text: &str) -> bool {
    match re.is_match(text) {
        Ok(matched) => matched,
        Err(e) => {
            tracing::debug!(pattern = re.as_str(), error = %e, "regex matcher aborted");
            false
        }
    }
}

/// Every required entry must be present; an absent or empty requirement is vacuously met
fn contains_all(required: Option<&[String]>, available: Option<&[String]>) -> bool {
    let required = required.unwrap_or_default();
    let available = available.unwrap_or_default();
    required.iter().all(|r| available.contains(r))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(prompt: &str) -> RoutingContext {
        RoutingContext::new(prompt)
    }

    fn keyword(keywords: &[&str], mode: KeywordMode) -> Matcher {
        Matcher::Keyword {
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            mode,
        }
    }

    fn regex(pattern: &str, flags: Option<&str>) -> Matcher {
        Matcher::Regex {
            pattern: pattern.to_string(),
            flags: flags.map(|s| s.to_string()),
        }
    }

    // ============== Keyword Tests ==============

    #[test]
    fn test_keyword_any() {
        let eval = MatcherEvaluator::new();
        let m = keyword(&["jira", "ticket"], KeywordMode::Any);
        assert!(eval.evaluate(&m, &ctx("Please update the ticket status")));
    }

    #[test]
    fn test_keyword_all_missing_one() {
        let eval = MatcherEvaluator::new();
        let m = keyword(&["jira", "ticket"], KeywordMode::All);
        assert!(!eval.evaluate(&m, &ctx("Please update the ticket status")));
        assert!(eval.evaluate(&m, &ctx("Close the JIRA ticket")));
    }

    #[test]
    fn test_keyword_case_insensitive_substring() {
        let eval = MatcherEvaluator::new();
        let m = keyword(&["Refactor"], KeywordMode::Any);
        // Substring containment, no tokenization
        assert!(eval.evaluate(&m, &ctx("needs REFACTORING soon")));
        assert!(!eval.evaluate(&m, &ctx("rewrite it")));
    }

    // ============== Complexity Tests ==============

    #[test]
    fn test_complexity_score_boundaries() {
        let eval = MatcherEvaluator::new();
        let mut lines = vec!["line of text"; 52];
        lines.push("review the architecture");
        lines.push("check performance");
        lines.push("and security");
        let prompt = lines.join("\n");

        assert_eq!(prompt.split('\n').count(), 55);
        assert_eq!(complexity_score(&prompt), 9);

        let c = ctx(&prompt);
        let level = |threshold| Matcher::Complexity { threshold };
        assert!(eval.evaluate(&level(ComplexityLevel::Low), &c));
        assert!(eval.evaluate(&level(ComplexityLevel::Medium), &c));
        assert!(!eval.evaluate(&level(ComplexityLevel::High), &c));
    }

    #[test]
    fn test_complexity_threshold_inclusive() {
        let eval = MatcherEvaluator::new();
        // 1 line -> 1 point, plus "async" -> 2 points == low
        let c = ctx("make this async");
        assert_eq!(complexity_score(&c.prompt), 2);
        assert!(eval.evaluate(&Matcher::Complexity { threshold: ComplexityLevel::Low }, &c));
    }

    #[test]
    fn test_complexity_empty_prompt() {
        assert_eq!(complexity_score(""), 1);
    }

    // ============== Regex Tests ==============

    #[test]
    fn test_regex_default_case_insensitive() {
        let eval = MatcherEvaluator::new();
        assert!(eval.evaluate(&regex(r"^fix\s+bug", None), &ctx("FIX bug in parser")));
    }

    #[test]
    fn test_regex_explicit_flags() {
        let eval = MatcherEvaluator::new();
        assert!(!eval.evaluate(&regex("^fix", Some("")), &ctx("FIX it")));
        assert!(eval.evaluate(&regex("^fix", Some("gi")), &ctx("FIX it")));
        assert!(eval.evaluate(&regex("^second", Some("m")), &ctx("first\nsecond")));
    }

    #[test]
    fn test_regex_invalid_pattern_fails_closed() {
        let eval = MatcherEvaluator::new();
        for pattern in ["(unclosed", "[a-", "*", ""] {
            let m = regex(pattern, None);
            let result = eval.evaluate(&m, &ctx("anything at all"));
            // The empty pattern is valid and matches; everything else is malformed here
            assert_eq!(result, pattern.is_empty(), "pattern {:?}", pattern);
        }
    }

    #[test]
    fn test_regex_lookahead_and_backreference() {
        let eval = MatcherEvaluator::new();
        let release = regex(r"^(?!.*draft).*release", None);
        assert!(eval.evaluate(&release, &ctx("cut the release")));
        assert!(!eval.evaluate(&release, &ctx("draft the release notes")));

        let doubled = regex(r"\b(\w+)\s+\1\b", None);
        assert!(eval.evaluate(&doubled, &ctx("fix the the typo")));
        assert!(!eval.evaluate(&doubled, &ctx("fix the typo")));

        let after_fix = regex(r"(?<=fix )bug", None);
        assert!(eval.evaluate(&after_fix, &ctx("please FIX BUG 12")));
    }

    #[test]
    fn test_regex_backtrack_budget_fails_closed() {
        let eval = MatcherEvaluator::new();
        let prompt = "ab".repeat(30);
        let m = regex("(a|b|ab)*(?=c)", None);
        assert!(!eval.evaluate(&m, &ctx(&prompt)));
    }

    #[test]
    fn test_regex_unknown_flag_fails_closed() {
        let eval = MatcherEvaluator::new();
        assert!(!eval.evaluate(&regex(".*", Some("q")), &ctx("anything")));
    }

    // ============== Project Context Tests ==============

    #[test]
    fn test_project_context_dep_missing() {
        let eval = MatcherEvaluator::new();
        let m = Matcher::ProjectContext {
            has_files: Some(vec!["package.json".to_string()]),
            has_deps: Some(vec!["vitest".to_string()]),
        };
        let c = ctx("run tests")
            .with_files(["package.json"])
            .with_deps(Vec::<String>::new());
        assert!(!eval.evaluate(&m, &c));

        let c = c.with_deps(["vitest", "react"]);
        assert!(eval.evaluate(&m, &c));
    }

    #[test]
    fn test_project_context_vacuous() {
        let eval = MatcherEvaluator::new();
        let absent = Matcher::ProjectContext {
            has_files: None,
            has_deps: None,
        };
        let empty = Matcher::ProjectContext {
            has_files: Some(Vec::new()),
            has_deps: Some(Vec::new()),
        };
        assert!(eval.evaluate(&absent, &ctx("x")));
        assert!(eval.evaluate(&empty, &ctx("x").with_files(["a.rs"])));
    }

    // ============== Always / Summary Tests ==============

    #[test]
    fn test_always() {
        assert!(MatcherEvaluator::new().evaluate(&Matcher::Always, &ctx("")));
    }

    #[test]
    fn test_summaries() {
        let eval = MatcherEvaluator::new();
        let c = ctx("Update the Jira ticket");
        assert_eq!(
            eval.summarize(&keyword(&["jira", "ticket", "sprint"], KeywordMode::Any), &c),
            "keywords (any): jira, ticket"
        );
        assert_eq!(
            eval.summarize(&regex("ji+ra", None), &c),
            "pattern /ji+ra/ matched \"Jira\""
        );
        assert_eq!(eval.summarize(&Matcher::Always, &c), "always");
    }
}
