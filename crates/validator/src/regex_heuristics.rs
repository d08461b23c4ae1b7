//! Regex performance heuristics
//!
//! These look at the pattern text only. They are approximate and purely
//! advisory: a flagged pattern is still used as written.

use regex::Regex;
use std::sync::OnceLock;

/// Alternation branch count above this is flagged
pub const MAX_ALTERNATIONS: usize = 10;

/// Bounded repetition counts above this are flagged
pub const LARGE_REPETITION: u64 = 1000;

fn nested_quantifier() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\((?:[^()\\]|\\.)*[+*](?:[^()\\]|\\.)*\)[+*{]").expect("static pattern")
    })
}

fn quantified_alternation() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\(((?:[^()\\]|\\.)*\|(?:[^()\\]|\\.)*)\)[+*{]").expect("static pattern")
    })
}

fn quantified_lookaround() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"\(\?<?[=!](?:(?:[^()\\]|\\.)*[+*](?:[^()\\]|\\.)*\)|(?:[^()\\]|\\.)*\)[+*{])",
        )
        .expect("static pattern")
    })
}

/// Every heuristic the pattern trips, as human-readable reasons
pub fn analyze_pattern(pattern: &str) -> Vec<String> {
    let mut reasons = Vec::new();
    let scan = Scan::of(pattern);

    if nested_quantifier().is_match(pattern) {
        reasons.push("has nested quantifiers, which can backtrack catastrophically".to_string());
    }

    if has_overlapping_alternation(pattern) {
        reasons.push("repeats an alternation whose branches overlap".to_string());
    }

    if scan.unbounded_wildcards >= 2 {
        reasons.push(format!(
            "contains {} unbounded wildcards (.* or .+)",
            scan.unbounded_wildcards
        ));
    }

    if let Some(count) = scan.largest_repetition.filter(|c| *c > LARGE_REPETITION) {
        reasons.push(format!(
            "uses a large bounded repetition ({{{}}} > {})",
            count, LARGE_REPETITION
        ));
    }

    if quantified_lookaround().is_match(pattern) {
        reasons.push("combines lookaround with quantifiers".to_string());
    }

    if scan.backreferences {
        reasons.push("uses backreferences".to_string());
    }

    if scan.alternations >= MAX_ALTERNATIONS {
        reasons.push(format!(
            "has {} alternation branches (more than {})",
            scan.alternations + 1,
            MAX_ALTERNATIONS
        ));
    }

    reasons
}

/// `(a|aa)+`, `(x|x)*`: one branch equals or prefixes another inside a repeated group
fn has_overlapping_alternation(pattern: &str) -> bool {
    quantified_alternation().captures_iter(pattern).any(|caps| {
        let body = caps[1].trim_start_matches("?:");
        let branches: Vec<&str> = body.split('|').collect();
        branches.iter().enumerate().any(|(i, a)| {
            branches
                .iter()
                .skip(i + 1)
                .any(|b| a.starts_with(b) || b.starts_with(a))
        })
    })
}

/// Single left-to-right pass over the pattern tracking escapes and classes
#[derive(Debug, Default)]
struct Scan {
    unbounded_wildcards: usize,
    alternations: usize,
    backreferences: bool,
    largest_repetition: Option<u64>,
}

impl Scan {
    fn of(pattern: &str) -> Self {
        let mut scan = Scan::default();
        let chars: Vec<char> = pattern.chars().collect();
        let mut in_class = false;
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            match c {
                '\\' => {
                    if let Some(next) = chars.get(i + 1) {
                        if !in_class && ((next.is_ascii_digit() && *next != '0') || *next == 'k') {
                            scan.backreferences = true;
                        }
                    }
                    i += 2;
                    continue;
                }
                '[' if !in_class => in_class = true,
                ']' if in_class => in_class = false,
                _ if in_class => {}
                '.' if matches!(chars.get(i + 1), Some('*') | Some('+')) => {
                    scan.unbounded_wildcards += 1;
                }
                '|' => scan.alternations += 1,
                '{' => {
                    let end = chars[i..].iter().position(|c| *c == '}').map(|p| p + i);
                    if let Some(end) = end {
                        let body: String = chars[i + 1..end].iter().collect();
                        if let Some(count) = repetition_bound(&body) {
                            scan.largest_repetition =
                                Some(scan.largest_repetition.map_or(count, |m| m.max(count)));
                        }
                    }
                }
                _ => {}
            }
            i += 1;
        }

        scan
    }
}

/// Largest count in `n`, `n,` or `n,m`
fn repetition_bound(body: &str) -> Option<u64> {
    body.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<u64>().ok())
        .collect::<Option<Vec<_>>>()?
        .into_iter()
        .max()
}
