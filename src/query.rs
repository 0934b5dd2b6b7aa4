//! Query strings are space-separated tokens. The notifications endpoint only
//! understands `is:unread`; repository scoping has to happen client-side.

use std::sync::OnceLock;

use regex::Regex;

fn is_repo_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"is:repo\(([^)]+)\)").ok())
        .as_ref()
}

/// Rewrite `is:repo(<owner/name>)` tokens into `repo:<owner/name>`.
pub fn normalize(query: &str) -> String {
    match is_repo_pattern() {
        Some(re) => re.replace_all(query, "repo:$1").into_owned(),
        None => query.to_string(),
    }
}

/// The repository a query is scoped to, if any. Only the first `repo:` token counts.
pub fn repo_scope(query: &str) -> Option<&str> {
    query
        .split_whitespace()
        .find_map(|token| token.strip_prefix("repo:"))
        .filter(|scope| !scope.is_empty())
}

/// Whether the query names a repository itself, as `repo:<o/n>` or `is:repo(<o/n>)`.
pub fn has_explicit_repo_filter(query: &str) -> bool {
    query
        .split_whitespace()
        .any(|token| token.starts_with("repo:"))
        || is_repo_pattern().is_some_and(|re| re.is_match(query))
}

pub fn unread_only(query: &str) -> bool {
    query.split_whitespace().any(|token| token == "is:unread")
}

/// Join configured filters and an ad-hoc search into one query.
pub fn combine(filters: &str, search: &str) -> String {
    let filters = filters.trim();
    let search = search.trim();
    match (filters.is_empty(), search.is_empty()) {
        (true, _) => search.to_string(),
        (false, true) => filters.to_string(),
        (false, false) => format!("{} {}", filters, search),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_is_repo_syntax() {
        assert_eq!(
            normalize("is:repo(acme/widgets) is:unread"),
            "repo:acme/widgets is:unread"
        );
    }

    #[test]
    fn normalize_leaves_plain_queries_alone() {
        assert_eq!(normalize("is:unread"), "is:unread");
        assert_eq!(normalize("repo:a/b"), "repo:a/b");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn normalize_rewrites_every_occurrence() {
        assert_eq!(normalize("is:repo(a/b) is:repo(c/d)"), "repo:a/b repo:c/d");
    }

    #[test]
    fn repo_scope_takes_first_token() {
        assert_eq!(repo_scope("is:unread repo:a/b repo:c/d"), Some("a/b"));
    }

    #[test]
    fn repo_scope_ignores_empty_value() {
        assert_eq!(repo_scope("repo: is:unread"), None);
        assert_eq!(repo_scope("is:unread"), None);
    }

    #[test]
    fn repo_scope_after_normalizing() {
        assert_eq!(repo_scope(&normalize("is:repo(a/b)")), Some("a/b"));
        assert_eq!(repo_scope("is:repo(a/b)"), None);
    }

    #[test]
    fn explicit_repo_filter_in_either_syntax() {
        assert!(has_explicit_repo_filter("is:unread repo:a/b"));
        assert!(has_explicit_repo_filter("is:repo(a/b) is:unread"));
        assert!(!has_explicit_repo_filter("is:unread"));
        assert!(!has_explicit_repo_filter("myrepo:a/b is:repo()"));
        assert!(!has_explicit_repo_filter(""));
    }

    #[test]
    fn unread_only_needs_exact_token() {
        assert!(unread_only("repo:a/b is:unread"));
        assert!(!unread_only("is:unreadable"));
    }

    #[test]
    fn combine_joins_non_empty_parts() {
        assert_eq!(combine("is:unread", ""), "is:unread");
        assert_eq!(combine("", "repo:a/b"), "repo:a/b");
        assert_eq!(combine(" is:unread ", " repo:a/b"), "is:unread repo:a/b");
        assert_eq!(combine("", ""), "");
    }
}
