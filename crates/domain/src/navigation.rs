//! Public-path allowlist.
//!
//! Paths on the allowlist are exempt from the forced redirect to login when
//! a session is invalidated. The root path `/` only matches exactly; every
//! other entry matches as a prefix on a path-segment boundary.

/// Default login location.
pub const LOGIN_PATH: &str = "/login";

/// Default public paths: home, login, register.
pub const DEFAULT_PUBLIC_PATHS: &[&str] = &["/", "/login", "/register"];

/// Ordered set of path prefixes that never force a login redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicPaths {
    prefixes: Vec<String>,
}

impl PublicPaths {
    /// Creates an allowlist from the given prefixes, keeping their order.
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if `path` is exempt from forced redirects.
    #[must_use]
    pub fn is_public(&self, path: &str) -> bool {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        self.prefixes
            .iter()
            .any(|prefix| matches_prefix(prefix, path))
    }
}

impl Default for PublicPaths {
    fn default() -> Self {
        Self::new(DEFAULT_PUBLIC_PATHS.iter().copied())
    }
}

fn matches_prefix(prefix: &str, path: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return path.is_empty() || path == "/";
    }
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_allowlist() {
        let paths = PublicPaths::default();
        assert!(paths.is_public("/"));
        assert!(paths.is_public("/login"));
        assert!(paths.is_public("/login/"));
        assert!(paths.is_public("/register"));
        assert!(paths.is_public("/login?next=/editor"));
    }

    #[test]
    fn root_is_exact_match() {
        let paths = PublicPaths::default();
        assert!(!paths.is_public("/editor"));
        assert!(!paths.is_public("/settings"));
        assert!(!paths.is_public("/profile/alice"));
    }

    #[test]
    fn prefix_respects_segment_boundary() {
        let paths = PublicPaths::default();
        assert!(!paths.is_public("/loginx"));
        assert!(!paths.is_public("/registered"));
    }

    #[test]
    fn custom_allowlist() {
        let paths = PublicPaths::new(["/docs"]);
        assert!(paths.is_public("/docs/intro"));
        assert!(!paths.is_public("/"));
    }
}
