//! Auth-failure classification of error responses.
//!
//! The rule table is fixed. Matching is done on the request URL as the
//! caller addressed it (the path relative to the API base, e.g. `/user`),
//! not on the fully resolved URL.

/// How a rule matches the request URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlCondition {
    /// Matches every URL.
    Any,
    /// URL contains the fragment.
    Contains(&'static str),
    /// URL equals the value exactly.
    Equals(&'static str),
}

impl UrlCondition {
    /// Returns true if `url` satisfies the condition.
    #[must_use]
    pub fn matches(self, url: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Contains(fragment) => url.contains(fragment),
            Self::Equals(value) => url == value,
        }
    }
}

/// One row of the auth-failure table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthFailureRule {
    /// HTTP status code.
    pub status: u16,
    /// URL predicate.
    pub url: UrlCondition,
}

/// Status/URL pairs that mean the session is no longer valid.
///
/// The 404 rows treat a missing current-user or profile resource as a dead
/// session; a genuinely deleted resource is indistinguishable here.
pub const AUTH_FAILURE_RULES: &[AuthFailureRule] = &[
    AuthFailureRule {
        status: 401,
        url: UrlCondition::Any,
    },
    AuthFailureRule {
        status: 403,
        url: UrlCondition::Contains("/user"),
    },
    AuthFailureRule {
        status: 404,
        url: UrlCondition::Equals("/user"),
    },
    AuthFailureRule {
        status: 404,
        url: UrlCondition::Contains("/profiles/"),
    },
];

/// Result of classifying an error response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Classification {
    /// The response means the current session is no longer valid.
    pub is_auth_failure: bool,
}

/// Classifies an error response by status and request URL.
#[must_use]
pub fn classify(status: u16, request_url: &str) -> Classification {
    let is_auth_failure = AUTH_FAILURE_RULES
        .iter()
        .any(|rule| rule.status == status && rule.url.matches(request_url));
    Classification { is_auth_failure }
}
