//! Capability evaluation for UI controls.
//!
//! [`can_perform`] is the single decision point every control queries before
//! rendering a mutating action. It is a pure function of the session and a
//! per-call [`CapabilityContext`]; unlisted combinations are denied.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::session::Session;

/// An action a UI control may offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Create a new resource.
    Create,
    /// Edit an existing resource.
    Update,
    /// Remove a resource.
    Delete,
    /// Follow a profile.
    Follow,
    /// Stop following a profile.
    Unfollow,
    /// Favorite an article.
    Like,
    /// Remove a favorite.
    Dislike,
}

impl Action {
    /// Returns the action as a static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Follow => "follow",
            Self::Unfollow => "unfollow",
            Self::Like => "like",
            Self::Dislike => "dislike",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            "follow" => Ok(Self::Follow),
            "unfollow" => Ok(Self::Unfollow),
            "like" => Ok(Self::Like),
            "dislike" => Ok(Self::Dislike),
            _ => Err(DomainError::UnknownAction(s.to_string())),
        }
    }
}

/// The kind of resource an action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// An article.
    Article,
    /// A user profile.
    Profile,
    /// A comment on an article.
    Comment,
}

impl ResourceKind {
    /// Returns the resource kind as a static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Profile => "profile",
            Self::Comment => "comment",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "article" => Ok(Self::Article),
            "profile" => Ok(Self::Profile),
            "comment" => Ok(Self::Comment),
            _ => Err(DomainError::UnknownResource(s.to_string())),
        }
    }
}

/// Per-call ownership hints. Constructed fresh at each query, never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilityContext {
    /// Username of the article's author.
    pub article_author_id: Option<String>,
    /// Username owning the profile being viewed.
    pub profile_owner_id: Option<String>,
    /// Username of the comment's author.
    pub comment_author_id: Option<String>,
    /// Whether the viewer already follows the profile.
    pub following: bool,
}

impl CapabilityContext {
    /// An empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the article author.
    #[must_use]
    pub fn article_author(mut self, username: impl Into<String>) -> Self {
        self.article_author_id = Some(username.into());
        self
    }

    /// Sets the profile owner.
    #[must_use]
    pub fn profile_owner(mut self, username: impl Into<String>) -> Self {
        self.profile_owner_id = Some(username.into());
        self
    }

    /// Sets the comment author.
    #[must_use]
    pub fn comment_author(mut self, username: impl Into<String>) -> Self {
        self.comment_author_id = Some(username.into());
        self
    }

    /// Sets the current following state of the profile.
    #[must_use]
    pub const fn following(mut self, following: bool) -> Self {
        self.following = following;
        self
    }
}

fn is_owner(owner: Option<&str>, session: &Session) -> bool {
    owner.is_some_and(|owner| owner == session.username())
}

/// Decides whether `action` on `resource` is allowed for `session`.
///
/// No side effects, cheap enough to call on every render.
#[must_use]
pub fn can_perform(
    action: Action,
    resource: ResourceKind,
    context: &CapabilityContext,
    session: Option<&Session>,
) -> bool {
    let Some(session) = session else {
        return false;
    };

    match (resource, action) {
        (ResourceKind::Article, Action::Create | Action::Like | Action::Dislike) => true,
        (ResourceKind::Article, Action::Update | Action::Delete) => {
            is_owner(context.article_author_id.as_deref(), session)
        }
        (ResourceKind::Profile, Action::Update) => {
            is_owner(context.profile_owner_id.as_deref(), session)
        }
        (ResourceKind::Profile, Action::Follow) => {
            !is_owner(context.profile_owner_id.as_deref(), session)
        }
        (ResourceKind::Profile, Action::Unfollow) => {
            !is_owner(context.profile_owner_id.as_deref(), session) && context.following
        }
        (ResourceKind::Comment, Action::Create) => true,
        (ResourceKind::Comment, Action::Delete) => {
            is_owner(context.comment_author_id.as_deref(), session)
        }
        _ => false,
    }
}
