//! OAuth scopes understood by Helix endpoints.
//!
//! Helix operations demand that the bearer token carry specific OAuth
//! scopes. [`Scope`] is the closed set of those permissions with an explicit
//! string-mapping table, so required-scope checks stay exhaustive and
//! typo-proof at compile time instead of being assembled from strings at
//! runtime.

use std::fmt;
use std::str::FromStr;

/// An OAuth permission scope.
///
/// Each variant maps to exactly one wire string, the value shown in token
/// introspection responses and on consent screens. [`Scope::as_str`] is the
/// single source of truth for that mapping; [`FromStr`] walks the same
/// table, so the two can never drift apart.
///
/// # Examples
///
/// ```
/// use helixir::Scope;
///
/// assert_eq!(Scope::BitsRead.as_str(), "bits:read");
/// assert_eq!("user:edit".parse::<Scope>(), Ok(Scope::UserEdit));
/// assert!("user:launch_rockets".parse::<Scope>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Scope {
    /// `analytics:read:extensions`
    AnalyticsReadExtensions,
    /// `analytics:read:games`
    AnalyticsReadGames,
    /// `bits:read`
    BitsRead,
    /// `channel:edit:commercial`
    ChannelEditCommercial,
    /// `channel:manage:broadcast`
    ChannelManageBroadcast,
    /// `channel:manage:polls`
    ChannelManagePolls,
    /// `channel:manage:predictions`
    ChannelManagePredictions,
    /// `channel:manage:redemptions`
    ChannelManageRedemptions,
    /// `channel:moderate`
    ChannelModerate,
    /// `channel:read:hype_train`
    ChannelReadHypeTrain,
    /// `channel:read:polls`
    ChannelReadPolls,
    /// `channel:read:predictions`
    ChannelReadPredictions,
    /// `channel:read:redemptions`
    ChannelReadRedemptions,
    /// `channel:read:subscriptions`
    ChannelReadSubscriptions,
    /// `chat:edit`
    ChatEdit,
    /// `chat:read`
    ChatRead,
    /// `clips:edit`
    ClipsEdit,
    /// `moderation:read`
    ModerationRead,
    /// `moderator:manage:banned_users`
    ModeratorManageBannedUsers,
    /// `user:edit`
    UserEdit,
    /// `user:manage:blocked_users`
    UserManageBlockedUsers,
    /// `user:read:blocked_users`
    UserReadBlockedUsers,
    /// `user:read:broadcast`
    UserReadBroadcast,
    /// `user:read:email`
    UserReadEmail,
    /// `user:read:follows`
    UserReadFollows,
    /// `user:read:subscriptions`
    UserReadSubscriptions,
    /// `whispers:edit`
    WhispersEdit,
    /// `whispers:read`
    WhispersRead,
}

impl Scope {
    /// The wire string for this scope.
    pub const fn as_str(self) -> &'static str {
        match self {
            Scope::AnalyticsReadExtensions => "analytics:read:extensions",
            Scope::AnalyticsReadGames => "analytics:read:games",
            Scope::BitsRead => "bits:read",
            Scope::ChannelEditCommercial => "channel:edit:commercial",
            Scope::ChannelManageBroadcast => "channel:manage:broadcast",
            Scope::ChannelManagePolls => "channel:manage:polls",
            Scope::ChannelManagePredictions => "channel:manage:predictions",
            Scope::ChannelManageRedemptions => "channel:manage:redemptions",
            Scope::ChannelModerate => "channel:moderate",
            Scope::ChannelReadHypeTrain => "channel:read:hype_train",
            Scope::ChannelReadPolls => "channel:read:polls",
            Scope::ChannelReadPredictions => "channel:read:predictions",
            Scope::ChannelReadRedemptions => "channel:read:redemptions",
            Scope::ChannelReadSubscriptions => "channel:read:subscriptions",
            Scope::ChatEdit => "chat:edit",
            Scope::ChatRead => "chat:read",
            Scope::ClipsEdit => "clips:edit",
            Scope::ModerationRead => "moderation:read",
            Scope::ModeratorManageBannedUsers => "moderator:manage:banned_users",
            Scope::UserEdit => "user:edit",
            Scope::UserManageBlockedUsers => "user:manage:blocked_users",
            Scope::UserReadBlockedUsers => "user:read:blocked_users",
            Scope::UserReadBroadcast => "user:read:broadcast",
            Scope::UserReadEmail => "user:read:email",
            Scope::UserReadFollows => "user:read:follows",
            Scope::UserReadSubscriptions => "user:read:subscriptions",
            Scope::WhispersEdit => "whispers:edit",
            Scope::WhispersRead => "whispers:read",
        }
    }

    /// Every scope in the table, in declaration order.
    ///
    /// Useful for development tokens that should carry the full grant set,
    /// and for enumerating the table in tests.
    pub const fn all() -> &'static [Scope] {
        &[
            Scope::AnalyticsReadExtensions,
            Scope::AnalyticsReadGames,
            Scope::BitsRead,
            Scope::ChannelEditCommercial,
            Scope::ChannelManageBroadcast,
            Scope::ChannelManagePolls,
            Scope::ChannelManagePredictions,
            Scope::ChannelManageRedemptions,
            Scope::ChannelModerate,
            Scope::ChannelReadHypeTrain,
            Scope::ChannelReadPolls,
            Scope::ChannelReadPredictions,
            Scope::ChannelReadRedemptions,
            Scope::ChannelReadSubscriptions,
            Scope::ChatEdit,
            Scope::ChatRead,
            Scope::ClipsEdit,
            Scope::ModerationRead,
            Scope::ModeratorManageBannedUsers,
            Scope::UserEdit,
            Scope::UserManageBlockedUsers,
            Scope::UserReadBlockedUsers,
            Scope::UserReadBroadcast,
            Scope::UserReadEmail,
            Scope::UserReadFollows,
            Scope::UserReadSubscriptions,
            Scope::WhispersEdit,
            Scope::WhispersRead,
        ]
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a scope string is not in the table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown scope: {0:?}")]
pub struct UnknownScope(pub String);

impl FromStr for Scope {
    type Err = UnknownScope;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scope::all()
            .iter()
            .copied()
            .find(|scope| scope.as_str() == s)
            .ok_or_else(|| UnknownScope(s.to_owned()))
    }
}
