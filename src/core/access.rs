//! Access policy for help thread actions.
//!
//! One policy for every entry point:
//! - close: the thread author, helpers or staff (staff only from the log view)
//! - re-open: staff
//! - retitle and listing: helpers or staff
//! - view: anyone

use crate::{
    core::{HelpSettings, notice::Method, platform::ThreadSnapshot},
    errors::{Error, Result},
};
use poise::serenity_prelude::{ChannelId, RoleId, UserId};

/// The member attempting an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// User id
    pub id: UserId,
    /// Guild roles held
    pub roles: Vec<RoleId>,
}

impl Actor {
    /// Creates an actor from a user id and the roles they hold.
    #[must_use]
    pub const fn new(id: UserId, roles: Vec<RoleId>) -> Self {
        Self { id, roles }
    }

    /// The bot itself, acting on an automatic transition.
    #[must_use]
    pub const fn bot(id: UserId) -> Self {
        Self {
            id,
            roles: Vec::new(),
        }
    }

    /// Whether the actor holds `role`.
    #[must_use]
    pub fn has_role(&self, role: RoleId) -> bool {
        self.roles.contains(&role)
    }
}

/// Actions gated by [`AccessPolicy`]; the verb appears in rejection messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Close a thread
    Close,
    /// Re-open a thread
    Reopen,
    /// Change a thread's topic
    Retitle,
    /// List open threads
    List,
}

impl Action {
    /// Completes "You do not have permission to ..."
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Close => "close this thread",
            Self::Reopen => "re-open this thread",
            Self::Retitle => "change the topic of this thread",
            Self::List => "list help threads",
        }
    }
}

/// Role-based authorization for help thread actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessPolicy {
    helper_role: RoleId,
    staff_role: RoleId,
}

impl From<&HelpSettings> for AccessPolicy {
    fn from(settings: &HelpSettings) -> Self {
        Self {
            helper_role: settings.helper_role,
            staff_role: settings.staff_role,
        }
    }
}

impl AccessPolicy {
    /// Holds the helper or the staff role.
    #[must_use]
    pub fn is_helper_or_staff(&self, actor: &Actor) -> bool {
        actor.has_role(self.helper_role) || actor.has_role(self.staff_role)
    }

    /// Holds the staff role.
    #[must_use]
    pub fn is_staff(&self, actor: &Actor) -> bool {
        actor.has_role(self.staff_role)
    }

    /// Whether `actor` may close a thread owned by `author` via `method`.
    /// With the author unknown only the role checks apply.
    #[must_use]
    pub fn may_close(&self, actor: &Actor, author: Option<UserId>, method: Method) -> bool {
        match method {
            Method::AuthorLeft => true,
            Method::LogButton => self.is_staff(actor),
            Method::Command | Method::Button => {
                author == Some(actor.id) || self.is_helper_or_staff(actor)
            }
        }
    }

    /// Whether `actor` may perform an action that does not depend on the author.
    #[must_use]
    pub fn may(&self, actor: &Actor, action: Action) -> bool {
        match action {
            Action::Reopen => self.is_staff(actor),
            Action::Close | Action::Retitle | Action::List => self.is_helper_or_staff(actor),
        }
    }

    /// Turns a refused check into [`Error::PermissionDenied`].
    pub fn require(allowed: bool, action: Action) -> Result<()> {
        if allowed {
            Ok(())
        } else {
            Err(Error::PermissionDenied {
                action: action.verb(),
            })
        }
    }
}

/// A thread directly under the configured help channel.
#[must_use]
pub fn is_help_thread(thread: &ThreadSnapshot, help_channel: ChannelId) -> bool {
    thread.parent_id == Some(help_channel)
}
