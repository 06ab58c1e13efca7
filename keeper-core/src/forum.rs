/// A moderated forum channel.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Forum {
    Complaints,
    Appeals,
}

/// Fixed display wording for a forum.
#[derive(Debug, Eq, PartialEq)]
pub struct ForumProfile {
    /// Option value and default channel name.
    pub slug: &'static str,
    /// Title-case label shown in choices.
    pub label: &'static str,
    /// What one thread in this forum is called.
    pub noun: &'static str,
    /// Past tense used when a thread is closed.
    pub verb: &'static str,
}

static PROFILES: [ForumProfile; 2] = [
    ForumProfile {
        slug: "complaints",
        label: "Complaints",
        noun: "complaint",
        verb: "reviewed",
    },
    ForumProfile {
        slug: "appeals",
        label: "Appeals",
        noun: "appeal",
        verb: "resolved",
    },
];

impl Forum {
    pub const ALL: [Forum; 2] = [Forum::Complaints, Forum::Appeals];

    pub fn profile(self) -> &'static ForumProfile {
        match self {
            Forum::Complaints => &PROFILES[0],
            Forum::Appeals => &PROFILES[1],
        }
    }

    pub fn slug(self) -> &'static str {
        self.profile().slug
    }

    pub fn from_slug(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|forum| forum.slug().eq_ignore_ascii_case(raw.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_resolve_case_insensitively() {
        assert_eq!(Forum::from_slug("complaints"), Some(Forum::Complaints));
        assert_eq!(Forum::from_slug(" Appeals "), Some(Forum::Appeals));
        assert_eq!(Forum::from_slug("general"), None);
    }

    #[test]
    fn profiles_are_distinct() {
        assert_eq!(Forum::Complaints.profile().noun, "complaint");
        assert_eq!(Forum::Appeals.profile().verb, "resolved");
        assert_ne!(Forum::Complaints.profile(), Forum::Appeals.profile());
    }
}
