use std::fmt;

/// Represents the probing state of a single href
///
/// Transitions: `Unseen -> Claimed -> Probing -> {Checked(status) | Unknown}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkState {
    /// Href has not been seen on any page yet
    Unseen,

    /// A worker won the claim and owns the probe
    Claimed,

    /// The probe is in flight
    Probing,

    /// The probe returned an HTTP status
    Checked(u16),

    /// The probe failed at the network level
    Unknown,
}

impl LinkState {
    /// Returns the final state for a probe result
    pub fn from_status(status: Option<u16>) -> Self {
        status.map_or(Self::Unknown, Self::Checked)
    }

    /// Returns true if the probe for this href has finished
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Checked(_) | Self::Unknown)
    }

    /// Returns true if moving from this state to `next` is allowed
    pub fn can_transition_to(&self, next: LinkState) -> bool {
        matches!(
            (self, next),
            (Self::Unseen, Self::Claimed)
                | (Self::Claimed, Self::Probing)
                | (Self::Probing, Self::Checked(_))
                | (Self::Probing, Self::Unknown)
        )
    }
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unseen => write!(f, "unseen"),
            Self::Claimed => write!(f, "claimed"),
            Self::Probing => write!(f, "probing"),
            Self::Checked(status) => write!(f, "checked({})", status),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}
