use core::fmt;

use serde::{Deserialize, Serialize};

use crate::economy::goods::Good;

/// Profession of a mobile actor.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
pub enum Job {
    Helper,
    Builder,
    Scout,
    Carrier,

    // Soldier ranks, weakest first
    Private,
    PrivateFirstClass,
    Sergeant,
    Officer,
    General,
}

/// Soldier ranks ordered weakest to strongest.
pub const SOLDIER_JOBS: [Job; 5] = [
    Job::Private,
    Job::PrivateFirstClass,
    Job::Sergeant,
    Job::Officer,
    Job::General,
];

impl Job {
    pub fn is_soldier(self) -> bool {
        matches!(
            self,
            Job::Private | Job::PrivateFirstClass | Job::Sergeant | Job::Officer | Job::General
        )
    }

    /// Tool consumed (together with a helper) when recruiting this job locally
    pub fn recruitment_tool(self) -> Option<Good> {
        match self {
            Job::Builder => Some(Good::Hammer),
            Job::Scout => Some(Good::Bow),
            _ => None,
        }
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Job::Helper => write!(f, "Helper"),
            Job::Builder => write!(f, "Builder"),
            Job::Scout => write!(f, "Scout"),
            Job::Carrier => write!(f, "Carrier"),
            Job::Private => write!(f, "Private"),
            Job::PrivateFirstClass => write!(f, "Private First Class"),
            Job::Sergeant => write!(f, "Sergeant"),
            Job::Officer => write!(f, "Officer"),
            Job::General => write!(f, "General"),
        }
    }
}
