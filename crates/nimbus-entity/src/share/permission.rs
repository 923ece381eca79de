//! Share permission hierarchy.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Permission level a share can grant.
///
/// Ordered by capability: View < Download < Edit < Upload < Manage.
/// The order is fixed at compile time; it is never configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "share_permission", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SharePermission {
    /// View file metadata only.
    View,
    /// Download the file bytes.
    Download,
    /// Edit file content and metadata.
    Edit,
    /// Upload new versions.
    Upload,
    /// Full control including re-sharing.
    Manage,
}

impl SharePermission {
    /// All levels in ascending capability order.
    pub const ALL: [SharePermission; 5] = [
        Self::View,
        Self::Download,
        Self::Edit,
        Self::Upload,
        Self::Manage,
    ];

    /// Return the capability rank (higher = more capable).
    pub fn rank(&self) -> u8 {
        match self {
            Self::View => 1,
            Self::Download => 2,
            Self::Edit => 3,
            Self::Upload => 4,
            Self::Manage => 5,
        }
    }

    /// Check whether this granted level authorizes the requested action.
    ///
    /// True iff the granted level ranks at or above the requested one.
    pub fn covers(&self, requested: SharePermission) -> bool {
        self.rank() >= requested.rank()
    }

    /// Return the permission as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Download => "download",
            Self::Edit => "edit",
            Self::Upload => "upload",
            Self::Manage => "manage",
        }
    }
}

impl fmt::Display for SharePermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SharePermission {
    type Err = nimbus_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "view" => Ok(Self::View),
            "download" => Ok(Self::Download),
            "edit" => Ok(Self::Edit),
            "upload" => Ok(Self::Upload),
            "manage" => Ok(Self::Manage),
            _ => Err(nimbus_core::AppError::validation(format!(
                "Invalid share permission: '{s}'. Expected one of: view, download, edit, upload, manage"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_covers_is_reflexive() {
        for level in SharePermission::ALL {
            assert!(level.covers(level));
        }
    }

    #[test]
    fn test_covers_is_monotonic() {
        // If a covers b and b ranks above c, then a covers c.
        for a in SharePermission::ALL {
            for b in SharePermission::ALL {
                for c in SharePermission::ALL {
                    if a.covers(b) && b.rank() > c.rank() {
                        assert!(a.covers(c), "{a} should cover {c} via {b}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_hierarchy_order() {
        assert!(SharePermission::Manage.covers(SharePermission::View));
        assert!(SharePermission::Download.covers(SharePermission::View));
        assert!(!SharePermission::View.covers(SharePermission::Download));
        assert!(!SharePermission::Upload.covers(SharePermission::Manage));
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "download".parse::<SharePermission>().unwrap(),
            SharePermission::Download
        );
        assert_eq!(
            "MANAGE".parse::<SharePermission>().unwrap(),
            SharePermission::Manage
        );
        assert!("admin".parse::<SharePermission>().is_err());
    }
}
