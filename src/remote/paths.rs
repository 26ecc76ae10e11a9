//! Remote key-value paths under the `/awning` root.
//!
//! | Path                          | Dir    | Type        |
//! |-------------------------------|--------|-------------|
//! | `/awning/status`              | in+out | int 0-2     |
//! | `/awning/requested_status`    | in     | int 0-2     |
//! | `/awning/duration`            | in     | uint32 ms   |
//! | `/awning/opening_duration`    | in     | uint32 ms   |
//! | `/awning/closing_duration`    | in     | uint32 ms   |
//! | `/awning/progress`            | out    | int 0-100   |
//! | `/awning/network`             | out    | int (dBm)   |

/// Root node every path lives under.
pub const ROOT: &str = "/awning";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemotePath {
    Status,
    RequestedStatus,
    Duration,
    OpeningDuration,
    ClosingDuration,
    Progress,
    Network,
}

impl RemotePath {
    pub const ALL: [Self; 7] = [
        Self::Status,
        Self::RequestedStatus,
        Self::Duration,
        Self::OpeningDuration,
        Self::ClosingDuration,
        Self::Progress,
        Self::Network,
    ];

    /// Child key below [`ROOT`].
    pub const fn key(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::RequestedStatus => "requested_status",
            Self::Duration => "duration",
            Self::OpeningDuration => "opening_duration",
            Self::ClosingDuration => "closing_duration",
            Self::Progress => "progress",
            Self::Network => "network",
        }
    }

    /// Absolute path, e.g. `/awning/status`.
    pub const fn full(self) -> &'static str {
        match self {
            Self::Status => "/awning/status",
            Self::RequestedStatus => "/awning/requested_status",
            Self::Duration => "/awning/duration",
            Self::OpeningDuration => "/awning/opening_duration",
            Self::ClosingDuration => "/awning/closing_duration",
            Self::Progress => "/awning/progress",
            Self::Network => "/awning/network",
        }
    }

    /// Written by the controller.
    pub const fn is_outbound(self) -> bool {
        matches!(self, Self::Status | Self::Progress | Self::Network)
    }

    /// Mirrored from the feed into the local fields.
    pub const fn is_inbound(self) -> bool {
        !matches!(self, Self::Progress | Self::Network)
    }

    /// Look up a child key (`"status"`).
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.key() == key)
    }

    /// Resolve a feed path.  Accepts paths relative to the stream root
    /// (`/status`) as well as absolute ones (`/awning/status`).
    pub fn from_feed_path(path: &str) -> Option<Self> {
        let rel = path.strip_prefix(ROOT).unwrap_or(path);
        let key = rel.strip_prefix('/')?;
        Self::from_key(key)
    }
}

/// `true` if the feed path addresses the whole `/awning` object.
pub fn is_root(path: &str) -> bool {
    matches!(path, "/" | "" | ROOT) || path == "/awning/"
}
