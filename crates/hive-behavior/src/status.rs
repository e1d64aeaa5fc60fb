/// Result of evaluating a behavior-tree node or running a GOAP action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
    /// Not evaluated since construction or the last reset.
    #[default]
    Idle,
    /// Still in progress; evaluate again next tick.
    Running,
    Success,
    Failure,
}

impl Status {
    /// `true` for `Success` and `Failure`.
    #[inline]
    pub fn is_done(self) -> bool {
        matches!(self, Status::Success | Status::Failure)
    }

    /// Swap `Success` and `Failure`; other values pass through.
    #[inline]
    pub fn invert(self) -> Self {
        match self {
            Status::Success => Status::Failure,
            Status::Failure => Status::Success,
            other => other,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Status::Idle    => "idle",
            Status::Running => "running",
            Status::Success => "success",
            Status::Failure => "failure",
        };
        f.write_str(s)
    }
}
