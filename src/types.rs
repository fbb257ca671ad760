use std::fmt::{self, Display};
use std::str::FromStr;

/// Closed set of toast states.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ToastStatus {
    Loading,
    Success,
    Error,
}

impl ToastStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    /// Loading entries stay until the flow that created them removes them.
    pub const fn is_terminal(self) -> bool {
        match self {
            Self::Loading => false,
            Self::Success | Self::Error => true,
        }
    }
}

impl Display for ToastStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The named flows a caller can trigger.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum FlowKind {
    Export,
    Error,
}

impl FlowKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Export => "export",
            Self::Error => "error",
        }
    }
}

impl Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlowKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "export" => Ok(Self::Export),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown flow: {other}")),
        }
    }
}
