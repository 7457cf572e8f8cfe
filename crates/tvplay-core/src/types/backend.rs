//! Backend selection and decode mode.

use serde::{Deserialize, Serialize};

/// Which media engine backs the facade.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Adaptive-streaming engine.
    #[default]
    Adaptive,
    /// Decoder-based engine.
    Decoder,
}

impl BackendKind {
    /// Persisted integer code.
    pub const fn code(self) -> i64 {
        match self {
            Self::Adaptive => 0,
            Self::Decoder => 1,
        }
    }

    /// Parse a persisted code. Unknown codes select the default backend.
    pub const fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Decoder,
            _ => Self::Adaptive,
        }
    }

    /// The other backend.
    pub const fn toggled(self) -> Self {
        match self {
            Self::Adaptive => Self::Decoder,
            Self::Decoder => Self::Adaptive,
        }
    }
}

/// Decode mode of the decoder backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum DecodeMode {
    Software,
    #[default]
    Hardware,
}

impl DecodeMode {
    /// Persisted integer code.
    pub const fn code(self) -> i64 {
        match self {
            Self::Software => 0,
            Self::Hardware => 1,
        }
    }

    /// Parse a persisted code. Unknown codes select hardware decoding.
    pub const fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Software,
            _ => Self::Hardware,
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::Software => Self::Hardware,
            Self::Hardware => Self::Software,
        }
    }
}
