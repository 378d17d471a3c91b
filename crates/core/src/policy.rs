//! Side-effect policy applied to every stub body of one target.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

use thiserror::Error;

/// One statement kind a stub body may run before returning.
///
/// Variants are listed in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SideEffect {
    /// Plain log call.
    Log,
    /// Error-level log call.
    LogError,
    /// Warning-level log call.
    LogWarning,
    /// Unconditional throw. Always emitted last.
    Throw,
}

impl SideEffect {
    /// Every side effect in the order statements are emitted.
    pub const EMISSION_ORDER: [SideEffect; 4] = [
        SideEffect::Log,
        SideEffect::LogError,
        SideEffect::LogWarning,
        SideEffect::Throw,
    ];

    /// The policy flag enabling this side effect.
    pub fn flag(self) -> SideEffectPolicy {
        match self {
            SideEffect::Log => SideEffectPolicy::LOG,
            SideEffect::LogError => SideEffectPolicy::LOG_ERROR,
            SideEffect::LogWarning => SideEffectPolicy::LOG_WARNING,
            SideEffect::Throw => SideEffectPolicy::THROW,
        }
    }

    /// Member name of the matching `NullObjLog` enum value.
    pub fn marker_name(self) -> &'static str {
        match self {
            SideEffect::Log => "DebugLog",
            SideEffect::LogError => "DebugLogErr",
            SideEffect::LogWarning => "DebugLogWarn",
            SideEffect::Throw => "ThrowException",
        }
    }
}

/// Combinable set of [`SideEffect`] flags.
///
/// Bit values match the `NullObjLog` flags enum injected into consuming
/// projects, so a raw attribute argument converts with [`Self::from_bits`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SideEffectPolicy(u8);

impl SideEffectPolicy {
    /// Pure no-op bodies.
    pub const NONE: Self = Self(0);
    /// Plain log call.
    pub const LOG: Self = Self(1);
    /// Error-level log call.
    pub const LOG_ERROR: Self = Self(1 << 1);
    /// Warning-level log call.
    pub const LOG_WARNING: Self = Self(1 << 2);
    /// Throw after any logging.
    pub const THROW: Self = Self(1 << 3);

    const ALL_BITS: u8 = 0b1111;

    /// Convert a raw flag value. Returns `None` when unknown bits are set.
    pub fn from_bits(bits: i64) -> Option<Self> {
        u8::try_from(bits)
            .ok()
            .filter(|bits| bits & !Self::ALL_BITS == 0)
            .map(Self)
    }

    /// Raw flag value.
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Whether no side effect is enabled.
    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Whether every flag of `other` is set in `self`.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Enabled side effects, in emission order.
    pub fn actions(self) -> impl Iterator<Item = SideEffect> {
        SideEffect::EMISSION_ORDER
            .into_iter()
            .filter(move |effect| self.contains(effect.flag()))
    }
}

impl BitOr for SideEffectPolicy {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for SideEffectPolicy {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for SideEffectPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            return f.write_str("None");
        }
        let names = self
            .actions()
            .map(SideEffect::marker_name)
            .collect::<Vec<_>>()
            .join(" | ");
        f.write_str(&names)
    }
}

/// A flag name in a policy expression that matches no known flag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown side-effect flag '{0}'")]
pub struct UnknownFlagError(pub String);

impl FromStr for SideEffectPolicy {
    type Err = UnknownFlagError;

    /// Parse an attribute argument expression such as
    /// `NullObjLog.DebugLog | NullObjLog.ThrowException`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut policy = Self::NONE;
        for part in s.split('|') {
            let name = part.trim();
            let name = name.rsplit('.').next().unwrap_or(name);
            if name.is_empty() || name == "None" {
                continue;
            }
            let effect = SideEffect::EMISSION_ORDER
                .into_iter()
                .find(|effect| effect.marker_name() == name)
                .ok_or_else(|| UnknownFlagError(part.trim().to_string()))?;
            policy |= effect.flag();
        }
        Ok(policy)
    }
}
