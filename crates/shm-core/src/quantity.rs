//! The named physical quantities and the oscillator families.

use core::fmt;
use core::str::FromStr;

use crate::ShmError;

/// One of the 17 scalar fields describing an oscillator at an instant.
///
/// Declaration order is the canonical field order used for iteration,
/// normalization and output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Quantity {
    /// `m`: mass
    Mass,
    /// `k`: spring constant
    Stiffness,
    /// `L`: pendulum length
    Length,
    /// `g`: gravitational acceleration
    Gravity,
    /// `sigmaF`: net (restoring) force
    NetForce,
    /// `x`: displacement from equilibrium
    Displacement,
    /// `v`: instantaneous speed
    Velocity,
    /// `Vmax`: peak speed
    MaxVelocity,
    /// `a_max`: peak acceleration
    MaxAccel,
    /// `a`: instantaneous acceleration
    Accel,
    /// `KE`: kinetic energy
    Kinetic,
    /// `PE`: potential energy
    Potential,
    /// `E`: total mechanical energy
    Energy,
    /// `A`: amplitude
    Amplitude,
    /// `omega`: angular frequency
    Omega,
    /// `f`: frequency
    Frequency,
    /// `T`: period
    Period,
}

impl Quantity {
    pub const COUNT: usize = 17;

    pub const ALL: [Quantity; Quantity::COUNT] = [
        Quantity::Mass,
        Quantity::Stiffness,
        Quantity::Length,
        Quantity::Gravity,
        Quantity::NetForce,
        Quantity::Displacement,
        Quantity::Velocity,
        Quantity::MaxVelocity,
        Quantity::MaxAccel,
        Quantity::Accel,
        Quantity::Kinetic,
        Quantity::Potential,
        Quantity::Energy,
        Quantity::Amplitude,
        Quantity::Omega,
        Quantity::Frequency,
        Quantity::Period,
    ];

    /// Position in canonical order.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Canonical field name as it appears in requests and responses.
    pub fn name(self) -> &'static str {
        match self {
            Quantity::Mass => "m",
            Quantity::Stiffness => "k",
            Quantity::Length => "L",
            Quantity::Gravity => "g",
            Quantity::NetForce => "sigmaF",
            Quantity::Displacement => "x",
            Quantity::Velocity => "v",
            Quantity::MaxVelocity => "Vmax",
            Quantity::MaxAccel => "a_max",
            Quantity::Accel => "a",
            Quantity::Kinetic => "KE",
            Quantity::Potential => "PE",
            Quantity::Energy => "E",
            Quantity::Amplitude => "A",
            Quantity::Omega => "omega",
            Quantity::Frequency => "f",
            Quantity::Period => "T",
        }
    }

    /// Look up a canonical name. Names are case-sensitive (`a` and `A`
    /// are different quantities).
    pub fn from_name(name: &str) -> Option<Quantity> {
        Quantity::ALL.into_iter().find(|q| q.name() == name)
    }

    /// Resolve a request key, accepting the net-force aliases.
    pub fn from_key(key: &str) -> Option<Quantity> {
        match key.trim() {
            "ΣF" | "SigmaF" | "sigmaF" => Some(Quantity::NetForce),
            other => Quantity::from_name(other),
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Quantity {
    type Err = ShmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Quantity::from_key(s).ok_or_else(|| ShmError::UnknownQuantity {
            name: s.to_string(),
        })
    }
}

/// Physical model shared by every state of one request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Family {
    /// Mass on an ideal spring.
    #[default]
    Spring,
    /// Simple pendulum in the small-angle limit.
    Pendulum,
}

impl Family {
    pub fn tag(self) -> &'static str {
        match self {
            Family::Spring => "spring",
            Family::Pendulum => "pendulum",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Family {
    type Err = ShmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spring" => Ok(Family::Spring),
            "pendulum" => Ok(Family::Pendulum),
            _ => Err(ShmError::UnknownFamily {
                name: s.to_string(),
            }),
        }
    }
}
