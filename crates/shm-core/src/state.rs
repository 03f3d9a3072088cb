//! A single measurement instant: 17 independently optional quantities.

use crate::numeric::Real;
use crate::quantity::Quantity;

/// Record of the 17 optional quantities for one state.
///
/// A field, once set, is never overwritten through [`State::fill`]; that is
/// the only mutator the solver uses.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct State {
    values: [Option<Real>; Quantity::COUNT],
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter, mostly for tests and fixtures.
    pub fn with(mut self, q: Quantity, v: Real) -> Self {
        self.values[q.index()] = Some(v);
        self
    }

    #[inline]
    pub fn get(&self, q: Quantity) -> Option<Real> {
        self.values[q.index()]
    }

    #[inline]
    pub fn is_set(&self, q: Quantity) -> bool {
        self.values[q.index()].is_some()
    }

    /// Set `q` only if it is currently unset. Returns whether the state changed.
    pub fn fill(&mut self, q: Quantity, v: Real) -> bool {
        let slot = &mut self.values[q.index()];
        if slot.is_some() {
            return false;
        }
        *slot = Some(v);
        true
    }

    /// Number of known fields.
    pub fn known_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// All fields in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Quantity, Option<Real>)> + '_ {
        Quantity::ALL.into_iter().map(|q| (q, self.get(q)))
    }

    /// Known fields in canonical order.
    pub fn known(&self) -> impl Iterator<Item = (Quantity, Real)> + '_ {
        Quantity::ALL
            .into_iter()
            .filter_map(|q| self.get(q).map(|v| (q, v)))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for State {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(Quantity::COUNT))?;
        for (q, v) in self.iter() {
            map.serialize_entry(q.name(), &v)?;
        }
        map.end()
    }
}

/// Accepts a mapping of field names (aliases included) to numbers or null.
/// Keys that are not quantities are skipped.
#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for State {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct StateVisitor;

        impl<'de> serde::de::Visitor<'de> for StateVisitor {
            type Value = State;

            fn expecting(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str("a map of quantity names to numbers or null")
            }

            fn visit_map<A: serde::de::MapAccess<'de>>(
                self,
                mut map: A,
            ) -> Result<State, A::Error> {
                let mut state = State::new();
                while let Some(key) = map.next_key::<String>()? {
                    match Quantity::from_key(&key) {
                        Some(q) => {
                            if let Some(v) = map.next_value::<Option<Real>>()? {
                                state.fill(q, v);
                            }
                        }
                        None => {
                            map.next_value::<serde::de::IgnoredAny>()?;
                        }
                    }
                }
                Ok(state)
            }
        }

        deserializer.deserialize_map(StateVisitor)
    }
}
