//! Opaque identifier for text controls.

/// Identifies a text control within an [`InputValueStore`](crate::InputValueStore).
///
/// The raw value carries no meaning here; the dom crate derives it from the
/// node key so the same control always maps to the same entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InputId(u64);

impl InputId {
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

impl From<u32> for InputId {
    #[inline]
    fn from(raw: u32) -> Self {
        Self(u64::from(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_from_u32_keep_their_value() {
        let id = InputId::from(7u32);
        assert_eq!(id.as_raw(), 7);
        assert_eq!(id, InputId::from_raw(7));
        assert_ne!(id, InputId::from_raw(8));
    }
}
