use serde::{Deserialize, Serialize};

/// Coherence state of a single cache line.
///
/// The six stable states are the MOESIF states proper. The five transient
/// states encode "a GET was issued from the named stable state and DATA is
/// pending". While in a transient state the line has exactly one
/// outstanding request.
#[derive(
    Debug,
    strum::EnumIter,
    strum::EnumCount,
    Clone,
    Copy,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
pub enum State {
    /// Invalid.
    I,
    /// Shared, clean.
    S,
    /// Exclusive, clean, sole owner.
    E,
    /// Owner, dirty, shared by others.
    O,
    /// Modified, dirty, sole owner.
    M,
    /// Forward, clean, designated responder among sharers.
    F,
    /// Was I, issued GETS.
    IS,
    /// Was I, issued GETM.
    IM,
    /// Was S, issued GETM.
    SM,
    /// Was O, issued GETM.
    OM,
    /// Was F, issued GETM.
    FM,
}

/// Diagnostic label table.
///
/// Slot 0 (`X`) is unused and never produced for a live line.
pub const LABELS: [&str; 7] = ["X", "I", "S", "E", "O", "M", "F"];

/// How transient states are rendered by [`State::dump`].
#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelStyle {
    /// Transient states display as the label of their base state.
    #[default]
    Base,
    /// Transient states display their full two letter name.
    Full,
}

impl State {
    #[inline]
    #[must_use]
    pub fn is_stable(&self) -> bool {
        !self.is_transient()
    }

    #[inline]
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::I | Self::S | Self::E | Self::O | Self::M | Self::F => false,
            Self::IS | Self::IM | Self::SM | Self::OM | Self::FM => true,
        }
    }

    /// Stable state the line was in when its pending GET was issued.
    #[must_use]
    pub fn base(&self) -> Self {
        match self {
            Self::IS | Self::IM => Self::I,
            Self::SM => Self::S,
            Self::OM => Self::O,
            Self::FM => Self::F,
            stable @ (Self::I | Self::S | Self::E | Self::O | Self::M | Self::F) => *stable,
        }
    }

    /// Whether the line holds a valid copy of the data.
    ///
    /// `SM`, `OM` and `FM` still hold their data while waiting for write
    /// permission.
    #[must_use]
    pub fn has_data(&self) -> bool {
        matches!(
            self,
            Self::S | Self::E | Self::O | Self::M | Self::F | Self::SM | Self::OM | Self::FM
        )
    }

    /// Whether the line holds or is acquiring exclusive write access.
    #[must_use]
    pub fn claims_exclusive(&self) -> bool {
        matches!(self, Self::E | Self::M | Self::IM | Self::OM | Self::FM)
    }

    /// Whether the line holds data that is newer than memory.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        matches!(self, Self::O | Self::M | Self::OM)
    }

    #[must_use]
    fn label_index(&self) -> usize {
        match self.base() {
            Self::I => 1,
            Self::S => 2,
            Self::E => 3,
            Self::O => 4,
            Self::M => 5,
            Self::F => 6,
            transient => unreachable!("base state {transient:?} is transient"),
        }
    }

    /// Human readable state label for diagnostics.
    #[must_use]
    pub fn dump(&self, style: LabelStyle) -> &'static str {
        match (style, self) {
            (LabelStyle::Full, Self::IS) => "IS",
            (LabelStyle::Full, Self::IM) => "IM",
            (LabelStyle::Full, Self::SM) => "SM",
            (LabelStyle::Full, Self::OM) => "OM",
            (LabelStyle::Full, Self::FM) => "FM",
            _ => LABELS[self.label_index()],
        }
    }
}

impl Default for State {
    fn default() -> Self {
        Self::I
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dump(LabelStyle::Full))
    }
}

#[cfg(test)]
mod tests {
    use super::{LabelStyle, State};
    use strum::{EnumCount, IntoEnumIterator};

    #[test]
    fn classification() {
        assert_eq!(State::COUNT, 11);
        let stable: Vec<_> = State::iter().filter(State::is_stable).collect();
        assert_eq!(
            stable,
            vec![State::I, State::S, State::E, State::O, State::M, State::F]
        );
        for state in State::iter() {
            assert!(state.base().is_stable(), "{state:?}");
            assert_eq!(state.is_transient(), state.base() != state);
        }
    }

    #[test]
    fn dump_labels() {
        let labels: Vec<_> = State::iter().map(|s| s.dump(LabelStyle::Base)).collect();
        assert_eq!(
            labels,
            vec!["I", "S", "E", "O", "M", "F", "I", "I", "S", "O", "F"]
        );
        assert_eq!(State::OM.dump(LabelStyle::Full), "OM");
        assert_eq!(State::M.dump(LabelStyle::Full), "M");
        assert!(State::iter().all(|s| s.dump(LabelStyle::Base) != "X"));
        assert_eq!(State::default(), State::I);
        assert_eq!(State::FM.to_string(), "FM");
    }
}
