//! Fresh identifiers correlating async requests with their completions.

use std::fmt;

/// Monotonically increasing identifier, unique per [`AppData`](super::app_data::AppData).
///
/// Only [`Effect::fresh`](super::effect::Effect::fresh) hands these out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Uid(pub u64);

impl Uid {
    /// Returns the current value and advances the counter.
    pub fn bump(&mut self) -> Uid {
        let current = *self;
        self.0 += 1;
        current
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
