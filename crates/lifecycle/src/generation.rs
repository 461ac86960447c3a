use std::fmt;

/// Identity of one bind attempt.
///
/// Acknowledgments carry the generation they answer, so a late answer to an
/// abandoned attempt can be told apart from the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindGeneration(u64);

impl BindGeneration {
	pub const fn get(self) -> u64 {
		self.0
	}
}

impl fmt::Display for BindGeneration {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// Monotonic generation clock owned by the state machine.
#[derive(Debug, Default)]
pub(crate) struct GenerationClock {
	last: u64,
}

impl GenerationClock {
	/// Returns the next generation, starting at 1.
	pub fn next(&mut self) -> BindGeneration {
		self.last = self.last.wrapping_add(1);
		BindGeneration(self.last)
	}
}
