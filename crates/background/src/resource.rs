//! Exclusive wake-preventing resource.

use crate::error::ResourceError;

/// Tag handed to the OS when the wake resource is acquired.
pub const WAKE_LOCK_TAG: &str = "vigil:wakelock";

/// OS-level wake lock port.
///
/// Implementations hold the lock without a timeout until `release` is called.
pub trait WakeLock: Send {
	fn acquire(&mut self, tag: &str) -> Result<(), String>;

	fn release(&mut self);
}

/// Owns one [`WakeLock`] and tracks whether it is held.
///
/// A held resource is released when the holder is dropped.
pub struct ResourceHolder {
	lock: Box<dyn WakeLock>,
	held: bool,
}

impl ResourceHolder {
	pub fn new(lock: impl WakeLock + 'static) -> Self {
		Self {
			lock: Box::new(lock),
			held: false,
		}
	}

	pub fn is_held(&self) -> bool {
		self.held
	}

	/// Acquires the resource.
	///
	/// Callers guard against double acquisition; [`ResourceError::AlreadyHeld`]
	/// signals a broken caller invariant.
	pub fn acquire(&mut self) -> Result<(), ResourceError> {
		if self.held {
			tracing::error!("background.resource.already_held");
			return Err(ResourceError::AlreadyHeld);
		}
		self.lock.acquire(WAKE_LOCK_TAG).map_err(ResourceError::Acquire)?;
		self.held = true;
		tracing::debug!(tag = WAKE_LOCK_TAG, "background.resource.acquired");
		Ok(())
	}

	/// Releases the resource; no-op when not held.
	pub fn release(&mut self) {
		if !self.held {
			return;
		}
		self.lock.release();
		self.held = false;
		tracing::debug!(tag = WAKE_LOCK_TAG, "background.resource.released");
	}
}

impl Drop for ResourceHolder {
	fn drop(&mut self) {
		self.release();
	}
}

impl std::fmt::Debug for ResourceHolder {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ResourceHolder").field("held", &self.held).finish_non_exhaustive()
	}
}
