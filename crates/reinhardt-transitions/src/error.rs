//! Transition error types.
//!
//! Cancellation and redirection are modelled as errors so they travel through
//! the same `Result` channel as real failures, but [`TransitionError::is_expected`]
//! separates them from faults that must be reported.

use crate::transition::RedirectTarget;
use std::fmt;
use thiserror::Error;

/// Result type for transition operations.
pub type TransitionResult<T> = Result<T, TransitionError>;

/// Lifecycle hook that produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookPhase {
	/// `activate` hook.
	Activate,
	/// `deactivate` hook.
	Deactivate,
	/// `load` hook.
	Load,
}

impl fmt::Display for HookPhase {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			HookPhase::Activate => write!(f, "activate"),
			HookPhase::Deactivate => write!(f, "deactivate"),
			HookPhase::Load => write!(f, "load"),
		}
	}
}

/// Errors that end a transition.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransitionError {
	/// The transition was cancelled.
	#[error("transition cancelled")]
	Cancelled,

	/// The transition was redirected to another route.
	#[error("transition redirected to '{}'", target.name)]
	Redirected {
		/// Route the transition was redirected to.
		target: RedirectTarget,
	},

	/// No route definition could be found for a matched route.
	#[error("Unable to create route {route}: class or component must be defined")]
	Unresolved {
		/// Name of the unresolved route.
		route: String,
	},

	/// A lifecycle hook failed.
	#[error("route '{route}' failed during {phase}: {source}")]
	Hook {
		/// Route whose hook failed.
		route: String,
		/// Failing hook.
		phase: HookPhase,
		/// Error returned by the hook.
		#[source]
		source: anyhow::Error,
	},

	/// The nearest ancestor with a view exposes no outlet region.
	#[error("No outlet region defined in {route} route")]
	MissingOutlet {
		/// Ancestor route lacking an outlet.
		route: String,
	},

	/// A root level view has nowhere to be mounted.
	#[error("No root outlet region defined")]
	MissingRootOutlet,

	/// A route in the render queue has no view definition.
	#[error("render: no view or component defined for route {route}")]
	ViewNotDefined {
		/// Route without view definition.
		route: String,
	},

	/// A tag-valued view definition names an undefined element.
	#[error("no element registered for tag '{tag}'")]
	UnknownElement {
		/// Unregistered tag name.
		tag: String,
	},

	/// Route name is not part of the route tree.
	#[error("route not found: {0}")]
	UnknownRoute(String),

	/// A path parameter required to build a URL is missing.
	#[error("missing parameter '{param}' for route {route}")]
	MissingParameter {
		/// Route being generated.
		route: String,
		/// Missing parameter name.
		param: String,
	},

	/// Query entries could not be encoded.
	#[error("failed to encode query string: {0}")]
	QueryEncoding(#[from] serde_urlencoded::ser::Error),

	/// Redirect chain exceeded the configured limit.
	#[error("too many redirects (limit {limit})")]
	TooManyRedirects {
		/// Configured limit.
		limit: usize,
	},

	/// The router was destroyed.
	#[error("router has been destroyed")]
	RouterDestroyed,
}

impl TransitionError {
	/// Creates a hook error for the given route and phase.
	pub fn hook(route: impl Into<String>, phase: HookPhase, source: anyhow::Error) -> Self {
		Self::Hook {
			route: route.into(),
			phase,
			source,
		}
	}

	/// Returns `true` for control-flow outcomes (cancellation and redirection).
	pub fn is_expected(&self) -> bool {
		matches!(self, Self::Cancelled | Self::Redirected { .. })
	}

	/// Returns `true` if the transition was cancelled.
	pub fn is_cancelled(&self) -> bool {
		matches!(self, Self::Cancelled)
	}

	/// Returns `true` if the transition was redirected.
	pub fn is_redirected(&self) -> bool {
		matches!(self, Self::Redirected { .. })
	}
}

/// Errors raised while loading [`RouterSettings`](crate::settings::RouterSettings).
#[derive(Debug, Error)]
pub enum SettingsError {
	/// The settings document could not be parsed.
	#[error("invalid router settings: {0}")]
	Parse(#[from] toml::de::Error),

	/// A setting holds an unusable value.
	#[error("invalid value for '{key}': {message}")]
	InvalidValue {
		/// Setting name.
		key: String,
		/// Reason.
		message: String,
	},
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_unresolved_message_names_route() {
		let err = TransitionError::Unresolved {
			route: "leaf".to_string(),
		};
		assert_eq!(
			err.to_string(),
			"Unable to create route leaf: class or component must be defined"
		);
	}

	#[rstest]
	#[case(HookPhase::Activate, "route 'inbox' failed during activate: offline")]
	#[case(HookPhase::Deactivate, "route 'inbox' failed during deactivate: offline")]
	#[case(HookPhase::Load, "route 'inbox' failed during load: offline")]
	fn test_hook_message_names_phase(#[case] phase: HookPhase, #[case] expected: &str) {
		let err = TransitionError::hook("inbox", phase, anyhow::anyhow!("offline"));
		assert_eq!(err.to_string(), expected);
		assert!(!err.is_expected());
	}

	#[rstest]
	fn test_outlet_messages() {
		assert_eq!(
			TransitionError::MissingOutlet {
				route: "grandchild".to_string()
			}
			.to_string(),
			"No outlet region defined in grandchild route"
		);
		assert_eq!(
			TransitionError::MissingRootOutlet.to_string(),
			"No root outlet region defined"
		);
	}

	#[rstest]
	fn test_expected_errors() {
		assert!(TransitionError::Cancelled.is_expected());
		assert!(
			TransitionError::Redirected {
				target: RedirectTarget::new("login"),
			}
			.is_expected()
		);
		assert!(!TransitionError::MissingRootOutlet.is_expected());
		assert!(
			!TransitionError::hook("a", HookPhase::Activate, anyhow::anyhow!("boom")).is_expected()
		);
	}

	#[rstest]
	fn test_hook_error_display() {
		let err = TransitionError::hook("parent", HookPhase::Deactivate, anyhow::anyhow!("boom"));
		assert_eq!(err.to_string(), "route 'parent' failed during deactivate: boom");
		assert!(std::error::Error::source(&err).is_some());
	}
}
