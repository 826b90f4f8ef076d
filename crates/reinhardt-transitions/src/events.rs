//! Router event source.
//!
//! Fire-and-forget notifications announced while transitions run. Listeners
//! are called synchronously in registration order; the listener list is
//! snapshotted before dispatch so a listener may register or remove listeners.

use crate::error::TransitionError;
use crate::route::RouteInstance;
use crate::transition::Transition;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Kinds of router events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouterEventKind {
	/// `before:transition`
	BeforeTransition,
	/// `transition`
	Transition,
	/// `transition:error`
	TransitionError,
	/// `transition:abort`
	TransitionAbort,
	/// `before:activate`
	BeforeActivate,
	/// `activate`
	Activate,
	/// `before:deactivate`
	BeforeDeactivate,
	/// `deactivate`
	Deactivate,
	/// `route:render`
	RouteRender,
}

impl RouterEventKind {
	/// Event name.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::BeforeTransition => "before:transition",
			Self::Transition => "transition",
			Self::TransitionError => "transition:error",
			Self::TransitionAbort => "transition:abort",
			Self::BeforeActivate => "before:activate",
			Self::Activate => "activate",
			Self::BeforeDeactivate => "before:deactivate",
			Self::Deactivate => "deactivate",
			Self::RouteRender => "route:render",
		}
	}
}

impl fmt::Display for RouterEventKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// An announced event.
#[derive(Debug, Clone, Copy)]
pub enum RouterEvent<'a> {
	/// A transition is about to start.
	BeforeTransition(&'a Transition),
	/// A transition completed.
	Transition(&'a Transition),
	/// A transition failed.
	TransitionError {
		/// Failed transition.
		transition: &'a Transition,
		/// Failure.
		error: &'a TransitionError,
	},
	/// A transition was cancelled or redirected.
	TransitionAbort {
		/// Aborted transition.
		transition: &'a Transition,
		/// Cancellation or redirection.
		error: &'a TransitionError,
	},
	/// A route is about to be activated.
	BeforeActivate {
		/// Running transition.
		transition: &'a Transition,
		/// Route being activated.
		route: &'a RouteInstance,
	},
	/// A route was activated.
	Activate {
		/// Running transition.
		transition: &'a Transition,
		/// Activated route.
		route: &'a RouteInstance,
	},
	/// A route is about to be deactivated.
	BeforeDeactivate {
		/// Running transition.
		transition: &'a Transition,
		/// Route being deactivated.
		route: &'a RouteInstance,
	},
	/// A route was deactivated.
	Deactivate {
		/// Running transition.
		transition: &'a Transition,
		/// Deactivated route.
		route: &'a RouteInstance,
	},
	/// A route rendered a new view.
	RouteRender {
		/// Rendered route.
		route: &'a RouteInstance,
	},
}

impl<'a> RouterEvent<'a> {
	/// Kind of the event.
	pub fn kind(&self) -> RouterEventKind {
		match self {
			Self::BeforeTransition(_) => RouterEventKind::BeforeTransition,
			Self::Transition(_) => RouterEventKind::Transition,
			Self::TransitionError { .. } => RouterEventKind::TransitionError,
			Self::TransitionAbort { .. } => RouterEventKind::TransitionAbort,
			Self::BeforeActivate { .. } => RouterEventKind::BeforeActivate,
			Self::Activate { .. } => RouterEventKind::Activate,
			Self::BeforeDeactivate { .. } => RouterEventKind::BeforeDeactivate,
			Self::Deactivate { .. } => RouterEventKind::Deactivate,
			Self::RouteRender { .. } => RouterEventKind::RouteRender,
		}
	}

	/// Transition carried by the event.
	pub fn transition(&self) -> Option<&'a Transition> {
		match *self {
			Self::BeforeTransition(transition) | Self::Transition(transition) => Some(transition),
			Self::TransitionError { transition, .. }
			| Self::TransitionAbort { transition, .. }
			| Self::BeforeActivate { transition, .. }
			| Self::Activate { transition, .. }
			| Self::BeforeDeactivate { transition, .. }
			| Self::Deactivate { transition, .. } => Some(transition),
			Self::RouteRender { .. } => None,
		}
	}

	/// Route carried by the event.
	pub fn route(&self) -> Option<&'a RouteInstance> {
		match *self {
			Self::BeforeActivate { route, .. }
			| Self::Activate { route, .. }
			| Self::BeforeDeactivate { route, .. }
			| Self::Deactivate { route, .. }
			| Self::RouteRender { route } => Some(route),
			_ => None,
		}
	}

	/// Error carried by the event.
	pub fn error(&self) -> Option<&'a TransitionError> {
		match *self {
			Self::TransitionError { error, .. } | Self::TransitionAbort { error, .. } => Some(error),
			_ => None,
		}
	}
}

/// Event listener.
pub type Listener = Arc<dyn Fn(&RouterEvent<'_>) + Send + Sync>;

/// Handle returned when registering a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Registration {
	id: ListenerId,
	kind: Option<RouterEventKind>,
	listener: Listener,
}

/// Publish/subscribe event source owned by a router.
#[derive(Clone, Default)]
pub struct RouterEvents {
	listeners: Arc<RwLock<Vec<Registration>>>,
	next_id: Arc<AtomicU64>,
}

impl RouterEvents {
	/// Creates an event source without listeners.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `listener` for events of `kind`.
	pub fn on<F>(&self, kind: RouterEventKind, listener: F) -> ListenerId
	where
		F: Fn(&RouterEvent<'_>) + Send + Sync + 'static,
	{
		self.register(Some(kind), Arc::new(listener))
	}

	/// Registers `listener` for every event.
	pub fn on_any<F>(&self, listener: F) -> ListenerId
	where
		F: Fn(&RouterEvent<'_>) + Send + Sync + 'static,
	{
		self.register(None, Arc::new(listener))
	}

	fn register(&self, kind: Option<RouterEventKind>, listener: Listener) -> ListenerId {
		let id = ListenerId(self.next_id.fetch_add(1, Ordering::SeqCst));
		self.listeners
			.write()
			.push(Registration { id, kind, listener });
		id
	}

	/// Removes a listener. Returns `false` if it was not registered.
	pub fn off(&self, id: ListenerId) -> bool {
		let mut listeners = self.listeners.write();
		let before = listeners.len();
		listeners.retain(|registration| registration.id != id);
		listeners.len() < before
	}

	/// Announces `event` to matching listeners.
	pub fn emit(&self, event: RouterEvent<'_>) {
		let kind = event.kind();
		let matching: Vec<Listener> = self
			.listeners
			.read()
			.iter()
			.filter(|registration| registration.kind.is_none_or(|k| k == kind))
			.map(|registration| Arc::clone(&registration.listener))
			.collect();
		for listener in matching {
			listener(&event);
		}
	}

	/// Removes every listener.
	pub fn clear(&self) {
		self.listeners.write().clear();
	}

	/// Number of registered listeners.
	pub fn listener_count(&self) -> usize {
		self.listeners.read().len()
	}
}

impl fmt::Debug for RouterEvents {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouterEvents")
			.field("listeners", &self.listener_count())
			.finish()
	}
}
