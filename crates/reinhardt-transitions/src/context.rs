//! Ancestor-scoped route context.
//!
//! A route declares request handlers and event handlers through
//! [`RouteHandler::context_requests`](crate::route::RouteHandler::context_requests)
//! and [`RouteHandler::context_events`](crate::route::RouteHandler::context_events).
//! Descendants reach them through [`RouteContext`]: events go to every
//! ancestor owning a channel, nearest first, and requests are answered by the
//! nearest ancestor that registered the request name.

use crate::route::{RouteInstance, RouteRef};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Answers a context request.
pub type RequestHandler = Arc<dyn Fn(&[Value]) -> Value + Send + Sync>;

/// Receives a context event.
pub type EventHandler = Arc<dyn Fn(&[Value]) + Send + Sync>;

/// Request handlers declared by a route.
#[derive(Clone, Default)]
pub struct ContextRequests {
	handlers: HashMap<String, RequestHandler>,
}

impl ContextRequests {
	/// Creates an empty set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers the handler answering `name`.
	pub fn on<F>(mut self, name: impl Into<String>, handler: F) -> Self
	where
		F: Fn(&[Value]) -> Value + Send + Sync + 'static,
	{
		self.handlers.insert(name.into(), Arc::new(handler));
		self
	}

	/// Returns `true` when no handler is declared.
	pub fn is_empty(&self) -> bool {
		self.handlers.is_empty()
	}
}

/// Event handlers declared by a route.
#[derive(Clone, Default)]
pub struct ContextEvents {
	handlers: HashMap<String, Vec<EventHandler>>,
}

impl ContextEvents {
	/// Creates an empty set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a handler for `name`.
	pub fn on<F>(mut self, name: impl Into<String>, handler: F) -> Self
	where
		F: Fn(&[Value]) + Send + Sync + 'static,
	{
		self.handlers
			.entry(name.into())
			.or_default()
			.push(Arc::new(handler));
		self
	}

	/// Returns `true` when no handler is declared.
	pub fn is_empty(&self) -> bool {
		self.handlers.is_empty()
	}
}

/// Private channel of one route instance.
pub struct ContextChannel {
	requests: HashMap<String, RequestHandler>,
	events: HashMap<String, Vec<EventHandler>>,
}

impl ContextChannel {
	/// Binds the declared handlers. Returns `None` when nothing is declared.
	pub(crate) fn bind(requests: ContextRequests, events: ContextEvents) -> Option<Self> {
		if requests.is_empty() && events.is_empty() {
			return None;
		}
		Some(Self {
			requests: requests.handlers,
			events: events.handlers,
		})
	}

	/// Returns `true` if the channel answers `name`.
	pub fn handles(&self, name: &str) -> bool {
		self.requests.contains_key(name)
	}

	/// Answers `name`, or `None` when no handler is registered.
	pub fn request(&self, name: &str, args: &[Value]) -> Option<Value> {
		self.requests.get(name).map(|handler| handler(args))
	}

	/// Calls every handler registered for `event`.
	pub fn trigger(&self, event: &str, args: &[Value]) {
		if let Some(handlers) = self.events.get(event) {
			for handler in handlers {
				handler(args);
			}
		}
	}
}

impl fmt::Debug for ContextChannel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut requests: Vec<_> = self.requests.keys().collect();
		requests.sort();
		let mut events: Vec<_> = self.events.keys().collect();
		events.sort();
		f.debug_struct("ContextChannel")
			.field("requests", &requests)
			.field("events", &events)
			.finish()
	}
}

/// Handle scoped to a route's position in a chain.
#[derive(Clone, Default)]
pub struct RouteContext {
	parents: Vec<RouteRef>,
}

impl RouteContext {
	/// Builds the context of `route` within `chain`.
	///
	/// A route missing from `chain` has no ancestors.
	pub fn new(chain: &[RouteRef], route: &RouteInstance) -> Self {
		let parents = chain
			.iter()
			.position(|candidate| candidate.id() == route.id())
			.map(|index| chain[..index].to_vec())
			.unwrap_or_default();
		Self { parents }
	}

	/// Ancestors of the route, root first.
	pub fn parents(&self) -> &[RouteRef] {
		&self.parents
	}

	/// Broadcasts `event` to every ancestor channel, nearest first.
	pub fn trigger(&self, event: &str, args: &[Value]) {
		for parent in self.parents.iter().rev() {
			if let Some(channel) = parent.channel() {
				channel.trigger(event, args);
			}
		}
	}

	/// Returns the reply of the nearest ancestor registering `name`.
	pub fn request(&self, name: &str, args: &[Value]) -> Option<Value> {
		self.parents
			.iter()
			.rev()
			.filter_map(|parent| parent.channel())
			.find(|channel| channel.handles(name))
			.and_then(|channel| channel.request(name, args))
	}
}

impl fmt::Debug for RouteContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let names: Vec<&str> = self.parents.iter().map(|parent| parent.name()).collect();
		f.debug_struct("RouteContext")
			.field("parents", &names)
			.finish()
	}
}
