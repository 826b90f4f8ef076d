//! Route instance registry.
//!
//! Route instances are long-lived: once constructed for a route name they are
//! reused by every later transition entering that node. Deactivation never
//! evicts an entry; only [`RouteRegistry::clear`] (router teardown) does.

use crate::route::RouteRef;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Route instances keyed by route name.
#[derive(Default)]
pub struct RouteRegistry {
	routes: RwLock<HashMap<String, RouteRef>>,
}

impl RouteRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the instance registered for `name`.
	pub fn get(&self, name: &str) -> Option<RouteRef> {
		self.routes.read().get(name).cloned()
	}

	/// Registers `route` under `name`, returning the previous instance.
	pub fn set(&self, name: impl Into<String>, route: RouteRef) -> Option<RouteRef> {
		self.routes.write().insert(name.into(), route)
	}

	/// Returns `true` if an instance exists for `name`.
	pub fn contains(&self, name: &str) -> bool {
		self.routes.read().contains_key(name)
	}

	/// Removes every instance, returning them.
	pub fn clear(&self) -> Vec<RouteRef> {
		self.routes.write().drain().map(|(_, route)| route).collect()
	}

	/// Number of registered instances.
	pub fn len(&self) -> usize {
		self.routes.read().len()
	}

	/// Returns `true` when nothing is registered.
	pub fn is_empty(&self) -> bool {
		self.routes.read().is_empty()
	}

	/// Registered route names, sorted.
	pub fn names(&self) -> Vec<String> {
		let mut names: Vec<String> = self.routes.read().keys().cloned().collect();
		names.sort();
		names
	}
}

impl std::fmt::Debug for RouteRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouteRegistry")
			.field("routes", &self.names())
			.finish()
	}
}
