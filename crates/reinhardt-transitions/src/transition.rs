//! Transition objects.
//!
//! A [`Transition`] is one navigation attempt from the previous route chain to
//! the next one. Besides the two descriptor chains it carries the resolved
//! route instances, the subset being activated, the current
//! [`TransitionPhase`] and a single cancellation flag shared by
//! [`Transition::cancel`] and [`Transition::redirect_to`].

use crate::descriptor::{Params, Query, RouteDescriptor};
use crate::error::TransitionError;
use crate::route::{RouteInstance, RouteRef};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Target of a redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTarget {
	/// Route name.
	pub name: String,
	/// Route params.
	pub params: Params,
	/// Query entries.
	pub query: Query,
}

impl RedirectTarget {
	/// Creates a target with no params and no query.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			params: Params::new(),
			query: Query::new(),
		}
	}

	/// Sets the params.
	pub fn with_params(mut self, params: Params) -> Self {
		self.params = params;
		self
	}

	/// Sets the query.
	pub fn with_query(mut self, query: Query) -> Self {
		self.query = query;
		self
	}
}

/// Why a transition stopped early.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interruption {
	/// `cancel` was called.
	Cancelled,
	/// `redirect_to` was called.
	Redirected(RedirectTarget),
}

/// State of the transition state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPhase {
	/// Created, `before:transition` pending.
	Start,
	/// Running `deactivate` hooks leaf to root.
	Deactivating,
	/// Resolving and constructing route instances.
	Resolving,
	/// Running `activate` hooks root to leaf.
	Activating,
	/// Running `load` hooks root to leaf.
	Loading,
	/// Mounting views.
	Rendering,
	/// Completed.
	Done,
	/// Stopped by cancellation or redirection.
	Cancelled,
	/// Stopped by an error.
	Errored,
}

impl TransitionPhase {
	/// Returns `true` for absorbing states.
	pub fn is_settled(&self) -> bool {
		matches!(self, Self::Done | Self::Cancelled | Self::Errored)
	}
}

/// One navigation attempt.
pub struct Transition {
	id: u64,
	name: String,
	path: String,
	params: Params,
	query: Query,
	prev: Vec<RouteDescriptor>,
	routes: Vec<RouteDescriptor>,
	interruption: Mutex<Option<Interruption>>,
	phase: Mutex<TransitionPhase>,
	instances: Mutex<Vec<RouteRef>>,
	activating: Mutex<Vec<RouteRef>>,
}

impl Transition {
	/// Creates a transition from `prev` to `routes`.
	pub fn new(
		id: u64,
		name: impl Into<String>,
		prev: Vec<RouteDescriptor>,
		routes: Vec<RouteDescriptor>,
	) -> Self {
		Self {
			id,
			name: name.into(),
			path: String::new(),
			params: Params::new(),
			query: Query::new(),
			prev,
			routes,
			interruption: Mutex::new(None),
			phase: Mutex::new(TransitionPhase::Start),
			instances: Mutex::new(Vec::new()),
			activating: Mutex::new(Vec::new()),
		}
	}

	/// Sets the target params.
	pub fn with_params(mut self, params: Params) -> Self {
		self.params = params;
		self
	}

	/// Sets the target query.
	pub fn with_query(mut self, query: Query) -> Self {
		self.query = query;
		self
	}

	/// Sets the generated path of the target.
	pub fn with_path(mut self, path: impl Into<String>) -> Self {
		self.path = path.into();
		self
	}

	/// Transition id, unique per router.
	pub fn id(&self) -> u64 {
		self.id
	}

	/// Target route name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Generated path of the target.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// Target params.
	pub fn params(&self) -> &Params {
		&self.params
	}

	/// Target query.
	pub fn query(&self) -> &Query {
		&self.query
	}

	/// Chain active before the transition.
	pub fn prev_routes(&self) -> &[RouteDescriptor] {
		&self.prev
	}

	/// Chain entered by the transition.
	pub fn routes(&self) -> &[RouteDescriptor] {
		&self.routes
	}

	/// Cancels the transition. Has no effect once interrupted.
	pub fn cancel(&self) {
		let mut interruption = self.interruption.lock();
		if interruption.is_none() {
			*interruption = Some(Interruption::Cancelled);
		}
	}

	/// Redirects the transition. Has no effect once interrupted.
	pub fn redirect_to(&self, name: impl Into<String>, params: Params, query: Query) {
		let mut interruption = self.interruption.lock();
		if interruption.is_none() {
			*interruption = Some(Interruption::Redirected(
				RedirectTarget::new(name)
					.with_params(params)
					.with_query(query),
			));
		}
	}

	/// Returns `true` once cancelled or redirected.
	pub fn is_cancelled(&self) -> bool {
		self.interruption.lock().is_some()
	}

	/// Returns the interruption, if any.
	pub fn interruption(&self) -> Option<Interruption> {
		self.interruption.lock().clone()
	}

	/// Converts the interruption into the matching error.
	pub fn interruption_error(&self) -> Option<TransitionError> {
		self.interruption().map(|interruption| match interruption {
			Interruption::Cancelled => TransitionError::Cancelled,
			Interruption::Redirected(target) => TransitionError::Redirected { target },
		})
	}

	/// Current phase.
	pub fn phase(&self) -> TransitionPhase {
		*self.phase.lock()
	}

	pub(crate) fn set_phase(&self, phase: TransitionPhase) {
		*self.phase.lock() = phase;
	}

	/// Route instances resolved so far, root to leaf.
	pub fn route_instances(&self) -> Vec<RouteRef> {
		self.instances.lock().clone()
	}

	pub(crate) fn push_instance(&self, route: RouteRef) {
		self.instances.lock().push(route);
	}

	/// Route instances being activated by this transition.
	pub fn activating(&self) -> Vec<RouteRef> {
		self.activating.lock().clone()
	}

	pub(crate) fn set_activating(&self, routes: Vec<RouteRef>) {
		*self.activating.lock() = routes;
	}

	pub(crate) fn clear_activating(&self) {
		self.activating.lock().clear();
	}

	/// Returns `true` if `route` is being activated by this transition.
	pub fn is_activating(&self, route: &RouteInstance) -> bool {
		self.activating
			.lock()
			.iter()
			.any(|candidate| candidate.id() == route.id())
	}

	/// Returns `true` if `route` is the last resolved instance.
	pub fn is_target(&self, route: &RouteInstance) -> bool {
		self.instances
			.lock()
			.last()
			.is_some_and(|last| last.id() == route.id())
	}
}

impl fmt::Debug for Transition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Transition")
			.field("id", &self.id)
			.field("name", &self.name)
			.field("params", &self.params)
			.field("query", &self.query)
			.field("phase", &self.phase())
			.field("interruption", &self.interruption())
			.finish()
	}
}

/// Shared transition handle.
pub type TransitionRef = Arc<Transition>;

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn transition() -> Transition {
		Transition::new(1, "child", Vec::new(), vec![RouteDescriptor::new("child")])
	}

	#[rstest]
	fn test_cancel_is_idempotent() {
		let transition = transition();
		assert!(!transition.is_cancelled());
		transition.cancel();
		transition.cancel();
		assert!(transition.is_cancelled());
		assert_eq!(transition.interruption(), Some(Interruption::Cancelled));
	}

	#[rstest]
	fn test_first_interruption_wins() {
		let transition = transition();
		transition.redirect_to("login", Params::new(), Query::new());
		transition.cancel();
		assert!(matches!(
			transition.interruption_error(),
			Some(TransitionError::Redirected { target }) if target.name == "login"
		));
	}

	#[rstest]
	fn test_new_transition_starts_clean() {
		let transition = transition();
		assert_eq!(transition.phase(), TransitionPhase::Start);
		assert!(!transition.phase().is_settled());
		assert!(transition.interruption_error().is_none());
		assert!(transition.route_instances().is_empty());
	}
}
