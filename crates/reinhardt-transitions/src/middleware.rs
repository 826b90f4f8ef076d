//! Transition middleware.
//!
//! Drives one [`Transition`] through its states:
//!
//! ```text
//! Start → Deactivating → Resolving → Activating → Loading → Rendering → Done
//!   └──────────────┴────────────┴───────────┴──────────┴──────────┴─→ Cancelled | Errored
//! ```
//!
//! Hooks of one phase run strictly one after another. The cancellation flag
//! is checked between steps, after every awaited hook and after every awaited
//! route definition; a started hook is never interrupted. Side effects already
//! applied are not rolled back.

use crate::diff::TransitionDiff;
use crate::error::{HookPhase, TransitionError, TransitionResult};
use crate::events::RouterEvent;
use crate::render::RenderScheduler;
use crate::resolver::RouteResolver;
use crate::route::RouteRef;
use crate::router::{Router, RouterShared};
use crate::transition::{Transition, TransitionPhase};
use std::sync::Arc;

/// Stops the transition when it has been cancelled or redirected.
fn checkpoint(transition: &Transition) -> TransitionResult<()> {
	match transition.interruption_error() {
		Some(error) => Err(error),
		None => Ok(()),
	}
}

/// Transition step plugged into a router's transition pipeline.
#[derive(Clone)]
pub struct TransitionMiddleware {
	shared: Arc<RouterShared>,
}

impl TransitionMiddleware {
	/// Creates the middleware for `router`.
	pub fn new(router: &Router) -> Self {
		Self {
			shared: Arc::clone(router.shared()),
		}
	}

	/// Runs the transition up to and including rendering.
	pub async fn next(&self, transition: &Transition) -> TransitionResult<()> {
		let shared = &self.shared;

		transition.set_phase(TransitionPhase::Start);
		shared.events.emit(RouterEvent::BeforeTransition(transition));
		checkpoint(transition)?;

		let diff = TransitionDiff::compute(transition.prev_routes(), transition.routes());
		tracing::debug!(
			transition = transition.id(),
			changing_index = diff.changing_index,
			deactivated = diff.deactivated.len(),
			activated = diff.activated.len(),
			"route chains compared"
		);

		transition.set_phase(TransitionPhase::Deactivating);
		let deactivated: Vec<RouteRef> = diff
			.deactivated
			.iter()
			.filter_map(|descriptor| shared.registry.get(&descriptor.name))
			.collect();
		for route in &deactivated {
			shared.events.emit(RouterEvent::BeforeDeactivate {
				transition,
				route: route.as_ref(),
			});
			checkpoint(transition)?;
			route
				.handler()
				.deactivate(route, transition)
				.await
				.map_err(|source| TransitionError::hook(route.name(), HookPhase::Deactivate, source))?;
			if !route.is_outlet() {
				route.clear_view();
			}
			shared.events.emit(RouterEvent::Deactivate {
				transition,
				route: route.as_ref(),
			});
			checkpoint(transition)?;
		}

		transition.set_phase(TransitionPhase::Resolving);
		let resolver = RouteResolver::new(Arc::downgrade(shared));
		for descriptor in transition.routes() {
			let route = match shared.registry.get(&descriptor.name) {
				Some(route) => route,
				None => {
					let ancestors = transition.route_instances();
					let resolution = resolver.resolve(descriptor, &ancestors);
					let waited = !resolution.is_ready();
					let route = resolution.into_route().await.ok_or_else(|| {
						TransitionError::Unresolved {
							route: descriptor.name.clone(),
						}
					})?;
					shared.registry.set(descriptor.name.clone(), Arc::clone(&route));
					if waited {
						checkpoint(transition)?;
					}
					route
				}
			};
			transition.push_instance(route);
		}

		let instances = transition.route_instances();
		let activated: Vec<RouteRef> = instances
			.iter()
			.skip(diff.changing_index)
			.cloned()
			.collect();
		transition.set_activating(activated.clone());

		transition.set_phase(TransitionPhase::Activating);
		for route in &activated {
			shared.events.emit(RouterEvent::BeforeActivate {
				transition,
				route: route.as_ref(),
			});
			checkpoint(transition)?;
			route
				.handler()
				.activate(route, transition)
				.await
				.map_err(|source| TransitionError::hook(route.name(), HookPhase::Activate, source))?;
			checkpoint(transition)?;
			shared.events.emit(RouterEvent::Activate {
				transition,
				route: route.as_ref(),
			});
		}
		checkpoint(transition)?;

		transition.set_phase(TransitionPhase::Loading);
		for route in &instances {
			let Some(loader) = route.handler().loader() else {
				continue;
			};
			if let Err(source) = loader.load(route, transition).await {
				let error = TransitionError::hook(route.name(), HookPhase::Load, source);
				tracing::warn!(
					route = %route.name(),
					transition = transition.id(),
					error = %error,
					"route load failed"
				);
			}
		}
		checkpoint(transition)?;

		transition.set_phase(TransitionPhase::Rendering);
		RenderScheduler::new(&instances, shared.root_region()).render(&activated, transition)?;
		checkpoint(transition)
	}

	/// Persists the resolved chain and announces `transition`.
	pub fn done(&self, transition: &Transition) {
		{
			let mut state = self.shared.state.lock();
			state.routes = transition.routes().to_vec();
			state.instances = transition.route_instances();
			state.params = transition.params().clone();
			state.query = transition.query().clone();
			state.path = transition.path().to_string();
			state.release(transition);
		}
		transition.set_phase(TransitionPhase::Done);
		tracing::info!(
			transition = transition.id(),
			route = %transition.name(),
			"transition completed"
		);
		self.shared.events.emit(RouterEvent::Transition(transition));
		transition.clear_activating();
	}

	/// Settles a failed transition and announces the outcome.
	pub fn error(&self, transition: &Transition, error: &TransitionError) {
		transition.clear_activating();
		self.shared.state.lock().release(transition);
		if error.is_expected() {
			transition.set_phase(TransitionPhase::Cancelled);
			tracing::debug!(
				transition = transition.id(),
				route = %transition.name(),
				reason = %error,
				"transition aborted"
			);
			self.shared.events.emit(RouterEvent::TransitionAbort { transition, error });
		} else {
			transition.set_phase(TransitionPhase::Errored);
			if self.shared.settings.log_errors {
				tracing::warn!(
					transition = transition.id(),
					route = %transition.name(),
					error = %error,
					"transition failed"
				);
			}
			self.shared.events.emit(RouterEvent::TransitionError { transition, error });
		}
	}
}

impl std::fmt::Debug for TransitionMiddleware {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TransitionMiddleware").finish_non_exhaustive()
	}
}
