//! Render scheduling.
//!
//! After activation only part of the chain needs mounting. Candidates are the
//! activated routes, or the target route when nothing was activated. A route
//! flagged `outlet: false` directly followed by another candidate is dropped
//! from the queue, since its child takes its place. Each queued route mounts
//! into the outlet of its nearest ancestor with a view, or into the root region.

use crate::error::{TransitionError, TransitionResult};
use crate::region::Region;
use crate::route::RouteRef;
use crate::transition::Transition;
use std::sync::Arc;

/// Mounts the views of a resolved route chain.
pub struct RenderScheduler<'a> {
	chain: &'a [RouteRef],
	root: Option<Arc<dyn Region>>,
}

impl<'a> RenderScheduler<'a> {
	/// Creates a scheduler for `chain`, mounting top-level views in `root`.
	pub fn new(chain: &'a [RouteRef], root: Option<Arc<dyn Region>>) -> Self {
		Self { chain, root }
	}

	/// Routes considered for rendering.
	pub fn candidates<'b>(&self, activated: &'b [RouteRef]) -> &'b [RouteRef]
	where
		'a: 'b,
	{
		if activated.is_empty() {
			let start = self.chain.len().saturating_sub(1);
			&self.chain[start..]
		} else {
			activated
		}
	}

	/// Routes that will render, in order.
	pub fn queue(&self, activated: &[RouteRef]) -> Vec<RouteRef> {
		let mut queue: Vec<RouteRef> = Vec::new();
		for route in self.candidates(activated) {
			if !route.has_view_definition() {
				continue;
			}
			if queue.last().is_some_and(|previous| !previous.is_outlet()) {
				queue.pop();
			}
			queue.push(Arc::clone(route));
		}
		queue
	}

	/// Region where `route` mounts its view.
	///
	/// Ancestors without a view or flagged `outlet: false` are skipped; views of
	/// skipped `outlet: false` ancestors are cleared. `None` means no root region
	/// is configured.
	pub fn parent_region(&self, route: &RouteRef) -> TransitionResult<Option<Arc<dyn Region>>> {
		let index = self
			.chain
			.iter()
			.position(|candidate| candidate.id() == route.id())
			.unwrap_or(0);
		for parent in self.chain[..index].iter().rev() {
			if !parent.is_outlet() {
				parent.clear_view();
				continue;
			}
			if !parent.has_view() {
				continue;
			}
			return match parent.outlet() {
				Some(region) => Ok(Some(region)),
				None => Err(TransitionError::MissingOutlet {
					route: parent.name().to_string(),
				}),
			};
		}
		Ok(self.root.clone())
	}

	/// Renders every queued route.
	pub fn render(&self, activated: &[RouteRef], transition: &Transition) -> TransitionResult<()> {
		for route in self.queue(activated) {
			let region = self.parent_region(&route)?;
			route.render_view(region, transition)?;
			tracing::debug!(route = %route.name(), transition = transition.id(), "route rendered");
		}
		Ok(())
	}
}
