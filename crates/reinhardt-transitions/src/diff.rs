//! Route chain diffing.
//!
//! The changing index is the first position where the previous and next
//! chains disagree: different names, different params, or one chain ended.
//! Nodes before it are shared and receive no lifecycle calls.

use crate::descriptor::RouteDescriptor;

/// Returns the first position where `prev` and `next` differ.
pub fn changing_index(prev: &[RouteDescriptor], next: &[RouteDescriptor]) -> usize {
	let count = prev.len().max(next.len());
	(0..count)
		.find(|&index| match (prev.get(index), next.get(index)) {
			(Some(a), Some(b)) => !a.same_node(b),
			_ => true,
		})
		.unwrap_or(count)
}

/// Shared and changing parts of two route chains.
#[derive(Debug, Clone)]
pub struct TransitionDiff {
	/// First changing position.
	pub changing_index: usize,
	/// Nodes leaving the chain, leaf first.
	pub deactivated: Vec<RouteDescriptor>,
	/// Nodes entering the chain, root first.
	pub activated: Vec<RouteDescriptor>,
}

impl TransitionDiff {
	/// Diffs `prev` against `next`.
	pub fn compute(prev: &[RouteDescriptor], next: &[RouteDescriptor]) -> Self {
		let changing_index = changing_index(prev, next);
		let deactivated = prev
			.iter()
			.skip(changing_index)
			.rev()
			.cloned()
			.collect();
		let activated = next.iter().skip(changing_index).cloned().collect();
		Self {
			changing_index,
			deactivated,
			activated,
		}
	}

	/// Returns `true` when both chains designate the same nodes.
	pub fn is_empty(&self) -> bool {
		self.deactivated.is_empty() && self.activated.is_empty()
	}
}
