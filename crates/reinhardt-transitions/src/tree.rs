//! Named route tree.
//!
//! A reference path router keyed by route name: it yields descriptor chains
//! for transitions and builds URLs. Path matching and history integration are
//! left to the embedding application.
//!
//! ```
//! use reinhardt_transitions::descriptor::RouteOptions;
//! use reinhardt_transitions::tree::RouteTree;
//!
//! let tree = RouteTree::build(|map| {
//! 	map.route_with("parent", RouteOptions::new(), |children| {
//! 		children.route("child", RouteOptions::new().path("child/:id"));
//! 	});
//! });
//! let names: Vec<_> = tree
//! 	.chain("child", &[("id".to_string(), "4".to_string())].into_iter().collect())
//! 	.unwrap()
//! 	.into_iter()
//! 	.map(|d| d.name)
//! 	.collect();
//! assert_eq!(names, vec!["parent", "child"]);
//! ```

use crate::descriptor::{Params, Query, RouteDescriptor, RouteOptions};
use crate::error::{TransitionError, TransitionResult};
use crate::settings::{LocationKind, RouterSettings};

/// A node of the route tree.
#[derive(Debug, Clone)]
pub struct RouteNode {
	name: String,
	path: String,
	options: RouteOptions,
	children: Vec<RouteNode>,
}

impl RouteNode {
	/// Route name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Path segment.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// Node options.
	pub fn options(&self) -> &RouteOptions {
		&self.options
	}

	/// Child nodes.
	pub fn children(&self) -> &[RouteNode] {
		&self.children
	}

	/// Parameter names declared by the path segment.
	pub fn param_names(&self) -> impl Iterator<Item = &str> {
		self.path
			.split('/')
			.filter_map(|segment| segment.strip_prefix(':'))
	}
}

/// Builder collecting sibling routes.
#[derive(Debug, Default)]
pub struct RouteMap {
	nodes: Vec<RouteNode>,
}

impl RouteMap {
	/// Adds a leaf route.
	pub fn route(&mut self, name: impl Into<String>, options: RouteOptions) -> &mut Self {
		self.route_with(name, options, |_| {})
	}

	/// Adds a route with children declared by `children`.
	pub fn route_with<F>(
		&mut self,
		name: impl Into<String>,
		options: RouteOptions,
		children: F,
	) -> &mut Self
	where
		F: FnOnce(&mut RouteMap),
	{
		let name = name.into();
		let path = options
			.path_segment()
			.map(str::to_string)
			.unwrap_or_else(|| name.clone());
		let mut nested = RouteMap::default();
		children(&mut nested);
		self.nodes.push(RouteNode {
			name,
			path,
			options,
			children: nested.nodes,
		});
		self
	}
}

/// Tree of named routes.
#[derive(Debug, Clone, Default)]
pub struct RouteTree {
	roots: Vec<RouteNode>,
}

impl RouteTree {
	/// Builds a tree with `build`.
	pub fn build<F>(build: F) -> Self
	where
		F: FnOnce(&mut RouteMap),
	{
		let mut map = RouteMap::default();
		build(&mut map);
		Self { roots: map.nodes }
	}

	/// Top-level nodes.
	pub fn roots(&self) -> &[RouteNode] {
		&self.roots
	}

	/// Returns `true` if a route named `name` exists.
	pub fn contains(&self, name: &str) -> bool {
		self.path_to(name).is_some()
	}

	fn path_to(&self, name: &str) -> Option<Vec<&RouteNode>> {
		fn walk<'t>(nodes: &'t [RouteNode], name: &str, trail: &mut Vec<&'t RouteNode>) -> bool {
			for node in nodes {
				trail.push(node);
				if node.name == name || walk(&node.children, name, trail) {
					return true;
				}
				trail.pop();
			}
			false
		}

		let mut trail = Vec::new();
		walk(&self.roots, name, &mut trail).then_some(trail)
	}

	/// Root-to-leaf descriptor chain of `name`.
	///
	/// Each descriptor receives the params declared by its own and its
	/// ancestors' path segments.
	pub fn chain(&self, name: &str, params: &Params) -> TransitionResult<Vec<RouteDescriptor>> {
		let nodes = self
			.path_to(name)
			.ok_or_else(|| TransitionError::UnknownRoute(name.to_string()))?;
		let mut visible = Params::new();
		Ok(nodes
			.into_iter()
			.map(|node| {
				for param in node.param_names() {
					if let Some(value) = params.get(param) {
						visible.insert(param.to_string(), value.clone());
					}
				}
				RouteDescriptor {
					name: node.name.clone(),
					path: node.path.clone(),
					params: visible.clone(),
					options: node.options.clone(),
				}
			})
			.collect())
	}

	/// Builds the URL of `name`.
	pub fn generate(
		&self,
		settings: &RouterSettings,
		name: &str,
		params: &Params,
		query: &Query,
	) -> TransitionResult<String> {
		let nodes = self
			.path_to(name)
			.ok_or_else(|| TransitionError::UnknownRoute(name.to_string()))?;
		let mut segments = Vec::new();
		for node in nodes {
			for segment in node.path.split('/').filter(|s| !s.is_empty()) {
				match segment.strip_prefix(':') {
					Some(param) => {
						let value =
							params
								.get(param)
								.ok_or_else(|| TransitionError::MissingParameter {
									route: name.to_string(),
									param: param.to_string(),
								})?;
						segments.push(value.clone());
					}
					None => segments.push(segment.to_string()),
				}
			}
		}

		let root = settings.root.trim_end_matches('/');
		let mut url = format!("{}/{}", root, segments.join("/"));
		if !query.is_empty() {
			url.push('?');
			url.push_str(&serde_urlencoded::to_string(query)?);
		}
		if settings.location == LocationKind::Hash {
			url.insert(0, '#');
		}
		Ok(url)
	}
}
