//! Route descriptors and route options.
//!
//! A [`RouteDescriptor`] is one entry of a matched route chain as produced by the
//! path router. It is read-only to the transition core: identity for diffing is
//! `(name, params)`.

use crate::definition::{RouteClass, RouteDefinition, ViewDefinition, ViewOptions};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Route parameters keyed by name.
pub type Params = BTreeMap<String, String>;

/// Query string entries keyed by name.
pub type Query = BTreeMap<String, String>;

/// Options attached to a route node.
///
/// Besides the recognized keys (route class, view definition, view options,
/// the `outlet` flag and the path segment) arbitrary values can be stored with
/// [`RouteOptions::option`]; they travel untouched in the route's
/// [`RouteConfig`].
///
/// # Example
///
/// ```
/// use reinhardt_transitions::definition::ViewDefinition;
/// use reinhardt_transitions::descriptor::RouteOptions;
/// use reinhardt_transitions::region::Element;
///
/// let options = RouteOptions::new()
/// 	.path(":id")
/// 	.component(ViewDefinition::factory(|_| Element::new("article")))
/// 	.outlet(false);
/// assert!(!options.is_outlet());
/// assert!(options.has_definition());
/// ```
#[derive(Clone)]
pub struct RouteOptions {
	pub(crate) class: Option<RouteClass>,
	pub(crate) component: Option<ViewDefinition>,
	pub(crate) view_options: Option<ViewOptions>,
	pub(crate) route_options: Map<String, Value>,
	pub(crate) outlet: bool,
	pub(crate) path: Option<String>,
	pub(crate) extra: Map<String, Value>,
}

impl Default for RouteOptions {
	fn default() -> Self {
		Self {
			class: None,
			component: None,
			view_options: None,
			route_options: Map::new(),
			outlet: true,
			path: None,
			extra: Map::new(),
		}
	}
}

impl RouteOptions {
	/// Creates empty options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the route handler class.
	pub fn class(mut self, class: RouteClass) -> Self {
		self.class = Some(class);
		self
	}

	/// Sets the view definition.
	pub fn component(mut self, component: ViewDefinition) -> Self {
		self.component = Some(component);
		self
	}

	/// Sets the options passed to the view definition.
	pub fn view_options(mut self, options: ViewOptions) -> Self {
		self.view_options = Some(options);
		self
	}

	/// Adds an option passed to the handler's `initialize`.
	pub fn route_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.route_options.insert(key.into(), value.into());
		self
	}

	/// Marks whether the route acts as a mount point for its children.
	pub fn outlet(mut self, outlet: bool) -> Self {
		self.outlet = outlet;
		self
	}

	/// Sets the path segment. Defaults to the route name.
	pub fn path(mut self, path: impl Into<String>) -> Self {
		self.path = Some(path.into());
		self
	}

	/// Stores an arbitrary option.
	pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.extra.insert(key.into(), value.into());
		self
	}

	/// Returns an arbitrary option.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.extra.get(key)
	}

	/// Returns `false` for routes flagged `outlet: false`.
	pub fn is_outlet(&self) -> bool {
		self.outlet
	}

	/// Returns the configured path segment.
	pub fn path_segment(&self) -> Option<&str> {
		self.path.as_deref()
	}

	/// Returns `true` if the options declare a route class or a view definition.
	pub fn has_definition(&self) -> bool {
		self.class.is_some() || self.component.is_some()
	}

	/// Returns the route definition declared by these options, if any.
	pub fn definition(&self) -> Option<RouteDefinition> {
		self.has_definition()
			.then(|| RouteDefinition::Options(Box::new(self.clone())))
	}
}

impl fmt::Debug for RouteOptions {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouteOptions")
			.field("class", &self.class.as_ref().map(RouteClass::name))
			.field("component", &self.component)
			.field("view_options", &self.view_options)
			.field("route_options", &self.route_options)
			.field("outlet", &self.outlet)
			.field("path", &self.path)
			.field("extra", &self.extra)
			.finish()
	}
}

/// One matched route in a route chain.
#[derive(Debug, Clone)]
pub struct RouteDescriptor {
	/// Unique route name.
	pub name: String,
	/// Path segment of the route node.
	pub path: String,
	/// Parameters visible to this node.
	pub params: Params,
	/// Node options.
	pub options: RouteOptions,
}

impl RouteDescriptor {
	/// Creates a descriptor with no params and default options.
	pub fn new(name: impl Into<String>) -> Self {
		let name = name.into();
		Self {
			path: name.clone(),
			name,
			params: Params::new(),
			options: RouteOptions::default(),
		}
	}

	/// Sets the params.
	pub fn with_params(mut self, params: Params) -> Self {
		self.params = params;
		self
	}

	/// Sets the options.
	pub fn with_options(mut self, options: RouteOptions) -> Self {
		if let Some(path) = options.path_segment() {
			self.path = path.to_string();
		}
		self.options = options;
		self
	}

	/// Returns `true` if both descriptors designate the same node with equal params.
	pub fn same_node(&self, other: &RouteDescriptor) -> bool {
		self.name == other.name && self.params == other.params
	}

	pub(crate) fn config(&self) -> RouteConfig {
		RouteConfig {
			name: self.name.clone(),
			path: self.path.clone(),
			options: self.options.clone(),
		}
	}
}

/// Snapshot of a descriptor handed to a route instance at construction.
#[derive(Debug, Clone)]
pub struct RouteConfig {
	/// Route name.
	pub name: String,
	/// Path segment.
	pub path: String,
	/// Options declared on the route node.
	pub options: RouteOptions,
}
