//! Router links.
//!
//! [`RouterLink`] is a controller attached to a rendered [`Element`] tree.
//! Every descendant carrying a `route` attribute becomes a link:
//!
//! - its `href` (on the element itself when it is an `a`, otherwise on its
//!   first descendant anchor) is generated from `param-*` and `query-*`
//!   attributes layered over per-route defaults;
//! - after each completed transition its active class (`active-class`
//!   attribute, `active` by default, empty to disable) is toggled;
//! - [`RouterLink::click`] navigates to the route unless the element is or
//!   holds an anchor, which navigates through its `href`.

use crate::descriptor::{Params, Query};
use crate::error::TransitionResult;
use crate::events::{ListenerId, RouterEventKind};
use crate::region::Element;
use crate::router::{Router, RouterShared};
use crate::transition::TransitionRef;
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, Weak};

const PARAM_PREFIX: &str = "param-";
const QUERY_PREFIX: &str = "query-";
const DEFAULT_ACTIVE_CLASS: &str = "active";

/// Computes default values from the link element.
pub type LinkValuesFn = Arc<dyn Fn(&Element) -> BTreeMap<String, String> + Send + Sync>;

/// Default values for one kind of link attribute.
#[derive(Clone)]
pub enum LinkValues {
	/// Fixed values.
	Static(BTreeMap<String, String>),
	/// Values computed per element.
	Computed(LinkValuesFn),
}

impl LinkValues {
	fn resolve(&self, el: &Element) -> BTreeMap<String, String> {
		match self {
			LinkValues::Static(values) => values.clone(),
			LinkValues::Computed(compute) => compute(el),
		}
	}
}

/// Default params and query for links to one route.
#[derive(Clone, Default)]
pub struct LinkDefaults {
	params: Option<LinkValues>,
	query: Option<LinkValues>,
}

impl LinkDefaults {
	/// Creates empty defaults.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets fixed default params.
	pub fn params(mut self, params: Params) -> Self {
		self.params = Some(LinkValues::Static(params));
		self
	}

	/// Sets fixed default query entries.
	pub fn query(mut self, query: Query) -> Self {
		self.query = Some(LinkValues::Static(query));
		self
	}

	/// Computes default params from the link element.
	pub fn params_with<F>(mut self, compute: F) -> Self
	where
		F: Fn(&Element) -> Params + Send + Sync + 'static,
	{
		self.params = Some(LinkValues::Computed(Arc::new(compute)));
		self
	}

	/// Computes default query entries from the link element.
	pub fn query_with<F>(mut self, compute: F) -> Self
	where
		F: Fn(&Element) -> Query + Send + Sync + 'static,
	{
		self.query = Some(LinkValues::Computed(Arc::new(compute)));
		self
	}
}

struct LinkState {
	root: Arc<Element>,
	defaults: RwLock<HashMap<String, LinkDefaults>>,
}

impl LinkState {
	fn links(&self) -> Vec<Arc<Element>> {
		self.root
			.descendants()
			.into_iter()
			.filter(|el| el.has_attribute("route"))
			.collect()
	}

	fn values(&self, route: &str, el: &Element) -> (Params, Query) {
		let defaults = self.defaults.read().get(route).cloned().unwrap_or_default();
		let mut params = defaults
			.params
			.as_ref()
			.map(|values| values.resolve(el))
			.unwrap_or_default();
		let mut query = defaults
			.query
			.as_ref()
			.map(|values| values.resolve(el))
			.unwrap_or_default();
		for (name, value) in el.attributes() {
			if let Some(param) = name.strip_prefix(PARAM_PREFIX) {
				params.insert(param.to_string(), value);
			} else if let Some(key) = name.strip_prefix(QUERY_PREFIX) {
				query.insert(key.to_string(), value);
			}
		}
		(params, query)
	}

	fn update_href(&self, router: &RouterShared, el: &Element) {
		let Some(route) = el.get_attribute("route") else {
			return;
		};
		let (params, query) = self.values(&route, el);
		let href = match router.generate(&route, &params, &query) {
			Ok(href) => href,
			Err(error) => {
				tracing::warn!(route = %route, error = %error, "cannot generate link href");
				return;
			}
		};
		if el.tag().eq_ignore_ascii_case("a") {
			el.set_attribute("href", href);
		} else if let Some(anchor) = el.find(|child| child.tag().eq_ignore_ascii_case("a")) {
			anchor.set_attribute("href", href);
		}
	}

	fn update_hrefs(&self, router: &RouterShared) {
		for el in self.links() {
			self.update_href(router, &el);
		}
	}

	fn update_active(&self, router: &RouterShared) {
		for el in self.links() {
			let Some(route) = el.get_attribute("route") else {
				continue;
			};
			let class = el
				.get_attribute("active-class")
				.unwrap_or_else(|| DEFAULT_ACTIVE_CLASS.to_string());
			if class.is_empty() {
				continue;
			}
			let (params, query) = self.values(&route, &el);
			el.toggle_class(&class, router.is_active(&route, &params, &query));
		}
	}
}

/// Link controller bound to an element tree and a router.
///
/// ```
/// use reinhardt_transitions::prelude::*;
/// use std::sync::Arc;
///
/// let router = Router::new(RouterSettings::default());
/// router.map(|map| {
/// 	map.route("user", RouteOptions::new().path("users/:id"));
/// });
/// let nav = Arc::new(
/// 	Element::new("nav").child(Element::new("a").attr("route", "user").attr("param-id", "7")),
/// );
/// let _link = RouterLink::attach(&router, nav.clone());
/// assert_eq!(nav.children()[0].get_attribute("href").as_deref(), Some("/users/7"));
/// ```
pub struct RouterLink {
	router: Router,
	state: Arc<LinkState>,
	listener: Mutex<Option<ListenerId>>,
}

impl RouterLink {
	/// Attaches links in `root` to `router`.
	pub fn attach(router: &Router, root: Arc<Element>) -> Self {
		let state = Arc::new(LinkState {
			root,
			defaults: RwLock::new(HashMap::new()),
		});
		let weak_state: Weak<LinkState> = Arc::downgrade(&state);
		let weak_router: Weak<RouterShared> = Arc::downgrade(router.shared());
		let listener = router.on(RouterEventKind::Transition, move |_| {
			if let (Some(state), Some(router)) = (weak_state.upgrade(), weak_router.upgrade()) {
				state.update_active(&router);
			}
		});
		let link = Self {
			router: router.clone(),
			state,
			listener: Mutex::new(Some(listener)),
		};
		link.refresh();
		link
	}

	/// Sets the defaults used for links to `route`.
	pub fn with_defaults(self, route: impl Into<String>, defaults: LinkDefaults) -> Self {
		self.state.defaults.write().insert(route.into(), defaults);
		self.refresh();
		self
	}

	/// Recomputes every href and active class.
	pub fn refresh(&self) {
		let shared = self.router.shared();
		self.state.update_hrefs(shared);
		self.state.update_active(shared);
	}

	/// Params and query a click on `el` would navigate with.
	pub fn link_values(&self, el: &Element) -> Option<(String, Params, Query)> {
		let route = el.get_attribute("route")?;
		let (params, query) = self.state.values(&route, el);
		Some((route, params, query))
	}

	/// Handles a click on `el`.
	///
	/// Returns `None` when the click is left to an anchor (`el` itself or a
	/// descendant) or `el` is not a link.
	pub async fn click(&self, el: &Element) -> Option<TransitionResult<TransitionRef>> {
		let is_anchor = |candidate: &Element| candidate.tag().eq_ignore_ascii_case("a");
		if is_anchor(el) || el.find(is_anchor).is_some() {
			return None;
		}
		let (route, params, query) = self.link_values(el)?;
		tracing::debug!(route = %route, "router link clicked");
		Some(self.router.transition_to(&route, params, query).await)
	}

	/// Handles an attribute change on `el`.
	pub fn attribute_changed(&self, el: &Element, attribute: &str) {
		if attribute.starts_with(PARAM_PREFIX) || attribute.starts_with(QUERY_PREFIX) {
			self.state.update_href(self.router.shared(), el);
		}
	}

	/// Stops following router transitions.
	pub fn detach(&self) {
		if let Some(id) = self.listener.lock().take() {
			self.router.off(id);
		}
	}

	/// Returns `true` while attached.
	pub fn is_attached(&self) -> bool {
		self.listener.lock().is_some()
	}
}

impl Drop for RouterLink {
	fn drop(&mut self) {
		self.detach();
	}
}

impl fmt::Debug for RouterLink {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouterLink")
			.field("root", &self.state.root.tag())
			.field("attached", &self.is_attached())
			.finish()
	}
}
