//! Rendering targets.
//!
//! A [`Region`] mounts one [`View`] at a time. Views expose their capabilities
//! through trait methods instead of type probing: [`View::outlet`] returns the
//! nested mount point for child routes and [`View::is_rendered`] tells whether a
//! view attached itself without a region.
//!
//! [`Element`] and [`ElementRegion`] are lightweight in-memory implementations
//! used by [`RouterLink`](crate::link::RouterLink) and by tests.

use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Something that can be shown inside a region.
pub trait View: Send + Sync + 'static {
	/// Returns the region where child routes mount their views.
	fn outlet(&self) -> Option<Arc<dyn Region>> {
		None
	}

	/// Returns `true` if the view is already attached to the document.
	fn is_rendered(&self) -> bool {
		false
	}

	/// Releases the view. Called when a route drops its current view.
	fn destroy(&self) {}

	/// Serializes the view for inspection.
	fn html(&self) -> String {
		String::new()
	}
}

/// A mount point showing at most one view.
pub trait Region: Send + Sync + 'static {
	/// Shows `view`, replacing the current one.
	fn show(&self, view: Arc<dyn View>);

	/// Removes the current view.
	fn empty(&self);

	/// Returns the view currently shown.
	fn current(&self) -> Option<Arc<dyn View>>;
}

/// Region backed by an in-memory slot.
#[derive(Default)]
pub struct ElementRegion {
	current: Mutex<Option<Arc<dyn View>>>,
	shows: AtomicUsize,
}

impl ElementRegion {
	/// Creates an empty region.
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of times a view was shown in this region.
	pub fn show_count(&self) -> usize {
		self.shows.load(Ordering::SeqCst)
	}

	/// Serialized content of the region.
	pub fn html(&self) -> String {
		self.current
			.lock()
			.as_ref()
			.map(|view| view.html())
			.unwrap_or_default()
	}

	/// Returns `true` if `view` is the view currently shown.
	pub fn is_showing(&self, view: &Arc<dyn View>) -> bool {
		self.current
			.lock()
			.as_ref()
			.is_some_and(|current| Arc::ptr_eq(current, view))
	}
}

impl fmt::Debug for ElementRegion {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ElementRegion")
			.field("has_view", &self.current.lock().is_some())
			.field("shows", &self.show_count())
			.finish()
	}
}

impl Region for ElementRegion {
	fn show(&self, view: Arc<dyn View>) {
		self.empty();
		*self.current.lock() = Some(view);
		self.shows.fetch_add(1, Ordering::SeqCst);
	}

	fn empty(&self) {
		self.current.lock().take();
	}

	fn current(&self) -> Option<Arc<dyn View>> {
		self.current.lock().clone()
	}
}

/// A minimal element node.
///
/// Elements carry attributes, child elements, optional text and an optional
/// outlet region rendered after the children.
///
/// # Example
///
/// ```
/// use reinhardt_transitions::region::{Element, View};
///
/// let el = Element::new("div")
/// 	.attr("class", "child-view")
/// 	.child(Element::new("h2").text("Title"));
/// assert_eq!(el.html(), r#"<div class="child-view"><h2>Title</h2></div>"#);
/// ```
pub struct Element {
	tag: String,
	attributes: RwLock<BTreeMap<String, String>>,
	text: Option<String>,
	children: Vec<Arc<Element>>,
	outlet: Option<Arc<ElementRegion>>,
	rendered: bool,
	destroyed: AtomicBool,
}

impl Element {
	/// Creates an element with the given tag name.
	pub fn new(tag: impl Into<String>) -> Self {
		Self {
			tag: tag.into(),
			attributes: RwLock::new(BTreeMap::new()),
			text: None,
			children: Vec::new(),
			outlet: None,
			rendered: false,
			destroyed: AtomicBool::new(false),
		}
	}

	/// Adds an attribute.
	pub fn attr(self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.attributes.write().insert(name.into(), value.into());
		self
	}

	/// Sets the text content.
	pub fn text(mut self, text: impl Into<String>) -> Self {
		self.text = Some(text.into());
		self
	}

	/// Appends a child element.
	pub fn child(mut self, child: Element) -> Self {
		self.children.push(Arc::new(child));
		self
	}

	/// Gives the element a nested outlet region.
	pub fn with_outlet(mut self) -> Self {
		self.outlet = Some(Arc::new(ElementRegion::new()));
		self
	}

	/// Marks the element as already attached to the document.
	pub fn prerendered(mut self) -> Self {
		self.rendered = true;
		self
	}

	/// Returns the tag name.
	pub fn tag(&self) -> &str {
		&self.tag
	}

	/// Returns an attribute value.
	pub fn get_attribute(&self, name: &str) -> Option<String> {
		self.attributes.read().get(name).cloned()
	}

	/// Returns `true` if the attribute is present.
	pub fn has_attribute(&self, name: &str) -> bool {
		self.attributes.read().contains_key(name)
	}

	/// Sets an attribute value.
	pub fn set_attribute(&self, name: impl Into<String>, value: impl Into<String>) {
		self.attributes.write().insert(name.into(), value.into());
	}

	/// Removes an attribute.
	pub fn remove_attribute(&self, name: &str) -> Option<String> {
		self.attributes.write().remove(name)
	}

	/// Returns all attributes in name order.
	pub fn attributes(&self) -> Vec<(String, String)> {
		self.attributes
			.read()
			.iter()
			.map(|(k, v)| (k.clone(), v.clone()))
			.collect()
	}

	/// Returns `true` if the class list contains `class`.
	pub fn has_class(&self, class: &str) -> bool {
		self.get_attribute("class")
			.is_some_and(|list| list.split_whitespace().any(|c| c == class))
	}

	/// Adds or removes `class` from the class list.
	pub fn toggle_class(&self, class: &str, on: bool) {
		let mut attributes = self.attributes.write();
		let mut classes: Vec<String> = attributes
			.get("class")
			.map(|list| list.split_whitespace().map(String::from).collect())
			.unwrap_or_default();
		let present = classes.iter().any(|c| c == class);
		if on && !present {
			classes.push(class.to_string());
		} else if !on && present {
			classes.retain(|c| c != class);
		} else {
			return;
		}
		if classes.is_empty() {
			attributes.remove("class");
		} else {
			attributes.insert("class".to_string(), classes.join(" "));
		}
	}

	/// Returns the direct children.
	pub fn children(&self) -> &[Arc<Element>] {
		&self.children
	}

	/// Returns every descendant in document order.
	pub fn descendants(&self) -> Vec<Arc<Element>> {
		let mut found = Vec::new();
		for child in &self.children {
			found.push(Arc::clone(child));
			found.extend(child.descendants());
		}
		found
	}

	/// Returns the first descendant matching `predicate`.
	pub fn find(&self, predicate: impl Fn(&Element) -> bool) -> Option<Arc<Element>> {
		self.descendants().into_iter().find(|el| predicate(el))
	}

	/// Returns the nested outlet region.
	pub fn outlet_region(&self) -> Option<Arc<ElementRegion>> {
		self.outlet.clone()
	}

	/// Returns `true` once the element has been destroyed.
	pub fn is_destroyed(&self) -> bool {
		self.destroyed.load(Ordering::SeqCst)
	}
}

impl fmt::Debug for Element {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Element")
			.field("tag", &self.tag)
			.field("attributes", &*self.attributes.read())
			.field("children", &self.children.len())
			.field("has_outlet", &self.outlet.is_some())
			.finish()
	}
}

impl View for Element {
	fn outlet(&self) -> Option<Arc<dyn Region>> {
		self.outlet
			.clone()
			.map(|region| region as Arc<dyn Region>)
	}

	fn is_rendered(&self) -> bool {
		self.rendered
	}

	fn destroy(&self) {
		self.destroyed.store(true, Ordering::SeqCst);
	}

	fn html(&self) -> String {
		let mut out = format!("<{}", self.tag);
		for (name, value) in self.attributes.read().iter() {
			out.push_str(&format!(" {}=\"{}\"", name, value));
		}
		out.push('>');
		if let Some(text) = &self.text {
			out.push_str(text);
		}
		for child in &self.children {
			out.push_str(&child.html());
		}
		if let Some(outlet) = &self.outlet {
			out.push_str(&outlet.html());
		}
		out.push_str(&format!("</{}>", self.tag));
		out
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_region_show_replaces_view() {
		let region = ElementRegion::new();
		let first: Arc<dyn View> = Arc::new(Element::new("p").text("one"));
		let second: Arc<dyn View> = Arc::new(Element::new("p").text("two"));

		region.show(Arc::clone(&first));
		region.show(Arc::clone(&second));

		assert!(region.is_showing(&second));
		assert!(!region.is_showing(&first));
		assert_eq!(region.show_count(), 2);
		assert_eq!(region.html(), "<p>two</p>");
	}

	#[rstest]
	fn test_region_empty() {
		let region = ElementRegion::new();
		region.show(Arc::new(Element::new("p")));
		region.empty();
		assert!(region.current().is_none());
		assert_eq!(region.html(), "");
	}

	#[rstest]
	fn test_element_outlet_html() {
		let parent = Arc::new(Element::new("div").with_outlet());
		let outlet = parent.outlet().unwrap();
		outlet.show(Arc::new(Element::new("h2").text("GrandChild")));
		assert_eq!(parent.html(), "<div><h2>GrandChild</h2></div>");
	}

	#[rstest]
	fn test_toggle_class() {
		let el = Element::new("li").attr("class", "item");
		el.toggle_class("active", true);
		assert!(el.has_class("active"));
		assert!(el.has_class("item"));
		el.toggle_class("active", true);
		assert_eq!(el.get_attribute("class").as_deref(), Some("item active"));
		el.toggle_class("active", false);
		assert_eq!(el.get_attribute("class").as_deref(), Some("item"));
		el.toggle_class("item", false);
		assert!(!el.has_attribute("class"));
	}

	#[rstest]
	fn test_descendants_in_document_order() {
		let root = Element::new("nav")
			.child(Element::new("a").attr("id", "1"))
			.child(Element::new("div").child(Element::new("a").attr("id", "2")));
		let ids: Vec<_> = root
			.descendants()
			.iter()
			.filter_map(|el| el.get_attribute("id"))
			.collect();
		assert_eq!(ids, vec!["1", "2"]);
	}
}
