use html5ever::driver::ParseOpts;
use html5ever::serialize::{serialize, SerializeOpts, TraversalScope};
use html5ever::tendril::TendrilSink;
use html5ever::{
    local_name, namespace_url, ns, parse_document, parse_fragment, Attribute, LocalName, QualName,
};
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};

/// Elements whose text is never shown to a reader.
const HIDDEN_TEXT: &[&str] = &["script", "style", "template", "noscript", "title", "head"];

pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// A parsed piece of markup, held as the children of a root element.
///
/// Handles taken from a fragment are only valid while it is alive: dropping the
/// tree detaches every node in it.
pub struct Fragment {
    _dom: RcDom,
    root: Handle,
}

impl Fragment {
    /// Parse markup as it would be parsed inside `<body>`.
    pub fn parse(markup: &str) -> Self {
        let context = QualName::new(None, ns!(html), local_name!("body"));
        let dom = parse_fragment(RcDom::default(), ParseOpts::default(), context, Vec::new())
            .one(markup);

        // Fragment parsing puts the parsed nodes under a synthetic <html> element.
        let root = first_element(&dom.document, "html").unwrap_or_else(|| dom.document.clone());
        Self { _dom: dom, root }
    }

    /// Parse a complete document and keep what sits inside its `<body>`.
    pub fn parse_body(document: &str) -> Self {
        let dom = parse_document(RcDom::default(), ParseOpts::default()).one(document);

        let root = first_element(&dom.document, "body").unwrap_or_else(|| dom.document.clone());
        Self { _dom: dom, root }
    }

    /// Elements with any of the given tag names, in document order.
    pub fn elements(&self, names: &[&str]) -> Vec<Handle> {
        let mut found = Vec::new();
        collect_elements(&self.root, names, &mut found);
        found
    }

    /// Every visible text run, separated by single spaces.
    pub fn text(&self) -> String {
        let mut runs = Vec::new();
        collect_text(&self.root, &mut runs);

        runs.iter()
            .flat_map(|run| run.split_whitespace())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn to_html(&self) -> String {
        let mut bytes = Vec::new();
        let opts = SerializeOpts {
            traversal_scope: TraversalScope::ChildrenOnly(None),
            ..Default::default()
        };

        // Writing into a Vec cannot fail.
        let _ = serialize(&mut bytes, &SerializableHandle::from(self.root.clone()), opts);
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

/// The text an element renders as, with adjacent inline runs joined and
/// whitespace collapsed.
pub fn inner_text(node: &Handle) -> String {
    let mut runs = Vec::new();
    collect_text(node, &mut runs);

    runs.concat().split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Set `name` on an element, replacing any value it already had.
pub fn set_attribute(node: &Handle, name: &str, value: &str) {
    let NodeData::Element { attrs, .. } = &node.data else {
        return;
    };

    let name = LocalName::from(name);
    let mut attrs = attrs.borrow_mut();
    attrs.retain(|attr| attr.name.local != name);
    attrs.insert(
        0,
        Attribute {
            name: QualName::new(None, ns!(), name),
            value: value.into(),
        },
    );
}

/// The text a reader sees for a fragment of markup.
pub fn visible_text(markup: &str) -> String {
    Fragment::parse(markup).text()
}

fn element_name(node: &Handle) -> Option<&str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(&*name.local),
        _ => None,
    }
}

fn first_element(node: &Handle, tag: &str) -> Option<Handle> {
    let children = node.children.borrow();
    let found = children.iter().find_map(|child| {
        if element_name(child) == Some(tag) {
            Some(child.clone())
        } else {
            first_element(child, tag)
        }
    });
    found
}

fn collect_elements(node: &Handle, names: &[&str], found: &mut Vec<Handle>) {
    for child in node.children.borrow().iter() {
        if element_name(child).is_some_and(|name| names.contains(&name)) {
            found.push(child.clone());
        }
        collect_elements(child, names, found);
    }
}

fn collect_text(node: &Handle, runs: &mut Vec<String>) {
    for child in node.children.borrow().iter() {
        match &child.data {
            NodeData::Text { contents } => runs.push(contents.borrow().to_string()),
            NodeData::Element { name, .. } if HIDDEN_TEXT.contains(&&*name.local) => {}
            NodeData::Element { .. } => collect_text(child, runs),
            _ => {}
        }
    }
}
