//! Selectors Level 4: parsing and element matching.
//! Reference: <https://www.w3.org/TR/selectors-4/>
//!
//! This crate implements the subset used by composed-tree queries:
//! - Type, universal, class, id and attribute selectors (`=`, `~=`, `|=`, `^=`, `$=`, `*=`)
//! - `:not()`, `:nth-child()`, `:nth-last-child()`, `:first-child`, `:last-child`, `:only-child`
//! - Combinators: descendant, child, adjacent sibling, general sibling
//! - A size-bounded cache of parsed selector lists
//!
//! Tree access goes through [`ElementAdapter`], so the matcher has no opinion on
//! what "parent" or "sibling" means. Callers decide which tree is walked.

mod cache;
mod error;
mod matcher;
mod nth;
mod parser;
mod serialize;

pub use cache::SelectorCache;
pub use error::SyntaxError;
pub use matcher::{matches_complex, matches_compound, matches_selector_list};
pub use nth::NthExpr;
pub use parser::{
    DEFAULT_MAX_NESTING, MAX_NESTING_CEILING, parse_selector_list, parse_selector_list_with_limit,
};

/// Position of an element among the element children of its parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ElementIndex {
    /// 1-based position counting element siblings only.
    pub position: usize,
    /// Number of element siblings, the element included.
    pub count: usize,
}

impl ElementIndex {
    /// Index used for elements without a parent: they count as an only child.
    pub const ONLY_CHILD: Self = Self {
        position: 1,
        count: 1,
    };
}

/// An adapter that abstracts tree access for selector matching.
/// Implement this for your DOM layer.
///
/// Selectors Level 4 § 3.1 Structure and terminology
pub trait ElementAdapter {
    type Handle: Copy + Eq;

    /// Parent node if any. May be a non-element (for example the document).
    /// Selectors Level 4 § 16 Combinators
    fn parent(&self, element: Self::Handle) -> Option<Self::Handle>;

    /// Previous sibling element, skipping text and comment nodes.
    /// Selectors Level 4 § 16.3/16.4 Sibling combinators
    fn previous_sibling_element(&self, element: Self::Handle) -> Option<Self::Handle>;

    /// True if the handle refers to an element. Only elements ever match.
    fn is_element(&self, node: Self::Handle) -> bool;

    /// Local tag name.
    /// Selectors Level 4 § 5.1 Type selectors
    fn tag_name(&self, element: Self::Handle) -> &str;

    /// True for HTML elements, whose tag names match type selectors ASCII
    /// case-insensitively. Other elements (SVG, MathML) compare exactly.
    fn is_html_element(&self, element: Self::Handle) -> bool;

    /// Returns Some(id) if the element has an id attribute, else None.
    /// Selectors Level 4 § 6.7 ID selectors
    fn element_id(&self, element: Self::Handle) -> Option<&str>;

    /// True if the element has the given class token.
    /// Selectors Level 4 § 6.6 Class selectors
    fn has_class(&self, element: Self::Handle, class: &str) -> bool;

    /// Returns the attribute value if present.
    /// Selectors Level 4 § 6 Attribute selectors
    fn attr(&self, element: Self::Handle, name: &str) -> Option<&str>;

    /// Position among the parent's element children, `None` if the element has no parent.
    /// Selectors Level 4 § 14 Tree-structural pseudo-classes
    fn element_index(&self, element: Self::Handle) -> Option<ElementIndex>;
}

/// Attribute matching operators.
/// Selectors Level 4 § 6.1 Attribute presence and value selectors, 6.2 Substring matching
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttrOperator {
    /// `[name=value]`
    Equals,
    /// `[name~=value]`: whitespace-separated list contains value.
    Includes,
    /// `[name|=value]`: equals value or starts with `value-`.
    DashMatch,
    /// `[name^=value]`
    Prefix,
    /// `[name$=value]`
    Suffix,
    /// `[name*=value]`
    Substring,
}

/// An attribute selector: presence test or operator/value test.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AttributeSelector {
    /// ASCII-lowercased attribute name.
    pub name: String,
    /// Operator and expected value. `None` is a presence test.
    pub value: Option<(AttrOperator, String)>,
}

/// Simple selectors.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SimpleSelector {
    /// Type selector, case preserved as written.
    Type(String),
    /// Universal selector '*'.
    Universal,
    /// `#id`
    IdSelector(String),
    /// `.class`
    Class(String),
    /// `[attr]`, `[attr=value]`, ...
    Attribute(AttributeSelector),
    /// `:not(list)`, evaluated against the same element only.
    Not(SelectorList),
    /// `:nth-child(an+b)`
    NthChild(NthExpr),
    /// `:nth-last-child(an+b)`
    NthLastChild(NthExpr),
    /// `:first-child`
    FirstChild,
    /// `:last-child`
    LastChild,
    /// `:only-child`
    OnlyChild,
}

/// A compound selector is a sequence of simple selectors (no combinators).
/// Order is irrelevant to matching.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct CompoundSelector {
    pub simples: Vec<SimpleSelector>,
}

/// Combinators between compounds.
/// Selectors Level 4 § 16 Combinators
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Combinator {
    Descendant,
    Child,
    AdjacentSibling,
    GeneralSibling,
}

/// A complex selector is one or more compounds separated by combinators.
/// `first` is the left-most compound as written; `rest` pairs each following
/// compound with the combinator that precedes it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct ComplexSelector {
    pub first: CompoundSelector,
    pub rest: Vec<(Combinator, CompoundSelector)>,
}

impl ComplexSelector {
    /// The compound tested against the candidate element itself.
    pub fn rightmost(&self) -> &CompoundSelector {
        self.rest.last().map_or(&self.first, |pair| &pair.1)
    }

    /// Compound at `index`, counting `first` as 0.
    pub(crate) fn compound_at(&self, index: usize) -> Option<&CompoundSelector> {
        match index.checked_sub(1) {
            None => Some(&self.first),
            Some(rest_index) => self.rest.get(rest_index).map(|pair| &pair.1),
        }
    }
}

/// A selector list separated by commas.
/// Selectors Level 4 § 4.1 Selector lists
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct SelectorList {
    pub selectors: Vec<ComplexSelector>,
}

impl SelectorList {
    /// Build the list equivalent to `.a.b.c` for the given class tokens.
    /// Returns an empty list (matching nothing) when `classes` is empty.
    pub fn from_classes<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let simples: Vec<SimpleSelector> = classes
            .into_iter()
            .map(|class| SimpleSelector::Class(class.into()))
            .collect();
        if simples.is_empty() {
            return Self::default();
        }
        Self {
            selectors: vec![ComplexSelector {
                first: CompoundSelector { simples },
                rest: Vec::new(),
            }],
        }
    }
}
