use super::Filter;
use std::fmt;
use std::sync::Arc;

/// How the children of a [`CompositeFilter`] are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Junction {
    And,
    Or,
}

impl Junction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Junction::And => "AND",
            Junction::Or => "OR",
        }
    }
}

impl fmt::Display for Junction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered list of child filters joined by `AND` or `OR`.
///
/// Children are held in a shared slice; [`CompositeFilter::with`] builds a new
/// composite that reuses the existing child nodes. An empty composite may be
/// constructed but fails to render.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeFilter {
    junction: Junction,
    children: Arc<[Filter]>,
}

impl CompositeFilter {
    pub fn new(junction: Junction, children: impl IntoIterator<Item = Filter>) -> Self {
        Self {
            junction,
            children: children.into_iter().collect(),
        }
    }

    pub fn and(children: impl IntoIterator<Item = Filter>) -> Self {
        Self::new(Junction::And, children)
    }

    pub fn or(children: impl IntoIterator<Item = Filter>) -> Self {
        Self::new(Junction::Or, children)
    }

    pub fn junction(&self) -> Junction {
        self.junction
    }

    pub fn children(&self) -> &[Filter] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// A new composite with `filter` appended; `self` is unchanged.
    pub fn with(&self, filter: Filter) -> Self {
        let children: Vec<Filter> = self
            .children
            .iter()
            .cloned()
            .chain(std::iter::once(filter))
            .collect();
        Self {
            junction: self.junction,
            children: children.into(),
        }
    }
}
