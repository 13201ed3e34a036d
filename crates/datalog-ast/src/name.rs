use internment::Intern;
use std::fmt;

/// Interned string for efficient storage and comparison
pub type Symbol = Intern<String>;

/// Intern a string as a [`Symbol`]
pub fn sym(name: impl Into<String>) -> Symbol {
    Intern::new(name.into())
}

/// A qualified name: a non-empty sequence of identifier segments.
///
/// Component instantiation scopes names by prefixing them with the instance
/// name, so `edge` inside `.init g = Graph<..>` becomes `g.edge`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    segments: Vec<Symbol>,
}

impl QualifiedName {
    /// Build a name from a dotted path: `"g.edge"` has segments `g`, `edge`.
    pub fn new(name: impl AsRef<str>) -> Self {
        let segments = name
            .as_ref()
            .split('.')
            .map(|segment| Intern::new(segment.to_string()))
            .collect::<Vec<_>>();
        assert!(!segments.is_empty(), "qualified names must be non-empty");
        QualifiedName { segments }
    }

    pub fn from_segments(segments: Vec<Symbol>) -> Self {
        assert!(!segments.is_empty(), "qualified names must be non-empty");
        QualifiedName { segments }
    }

    pub fn segments(&self) -> &[Symbol] {
        &self.segments
    }

    /// The first segment. Clause override matching keys on this.
    pub fn first(&self) -> Symbol {
        self.segments[0]
    }

    /// Concatenation: `self` followed by the segments of `other`.
    pub fn append(&self, other: &QualifiedName) -> QualifiedName {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().copied());
        QualifiedName { segments }
    }

    /// `self` with a single segment prefixed in front.
    pub fn prefixed(&self, prefix: Symbol) -> QualifiedName {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.push(prefix);
        segments.extend(self.segments.iter().copied());
        QualifiedName { segments }
    }

    /// `self` with a single segment appended at the end.
    pub fn with_segment(&self, segment: impl Into<String>) -> QualifiedName {
        let mut segments = self.segments.clone();
        segments.push(Intern::new(segment.into()));
        QualifiedName { segments }
    }
}

impl From<Symbol> for QualifiedName {
    fn from(segment: Symbol) -> Self {
        QualifiedName {
            segments: vec![segment],
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.segments {
            if !first {
                write!(f, ".")?;
            }
            first = false;
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl fmt::Debug for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}
