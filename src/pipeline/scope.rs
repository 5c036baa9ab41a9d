use crate::value::{Document, Value};

/// Variable bindings visible while evaluating one document
///
/// Scopes form a chain: a child scope holds only the bindings introduced by
/// one operator invocation and points at its parent. Lookups walk from the
/// innermost scope outward, so a child shadows its parent by name and can
/// never change the parent's bindings.
#[derive(Debug)]
pub struct Scope<'a> {
    document: &'a Document,
    parent: Option<&'a Scope<'a>>,
    variables: Vec<(&'a str, Value)>,
}

impl<'a> Scope<'a> {
    /// Create the outermost scope for a document
    pub fn root(document: &'a Document) -> Self {
        Self {
            document,
            parent: None,
            variables: Vec::new(),
        }
    }

    /// Create an empty scope nested inside this one
    pub fn child(&self) -> Scope<'_> {
        Scope {
            document: self.document,
            parent: Some(self),
            variables: Vec::new(),
        }
    }

    /// Create a new scope with a variable set
    ///
    /// # Example
    /// ```
    /// use aggexpr::pipeline::Scope;
    /// use aggexpr::{Document, Value};
    ///
    /// let doc = Document::new();
    /// let root = Scope::root(&doc).with_var("x", Value::Int(1));
    /// let inner = root.child().with_var("x", Value::Int(2));
    ///
    /// assert_eq!(inner.get("x"), Some(&Value::Int(2)));
    /// assert_eq!(root.get("x"), Some(&Value::Int(1)));
    /// ```
    pub fn with_var(mut self, name: &'a str, value: Value) -> Self {
        self.set_var(name, value);
        self
    }

    /// Bind a variable in this scope
    pub fn set_var(&mut self, name: &'a str, value: Value) {
        match self.variables.iter_mut().find(|(bound, _)| *bound == name) {
            Some((_, slot)) => *slot = value,
            None => self.variables.push((name, value)),
        }
    }

    /// Look a variable up, innermost scope first
    pub fn get(&self, name: &str) -> Option<&Value> {
        let mut scope = Some(self);
        while let Some(current) = scope {
            if let Some((_, value)) = current.variables.iter().find(|(bound, _)| *bound == name) {
                return Some(value);
            }
            scope = current.parent;
        }
        None
    }

    /// The document being evaluated
    pub fn document(&self) -> &'a Document {
        self.document
    }

    /// Check if a variable is bound in this scope or an enclosing one
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}
