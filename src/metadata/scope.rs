//! Lexical scopes and local variables of a method.
//!
//! A [`ScopeDebugInformation`] covers a half-open IL offset range `[start, end)` of a method
//! body, lists the local variables declared in it and nests child scopes. The tree is taken as
//! given: child ranges are neither sorted nor checked for overlap.
//!
//! A scope whose start equals its end is degenerate. The symbol writer drops such a scope
//! together with everything nested in it.

/// A local variable declared in a scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDebugInformation {
    /// Slot index of the variable in the method's local signature
    pub index: u16,
    /// Source name of the variable, `None` for compiler temporaries
    pub name: Option<String>,
}

impl VariableDebugInformation {
    /// Creates a named variable
    pub fn new(index: u16, name: impl Into<String>) -> Self {
        VariableDebugInformation {
            index,
            name: Some(name.into()),
        }
    }

    /// Creates a variable without a source name
    #[must_use]
    pub fn unnamed(index: u16) -> Self {
        VariableDebugInformation { index, name: None }
    }

    /// Returns the name if the variable has a non-empty one
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }
}

/// A lexical scope of a method, bound to an IL offset range.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScopeDebugInformation {
    /// IL offset where the scope starts
    pub start: u32,
    /// IL offset where the scope ends
    pub end: u32,
    /// Variables declared in this scope, in declaration order
    pub variables: Vec<VariableDebugInformation>,
    /// Nested scopes, in document order
    pub scopes: Vec<ScopeDebugInformation>,
}

impl ScopeDebugInformation {
    /// Creates an empty scope covering `start..end`
    #[must_use]
    pub fn new(start: u32, end: u32) -> Self {
        ScopeDebugInformation {
            start,
            end,
            variables: Vec::new(),
            scopes: Vec::new(),
        }
    }

    /// Adds a variable and returns the scope, for building trees inline
    #[must_use]
    pub fn with_variable(mut self, variable: VariableDebugInformation) -> Self {
        self.variables.push(variable);
        self
    }

    /// Adds a child scope and returns the scope, for building trees inline
    #[must_use]
    pub fn with_scope(mut self, scope: ScopeDebugInformation) -> Self {
        self.scopes.push(scope);
        self
    }

    /// True if the scope covers no instructions
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True if the scope declares variables
    #[must_use]
    pub fn has_variables(&self) -> bool {
        !self.variables.is_empty()
    }

    /// True if the scope has nested scopes
    #[must_use]
    pub fn has_scopes(&self) -> bool {
        !self.scopes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_filters_empty() {
        assert_eq!(VariableDebugInformation::new(0, "x").display_name(), Some("x"));
        assert_eq!(VariableDebugInformation::new(1, "").display_name(), None);
        assert_eq!(VariableDebugInformation::unnamed(2).display_name(), None);
    }

    #[test]
    fn builder_helpers() {
        let scope = ScopeDebugInformation::new(0, 100)
            .with_variable(VariableDebugInformation::new(0, "a"))
            .with_scope(ScopeDebugInformation::new(10, 20));

        assert!(!scope.is_empty());
        assert!(scope.has_variables());
        assert!(scope.has_scopes());
        assert!(!scope.scopes[0].has_variables());
        assert!(ScopeDebugInformation::new(30, 30).is_empty());
    }
}
