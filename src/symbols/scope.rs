//! Scope tree flattening
//!
//! Walks a method's scope tree depth-first and turns it into the bracketed
//! `open_scope` / `close_scope` call sequence of the encoder, declaring each scope's named
//! variables right after its opening marker and before any nested scope:
//!
//! ```text
//! A [0,100) { x }                open_scope(0)  local(x)
//! ├── B [10,20) { y }            open_scope(10) local(y) close_scope(20)
//! └── C [30,30) { z }  (empty)   -
//!                                close_scope(100)
//! ```
//!
//! Empty scopes (start == end) are dropped together with their entire subtree, so every
//! emitted opening marker has exactly one matching closing marker.

use crate::{
    metadata::scope::ScopeDebugInformation, symbols::encoder::SymbolEncoder, Error, Result,
};

/// Pending step of the scope walk.
enum Frame<'s> {
    Open(&'s ScopeDebugInformation, usize),
    Close(u32),
}

/// Emits scope trees into an encoder.
///
/// The tree is walked with an explicit stack, so nesting depth is bounded by memory only.
pub struct ScopeWriter<'a, E: SymbolEncoder + ?Sized> {
    encoder: &'a mut E,
    max_depth: Option<usize>,
}

impl<'a, E: SymbolEncoder + ?Sized> ScopeWriter<'a, E> {
    /// Creates a scope writer that accepts trees of any depth
    pub fn new(encoder: &'a mut E) -> Self {
        ScopeWriter {
            encoder,
            max_depth: None,
        }
    }

    /// Refuses trees with more than `max_depth` emitted levels, if set
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Emits `scope` and its descendants.
    ///
    /// # Errors
    /// Returns [`crate::Error::RecursionLimit`] if a depth limit is set and exceeded, and
    /// propagates encoder errors unchanged.
    pub fn write_scope(&mut self, scope: &ScopeDebugInformation) -> Result<()> {
        let mut stack = vec![Frame::Open(scope, 1)];

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Open(scope, depth) => {
                    if scope.is_empty() {
                        log::trace!("Skipping empty scope at IL_{:04x}", scope.start);
                        continue;
                    }

                    if let Some(max_depth) = self.max_depth {
                        if depth > max_depth {
                            return Err(Error::RecursionLimit(max_depth));
                        }
                    }

                    self.encoder.open_scope(scope.start)?;
                    self.write_scope_variables(scope)?;

                    stack.push(Frame::Close(scope.end));
                    for child in scope.scopes.iter().rev() {
                        stack.push(Frame::Open(child, depth + 1));
                    }
                }
                Frame::Close(end) => self.encoder.close_scope(end)?,
            }
        }

        Ok(())
    }

    fn write_scope_variables(&mut self, scope: &ScopeDebugInformation) -> Result<()> {
        for variable in &scope.variables {
            if let Some(name) = variable.display_name() {
                self.encoder.define_local_variable(variable.index, name)?;
            }
        }

        Ok(())
    }
}
