//! Generic SQL dialect.

use super::Dialect;

/// A generic SQL dialect using ANSI identifier quoting.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericDialect;

impl GenericDialect {
    /// Creates a new generic dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for GenericDialect {}
