//! Collect errors across a loop and report them together

use std::fmt;

/// Errors gathered while processing many items
///
/// ```
/// use corekit::multierror::MultiError;
///
/// let mut errors = MultiError::default();
/// for input in ["1", "x", "3", "y"] {
///     errors.append(input.parse::<u8>());
/// }
/// assert_eq!(errors.len(), 2);
/// assert!(errors.into_result().is_err());
/// ```
#[derive(Default)]
pub struct MultiError {
    errors: Vec<anyhow::Error>,
}

impl MultiError {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the error of `result`, if any
    pub fn append<T, E>(&mut self, result: Result<T, E>) -> &mut Self
    where
        E: Into<anyhow::Error>,
    {
        if let Err(err) = result {
            self.errors.push(err.into());
        }
        self
    }

    pub fn push(&mut self, err: impl Into<anyhow::Error>) -> &mut Self {
        self.errors.push(err.into());
        self
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[anyhow::Error] {
        &self.errors
    }

    /// `Ok(())` when nothing was collected, `Err(self)` otherwise
    pub fn into_result(self) -> Result<(), MultiError> {
        if self.has_errors() {
            Err(self)
        } else {
            Ok(())
        }
    }
}

impl fmt::Display for MultiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Errors: ", self.errors.len())?;
        for err in &self.errors {
            writeln!(f, "{err}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for MultiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.errors.iter()).finish()
    }
}

impl std::error::Error for MultiError {}

impl Extend<anyhow::Error> for MultiError {
    fn extend<I: IntoIterator<Item = anyhow::Error>>(&mut self, iter: I) {
        self.errors.extend(iter);
    }
}
