use thiserror::Error;

use crate::builder::{BuilderOptions, FormBuilder};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuilderError {
    #[error("form builder is not initialized")]
    NotInitialized,
}

/// Slot holding the builder for the current screen.
///
/// Access before [`BuilderContext::mount`] is an explicit error rather than a
/// set of no-op defaults.
#[derive(Debug, Default)]
pub enum BuilderContext {
    #[default]
    Uninitialized,
    Ready(Box<FormBuilder>),
}

impl BuilderContext {
    /// Installs a fresh builder, replacing any mounted one.
    pub fn mount(&mut self, options: BuilderOptions) {
        *self = BuilderContext::Ready(Box::new(FormBuilder::new(options)));
    }

    pub fn unmount(&mut self) -> Option<FormBuilder> {
        match std::mem::take(self) {
            BuilderContext::Ready(builder) => Some(*builder),
            BuilderContext::Uninitialized => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, BuilderContext::Ready(_))
    }

    pub fn ready(&self) -> Result<&FormBuilder, BuilderError> {
        match self {
            BuilderContext::Ready(builder) => Ok(builder),
            BuilderContext::Uninitialized => Err(BuilderError::NotInitialized),
        }
    }

    pub fn ready_mut(&mut self) -> Result<&mut FormBuilder, BuilderError> {
        match self {
            BuilderContext::Ready(builder) => Ok(builder),
            BuilderContext::Uninitialized => Err(BuilderError::NotInitialized),
        }
    }
}
