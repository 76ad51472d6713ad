//! Cancellation scoped to a view's lifetime

use std::future::Future;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};

/// Owns the cancellation token of one mounted view.
///
/// Dropping the scope tears the view down: any request still guarded by it
/// resolves to [`Error::Cancelled`] instead of touching view state.
#[derive(Debug)]
pub struct ViewScope {
    token: CancellationToken,
}

impl ViewScope {
    /// A scope that is torn down together with `parent`
    pub fn new(parent: &CancellationToken) -> Self {
        Self {
            token: parent.child_token(),
        }
    }

    /// A scope with no parent
    pub fn detached() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// A nested scope torn down with this one
    pub fn child(&self) -> Self {
        Self::new(&self.token)
    }

    /// A handle that can tear the view down from elsewhere
    pub fn handle(&self) -> ScopeHandle {
        ScopeHandle {
            token: self.token.clone(),
        }
    }

    pub fn is_torn_down(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Run `fut` unless the scope is torn down first
    pub async fn guard<F, T>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if self.token.is_cancelled() {
            return Err(Error::Cancelled);
        }
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(Error::Cancelled),
            result = fut => result,
        }
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Cloneable remote control for a [`ViewScope`]
#[derive(Debug, Clone)]
pub struct ScopeHandle {
    token: CancellationToken,
}

impl ScopeHandle {
    pub fn teardown(&self) {
        self.token.cancel();
    }

    pub fn is_torn_down(&self) -> bool {
        self.token.is_cancelled()
    }
}
