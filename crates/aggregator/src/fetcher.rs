// Copyright (c) 2026 clusterscope developers.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::future::Future;

/// Failure of a single facet fetch. Only the message is kept so that it can be cloned into
/// every reader of the entry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct FetchError {
    message: String,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The two independently fetched halves of an entity's metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Facet {
    Size,
    State,
}

/// Source of the facets of a key.
///
/// Implementations are shared by all in-flight fetches, so they must be cheap to call
/// concurrently. The returned futures must not borrow from `key`.
pub trait FacetFetcher<K>: Send + Sync + 'static {
    type Size: Clone + Send + Sync + 'static;
    type State: Clone + Send + Sync + 'static;

    fn fetch_size(&self, key: &K)
    -> impl Future<Output = Result<Self::Size, FetchError>> + Send;

    fn fetch_state(&self, key: &K)
    -> impl Future<Output = Result<Self::State, FetchError>> + Send;
}

/// [`FacetFetcher`] built from two async closures. See [`fn_fetcher`].
#[derive(Clone)]
pub struct FnFetcher<FS, FT> {
    size: FS,
    state: FT,
}

/// Builds a [`FacetFetcher`] whose facets are produced by calling `size` and `state` with an
/// owned copy of the key.
pub fn fn_fetcher<FS, FT>(size: FS, state: FT) -> FnFetcher<FS, FT> {
    FnFetcher { size, state }
}

impl<K, S, T, FS, FT, FutS, FutT> FacetFetcher<K> for FnFetcher<FS, FT>
where
    K: Clone,
    S: Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
    FS: Fn(K) -> FutS + Send + Sync + 'static,
    FT: Fn(K) -> FutT + Send + Sync + 'static,
    FutS: Future<Output = Result<S, FetchError>> + Send,
    FutT: Future<Output = Result<T, FetchError>> + Send,
{
    type Size = S;
    type State = T;

    fn fetch_size(&self, key: &K) -> impl Future<Output = Result<S, FetchError>> + Send {
        (self.size)(key.clone())
    }

    fn fetch_state(&self, key: &K) -> impl Future<Output = Result<T, FetchError>> + Send {
        (self.state)(key.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facets_display_lowercase() {
        assert_eq!(Facet::Size.to_string(), "size");
        assert_eq!(<&'static str>::from(Facet::State), "state");
    }

    #[test]
    fn fetch_error_displays_message() {
        let err = FetchError::new("HTTP 503");
        assert_eq!(err.to_string(), "HTTP 503");
        assert_eq!(err.message(), "HTTP 503");
    }
}
