//! Gaming news feed

use crate::Result;
use crate::data::{ArticlesLocalDataStore, ArticlesRemoteDataStore, observe};
use crate::domain::{Article, Pagination};
use crate::refresh::{Refresh, RefreshOrchestrator};
use crate::throttling::{KeyProvider, RefreshPolicy};
use crate::usecases::with_refresh_errors;
use futures::stream::BoxStream;
use std::sync::Arc;

pub struct RefreshArticlesUseCase {
    remote: Arc<dyn ArticlesRemoteDataStore>,
    local: Arc<dyn ArticlesLocalDataStore>,
    keys: Arc<dyn KeyProvider>,
    orchestrator: RefreshOrchestrator,
    policy: RefreshPolicy,
}

impl RefreshArticlesUseCase {
    pub fn new(
        remote: Arc<dyn ArticlesRemoteDataStore>,
        local: Arc<dyn ArticlesLocalDataStore>,
        keys: Arc<dyn KeyProvider>,
        orchestrator: RefreshOrchestrator,
    ) -> Self {
        Self {
            remote,
            local,
            keys,
            orchestrator,
            policy: RefreshPolicy::ARTICLES,
        }
    }

    pub fn with_policy(mut self, policy: RefreshPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub async fn execute(&self, pagination: Pagination) -> Result<Refresh<Vec<Article>>> {
        let key = self.keys.articles_key(pagination);
        self.orchestrator
            .refresh(&key, self.policy, self.local.as_ref(), || {
                self.remote.articles(pagination)
            })
            .await
    }
}

pub struct ObserveArticlesUseCase {
    local: Arc<dyn ArticlesLocalDataStore>,
    refresh: Arc<RefreshArticlesUseCase>,
}

impl ObserveArticlesUseCase {
    pub fn new(local: Arc<dyn ArticlesLocalDataStore>, refresh: Arc<RefreshArticlesUseCase>) -> Self {
        Self { local, refresh }
    }

    /// Live newest-first page of articles, optionally refreshing alongside
    pub fn execute(
        &self,
        refresh: bool,
        pagination: Pagination,
    ) -> BoxStream<'static, Result<Vec<Article>>> {
        let local = self.local.clone();
        let articles = observe(vec![local.changes()], move || {
            let local = local.clone();
            async move { local.articles(pagination).await }
        });

        if !refresh {
            return articles;
        }

        let refresher = self.refresh.clone();
        with_refresh_errors(articles, async move { refresher.execute(pagination).await })
    }
}
