use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::{
    client::ArticleApi,
    data_formats::{ListArticlesParams, PagedResponse, DEFAULT_LIMIT},
    errors::ClientError,
    models::Article,
};

#[derive(Debug, Clone)]
pub enum PagePhase {
    Unloaded,
    Loading,
    Loaded(PagedResponse<Article>),
    Errored(Arc<ClientError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// A newer load was issued while this one was in flight; its result was dropped.
    Superseded,
}

#[derive(Debug)]
struct PageState {
    phase: PagePhase,
    page_index: u32,
    limit: u32,
    latest_request: u64,
    /// Article ids of the loaded page in server order, before any local removal.
    loaded_order: Vec<i64>,
}

/// Holds the currently displayed page of articles.
///
/// Loads are tagged with a sequence number and only the most recently issued
/// one may update the view. Deletes are applied locally first and rolled back
/// if the server call fails.
pub struct ListViewModel<A> {
    api: A,
    published_only: bool,
    state: Mutex<PageState>,
}

impl<A: ArticleApi> ListViewModel<A> {
    pub fn new(api: A) -> Self {
        Self::with_filter(api, false)
    }

    /// A view over published articles only.
    pub fn preview(api: A) -> Self {
        Self::with_filter(api, true)
    }

    fn with_filter(api: A, published_only: bool) -> Self {
        Self {
            api,
            published_only,
            state: Mutex::new(PageState {
                phase: PagePhase::Unloaded,
                page_index: 0,
                limit: DEFAULT_LIMIT,
                latest_request: 0,
                loaded_order: Vec::new(),
            }),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn phase(&self) -> PagePhase {
        self.state.lock().phase.clone()
    }

    pub fn page_index(&self) -> u32 {
        self.state.lock().page_index
    }

    pub fn limit(&self) -> u32 {
        self.state.lock().limit
    }

    /// Items of the loaded page, empty in any other phase.
    pub fn items(&self) -> Vec<Article> {
        match &self.state.lock().phase {
            PagePhase::Loaded(page) => page.items.clone(),
            _ => Vec::new(),
        }
    }

    pub fn page_count(&self) -> u64 {
        match &self.state.lock().phase {
            PagePhase::Loaded(page) => page.page_count(),
            _ => 0,
        }
    }

    pub async fn load_page(&self, page_index: u32, limit: u32) -> LoadOutcome {
        let request = {
            let mut state = self.state.lock();
            state.latest_request += 1;
            state.page_index = page_index;
            state.limit = limit;
            state.phase = PagePhase::Loading;
            state.latest_request
        };
        debug!(request, page_index, limit, "loading page");

        let params = ListArticlesParams::for_page(page_index, limit, self.published_only);
        let result = self.api.list_articles(params).await;

        let mut state = self.state.lock();
        if state.latest_request != request {
            debug!(
                request,
                latest = state.latest_request,
                "dropping stale page result"
            );
            return LoadOutcome::Superseded;
        }
        match result {
            Ok(page) => {
                state.loaded_order = page.items.iter().map(|article| article.id).collect();
                state.phase = PagePhase::Loaded(page);
            }
            Err(error) => {
                warn!(%error, page_index, "failed to load page");
                state.phase = PagePhase::Errored(Arc::new(error));
            }
        }
        LoadOutcome::Applied
    }

    pub async fn reload(&self) -> LoadOutcome {
        let (page_index, limit) = {
            let state = self.state.lock();
            (state.page_index, state.limit)
        };
        self.load_page(page_index, limit).await
    }

    /// Removes the article from the held page right away, then asks the server
    /// to delete it. On failure the article goes back to its old position.
    pub async fn optimistic_delete(&self, article_id: i64) -> Result<(), ClientError> {
        let removed = {
            let mut state = self.state.lock();
            let request = state.latest_request;
            match &mut state.phase {
                PagePhase::Loaded(page) => page
                    .items
                    .iter()
                    .position(|article| article.id == article_id)
                    .map(|position| (request, page.items.remove(position))),
                _ => None,
            }
        };

        let result = self.api.delete_article(article_id).await;
        if let Err(error) = &result {
            if let Some((request, article)) = removed {
                self.restore(request, article, error);
            }
        }
        result
    }

    // Other deletes may have completed meanwhile, so the slot is found from the
    // loaded server order rather than from the index at removal time.
    fn restore(&self, request: u64, article: Article, error: &ClientError) {
        let mut state = self.state.lock();
        let PageState {
            phase,
            latest_request,
            loaded_order,
            ..
        } = &mut *state;
        if *latest_request != request {
            debug!(id = article.id, "page changed since delete, not restoring");
            return;
        }
        if let PagePhase::Loaded(page) = phase {
            if page.items.iter().any(|existing| existing.id == article.id) {
                return;
            }
            let rank = |id: i64| loaded_order.iter().position(|loaded| *loaded == id);
            let position = match rank(article.id) {
                Some(target) => page
                    .items
                    .iter()
                    .position(|existing| rank(existing.id).map_or(false, |r| r > target))
                    .unwrap_or(page.items.len()),
                None => page.items.len(),
            };
            warn!(id = article.id, %error, "delete failed, restoring article");
            page.items.insert(position, article);
        }
    }
}
