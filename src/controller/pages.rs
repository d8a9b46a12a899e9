use super::PageController;
use crate::render::{LoadingOverlay, NoticeKind, markup};
use crate::router::RouteParams;
use tracing::{debug, error};

impl PageController {
    /// Home: skeleton grid, then the full listing.
    pub(crate) async fn render_home(&self) -> anyhow::Result<()> {
        self.surface
            .commit(markup::home_loading(self.config.home_skeletons));

        match self.api.fetch_anime(None).await.into_result() {
            Ok(listing) => self.surface.commit(markup::home_page(&listing)),
            Err(e) => {
                error!("Error loading homepage: {}", e);
                self.stats.increment_upstream_failures();
                self.surface.commit(markup::home_error());
                self.surface
                    .notify("Failed to load content", NoticeKind::Error);
            }
        }
        Ok(())
    }

    /// Details: the anime and its episodes are fetched together behind the
    /// blocking overlay. Both must succeed for the page to render.
    pub(crate) async fn render_details(&self, params: RouteParams) -> anyhow::Result<()> {
        let id = params.decoded("id")?;
        let _overlay = LoadingOverlay::show(self.surface.as_ref());

        let (anime, episodes) = futures_util::join!(
            self.api.fetch_anime_by_id(&id),
            self.api.fetch_episodes(&id, None)
        );

        match (anime.into_result(), episodes.into_result()) {
            (Ok(anime), Ok(episodes)) => {
                self.surface.commit(markup::details_page(&anime, &episodes));
            }
            (Err(e), _) | (Ok(_), Err(e)) => {
                error!("Error loading anime details for {}: {}", id, e);
                self.stats.increment_upstream_failures();
                self.surface.commit(markup::details_error());
                self.surface
                    .notify("Failed to load anime details", NoticeKind::Error);
            }
        }
        Ok(())
    }

    /// Search: renders results for the decoded query unless the search was
    /// superseded, in which case nothing is rendered.
    pub(crate) async fn render_search(&self, params: RouteParams) -> anyhow::Result<()> {
        let query = params.decoded("query")?;
        let token = self.search.lock().begin(&query);
        if token.is_cancelled() {
            debug!("Search for {:?} was superseded before it started", query);
            self.stats.increment_searches_cancelled();
            return Ok(());
        }

        if self.surface.search_input() != query {
            self.surface.set_search_input(&query);
        }
        self.surface
            .commit(markup::search_loading(&query, self.config.search_skeletons));

        let outcome = self.api.search_anime(&query, &token).await;
        self.search.lock().finish();

        let envelope = match outcome {
            Ok(envelope) if !token.is_cancelled() => envelope,
            _ => {
                debug!("Search for {:?} cancelled", query);
                self.stats.increment_searches_cancelled();
                return Ok(());
            }
        };

        match envelope.into_result() {
            Ok(results) => self.surface.commit(markup::search_results(&query, &results)),
            Err(e) => {
                error!("Search error: {}", e);
                self.stats.increment_upstream_failures();
                self.surface.commit(markup::search_error(&query));
                self.surface
                    .notify("Search failed. Please try again.", NoticeKind::Error);
            }
        }
        Ok(())
    }
}
