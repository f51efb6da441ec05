//! Filtered, paginated queries merged into one identity list.

use crate::{IdentityList, build_query_text};
use derive_getters::Getters;
use docpane_core::{ContainerHandle, Dialect, DocumentIdentity, PartitionKeyResolver};
use docpane_error::DocpaneResult;
use docpane_interface::{Continuation, DocumentBackend, QueryOptions, QueryPage, QueryRequest};

/// Query state of one browsing tab.
#[derive(Debug, Clone, Default, PartialEq, Getters)]
pub struct QuerySessionState {
    /// Raw filter text.
    filter: String,
    /// Resume token (document-proxy dialect only).
    continuation_token: Option<String>,
    /// Identities fetched so far.
    identities: IdentityList,
    /// Whether every page has been fetched.
    exhausted: bool,
    /// Bumped on every filter change; pages from older generations are dropped.
    generation: u64,
    /// Pages applied in the current generation.
    pages_fetched: usize,
}

/// A page request stamped with the generation it was launched in.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct FetchTicket {
    /// Session generation at launch.
    generation: u64,
    /// Request to send to the backend.
    request: QueryRequest,
}

/// What the editor should do after a page lands.
#[derive(Debug, Clone, PartialEq)]
pub enum AutoSelect {
    /// Show this identity.
    Select(DocumentIdentity),
    /// The result set is empty: show nothing.
    ClearEditor,
    /// Leave the editor alone.
    Keep,
}

/// Result of merging one page.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct PageMerge {
    /// Identities appended by this page, in backend order.
    new_identities: Vec<DocumentIdentity>,
    /// Editor follow-up.
    auto_select: AutoSelect,
    /// Whether this page was the last.
    exhausted: bool,
}

/// Outcome of a fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The page was merged into the session.
    Applied(PageMerge),
    /// The filter changed while the page was in flight; it was discarded.
    Stale,
    /// Nothing left to fetch; the backend was not called.
    Exhausted,
}

/// Pagination state machine over one [`QuerySessionState`].
///
/// Fetches are split into [`prepare_fetch`](Self::prepare_fetch) and
/// [`apply_page`](Self::apply_page) so a caller can issue the backend call
/// without holding the engine. A page whose ticket predates the latest
/// [`set_filter`](Self::set_filter) is reported as [`FetchOutcome::Stale`] and
/// never touches the session.
#[derive(Debug, Clone, Getters)]
pub struct QueryPaginationEngine {
    /// Dialect of the container being queried.
    dialect: Dialect,
    /// Options sent with every query.
    options: QueryOptions,
    /// Current session.
    state: QuerySessionState,
}

impl QueryPaginationEngine {
    /// Creates an engine with an empty session.
    pub fn new(dialect: Dialect, options: QueryOptions) -> Self {
        Self {
            dialect,
            options,
            state: QuerySessionState::default(),
        }
    }

    /// Engine for `container`, scoped to its resource token partition when one is set.
    pub fn for_container(container: &ContainerHandle, cross_partition_enabled: bool) -> Self {
        let mut options = QueryOptions::default().with_cross_partition_enabled(cross_partition_enabled);
        if let Some(scope) = container.resource_token_partition_key() {
            options = options.with_partition_key_scope(scope.clone());
        }
        Self::new(*container.dialect(), options)
    }

    pub(crate) fn identities_mut(&mut self) -> &mut IdentityList {
        &mut self.state.identities
    }

    /// Starts a fresh result set for `filter` and returns the new generation.
    #[tracing::instrument(skip(self), fields(generation = tracing::field::Empty))]
    pub fn set_filter(&mut self, filter: &str) -> u64 {
        let generation = self.state.generation + 1;
        self.state = QuerySessionState {
            filter: filter.to_string(),
            generation,
            ..QuerySessionState::default()
        };
        tracing::Span::current().record("generation", generation);
        tracing::debug!("Filter replaced, result set cleared");
        generation
    }

    /// Effective query text for the current filter.
    pub fn effective_query(&self, resolver: &PartitionKeyResolver) -> String {
        build_query_text(self.dialect, &self.state.filter, resolver)
    }

    /// Builds the next page request, or `None` once the session is exhausted.
    pub fn prepare_fetch(&self, resolver: &PartitionKeyResolver) -> Option<FetchTicket> {
        if self.state.exhausted {
            return None;
        }
        let request = QueryRequest::new(
            self.effective_query(resolver),
            self.state.continuation_token.clone(),
            self.options.clone(),
            self.state.pages_fetched == 0,
        );
        Some(FetchTicket {
            generation: self.state.generation,
            request,
        })
    }

    /// Merges a page fetched with `ticket`.
    pub fn apply_page(
        &mut self,
        ticket: FetchTicket,
        page: QueryPage,
        resolver: &PartitionKeyResolver,
    ) -> FetchOutcome {
        if ticket.generation != self.state.generation {
            tracing::debug!(
                ticket_generation = ticket.generation,
                current_generation = self.state.generation,
                "Discarding page for a replaced filter"
            );
            return FetchOutcome::Stale;
        }

        let (documents, continuation) = page.into_parts();
        let dialect = self.dialect;
        let resolved: Vec<DocumentIdentity> = documents
            .iter()
            .filter_map(|raw| {
                let identity = DocumentIdentity::resolve(raw, dialect, resolver);
                if identity.is_none() {
                    tracing::warn!("Skipping document without a resource id");
                }
                identity
            })
            .collect();
        let new_identities = self.state.identities.extend(resolved);

        match continuation {
            Continuation::Token(token) => self.state.continuation_token = Some(token),
            Continuation::More => self.state.continuation_token = None,
            Continuation::Exhausted => {
                self.state.continuation_token = None;
                self.state.exhausted = true;
            }
        }
        self.state.pages_fetched += 1;

        let filter = self.state.filter.trim();
        let filtered = !filter.is_empty() && filter != self.dialect.default_filter();
        let auto_select = match self.state.identities.first() {
            None => AutoSelect::ClearEditor,
            Some(first) if filtered && self.state.pages_fetched == 1 => {
                AutoSelect::Select(first.clone())
            }
            Some(_) => AutoSelect::Keep,
        };

        tracing::debug!(
            new = new_identities.len(),
            total = self.state.identities.len(),
            exhausted = self.state.exhausted,
            "Page merged"
        );

        FetchOutcome::Applied(PageMerge {
            new_identities,
            auto_select,
            exhausted: self.state.exhausted,
        })
    }

    /// Fetches and merges the next page.
    ///
    /// A backend failure is returned unchanged and leaves the session as it was.
    #[tracing::instrument(
        skip(self, backend, container, resolver),
        fields(
            database = %container.database_id(),
            container = %container.container_id(),
            generation = self.state.generation
        )
    )]
    pub async fn fetch_next_page(
        &mut self,
        backend: &dyn DocumentBackend,
        container: &ContainerHandle,
        resolver: &PartitionKeyResolver,
    ) -> DocpaneResult<FetchOutcome> {
        let Some(ticket) = self.prepare_fetch(resolver) else {
            tracing::debug!("Session exhausted, not querying");
            return Ok(FetchOutcome::Exhausted);
        };
        let page = backend.query(container, ticket.request()).await?;
        Ok(self.apply_page(ticket, page, resolver))
    }
}
