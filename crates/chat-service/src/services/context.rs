//! Action context - dependency container for actions
//!
//! Holds the store, the REST collaborators and the client configuration.

use std::sync::Arc;

use chat_cache::SharedStore;
use chat_common::PostsConfig;
use chat_core::traits::{CategoryClient, ChannelClient, PostClient, PreferenceClient};
use chat_core::{Action, ApiError, DomainError};
use dashmap::DashSet;
use tracing::warn;

use super::error::{ActionError, ActionResult};
use super::status::StatusBatcher;

/// Action context containing all dependencies
///
/// Cheap to clone; every field is shared. It provides access to:
/// - The client store
/// - The REST collaborators
/// - The status batcher, when one is running
/// - The set of threads currently being fetched
#[derive(Clone)]
pub struct ActionContext {
    store: SharedStore,

    // REST collaborators
    post_client: Arc<dyn PostClient>,
    category_client: Arc<dyn CategoryClient>,
    channel_client: Arc<dyn ChannelClient>,
    preference_client: Arc<dyn PreferenceClient>,

    posts_config: PostsConfig,
    status_batcher: Option<Arc<StatusBatcher>>,
    threads_in_flight: Arc<DashSet<String>>,
}

impl ActionContext {
    /// Create a new action context
    pub fn new(
        store: SharedStore,
        post_client: Arc<dyn PostClient>,
        category_client: Arc<dyn CategoryClient>,
        channel_client: Arc<dyn ChannelClient>,
        preference_client: Arc<dyn PreferenceClient>,
        posts_config: PostsConfig,
        status_batcher: Option<Arc<StatusBatcher>>,
    ) -> Self {
        Self {
            store,
            post_client,
            category_client,
            channel_client,
            preference_client,
            posts_config,
            status_batcher,
            threads_in_flight: Arc::new(DashSet::new()),
        }
    }

    // === Store ===

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Id of the logged in user
    pub fn current_user_id(&self) -> ActionResult<String> {
        self.store
            .select(|state| state.current_user_id().map(str::to_string))
            .ok_or_else(|| DomainError::NotLoggedIn.into())
    }

    // === REST Collaborators ===

    pub fn post_client(&self) -> &dyn PostClient {
        self.post_client.as_ref()
    }

    pub fn category_client(&self) -> &dyn CategoryClient {
        self.category_client.as_ref()
    }

    pub fn channel_client(&self) -> &dyn ChannelClient {
        self.channel_client.as_ref()
    }

    pub fn preference_client(&self) -> &dyn PreferenceClient {
        self.preference_client.as_ref()
    }

    // === Configuration ===

    pub fn posts_config(&self) -> &PostsConfig {
        &self.posts_config
    }

    // === Helpers ===

    /// Thread roots with a fetch in flight
    pub fn threads_in_flight(&self) -> &DashSet<String> {
        &self.threads_in_flight
    }

    /// Queue user ids for a batched status lookup
    pub fn queue_statuses<I>(&self, user_ids: I)
    where
        I: IntoIterator<Item = String>,
    {
        if let Some(batcher) = &self.status_batcher {
            batcher.enqueue(user_ids);
        }
    }

    /// Turn a failed REST call into an action error
    ///
    /// An expired session logs the user out before anything else happens.
    pub fn handle_api_error(&self, err: ApiError) -> ActionError {
        if err.should_force_logout() {
            warn!(url = %err.url, "Session expired, logging out");
            self.store.dispatch(Action::LogoutSuccess);
        }
        ActionError::Api(err)
    }
}

impl std::fmt::Debug for ActionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionContext")
            .field("clients", &"...")
            .field("posts_config", &self.posts_config)
            .field("status_batcher", &self.status_batcher.is_some())
            .finish()
    }
}

/// Builder for creating ActionContext
pub struct ActionContextBuilder {
    store: Option<SharedStore>,
    post_client: Option<Arc<dyn PostClient>>,
    category_client: Option<Arc<dyn CategoryClient>>,
    channel_client: Option<Arc<dyn ChannelClient>>,
    preference_client: Option<Arc<dyn PreferenceClient>>,
    posts_config: PostsConfig,
    status_batcher: Option<Arc<StatusBatcher>>,
}

impl ActionContextBuilder {
    pub fn new() -> Self {
        Self {
            store: None,
            post_client: None,
            category_client: None,
            channel_client: None,
            preference_client: None,
            posts_config: PostsConfig::default(),
            status_batcher: None,
        }
    }

    pub fn store(mut self, store: SharedStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Use one value for every REST collaborator
    pub fn client<C>(mut self, client: Arc<C>) -> Self
    where
        C: PostClient + CategoryClient + ChannelClient + PreferenceClient + 'static,
    {
        self.post_client = Some(client.clone());
        self.category_client = Some(client.clone());
        self.channel_client = Some(client.clone());
        self.preference_client = Some(client);
        self
    }

    pub fn post_client(mut self, client: Arc<dyn PostClient>) -> Self {
        self.post_client = Some(client);
        self
    }

    pub fn category_client(mut self, client: Arc<dyn CategoryClient>) -> Self {
        self.category_client = Some(client);
        self
    }

    pub fn channel_client(mut self, client: Arc<dyn ChannelClient>) -> Self {
        self.channel_client = Some(client);
        self
    }

    pub fn preference_client(mut self, client: Arc<dyn PreferenceClient>) -> Self {
        self.preference_client = Some(client);
        self
    }

    pub fn posts_config(mut self, config: PostsConfig) -> Self {
        self.posts_config = config;
        self
    }

    pub fn status_batcher(mut self, batcher: Arc<StatusBatcher>) -> Self {
        self.status_batcher = Some(batcher);
        self
    }

    /// Build the ActionContext
    ///
    /// # Errors
    /// Returns `ActionError::Validation` if any required dependency is missing
    pub fn build(self) -> ActionResult<ActionContext> {
        Ok(ActionContext::new(
            self.store
                .ok_or_else(|| ActionError::validation("store is required"))?,
            self.post_client
                .ok_or_else(|| ActionError::validation("post_client is required"))?,
            self.category_client
                .ok_or_else(|| ActionError::validation("category_client is required"))?,
            self.channel_client
                .ok_or_else(|| ActionError::validation("channel_client is required"))?,
            self.preference_client
                .ok_or_else(|| ActionError::validation("preference_client is required"))?,
            self.posts_config,
            self.status_batcher,
        ))
    }
}

impl Default for ActionContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
