//! Category actions
//!
//! Sidebar changes are applied to the store before the server is asked.
//! The team's categories (and any favorite preference touched) are
//! snapshotted under the same write lock; when the request fails the
//! snapshot is put back wholesale, and on success the server's copy wins.

use std::future::Future;

use chat_cache::StoreState;
use chat_core::events::{CategoryIdData, CategoryOrderData, CategoryOrderSnapshot, PreferencesData};
use chat_core::{
    Action, ApiResult, CategorySorting, CategoryType, Channel, ChannelCategory, DomainError,
    Preference,
};
use tracing::{debug, info, instrument, warn};
use validator::Validate;

use crate::dto::{CreateCategoryRequest, RenameCategoryRequest};

use super::context::ActionContext;
use super::error::ActionResult;

/// Where a moved channel lands in its new category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// First position; the category's sorting is left alone
    Front,
    /// Explicit position; the category switches to manual sorting
    At(usize),
}

/// Category actions
pub struct CategoryActions<'a> {
    ctx: &'a ActionContext,
}

impl<'a> CategoryActions<'a> {
    /// Create a new CategoryActions
    pub fn new(ctx: &'a ActionContext) -> Self {
        Self { ctx }
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Fetch every category of a team, replacing what the store held
    #[instrument(skip(self))]
    pub async fn fetch_my_categories(&self, team_id: &str) -> ActionResult<Vec<ChannelCategory>> {
        let user_id = self.ctx.current_user_id()?;
        let fetched = self
            .ctx
            .category_client()
            .get_channel_categories(&user_id, team_id)
            .await
            .map_err(|e| self.ctx.handle_api_error(e))?;

        debug!(count = fetched.categories.len(), "Received categories");
        self.ctx
            .store()
            .dispatch(Action::RestoreCategories(CategoryOrderSnapshot {
                team_id: team_id.to_string(),
                categories: fetched.categories,
                order: Some(fetched.order),
            }));
        Ok(self.ctx.store().select(|state| {
            state
                .categories
                .categories_for_team(team_id)
                .into_iter()
                .cloned()
                .collect()
        }))
    }

    /// Give a newly joined channel a category
    ///
    /// Direct and group channels go to the Direct Messages category of every
    /// loaded team that does not have them yet. Other channels go to their
    /// team's Channels category once that team's categories are loaded.
    #[instrument(skip(self, channel), fields(channel_id = %channel.id))]
    pub async fn add_channel_to_initial_category(
        &self,
        channel: &Channel,
        set_on_server: bool,
    ) -> ActionResult<()> {
        if channel.is_direct_or_group() {
            self.ctx.store().dispatch_with(|state| {
                let mut changed = Vec::new();
                for team_id in state.categories.team_ids() {
                    if state.categories.category_containing(team_id, &channel.id).is_some() {
                        continue;
                    }
                    if let Some(dm) = state
                        .categories
                        .category_of_type(team_id, CategoryType::DirectMessages)
                    {
                        let mut dm = dm.clone();
                        dm.insert_channel(&channel.id, 0);
                        changed.push(dm);
                    }
                }
                let actions = if changed.is_empty() {
                    Vec::new()
                } else {
                    vec![Action::received_categories(changed)]
                };
                Ok::<_, DomainError>((actions, ()))
            })?;
            return Ok(());
        }

        let target = self.ctx.store().select(|state| {
            let categories = &state.categories;
            if !categories.is_loaded(&channel.team_id)
                || categories
                    .category_containing(&channel.team_id, &channel.id)
                    .is_some()
            {
                return None;
            }
            categories
                .category_of_type(&channel.team_id, CategoryType::Channels)
                .map(|c| c.id.clone())
        });
        let Some(category_id) = target else {
            return Ok(());
        };

        if set_on_server {
            return self.add_channel_to_category(&category_id, &channel.id).await;
        }
        self.ctx.store().dispatch_with(|state| {
            let (actions, _) = move_channel(state, "", &category_id, &channel.id, Placement::Front)?;
            Ok::<_, DomainError>((actions, ()))
        })?;
        Ok(())
    }

    // ========================================================================
    // Channel membership
    // ========================================================================

    /// Put a channel at the top of a category, leaving its sorting alone
    #[instrument(skip(self))]
    pub async fn add_channel_to_category(&self, category_id: &str, channel_id: &str) -> ActionResult<()> {
        self.place_channel(category_id, channel_id, Placement::Front)
            .await
    }

    /// Put a channel at `new_index` of a category, which becomes manually sorted
    ///
    /// The channel leaves whatever category held it in the same update.
    #[instrument(skip(self))]
    pub async fn move_channel_to_category(
        &self,
        category_id: &str,
        channel_id: &str,
        new_index: usize,
    ) -> ActionResult<()> {
        self.place_channel(category_id, channel_id, Placement::At(new_index))
            .await
    }

    async fn place_channel(
        &self,
        category_id: &str,
        channel_id: &str,
        placement: Placement,
    ) -> ActionResult<()> {
        let user_id = self.ctx.current_user_id()?;
        let team_id = self.team_of_category(category_id)?;

        let (rollback, changed) = self.apply_optimistic(&team_id, |state| {
            Ok(move_channel(state, &user_id, category_id, channel_id, placement)?)
        })?;

        let updated = self
            .settle(
                rollback,
                self.ctx
                    .category_client()
                    .update_channel_categories(&user_id, &team_id, &changed),
            )
            .await?;

        self.ctx
            .store()
            .dispatch(Action::received_categories(updated));
        info!(channel_id = %channel_id, category_id = %category_id, "Channel moved");
        Ok(())
    }

    /// Move a category to `new_index` in its team's sidebar
    #[instrument(skip(self))]
    pub async fn move_category(&self, team_id: &str, category_id: &str, new_index: usize) -> ActionResult<()> {
        let user_id = self.ctx.current_user_id()?;

        let (rollback, order) = self.apply_optimistic(team_id, |state| {
            let mut order = state.categories.order(team_id).to_vec();
            let Some(index) = order.iter().position(|id| id == category_id) else {
                return Err(DomainError::CategoryNotFound(category_id.to_string()).into());
            };
            let id = order.remove(index);
            order.insert(new_index.min(order.len()), id);
            Ok((
                vec![Action::ReceivedCategoryOrder(CategoryOrderData {
                    team_id: team_id.to_string(),
                    order: order.clone(),
                })],
                order,
            ))
        })?;

        let order = self
            .settle(
                rollback,
                self.ctx
                    .category_client()
                    .update_channel_category_order(&user_id, team_id, &order),
            )
            .await?;

        self.ctx
            .store()
            .dispatch(Action::ReceivedCategoryOrder(CategoryOrderData {
                team_id: team_id.to_string(),
                order,
            }));
        Ok(())
    }

    // ========================================================================
    // Favorites
    // ========================================================================

    /// Move a channel into Favorites
    ///
    /// Without a Favorites category only the legacy preference is set.
    #[instrument(skip(self))]
    pub async fn favorite_channel(&self, channel_id: &str) -> ActionResult<()> {
        let user_id = self.ctx.current_user_id()?;
        let (team_id, favorites) = self.ctx.store().select(|state| {
            let team_id = state.team_for_channel(channel_id);
            let favorites = team_id.as_deref().and_then(|team_id| {
                state
                    .categories
                    .category_of_type(team_id, CategoryType::Favorites)
                    .map(|c| c.id.clone())
            });
            (team_id, favorites)
        });
        let team_id = team_id.ok_or(DomainError::NoCurrentTeam)?;

        match favorites {
            Some(favorites) => self.add_channel_to_category(&favorites, channel_id).await,
            None => {
                self.set_favorite_preference(&team_id, &user_id, channel_id, true)
                    .await
            }
        }
    }

    /// Move a channel out of Favorites, back to its default category
    #[instrument(skip(self))]
    pub async fn unfavorite_channel(&self, channel_id: &str) -> ActionResult<()> {
        let user_id = self.ctx.current_user_id()?;
        let (team_id, home) = self.ctx.store().select(|state| {
            let Some(team_id) = state.team_for_channel(channel_id) else {
                return (None, Ok(None));
            };
            let in_favorites = state
                .categories
                .category_of_type(&team_id, CategoryType::Favorites)
                .is_some_and(|c| c.contains(channel_id));
            if !in_favorites {
                return (Some(team_id), Ok(None));
            }
            let home = match state.default_category_for_channel(&team_id, channel_id) {
                Some(home) => Ok(Some(home.id.clone())),
                None => Err(DomainError::CategoryTypeNotFound {
                    team_id: team_id.clone(),
                    category_type: state
                        .channels
                        .channel(channel_id)
                        .map_or(CategoryType::Channels, |c| {
                            CategoryType::default_for(c.channel_type)
                        }),
                }),
            };
            (Some(team_id), home)
        });
        let team_id = team_id.ok_or(DomainError::NoCurrentTeam)?;

        match home? {
            Some(home) => self.add_channel_to_category(&home, channel_id).await,
            None => {
                self.set_favorite_preference(&team_id, &user_id, channel_id, false)
                    .await
            }
        }
    }

    /// Whether a channel shows as a favorite
    pub fn is_favorite_channel(&self, channel_id: &str) -> bool {
        self.ctx
            .store()
            .select(|state| state.is_favorite_channel(channel_id))
    }

    /// Teams without a Favorites category keep the legacy preference instead
    async fn set_favorite_preference(
        &self,
        team_id: &str,
        user_id: &str,
        channel_id: &str,
        favorite: bool,
    ) -> ActionResult<()> {
        let preference = Preference::favorite_channel(user_id, channel_id, favorite);
        let (rollback, ()) = self.apply_optimistic(team_id, |_| {
            Ok((vec![Action::received_preferences(vec![preference.clone()])], ()))
        })?;

        self.settle(
            rollback,
            self.ctx
                .preference_client()
                .save_preferences(user_id, std::slice::from_ref(&preference)),
        )
        .await?;
        debug!(channel_id = %channel_id, favorite, "Favorite preference saved");
        Ok(())
    }

    // ========================================================================
    // Category lifecycle
    // ========================================================================

    /// Create a custom category holding `channel_ids`
    ///
    /// The server assigns the id, so the store is only written once it
    /// answers. Listed channels leave their old categories and the new
    /// category is placed at the top of the sidebar, below Favorites.
    #[instrument(skip(self, request), fields(team_id = %request.team_id))]
    pub async fn create_category(&self, request: CreateCategoryRequest) -> ActionResult<ChannelCategory> {
        request.validate()?;
        let user_id = self.ctx.current_user_id()?;

        let mut category = ChannelCategory::new(
            "",
            &request.team_id,
            CategoryType::Custom,
            &request.display_name,
        )
        .with_channels(request.channel_ids);
        category.user_id.clone_from(&user_id);

        let created = self
            .ctx
            .category_client()
            .create_channel_category(&user_id, &request.team_id, &category)
            .await
            .map_err(|e| self.ctx.handle_api_error(e))?;

        self.ctx.store().dispatch_with(|state| {
            let team_id = &created.team_id;
            let mut changed: Vec<ChannelCategory> = Vec::new();
            for channel_id in &created.channel_ids {
                let Some(old) = state.categories.category_containing(team_id, channel_id) else {
                    continue;
                };
                if old.id == created.id {
                    continue;
                }
                let index = match changed.iter().position(|c| c.id == old.id) {
                    Some(index) => index,
                    None => {
                        changed.push(old.clone());
                        changed.len() - 1
                    }
                };
                changed[index].remove_channel(channel_id);
            }
            changed.push(created.clone());

            let mut order = state.categories.order(team_id).to_vec();
            let top = usize::from(
                order
                    .first()
                    .and_then(|id| state.categories.category(id))
                    .is_some_and(ChannelCategory::is_favorites),
            );
            order.retain(|id| id != &created.id);
            order.insert(top.min(order.len()), created.id.clone());

            Ok::<_, DomainError>((
                vec![
                    Action::received_categories(changed),
                    Action::ReceivedCategoryOrder(CategoryOrderData {
                        team_id: team_id.clone(),
                        order,
                    }),
                ],
                (),
            ))
        })?;

        info!(category_id = %created.id, "Category created");
        Ok(created)
    }

    #[instrument(skip(self, request))]
    pub async fn rename_category(&self, category_id: &str, request: RenameCategoryRequest) -> ActionResult<()> {
        request.validate()?;
        self.update_category(category_id, |category| {
            category.display_name = request.display_name;
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn set_category_sorting(&self, category_id: &str, sorting: CategorySorting) -> ActionResult<()> {
        self.update_category(category_id, |category| category.sorting = sorting)
            .await
    }

    #[instrument(skip(self))]
    pub async fn set_category_collapsed(&self, category_id: &str, collapsed: bool) -> ActionResult<()> {
        self.update_category(category_id, |category| category.collapsed = collapsed)
            .await
    }

    async fn update_category(
        &self,
        category_id: &str,
        edit: impl FnOnce(&mut ChannelCategory),
    ) -> ActionResult<()> {
        let user_id = self.ctx.current_user_id()?;
        let team_id = self.team_of_category(category_id)?;

        let (rollback, updated) = self.apply_optimistic(&team_id, |state| {
            let mut category = state
                .categories
                .category(category_id)
                .cloned()
                .ok_or_else(|| DomainError::CategoryNotFound(category_id.to_string()))?;
            edit(&mut category);
            Ok((vec![Action::received_categories(vec![category.clone()])], category))
        })?;

        let confirmed = self
            .settle(
                rollback,
                self.ctx
                    .category_client()
                    .update_channel_categories(&user_id, &team_id, &[updated]),
            )
            .await?;

        self.ctx
            .store()
            .dispatch(Action::received_categories(confirmed));
        Ok(())
    }

    /// Delete a custom category; its channels return to their default categories
    #[instrument(skip(self))]
    pub async fn delete_category(&self, category_id: &str) -> ActionResult<()> {
        let user_id = self.ctx.current_user_id()?;
        let team_id = self.team_of_category(category_id)?;

        let (rollback, ()) = self.apply_optimistic(&team_id, |state| {
            let category = state
                .categories
                .category(category_id)
                .ok_or_else(|| DomainError::CategoryNotFound(category_id.to_string()))?;
            if !category.is_custom() {
                return Err(DomainError::CannotDeleteCategory(category_id.to_string()).into());
            }

            let mut changed: Vec<ChannelCategory> = Vec::new();
            for channel_id in category.channel_ids.iter().rev() {
                let home = state
                    .default_category_for_channel(&team_id, channel_id)
                    .ok_or_else(|| DomainError::CategoryTypeNotFound {
                        team_id: team_id.clone(),
                        category_type: CategoryType::Channels,
                    })?;
                match changed.iter_mut().find(|c| c.id == home.id) {
                    Some(home) => home.insert_channel(channel_id, 0),
                    None => {
                        let mut home = home.clone();
                        home.insert_channel(channel_id, 0);
                        changed.push(home);
                    }
                }
            }

            let mut actions = Vec::with_capacity(2);
            if !changed.is_empty() {
                actions.push(Action::received_categories(changed));
            }
            actions.push(Action::CategoryDeleted(CategoryIdData {
                category_id: category_id.to_string(),
            }));
            Ok((actions, ()))
        })?;

        self.settle(
            rollback,
            self.ctx
                .category_client()
                .delete_channel_category(&user_id, &team_id, category_id),
        )
        .await?;

        info!(category_id = %category_id, "Category deleted");
        Ok(())
    }

    // ========================================================================
    // Optimistic update
    // ========================================================================

    /// Apply computed actions now and return the actions that undo them
    ///
    /// The snapshot is taken under the same write lock as the update, so no
    /// other write can land between them.
    fn apply_optimistic<R>(
        &self,
        team_id: &str,
        compute: impl FnOnce(&StoreState) -> ActionResult<(Vec<Action>, R)>,
    ) -> ActionResult<(Vec<Action>, R)> {
        self.ctx.store().dispatch_with(|state| {
            let (actions, value) = compute(state)?;
            let mut rollback = vec![Action::RestoreCategories(state.categories.snapshot(team_id))];
            rollback.extend(preference_rollback(state, &actions));
            Ok((actions, (rollback, value)))
        })
    }

    /// Await the request; on failure put the snapshot back
    async fn settle<T>(
        &self,
        rollback: Vec<Action>,
        request: impl Future<Output = ApiResult<T>>,
    ) -> ActionResult<T> {
        match request.await {
            Ok(value) => Ok(value),
            Err(e) => {
                let logged_out = e.should_force_logout();
                let err = self.ctx.handle_api_error(e);
                // A forced logout already cleared the store
                if !logged_out {
                    self.ctx.store().batch(rollback);
                }
                warn!(error = %err, "Category update failed, rolled back");
                Err(err)
            }
        }
    }

    fn team_of_category(&self, category_id: &str) -> ActionResult<String> {
        self.ctx
            .store()
            .select(|state| {
                state
                    .categories
                    .category(category_id)
                    .map(|c| c.team_id.clone())
            })
            .ok_or_else(|| DomainError::CategoryNotFound(category_id.to_string()).into())
    }
}

/// Move a channel into a category, out of whichever category of the same
/// team held it
///
/// Returns the actions to apply and the changed categories. Moving into
/// Favorites sets the legacy favorite preference; moving out of it clears it.
pub fn move_channel(
    state: &StoreState,
    user_id: &str,
    category_id: &str,
    channel_id: &str,
    placement: Placement,
) -> Result<(Vec<Action>, Vec<ChannelCategory>), DomainError> {
    let mut destination = state
        .categories
        .category(category_id)
        .cloned()
        .ok_or_else(|| DomainError::CategoryNotFound(category_id.to_string()))?;
    let source = state
        .categories
        .category_containing(&destination.team_id, channel_id)
        .cloned();

    let index = match placement {
        Placement::Front => 0,
        Placement::At(index) => {
            destination.sorting = CategorySorting::Manual;
            index
        }
    };

    let was_favorite = source.as_ref().is_some_and(ChannelCategory::is_favorites);
    let mut changed = Vec::with_capacity(2);
    match source {
        Some(mut source) if source.id != destination.id => {
            source.remove_channel(channel_id);
            destination.insert_channel(channel_id, index);
            changed.push(source);
        }
        _ => destination.insert_channel(channel_id, index),
    }
    let now_favorite = destination.is_favorites();
    changed.push(destination);

    let mut actions = vec![Action::received_categories(changed.clone())];
    if was_favorite != now_favorite && !user_id.is_empty() {
        actions.push(Action::ReceivedPreferences(PreferencesData {
            preferences: vec![Preference::favorite_channel(user_id, channel_id, now_favorite)],
        }));
    }
    Ok((actions, changed))
}

/// Actions that put back every preference the given actions overwrite
fn preference_rollback(state: &StoreState, actions: &[Action]) -> Vec<Action> {
    let mut restore = Vec::new();
    let mut delete = Vec::new();
    for action in actions {
        if let Action::ReceivedPreferences(data) = action {
            for preference in &data.preferences {
                match state.preferences.get(&preference.category, &preference.name) {
                    Some(old) => restore.push(old.clone()),
                    None => delete.push(preference.clone()),
                }
            }
        }
    }

    let mut rollback = Vec::new();
    if !restore.is_empty() {
        rollback.push(Action::received_preferences(restore));
    }
    if !delete.is_empty() {
        rollback.push(Action::deleted_preferences(delete));
    }
    rollback
}
