//! Two-way recipe sync with last-writer-wins and divergence detection.
//!
//! A row has diverged when it was edited locally after its last successful
//! sync (`updated_at > synced_at`); pulls surface those as conflicts
//! instead of overwriting. Pull fully precedes push, preference sync runs
//! last, and only a fatal phase failure suppresses the `last_sync_at`
//! stamp.

use chrono::{DateTime, Utc};
use recipe::{Recipe, RecipeStore};
use tracing::{info, warn};
use user::{PreferencesStore, SyncStateStore};

use crate::error::SyncError;
use crate::remote::RecipeRemote;

/// The same entity diverged on both sides since the last sync.
#[derive(Debug, Clone)]
pub struct SyncConflict {
    pub local: Recipe,
    pub server: Recipe,
}

/// What one sync call accomplished. Per-item failures are counted, not
/// fatal; a fatal phase failure lands in `error`.
#[derive(Debug, Default)]
pub struct SyncOutcome {
    pub pulled: usize,
    pub pushed: usize,
    pub conflicts: Vec<SyncConflict>,
    pub error: Option<String>,
}

/// Which side a conflict resolution keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepSide {
    Local,
    Server,
}

/// Server rows carry dash-free all-numeric ids; locally-born rows are
/// dashed uuids. Numeric-only local ids would be misclassified, which the
/// id scheme avoids by construction.
pub fn is_server_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_digit())
}

/// Run a full two-way sync: pull, push, then preferences.
///
/// Fails fast with `NotLoggedIn` (no state change) when credentials are
/// missing; every other failure is folded into the outcome value.
pub async fn sync_recipes(
    recipes: &dyn RecipeStore,
    preferences: &dyn PreferencesStore,
    sync_state: &dyn SyncStateStore,
    remote: &dyn RecipeRemote,
) -> Result<SyncOutcome, SyncError> {
    let state = sync_state.get().await?;
    if !state.is_logged_in() {
        return Err(SyncError::NotLoggedIn);
    }

    let mut outcome = SyncOutcome::default();

    // Pull: the server view lands locally unless the local row diverged.
    match remote.list_recipes().await {
        Ok(server_recipes) => {
            for server_recipe in server_recipes {
                match recipes.get(&server_recipe.id).await? {
                    None => {
                        let mut incoming = server_recipe;
                        incoming.synced_at = Some(Utc::now());
                        recipes.upsert_from_remote(&incoming).await?;
                        outcome.pulled += 1;
                    }
                    Some(local) => {
                        let edited_since_sync = match local.synced_at {
                            Some(synced) => local.updated_at > synced,
                            None => true,
                        };
                        if edited_since_sync {
                            outcome.conflicts.push(SyncConflict {
                                local,
                                server: server_recipe,
                            });
                        } else {
                            let mut incoming = server_recipe;
                            incoming.synced_at = Some(Utc::now());
                            recipes.upsert_from_remote(&incoming).await?;
                            outcome.pulled += 1;
                        }
                    }
                }
            }
        }
        Err(err) => {
            warn!(error = %err, "pull failed");
            outcome.error = Some(format!("pull failed: {err}"));
        }
    }

    // Push: every locally dirty row, one at a time; individual failures
    // are logged and the batch continues.
    for local in recipes.updated_since(DateTime::UNIX_EPOCH).await? {
        match push_one(recipes, remote, &local).await {
            Ok(()) => outcome.pushed += 1,
            Err(err) => {
                warn!(recipe_id = %local.id, error = %err, "push failed for one recipe, continuing");
            }
        }
    }

    // Preferences: non-fatal in both directions.
    match remote.fetch_preferences().await {
        Ok(Some(server_preferences)) => {
            if let Err(err) = preferences.save(&server_preferences).await {
                warn!(error = %err, "could not store server preferences");
            }
        }
        Ok(None) => {}
        Err(err) => warn!(error = %err, "could not fetch server preferences"),
    }
    match preferences.get().await {
        Ok(local_preferences) => {
            if let Err(err) = remote.push_preferences(&local_preferences).await {
                warn!(error = %err, "could not push preferences");
            }
        }
        Err(err) => warn!(error = %err, "could not load local preferences"),
    }

    if outcome.error.is_none() {
        sync_state.set_last_sync(Utc::now()).await?;
    }

    info!(
        pulled = outcome.pulled,
        pushed = outcome.pushed,
        conflicts = outcome.conflicts.len(),
        "sync finished"
    );
    Ok(outcome)
}

/// Upsert one local row to the server and stamp it synced.
async fn push_one(
    recipes: &dyn RecipeStore,
    remote: &dyn RecipeRemote,
    local: &Recipe,
) -> Result<(), SyncError> {
    if is_server_id(&local.id) {
        remote.update_recipe(local).await?;
    } else {
        let created = remote.create_recipe(local).await?;
        if created.id != local.id {
            // The server minted its own id. Adopt the server row locally,
            // otherwise the next pull would bring the same recipe back in
            // under the new id.
            let mut adopted = created;
            adopted.synced_at = Some(Utc::now());
            recipes.delete(&local.id).await?;
            recipes.upsert_from_remote(&adopted).await?;
            return Ok(());
        }
        // Keep the server's page reference so the row can be traced back.
        if created.notion_page_id.is_some() && created.notion_page_id != local.notion_page_id {
            let update = recipe::RecipeUpdate {
                notion_page_id: created.notion_page_id,
                ..Default::default()
            };
            recipes.update(&local.id, update).await?;
        }
    }
    recipes.mark_synced(&local.id, Utc::now()).await?;
    Ok(())
}

/// Apply the user's decision for one conflict.
///
/// Keeping the server side overwrites the local row; keeping the local
/// side re-pushes it. Either way the row ends up stamped as synced.
pub async fn resolve_conflict(
    recipes: &dyn RecipeStore,
    remote: &dyn RecipeRemote,
    conflict: &SyncConflict,
    keep: KeepSide,
) -> Result<(), SyncError> {
    match keep {
        KeepSide::Server => {
            let mut incoming = conflict.server.clone();
            incoming.synced_at = Some(Utc::now());
            recipes.upsert_from_remote(&incoming).await?;
        }
        KeepSide::Local => {
            push_one(recipes, remote, &conflict.local).await?;
        }
    }
    Ok(())
}
