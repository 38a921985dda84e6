//! JSON-file transport for the recipe remote.
//!
//! Stands in for the real service during local development: one JSON
//! document plays the server, and created rows receive all-numeric server
//! ids the way the real backend assigns them. The production transport
//! lives with the app shell, not here.

use std::path::PathBuf;

use async_trait::async_trait;
use recipe::Recipe;
use serde::{Deserialize, Serialize};
use sync::{RecipeRemote, RemoteError};
use user::Preferences;

pub struct FileRemote {
    path: PathBuf,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RemoteDocument {
    #[serde(default)]
    recipes: Vec<Recipe>,
    #[serde(default)]
    preferences: Option<Preferences>,
    #[serde(default)]
    next_id: u64,
}

impl FileRemote {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileRemote { path: path.into() }
    }

    fn load(&self) -> Result<RemoteDocument, RemoteError> {
        if !self.path.exists() {
            return Ok(RemoteDocument::default());
        }
        let text = std::fs::read_to_string(&self.path)
            .map_err(|err| RemoteError::Transient(err.to_string()))?;
        serde_json::from_str(&text).map_err(|err| RemoteError::Transient(err.to_string()))
    }

    fn save(&self, document: &RemoteDocument) -> Result<(), RemoteError> {
        let text = serde_json::to_string_pretty(document)
            .map_err(|err| RemoteError::Transient(err.to_string()))?;
        std::fs::write(&self.path, text).map_err(|err| RemoteError::Transient(err.to_string()))
    }
}

#[async_trait]
impl RecipeRemote for FileRemote {
    async fn list_recipes(&self) -> Result<Vec<Recipe>, RemoteError> {
        Ok(self.load()?.recipes)
    }

    async fn create_recipe(&self, recipe: &Recipe) -> Result<Recipe, RemoteError> {
        let mut document = self.load()?;
        document.next_id += 1;
        let mut created = recipe.clone();
        created.id = format!("{}", 1000 + document.next_id);
        created.notion_page_id = Some(format!("page-{}", created.id));
        document.recipes.push(created.clone());
        self.save(&document)?;
        Ok(created)
    }

    async fn update_recipe(&self, recipe: &Recipe) -> Result<(), RemoteError> {
        let mut document = self.load()?;
        match document.recipes.iter_mut().find(|r| r.id == recipe.id) {
            Some(row) => *row = recipe.clone(),
            None => document.recipes.push(recipe.clone()),
        }
        self.save(&document)
    }

    async fn fetch_preferences(&self) -> Result<Option<Preferences>, RemoteError> {
        Ok(self.load()?.preferences)
    }

    async fn push_preferences(&self, preferences: &Preferences) -> Result<(), RemoteError> {
        let mut document = self.load()?;
        document.preferences = Some(preferences.clone());
        self.save(&document)
    }
}
