//! The in-memory token registry.
//!
//! [`TokenStore`] maps token ids to [`DesignToken`] records and keeps secondary
//! indexes by category, component and type, plus a reverse dependency index
//! (`dependency -> dependents`). Registration rejects any token whose declared
//! dependencies would close a cycle, so dependent notification always terminates.
//!
//! The store has no internal locking. Callers sharing it between tasks wrap it in a
//! single writer lock (see [`crate::theming::service::ThemeService`]).

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use tracing::debug;

use super::errors::{ThemingError, TokenValidationError};
use super::types::{DesignToken, TokenCategory, TokenId, TokenRelationship, TokenType, TokenValue};

/// Full-state snapshot produced by [`TokenStore::export`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub tokens: Vec<DesignToken>,
    /// Derived; ignored on import and rebuilt from `tokens`.
    #[serde(default)]
    pub relationships: BTreeMap<TokenId, TokenRelationship>,
}

/// Counts reported by [`TokenStore::get_stats`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub total_tokens: usize,
    pub by_category: BTreeMap<TokenCategory, usize>,
    pub by_type: BTreeMap<TokenType, usize>,
    /// Number of distinct components with at least one token.
    pub components: usize,
}

#[derive(Debug, Default)]
pub struct TokenStore {
    tokens: HashMap<TokenId, DesignToken>,
    by_category: HashMap<TokenCategory, Vec<TokenId>>,
    by_component: HashMap<String, Vec<TokenId>>,
    by_type: HashMap<TokenType, Vec<TokenId>>,
    dependents: HashMap<TokenId, BTreeSet<TokenId>>,
}

enum VisitState {
    Visiting,
    Visited,
}

fn index_upsert<K: std::hash::Hash + Eq>(index: &mut HashMap<K, Vec<TokenId>>, key: K, id: &TokenId) {
    let ids = index.entry(key).or_default();
    if !ids.contains(id) {
        ids.push(id.clone());
    }
}

fn index_remove<K: std::hash::Hash + Eq>(index: &mut HashMap<K, Vec<TokenId>>, key: &K, id: &TokenId) {
    if let Some(ids) = index.get_mut(key) {
        ids.retain(|existing| existing != id);
        if ids.is_empty() {
            index.remove(key);
        }
    }
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Inserts or replaces a token and refreshes its index entries and dependency edges.
    ///
    /// # Errors
    ///
    /// [`ThemingError::CyclicTokenReference`] if the token's dependencies lead back to
    /// itself. The store is left unchanged in that case.
    pub fn register(&mut self, token: DesignToken) -> Result<(), ThemingError> {
        self.detect_cycle(&token)?;

        let id = token.id.clone();
        if let Some(previous) = self.tokens.remove(&id) {
            if previous.category != token.category {
                index_remove(&mut self.by_category, &previous.category, &id);
            }
            if previous.token_type != token.token_type {
                index_remove(&mut self.by_type, &previous.token_type, &id);
            }
            if let Some(component) = previous.component() {
                if token.component() != Some(component) {
                    index_remove(&mut self.by_component, &component.to_string(), &id);
                }
            }
            for dependency in previous.dependencies.difference(&token.dependencies) {
                if let Some(set) = self.dependents.get_mut(dependency) {
                    set.remove(&id);
                    if set.is_empty() {
                        self.dependents.remove(dependency);
                    }
                }
            }
        }

        index_upsert(&mut self.by_category, token.category, &id);
        index_upsert(&mut self.by_type, token.token_type, &id);
        if let Some(component) = token.component() {
            index_upsert(&mut self.by_component, component.to_string(), &id);
        }
        for dependency in &token.dependencies {
            self.dependents.entry(dependency.clone()).or_default().insert(id.clone());
        }

        self.tokens.insert(id, token);
        Ok(())
    }

    /// Registers tokens in order, stopping at the first rejected one.
    pub fn register_batch<I>(&mut self, tokens: I) -> Result<(), ThemingError>
    where
        I: IntoIterator<Item = DesignToken>,
    {
        tokens.into_iter().try_for_each(|token| self.register(token))
    }

    fn detect_cycle(&self, candidate: &DesignToken) -> Result<(), ThemingError> {
        if candidate.dependencies.is_empty() {
            return Ok(());
        }
        let mut visited = HashMap::new();
        let mut path = Vec::new();
        self.detect_cycle_dfs(&candidate.id, candidate, &mut visited, &mut path)
    }

    fn detect_cycle_dfs<'a>(
        &'a self,
        current_id: &'a TokenId,
        candidate: &'a DesignToken,
        visited: &mut HashMap<&'a TokenId, VisitState>,
        path: &mut Vec<&'a TokenId>,
    ) -> Result<(), ThemingError> {
        visited.insert(current_id, VisitState::Visiting);
        path.push(current_id);

        let dependencies = if current_id == &candidate.id {
            Some(&candidate.dependencies)
        } else {
            self.tokens.get(current_id).map(|t| &t.dependencies)
        };

        if let Some(dependencies) = dependencies {
            for dependency in dependencies {
                match visited.get(dependency) {
                    Some(VisitState::Visiting) => {
                        let mut cycle_path: Vec<TokenId> = path.iter().map(|&id| id.clone()).collect();
                        cycle_path.push(dependency.clone());
                        return Err(ThemingError::CyclicTokenReference {
                            token_id: dependency.clone(),
                            path: cycle_path,
                        });
                    }
                    Some(VisitState::Visited) => {}
                    None => self.detect_cycle_dfs(dependency, candidate, visited, path)?,
                }
            }
        }

        path.pop();
        visited.insert(current_id, VisitState::Visited);
        Ok(())
    }

    pub fn get_token(&self, id: &str) -> Option<&DesignToken> {
        self.tokens.get(id)
    }

    pub fn has_token(&self, id: &str) -> bool {
        self.tokens.contains_key(id)
    }

    /// All tokens, ordered by id.
    pub fn get_all_tokens(&self) -> Vec<&DesignToken> {
        let mut all: Vec<&DesignToken> = self.tokens.values().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    fn resolve_ids<'a>(&'a self, ids: Option<&'a Vec<TokenId>>) -> Vec<&'a DesignToken> {
        ids.map(|ids| ids.iter().filter_map(|id| self.tokens.get(id)).collect())
            .unwrap_or_default()
    }

    /// Tokens of `category` in registration order.
    pub fn get_tokens_by_category(&self, category: TokenCategory) -> Vec<&DesignToken> {
        self.resolve_ids(self.by_category.get(&category))
    }

    pub fn get_tokens_by_component(&self, component: &str) -> Vec<&DesignToken> {
        self.resolve_ids(self.by_component.get(component))
    }

    pub fn get_tokens_by_type(&self, token_type: TokenType) -> Vec<&DesignToken> {
        self.resolve_ids(self.by_type.get(&token_type))
    }

    /// Component names that own at least one token, sorted.
    pub fn components(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_component.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Case-insensitive substring match on id, label, path and description.
    pub fn search_tokens(&self, query: &str) -> Vec<&DesignToken> {
        let needle = query.to_lowercase();
        let mut hits: Vec<&DesignToken> = self.tokens.values().filter(|t| t.matches_query(&needle)).collect();
        hits.sort_by(|a, b| a.id.cmp(&b.id));
        hits
    }

    /// Tokens that declare `id` as a direct dependency.
    pub fn get_dependent_tokens(&self, id: &str) -> Vec<&DesignToken> {
        self.dependents
            .get(id)
            .map(|ids| ids.iter().filter_map(|d| self.tokens.get(d)).collect())
            .unwrap_or_default()
    }

    pub fn get_relationships(&self, id: &str) -> Option<TokenRelationship> {
        let token = self.tokens.get(id)?;
        Some(TokenRelationship {
            parent: token.id.clone(),
            children: self
                .dependents
                .get(id)
                .map(|ids| ids.iter().cloned().collect())
                .unwrap_or_default(),
            affects: token.affects.clone(),
        })
    }

    /// Checks `value` against the rule of token `id`.
    ///
    /// Unknown tokens and tokens without a rule accept every value.
    pub fn validate_token_value(&self, id: &str, value: &TokenValue) -> Result<(), TokenValidationError> {
        match self.tokens.get(id).and_then(|t| t.validation.as_ref()) {
            Some(validation) => validation.check(value),
            None => Ok(()),
        }
    }

    /// Sets the value of `id` and signals every transitive dependent.
    ///
    /// Returns the dependents that were signalled, nearest first. Unknown ids are
    /// ignored and yield an empty list.
    pub fn update_token_value(&mut self, id: &str, value: TokenValue) -> Vec<TokenId> {
        match self.tokens.get_mut(id) {
            Some(token) => token.value = value,
            None => return Vec::new(),
        }

        let mut notified = Vec::new();
        let mut seen: HashSet<&TokenId> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::from([id]);
        while let Some(source) = queue.pop_front() {
            if let Some(dependents) = self.dependents.get(source) {
                for dependent in dependents {
                    if seen.insert(dependent) {
                        debug!("Token {} needs update due to change in {}", dependent, source);
                        notified.push(dependent.clone());
                        queue.push_back(dependent.as_str());
                    }
                }
            }
        }
        notified
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
        self.by_category.clear();
        self.by_component.clear();
        self.by_type.clear();
        self.dependents.clear();
    }

    pub fn export(&self) -> StoreSnapshot {
        let tokens: Vec<DesignToken> = self.get_all_tokens().into_iter().cloned().collect();
        let relationships = tokens
            .iter()
            .filter_map(|t| self.get_relationships(t.id.as_str()).map(|r| (t.id.clone(), r)))
            .collect();
        StoreSnapshot { tokens, relationships }
    }

    /// Replaces the whole state with `snapshot`.
    ///
    /// The snapshot is loaded into a fresh store first, so a rejected snapshot leaves
    /// the current state untouched.
    pub fn import(&mut self, snapshot: StoreSnapshot) -> Result<(), ThemingError> {
        let mut fresh = TokenStore::new();
        fresh.register_batch(snapshot.tokens)?;
        *self = fresh;
        Ok(())
    }

    pub fn get_stats(&self) -> StoreStats {
        let by_category = TokenCategory::ALL
            .into_iter()
            .map(|c| (c, self.by_category.get(&c).map_or(0, Vec::len)))
            .collect();
        let by_type = TokenType::ALL
            .into_iter()
            .map(|t| (t, self.by_type.get(&t).map_or(0, Vec::len)))
            .collect();
        StoreStats {
            total_tokens: self.tokens.len(),
            by_category,
            by_type,
            components: self.by_component.len(),
        }
    }
}
