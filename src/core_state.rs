//! Shared application state: the formulary resolver, the ingredient map,
//! and the session registry.
//!
//! `CoreState` is wrapped in `Arc` at startup and handed to the HTTP layer.
//! Lookups only read it; list mutations take the session write lock for the
//! whole read-modify-write.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use crate::formulary::FormularyResolver;
use crate::ingredients::IngredientMap;
use crate::interactions::{self, LookupOutcome};
use crate::medications;
use crate::models::MedicationEntry;
use crate::session::{SessionError, SessionRegistry};

/// Errors from core state access.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Internal lock poisoned")]
    LockPoisoned,
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

/// Transport-agnostic application state.
pub struct CoreState {
    resolver: FormularyResolver,
    ingredients: &'static IngredientMap,
    sessions: RwLock<SessionRegistry>,
}

impl CoreState {
    pub fn new(resolver: FormularyResolver) -> Self {
        Self::with_ingredients(resolver, IngredientMap::builtin())
    }

    pub fn with_ingredients(resolver: FormularyResolver, ingredients: &'static IngredientMap) -> Self {
        Self::with_sessions(resolver, ingredients, SessionRegistry::new())
    }

    pub fn with_sessions(
        resolver: FormularyResolver,
        ingredients: &'static IngredientMap,
        sessions: SessionRegistry,
    ) -> Self {
        if ingredients.is_empty() {
            tracing::warn!("Ingredient map is empty; only name matches will be reported");
        }
        Self {
            resolver,
            ingredients,
            sessions: RwLock::new(sessions),
        }
    }

    pub fn resolver(&self) -> &FormularyResolver {
        &self.resolver
    }

    pub fn ingredients(&self) -> &'static IngredientMap {
        self.ingredients
    }

    // ── Session access ──────────────────────────────────────

    pub fn read_sessions(&self) -> Result<RwLockReadGuard<'_, SessionRegistry>, CoreError> {
        self.sessions.read().map_err(|_| CoreError::LockPoisoned)
    }

    pub fn write_sessions(&self) -> Result<RwLockWriteGuard<'_, SessionRegistry>, CoreError> {
        self.sessions.write().map_err(|_| CoreError::LockPoisoned)
    }

    /// Number of live sessions.
    pub fn session_count(&self) -> Result<usize, CoreError> {
        Ok(self.read_sessions()?.len())
    }

    /// Medication list of a session. Unknown, expired or absent sessions
    /// read as empty. Reading counts as activity.
    pub fn medications(&self, session_id: Option<Uuid>) -> Result<Vec<MedicationEntry>, CoreError> {
        let Some(id) = session_id else {
            return Ok(Vec::new());
        };
        let mut registry = self.write_sessions()?;
        Ok(registry
            .get_mut(&id)
            .map(|session| medications::list_medications(session))
            .unwrap_or_default())
    }

    /// Register a medication, starting a new session if the presented one is
    /// absent, unknown or expired.
    /// Returns the session id and the list after the change.
    pub fn add_medication(
        &self,
        session_id: Option<Uuid>,
        name: &str,
    ) -> Result<(Uuid, Vec<MedicationEntry>), CoreError> {
        let mut registry = self.write_sessions()?;
        let (id, session) = registry.get_or_create(session_id);
        medications::add_medication(session, name, self.ingredients)?;
        Ok((id, medications::list_medications(session)))
    }

    /// Remove a medication by name (case-insensitive).
    pub fn remove_medication(
        &self,
        session_id: Option<Uuid>,
        name: &str,
    ) -> Result<Vec<MedicationEntry>, CoreError> {
        let Some(id) = session_id else {
            return Ok(Vec::new());
        };
        let mut registry = self.write_sessions()?;
        let Some(session) = registry.get_mut(&id) else {
            return Ok(Vec::new());
        };
        medications::remove_medication(session, name)?;
        Ok(medications::list_medications(session))
    }

    /// Forget a session's medication list.
    pub fn clear_medications(&self, session_id: Option<Uuid>) -> Result<(), CoreError> {
        let Some(id) = session_id else {
            return Ok(());
        };
        let mut registry = self.write_sessions()?;
        if let Some(session) = registry.get_mut(&id) {
            medications::clear_medications(session);
        }
        Ok(())
    }

    /// Resolve `query` and cross-check it against `medications`.
    ///
    /// Blocks on the formulary transport; call from a blocking context.
    pub fn lookup(&self, query: &str, medications: &[MedicationEntry]) -> LookupOutcome {
        interactions::lookup(&self.resolver, query, medications, self.ingredients)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FormularyConfig;
    use crate::formulary::{MockFormularyClient, SearchStage};
    use serde_json::json;
    use std::time::Duration;

    fn core(mock: MockFormularyClient) -> CoreState {
        CoreState::new(FormularyResolver::new(
            Box::new(mock),
            FormularyConfig::new(Some("key".into())),
        ))
    }

    #[test]
    fn no_session_reads_empty_list() {
        let core = core(MockFormularyClient::new());
        assert!(core.medications(None).unwrap().is_empty());
        assert!(core.medications(Some(Uuid::new_v4())).unwrap().is_empty());
    }

    #[test]
    fn add_creates_session_and_persists() {
        let core = core(MockFormularyClient::new());
        let (id, meds) = core.add_medication(None, "tylenol").unwrap();
        assert_eq!(meds.len(), 1);
        assert_eq!(core.medications(Some(id)).unwrap()[0].ingredient, "Acetaminophen");
    }

    #[test]
    fn remove_and_clear_are_scoped_to_session() {
        let core = core(MockFormularyClient::new());
        let (alice, _) = core.add_medication(None, "Tylenol").unwrap();
        let (bob, _) = core.add_medication(None, "Tylenol").unwrap();

        let remaining = core.remove_medication(Some(alice), "TYLENOL").unwrap();
        assert!(remaining.is_empty());
        assert_eq!(core.medications(Some(bob)).unwrap().len(), 1);

        core.clear_medications(Some(bob)).unwrap();
        assert!(core.medications(Some(bob)).unwrap().is_empty());
    }

    #[test]
    fn remove_on_unknown_session_does_not_create_it() {
        let core = core(MockFormularyClient::new());
        let id = Uuid::new_v4();
        core.remove_medication(Some(id), "x").unwrap();
        core.clear_medications(Some(id)).unwrap();
        assert!(!core.read_sessions().unwrap().contains(&id));
    }

    #[test]
    fn forged_session_id_is_not_adopted() {
        let core = core(MockFormularyClient::new());
        let forged = Uuid::new_v4();
        let (id, _) = core.add_medication(Some(forged), "Tylenol").unwrap();
        assert_ne!(id, forged);
        assert!(core.medications(Some(forged)).unwrap().is_empty());
        assert_eq!(core.medications(Some(id)).unwrap().len(), 1);
    }

    #[test]
    fn session_count_stays_bounded() {
        let core = CoreState::with_sessions(
            FormularyResolver::new(
                Box::new(MockFormularyClient::new()),
                FormularyConfig::new(Some("key".into())),
            ),
            IngredientMap::builtin(),
            SessionRegistry::with_limits(Duration::from_secs(3600), 100),
        );
        for _ in 0..1_000 {
            core.add_medication(None, "Tylenol").unwrap();
            core.add_medication(Some(Uuid::new_v4()), "Brufen").unwrap();
        }
        assert_eq!(core.session_count().unwrap(), 100);
    }

    #[test]
    fn expired_session_reads_empty() {
        let core = CoreState::with_sessions(
            FormularyResolver::new(
                Box::new(MockFormularyClient::new()),
                FormularyConfig::new(Some("key".into())),
            ),
            IngredientMap::builtin(),
            SessionRegistry::with_limits(Duration::ZERO, 10),
        );
        let (id, _) = core.add_medication(None, "Tylenol").unwrap();
        assert!(core.medications(Some(id)).unwrap().is_empty());
        assert_eq!(core.session_count().unwrap(), 0);
    }

    #[test]
    fn lookup_uses_session_medications() {
        let mock = MockFormularyClient::new().with_items(
            SearchStage::ItemName,
            vec![json!({"itemName": "Aspirin", "intrcQesitm": "Avoid with Tylenol"})],
        );
        let core = core(mock);
        let (id, _) = core.add_medication(None, "Tylenol").unwrap();

        let meds = core.medications(Some(id)).unwrap();
        let outcome = core.lookup("Aspirin", &meds);
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].conflict_drug, "Tylenol");
        assert_eq!(outcome.warnings[0].info, "Avoid with <b>Tylenol</b>");
    }
}
