use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::helpers::{Revision, Timer};
use super::Engine;
use crate::{
    api::SuggestionAPI,
    config::Config,
    entities::{is_searchable, Field, Suggestion, SuggestionState},
    error::Error,
    external::AddressResolver,
};

#[derive(Debug, Default)]
struct FieldState {
    timer: Timer,
    searching: bool,
    suggestions: Vec<Suggestion>,
}

/// Debounced address lookups for one location input. Start and end each own
/// one, so neither can cancel the other.
#[derive(Clone)]
pub struct SuggestionField {
    field: Field,
    state: Arc<Mutex<FieldState>>,
    resolver: Arc<dyn AddressResolver>,
    debounce: Duration,
    country_scope: String,
    limit: usize,
    revision: Revision,
}

impl SuggestionField {
    pub fn new(
        field: Field,
        resolver: Arc<dyn AddressResolver>,
        config: &Config,
        revision: &Revision,
    ) -> Self {
        Self {
            field,
            state: Arc::new(Mutex::new(FieldState::default())),
            resolver,
            debounce: config.debounce,
            country_scope: config.country_scope.clone(),
            limit: config.suggestion_limit,
            revision: revision.clone(),
        }
    }

    /// Cancels the pending lookup and schedules a new one for `input` after
    /// the debounce delay. Unsearchable input just clears the list.
    pub async fn restart(&self, input: &str) {
        let mut state = self.state.lock().await;
        let generation = state.timer.restart();
        state.searching = false;

        if !is_searchable(input) {
            state.suggestions.clear();
            drop(state);
            self.revision.bump();
            return;
        }

        let this = self.clone();
        let input = input.to_string();
        state
            .timer
            .set_task(tokio::spawn(async move { this.lookup(generation, input).await }));
    }

    async fn lookup(self, generation: u64, input: String) {
        tokio::time::sleep(self.debounce).await;

        {
            let mut state = self.state.lock().await;
            if !state.timer.is_current(generation) {
                return;
            }
            state.searching = true;
        }
        self.revision.bump();

        let suggestions = match self
            .resolver
            .search(&input, &self.country_scope, self.limit)
            .await
        {
            Ok(mut suggestions) => {
                suggestions.truncate(self.limit);
                suggestions
            }
            Err(err) => {
                tracing::warn!(
                    "address lookup for {} failed: {}",
                    self.field.name(),
                    err.message
                );
                vec![]
            }
        };

        let mut state = self.state.lock().await;
        if !state.timer.is_current(generation) {
            tracing::debug!("dropping stale suggestions for {:?}", input);
            return;
        }
        state.searching = false;
        state.suggestions = suggestions;
        drop(state);

        self.revision.bump();
    }

    /// Clears the list and disregards any pending or in-flight lookup.
    pub async fn supersede(&self) {
        let mut state = self.state.lock().await;
        state.timer.restart();
        state.searching = false;
        state.suggestions.clear();
        drop(state);

        self.revision.bump();
    }

    pub async fn find(&self, id: &str) -> Option<Suggestion> {
        let state = self.state.lock().await;
        state.suggestions.iter().find(|s| s.id == id).cloned()
    }

    pub async fn state(&self) -> SuggestionState {
        let state = self.state.lock().await;
        SuggestionState {
            searching: state.searching,
            suggestions: state.suggestions.clone(),
        }
    }
}

#[async_trait]
impl SuggestionAPI for Engine {
    async fn suggestions(&self, field: Field) -> Result<SuggestionState, Error> {
        Ok(self.search(field).state().await)
    }

    #[tracing::instrument(skip(self))]
    async fn dismiss_suggestions(&self, field: Field) -> Result<(), Error> {
        self.search(field).supersede().await;
        Ok(())
    }
}

#[tokio::test(start_paused = true)]
async fn rapid_edits_issue_one_lookup() {
    use super::mocks::*;
    use crate::api::LocationAPI;

    let resolver = Arc::new(MockResolver::new());
    let engine = engine_with(resolver.clone(), MockSource::empty(), MockPositioner::unsupported());

    for input in ["Cap", "Cape", "Cape T", "Cape To", "Cape Town"] {
        engine.set_from_text(Field::Start, input.into()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert!(resolver.calls().is_empty());

    tokio::time::sleep(Duration::from_millis(500)).await;

    assert_eq!(resolver.calls(), vec!["Cape Town".to_string()]);
    let state = engine.suggestions(Field::Start).await.unwrap();
    assert!(!state.searching);
    assert_eq!(state.suggestions.len(), 3);
    assert_eq!(state.suggestions[0].label, "Cape Town 0");
}

#[tokio::test(start_paused = true)]
async fn short_input_never_reaches_resolver() {
    use super::mocks::*;
    use crate::api::LocationAPI;
    use crate::entities::CURRENT_LOCATION;

    let resolver = Arc::new(MockResolver::new());
    let engine = engine_with(resolver.clone(), MockSource::empty(), MockPositioner::unsupported());

    engine.set_from_text(Field::Start, "Ca".into()).await.unwrap();
    engine
        .set_from_text(Field::End, CURRENT_LOCATION.into())
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert!(resolver.calls().is_empty());
    assert!(engine.suggestions(Field::Start).await.unwrap().suggestions.is_empty());
}

#[tokio::test(start_paused = true)]
async fn fields_debounce_independently() {
    use super::mocks::*;
    use crate::api::LocationAPI;

    let resolver = Arc::new(MockResolver::new());
    let engine = engine_with(resolver.clone(), MockSource::empty(), MockPositioner::unsupported());

    engine.set_from_text(Field::Start, "Stellenbosch".into()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;
    engine.set_from_text(Field::End, "Franschhoek".into()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(600)).await;

    let mut calls = resolver.calls();
    calls.sort();
    assert_eq!(calls, vec!["Franschhoek".to_string(), "Stellenbosch".to_string()]);

    let start = engine.suggestions(Field::Start).await.unwrap();
    let end = engine.suggestions(Field::End).await.unwrap();
    assert_eq!(start.suggestions[0].label, "Stellenbosch 0");
    assert_eq!(end.suggestions[0].label, "Franschhoek 0");
}

#[tokio::test(start_paused = true)]
async fn failed_lookup_yields_empty_list() {
    use super::mocks::*;
    use crate::api::LocationAPI;

    let resolver = MockResolver::failing();
    let engine = engine(resolver, MockSource::empty(), MockPositioner::unsupported());

    engine.set_from_text(Field::Start, "Paarl".into()).await.unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;

    let state = engine.suggestions(Field::Start).await.unwrap();
    assert!(!state.searching);
    assert!(state.suggestions.is_empty());
}

#[tokio::test(start_paused = true)]
async fn stale_lookup_is_discarded() {
    use super::mocks::*;
    use crate::api::LocationAPI;

    let resolver = Arc::new(MockResolver::slow(Duration::from_secs(1)));
    let engine = engine_with(resolver.clone(), MockSource::empty(), MockPositioner::unsupported());

    engine.set_from_text(Field::Start, "Cape".into()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert!(engine.suggestions(Field::Start).await.unwrap().searching);

    engine.set_from_text(Field::Start, "Durban".into()).await.unwrap();
    tokio::time::sleep(Duration::from_secs(2)).await;

    assert_eq!(resolver.calls(), vec!["Cape".to_string(), "Durban".to_string()]);
    let state = engine.suggestions(Field::Start).await.unwrap();
    assert!(state
        .suggestions
        .iter()
        .all(|s| s.label.starts_with("Durban")));
}

#[tokio::test(start_paused = true)]
async fn suggestions_are_capped() {
    use super::mocks::*;
    use crate::api::LocationAPI;

    let resolver = MockResolver::with_count(8);
    let engine = engine(resolver, MockSource::empty(), MockPositioner::unsupported());

    engine.set_from_text(Field::End, "Hermanus".into()).await.unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;

    let state = engine.suggestions(Field::End).await.unwrap();
    assert_eq!(state.suggestions.len(), 5);
}

#[tokio::test(start_paused = true)]
async fn dismiss_cancels_pending_lookup() {
    use super::mocks::*;
    use crate::api::LocationAPI;

    let resolver = Arc::new(MockResolver::new());
    let engine = engine_with(resolver.clone(), MockSource::empty(), MockPositioner::unsupported());

    engine.set_from_text(Field::Start, "George".into()).await.unwrap();
    engine.dismiss_suggestions(Field::Start).await.unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert!(resolver.calls().is_empty());
    assert_eq!(
        engine.suggestions(Field::Start).await.unwrap(),
        SuggestionState::default()
    );
}
