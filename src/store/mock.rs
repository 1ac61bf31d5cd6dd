//! # Mock Store
//!
//! A [`DocumentStore`] whose outcomes are scripted up front, for testing the
//! dispatcher without a running store.
//!
//! ```ignore
//! let store = MockStore::new();
//! store.expect_insert().return_ok("34241123".to_string());
//! store.expect_update().return_err(StoreError::Backend("timeout".into()));
//!
//! // hand `store.clone()` to the code under test...
//! store.verify(); // panics if any expectation is left over
//! ```
//!
//! Expectations are consumed in order. A call that does not match the next
//! expectation panics, failing the test.

use super::{Document, DocumentStore, Filter, FindOptions, StoreError, UpdateOutcome};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

enum Expectation {
    Find(Result<Vec<Document>, StoreError>),
    Insert(Result<String, StoreError>),
    Update(Result<UpdateOutcome, StoreError>),
    Delete(Result<Option<Document>, StoreError>),
}

impl Expectation {
    fn name(&self) -> &'static str {
        match self {
            Expectation::Find(_) => "find",
            Expectation::Insert(_) => "insert",
            Expectation::Update(_) => "update",
            Expectation::Delete(_) => "delete",
        }
    }
}

/// A call observed by the mock, kept for assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Find { filter: Filter, options: FindOptions },
    Insert { document: Document },
    Update { filter: Filter, set: Document },
    Delete { filter: Filter },
}

#[derive(Default)]
struct State {
    expectations: VecDeque<Expectation>,
    calls: Vec<RecordedCall>,
}

/// A scripted store. Clones share the same expectations.
#[derive(Clone, Default)]
pub struct MockStore {
    state: Arc<Mutex<State>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect_find(&self) -> ExpectationBuilder<'_, Vec<Document>> {
        ExpectationBuilder { store: self, wrap: Expectation::Find }
    }

    pub fn expect_insert(&self) -> ExpectationBuilder<'_, String> {
        ExpectationBuilder { store: self, wrap: Expectation::Insert }
    }

    pub fn expect_update(&self) -> ExpectationBuilder<'_, UpdateOutcome> {
        ExpectationBuilder { store: self, wrap: Expectation::Update }
    }

    pub fn expect_delete(&self) -> ExpectationBuilder<'_, Option<Document>> {
        ExpectationBuilder { store: self, wrap: Expectation::Delete }
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let state = self.state.lock().unwrap();
        if !state.expectations.is_empty() {
            panic!(
                "Not all expectations were met. {} remaining",
                state.expectations.len()
            );
        }
    }

    fn push(&self, expectation: Expectation) {
        self.state.lock().unwrap().expectations.push_back(expectation);
    }

    fn next(&self, call: RecordedCall) -> Expectation {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call.clone());
        match state.expectations.pop_front() {
            Some(expectation) => expectation,
            None => panic!("Unexpected store call: {:?}", call),
        }
    }
}

/// Builder returned by the `expect_*` methods.
pub struct ExpectationBuilder<'a, T> {
    store: &'a MockStore,
    wrap: fn(Result<T, StoreError>) -> Expectation,
}

impl<T> ExpectationBuilder<'_, T> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: T) {
        self.store.push((self.wrap)(Ok(value)));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: StoreError) {
        self.store.push((self.wrap)(Err(error)));
    }
}

#[async_trait]
impl DocumentStore for MockStore {
    async fn find(&self, filter: Filter, options: FindOptions) -> Result<Vec<Document>, StoreError> {
        match self.next(RecordedCall::Find { filter, options }) {
            Expectation::Find(response) => response,
            other => panic!("Expected {} but store received find", other.name()),
        }
    }

    async fn insert(&self, document: Document) -> Result<String, StoreError> {
        match self.next(RecordedCall::Insert { document }) {
            Expectation::Insert(response) => response,
            other => panic!("Expected {} but store received insert", other.name()),
        }
    }

    async fn update(&self, filter: Filter, set: Document) -> Result<UpdateOutcome, StoreError> {
        match self.next(RecordedCall::Update { filter, set }) {
            Expectation::Update(response) => response,
            other => panic!("Expected {} but store received update", other.name()),
        }
    }

    async fn delete(&self, filter: Filter) -> Result<Option<Document>, StoreError> {
        match self.next(RecordedCall::Delete { filter }) {
            Expectation::Delete(response) => response,
            other => panic!("Expected {} but store received delete", other.name()),
        }
    }
}
