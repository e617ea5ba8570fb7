// In-memory driver for unit tests

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::driver::{Driver, ELEMENT_KEY, element_ids};
use crate::errors::{QueryError, Result};
use crate::library::{INSTALL_SCRIPT, QUERY_SCRIPT};
use crate::translate::NativeQuery;

#[derive(Debug, Clone, PartialEq)]
pub struct MockElement {
    pub id: String,
    pub html: String,
}

pub fn el(id: &str, html: &str) -> MockElement {
    MockElement {
        id: id.to_string(),
        html: html.to_string(),
    }
}

#[derive(Default)]
struct MockState {
    // The last queued response repeats once the queue is drained
    find_responses: VecDeque<Vec<MockElement>>,
    script_responses: VecDeque<Value>,
    known: HashMap<String, MockElement>,
    calls: Vec<String>,
    broken_html: bool,
}

#[derive(Clone, Default)]
pub struct MockDriver {
    state: Arc<Mutex<MockState>>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond_find(&self, elements: Vec<MockElement>) {
        let mut state = self.state.lock().unwrap();
        for element in &elements {
            state.known.insert(element.id.clone(), element.clone());
        }
        state.find_responses.push_back(elements);
    }

    pub fn respond_script(&self, value: Value) {
        self.state.lock().unwrap().script_responses.push_back(value);
    }

    /// Script response listing `elements` as W3C references
    pub fn respond_script_elements(&self, elements: Vec<MockElement>) {
        let refs: Vec<Value> = elements
            .iter()
            .map(|element| json!({ ELEMENT_KEY: element.id }))
            .collect();
        let mut state = self.state.lock().unwrap();
        for element in elements {
            state.known.insert(element.id.clone(), element);
        }
        state.script_responses.push_back(Value::Array(refs));
    }

    pub fn break_html(&self) {
        self.state.lock().unwrap().broken_html = true;
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count_calls(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn record(&self, call: String) {
        self.state.lock().unwrap().calls.push(call);
    }

    fn next_script_response(&self) -> Value {
        self.state
            .lock()
            .unwrap()
            .script_responses
            .pop_front()
            .unwrap_or(Value::Null)
    }
}

#[async_trait]
impl Driver for MockDriver {
    type Element = MockElement;

    async fn find_elements(
        &self,
        scope: Option<&MockElement>,
        query: &NativeQuery,
    ) -> Result<Vec<MockElement>> {
        let call = match scope {
            Some(scope) => format!("find:{:?} within {}", query, scope.id),
            None => format!("find:{:?}", query),
        };
        self.record(call);

        let mut state = self.state.lock().unwrap();
        let response = if state.find_responses.len() > 1 {
            state.find_responses.pop_front().unwrap_or_default()
        } else {
            state.find_responses.front().cloned().unwrap_or_default()
        };
        Ok(response)
    }

    async fn execute(&self, script: &str, args: Vec<Value>) -> Result<Value> {
        let call = if script == QUERY_SCRIPT {
            let scope = args[0]
                .get(ELEMENT_KEY)
                .and_then(Value::as_str)
                .map(|id| format!(" within {}", id))
                .unwrap_or_default();
            format!("query:{}{}", args[1].as_str().unwrap_or_default(), scope)
        } else if script == INSTALL_SCRIPT {
            format!("install:{}", args[0])
        } else {
            "load".to_string()
        };
        self.record(call);
        Ok(self.next_script_response())
    }

    async fn execute_async(&self, _script: &str, args: Vec<Value>) -> Result<Value> {
        self.record(format!("load_async:{}", args[0].as_str().unwrap_or_default()));
        Ok(self.next_script_response())
    }

    fn element_arg(&self, element: &MockElement) -> Result<Value> {
        Ok(json!({ ELEMENT_KEY: element.id }))
    }

    fn elements_from_value(&self, value: Value) -> Result<Vec<MockElement>> {
        let state = self.state.lock().unwrap();
        Ok(element_ids(value)?
            .into_iter()
            .map(|id| {
                state.known.get(&id).cloned().unwrap_or(MockElement {
                    id,
                    html: String::new(),
                })
            })
            .collect())
    }

    async fn outer_html(&self, element: &MockElement) -> Result<String> {
        if self.state.lock().unwrap().broken_html {
            return Err(QueryError::InvalidResponse("stale element".to_string()));
        }
        Ok(element.html.clone())
    }
}
