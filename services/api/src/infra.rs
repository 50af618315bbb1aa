use metrics_exporter_prometheus::PrometheusHandle;
use placement::workflows::placement::{RunId, RunRecord, RunRepository, RunStoreError};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local run store; runs are lost on restart.
#[derive(Default, Clone)]
pub(crate) struct InMemoryRunRepository {
    records: Arc<Mutex<HashMap<RunId, RunRecord>>>,
}

impl RunRepository for InMemoryRunRepository {
    fn insert(&self, record: RunRecord) -> Result<RunRecord, RunStoreError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| RunStoreError::Unavailable("run store lock poisoned".to_string()))?;
        if guard.contains_key(&record.run_id) {
            return Err(RunStoreError::Conflict);
        }
        guard.insert(record.run_id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &RunId) -> Result<Option<RunRecord>, RunStoreError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RunStoreError::Unavailable("run store lock poisoned".to_string()))?;
        Ok(guard.get(id).cloned())
    }
}
