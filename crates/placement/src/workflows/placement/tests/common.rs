use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::workflows::placement::domain::{Candidate, Slot};
use crate::workflows::placement::repository::{RunId, RunRecord, RunRepository, RunStoreError};
use crate::workflows::placement::scoring::{MatchingConfig, ScoringVariant};
use crate::workflows::placement::service::PlacementService;

pub(super) fn candidate(id: &str, city: &str, field: &str, request: &str) -> Candidate {
    Candidate {
        id: id.to_string(),
        first_name: format!("First{id}"),
        last_name: format!("Last{id}"),
        city: city.to_string(),
        preferred_field: field.to_string(),
        special_request: request.to_string(),
    }
}

pub(super) fn slot(name: &str, field: &str, city: &str, capacity: u32, supervisor: &str) -> Slot {
    Slot {
        name: name.to_string(),
        field: field.to_string(),
        city: city.to_string(),
        capacity,
        supervisor: supervisor.to_string(),
        special_requirement: String::new(),
    }
}

pub(super) fn biology_candidate() -> Candidate {
    candidate("c-1", "X", "biology", "")
}

pub(super) fn lab_and_physics_slots() -> Vec<Slot> {
    vec![
        slot("Slot A", "clinical biology lab", "X", 1, "Dr. S"),
        slot("Slot B", "physics", "Y", 1, "Dr. T"),
    ]
}

/// Two roster rows that share the id "1" and fit different slots.
pub(super) fn shared_id_candidates() -> Vec<Candidate> {
    let named = |first: &str, city: &str, field: &str| Candidate {
        first_name: first.to_string(),
        ..candidate("1", city, field, "")
    };
    vec![named("Ava", "X", "biology"), named("Ben", "Y", "physics")]
}

pub(super) fn lab_and_desk_slots() -> Vec<Slot> {
    vec![
        slot("Lab", "biology", "X", 1, "Dr. S"),
        slot("Desk", "physics", "Y", 1, "Dr. T"),
    ]
}

pub(super) fn variant_a() -> MatchingConfig {
    MatchingConfig::for_variant(ScoringVariant::Asymmetric)
}

pub(super) fn variant_b() -> MatchingConfig {
    MatchingConfig::for_variant(ScoringVariant::Uniform)
}

pub(super) const STUDENTS_CSV: &str = "ID,First Name,Last Name,City,Preferred Field,Special Request\n\
1,Noa,Levi,Haifa,biology,close to home\n\
2,Dan,Cohen,Akko,physics,\n\
3,Maya,Peretz,,,\n";

pub(super) const SITES_CSV: &str = "Site,Field,City,Capacity,Supervisor\n\
Rambam,clinical biology lab,Haifa,1,Dr. S\n\
Technion,applied physics,Haifa,2,Dr. T\n\
Empty Clinic,biology,Akko,0,Dr. U\n";

#[derive(Default, Clone)]
pub(super) struct MemoryRunStore {
    records: Arc<Mutex<HashMap<RunId, RunRecord>>>,
}

impl MemoryRunStore {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("store mutex poisoned").len()
    }
}

impl RunRepository for MemoryRunStore {
    fn insert(&self, record: RunRecord) -> Result<RunRecord, RunStoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        if guard.contains_key(&record.run_id) {
            return Err(RunStoreError::Conflict);
        }
        guard.insert(record.run_id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &RunId) -> Result<Option<RunRecord>, RunStoreError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

pub(super) struct UnavailableStore;

impl RunRepository for UnavailableStore {
    fn insert(&self, _record: RunRecord) -> Result<RunRecord, RunStoreError> {
        Err(RunStoreError::Unavailable("offline".to_string()))
    }

    fn fetch(&self, _id: &RunId) -> Result<Option<RunRecord>, RunStoreError> {
        Err(RunStoreError::Unavailable("offline".to_string()))
    }
}

pub(super) fn build_service() -> (Arc<PlacementService<MemoryRunStore>>, MemoryRunStore) {
    let store = MemoryRunStore::default();
    let service = Arc::new(PlacementService::new(Arc::new(store.clone()), variant_a()));
    (service, store)
}
