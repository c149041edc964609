use doctoral_assessment::config::SessionConfig;
use doctoral_assessment::workflows::assessment::{
    AssessmentId, AssessmentLifecycle, AssessmentRecord, AssessmentRepository, DecisionNotice,
    DecisionPublisher, InMemorySession, PublishError, RepositoryError, SessionUser,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAssessmentRepository {
    records: Arc<Mutex<HashMap<AssessmentId, AssessmentRecord>>>,
}

impl AssessmentRepository for InMemoryAssessmentRepository {
    fn insert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: AssessmentRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            guard.insert(record.id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &AssessmentId) -> Result<Option<AssessmentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list_by_lifecycle(
        &self,
        lifecycle: AssessmentLifecycle,
        limit: usize,
    ) -> Result<Vec<AssessmentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records: Vec<AssessmentRecord> = guard
            .values()
            .filter(|record| record.lifecycle == lifecycle)
            .cloned()
            .collect();
        records.sort_by_key(|record| record.submitted_at);
        records.truncate(limit);
        Ok(records)
    }
}

/// Records notices and mirrors them to the log.
#[derive(Default, Clone)]
pub(crate) struct LoggingDecisionPublisher {
    events: Arc<Mutex<Vec<DecisionNotice>>>,
}

impl DecisionPublisher for LoggingDecisionPublisher {
    fn publish(&self, notice: DecisionNotice) -> Result<(), PublishError> {
        info!(template = %notice.template, assessment_id = %notice.assessment_id.0, "decision notice queued");
        let mut guard = self.events.lock().expect("notice mutex poisoned");
        guard.push(notice);
        Ok(())
    }
}

impl LoggingDecisionPublisher {
    pub(crate) fn events(&self) -> Vec<DecisionNotice> {
        self.events.lock().expect("notice mutex poisoned").clone()
    }
}

/// Open a session for the configured reviewer, or stay anonymous.
pub(crate) fn session_from_config(config: &SessionConfig) -> InMemorySession {
    match &config.reviewer {
        Some(reviewer) => InMemorySession::signed_in(
            format!("local-{reviewer}"),
            SessionUser {
                username: reviewer.clone(),
                display_name: reviewer.clone(),
            },
        ),
        None => InMemorySession::anonymous(),
    }
}
