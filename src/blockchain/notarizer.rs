//! Background notarization of issued certificates.
//!
//! Issuance hands each certificate to a [`Notarizer`]; a single worker task
//! drains the queue in order so the notary key never has two transactions
//! in flight. The outcome is written back to the certificate row.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::{Result, anyhow};
use sea_orm::DatabaseConnection;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::notary::Notary;
use crate::entities::certificate;
use crate::entities::sea_orm_active_enums::ChainStatus;
use crate::repositories::CertificateRepository;

#[derive(Debug, Clone)]
pub struct NotarizationJob {
    pub certificate_id: Uuid,
    pub certificate_hash: String,
}

impl From<&certificate::Model> for NotarizationJob {
    fn from(certificate: &certificate::Model) -> Self {
        Self {
            certificate_id: certificate.certificate_id,
            certificate_hash: certificate.certificate_hash.clone(),
        }
    }
}

/// Ids queued or being sent. A certificate is in here at most once.
#[derive(Default)]
struct InFlight(Mutex<HashSet<Uuid>>);

impl InFlight {
    fn lock(&self) -> MutexGuard<'_, HashSet<Uuid>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn claim(&self, certificate_id: Uuid) -> bool {
        self.lock().insert(certificate_id)
    }

    fn contains(&self, certificate_id: &Uuid) -> bool {
        self.lock().contains(certificate_id)
    }

    fn release(&self, certificate_id: &Uuid) {
        self.lock().remove(certificate_id);
    }
}

/// Handle to the notarization queue. Cheap to clone.
#[derive(Clone)]
pub struct Notarizer {
    tx: mpsc::UnboundedSender<NotarizationJob>,
    in_flight: Arc<InFlight>,
}

impl Notarizer {
    /// Starts the worker. The task ends once every handle has been dropped
    /// and the queue is drained.
    pub fn spawn(db: DatabaseConnection, notary: Arc<dyn Notary>) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let in_flight = Arc::new(InFlight::default());
        let handle = tokio::spawn(run_worker(rx, db, notary, in_flight.clone()));
        (Self { tx, in_flight }, handle)
    }

    /// Queues a certificate. Returns `false` when it is already queued.
    pub fn submit(&self, job: NotarizationJob) -> Result<bool> {
        if !self.in_flight.claim(job.certificate_id) {
            return Ok(false);
        }
        let certificate_id = job.certificate_id;
        self.tx.send(job).map_err(|_| {
            self.in_flight.release(&certificate_id);
            anyhow!("Notarization worker has stopped")
        })?;
        Ok(true)
    }

    /// Re-submits every certificate still `pending` or previously `failed`
    /// that is not already queued. Returns how many were queued.
    pub async fn reconcile(&self, db: &DatabaseConnection) -> Result<usize> {
        let repo = CertificateRepository::new(db);
        let stale = repo
            .find_by_chain_statuses(&[ChainStatus::Pending, ChainStatus::Failed])
            .await?;

        let mut queued = 0;
        for certificate in &stale {
            if self.in_flight.contains(&certificate.certificate_id) {
                continue;
            }
            if certificate.chain_status == ChainStatus::Failed {
                repo.mark_pending(certificate.certificate_id).await?;
            }
            if self.submit(NotarizationJob::from(certificate))? {
                queued += 1;
            }
        }

        if queued > 0 {
            tracing::info!(count = queued, "Re-queued certificates for notarization");
        }
        Ok(queued)
    }
}

async fn run_worker(
    mut rx: mpsc::UnboundedReceiver<NotarizationJob>,
    db: DatabaseConnection,
    notary: Arc<dyn Notary>,
    in_flight: Arc<InFlight>,
) {
    let repo = CertificateRepository::new(&db);
    tracing::info!(contract = %notary.contract_address(), "Notarization worker started");

    while let Some(job) = rx.recv().await {
        if let Err(e) = notarize(&repo, notary.as_ref(), &in_flight, &job).await {
            tracing::error!(
                certificate_id = %job.certificate_id,
                error = ?e,
                "Failed to record notarization outcome"
            );
        }
    }

    tracing::info!("Notarization worker stopped");
}

async fn notarize(
    repo: &CertificateRepository,
    notary: &dyn Notary,
    in_flight: &InFlight,
    job: &NotarizationJob,
) -> Result<()> {
    let certificate_id = job.certificate_id.to_string();

    let current = repo.find_by_id(job.certificate_id).await.inspect_err(|_| {
        in_flight.release(&job.certificate_id);
    })?;
    match current {
        Some(current) if current.chain_status == ChainStatus::Pending => {}
        Some(current) => {
            in_flight.release(&job.certificate_id);
            tracing::debug!(%certificate_id, status = ?current.chain_status, "Skipping notarization");
            return Ok(());
        }
        None => {
            in_flight.release(&job.certificate_id);
            tracing::debug!(%certificate_id, "Certificate removed before notarization");
            return Ok(());
        }
    }

    let outcome = notary
        .store_certificate(&certificate_id, &job.certificate_hash)
        .await;
    // Released before the outcome is written so a row seen as `failed` can
    // always be re-queued. A job queued in between finds the row settled.
    in_flight.release(&job.certificate_id);

    match outcome {
        Ok(tx_hash) => {
            tracing::info!(%certificate_id, %tx_hash, "Certificate notarized");
            repo.mark_notarized(job.certificate_id, tx_hash).await?;
        }
        Err(e) => {
            tracing::warn!(%certificate_id, error = %e, "Notarization failed");
            repo.mark_notarization_failed(job.certificate_id, format!("{e:#}"))
                .await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::NaiveDate;
    use futures::future::BoxFuture;
    use tokio::sync::Semaphore;

    use super::*;
    use crate::blockchain::notary::OnChainRecord;
    use crate::db::connect_database;
    use crate::repositories::NewCertificate;

    /// Accepts every id except those listed in `reject`, and refuses to
    /// overwrite an id it already holds. With `gate` set, each send waits
    /// for a permit.
    #[derive(Default)]
    struct RecordingNotary {
        stored: Mutex<HashMap<String, String>>,
        reject: Mutex<Vec<String>>,
        calls: AtomicUsize,
        gate: Option<Semaphore>,
    }

    impl Notary for RecordingNotary {
        fn store_certificate<'a>(
            &'a self,
            certificate_id: &'a str,
            certificate_hash: &'a str,
        ) -> BoxFuture<'a, Result<String>> {
            Box::pin(async move {
                if let Some(gate) = &self.gate {
                    gate.acquire().await.unwrap().forget();
                }
                self.calls.fetch_add(1, Ordering::SeqCst);
                if self.reject.lock().unwrap().iter().any(|id| id == certificate_id) {
                    return Err(anyhow!("execution reverted"));
                }
                if self.stored.lock().unwrap().contains_key(certificate_id) {
                    return Err(anyhow!("execution reverted: already stored"));
                }
                self.stored
                    .lock()
                    .unwrap()
                    .insert(certificate_id.to_string(), certificate_hash.to_string());
                Ok(format!("0x{:064x}", self.stored.lock().unwrap().len()))
            })
        }

        fn verify_certificate<'a>(
            &'a self,
            certificate_id: &'a str,
        ) -> BoxFuture<'a, Result<OnChainRecord>> {
            Box::pin(async move {
                Ok(OnChainRecord {
                    certificate_hash: self
                        .stored
                        .lock()
                        .unwrap()
                        .get(certificate_id)
                        .cloned()
                        .unwrap_or_default(),
                    timestamp: 0,
                    issuer: String::new(),
                })
            })
        }

        fn contract_address(&self) -> String {
            "0x0000000000000000000000000000000000000000".to_string()
        }

        fn chain_id(&self) -> u64 {
            31337
        }
    }

    async fn issue(db: &DatabaseConnection, learner: &str) -> certificate::Model {
        let certificate_id = Uuid::new_v4();
        CertificateRepository::new(db)
            .create(NewCertificate {
                certificate_id,
                learner_name: learner.to_string(),
                learner_email: format!("{}@example.com", learner.to_lowercase()),
                student_id: None,
                course_name: "Rust".to_string(),
                course_id: None,
                institute_name: "Ferris Academy".to_string(),
                institute_id: None,
                issue_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                certificate_hash: format!("{:064x}", certificate_id.as_u128()),
                chain_status: ChainStatus::Pending,
                qr_payload: format!("http://localhost:3000/verify/{certificate_id}"),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn worker_confirms_and_fails() {
        let db = connect_database("sqlite::memory:").await.unwrap();
        let ok = issue(&db, "Alice").await;
        let bad = issue(&db, "Bob").await;

        let notary = Arc::new(RecordingNotary::default());
        notary
            .reject
            .lock()
            .unwrap()
            .push(bad.certificate_id.to_string());

        let (notarizer, handle) = Notarizer::spawn(db.clone(), notary.clone());
        notarizer.submit(NotarizationJob::from(&ok)).unwrap();
        notarizer.submit(NotarizationJob::from(&bad)).unwrap();
        drop(notarizer);
        handle.await.unwrap();

        let repo = CertificateRepository::new(&db);
        let ok = repo.find_by_id(ok.certificate_id).await.unwrap().unwrap();
        assert_eq!(ok.chain_status, ChainStatus::Confirmed);
        assert!(ok.blockchain_tx_hash.is_some());
        assert!(ok.notarized_at.is_some());

        let bad = repo.find_by_id(bad.certificate_id).await.unwrap().unwrap();
        assert_eq!(bad.chain_status, ChainStatus::Failed);
        assert!(bad.chain_error.unwrap().contains("reverted"));
        assert!(bad.blockchain_tx_hash.is_none());
    }

    #[tokio::test]
    async fn reconcile_resubmits_failed_certificates() {
        let db = connect_database("sqlite::memory:").await.unwrap();
        let certificate = issue(&db, "Carol").await;
        let repo = CertificateRepository::new(&db);
        repo.mark_notarization_failed(certificate.certificate_id, "timeout".to_string())
            .await
            .unwrap();

        let notary = Arc::new(RecordingNotary::default());
        let (notarizer, handle) = Notarizer::spawn(db.clone(), notary.clone());
        assert_eq!(notarizer.reconcile(&db).await.unwrap(), 1);
        drop(notarizer);
        handle.await.unwrap();

        let certificate = repo.find_by_id(certificate.certificate_id).await.unwrap().unwrap();
        assert_eq!(certificate.chain_status, ChainStatus::Confirmed);
        assert!(certificate.chain_error.is_none());
        assert_eq!(
            notary.stored.lock().unwrap().get(&certificate.certificate_id.to_string()),
            Some(&certificate.certificate_hash)
        );
    }

    #[tokio::test]
    async fn reconcile_skips_certificates_already_queued() {
        let db = connect_database("sqlite::memory:").await.unwrap();
        let certificate = issue(&db, "Dave").await;

        let notary = Arc::new(RecordingNotary {
            gate: Some(Semaphore::new(0)),
            ..Default::default()
        });
        let (notarizer, handle) = Notarizer::spawn(db.clone(), notary.clone());
        assert!(notarizer.submit(NotarizationJob::from(&certificate)).unwrap());
        assert!(!notarizer.submit(NotarizationJob::from(&certificate)).unwrap());
        assert_eq!(notarizer.reconcile(&db).await.unwrap(), 0);

        notary.gate.as_ref().unwrap().add_permits(10);
        drop(notarizer);
        handle.await.unwrap();

        let certificate = CertificateRepository::new(&db)
            .find_by_id(certificate.certificate_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(certificate.chain_status, ChainStatus::Confirmed);
        assert!(certificate.chain_error.is_none());
        assert_eq!(notary.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn worker_skips_certificates_no_longer_pending() {
        let db = connect_database("sqlite::memory:").await.unwrap();
        let certificate = issue(&db, "Erin").await;
        let repo = CertificateRepository::new(&db);
        let confirmed = repo
            .mark_notarized(certificate.certificate_id, "0xabc".to_string())
            .await
            .unwrap();

        let notary = Arc::new(RecordingNotary::default());
        let (notarizer, handle) = Notarizer::spawn(db.clone(), notary.clone());
        assert!(notarizer.submit(NotarizationJob::from(&confirmed)).unwrap());
        drop(notarizer);
        handle.await.unwrap();

        assert_eq!(notary.calls.load(Ordering::SeqCst), 0);
        let certificate = repo.find_by_id(certificate.certificate_id).await.unwrap().unwrap();
        assert_eq!(certificate.chain_status, ChainStatus::Confirmed);
        assert_eq!(certificate.blockchain_tx_hash.as_deref(), Some("0xabc"));
    }

    #[tokio::test]
    async fn failure_never_overwrites_confirmed() {
        let db = connect_database("sqlite::memory:").await.unwrap();
        let certificate = issue(&db, "Frank").await;
        let repo = CertificateRepository::new(&db);
        repo.mark_notarized(certificate.certificate_id, "0xabc".to_string())
            .await
            .unwrap();

        let after = repo
            .mark_notarization_failed(certificate.certificate_id, "already stored".to_string())
            .await
            .unwrap();
        assert_eq!(after.chain_status, ChainStatus::Confirmed);
        assert!(after.chain_error.is_none());
    }
}
