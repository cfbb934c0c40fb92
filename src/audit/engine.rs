//! ArrivalAuditEngine implementation
//!
//! One engine instance manages one audit session at a time. The engine is
//! single-owner: callers drive it through `&mut self`, so scan applications
//! never interleave mid-operation. Every line lookup reads the current
//! `items` set rather than a snapshot captured earlier, which closes the
//! window where two rapid scans could both see the same line as pending.

use std::collections::HashSet;
use std::sync::Arc;

use crate::audit::error::{AuditError, AuditResult};
use crate::audit::feedback::FeedbackSink;
use crate::audit::types::{AuditStats, LineStatus, ManifestLine, OrgContext, ScanOutcome};
use crate::notifications::api::{
    AsyncNotificationManager, Event, EventFilter, LineEvent, LineEventType, SessionEvent,
    SessionEventType,
};
use crate::scan::api::{parse, ScanResult};
use crate::store::api::{ManifestRecord, RecordStore, ShipmentStatus};

/// Working set for one active manifest
struct AuditSession {
    manifest: ManifestRecord,
    lines: Vec<ManifestLine>,
}

/// Stateful coordinator for a receive/audit session
pub struct ArrivalAuditEngine {
    store: Arc<dyn RecordStore>,
    feedback: Arc<dyn FeedbackSink>,
    notifications: AsyncNotificationManager,
    org: OrgContext,
    session: Option<AuditSession>,
}

impl ArrivalAuditEngine {
    pub fn new(store: Arc<dyn RecordStore>, feedback: Arc<dyn FeedbackSink>, org: OrgContext) -> Self {
        Self {
            store,
            feedback,
            notifications: AsyncNotificationManager::new(),
            org,
            session: None,
        }
    }

    /// Register a listener for session and line events
    pub fn subscribe(
        &mut self,
        subscriber_id: String,
        filter: EventFilter,
        source: String,
    ) -> tokio::sync::mpsc::UnboundedReceiver<Event> {
        self.notifications.subscribe(subscriber_id, filter, source)
    }

    /// Manifest currently under audit, if a session is active
    pub fn active_manifest(&self) -> Option<&ManifestRecord> {
        self.session.as_ref().map(|s| &s.manifest)
    }

    /// Current lines of the active session
    pub fn lines(&self) -> &[ManifestLine] {
        self.session.as_ref().map(|s| s.lines.as_slice()).unwrap_or(&[])
    }

    /// Resolve a manifest by id or human code and open an audit session
    ///
    /// Loads all manifest lines, deriving each line's initial status from
    /// the shipment's current lifecycle status. Replaces any previously
    /// active session.
    pub async fn resolve_manifest(&mut self, code: &str) -> AuditResult<ManifestRecord> {
        let code = code.trim();

        let manifest = match self.store.manifest_by_code(&self.org.org_id, code).await {
            Ok(Some(manifest)) => manifest,
            Ok(None) => {
                self.feedback.play_error();
                return Err(AuditError::ManifestNotFound {
                    code: code.to_string(),
                });
            }
            Err(err) => {
                self.feedback.play_error();
                return Err(err.into());
            }
        };

        let records = match self.store.lines_for_manifest(&manifest.id).await {
            Ok(records) => records,
            Err(err) => {
                self.feedback.play_error();
                return Err(err.into());
            }
        };

        // One line per shipment id; a record store returning duplicates must
        // not inflate the counts.
        let mut seen = HashSet::new();
        let mut lines = Vec::with_capacity(records.len());
        for record in &records {
            if seen.insert(record.id.clone()) {
                lines.push(ManifestLine::from_record(record));
            } else {
                log::warn!(
                    "Ignoring duplicate line for shipment {} on manifest {}",
                    record.id,
                    manifest.manifest_no
                );
            }
        }

        log::info!(
            "Opened audit session for manifest {} with {} lines",
            manifest.manifest_no,
            lines.len()
        );

        self.session = Some(AuditSession {
            manifest: manifest.clone(),
            lines,
        });
        self.feedback.play_success();
        self.emit(Event::Session(SessionEvent::new(
            SessionEventType::Opened,
            manifest.manifest_no.clone(),
        )))
        .await;

        Ok(manifest)
    }

    /// Apply one raw scan input to the active session
    ///
    /// With no active session the input is treated as a manifest-resolution
    /// request, so the same input channel serves both "scan the manifest to
    /// open it" and "scan items to receive them". Re-applying a scan for a
    /// line already in a terminal state is a no-op that reports
    /// `ScanOutcome::Duplicate`.
    pub async fn apply_scan(&mut self, raw_input: &str) -> AuditResult<ScanOutcome> {
        if self.session.is_none() {
            return self.open_session_from_scan(raw_input).await;
        }

        let awb = match parse(raw_input) {
            Ok(scan) => match scan.awb() {
                Some(awb) => awb.to_string(),
                // Manifest or package scan without a tracking code: fall back
                // to the raw token so the line lookup decides.
                None => raw_input.trim().to_uppercase(),
            },
            Err(err) => {
                self.feedback.play_error();
                return Err(err.into());
            }
        };

        // Match against the lines as they are right now; an earlier scan may
        // have completed its persistence round-trip since this input arrived.
        let manifest_no;
        let found;
        {
            let Some(session) = self.session.as_ref() else {
                return Err(AuditError::NoActiveSession);
            };
            manifest_no = session.manifest.manifest_no.clone();
            found = session
                .lines
                .iter()
                .find(|line| line.tracking_code.eq_ignore_ascii_case(&awb))
                .map(|line| (line.shipment_id.clone(), line.tracking_code.clone(), line.status));
        }

        let Some((shipment_id, tracking_code, prior_status)) = found else {
            self.feedback.play_error();
            self.emit(Event::Line(LineEvent::with_message(
                LineEventType::Rejected,
                manifest_no.clone(),
                awb.clone(),
                "Not on the active manifest".to_string(),
            )))
            .await;
            return Err(AuditError::NotOnManifest { awb, manifest_no });
        };

        if prior_status != LineStatus::Pending {
            // Scanned and exception are terminal for the session; repeating
            // the scan changes nothing and never errors.
            self.feedback.play_warning();
            self.emit(Event::Line(LineEvent::new(
                LineEventType::Duplicate,
                manifest_no,
                tracking_code.clone(),
            )))
            .await;
            return Ok(ScanOutcome::Duplicate { awb: tracking_code });
        }

        // Optimistic update: show the line as scanned while the write is in
        // flight, then reconcile against what the store actually persisted.
        self.set_line_status(&shipment_id, LineStatus::Scanned);

        match self
            .store
            .update_shipment_status(&shipment_id, ShipmentStatus::Received)
            .await
        {
            Ok(record) => {
                self.set_line_status(&shipment_id, LineStatus::from_shipment_status(record.status));
                self.feedback.play_success();
                self.emit(Event::Line(LineEvent::new(
                    LineEventType::Scanned,
                    manifest_no,
                    tracking_code.clone(),
                )))
                .await;
                Ok(ScanOutcome::Scanned { awb: tracking_code })
            }
            Err(err) => {
                // Write failed: the optimistic update must not stand.
                self.set_line_status(&shipment_id, prior_status);
                self.feedback.play_error();
                self.emit(Event::Line(LineEvent::with_message(
                    LineEventType::Rejected,
                    manifest_no,
                    tracking_code,
                    err.to_string(),
                )))
                .await;
                Err(err.into())
            }
        }
    }

    /// Mark a line as an exception, outside the normal scan path
    ///
    /// Used when a consignment arrives damaged or short. Only pending lines
    /// can be marked; terminal lines are left untouched.
    pub async fn mark_exception(
        &mut self,
        awb: &str,
        reason: Option<&str>,
    ) -> AuditResult<ScanOutcome> {
        let manifest_no;
        let found;
        {
            let Some(session) = self.session.as_ref() else {
                return Err(AuditError::NoActiveSession);
            };
            manifest_no = session.manifest.manifest_no.clone();
            found = session
                .lines
                .iter()
                .find(|line| line.tracking_code.eq_ignore_ascii_case(awb.trim()))
                .map(|line| (line.shipment_id.clone(), line.tracking_code.clone(), line.status));
        }

        let Some((shipment_id, tracking_code, prior_status)) = found else {
            self.feedback.play_error();
            return Err(AuditError::NotOnManifest {
                awb: awb.trim().to_uppercase(),
                manifest_no,
            });
        };

        if prior_status != LineStatus::Pending {
            self.feedback.play_warning();
            return Ok(ScanOutcome::Duplicate { awb: tracking_code });
        }

        self.set_line_status(&shipment_id, LineStatus::Exception);

        match self
            .store
            .update_shipment_status(&shipment_id, ShipmentStatus::Exception)
            .await
        {
            Ok(record) => {
                self.set_line_status(&shipment_id, LineStatus::from_shipment_status(record.status));
                self.feedback.play_warning();
                let event = match reason {
                    Some(reason) => LineEvent::with_message(
                        LineEventType::ExceptionMarked,
                        manifest_no,
                        tracking_code.clone(),
                        reason.to_string(),
                    ),
                    None => LineEvent::new(
                        LineEventType::ExceptionMarked,
                        manifest_no,
                        tracking_code.clone(),
                    ),
                };
                self.emit(Event::Line(event)).await;
                Ok(ScanOutcome::ExceptionMarked { awb: tracking_code })
            }
            Err(err) => {
                self.set_line_status(&shipment_id, prior_status);
                self.feedback.play_error();
                Err(err.into())
            }
        }
    }

    /// Re-read the active manifest's lines from the record store
    ///
    /// Reconciles the local view against concurrent external changes;
    /// statuses are rebuilt from the store's shipment records.
    pub async fn refresh_session(&mut self) -> AuditResult<AuditStats> {
        let manifest_id;
        let manifest_no;
        {
            let Some(session) = self.session.as_ref() else {
                return Err(AuditError::NoActiveSession);
            };
            manifest_id = session.manifest.id.clone();
            manifest_no = session.manifest.manifest_no.clone();
        }

        let records = self.store.lines_for_manifest(&manifest_id).await?;

        let mut seen = HashSet::new();
        let mut lines = Vec::with_capacity(records.len());
        for record in &records {
            if seen.insert(record.id.clone()) {
                lines.push(ManifestLine::from_record(record));
            }
        }

        if let Some(session) = self.session.as_mut() {
            session.lines = lines;
        }
        self.emit(Event::Session(SessionEvent::new(
            SessionEventType::Refreshed,
            manifest_no,
        )))
        .await;

        Ok(self.stats())
    }

    /// Aggregate counts, recomputed from the live line set on every call
    pub fn stats(&self) -> AuditStats {
        self.session
            .as_ref()
            .map(|s| AuditStats::from_lines(&s.lines))
            .unwrap_or_default()
    }

    /// End the session and discard in-memory lines; the record store keeps
    /// whatever was persisted
    pub async fn clear_session(&mut self) {
        if let Some(session) = self.session.take() {
            log::info!(
                "Cleared audit session for manifest {}",
                session.manifest.manifest_no
            );
            self.emit(Event::Session(SessionEvent::new(
                SessionEventType::Cleared,
                session.manifest.manifest_no,
            )))
            .await;
        }
    }

    async fn open_session_from_scan(&mut self, raw_input: &str) -> AuditResult<ScanOutcome> {
        // Manifest QR payloads carry the code inside an envelope; anything
        // else is treated as the code itself.
        let code = match parse(raw_input) {
            Ok(ScanResult::Manifest {
                manifest_no,
                manifest_id,
                ..
            }) => manifest_no
                .or(manifest_id)
                .unwrap_or_else(|| raw_input.trim().to_string()),
            _ => raw_input.trim().to_string(),
        };

        let manifest = self.resolve_manifest(&code).await?;
        let total = self.stats().total;
        Ok(ScanOutcome::SessionOpened {
            manifest_no: manifest.manifest_no,
            total,
        })
    }

    fn set_line_status(&mut self, shipment_id: &str, status: LineStatus) {
        if let Some(session) = self.session.as_mut() {
            if let Some(line) = session
                .lines
                .iter_mut()
                .find(|line| line.shipment_id == shipment_id)
            {
                line.status = status;
            }
        }
    }

    async fn emit(&mut self, event: Event) {
        // Listener loss is not a scan failure; the session state is already
        // consistent by the time an event goes out.
        if let Err(err) = self.notifications.publish(event).await {
            log::debug!("Event delivery incomplete: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::feedback::CountingFeedback;
    use crate::store::api::{MemoryStore, SeedData, ShipmentRecord, StoreError};

    fn seed() -> SeedData {
        SeedData {
            manifests: vec![ManifestRecord {
                id: "m-1".to_string(),
                manifest_no: "MNF-2026-000001".to_string(),
                org_id: "org-1".to_string(),
                origin: "KHI".to_string(),
                destination: "LHE".to_string(),
            }],
            shipments: vec![
                shipment("shp-1", "TAC12345678"),
                shipment("shp-2", "CN-2026-0042"),
            ],
        }
    }

    fn shipment(id: &str, code: &str) -> ShipmentRecord {
        ShipmentRecord {
            id: id.to_string(),
            tracking_code: code.to_string(),
            consignee: "Acme Traders".to_string(),
            package_count: 1,
            weight_kg: 4.2,
            status: ShipmentStatus::InTransit,
            manifest_id: Some("m-1".to_string()),
            received_at: None,
        }
    }

    fn engine_with(
        store: Arc<MemoryStore>,
    ) -> (ArrivalAuditEngine, Arc<CountingFeedback>) {
        let feedback = Arc::new(CountingFeedback::default());
        let engine = ArrivalAuditEngine::new(
            store,
            feedback.clone(),
            OrgContext::new("org-1"),
        );
        (engine, feedback)
    }

    #[tokio::test]
    async fn test_resolve_manifest_opens_session() {
        let store = Arc::new(MemoryStore::with_seed(seed()));
        let (mut engine, feedback) = engine_with(store);

        let manifest = engine.resolve_manifest("MNF-2026-000001").await.unwrap();
        assert_eq!(manifest.id, "m-1");
        assert!(engine.active_manifest().is_some());

        let stats = engine.stats();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.missing, 2);
        assert_eq!(feedback.counts(), (1, 0, 0));
    }

    #[tokio::test]
    async fn test_resolve_unknown_manifest_fails() {
        let store = Arc::new(MemoryStore::with_seed(seed()));
        let (mut engine, feedback) = engine_with(store);

        let err = engine.resolve_manifest("MNF-2026-999999").await.unwrap_err();
        assert_eq!(
            err,
            AuditError::ManifestNotFound {
                code: "MNF-2026-999999".to_string()
            }
        );
        assert!(engine.active_manifest().is_none());
        assert_eq!(feedback.counts(), (0, 1, 0));
    }

    #[tokio::test]
    async fn test_first_scan_opens_session() {
        let store = Arc::new(MemoryStore::with_seed(seed()));
        let (mut engine, _) = engine_with(store);

        let outcome = engine.apply_scan("MNF-2026-000001").await.unwrap();
        assert_eq!(
            outcome,
            ScanOutcome::SessionOpened {
                manifest_no: "MNF-2026-000001".to_string(),
                total: 2,
            }
        );
    }

    #[tokio::test]
    async fn test_scan_matches_case_insensitively() {
        let store = Arc::new(MemoryStore::with_seed(seed()));
        let (mut engine, feedback) = engine_with(store.clone());
        engine.resolve_manifest("MNF-2026-000001").await.unwrap();

        let outcome = engine.apply_scan("tac12345678").await.unwrap();
        assert_eq!(
            outcome,
            ScanOutcome::Scanned {
                awb: "TAC12345678".to_string()
            }
        );
        assert_eq!(engine.stats().scanned, 1);
        assert_eq!(
            store.shipment_status("shp-1").await,
            Some(ShipmentStatus::Received)
        );
        // One success for the session, one for the scan
        assert_eq!(feedback.counts(), (2, 0, 0));
    }

    #[tokio::test]
    async fn test_duplicate_scan_is_a_no_op() {
        let store = Arc::new(MemoryStore::with_seed(seed()));
        let (mut engine, feedback) = engine_with(store);
        engine.resolve_manifest("MNF-2026-000001").await.unwrap();

        let first = engine.apply_scan("TAC12345678").await.unwrap();
        assert!(!first.is_duplicate());

        let second = engine.apply_scan("TAC12345678").await.unwrap();
        assert_eq!(
            second,
            ScanOutcome::Duplicate {
                awb: "TAC12345678".to_string()
            }
        );

        // Scanned count incremented exactly once
        assert_eq!(engine.stats().scanned, 1);
        let (_, errors, warnings) = feedback.counts();
        assert_eq!(errors, 0);
        assert_eq!(warnings, 1);
    }

    #[tokio::test]
    async fn test_not_on_manifest_is_a_hard_stop() {
        let store = Arc::new(MemoryStore::with_seed(seed()));
        let (mut engine, feedback) = engine_with(store);
        engine.resolve_manifest("MNF-2026-000001").await.unwrap();

        let err = engine.apply_scan("TAC99999999").await.unwrap_err();
        assert_eq!(
            err,
            AuditError::NotOnManifest {
                awb: "TAC99999999".to_string(),
                manifest_no: "MNF-2026-000001".to_string(),
            }
        );

        let stats = engine.stats();
        assert_eq!(stats.scanned, 0);
        assert_eq!(stats.missing, 2);
        let (_, errors, _) = feedback.counts();
        assert_eq!(errors, 1);
    }

    #[tokio::test]
    async fn test_unrecognised_token_falls_through_to_lookup() {
        let store = Arc::new(MemoryStore::with_seed(seed()));
        let (mut engine, _) = engine_with(store);
        engine.resolve_manifest("MNF-2026-000001").await.unwrap();

        let err = engine.apply_scan("XYZ-UNKNOWN-FORMAT").await.unwrap_err();
        assert!(matches!(err, AuditError::NotOnManifest { awb, .. } if awb == "XYZ-UNKNOWN-FORMAT"));
    }

    #[tokio::test]
    async fn test_persistence_failure_rolls_back_optimistic_update() {
        let store = Arc::new(MemoryStore::with_seed(seed()));
        let (mut engine, feedback) = engine_with(store.clone());
        engine.resolve_manifest("MNF-2026-000001").await.unwrap();

        store.inject_fault(StoreError::new(400, "write rejected")).await;

        let err = engine.apply_scan("TAC12345678").await.unwrap_err();
        assert!(matches!(err, AuditError::Store(_)));

        // Local view and store both unchanged
        assert_eq!(engine.stats().scanned, 0);
        assert_eq!(engine.stats().missing, 2);
        assert_eq!(
            store.shipment_status("shp-1").await,
            Some(ShipmentStatus::InTransit)
        );
        let (_, errors, _) = feedback.counts();
        assert_eq!(errors, 1);
    }

    #[tokio::test]
    async fn test_stats_invariant_holds_throughout() {
        let store = Arc::new(MemoryStore::with_seed(seed()));
        let (mut engine, _) = engine_with(store);
        engine.resolve_manifest("MNF-2026-000001").await.unwrap();

        for input in ["TAC12345678", "TAC12345678", "cn-2026-0042"] {
            let _ = engine.apply_scan(input).await;
            let stats = engine.stats();
            assert_eq!(
                stats.total,
                stats.scanned + stats.missing + stats.exceptions
            );
        }
        assert_eq!(engine.stats().scanned, 2);
    }

    #[tokio::test]
    async fn test_mark_exception() {
        let store = Arc::new(MemoryStore::with_seed(seed()));
        let (mut engine, feedback) = engine_with(store.clone());
        engine.resolve_manifest("MNF-2026-000001").await.unwrap();

        engine
            .mark_exception("CN-2026-0042", Some("carton damaged"))
            .await
            .unwrap();
        assert_eq!(engine.stats().exceptions, 1);
        assert_eq!(
            store.shipment_status("shp-2").await,
            Some(ShipmentStatus::Exception)
        );

        // Exception lines are terminal: a later scan is a duplicate no-op
        let outcome = engine.apply_scan("CN-2026-0042").await.unwrap();
        assert!(outcome.is_duplicate());
        assert_eq!(engine.stats().exceptions, 1);
        let (_, _, warnings) = feedback.counts();
        assert_eq!(warnings, 2);
    }

    #[tokio::test]
    async fn test_refresh_session_reconciles_external_changes() {
        let store = Arc::new(MemoryStore::with_seed(seed()));
        let (mut engine, _) = engine_with(store.clone());
        engine.resolve_manifest("MNF-2026-000001").await.unwrap();
        assert_eq!(engine.stats().missing, 2);

        // Another terminal receives shp-2 directly against the store
        store
            .update_shipment_status("shp-2", ShipmentStatus::Received)
            .await
            .unwrap();

        let stats = engine.refresh_session().await.unwrap();
        assert_eq!(stats.scanned, 1);
        assert_eq!(stats.missing, 1);
    }

    #[tokio::test]
    async fn test_clear_session_returns_to_no_session() {
        let store = Arc::new(MemoryStore::with_seed(seed()));
        let (mut engine, _) = engine_with(store.clone());
        engine.resolve_manifest("MNF-2026-000001").await.unwrap();
        engine.apply_scan("TAC12345678").await.unwrap();

        engine.clear_session().await;
        assert!(engine.active_manifest().is_none());
        assert_eq!(engine.stats(), AuditStats::default());

        // Persisted state survives the clear
        assert_eq!(
            store.shipment_status("shp-1").await,
            Some(ShipmentStatus::Received)
        );
    }

    #[tokio::test]
    async fn test_events_reach_subscribers() {
        let store = Arc::new(MemoryStore::with_seed(seed()));
        let (mut engine, _) = engine_with(store);

        let mut receiver = engine.subscribe(
            "test_listener".to_string(),
            EventFilter::All,
            "test:engine".to_string(),
        );

        engine.resolve_manifest("MNF-2026-000001").await.unwrap();
        engine.apply_scan("TAC12345678").await.unwrap();
        engine.apply_scan("TAC12345678").await.unwrap();
        engine.clear_session().await;

        let opened = receiver.recv().await.unwrap();
        assert!(matches!(
            opened,
            Event::Session(SessionEvent {
                event_type: SessionEventType::Opened,
                ..
            })
        ));
        let scanned = receiver.recv().await.unwrap();
        assert!(matches!(
            scanned,
            Event::Line(LineEvent {
                event_type: LineEventType::Scanned,
                ..
            })
        ));
        let duplicate = receiver.recv().await.unwrap();
        assert!(matches!(
            duplicate,
            Event::Line(LineEvent {
                event_type: LineEventType::Duplicate,
                ..
            })
        ));
        let cleared = receiver.recv().await.unwrap();
        assert!(matches!(
            cleared,
            Event::Session(SessionEvent {
                event_type: SessionEventType::Cleared,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_empty_input_is_rejected_with_error_feedback() {
        let store = Arc::new(MemoryStore::with_seed(seed()));
        let (mut engine, feedback) = engine_with(store);
        engine.resolve_manifest("MNF-2026-000001").await.unwrap();

        let err = engine.apply_scan("   ").await.unwrap_err();
        assert!(matches!(err, AuditError::Validation(_)));
        let (_, errors, _) = feedback.counts();
        assert_eq!(errors, 1);
    }
}
