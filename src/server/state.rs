use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;

use crate::audit::{AuditLogWriter, MemoryAuditLog, PostgresAuditLog};
use crate::config::Settings;
use crate::dispatch::{Collaborators, NotificationDispatchPipeline};
use crate::error::Result;
use crate::i18n::CatalogLocalizer;
use crate::leaders::{LeaderResolver, MemoryLeaderResolver, PostgresLeaderResolver};
use crate::metrics::RULES_LOADED;
use crate::postgres::PostgresPool;
use crate::queue::{create_job_queue, JobConsumer, TracingJobHandler};
use crate::rules::{load_rules_file, MemoryRuleCache, RuleCache};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub pipeline: Arc<NotificationDispatchPipeline>,
    pub rule_cache: Arc<MemoryRuleCache>,
    pub start_time: Instant,
    shutdown_tx: broadcast::Sender<()>,
    background: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl AppState {
    pub fn new(
        settings: Settings,
        pipeline: Arc<NotificationDispatchPipeline>,
        rule_cache: Arc<MemoryRuleCache>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            pipeline,
            rule_cache,
            start_time: Instant::now(),
            shutdown_tx: broadcast::channel(1).0,
            background: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Signal background tasks to stop and wait for them to finish.
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());

        let handles: Vec<_> = self.background.lock().await.drain(..).collect();
        for handle in handles {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Background task failed");
            }
        }
    }

    /// Number of background tasks still owned by the state
    pub async fn background_tasks(&self) -> usize {
        self.background.lock().await.len()
    }

    /// Wire the pipeline and its collaborators from configuration.
    pub async fn from_settings(settings: Settings) -> Result<Self> {
        let rule_cache = Arc::new(MemoryRuleCache::new());
        match load_rules_file(&settings.rules.path) {
            Ok(rules) => {
                rule_cache.replace_all(rules);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Starting without rules");
            }
        }
        RULES_LOADED.set(rule_cache.rule_count() as i64);

        let (leaders, audit_log): (Arc<dyn LeaderResolver>, Arc<dyn AuditLogWriter>) =
            match &settings.database.url {
                Some(url) => {
                    let pool = PostgresPool::connect(url, &settings.database)
                        .await
                        .map_err(|e| {
                            crate::error::AppError::Internal(format!(
                                "PostgreSQL connection failed: {}",
                                e
                            ))
                        })?;
                    (
                        Arc::new(PostgresLeaderResolver::new(pool.pool().clone())) as Arc<dyn LeaderResolver>,
                        Arc::new(PostgresAuditLog::new(pool.pool().clone())) as Arc<dyn AuditLogWriter>,
                    )
                }
                None => {
                    tracing::warn!(
                        log_capacity = settings.audit.memory_capacity,
                        "No database configured, using in-memory leader and log stores"
                    );
                    (
                        Arc::new(MemoryLeaderResolver::new()) as Arc<dyn LeaderResolver>,
                        Arc::new(MemoryAuditLog::with_capacity(settings.audit.memory_capacity))
                            as Arc<dyn AuditLogWriter>,
                    )
                }
            };

        let queue_backend = create_job_queue(&settings.queue).await;

        let collaborators = Collaborators {
            rules: rule_cache.clone(),
            leaders,
            localizer: Arc::new(CatalogLocalizer::with_defaults(
                settings.dispatch.default_language.clone(),
            )),
            audit_log,
            queue: queue_backend.shared(),
        };

        let pipeline = Arc::new(NotificationDispatchPipeline::new(
            settings.dispatch_config(),
            collaborators,
        ));

        let state = Self::new(settings, pipeline, rule_cache);

        if let Some(memory_queue) = queue_backend.memory() {
            tracing::warn!(
                max_pending = memory_queue.capacity(),
                "Memory job queue is for development only: jobs are handed to the log and lost on restart"
            );
            let consumer = JobConsumer::new(
                memory_queue,
                Arc::new(TracingJobHandler),
                state.shutdown_tx.subscribe(),
            );
            state.background.lock().await.push(tokio::spawn(consumer.run()));
        }

        Ok(state)
    }
}
