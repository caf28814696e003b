// src/scheduler.rs
use anyhow::{anyhow, Result};
use log::{error, info, warn};
use std::sync::Arc;
use tokio_cron_scheduler::{JobBuilder, JobScheduler};

use crate::config::Schedule;
use crate::services::notifier::NewsNotifier;

/// Runs the notifier on `schedule` until the returned scheduler is shut down.
pub async fn start(notifier: Arc<NewsNotifier>, schedule: &Schedule) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new()
        .await
        .map_err(|e| anyhow!("failed to create scheduler: {:?}", e))?;

    let job = JobBuilder::new()
        .with_timezone(schedule.timezone)
        .with_cron_job_type()
        .with_schedule(schedule.cron.as_str())
        .map_err(|e| anyhow!("invalid NOTIFY_SCHEDULE '{}': {:?}", schedule.cron, e))?
        .with_run_async(Box::new(move |uuid, mut l| {
            let notifier = notifier.clone();
            Box::pin(async move {
                info!("Scheduled morning news run {}", uuid);
                match notifier.send_news().await {
                    Ok(_) => info!("Scheduled run {} sent the message", uuid),
                    Err(e) => error!("Scheduled run {} failed: {:#}", uuid, e),
                }
                match l.next_tick_for_job(uuid).await {
                    Ok(Some(ts)) => info!("Next morning news run at {:?}", ts),
                    _ => warn!("Could not get next tick for morning news job"),
                }
            })
        }))
        .build()
        .map_err(|e| anyhow!("failed to build morning news job: {:?}", e))?;

    scheduler
        .add(job)
        .await
        .map_err(|e| anyhow!("failed to register morning news job: {:?}", e))?;
    scheduler
        .start()
        .await
        .map_err(|e| anyhow!("failed to start scheduler: {:?}", e))?;

    info!(
        "Morning news scheduled with '{}' ({})",
        schedule.cron, schedule.timezone
    );
    Ok(scheduler)
}
