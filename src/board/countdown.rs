use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};

use super::presenter::Presenter;
use crate::calendar::format_countdown;

/// Pushes a fresh countdown to the presenter every `period` until the task
/// is dropped. The target is fixed for the lifetime of the task.
pub async fn run(target: DateTime<Utc>, presenter: Arc<dyn Presenter>, period: Duration) {
    let mut interval = tokio::time::interval(period);
    loop {
        interval.tick().await;
        presenter.show_countdown(&format_countdown(&target, &Utc::now()));
    }
}
