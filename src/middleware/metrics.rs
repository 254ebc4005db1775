use std::sync::Arc;

use sales_web::{Handler, Middleware};

use crate::metrics::{Metrics, TASK_SAMPLE_INTERVAL};

/// Counts requests and errors, sampling the runtime's alive task count
/// every [`TASK_SAMPLE_INTERVAL`] requests.
pub fn metrics(metrics: Arc<Metrics>) -> Arc<dyn Middleware> {
    Arc::new(move |next: Handler| {
        let metrics = metrics.clone();
        Handler::new(move |ctx, req| {
            let next = next.clone();
            let metrics = metrics.clone();
            async move {
                let result = next.call(ctx, req).await;

                let n = metrics.add_request();
                if n % TASK_SAMPLE_INTERVAL == 0 {
                    let tasks = tokio::runtime::Handle::current().metrics().num_alive_tasks();
                    metrics.set_tasks(tasks as u64);
                }

                if result.is_err() {
                    metrics.add_error();
                }

                result
            }
        })
    })
}
