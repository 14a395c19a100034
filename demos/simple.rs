use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use task_keepalive::{Decision, SupervisorBuilder, TaskError, TaskFn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let runs = Arc::new(AtomicU32::new(0));
    let counter = runs.clone();

    // Fails twice, then keeps running for a few ticks.
    let task = TaskFn::new("ticker", move |emoji: char| {
        let run = counter.fetch_add(1, Ordering::SeqCst) + 1;
        async move {
            if run < 3 {
                println!("{emoji} Run {run} is failing...");
                return Err::<(), TaskError>(format!("run {run} crashed").into());
            }
            for i in 0..3 {
                tokio::time::sleep(Duration::from_millis(200)).await;
                println!("{emoji} Task is running! ({i})");
            }
            Ok(())
        }
    });

    let supervisor = SupervisorBuilder::new(task)
        .with_max_attempts(5)
        .with_on_each_error(|decider, error, name, attempt| async move {
            println!("{name} failed on attempt {attempt}: {error}");
            if error.to_string().contains("fatal") {
                decider.decide(Decision::Fail);
            }
        })
        .with_on_fail(|error, name, attempts| async move {
            println!("{name} died after {attempts} attempts: {error:?}");
            Ok::<(), TaskError>(())
        })
        .build();

    let outcome = supervisor.call('🥴').await?;
    println!("Supervision {outcome} 🫡");
    Ok(())
}
