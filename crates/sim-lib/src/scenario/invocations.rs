//! Simulated serverless function invocations

use super::{emit_line, ScenarioOutcome};
use crate::shutdown::ShutdownSignal;
use rand::Rng;
use std::io::Write;
use std::time::Duration;

/// How many invocations to run and how long each one "processes"
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvocationPlan {
    pub count: usize,
    /// Lower bound of the processing time, inclusive
    pub min_processing: Duration,
    /// Upper bound of the processing time, exclusive
    pub max_processing: Duration,
}

impl Default for InvocationPlan {
    fn default() -> Self {
        Self {
            count: 5,
            min_processing: Duration::from_millis(100),
            max_processing: Duration::from_millis(500),
        }
    }
}

impl InvocationPlan {
    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.max_processing <= self.min_processing {
            return self.min_processing;
        }
        let secs = rng
            .gen_range(self.min_processing.as_secs_f64()..self.max_processing.as_secs_f64());
        Duration::from_secs_f64(secs)
    }
}

pub async fn simulate_invocations<R: Rng + ?Sized>(
    plan: &InvocationPlan,
    rng: &mut R,
    out: &mut dyn Write,
    shutdown: &mut ShutdownSignal,
) -> ScenarioOutcome {
    for i in 0..plan.count {
        if shutdown.is_triggered() {
            return ScenarioOutcome::Interrupted { steps: i };
        }

        emit_line(out, &format!("   Invocation {}: Processing demo data...", i + 1));

        let processing = plan.draw(rng);
        if !shutdown.sleep(processing).await {
            return ScenarioOutcome::Interrupted { steps: i };
        }

        emit_line(
            out,
            &format!("      Processed in {:.2}s", processing.as_secs_f64()),
        );
    }

    ScenarioOutcome::Completed { steps: plan.count }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn quick_plan(count: usize) -> InvocationPlan {
        InvocationPlan {
            count,
            min_processing: Duration::from_millis(1),
            max_processing: Duration::from_millis(3),
        }
    }

    #[test]
    fn test_draw_within_range() {
        let plan = InvocationPlan::default();
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..1000 {
            let d = plan.draw(&mut rng);
            assert!(d >= Duration::from_millis(100));
            assert!(d < Duration::from_millis(500));
        }
    }

    #[test]
    fn test_draw_degenerate_range() {
        let plan = InvocationPlan {
            count: 1,
            min_processing: Duration::from_millis(5),
            max_processing: Duration::from_millis(5),
        };
        assert_eq!(plan.draw(&mut StdRng::seed_from_u64(0)), Duration::from_millis(5));
    }

    #[tokio::test]
    async fn test_simulate_invocations() {
        let mut out = Vec::new();
        let mut rng = StdRng::seed_from_u64(3);
        let mut shutdown = ShutdownSignal::never();

        let outcome = simulate_invocations(&quick_plan(5), &mut rng, &mut out, &mut shutdown).await;

        assert_eq!(outcome, ScenarioOutcome::Completed { steps: 5 });
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("Processing demo data").count(), 5);
        assert_eq!(text.matches("Processed in 0.00s").count(), 5);
    }

    #[tokio::test]
    async fn test_simulate_invocations_interrupted() {
        let (handle, mut shutdown) = crate::shutdown::shutdown_channel();
        handle.trigger();
        let mut out = Vec::new();

        let outcome = simulate_invocations(
            &quick_plan(5),
            &mut StdRng::seed_from_u64(3),
            &mut out,
            &mut shutdown,
        )
        .await;

        assert!(outcome.is_interrupted());
        assert_eq!(outcome.steps(), 0);
    }
}
