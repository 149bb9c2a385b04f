//! Per-step timing.

/// Wall-clock timings for one step, in microseconds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepMetrics {
    /// The whole step.
    pub total_us: u64,
    /// Advection and diffusion stencil.
    pub stencil_us: u64,
    /// Edge policies.
    pub boundary_us: u64,
    /// Obstacle mask.
    pub mask_us: u64,
    /// Copying the frame into the history, zero when no frame was taken.
    pub snapshot_us: u64,
}

/// Totals over every committed step of a run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunMetrics {
    /// Committed steps.
    pub steps: u64,
    /// Sum of [`StepMetrics::total_us`].
    pub total_us: u64,
    /// Sum of [`StepMetrics::stencil_us`].
    pub stencil_us: u64,
}

impl RunMetrics {
    pub(crate) fn add(&mut self, step: &StepMetrics) {
        self.steps += 1;
        self.total_us += step.total_us;
        self.stencil_us += step.stencil_us;
    }

    /// Mean microseconds per step, or zero before the first step.
    pub fn mean_step_us(&self) -> f64 {
        if self.steps == 0 {
            return 0.0;
        }
        self.total_us as f64 / self.steps as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_run_is_zero() {
        assert_eq!(RunMetrics::default().mean_step_us(), 0.0);
    }

    #[test]
    fn totals_accumulate() {
        let mut run = RunMetrics::default();
        let step = StepMetrics {
            total_us: 30,
            stencil_us: 20,
            ..StepMetrics::default()
        };
        run.add(&step);
        run.add(&step);
        assert_eq!(run.steps, 2);
        assert_eq!(run.stencil_us, 40);
        assert_eq!(run.mean_step_us(), 30.0);
    }
}
