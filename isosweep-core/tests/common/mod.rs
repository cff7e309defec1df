use isosweep_core::{AdjacencyMatrix, Estimator, EstimatorError, EstimatorOutput};

/// Estimator stand-in that echoes the control value and records what it saw.
#[derive(Default)]
pub struct EchoEstimator {
    pub seen: Vec<(usize, usize, f64)>,
    pub reject_every: Option<usize>,
}

impl Estimator for EchoEstimator {
    fn estimate(
        &mut self,
        a: &AdjacencyMatrix,
        b: &AdjacencyMatrix,
        nc: f64,
    ) -> Result<EstimatorOutput, EstimatorError> {
        let call = self.seen.len();
        self.seen.push((a.dimension(), b.dimension(), nc));
        if self
            .reject_every
            .is_some_and(|every| every > 0 && call % every == every - 1)
        {
            return Err(EstimatorError::Rejected {
                arguments: vec![format!("call {call}")],
            });
        }
        Ok(EstimatorOutput {
            correctness: vec![0.0; 6],
            edge_correctness: nc,
            iterations: 4,
            candidates: 12,
            rejections: 1,
        })
    }
}
